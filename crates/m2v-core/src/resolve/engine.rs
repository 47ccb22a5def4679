//! The resolution engine: seed the frontier, then drain it.

use m2v_schema::{DescriptorRef, parent_directory};

use super::catalog::resolve_catalog;
use super::descriptor::{ProcessOutcome, process_descriptor};
use super::directory::resolve_directory;
use super::{Context, EntryPoint, Resolution, ResolutionState};
use crate::config::MirrorConfig;
use crate::io::transport::Transport;
use crate::reporter::Reporter;

/// Drives one resolution run to completion.
///
/// Termination follows from the processed set: it only grows, it is checked
/// before every descriptor is processed, and the published graph is finite.
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'a> {
    ctx: Context<'a>,
}

impl<'a> Resolver<'a> {
    pub fn new(
        transport: &'a dyn Transport,
        config: &'a MirrorConfig,
        reporter: &'a dyn Reporter,
    ) -> Self {
        Self {
            ctx: Context {
                transport,
                repositories: &config.repositories,
                routing: &config.routing,
                reporter,
            },
        }
    }

    /// Resolve everything reachable from `entry`.
    pub async fn resolve(&self, entry: &EntryPoint) -> Resolution {
        let mut state = ResolutionState::new();
        self.seed(&mut state, entry).await;
        let processed = self.drain(&mut state).await;
        tracing::info!(
            "Resolution complete: {processed} descriptors read, {} links collected",
            state.downloads().len()
        );
        state.finish()
    }

    /// Put the entry point's own descriptor(s) on the frontier.
    pub async fn seed(&self, state: &mut ResolutionState, entry: &EntryPoint) {
        tracing::debug!("Seeding from {entry:?}");
        match entry {
            EntryPoint::Catalog(url) => {
                resolve_catalog(self.ctx, state, url).await;
            }
            EntryPoint::Directory(url) => {
                resolve_directory(self.ctx, state, url).await;
            }
            EntryPoint::Descriptor(DescriptorRef::Remote(url)) => {
                // A descriptor in the primary repository brings its directory along.
                if self.ctx.repositories.is_primary(url) {
                    if let Some(dir) = parent_directory(url) {
                        resolve_directory(self.ctx, state, dir).await;
                    }
                }
                if state.collect(url) {
                    self.ctx
                        .reporter
                        .discovered(&DescriptorRef::Remote(url.clone()));
                }
            }
            EntryPoint::Descriptor(local @ DescriptorRef::Local(_)) => {
                if state.enqueue(local.clone()) {
                    self.ctx.reporter.discovered(local);
                }
            }
        }
    }

    /// Process frontier entries until none remain.
    ///
    /// Returns the number of descriptors whose dependencies were read.
    pub async fn drain(&self, state: &mut ResolutionState) -> usize {
        let mut processed = 0;
        while let Some(descriptor) = state.next_descriptor() {
            match process_descriptor(self.ctx, state, &descriptor).await {
                Ok(ProcessOutcome::Processed { .. }) => processed += 1,
                Ok(ProcessOutcome::AlreadyProcessed | ProcessOutcome::Unreachable { .. }) => {}
                Err(e) => {
                    tracing::warn!("{e}");
                    self.ctx.reporter.warning(&e.to_string());
                }
            }
        }
        processed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::transport::memory::MemoryTransport;
    use crate::reporter::NullReporter;

    const REPO: &str = "https://repo1.maven.org/maven2";

    fn pom(version: &str, deps: &[(&str, &str, &str)]) -> String {
        let mut body = format!("<project><version>{version}</version><dependencies>");
        for (g, a, v) in deps {
            body.push_str(&format!(
                "<dependency><groupId>{g}</groupId><artifactId>{a}</artifactId><version>{v}</version></dependency>"
            ));
        }
        body.push_str("</dependencies></project>");
        body
    }

    fn listing(files: &[&str]) -> String {
        files
            .iter()
            .map(|f| format!("<a href=\"{f}\">{f}</a>"))
            .collect()
    }

    #[tokio::test]
    async fn test_catalog_seed_with_leaf_descriptor() {
        let page = "https://mvnrepository.com/artifact/com.google.dagger/dagger/2.50";
        let link = "https://dl.google.com/dl/android/maven2/com/google/dagger/dagger/2.50/dagger-2.50.pom";
        let transport = MemoryTransport::new()
            .with_page(
                page,
                r#"<a class="vbtn" href="https://maven.google.com/com/google/dagger/dagger/2.50/dagger-2.50.pom">pom</a>"#,
            )
            .with_page(link, &pom("2.50", &[]));
        let config = MirrorConfig::default();

        let resolution = Resolver::new(&transport, &config, &NullReporter)
            .resolve(&EntryPoint::Catalog(page.into()))
            .await;

        assert_eq!(resolution.downloads.len(), 1);
        assert!(resolution.downloads.contains(link));
        assert_eq!(resolution.processed.len(), 1);
        assert!(resolution.frontier.is_empty());
    }

    #[tokio::test]
    async fn test_dependency_cycle_terminates() {
        // a -> b -> a, both in the primary repository.
        let a_dir = format!("{REPO}/org/example/a/1.0");
        let b_dir = format!("{REPO}/org/example/b/1.0");
        let transport = MemoryTransport::new()
            .with_page(&a_dir, &listing(&["a-1.0.pom", "a-1.0.jar"]))
            .with_page(&b_dir, &listing(&["b-1.0.pom", "b-1.0.jar"]))
            .with_page(
                &format!("{a_dir}/a-1.0.pom"),
                &pom("1.0", &[("org.example", "b", "${project.version}")]),
            )
            .with_page(
                &format!("{b_dir}/b-1.0.pom"),
                &pom("1.0", &[("org.example", "a", "1.0")]),
            );
        let config = MirrorConfig::default();

        let resolution = Resolver::new(&transport, &config, &NullReporter)
            .resolve(&EntryPoint::Directory(a_dir.clone()))
            .await;

        assert_eq!(resolution.processed.len(), 2);
        assert_eq!(resolution.downloads.len(), 4);
        assert_eq!(transport.hits(&a_dir), 1);
        assert_eq!(transport.hits(&b_dir), 1);
    }

    #[tokio::test]
    async fn test_malformed_descriptor_does_not_stop_the_run() {
        let dir = format!("{REPO}/org/example/app/2.0");
        let transport = MemoryTransport::new()
            .with_page(&dir, &listing(&["app-2.0.pom", "app-2.0-tests.pom"]))
            .with_page(&format!("{dir}/app-2.0.pom"), &pom("2.0", &[]))
            .with_page(&format!("{dir}/app-2.0-tests.pom"), "{ not xml");
        let config = MirrorConfig::default();

        let resolution = Resolver::new(&transport, &config, &NullReporter)
            .resolve(&EntryPoint::Directory(dir))
            .await;

        assert_eq!(resolution.processed.len(), 2);
        assert!(resolution.frontier.is_empty());
    }

    #[tokio::test]
    async fn test_remote_descriptor_seed_lists_its_directory() {
        let dir = format!("{REPO}/org/example/lib/3.1");
        let link = format!("{dir}/lib-3.1.pom");
        let transport = MemoryTransport::new()
            .with_page(&dir, &listing(&["lib-3.1.pom", "lib-3.1.jar", "lib-3.1.jar.sha1"]))
            .with_page(&link, &pom("3.1", &[]));
        let config = MirrorConfig::default();

        let resolution = Resolver::new(&transport, &config, &NullReporter)
            .resolve(&EntryPoint::Descriptor(DescriptorRef::Remote(link)))
            .await;

        assert_eq!(resolution.downloads.len(), 3);
        assert_eq!(resolution.processed.len(), 1);
    }
}
