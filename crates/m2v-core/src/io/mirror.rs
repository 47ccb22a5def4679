//! Offline mirror materialization.
//!
//! Each download link is mapped under the mirror root by stripping the
//! repository base it belongs to, so the tree on disk has the same layout as
//! the remote repository. Files are streamed chunk by chunk; downloads of
//! distinct links run concurrently.

use std::path::{Path, PathBuf};

use futures::StreamExt;
use m2v_schema::RepositoryBases;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;

use crate::config::MirrorConfig;
use crate::error::ResolveError;
use crate::io::transport::Transport;
use crate::reporter::Reporter;

/// Local path of `link` under `root`.
///
/// # Errors
///
/// Returns [`ResolveError::DirectoryLink`] if the link names a repository
/// directory rather than a file, and [`ResolveError::UnresolvableDownloadLink`]
/// if it lies under no mirrorable base or would escape the root.
pub fn local_path(
    repositories: &RepositoryBases,
    root: &Path,
    link: &str,
) -> Result<PathBuf, ResolveError> {
    let unresolvable = || ResolveError::UnresolvableDownloadLink(link.to_string());

    let relative = repositories.mirror_relative(link).ok_or_else(unresolvable)?;
    if relative.is_empty() || relative.ends_with('/') {
        return Err(ResolveError::DirectoryLink(link.to_string()));
    }

    let mut path = root.to_path_buf();
    for segment in relative.split('/') {
        match segment {
            "" | "." | ".." => return Err(unresolvable()),
            _ => path.push(segment),
        }
    }
    Ok(path)
}

/// What happened to one link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Materialized {
    /// Downloaded and written.
    Written { path: PathBuf, size: u64 },
    /// Already present and left alone.
    Existing { path: PathBuf },
}

/// Totals for a [`Mirror::materialize_all`] run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MirrorReport {
    pub written: Vec<PathBuf>,
    pub existing: Vec<PathBuf>,
    /// Links under no mirrorable base.
    pub unresolvable: Vec<String>,
    /// Links naming a directory rather than a file.
    pub directories: Vec<String>,
    /// Links whose download failed, with the reason.
    pub failed: Vec<(String, String)>,
    pub bytes: u64,
}

impl MirrorReport {
    /// True when every mirrorable link ended up on disk.
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Writes download links into a local repository tree.
pub struct Mirror<'a> {
    transport: &'a dyn Transport,
    repositories: &'a RepositoryBases,
    reporter: &'a dyn Reporter,
    root: PathBuf,
    skip_existing: bool,
    jobs: usize,
}

impl std::fmt::Debug for Mirror<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Mirror")
            .field("root", &self.root)
            .field("skip_existing", &self.skip_existing)
            .field("jobs", &self.jobs)
            .finish_non_exhaustive()
    }
}

impl<'a> Mirror<'a> {
    pub fn new(
        transport: &'a dyn Transport,
        config: &'a MirrorConfig,
        root: impl Into<PathBuf>,
        reporter: &'a dyn Reporter,
    ) -> Self {
        Self {
            transport,
            repositories: &config.repositories,
            reporter,
            root: root.into(),
            skip_existing: config.skip_existing,
            jobs: config.jobs.max(1),
        }
    }

    /// Where `link` lands under this mirror's root.
    ///
    /// # Errors
    ///
    /// See [`local_path`].
    pub fn local_path(&self, link: &str) -> Result<PathBuf, ResolveError> {
        local_path(self.repositories, &self.root, link)
    }

    /// Download one link into the mirror.
    ///
    /// A failure part-way through leaves whatever was written in place.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::UnresolvableDownloadLink`] or
    /// [`ResolveError::DirectoryLink`] for links with no local path,
    /// [`ResolveError::Transport`] if the download fails, and
    /// [`ResolveError::Io`] if the file cannot be written.
    pub async fn materialize(&self, link: &str) -> Result<Materialized, ResolveError> {
        let path = self.local_path(link)?;

        if self.skip_existing && tokio::fs::try_exists(&path).await? {
            tracing::debug!("Keeping existing {}", path.display());
            self.reporter.skipped(link, "already mirrored");
            return Ok(Materialized::Existing { path });
        }

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let total = self.transport.content_length(link).await;
        self.reporter.downloading(link, 0, total);

        let mut stream = self.transport.fetch_stream(link).await?;
        let mut file = File::create(&path).await?;
        let mut written: u64 = 0;

        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            file.write_all(&chunk).await?;
            written += chunk.len() as u64;
            self.reporter.downloading(link, written, total);
        }

        file.flush().await?;
        tracing::debug!("Wrote {} ({written} bytes)", path.display());
        self.reporter.done(link, &path, written);

        Ok(Materialized::Written {
            path,
            size: written,
        })
    }

    /// Materialize every link, `jobs` at a time. Failures are recorded and
    /// never stop the remaining downloads.
    pub async fn materialize_all<I>(&self, links: I) -> MirrorReport
    where
        I: IntoIterator<Item = String>,
    {
        let results: Vec<_> = futures::stream::iter(links)
            .map(|link| async move {
                let result = self.materialize(&link).await;
                (link, result)
            })
            .buffer_unordered(self.jobs)
            .collect()
            .await;

        let mut report = MirrorReport::default();
        for (link, result) in results {
            match result {
                Ok(Materialized::Written { path, size }) => {
                    report.bytes += size;
                    report.written.push(path);
                }
                Ok(Materialized::Existing { path }) => report.existing.push(path),
                Err(ResolveError::UnresolvableDownloadLink(_)) => {
                    self.reporter.skipped(&link, "no known repository prefix");
                    report.unresolvable.push(link);
                }
                Err(ResolveError::DirectoryLink(_)) => {
                    self.reporter.skipped(&link, "directory, not a file");
                    report.directories.push(link);
                }
                Err(e) => {
                    tracing::warn!("Failed to mirror {link}: {e}");
                    self.reporter.failed(&link, &e.to_string());
                    report.failed.push((link, e.to_string()));
                }
            }
        }
        report.written.sort();
        report.existing.sort();
        report.unresolvable.sort();
        report.directories.sort();
        report.failed.sort();
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::transport::memory::MemoryTransport;
    use crate::reporter::NullReporter;

    const PRIMARY_JAR: &str = "https://repo1.maven.org/maven2/com/google/dagger/dagger/2.50/dagger-2.50.jar";
    const SECONDARY_POM: &str =
        "https://dl.google.com/dl/android/maven2/androidx/core/core/1.12.0/core-1.12.0.pom";

    #[test]
    fn test_local_path_strips_known_bases() {
        let repos = RepositoryBases::default();
        let root = Path::new("/mirror");

        assert_eq!(
            local_path(&repos, root, PRIMARY_JAR).unwrap(),
            PathBuf::from("/mirror/com/google/dagger/dagger/2.50/dagger-2.50.jar")
        );
        assert_eq!(
            local_path(&repos, root, SECONDARY_POM).unwrap(),
            PathBuf::from("/mirror/androidx/core/core/1.12.0/core-1.12.0.pom")
        );
        assert_eq!(
            local_path(
                &repos,
                root,
                "https://maven.google.com/androidx/core/core/1.12.0/core-1.12.0.aar"
            )
            .unwrap(),
            PathBuf::from("/mirror/androidx/core/core/1.12.0/core-1.12.0.aar")
        );
    }

    #[test]
    fn test_local_path_rejects_unmirrorable_links() {
        let repos = RepositoryBases::default();
        let root = Path::new("/mirror");

        for link in [
            "https://example.com/stray.jar",
            "https://mvnrepository.com/artifact/androidx.core/core/1.12.0",
            "https://repo1.maven.org/maven2/com/../../etc/passwd",
            "https://repo1.maven.org/maven2/com//x.jar",
        ] {
            assert!(
                matches!(
                    local_path(&repos, root, link),
                    Err(ResolveError::UnresolvableDownloadLink(_))
                ),
                "{link} should be unresolvable"
            );
        }
    }

    #[test]
    fn test_local_path_rejects_directory_links() {
        let repos = RepositoryBases::default();
        let root = Path::new("/mirror");

        for link in [
            "https://repo1.maven.org/maven2",
            "https://repo1.maven.org/maven2/",
            "https://repo1.maven.org/maven2/com/google/dagger/",
        ] {
            let err = local_path(&repos, root, link).unwrap_err();
            assert!(
                matches!(err, ResolveError::DirectoryLink(_)),
                "{link} should be a directory link"
            );
            assert!(!err.to_string().contains("no known repository"));
        }
    }

    #[tokio::test]
    async fn test_materialize_writes_file() {
        let tmp = tempfile::tempdir().unwrap();
        let transport = MemoryTransport::new().with_page(PRIMARY_JAR, "jar bytes");
        let config = MirrorConfig::default();
        let mirror = Mirror::new(&transport, &config, tmp.path(), &NullReporter);

        let outcome = mirror.materialize(PRIMARY_JAR).await.unwrap();

        let expected = tmp
            .path()
            .join("com/google/dagger/dagger/2.50/dagger-2.50.jar");
        assert_eq!(
            outcome,
            Materialized::Written {
                path: expected.clone(),
                size: 9
            }
        );
        assert_eq!(std::fs::read_to_string(expected).unwrap(), "jar bytes");
    }

    #[tokio::test]
    async fn test_skip_existing_leaves_file_alone() {
        let tmp = tempfile::tempdir().unwrap();
        let transport = MemoryTransport::new().with_page(PRIMARY_JAR, "new");
        let config = MirrorConfig {
            skip_existing: true,
            ..MirrorConfig::default()
        };
        let mirror = Mirror::new(&transport, &config, tmp.path(), &NullReporter);
        let path = mirror.local_path(PRIMARY_JAR).unwrap();
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "old").unwrap();

        let outcome = mirror.materialize(PRIMARY_JAR).await.unwrap();

        assert_eq!(outcome, Materialized::Existing { path: path.clone() });
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "old");
        assert_eq!(transport.hits(PRIMARY_JAR), 0);
    }

    #[tokio::test]
    async fn test_materialize_all_continues_past_failures() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = "https://repo1.maven.org/maven2/com/google/dagger/dagger/2.50/dagger-2.50-sources.jar";
        let stray = "https://example.com/stray.jar";
        let listing = "https://repo1.maven.org/maven2/com/google/dagger/";
        let transport = MemoryTransport::new()
            .with_page(PRIMARY_JAR, "jar")
            .with_page(SECONDARY_POM, "<project/>");
        let config = MirrorConfig {
            jobs: 2,
            ..MirrorConfig::default()
        };
        let mirror = Mirror::new(&transport, &config, tmp.path(), &NullReporter);

        let report = mirror
            .materialize_all([
                PRIMARY_JAR.to_string(),
                SECONDARY_POM.to_string(),
                missing.to_string(),
                stray.to_string(),
                listing.to_string(),
            ])
            .await;

        assert_eq!(report.written.len(), 2);
        assert_eq!(report.bytes, 3 + 10);
        assert_eq!(report.unresolvable, vec![stray.to_string()]);
        assert_eq!(report.directories, vec![listing.to_string()]);
        assert_eq!(transport.hits(listing), 0);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].0, missing);
        assert!(!report.is_complete());
        assert!(
            tmp.path()
                .join("androidx/core/core/1.12.0/core-1.12.0.pom")
                .is_file()
        );
    }
}
