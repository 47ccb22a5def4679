//! Catalog pages: one browsable page per artifact version.
//!
//! Only the page's download buttons are read. Links into the secondary store
//! are rewritten to its direct-download prefix and collected as-is; the
//! secondary store has no browsable listing, so its descriptors go straight
//! to the frontier. A descriptor button pointing anywhere else hands its
//! enclosing directory to the directory resolver.

use m2v_schema::{DescriptorRef, is_absolute_url, is_descriptor, parent_directory};

use super::directory::resolve_directory;
use super::{Context, ResolutionState};
use crate::error::Fetch;
use crate::markup::parse_hyperlinks;

/// What one catalog page contributed.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CatalogScan {
    /// Why the page could not be read, if it could not.
    pub failure: Option<String>,
    /// Secondary-store links after rewriting.
    pub secondary: Vec<String>,
    /// Directories handed to the directory resolver.
    pub directories: Vec<String>,
    /// Download buttons that carried nothing actionable.
    pub ignored: usize,
}

/// Read the download links of a catalog page into the run state.
pub async fn resolve_catalog(
    ctx: Context<'_>,
    state: &mut ResolutionState,
    catalog_url: &str,
) -> CatalogScan {
    let mut scan = CatalogScan::default();

    let page = match ctx.transport.fetch_text(catalog_url).await {
        Fetch::Fetched(text) => text,
        other => {
            let reason = other.failure_reason().unwrap_or_default();
            ctx.reporter.fetch_failed(catalog_url, &reason);
            scan.failure = Some(reason);
            return scan;
        }
    };

    let class = ctx.routing.download_link_class.as_str();
    for link in parse_hyperlinks(&page)
        .into_iter()
        .filter(|l| l.has_class(class))
    {
        let href = link.href.as_str();
        if !is_absolute_url(href) {
            scan.ignored += 1;
            continue;
        }

        if let Some(rewritten) = ctx.repositories.rewrite_secondary(href) {
            tracing::debug!("Rewrote {href} -> {rewritten}");
            if state.collect(&rewritten) {
                ctx.reporter
                    .discovered(&DescriptorRef::Remote(rewritten.clone()));
            }
            scan.secondary.push(rewritten);
        } else if is_descriptor(href) {
            let Some(dir) = parent_directory(href) else {
                scan.ignored += 1;
                continue;
            };
            if state.is_visited(dir) {
                tracing::trace!("Skipping {dir} (already listed)");
                continue;
            }
            resolve_directory(ctx, state, dir).await;
            scan.directories.push(dir.to_string());
        } else {
            scan.ignored += 1;
        }
    }

    scan
}
