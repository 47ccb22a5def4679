//! Flat-layout directory listings.
//!
//! Every entry of a listing is a download link. Descriptor entries also join
//! the frontier, and their enclosing directory is listed in turn so sibling
//! descriptors (classifier, sources, javadoc variants) are found without a
//! separate seed. Directories are walked from an explicit worklist and each
//! is listed at most once per run.

use std::collections::VecDeque;

use m2v_schema::{DescriptorRef, classify, parent_directory};

use super::{Context, ResolutionState};
use crate::error::Fetch;

/// What one call to [`resolve_directory`] touched.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DirectoryWalk {
    /// Directories fetched and listed, in walk order.
    pub listed: Vec<String>,
    /// Directories that could not be fetched, with the reason.
    pub unreachable: Vec<(String, String)>,
}

/// List `directory` and every descriptor directory reachable from it.
///
/// Directories already in the visited set are skipped. A directory that
/// cannot be fetched contributes nothing; the walk carries on.
pub async fn resolve_directory(
    ctx: Context<'_>,
    state: &mut ResolutionState,
    directory: &str,
) -> DirectoryWalk {
    let mut walk = DirectoryWalk::default();
    let mut pending = VecDeque::from([directory.trim_end_matches('/').to_string()]);

    while let Some(dir) = pending.pop_front() {
        if !state.mark_visited(&dir) {
            tracing::trace!("Skipping {dir} (already listed)");
            continue;
        }

        let listing = match ctx.transport.fetch_text(&dir).await {
            Fetch::Fetched(text) => text,
            other => {
                let reason = other.failure_reason().unwrap_or_default();
                ctx.reporter.fetch_failed(&dir, &reason);
                walk.unreachable.push((dir, reason));
                continue;
            }
        };

        let mut found = 0usize;
        for hyperlink in crate::markup::parse_hyperlinks(&listing) {
            let Some(link) = classify(&hyperlink.href, &dir) else {
                continue;
            };

            if link.is_descriptor() {
                if let Some(parent) = parent_directory(&link.url) {
                    if !state.is_visited(parent) && !pending.iter().any(|p| p == parent) {
                        tracing::debug!("Following {} to {parent}", link.url);
                        pending.push_back(parent.to_string());
                    }
                }
            }

            if state.collect(&link.url) {
                ctx.reporter
                    .discovered(&DescriptorRef::Remote(link.url.clone()));
            }
            found += 1;
        }

        tracing::debug!("Listed {dir}: {found} links");
        walk.listed.push(dir);
    }

    walk
}
