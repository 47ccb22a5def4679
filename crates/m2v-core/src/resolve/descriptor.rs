//! Descriptor processing: read one descriptor and route its dependencies.

use m2v_schema::DescriptorRef;

use super::catalog::resolve_catalog;
use super::directory::resolve_directory;
use super::{Context, ResolutionState, Route};
use crate::error::{Fetch, ResolveError};
use crate::markup::parse_descriptor;

/// Result of a single [`process_descriptor`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessOutcome {
    /// The descriptor was processed earlier in this run.
    AlreadyProcessed,
    /// The descriptor could not be fetched; its subtree is not explored.
    Unreachable { reason: String },
    /// Dependencies were read and routed.
    Processed {
        /// The project's own version, used for substitution.
        version: String,
        /// One route per complete dependency, in declaration order.
        routes: Vec<Route>,
    },
}

/// Process a descriptor at most once per run.
///
/// The descriptor is marked processed before anything is fetched, so a
/// failure here is never retried later in the same run.
///
/// # Errors
///
/// Returns [`ResolveError::MalformedDescriptor`] if the content is not a
/// descriptor with a version, and [`ResolveError::Io`] if a local descriptor
/// cannot be read. Either way the run can continue with the next descriptor.
pub async fn process_descriptor(
    ctx: Context<'_>,
    state: &mut ResolutionState,
    descriptor: &DescriptorRef,
) -> Result<ProcessOutcome, ResolveError> {
    if !state.mark_processed(descriptor) {
        tracing::debug!("Already processed: {descriptor}");
        return Ok(ProcessOutcome::AlreadyProcessed);
    }
    ctx.reporter.processing(descriptor);

    let content = match descriptor {
        DescriptorRef::Remote(url) => match ctx.transport.fetch_text(url).await {
            Fetch::Fetched(text) => text,
            other => {
                let reason = other.failure_reason().unwrap_or_default();
                ctx.reporter.fetch_failed(url, &reason);
                return Ok(ProcessOutcome::Unreachable { reason });
            }
        },
        DescriptorRef::Local(path) => tokio::fs::read_to_string(path).await?,
    };

    let project =
        parse_descriptor(&content).map_err(|e| ResolveError::malformed(descriptor, e))?;
    tracing::debug!(
        "{descriptor}: {} with {} dependencies",
        project.coordinates(),
        project.dependencies.len()
    );

    for partial in &project.incomplete {
        ctx.reporter
            .warning(&format!("{descriptor}: skipping incomplete dependency {partial}"));
    }

    let mut routes = Vec::with_capacity(project.dependencies.len());
    for dependency in project.dependencies {
        let dependency = dependency.with_project_version(&project.version);
        let route = Route::for_dependency(&dependency, ctx.repositories, ctx.routing);
        ctx.reporter.routed(&dependency, &route);

        match &route {
            Route::Catalog(url) => {
                resolve_catalog(ctx, state, url).await;
            }
            Route::Directory(url) => {
                resolve_directory(ctx, state, url).await;
            }
        }
        routes.push(route);
    }

    Ok(ProcessOutcome::Processed {
        version: project.version,
        routes,
    })
}
