//! Frontier-driven resolution of a descriptor graph.
//!
//! All state for one run lives in [`ResolutionState`], owned by the
//! [`Resolver`] and lent to the directory, catalog and descriptor steps.
//! The four sets only ever grow, except that the frontier gives up the
//! descriptor being processed.

pub mod catalog;
pub mod descriptor;
pub mod directory;
pub mod engine;

use std::collections::BTreeSet;
use std::fmt;

use m2v_schema::{DescriptorRef, Dependency, RepositoryBases, is_absolute_url, is_descriptor};

use crate::config::RoutingRules;
use crate::error::ResolveError;
use crate::io::transport::Transport;
use crate::reporter::Reporter;

pub use catalog::{CatalogScan, resolve_catalog};
pub use descriptor::{ProcessOutcome, process_descriptor};
pub use directory::{DirectoryWalk, resolve_directory};
pub use engine::Resolver;

/// Collaborators shared by every resolution step.
#[derive(Clone, Copy)]
pub struct Context<'a> {
    pub transport: &'a dyn Transport,
    pub repositories: &'a RepositoryBases,
    pub routing: &'a RoutingRules,
    pub reporter: &'a dyn Reporter,
}

impl fmt::Debug for Context<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("repositories", &self.repositories)
            .field("routing", &self.routing)
            .finish_non_exhaustive()
    }
}

/// Mutable state of one resolution run.
#[derive(Debug, Default)]
pub struct ResolutionState {
    frontier: BTreeSet<DescriptorRef>,
    processed: BTreeSet<DescriptorRef>,
    visited: BTreeSet<String>,
    downloads: BTreeSet<String>,
}

impl ResolutionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a descriptor unless it has already been processed.
    ///
    /// Returns true if the frontier grew.
    pub fn enqueue(&mut self, descriptor: DescriptorRef) -> bool {
        if self.processed.contains(&descriptor) {
            return false;
        }
        self.frontier.insert(descriptor)
    }

    /// Take the next descriptor off the frontier.
    pub fn next_descriptor(&mut self) -> Option<DescriptorRef> {
        self.frontier.pop_first()
    }

    /// Record a descriptor as processed. Returns false if it already was.
    pub fn mark_processed(&mut self, descriptor: &DescriptorRef) -> bool {
        self.frontier.remove(descriptor);
        self.processed.insert(descriptor.clone())
    }

    pub fn is_processed(&self, descriptor: &DescriptorRef) -> bool {
        self.processed.contains(descriptor)
    }

    /// Record a directory as listed. Returns false if it already was.
    pub fn mark_visited(&mut self, directory: &str) -> bool {
        self.visited.insert(directory.to_string())
    }

    pub fn is_visited(&self, directory: &str) -> bool {
        self.visited.contains(directory)
    }

    /// Add a link to the download set; descriptor links also join the frontier.
    ///
    /// Returns true if a descriptor newly joined the frontier.
    pub fn collect(&mut self, link: &str) -> bool {
        self.downloads.insert(link.to_string());
        is_descriptor(link) && self.enqueue(DescriptorRef::Remote(link.to_string()))
    }

    pub fn frontier(&self) -> &BTreeSet<DescriptorRef> {
        &self.frontier
    }

    pub fn processed(&self) -> &BTreeSet<DescriptorRef> {
        &self.processed
    }

    pub fn visited(&self) -> &BTreeSet<String> {
        &self.visited
    }

    pub fn downloads(&self) -> &BTreeSet<String> {
        &self.downloads
    }

    pub fn finish(self) -> Resolution {
        Resolution {
            processed: self.processed,
            frontier: self.frontier,
            visited: self.visited,
            downloads: self.downloads,
        }
    }
}

/// Final sets of a completed run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    pub processed: BTreeSet<DescriptorRef>,
    /// Empty after a completed drain.
    pub frontier: BTreeSet<DescriptorRef>,
    pub visited: BTreeSet<String>,
    pub downloads: BTreeSet<String>,
}

/// Which resolver a dependency is sent to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Catalog(String),
    Directory(String),
}

impl Route {
    /// Pick the resolver for `dep` by its group identifier.
    pub fn for_dependency(
        dep: &Dependency,
        repositories: &RepositoryBases,
        routing: &RoutingRules,
    ) -> Self {
        if routing.routes_to_catalog(dep) {
            Self::Catalog(repositories.catalog_url(dep))
        } else {
            Self::Directory(repositories.directory_url(dep))
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Catalog(url) => write!(f, "catalog {url}"),
            Self::Directory(url) => write!(f, "directory {url}"),
        }
    }
}

/// Where a run starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryPoint {
    /// A catalog page for one artifact version.
    Catalog(String),
    /// A flat-layout directory in the primary repository.
    Directory(String),
    /// A single descriptor, remote or on disk.
    Descriptor(DescriptorRef),
}

impl EntryPoint {
    /// Classify a user-supplied location against the known bases.
    ///
    /// Anything that is not an http(s) URL is taken as a local descriptor
    /// file.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::UnsupportedEntry`] for a location that is
    /// neither a descriptor nor under the catalog or primary base.
    pub fn parse(location: &str, repositories: &RepositoryBases) -> Result<Self, ResolveError> {
        let location = location.trim();
        if is_descriptor(location) || !is_absolute_url(location) {
            return Ok(Self::Descriptor(DescriptorRef::parse(location)));
        }
        let trimmed = location.trim_end_matches('/');
        if repositories.is_catalog(trimmed) {
            Ok(Self::Catalog(trimmed.to_string()))
        } else if repositories.is_primary(trimmed) {
            Ok(Self::Directory(trimmed.to_string()))
        } else {
            Err(ResolveError::UnsupportedEntry(location.to_string()))
        }
    }
}
