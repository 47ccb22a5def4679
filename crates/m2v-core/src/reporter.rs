//! Reporter trait for dependency injection
//!
//! This trait allows the resolvers and the mirror to report progress and
//! decisions without being coupled to a specific console implementation.

use std::path::Path;

use m2v_schema::{DescriptorRef, Dependency};

use crate::resolve::Route;

pub trait Reporter: Send + Sync {
    /// Indicates a new phase has started (e.g. "Resolving", "Mirroring").
    fn section(&self, title: &str);

    /// A best-effort fetch came back empty.
    fn fetch_failed(&self, url: &str, reason: &str);

    /// A descriptor entered the frontier.
    fn discovered(&self, descriptor: &DescriptorRef);

    /// A descriptor was taken off the frontier for processing.
    fn processing(&self, descriptor: &DescriptorRef);

    /// A declared dependency was routed to one of the resolvers.
    fn routed(&self, dependency: &Dependency, route: &Route);

    /// Updates the progress of a download.
    fn downloading(&self, link: &str, current: u64, total: Option<u64>);

    /// Marks a download as written to disk.
    fn done(&self, link: &str, dest: &Path, size: u64);

    /// Marks a link as skipped (unresolvable or already mirrored).
    fn skipped(&self, link: &str, reason: &str);

    /// Marks a download as failed with a specific reason.
    fn failed(&self, link: &str, reason: &str);

    /// Log an informational message.
    fn info(&self, msg: &str);

    /// Log a warning message.
    fn warning(&self, msg: &str);

    /// Display a final summary of multiple operations.
    fn summary(&self, count: usize, action: &str, elapsed_secs: f64);
}

impl<T: Reporter + ?Sized> Reporter for std::sync::Arc<T> {
    fn section(&self, title: &str) {
        (**self).section(title);
    }
    fn fetch_failed(&self, url: &str, reason: &str) {
        (**self).fetch_failed(url, reason);
    }
    fn discovered(&self, descriptor: &DescriptorRef) {
        (**self).discovered(descriptor);
    }
    fn processing(&self, descriptor: &DescriptorRef) {
        (**self).processing(descriptor);
    }
    fn routed(&self, dependency: &Dependency, route: &Route) {
        (**self).routed(dependency, route);
    }
    fn downloading(&self, link: &str, current: u64, total: Option<u64>) {
        (**self).downloading(link, current, total);
    }
    fn done(&self, link: &str, dest: &Path, size: u64) {
        (**self).done(link, dest, size);
    }
    fn skipped(&self, link: &str, reason: &str) {
        (**self).skipped(link, reason);
    }
    fn failed(&self, link: &str, reason: &str) {
        (**self).failed(link, reason);
    }
    fn info(&self, msg: &str) {
        (**self).info(msg);
    }
    fn warning(&self, msg: &str) {
        (**self).warning(msg);
    }
    fn summary(&self, count: usize, action: &str, elapsed_secs: f64) {
        (**self).summary(count, action, elapsed_secs);
    }
}

/// A no-op reporter for silent operations (e.g., testing).
#[derive(Debug, Clone, Copy)]
pub struct NullReporter;

impl Reporter for NullReporter {
    fn section(&self, _: &str) {}
    fn fetch_failed(&self, _: &str, _: &str) {}
    fn discovered(&self, _: &DescriptorRef) {}
    fn processing(&self, _: &DescriptorRef) {}
    fn routed(&self, _: &Dependency, _: &Route) {}
    fn downloading(&self, _: &str, _: u64, _: Option<u64>) {}
    fn done(&self, _: &str, _: &Path, _: u64) {}
    fn skipped(&self, _: &str, _: &str) {}
    fn failed(&self, _: &str, _: &str) {}
    fn info(&self, _: &str) {}
    fn warning(&self, _: &str) {}
    fn summary(&self, _: usize, _: &str, _: f64) {}
}
