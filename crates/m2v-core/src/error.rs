//! Error kinds shared by the resolvers and the materializer.

use thiserror::Error;

/// A failed HTTP exchange.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status} from {url}")]
    Status { url: String, status: u16 },
}

/// Outcome of a best-effort fetch.
///
/// A non-success response and a network failure are both soft failures for
/// the resolvers, but they are kept apart so callers can tell an absent
/// artifact from an unreachable host.
#[derive(Debug)]
pub enum Fetch<T> {
    /// The request succeeded.
    Fetched(T),
    /// The server answered with a non-success status.
    Absent { status: u16 },
    /// The request never completed.
    Failed(TransportError),
}

impl<T> Fetch<T> {
    /// Short human-readable reason for a missing value.
    pub fn failure_reason(&self) -> Option<String> {
        match self {
            Self::Fetched(_) => None,
            Self::Absent { status } => Some(format!("HTTP {status}")),
            Self::Failed(e) => Some(e.to_string()),
        }
    }
}

/// Errors surfaced by a single resolution or materialization step.
///
/// None of these abort a run; the engine and the mirror report them and move
/// on to the next item.
#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("Transport failure: {0}")]
    Transport(#[from] TransportError),

    #[error("Malformed descriptor {reference}: {reason}")]
    MalformedDescriptor { reference: String, reason: String },

    #[error("No known repository prefix matches {0}")]
    UnresolvableDownloadLink(String),

    #[error("{0} names a directory, not a file")]
    DirectoryLink(String),

    #[error("Unsupported entry point {0}: expected a catalog page, repository directory or .pom")]
    UnsupportedEntry(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ResolveError {
    /// Build a [`ResolveError::MalformedDescriptor`].
    pub fn malformed(reference: impl std::fmt::Display, reason: impl std::fmt::Display) -> Self {
        Self::MalformedDescriptor {
            reference: reference.to_string(),
            reason: reason.to_string(),
        }
    }
}
