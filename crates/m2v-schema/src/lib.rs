//! Shared value types for m2v.
//!
//! Everything here is pure: coordinates read from descriptors, the four
//! repository bases and the conversions between their addressing schemes,
//! and the link classifier used when walking listings and catalog pages.

pub mod dependency;
pub mod link;
pub mod location;

// Re-exports
pub use dependency::*;
pub use link::*;
pub use location::*;
