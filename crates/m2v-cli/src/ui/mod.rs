//! Terminal output.
//!
//! - [`theme`] - Colors, icons, and size formatting
//! - [`output`] - The console [`Reporter`](m2v_core::Reporter)
//! - [`progress`] - Download progress steps

pub mod output;
pub mod progress;
pub mod theme;

pub use output::Output;
pub use theme::Theme;
