//! Download progress for line-oriented output.
//!
//! Several downloads run at once, so progress is printed as separate lines
//! rather than redrawn in place. A line is due whenever a download crosses
//! into a new step: a quarter of the file when its size is known, otherwise
//! every mebibyte.

use super::theme::format_size;

const UNSIZED_STEP: u64 = 1024 * 1024;

/// Which progress step `current` bytes falls in.
pub fn progress_step(current: u64, total: Option<u64>) -> u64 {
    match total.filter(|&t| t > 0) {
        Some(t) => (current.saturating_mul(4) / t).min(4),
        None => current / UNSIZED_STEP,
    }
}

/// `1.0 MB / 4.0 MB (25%)`, or just the byte count when the size is unknown.
pub fn format_progress(current: u64, total: Option<u64>) -> String {
    match total.filter(|&t| t > 0) {
        Some(t) => format!(
            "{} / {} ({}%)",
            format_size(current),
            format_size(t),
            (current.saturating_mul(100) / t).min(100)
        ),
        None => format_size(current),
    }
}
