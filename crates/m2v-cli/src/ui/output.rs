//! Console output for resolution and mirroring runs.
//!
//! Every event becomes at most one styled line. Discovery and routing lines
//! only appear in verbose mode; the rest always do. Each download prints a
//! start line with its size and a progress line per step it crosses.

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};

use crossterm::style::Stylize;
use m2v_core::Reporter;
use m2v_core::resolve::Route;
use m2v_schema::{DescriptorRef, Dependency};

use super::progress::{format_progress, progress_step};
use super::theme::{Theme, format_size};

/// Line-oriented console reporter.
#[derive(Debug, Clone, Default)]
pub struct Output {
    theme: Theme,
    verbose: bool,
    /// Last progress step printed, per in-flight link.
    progress: Arc<Mutex<HashMap<String, u64>>>,
}

impl Output {
    pub fn new(verbose: bool) -> Self {
        Self {
            theme: Theme::default(),
            verbose,
            progress: Arc::default(),
        }
    }

    /// Record `step` for `link`; true when it is further than the last one
    /// printed.
    fn advance(&self, link: &str, step: u64) -> bool {
        let Ok(mut steps) = self.progress.lock() else {
            return false;
        };
        let last = steps.entry(link.to_string()).or_insert(0);
        if step > *last {
            *last = step;
            true
        } else {
            false
        }
    }

    /// Print a titled list, or `(none)` when empty.
    pub fn list<I, T>(&self, title: &str, items: I)
    where
        I: IntoIterator<Item = T>,
        T: std::fmt::Display,
    {
        let items: Vec<String> = items.into_iter().map(|item| format!("{item}")).collect();
        println!(
            "{} {}",
            title.bold(),
            format!("({})", items.len()).with(self.theme.colors.secondary)
        );
        if items.is_empty() {
            println!("  {}", "(none)".with(self.theme.colors.secondary));
        }
        for item in items {
            println!("  {}", item.with(self.theme.colors.link));
        }
    }

    fn detail(&self, icon: &str, subject: &str, note: &str) -> String {
        if note.is_empty() {
            format!("  {icon} {}", subject.with(self.theme.colors.link))
        } else {
            format!(
                "  {icon} {} {}",
                subject.with(self.theme.colors.link),
                note.with(self.theme.colors.secondary)
            )
        }
    }
}

impl Reporter for Output {
    fn section(&self, title: &str) {
        println!();
        println!(
            "{} {}",
            title.bold(),
            "─".repeat(40).with(self.theme.colors.header)
        );
    }

    fn fetch_failed(&self, url: &str, reason: &str) {
        let icon = self.theme.icons.warning.with(self.theme.colors.warning);
        println!("{}", self.detail(&icon.to_string(), url, &format!("({reason})")));
    }

    fn discovered(&self, descriptor: &DescriptorRef) {
        if self.verbose {
            let icon = self.theme.icons.pending.with(self.theme.colors.secondary);
            println!("{}", self.detail(&icon.to_string(), &descriptor.to_string(), "queued"));
        }
    }

    fn processing(&self, descriptor: &DescriptorRef) {
        let icon = self.theme.icons.active.with(self.theme.colors.link);
        println!("{}", self.detail(&icon.to_string(), &descriptor.to_string(), ""));
    }

    fn routed(&self, dependency: &Dependency, route: &Route) {
        if self.verbose {
            println!(
                "      {} {} {}",
                self.theme.icons.route.with(self.theme.colors.secondary),
                dependency.to_string().with(self.theme.colors.path),
                route.to_string().with(self.theme.colors.secondary)
            );
        }
    }

    fn downloading(&self, link: &str, current: u64, total: Option<u64>) {
        if current == 0 {
            if let Ok(mut steps) = self.progress.lock() {
                steps.insert(link.to_string(), 0);
            }
            let size = total.map_or_else(|| "size unknown".to_string(), format_size);
            let icon = self.theme.icons.pending.with(self.theme.colors.secondary);
            println!("{}", self.detail(&icon.to_string(), link, &size));
            return;
        }

        // The finished file gets its own line from `done`.
        if total.is_some_and(|t| current >= t) {
            return;
        }
        if self.advance(link, progress_step(current, total)) {
            let icon = self.theme.icons.active.with(self.theme.colors.link);
            println!(
                "{}",
                self.detail(&icon.to_string(), link, &format_progress(current, total))
            );
        }
    }

    fn done(&self, link: &str, dest: &Path, size: u64) {
        if let Ok(mut steps) = self.progress.lock() {
            steps.remove(link);
        }
        println!(
            "  {} {} {}",
            self.theme.icons.success.with(self.theme.colors.success),
            dest.display().to_string().with(self.theme.colors.path),
            format_size(size).with(self.theme.colors.secondary)
        );
    }

    fn skipped(&self, link: &str, reason: &str) {
        println!("{}", self.detail("-", link, &format!("({reason})")));
    }

    fn failed(&self, link: &str, reason: &str) {
        if let Ok(mut steps) = self.progress.lock() {
            steps.remove(link);
        }
        let icon = self.theme.icons.error.with(self.theme.colors.error);
        println!(
            "  {icon} {} {}",
            link.with(self.theme.colors.link),
            reason.with(self.theme.colors.error)
        );
    }

    fn info(&self, msg: &str) {
        println!("  {} {}", self.theme.icons.info, msg);
    }

    fn warning(&self, msg: &str) {
        eprintln!(
            "{} {}",
            self.theme.icons.warning.with(self.theme.colors.warning),
            msg.with(self.theme.colors.warning)
        );
    }

    fn summary(&self, count: usize, action: &str, elapsed_secs: f64) {
        let msg = format!(
            "{} file{} {} in {:.1}s",
            count,
            if count == 1 { "" } else { "s" },
            action,
            elapsed_secs
        );
        println!();
        println!(
            "{} {}",
            self.theme.icons.success.with(self.theme.colors.success),
            msg.with(self.theme.colors.success)
        );
    }
}
