//! Progress reporting for exports
//!
//! The coordinator reports against the [`ProgressTracker`] trait:
//! - `CliProgress`: indicatif bars, one overall bar for authors and one
//!   child bar per author for its entries
//! - `SilentProgress`: counts only, for tests and `export --quiet`

use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

/// Core trait for progress tracking
///
/// Implementations must be thread-safe: author pipelines report concurrently.
pub trait ProgressTracker: Send + Sync {
    /// Set the current status message
    fn set_message(&self, message: &str);

    /// Set the total once it is known
    fn set_length(&self, length: u64);

    /// Increment progress by the given amount
    fn increment(&self, amount: u64);

    /// Get current position
    fn position(&self) -> u64;

    /// Finish progress successfully with a message
    fn finish_with_message(&self, message: &str);

    /// Finish progress with an error/abandonment message
    fn finish_with_error(&self, message: &str);

    /// Check if progress is finished
    fn is_finished(&self) -> bool;

    /// Create a child tracker for a nested operation
    fn child(&self, message: &str, length: u64) -> Box<dyn ProgressTracker>;
}

/// Silent progress tracker (no-op apart from counting)
#[derive(Debug, Default)]
pub struct SilentProgress {
    length: AtomicU64,
    position: AtomicU64,
    finished: AtomicBool,
}

impl SilentProgress {
    /// Create a new silent progress tracker
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProgressTracker for SilentProgress {
    fn set_message(&self, _message: &str) {}

    fn set_length(&self, length: u64) {
        self.length.store(length, Ordering::Relaxed);
    }

    fn increment(&self, amount: u64) {
        self.position.fetch_add(amount, Ordering::Relaxed);
    }

    fn position(&self) -> u64 {
        self.position.load(Ordering::Relaxed)
    }

    fn finish_with_message(&self, _message: &str) {
        self.finished.store(true, Ordering::Relaxed);
    }

    fn finish_with_error(&self, _message: &str) {
        self.finished.store(true, Ordering::Relaxed);
    }

    fn is_finished(&self) -> bool {
        self.finished.load(Ordering::Relaxed)
    }

    fn child(&self, _message: &str, _length: u64) -> Box<dyn ProgressTracker> {
        Box::new(SilentProgress::new())
    }
}

/// Terminal progress bars
pub struct CliProgress {
    multi: MultiProgress,
    bar: ProgressBar,
}

impl CliProgress {
    /// Create the top-level bar
    pub fn new(message: &str, length: u64) -> Self {
        let multi = MultiProgress::new();
        let bar = multi.add(ProgressBar::new(length));
        bar.set_style(bar_style("{msg} ({pos}/{len}) [{bar:40.green/dim}] {percent}%"));
        bar.set_message(message.to_string());
        Self { multi, bar }
    }
}

fn bar_style(template: &str) -> ProgressStyle {
    ProgressStyle::default_bar()
        .template(template)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("##-")
}

impl ProgressTracker for CliProgress {
    fn set_message(&self, message: &str) {
        self.bar.set_message(message.to_string());
    }

    fn set_length(&self, length: u64) {
        self.bar.set_length(length);
    }

    fn increment(&self, amount: u64) {
        self.bar.inc(amount);
    }

    fn position(&self) -> u64 {
        self.bar.position()
    }

    fn finish_with_message(&self, message: &str) {
        self.bar.finish_with_message(message.to_string());
    }

    fn finish_with_error(&self, message: &str) {
        self.bar.abandon_with_message(format!("FAILED: {message}"));
    }

    fn is_finished(&self) -> bool {
        self.bar.is_finished()
    }

    fn child(&self, message: &str, length: u64) -> Box<dyn ProgressTracker> {
        let bar = self.multi.add(ProgressBar::new(length));
        bar.set_style(bar_style("  {msg} ({pos}/{len}) [{bar:38.cyan/dim}]"));
        bar.set_message(message.to_string());
        Box::new(CliProgress {
            multi: self.multi.clone(),
            bar,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_silent_progress() {
        let progress = SilentProgress::new();

        progress.set_message("authors");
        progress.increment(2);
        progress.increment(1);
        assert_eq!(progress.position(), 3);

        assert!(!progress.is_finished());
        progress.finish_with_message("done");
        assert!(progress.is_finished());
    }

    #[test]
    fn test_silent_child_is_independent() {
        let parent = SilentProgress::new();
        let child = parent.child("author-1", 10);

        child.increment(4);
        assert_eq!(child.position(), 4);
        assert_eq!(parent.position(), 0);

        child.finish_with_error("boom");
        assert!(child.is_finished());
        assert!(!parent.is_finished());
    }

    #[test]
    fn test_cli_progress_counts() {
        let progress = CliProgress::new("Authors", 0);
        progress.set_length(2);
        let child = progress.child("author-7", 3);

        child.increment(3);
        child.finish_with_message("author-7.eln");
        progress.increment(1);

        assert_eq!(child.position(), 3);
        assert!(child.is_finished());
        assert_eq!(progress.position(), 1);
    }
}
