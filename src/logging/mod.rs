//! Logging and observability
//!
//! Structured logging through `tracing`:
//! - Console output filtered by the configured level or `RUST_LOG`
//! - Optional JSON file logging with rotation
//!
//! # Example
//!
//! ```no_run
//! use eln_export::logging::init_logging;
//! use eln_export::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!(author_id = "42", "Packaging author");
//! ```

pub mod structured;

// Re-export commonly used items
pub use structured::{init_logging, LoggingGuard};

/// Log the start of one author's pipeline
///
/// # Example
///
/// ```no_run
/// use eln_export::log_author_start;
/// use eln_export::domain::AuthorId;
///
/// let author_id = AuthorId::new("42").unwrap();
/// log_author_start!(&author_id, 12);
/// ```
#[macro_export]
macro_rules! log_author_start {
    ($author_id:expr, $entries:expr) => {
        tracing::info!(
            author_id = %$author_id,
            entries = $entries,
            "Starting author export"
        );
    };
}

/// Log the completion of one author's pipeline
///
/// # Example
///
/// ```no_run
/// use eln_export::log_author_complete;
/// use std::path::Path;
/// use std::time::Duration;
///
/// log_author_complete!("42", Path::new("export/author-42.eln"), Duration::from_secs(3));
/// ```
#[macro_export]
macro_rules! log_author_complete {
    ($author_id:expr, $archive:expr, $duration:expr) => {
        tracing::info!(
            author_id = %$author_id,
            archive = %$archive.display(),
            duration_ms = $duration.as_millis() as u64,
            "Author export completed"
        );
    };
}

/// Log an element that was left out of the graph
///
/// # Example
///
/// ```no_run
/// use eln_export::log_element_skipped;
///
/// log_element_skipped!("1001", "e-7", "metadata fetch failed");
/// ```
#[macro_export]
macro_rules! log_element_skipped {
    ($entry_id:expr, $element_id:expr, $reason:expr) => {
        tracing::warn!(
            entry_id = %$entry_id,
            element_id = %$element_id,
            reason = %$reason,
            "Element skipped"
        );
    };
}

/// Log a retry attempt
///
/// # Example
///
/// ```no_run
/// use eln_export::log_retry_attempt;
///
/// log_retry_attempt!(2, 3, 2000u64, "Connection timeout");
/// ```
#[macro_export]
macro_rules! log_retry_attempt {
    ($attempt:expr, $max_attempts:expr, $delay_ms:expr, $reason:expr) => {
        tracing::warn!(
            attempt = $attempt,
            max_attempts = $max_attempts,
            delay_ms = $delay_ms,
            reason = %$reason,
            "Retrying request after error"
        );
    };
}
