//! Export summary and reporting

use crate::core::crate_graph::PersonNode;
use crate::core::transform::SkippedElement;
use crate::domain::RejectedEntry;
use std::path::PathBuf;
use std::time::Duration;

/// File name of the per-run author listing
pub const SUMMARY_FILE_NAME: &str = "summary.txt";

/// Outcome of one author pipeline
#[derive(Debug, Clone)]
pub struct AuthorReport {
    pub author_id: String,
    pub entries: usize,
    pub archive: PathBuf,
    pub persons: Vec<PersonNode>,
    pub categories: Vec<String>,
    pub skipped: Vec<SkippedElement>,
    pub duration: Duration,
}

/// Summary of an export run
#[derive(Debug, Clone, Default)]
pub struct ExportSummary {
    /// Export directory of this run
    pub export_dir: PathBuf,

    /// Entries listed by the source
    pub total_entries: usize,

    /// Entries packaged into an archive
    pub exported_entries: usize,

    /// Archives written, in author order
    pub archives: Vec<PathBuf>,

    /// Distinct project titles across authors, in first-seen order
    pub categories: Vec<String>,

    /// One Person per author, in author order
    pub persons: Vec<PersonNode>,

    pub skipped_elements: Vec<SkippedElement>,

    pub rejected_entries: Vec<RejectedEntry>,

    pub duration: Duration,
}

impl ExportSummary {
    pub fn new(export_dir: impl Into<PathBuf>) -> Self {
        Self {
            export_dir: export_dir.into(),
            ..Default::default()
        }
    }

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Fold one author's report into the run summary
    ///
    /// Reports must be merged in author order for categories and persons to
    /// come out in a stable order.
    pub fn merge_author(&mut self, report: AuthorReport) {
        self.exported_entries += report.entries;
        self.archives.push(report.archive);

        for category in report.categories {
            if !self.categories.contains(&category) {
                self.categories.push(category);
            }
        }
        for person in report.persons {
            if !self.persons.iter().any(|p| p.id == person.id) {
                self.persons.push(person);
            }
        }
        self.skipped_elements.extend(report.skipped);
    }

    pub fn author_count(&self) -> usize {
        self.archives.len()
    }

    /// Whether every entry and element made it into an archive
    pub fn is_complete(&self) -> bool {
        self.skipped_elements.is_empty() && self.rejected_entries.is_empty()
    }

    /// Contents of `summary.txt`: one `author://<id> | <family> | <given> | <email>` line per author
    pub fn render_author_listing(&self) -> String {
        self.persons
            .iter()
            .map(|p| format!("{}\n", p.summary_line()))
            .collect()
    }

    /// Log the summary
    pub fn log_summary(&self) {
        tracing::info!(
            export_dir = %self.export_dir.display(),
            authors = self.author_count(),
            total_entries = self.total_entries,
            exported_entries = self.exported_entries,
            categories = self.categories.len(),
            duration_secs = self.duration.as_secs(),
            "Export completed"
        );

        if !self.skipped_elements.is_empty() {
            tracing::warn!(
                skipped = self.skipped_elements.len(),
                "Export completed with skipped elements"
            );
            for skip in &self.skipped_elements {
                tracing::warn!(
                    entry_id = %skip.entry_id,
                    element_id = %skip.element_id,
                    kind = %skip.kind,
                    reason = %skip.reason,
                    "Skipped element"
                );
            }
        }

        for rejected in &self.rejected_entries {
            tracing::warn!(
                entry_id = %rejected.entry_id,
                reason = %rejected.reason,
                "Rejected entry"
            );
        }
    }
}
