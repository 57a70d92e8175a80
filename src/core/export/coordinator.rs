//! Export coordinator - main orchestrator for the export process
//!
//! Runs the stages in order: fetch the listing, partition it by author, run
//! one pipeline per author (transform, build graph, verify, package), then
//! write the run-level files from the merged author reports.

use super::fetcher::{Listing, PaginatedFetcher};
use super::partition::partition;
use super::summary::{AuthorReport, ExportSummary, SUMMARY_FILE_NAME};
use crate::adapters::EntrySource;
use crate::config::ElnConfig;
use crate::core::crate_graph::CrateGraphBuilder;
use crate::core::package::ArchivePackager;
use crate::core::scripts::write_scripts;
use crate::core::transform::{ElementTransformer, IdGenerator, RandomIdGenerator};
use crate::core::verification::verify_author_tree;
use crate::domain::{decode_entries, AuthorId, ElnError, Entry, Result};
use crate::progress::{ProgressTracker, SilentProgress};
use futures::stream::{self, StreamExt, TryStreamExt};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

/// File name of the saved listing
pub const ENTRIES_FILE_NAME: &str = "entries.json";

/// `strftime` pattern of the per-run directory name
pub const EXPORT_DIR_FORMAT: &str = "export-%Y-%m-%d-%H-%M-%S";

/// Export coordinator
///
/// # Example
///
/// ```no_run
/// use eln_export::adapters::connect_source;
/// use eln_export::config::load_config;
/// use eln_export::core::export::ExportCoordinator;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config("eln-export.toml")?;
/// let source = connect_source(config.source.clone()).await?;
///
/// let summary = ExportCoordinator::new(config, source).execute_export().await?;
/// println!("{} archives in {}", summary.author_count(), summary.export_dir.display());
/// # Ok(())
/// # }
/// ```
pub struct ExportCoordinator {
    config: ElnConfig,
    source: Arc<dyn EntrySource>,
    ids: Arc<dyn IdGenerator>,
    progress: Arc<dyn ProgressTracker>,
    entries_file: Option<PathBuf>,
}

impl ExportCoordinator {
    /// Create a coordinator with random extract ids and no progress output
    pub fn new(config: ElnConfig, source: Arc<dyn EntrySource>) -> Self {
        Self {
            config,
            source,
            ids: Arc::new(RandomIdGenerator),
            progress: Arc::new(SilentProgress::new()),
            entries_file: None,
        }
    }

    pub fn with_id_generator(mut self, ids: Arc<dyn IdGenerator>) -> Self {
        self.ids = ids;
        self
    }

    pub fn with_progress(mut self, progress: Arc<dyn ProgressTracker>) -> Self {
        self.progress = progress;
        self
    }

    /// Read the listing from a local JSON array instead of the source
    ///
    /// Element metadata and payloads are still fetched from the source.
    pub fn with_entries_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.entries_file = Some(path.into());
        self
    }

    /// Execute the export
    ///
    /// # Errors
    ///
    /// Listing failures, filesystem errors and integrity check failures abort
    /// the run. Element-level failures are recorded in the summary instead.
    pub async fn execute_export(&self) -> Result<ExportSummary> {
        let start_time = Instant::now();
        tracing::info!(base_url = self.source.base_url(), "Starting export");

        let listing = self.load_entries().await?;
        let total_entries = listing.record_count();
        let entries = listing.entries;

        let export_dir = self.create_export_dir().await?;
        if self.config.export.save_entries && self.entries_file.is_none() {
            let path = export_dir.join(ENTRIES_FILE_NAME);
            tokio::fs::write(&path, serde_json::to_vec_pretty(&entries)?).await?;
            tracing::info!(path = %path.display(), "Saved entry listing");
        }

        let partition = partition(entries);
        tracing::info!(
            authors = partition.author_count(),
            rejected = partition.rejected.len(),
            "Partitioned entries by author"
        );

        self.progress.set_length(partition.author_count() as u64);
        self.progress.set_message("Exporting authors");

        let packager = ArchivePackager::new(&export_dir);
        let reports: Vec<AuthorReport> = stream::iter(partition.groups)
            .map(|(author_id, entries)| self.export_author(&packager, author_id, entries))
            .buffered(self.config.export.parallel_authors.max(1))
            .try_collect()
            .await
            .map_err(|e| {
                self.progress.finish_with_error(&e.to_string());
                e
            })?;

        let mut summary = ExportSummary::new(&export_dir);
        summary.total_entries = total_entries;
        summary.rejected_entries = listing.rejected;
        summary.rejected_entries.extend(partition.rejected);
        for report in reports {
            summary.merge_author(report);
        }

        tokio::fs::write(
            export_dir.join(SUMMARY_FILE_NAME),
            summary.render_author_listing(),
        )
        .await?;

        if self.config.export.emit_scripts {
            write_scripts(&export_dir, &summary.categories).await?;
        }

        self.progress
            .finish_with_message(&format!("Exported to {}", export_dir.display()));

        let summary = summary.with_duration(start_time.elapsed());
        summary.log_summary();
        Ok(summary)
    }

    async fn load_entries(&self) -> Result<Listing> {
        match &self.entries_file {
            Some(path) => {
                tracing::info!(path = %path.display(), "Using local entry listing");
                let text = tokio::fs::read_to_string(path).await.map_err(|e| {
                    ElnError::Io(format!("Failed to read {}: {e}", path.display()))
                })?;
                let records: Vec<serde_json::Value> = serde_json::from_str(&text).map_err(|e| {
                    ElnError::Validation(format!("Invalid entries file {}: {e}", path.display()))
                })?;
                let (entries, rejected) = decode_entries(records);
                Ok(Listing { entries, rejected })
            }
            None => {
                PaginatedFetcher::new(
                    Arc::clone(&self.source),
                    self.config.source.chunk_size,
                    self.config.source.parallel_chunks,
                )
                .fetch_all()
                .await
            }
        }
    }

    async fn create_export_dir(&self) -> Result<PathBuf> {
        let out_dir = Path::new(&self.config.export.out_dir);
        tokio::fs::create_dir_all(out_dir).await?;

        let name = chrono::Local::now().format(EXPORT_DIR_FORMAT).to_string();
        let export_dir = out_dir.join(name);
        tokio::fs::create_dir(&export_dir).await.map_err(|e| {
            ElnError::Io(format!(
                "Failed to create export directory {}: {e}",
                export_dir.display()
            ))
        })?;

        tracing::info!(export_dir = %export_dir.display(), "Created export directory");
        Ok(export_dir)
    }

    /// One author's pipeline: entries to folders, graph, check, archive
    async fn export_author(
        &self,
        packager: &ArchivePackager,
        author_id: AuthorId,
        entries: Vec<Entry>,
    ) -> Result<AuthorReport> {
        let start = Instant::now();
        crate::log_author_start!(author_id, entries.len());

        let progress = self
            .progress
            .child(&author_id.folder_name(), entries.len() as u64);

        match self
            .run_author(packager, &author_id, &entries, progress.as_ref())
            .await
        {
            Ok(mut report) => {
                report.duration = start.elapsed();
                progress.finish_with_message(&format!("Created {}", report.archive.display()));
                self.progress.increment(1);
                crate::log_author_complete!(author_id, report.archive, report.duration);
                Ok(report)
            }
            Err(e) => {
                progress.finish_with_error(&e.to_string());
                tracing::error!(author_id = %author_id, error = %e, "Author export failed");
                if let Err(cleanup) = packager.discard(&author_id).await {
                    tracing::warn!(
                        author_id = %author_id,
                        error = %cleanup,
                        "Failed to remove partial author output"
                    );
                }
                Err(e)
            }
        }
    }

    async fn run_author(
        &self,
        packager: &ArchivePackager,
        author_id: &AuthorId,
        entries: &[Entry],
        progress: &dyn ProgressTracker,
    ) -> Result<AuthorReport> {
        let author_root = packager.author_root(author_id);
        tokio::fs::create_dir_all(&author_root).await?;

        let transformer = ElementTransformer::new(Arc::clone(&self.source), Arc::clone(&self.ids));
        let mut builder = CrateGraphBuilder::now(author_id.clone());
        let mut skipped = Vec::new();

        for entry in entries {
            tracing::debug!(author_id = %author_id, entry_id = %entry.id, "Extracting entry");
            let entry_dir = author_root.join(entry.id.as_str());
            let resolved = transformer.resolve_entry(&entry_dir, entry).await?;

            builder.add_entry(entry, resolved.files, &resolved.texts);
            skipped.extend(resolved.skipped);
            progress.increment(1);
        }

        let graph = builder.finish();

        let report = verify_author_tree(&author_root, &graph.document).await?;
        if !report.is_success() {
            return Err(ElnError::Export(format!(
                "Integrity check failed for {}\n{}",
                author_id.folder_name(),
                report.format_summary()
            )));
        }

        let archive = packager.package(author_id, &graph.document).await?;
        Ok(AuthorReport {
            author_id: author_id.to_string(),
            entries: entries.len(),
            archive,
            persons: graph.persons,
            categories: graph.categories,
            skipped,
            duration: Default::default(),
        })
    }
}
