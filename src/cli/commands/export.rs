//! Export command implementation
//!
//! This module implements the `export` command: every notebook entry of the
//! account, one `.eln` archive per author.

use crate::adapters::connect_source;
use crate::cli::resolve_config;
use crate::config::{secret_string, SourceConfig};
use crate::core::export::{ExportCoordinator, ExportSummary};
use crate::progress::{CliProgress, ProgressTracker, SilentProgress};
use clap::Args;
use std::io::{self, BufRead, IsTerminal, Write};
use std::sync::Arc;

/// Arguments for the export command
#[derive(Args, Debug, Default)]
pub struct ExportArgs {
    /// Directory the export-<timestamp> folder is created in
    #[arg(short, long)]
    pub out_dir: Option<String>,

    /// Read the entry listing from a local JSON file instead of the server
    #[arg(long, value_name = "PATH")]
    pub entries_file: Option<String>,

    /// Save the fetched entry listing as entries.json in the export folder
    #[arg(long)]
    pub save_entries: bool,

    /// Number of authors exported concurrently
    #[arg(long, value_name = "N")]
    pub parallel_authors: Option<usize>,

    /// Do not write create-projects.py and create-links.sql
    #[arg(long)]
    pub no_scripts: bool,

    /// Hide progress bars
    #[arg(short, long)]
    pub quiet: bool,
}

impl ExportArgs {
    /// Execute the export command
    pub async fn execute(&self, config_path: Option<&str>) -> anyhow::Result<i32> {
        tracing::info!("Starting export command");

        let mut config = match resolve_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("❌ {e}");
                return Ok(2);
            }
        };

        // Apply CLI overrides
        if let Some(out_dir) = &self.out_dir {
            config.export.out_dir = out_dir.clone();
        }
        if let Some(parallel) = self.parallel_authors {
            config.export.parallel_authors = parallel;
        }
        if self.save_entries {
            config.export.save_entries = true;
        }
        if self.no_scripts {
            config.export.emit_scripts = false;
        }

        if let Err(e) = config.validate() {
            tracing::error!(error = %e, "Configuration validation failed");
            eprintln!("Configuration validation failed: {e}");
            return Ok(2);
        }

        prompt_for_credentials(&mut config.source)?;

        let source = match connect_source(config.source.clone()).await {
            Ok(s) => s,
            Err(e) => {
                tracing::error!(error = %e, "Failed to connect to source");
                eprintln!("❌ Failed to connect: {e}");
                return Ok(if e.is_connection() { 4 } else { 2 });
            }
        };

        println!("🚀 Starting export from {}", source.base_url());
        println!();

        let progress: Arc<dyn ProgressTracker> = if self.quiet {
            Arc::new(SilentProgress::new())
        } else {
            Arc::new(CliProgress::new("Authors", 0))
        };
        let mut coordinator = ExportCoordinator::new(config, source).with_progress(progress);
        if let Some(path) = &self.entries_file {
            coordinator = coordinator.with_entries_file(path);
        }

        let summary = match coordinator.execute_export().await {
            Ok(s) => s,
            Err(e) => {
                tracing::error!(error = %e, "Export failed");
                eprintln!("❌ Export failed: {e}");
                return Ok(if e.is_connection() { 4 } else { 5 });
            }
        };

        print_summary(&summary);
        Ok(exit_code(&summary))
    }
}

/// 0 when everything was exported, 1 when elements or entries were left out
pub fn exit_code(summary: &ExportSummary) -> i32 {
    if summary.is_complete() {
        0
    } else {
        1
    }
}

fn print_summary(summary: &ExportSummary) {
    println!();
    println!("📊 Export Summary:");
    println!("  Export folder: {}", summary.export_dir.display());
    println!("  Authors: {}", summary.author_count());
    println!("  Entries: {}/{}", summary.exported_entries, summary.total_entries);
    println!("  Projects: {}", summary.categories.len());
    println!("  Duration: {:.2}s", summary.duration.as_secs_f64());
    println!();

    for archive in &summary.archives {
        println!("  📦 {}", archive.display());
    }
    println!();

    if !summary.skipped_elements.is_empty() {
        println!("⚠️  Skipped elements:");
        for (i, skip) in summary.skipped_elements.iter().enumerate() {
            if i < 10 {
                println!(
                    "  - entry {} / {} {}: {}",
                    skip.entry_id, skip.kind, skip.element_id, skip.reason
                );
            }
        }
        if summary.skipped_elements.len() > 10 {
            println!("  ... and {} more", summary.skipped_elements.len() - 10);
        }
        println!();
    }

    if !summary.rejected_entries.is_empty() {
        println!("⚠️  Entries without an author:");
        for rejected in &summary.rejected_entries {
            println!("  - {}: {}", rejected.entry_id, rejected.reason);
        }
        println!();
    }

    if summary.is_complete() {
        println!("✅ Export completed successfully!");
    } else {
        println!("⚠️  Export completed with skipped data");
    }
}

/// Ask for whatever account credentials the environment did not provide
///
/// Only prompts on an interactive terminal; otherwise authentication reports
/// the missing credentials.
fn prompt_for_credentials(source: &mut SourceConfig) -> anyhow::Result<()> {
    if source.has_token() || !io::stdin().is_terminal() {
        return Ok(());
    }

    if source.username.as_deref().map_or(true, str::is_empty) {
        source.username = Some(prompt("Your Labfolder username or email: ")?);
    }
    if source.password.is_none() {
        source.password = Some(secret_string(prompt("Your Labfolder password: ")?));
    }
    Ok(())
}

fn prompt(message: &str) -> io::Result<String> {
    print!("{message}");
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().lock().read_line(&mut input)?;
    Ok(input.trim_end_matches(['\r', '\n']).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::transform::SkippedElement;
    use crate::domain::{ElementKind, EntryId};

    #[test]
    fn test_export_args_defaults() {
        let args = ExportArgs::default();
        assert!(args.out_dir.is_none());
        assert!(args.entries_file.is_none());
        assert!(!args.save_entries);
        assert!(!args.no_scripts);
    }

    #[test]
    fn test_exit_code() {
        let mut summary = ExportSummary::new("export");
        assert_eq!(exit_code(&summary), 0);

        summary.skipped_elements.push(SkippedElement {
            entry_id: EntryId::new("1").unwrap(),
            element_id: "e".to_string(),
            kind: ElementKind::Image,
            reason: "payload fetch failed".to_string(),
        });
        assert_eq!(exit_code(&summary), 1);
    }
}
