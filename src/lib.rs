// ELN Export - Electronic lab notebook export to RO-Crate .eln archives
// Copyright (c) 2025 ELN Export Contributors
// Licensed under the MIT License

//! # ELN Export
//!
//! Exports the contents of a laboratory notebook account into `.eln`
//! archives: one RO-Crate package per author, carrying the notebook entries,
//! their files and a provenance graph with content-addressed File nodes.
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - The export pipeline (fetch, partition, transform, graph, package)
//! - [`adapters`] - The [`adapters::EntrySource`] trait and the Labfolder client
//! - [`domain`] - Entries, elements, identifiers and errors
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//! - [`progress`] - Progress bars
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use eln_export::adapters::connect_source;
//! use eln_export::config::load_config;
//! use eln_export::core::export::ExportCoordinator;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config("eln-export.toml")?;
//!     let source = connect_source(config.source.clone()).await?;
//!
//!     let summary = ExportCoordinator::new(config, source).execute_export().await?;
//!     for archive in &summary.archives {
//!         println!("Created {}", archive.display());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Output
//!
//! ```text
//! export-<YYYY-MM-DD-HH-MM-SS>/
//!   author-<id>/<entry_id>/...        entry files
//!   author-<id>/ro-crate-metadata.json
//!   author-<id>.eln
//!   summary.txt
//!   create-projects.py
//!   create-links.sql
//! ```
//!
//! ## Error Handling
//!
//! Fallible operations return [`domain::Result`], whose error is
//! [`domain::ElnError`]. A failing element is skipped and reported in the
//! summary; a failing listing, login or filesystem write aborts the run.

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
pub mod progress;
