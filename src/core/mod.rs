//! Core export pipeline.
//!
//! # Modules
//!
//! - [`export`] - fetching, partitioning and per-author orchestration
//! - [`transform`] - element resolution into files and File nodes
//! - [`crate_graph`] - RO-Crate graph nodes and the per-author builder
//! - [`verification`] - content hashing and pre-packaging integrity checks
//! - [`package`] - `.eln` archive writing
//! - [`scripts`] - migration helper scripts
//!
//! # Export Workflow
//!
//! 1. **Fetch**: read the listing total, then fetch it in chunks
//! 2. **Partition**: group entries by author id
//! 3. **Transform**: resolve every element into files under `author-<id>/<entry_id>/`
//! 4. **Graph**: build the author's `ro-crate-metadata.json`
//! 5. **Verify**: recompute every File node hash from disk
//! 6. **Package**: zip the author tree into `author-<id>.eln`
//! 7. **Report**: write `summary.txt` and the migration scripts
//!
//! # Example
//!
//! ```rust,no_run
//! use eln_export::adapters::connect_source;
//! use eln_export::config::load_config;
//! use eln_export::core::export::ExportCoordinator;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("eln-export.toml")?;
//! let source = connect_source(config.source.clone()).await?;
//!
//! let summary = ExportCoordinator::new(config, source).execute_export().await?;
//!
//! println!("Authors: {}", summary.author_count());
//! println!("Entries: {}", summary.exported_entries);
//! println!("Skipped elements: {}", summary.skipped_elements.len());
//! # Ok(())
//! # }
//! ```

pub mod crate_graph;
pub mod export;
pub mod package;
pub mod scripts;
pub mod transform;
pub mod verification;
