//! Export orchestration
//!
//! - [`fetcher`] - paginated retrieval of the entry listing
//! - [`partition`] - grouping of entries by author
//! - [`coordinator`] - per-author pipelines and run-level outputs
//! - [`summary`] - run summary and `summary.txt`

pub mod coordinator;
pub mod fetcher;
pub mod partition;
pub mod summary;

pub use coordinator::{ExportCoordinator, ENTRIES_FILE_NAME, EXPORT_DIR_FORMAT};
pub use fetcher::{chunk_offsets, Listing, PaginatedFetcher};
pub use partition::{partition, AuthorPartition};
pub use crate::domain::RejectedEntry;
pub use summary::{AuthorReport, ExportSummary, SUMMARY_FILE_NAME};
