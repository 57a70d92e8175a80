//! Domain models and types for the exporter.
//!
//! This module contains the notebook records, identifiers, typed metadata views
//! and the error hierarchy shared by every pipeline stage.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Strongly-typed identifiers** ([`EntryId`], [`AuthorId`], [`ElementId`])
//! - **Notebook records** ([`Entry`], [`Element`], [`ElementKind`])
//! - **Typed metadata views** ([`FileMetadata`], [`TextMetadata`])
//! - **Error types** ([`ElnError`], [`SourceError`], [`PackageError`])
//! - **Result type alias** ([`Result`])
//!
//! # Type Safety
//!
//! Identifiers are newtypes so an author id can never be used where an entry
//! id is expected, and every identifier is checked to be a safe path component:
//!
//! ```rust
//! use eln_export::domain::{AuthorId, EntryId};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let author = AuthorId::new("42")?;
//! let entry = EntryId::new("1001")?;
//! assert_eq!(author.folder_name(), "author-42");
//! assert_eq!(entry.dataset_node_id(), "./1001");
//!
//! assert!(EntryId::new("../escape").is_err());
//! # Ok(())
//! # }
//! ```

pub mod entry;
pub mod errors;
pub mod ids;
pub mod metadata;
pub mod result;

// Re-export commonly used types for convenience
pub use entry::{
    decode_entries, AuthorProfile, Element, ElementKind, Entry, MalformedElement, Project,
    RejectedEntry,
};
pub use errors::{ElnError, PackageError, SourceError};
pub use ids::{AuthorId, ElementId, EntryId};
pub use metadata::{FileMetadata, TextMetadata};
pub use result::Result;
