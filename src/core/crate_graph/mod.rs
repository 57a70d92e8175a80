//! RO-Crate provenance graph
//!
//! Each author gets one `ro-crate-metadata.json` document: a descriptor, one
//! Dataset per entry, the entry File nodes, a deduplicated Person per author
//! and the root `./` Dataset listing every entry.

pub mod builder;
pub mod node;

pub use builder::{AuthorGraph, CrateGraphBuilder, DESCRIPTOR_DATE_FORMAT};
pub use node::{
    CrateDocument, DatasetNode, DescriptorNode, FileNode, GraphNode, IdRef, PersonNode,
    RO_CRATE_CONTEXT,
};
