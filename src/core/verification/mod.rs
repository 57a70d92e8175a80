//! Content hashing and integrity verification
//!
//! - [`checksum`] - SHA-256 of written bytes and canonical JSON serialization
//! - [`verify`] - recompute every File node hash from the author tree

pub mod checksum;
pub mod report;
pub mod verify;

pub use checksum::{canonical_json_bytes, sha256_hex};
pub use report::{VerificationFailure, VerificationReport};
pub use verify::verify_author_tree;
