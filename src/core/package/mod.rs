//! Archive packaging

pub mod archive;

pub use archive::{ArchivePackager, ELN_EXTENSION, METADATA_FILE_NAME};
