//! Labfolder adapter
//!
//! Entry source for Labfolder accounts (REST API v2, bearer authentication).

pub mod client;

pub use client::{LabfolderSource, TOTAL_COUNT_HEADER};
