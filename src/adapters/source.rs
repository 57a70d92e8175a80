//! Entry source trait definition
//!
//! This module defines the `EntrySource` trait that abstracts a notebook
//! vendor's REST API. The export pipeline is written against this trait only,
//! so vendors can be added without touching the pipeline and tests can run
//! against an in-memory source.

use crate::domain::{Element, Entry, RejectedEntry, Result};
use async_trait::async_trait;

/// One page of the entry listing
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntryPage {
    /// Total number of entries the source reports for the whole listing
    pub total_count: usize,

    /// Entries on this page, in source order
    pub entries: Vec<Entry>,

    /// Records on this page that could not be read as entries
    pub rejected: Vec<RejectedEntry>,
}

/// Trait for notebook vendor implementations
///
/// Implementations hold an already-authenticated session: the bearer
/// credential is obtained once, before the first call.
///
/// # Example
///
/// ```no_run
/// use eln_export::adapters::source::EntrySource;
///
/// # async fn example(source: &dyn EntrySource) -> eln_export::domain::Result<()> {
/// let first = source.fetch_page(0, 1).await?;
/// println!("{} entries at {}", first.total_count, source.base_url());
/// # Ok(())
/// # }
/// ```
#[async_trait]
pub trait EntrySource: Send + Sync {
    /// Fetch one page of the entry listing
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails after retries, if the response
    /// carries no usable total count, or if the body is not a JSON array.
    /// Single unreadable records land in [`EntryPage::rejected`] instead.
    async fn fetch_page(&self, offset: usize, limit: usize) -> Result<EntryPage>;

    /// Fetch the metadata document of an element
    ///
    /// The document is returned unchanged; callers persist it as-is.
    async fn fetch_element_metadata(&self, element: &Element) -> Result<serde_json::Value>;

    /// Fetch the raw payload bytes of a FILE or IMAGE element
    async fn fetch_element_payload(&self, element: &Element) -> Result<Vec<u8>>;

    /// Base URL of the notebook server
    fn base_url(&self) -> &str;
}
