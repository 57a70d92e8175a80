//! Paginated retrieval of the entry collection
//!
//! A first request (`limit=1`) reads the total count; the collection is then
//! fetched in `ceil(total / chunk_size)` chunks. Any failure after retries
//! aborts the whole listing: a partial listing would silently drop entries.
//! Single unreadable records do not; they are carried as rejected entries.

use crate::adapters::{EntryPage, EntrySource};
use crate::domain::{Entry, RejectedEntry, Result};
use futures::stream::{self, StreamExt, TryStreamExt};
use std::sync::Arc;

/// The full entry collection
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Listing {
    /// Readable entries in source order
    pub entries: Vec<Entry>,

    /// Records that could not be read, in source order
    pub rejected: Vec<RejectedEntry>,
}

impl Listing {
    /// Number of records listed, readable or not
    pub fn record_count(&self) -> usize {
        self.entries.len() + self.rejected.len()
    }
}

/// Fetches every entry of the source, a chunk at a time
pub struct PaginatedFetcher {
    source: Arc<dyn EntrySource>,
    chunk_size: usize,
    parallel_chunks: usize,
}

impl PaginatedFetcher {
    /// `chunk_size` and `parallel_chunks` are clamped to at least 1
    pub fn new(source: Arc<dyn EntrySource>, chunk_size: usize, parallel_chunks: usize) -> Self {
        Self {
            source,
            chunk_size: chunk_size.max(1),
            parallel_chunks: parallel_chunks.max(1),
        }
    }

    /// Fetch the full collection in source order
    ///
    /// With a total of zero no chunk is requested and the first page is
    /// returned as-is.
    pub async fn fetch_all(&self) -> Result<Listing> {
        let first = self.source.fetch_page(0, 1).await?;
        let total = first.total_count;
        tracing::info!(total, "Found entries");

        if total == 0 {
            return Ok(Listing {
                entries: first.entries,
                rejected: first.rejected,
            });
        }

        let offsets = chunk_offsets(total, self.chunk_size);
        tracing::debug!(
            chunks = offsets.len(),
            chunk_size = self.chunk_size,
            parallel_chunks = self.parallel_chunks,
            "Fetching entry chunks"
        );

        // `buffered` yields in input order, so chunks concatenate by offset
        let pages: Vec<EntryPage> = stream::iter(offsets)
            .map(|offset| {
                let source = Arc::clone(&self.source);
                let limit = self.chunk_size;
                async move { source.fetch_page(offset, limit).await }
            })
            .buffered(self.parallel_chunks)
            .try_collect::<Vec<_>>()
            .await?;

        let mut listing = Listing::default();
        for page in pages {
            listing.entries.extend(page.entries);
            listing.rejected.extend(page.rejected);
        }

        if listing.record_count() != total {
            tracing::warn!(
                expected = total,
                received = listing.record_count(),
                "Entry count differs from the reported total"
            );
        }
        if !listing.rejected.is_empty() {
            tracing::warn!(rejected = listing.rejected.len(), "Listing contained unreadable entries");
        }

        Ok(listing)
    }
}

/// Offsets `0, chunk, 2*chunk, ...` covering `total` entries
pub fn chunk_offsets(total: usize, chunk_size: usize) -> Vec<usize> {
    let chunk_size = chunk_size.max(1);
    let count = total.div_ceil(chunk_size);
    (0..count).map(|i| i * chunk_size).collect()
}
