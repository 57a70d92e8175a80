//! Element resolution
//!
//! Turns each element of an entry into files on disk plus File nodes (or, for
//! TEXT, into a text fragment). Source failures for one element only skip
//! that element; filesystem failures abort the run.

use super::idgen::IdGenerator;
use super::sheets::decompose_table;
use crate::adapters::EntrySource;
use crate::core::crate_graph::FileNode;
use crate::core::verification::checksum::{canonical_json_bytes, sha256_hex};
use crate::domain::metadata::{FileMetadata, TextMetadata};
use crate::domain::{Element, ElementId, ElementKind, ElnError, Entry, EntryId, Result};
use serde::Serialize;
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;

/// Media type of JSON dumps whose metadata names none
pub const JSON_MEDIA_TYPE: &str = "application/json";

/// Media type of sheet extracts
pub const CSV_MEDIA_TYPE: &str = "text/csv";

/// An element left out of the export, and why
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedElement {
    pub entry_id: EntryId,
    /// The element id as sent; unreadable ids are kept verbatim
    pub element_id: String,
    pub kind: ElementKind,
    pub reason: String,
}

/// What one element resolved to
#[derive(Debug, Clone, PartialEq)]
pub enum ElementOutcome {
    /// Files written under the entry folder, in graph order
    Files(Vec<FileNode>),

    /// Content of a TEXT element
    Text(String),

    /// Nothing usable; the reason is reported
    Skipped(String),
}

/// Everything resolved for one entry
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedEntry {
    pub files: Vec<FileNode>,
    pub texts: Vec<String>,
    pub skipped: Vec<SkippedElement>,
}

/// Resolves elements against an [`EntrySource`] into an entry folder
#[derive(Clone)]
pub struct ElementTransformer {
    source: Arc<dyn EntrySource>,
    ids: Arc<dyn IdGenerator>,
}

impl ElementTransformer {
    pub fn new(source: Arc<dyn EntrySource>, ids: Arc<dyn IdGenerator>) -> Self {
        Self { source, ids }
    }

    /// Resolve every element of `entry` into `entry_dir`, in element order
    ///
    /// The folder is created even when the entry has no elements. Elements
    /// that could not be read from the listing are reported as skipped.
    pub async fn resolve_entry(&self, entry_dir: &Path, entry: &Entry) -> Result<ResolvedEntry> {
        create_dir(entry_dir).await?;

        let mut resolved = ResolvedEntry::default();
        for element in &entry.elements {
            match self.resolve(entry_dir, &entry.id, element).await? {
                ElementOutcome::Files(files) => resolved.files.extend(files),
                ElementOutcome::Text(text) => resolved.texts.push(text),
                ElementOutcome::Skipped(reason) => {
                    crate::log_element_skipped!(entry.id, element.id, reason);
                    resolved.skipped.push(SkippedElement {
                        entry_id: entry.id.clone(),
                        element_id: element.id.to_string(),
                        kind: element.kind,
                        reason,
                    });
                }
            }
        }

        for malformed in &entry.malformed_elements {
            crate::log_element_skipped!(entry.id, malformed.id, malformed.reason);
            resolved.skipped.push(SkippedElement {
                entry_id: entry.id.clone(),
                element_id: malformed.id.clone(),
                kind: malformed.kind,
                reason: malformed.reason.clone(),
            });
        }

        Ok(resolved)
    }

    /// Resolve one element
    ///
    /// # Errors
    ///
    /// Only filesystem and serialization failures are returned as errors.
    /// Fetch failures and malformed metadata come back as
    /// [`ElementOutcome::Skipped`].
    pub async fn resolve(
        &self,
        entry_dir: &Path,
        entry_id: &EntryId,
        element: &Element,
    ) -> Result<ElementOutcome> {
        tracing::debug!(entry_id = %entry_id, element_id = %element.id, kind = %element.kind, "Resolving element");

        match element.kind {
            ElementKind::File | ElementKind::Image => {
                self.resolve_file(entry_dir, entry_id, element).await
            }
            ElementKind::Table | ElementKind::WellPlate => {
                self.resolve_record(entry_dir, entry_id, element, true).await
            }
            ElementKind::Data => self.resolve_record(entry_dir, entry_id, element, false).await,
            ElementKind::Text => self.resolve_text(entry_dir, element).await,
            ElementKind::Unknown => Ok(ElementOutcome::Skipped(
                "unsupported element kind".to_string(),
            )),
        }
    }

    async fn fetch_metadata(&self, element: &Element) -> std::result::Result<Value, String> {
        self.source
            .fetch_element_metadata(element)
            .await
            .map_err(|e| format!("metadata fetch failed: {e}"))
    }

    /// FILE and IMAGE: metadata sidecar, then the raw payload
    async fn resolve_file(
        &self,
        entry_dir: &Path,
        entry_id: &EntryId,
        element: &Element,
    ) -> Result<ElementOutcome> {
        let document = match self.fetch_metadata(element).await {
            Ok(doc) => doc,
            Err(reason) => return Ok(ElementOutcome::Skipped(reason)),
        };

        write_sidecar(entry_dir, &element.id, &document).await?;

        let metadata = match FileMetadata::from_document(&document) {
            Ok(m) => m,
            Err(e) => return Ok(ElementOutcome::Skipped(format!("malformed metadata: {e}"))),
        };

        // The sidecar stays on disk when the payload cannot be fetched
        let payload = match self.source.fetch_element_payload(element).await {
            Ok(bytes) => bytes,
            Err(e) => {
                return Ok(ElementOutcome::Skipped(format!("payload fetch failed: {e}")));
            }
        };

        write_file(&entry_dir.join(element.id.as_str()), &payload).await?;

        Ok(ElementOutcome::Files(vec![FileNode {
            id: file_node_id(entry_id, element.id.as_str()),
            name: metadata.display_name(),
            content_size: metadata.content_size(),
            encoding_format: metadata.media_type(),
            sha256: Some(sha256_hex(&payload)),
        }]))
    }

    /// TABLE, WELL_PLATE and DATA: canonical JSON dump named by record id,
    /// plus CSV extracts for tables
    async fn resolve_record(
        &self,
        entry_dir: &Path,
        entry_id: &EntryId,
        element: &Element,
        with_sheets: bool,
    ) -> Result<ElementOutcome> {
        let document = match self.fetch_metadata(element).await {
            Ok(doc) => doc,
            Err(reason) => return Ok(ElementOutcome::Skipped(reason)),
        };

        let metadata = match FileMetadata::from_document(&document) {
            Ok(m) => m,
            Err(e) => return Ok(ElementOutcome::Skipped(format!("malformed metadata: {e}"))),
        };

        let record_id = match metadata.id.as_deref() {
            Some(id) => match ElementId::new(id) {
                Ok(record_id) => record_id,
                Err(e) => return Ok(ElementOutcome::Skipped(format!("invalid record id: {e}"))),
            },
            None => {
                tracing::warn!(
                    entry_id = %entry_id,
                    element_id = %element.id,
                    "Record has no id, naming the dump after the element"
                );
                element.id.clone()
            }
        };

        let bytes = canonical_json_bytes(&document)?;
        write_file(&entry_dir.join(record_id.as_str()), &bytes).await?;

        let mut files = vec![FileNode {
            id: file_node_id(entry_id, record_id.as_str()),
            name: metadata.display_name(),
            content_size: positive_len(bytes.len()),
            encoding_format: Some(
                metadata
                    .media_type()
                    .unwrap_or_else(|| JSON_MEDIA_TYPE.to_string()),
            ),
            sha256: Some(sha256_hex(&bytes)),
        }];

        if with_sheets {
            let tables = decompose_table(&document);
            if !tables.has_sheets {
                tracing::debug!(element_id = %element.id, "Table has no sheets, no extracts");
            }
            for sheet in &tables.skipped_sheets {
                tracing::warn!(
                    entry_id = %entry_id,
                    element_id = %element.id,
                    sheet = %sheet,
                    "Sheet has no dataTable, extract skipped"
                );
            }

            for extract in tables.extracts {
                let id = self.ids.next_id();
                let bytes = extract.csv.into_bytes();
                write_file(&entry_dir.join(&id), &bytes).await?;

                files.push(FileNode {
                    id: file_node_id(entry_id, &id),
                    name: extract.name,
                    content_size: positive_len(bytes.len()),
                    encoding_format: Some(CSV_MEDIA_TYPE.to_string()),
                    sha256: Some(sha256_hex(&bytes)),
                });
            }
        }

        Ok(ElementOutcome::Files(files))
    }

    async fn resolve_text(&self, entry_dir: &Path, element: &Element) -> Result<ElementOutcome> {
        let document = match self.fetch_metadata(element).await {
            Ok(doc) => doc,
            Err(reason) => return Ok(ElementOutcome::Skipped(reason)),
        };

        write_sidecar(entry_dir, &element.id, &document).await?;

        match TextMetadata::from_document(&document) {
            Ok(TextMetadata {
                content: Some(content),
                ..
            }) => Ok(ElementOutcome::Text(content)),
            Ok(_) => Ok(ElementOutcome::Skipped(
                "text element has no content".to_string(),
            )),
            Err(e) => Ok(ElementOutcome::Skipped(format!("malformed metadata: {e}"))),
        }
    }
}

/// `./<entry_id>/<file name>`
fn file_node_id(entry_id: &EntryId, file_name: &str) -> String {
    format!("{}/{}", entry_id.dataset_node_id(), file_name)
}

fn positive_len(len: usize) -> Option<u64> {
    (len > 0).then_some(len as u64)
}

async fn create_dir(path: &Path) -> Result<()> {
    tokio::fs::create_dir_all(path).await.map_err(|e| {
        ElnError::Io(format!("Failed to create directory {}: {e}", path.display()))
    })
}

async fn write_file(path: &Path, bytes: &[u8]) -> Result<()> {
    tokio::fs::write(path, bytes)
        .await
        .map_err(|e| ElnError::Io(format!("Failed to write {}: {e}", path.display())))
}

/// Raw metadata as `<element_id>.json`
async fn write_sidecar(entry_dir: &Path, element_id: &ElementId, document: &Value) -> Result<()> {
    let bytes = serde_json::to_vec_pretty(document)?;
    write_file(&entry_dir.join(format!("{element_id}.json")), &bytes).await
}
