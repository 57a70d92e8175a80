//! Typed views over element metadata documents
//!
//! Sources return loosely-typed JSON for element metadata. The raw document is
//! always persisted unchanged; these records are the typed view the
//! transformer reads fields from. Every field is optional, so an absent field
//! is a modeled case with a documented fallback rather than a lookup failure.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

/// Name used when metadata carries neither a file name nor a title
pub const UNKNOWN_NAME: &str = "Unknown";

/// Metadata of FILE, IMAGE, TABLE, WELL_PLATE and DATA elements
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct FileMetadata {
    /// Remote record id (may differ from the element id)
    #[serde(default, deserialize_with = "lenient")]
    pub id: Option<String>,

    #[serde(default, deserialize_with = "lenient")]
    pub file_name: Option<String>,

    #[serde(default, deserialize_with = "lenient")]
    pub title: Option<String>,

    /// Byte size; vendors send either a number or a numeric string
    #[serde(default)]
    pub file_size: Option<Value>,

    #[serde(default, deserialize_with = "lenient")]
    pub content_type: Option<String>,

    #[serde(default, deserialize_with = "lenient")]
    pub original_file_content_type: Option<String>,
}

impl FileMetadata {
    /// Decode the typed view from a raw metadata document
    pub fn from_document(document: &Value) -> Result<Self, String> {
        if !document.is_object() {
            return Err("metadata document is not a JSON object".to_string());
        }
        serde_json::from_value(document.clone()).map_err(|e| e.to_string())
    }

    /// Display name: `file_name`, then `title`, then `"Unknown"`
    pub fn display_name(&self) -> String {
        [&self.file_name, &self.title]
            .into_iter()
            .flatten()
            .find(|s| !s.is_empty())
            .cloned()
            .unwrap_or_else(|| UNKNOWN_NAME.to_string())
    }

    /// Declared content size, only when strictly positive
    pub fn content_size(&self) -> Option<u64> {
        let size = match self.file_size.as_ref()? {
            Value::Number(n) => n
                .as_u64()
                .or_else(|| n.as_f64().filter(|f| *f > 0.0).map(|f| f as u64)),
            Value::String(s) => s.trim().parse::<u64>().ok(),
            _ => None,
        }?;
        (size > 0).then_some(size)
    }

    /// Media type: `content_type`, then `original_file_content_type`
    pub fn media_type(&self) -> Option<String> {
        [&self.content_type, &self.original_file_content_type]
            .into_iter()
            .flatten()
            .find(|s| !s.is_empty())
            .cloned()
    }
}

/// Metadata of TEXT elements
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TextMetadata {
    #[serde(default, deserialize_with = "lenient")]
    pub id: Option<String>,

    #[serde(default, deserialize_with = "lenient")]
    pub content: Option<String>,
}

impl TextMetadata {
    /// Decode the typed view from a raw metadata document
    pub fn from_document(document: &Value) -> Result<Self, String> {
        if !document.is_object() {
            return Err("metadata document is not a JSON object".to_string());
        }
        serde_json::from_value(document.clone()).map_err(|e| e.to_string())
    }
}

/// One sheet of a TABLE or WELL_PLATE document
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Sheet {
    #[serde(default, deserialize_with = "lenient")]
    pub data: Option<SheetData>,
}

/// Cell grid of a sheet, keyed by row index then column index
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SheetData {
    #[serde(rename = "dataTable", default, deserialize_with = "lenient")]
    pub data_table: Option<Map<String, Value>>,
}

/// Sheets of a table document, in document key order
///
/// Returns `None` when the document has no `content.sheets` object.
pub fn table_sheets(document: &Value) -> Option<&Map<String, Value>> {
    document.get("content")?.get("sheets")?.as_object()
}

/// Accept a field only when it has the expected shape; anything else reads as absent.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| match v {
        // ids are commonly numeric
        Value::Number(n) => serde_json::from_value(Value::String(n.to_string()))
            .ok()
            .or_else(|| serde_json::from_value(Value::Number(n)).ok()),
        other => serde_json::from_value(other).ok(),
    }))
}
