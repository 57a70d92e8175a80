//! Notebook entry model
//!
//! An [`Entry`] is one notebook record as listed by the source. Entries are
//! read-only to the exporter and are consumed once per run.
//!
//! Listing pages are decoded one record at a time with [`decode_entries`]:
//! a record that cannot be read becomes a [`RejectedEntry`], and an element
//! that cannot be read becomes a [`MalformedElement`] on its entry. Neither
//! affects the rest of the page.

use super::ids::{AuthorId, ElementId, EntryId};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// One notebook record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawEntry")]
pub struct Entry {
    /// Unique entry identifier
    pub id: EntryId,

    /// Owning author; `None` when the source sent no usable id
    pub author_id: Option<AuthorId>,

    /// Expanded author record, when the listing was requested with `expand=author`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<AuthorProfile>,

    /// Entry title
    pub title: String,

    /// Creation timestamp, copied verbatim into the graph
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creation_date: Option<String>,

    /// Last modification timestamp, copied verbatim into the graph
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version_date: Option<String>,

    /// Ordered tags
    pub tags: Vec<String>,

    /// Ordered elements
    pub elements: Vec<Element>,

    /// Elements left out because they could not be read
    #[serde(skip)]
    pub malformed_elements: Vec<MalformedElement>,

    /// Associated project
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project: Option<Project>,
}

impl Entry {
    /// Title of the associated project, if any
    pub fn project_title(&self) -> Option<&str> {
        self.project
            .as_ref()
            .and_then(|p| p.title.as_deref())
            .filter(|t| !t.is_empty())
    }

    /// Tags with the project title appended
    pub fn keywords(&self) -> Vec<String> {
        let mut keywords = self.tags.clone();
        if let Some(title) = self.project_title() {
            keywords.push(title.to_string());
        }
        keywords
    }
}

/// Wire form of an entry: every field but `id` tolerates `null` and bad values
#[derive(Deserialize)]
struct RawEntry {
    id: EntryId,

    // Missing and malformed author ids both become `None`; the partitioner reports them
    #[serde(default, deserialize_with = "lenient")]
    author_id: Option<AuthorId>,

    #[serde(default, deserialize_with = "lenient")]
    author: Option<AuthorProfile>,

    #[serde(default, deserialize_with = "null_as_default")]
    title: String,

    #[serde(default, deserialize_with = "lenient")]
    creation_date: Option<String>,

    #[serde(default, deserialize_with = "lenient")]
    version_date: Option<String>,

    #[serde(default, deserialize_with = "lenient_tags")]
    tags: Vec<String>,

    #[serde(default, deserialize_with = "null_as_default")]
    elements: Vec<Value>,

    #[serde(default, deserialize_with = "lenient")]
    project: Option<Project>,
}

impl From<RawEntry> for Entry {
    fn from(raw: RawEntry) -> Self {
        let mut elements = Vec::with_capacity(raw.elements.len());
        let mut malformed_elements = Vec::new();

        for value in raw.elements {
            match serde_json::from_value::<Element>(value.clone()) {
                Ok(element) => elements.push(element),
                Err(e) => malformed_elements.push(MalformedElement {
                    id: raw_id_text(value.get("id")),
                    kind: value
                        .get("type")
                        .and_then(|t| serde_json::from_value(t.clone()).ok())
                        .unwrap_or(ElementKind::Unknown),
                    reason: format!("malformed element: {e}"),
                }),
            }
        }

        Self {
            id: raw.id,
            author_id: raw.author_id,
            author: raw.author,
            title: raw.title,
            creation_date: raw.creation_date,
            version_date: raw.version_date,
            tags: raw.tags,
            elements,
            malformed_elements,
            project: raw.project,
        }
    }
}

/// An element that was listed but could not be read
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedElement {
    /// The id as sent, or `<missing>`
    pub id: String,
    pub kind: ElementKind,
    pub reason: String,
}

/// An entry left out of every archive
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RejectedEntry {
    /// The id as sent, or `<missing>`
    pub entry_id: String,
    pub reason: String,
}

/// Decode a listing page record by record
///
/// # Examples
///
/// ```
/// use eln_export::domain::decode_entries;
/// use serde_json::json;
///
/// let (entries, rejected) = decode_entries(vec![
///     json!({"id": "1", "author_id": "7", "title": null}),
///     json!({"id": "../2", "author_id": "7"}),
/// ]);
/// assert_eq!(entries.len(), 1);
/// assert_eq!(rejected[0].entry_id, "../2");
/// ```
pub fn decode_entries(values: Vec<Value>) -> (Vec<Entry>, Vec<RejectedEntry>) {
    let mut entries = Vec::with_capacity(values.len());
    let mut rejected = Vec::new();

    for value in values {
        match serde_json::from_value::<Entry>(value.clone()) {
            Ok(entry) => entries.push(entry),
            Err(e) => {
                let entry_id = raw_id_text(value.get("id"));
                tracing::warn!(entry_id = %entry_id, error = %e, "Entry could not be read, rejected");
                rejected.push(RejectedEntry {
                    entry_id,
                    reason: format!("malformed entry: {e}"),
                });
            }
        }
    }

    (entries, rejected)
}

fn raw_id_text(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => "<missing>".to_string(),
    }
}

/// Project an entry belongs to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

/// Author details carried on the entry listing
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// A typed sub-unit of an entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Element {
    pub id: ElementId,

    #[serde(rename = "type")]
    pub kind: ElementKind,
}

/// Element kinds understood by the exporter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ElementKind {
    File,
    Image,
    Table,
    WellPlate,
    Data,
    Text,
    #[serde(other)]
    Unknown,
}

impl ElementKind {
    /// Resource segment used by element endpoints (`WELL_PLATE` -> `well-plate`)
    pub fn resource_segment(&self) -> &'static str {
        match self {
            ElementKind::File => "file",
            ElementKind::Image => "image",
            ElementKind::Table => "table",
            ElementKind::WellPlate => "well-plate",
            ElementKind::Data => "data",
            ElementKind::Text => "text",
            ElementKind::Unknown => "unknown",
        }
    }

    /// Suffix of the raw payload endpoint, for kinds that carry one
    pub fn payload_suffix(&self) -> Option<&'static str> {
        match self {
            ElementKind::File => Some("download"),
            ElementKind::Image => Some("original-data"),
            _ => None,
        }
    }
}

impl std::fmt::Display for ElementKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ElementKind::File => "FILE",
            ElementKind::Image => "IMAGE",
            ElementKind::Table => "TABLE",
            ElementKind::WellPlate => "WELL_PLATE",
            ElementKind::Data => "DATA",
            ElementKind::Text => "TEXT",
            ElementKind::Unknown => "UNKNOWN",
        };
        f.write_str(name)
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Unreadable optional values are treated as absent
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| serde_json::from_value(v).ok()))
}

/// Non-string tags are dropped
fn lenient_tags<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let values: Vec<Value> = null_as_default(deserializer)?;
    Ok(values
        .into_iter()
        .filter_map(|v| match v {
            Value::String(s) => Some(s),
            _ => None,
        })
        .collect())
}
