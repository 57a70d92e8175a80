//! Domain identifier types with validation
//!
//! Newtype wrappers for notebook identifiers. Every identifier ends up as a
//! path component in the export tree and as part of a graph node `@id`, so
//! construction rejects empty values and anything that could escape the
//! entry folder.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifiers arrive as JSON strings from most vendors, but some send numbers.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(u64),
}

impl From<RawId> for String {
    fn from(raw: RawId) -> Self {
        match raw {
            RawId::Text(s) => s,
            RawId::Number(n) => n.to_string(),
        }
    }
}

fn validate_path_safe(kind: &str, id: &str) -> Result<(), String> {
    if id.trim().is_empty() {
        return Err(format!("{kind} cannot be empty"));
    }
    if id == "." || id == ".." || id.contains('/') || id.contains('\\') {
        return Err(format!("{kind} is not a valid path component: {id}"));
    }
    Ok(())
}

/// Entry identifier
///
/// # Examples
///
/// ```
/// use eln_export::domain::ids::EntryId;
/// use std::str::FromStr;
///
/// let entry_id = EntryId::from_str("E-1024").unwrap();
/// assert_eq!(entry_id.as_str(), "E-1024");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct EntryId(String);

impl EntryId {
    /// Creates a new EntryId, rejecting empty and path-unsafe values
    pub fn new(id: impl Into<String>) -> Result<Self, String> {
        let id = id.into();
        validate_path_safe("Entry ID", &id)?;
        Ok(Self(id))
    }

    /// Returns the entry ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Graph identifier of the Dataset node for this entry
    pub fn dataset_node_id(&self) -> String {
        format!("./{}", self.0)
    }
}

/// Author identifier
///
/// Authors are the partition key of an export: one archive per author.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct AuthorId(String);

impl AuthorId {
    /// Creates a new AuthorId, rejecting empty and path-unsafe values
    pub fn new(id: impl Into<String>) -> Result<Self, String> {
        let id = id.into();
        validate_path_safe("Author ID", &id)?;
        Ok(Self(id))
    }

    /// Returns the author ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Graph identifier of the Person node for this author
    pub fn person_node_id(&self) -> String {
        format!("author://{}", self.0)
    }

    /// Name of the per-author root folder and archive stem
    pub fn folder_name(&self) -> String {
        format!("author-{}", self.0)
    }
}

/// Element identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ElementId(String);

impl ElementId {
    /// Creates a new ElementId, rejecting empty and path-unsafe values
    pub fn new(id: impl Into<String>) -> Result<Self, String> {
        let id = id.into();
        validate_path_safe("Element ID", &id)?;
        Ok(Self(id))
    }

    /// Returns the element ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

macro_rules! impl_id_traits {
    ($($ty:ident),+) => {
        $(
            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    write!(f, "{}", self.0)
                }
            }

            impl FromStr for $ty {
                type Err = String;

                fn from_str(s: &str) -> Result<Self, Self::Err> {
                    Self::new(s)
                }
            }

            impl AsRef<str> for $ty {
                fn as_ref(&self) -> &str {
                    &self.0
                }
            }

            impl<'de> Deserialize<'de> for $ty {
                fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
                where
                    D: Deserializer<'de>,
                {
                    let raw = RawId::deserialize(deserializer)?;
                    Self::new(String::from(raw)).map_err(serde::de::Error::custom)
                }
            }

            impl From<$ty> for String {
                fn from(id: $ty) -> Self {
                    id.0
                }
            }
        )+
    };
}

impl_id_traits!(EntryId, AuthorId, ElementId);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_id_creation() {
        let id = EntryId::new("4711").unwrap();
        assert_eq!(id.as_str(), "4711");
        assert_eq!(id.dataset_node_id(), "./4711");
    }

    #[test]
    fn test_ids_reject_empty() {
        assert!(EntryId::new("").is_err());
        assert!(AuthorId::new("   ").is_err());
        assert!(ElementId::new("").is_err());
    }

    #[test]
    fn test_ids_reject_path_traversal() {
        assert!(EntryId::new("..").is_err());
        assert!(ElementId::new("a/b").is_err());
        assert!(AuthorId::new("..\\x").is_err());
    }

    #[test]
    fn test_author_id_derived_names() {
        let id = AuthorId::new("42").unwrap();
        assert_eq!(id.person_node_id(), "author://42");
        assert_eq!(id.folder_name(), "author-42");
    }

    #[test]
    fn test_id_deserializes_from_number_or_string() {
        let from_str: ElementId = serde_json::from_str("\"abc\"").unwrap();
        let from_num: ElementId = serde_json::from_str("123").unwrap();
        assert_eq!(from_str.as_str(), "abc");
        assert_eq!(from_num.as_str(), "123");
    }

    #[test]
    fn test_id_deserialization_rejects_invalid() {
        assert!(serde_json::from_str::<EntryId>("\"\"").is_err());
        assert!(serde_json::from_str::<EntryId>("\"../etc\"").is_err());
    }

    #[test]
    fn test_id_serializes_as_plain_string() {
        let id = AuthorId::new("7").unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"7\"");
    }

    #[test]
    fn test_author_ids_order_lexicographically() {
        let a = AuthorId::new("10").unwrap();
        let b = AuthorId::new("9").unwrap();
        assert!(a < b);
    }
}
