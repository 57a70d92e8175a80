//! RO-Crate graph node types
//!
//! Nodes serialize to JSON-LD objects with their type in `@type`. Optional
//! fields are omitted when absent rather than written as `null`.

use serde::{Deserialize, Serialize};

/// JSON-LD context of every crate document
pub const RO_CRATE_CONTEXT: &str = "https://w3id.org/ro/crate/1.1/context";

/// Profile the descriptor declares conformance to
pub const RO_CRATE_PROFILE: &str = "https://w3id.org/ro/crate/1.1";

/// Identifier of the metadata descriptor node
pub const DESCRIPTOR_ID: &str = "ro-crate-metadata.json";

/// Identifier of the root data entity
pub const ROOT_ID: &str = "./";

/// Reference to another node by identifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdRef {
    #[serde(rename = "@id")]
    pub id: String,
}

impl IdRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

/// A node of the crate graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "@type")]
pub enum GraphNode {
    CreativeWork(DescriptorNode),
    Dataset(DatasetNode),
    File(FileNode),
    Person(PersonNode),
}

impl GraphNode {
    /// Identifier of the node
    pub fn id(&self) -> &str {
        match self {
            GraphNode::CreativeWork(n) => &n.id,
            GraphNode::Dataset(n) => &n.id,
            GraphNode::File(n) => &n.id,
            GraphNode::Person(n) => &n.id,
        }
    }
}

/// The `ro-crate-metadata.json` descriptor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DescriptorNode {
    #[serde(rename = "@id")]
    pub id: String,

    pub about: IdRef,

    #[serde(rename = "conformsTo")]
    pub conforms_to: IdRef,

    /// Local time of the export, `%Y-%m-%dT%H:%M:%S%z`
    #[serde(rename = "dateCreated")]
    pub date_created: String,

    pub version: String,
}

impl DescriptorNode {
    pub fn new(date_created: impl Into<String>) -> Self {
        Self {
            id: DESCRIPTOR_ID.to_string(),
            about: IdRef::new(ROOT_ID),
            conforms_to: IdRef::new(RO_CRATE_PROFILE),
            date_created: date_created.into(),
            version: "1.0".to_string(),
        }
    }
}

/// A Dataset: one per notebook entry, plus the root `./`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetNode {
    #[serde(rename = "@id")]
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<IdRef>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    /// Comma-joined tags and project title
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keywords: Option<String>,

    #[serde(
        rename = "dateCreated",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub date_created: Option<String>,

    #[serde(
        rename = "dateModified",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub date_modified: Option<String>,

    #[serde(rename = "hasPart", default)]
    pub has_part: Vec<IdRef>,
}

impl DatasetNode {
    /// The root data entity listing the per-entry datasets
    pub fn root(has_part: Vec<IdRef>) -> Self {
        Self {
            id: ROOT_ID.to_string(),
            has_part,
            ..Default::default()
        }
    }
}

/// A content-addressed file inside an entry folder
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileNode {
    #[serde(rename = "@id")]
    pub id: String,

    pub name: String,

    /// Byte size, present only when positive
    #[serde(
        rename = "contentSize",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub content_size: Option<u64>,

    #[serde(
        rename = "encodingFormat",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub encoding_format: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sha256: Option<String>,
}

impl FileNode {
    /// Path of the file relative to the author root (`./1001/e-7` -> `1001/e-7`)
    pub fn relative_path(&self) -> &str {
        self.id.trim_start_matches("./")
    }
}

/// An author
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonNode {
    #[serde(rename = "@id")]
    pub id: String,

    #[serde(rename = "familyName", default, skip_serializing_if = "Option::is_none")]
    pub family_name: Option<String>,

    #[serde(rename = "givenName", default, skip_serializing_if = "Option::is_none")]
    pub given_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl PersonNode {
    /// `author://<id> | <family> | <given> | <email>`, absent parts empty
    pub fn summary_line(&self) -> String {
        format!(
            "{} | {} | {} | {}",
            self.id,
            self.family_name.as_deref().unwrap_or_default(),
            self.given_name.as_deref().unwrap_or_default(),
            self.email.as_deref().unwrap_or_default()
        )
    }
}

/// The `ro-crate-metadata.json` document of one author
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrateDocument {
    #[serde(rename = "@context")]
    pub context: String,

    #[serde(rename = "@graph")]
    pub graph: Vec<GraphNode>,
}

impl CrateDocument {
    /// File nodes in graph order
    pub fn files(&self) -> impl Iterator<Item = &FileNode> {
        self.graph.iter().filter_map(|n| match n {
            GraphNode::File(f) => Some(f),
            _ => None,
        })
    }

    /// Dataset nodes in graph order, the root included
    pub fn datasets(&self) -> impl Iterator<Item = &DatasetNode> {
        self.graph.iter().filter_map(|n| match n {
            GraphNode::Dataset(d) => Some(d),
            _ => None,
        })
    }

    /// Person nodes in graph order
    pub fn persons(&self) -> impl Iterator<Item = &PersonNode> {
        self.graph.iter().filter_map(|n| match n {
            GraphNode::Person(p) => Some(p),
            _ => None,
        })
    }

    /// The root data entity, if present
    pub fn root(&self) -> Option<&DatasetNode> {
        self.datasets().find(|d| d.id == ROOT_ID)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_file_node_omits_absent_fields() {
        let node = GraphNode::File(FileNode {
            id: "./1/e".to_string(),
            name: "Unknown".to_string(),
            content_size: None,
            encoding_format: None,
            sha256: Some("ab".to_string()),
        });

        let value = serde_json::to_value(&node).unwrap();
        assert_eq!(
            value,
            json!({"@id": "./1/e", "@type": "File", "name": "Unknown", "sha256": "ab"})
        );
    }

    #[test]
    fn test_descriptor_shape() {
        let value = serde_json::to_value(GraphNode::CreativeWork(DescriptorNode::new(
            "2024-05-01T10:00:00+0200",
        )))
        .unwrap();

        assert_eq!(
            value,
            json!({
                "@id": "ro-crate-metadata.json",
                "@type": "CreativeWork",
                "about": {"@id": "./"},
                "conformsTo": {"@id": "https://w3id.org/ro/crate/1.1"},
                "dateCreated": "2024-05-01T10:00:00+0200",
                "version": "1.0"
            })
        );
    }

    #[test]
    fn test_root_dataset_has_only_parts() {
        let root = DatasetNode::root(vec![IdRef::new("./1")]);
        let value = serde_json::to_value(GraphNode::Dataset(root)).unwrap();
        assert_eq!(
            value,
            json!({"@id": "./", "@type": "Dataset", "hasPart": [{"@id": "./1"}]})
        );
    }

    #[test]
    fn test_graph_node_deserializes_by_type() {
        let node: GraphNode = serde_json::from_value(json!({
            "@id": "author://7",
            "@type": "Person",
            "familyName": "Curie"
        }))
        .unwrap();

        assert_eq!(node.id(), "author://7");
        assert!(matches!(node, GraphNode::Person(ref p) if p.email.is_none()));
    }

    #[test]
    fn test_person_summary_line() {
        let person = PersonNode {
            id: "author://7".to_string(),
            family_name: Some("Curie".to_string()),
            given_name: None,
            email: Some("marie@example.org".to_string()),
        };
        assert_eq!(
            person.summary_line(),
            "author://7 | Curie |  | marie@example.org"
        );
    }

    #[test]
    fn test_file_relative_path() {
        let node = FileNode {
            id: "./1001/abc".to_string(),
            name: "x".to_string(),
            content_size: None,
            encoding_format: None,
            sha256: None,
        };
        assert_eq!(node.relative_path(), "1001/abc");
    }
}
