//! Per-author crate graph assembly

use super::node::{
    CrateDocument, DatasetNode, DescriptorNode, FileNode, GraphNode, IdRef, PersonNode,
    RO_CRATE_CONTEXT,
};
use crate::domain::{AuthorId, Entry};
use std::collections::HashSet;

/// Timestamp format of the descriptor `dateCreated`
pub const DESCRIPTOR_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%z";

/// Builds the graph of one author, entry by entry
///
/// The descriptor is placed first; [`finish`](Self::finish) appends the root
/// data entity last, listing every entry Dataset in insertion order.
///
/// # Example
///
/// ```
/// use eln_export::core::crate_graph::CrateGraphBuilder;
/// use eln_export::domain::{AuthorId, Entry};
///
/// let author = AuthorId::new("7").unwrap();
/// let entry: Entry = serde_json::from_str(r#"{"id": "100", "author_id": "7", "title": "Prep"}"#).unwrap();
///
/// let mut builder = CrateGraphBuilder::new(author, "2024-01-01T00:00:00+0000");
/// builder.add_entry(&entry, Vec::new(), &[]);
/// let graph = builder.finish();
///
/// assert_eq!(graph.document.root().unwrap().has_part.len(), 1);
/// ```
#[derive(Debug)]
pub struct CrateGraphBuilder {
    author_id: AuthorId,
    graph: Vec<GraphNode>,
    dataset_ids: Vec<IdRef>,
    person_ids: HashSet<String>,
    categories: Vec<String>,
}

/// A finished author graph plus what the coordinator aggregates across authors
#[derive(Debug, Clone, PartialEq)]
pub struct AuthorGraph {
    pub document: CrateDocument,

    /// Project titles in first-seen order
    pub categories: Vec<String>,

    /// Person nodes in graph order
    pub persons: Vec<PersonNode>,
}

impl CrateGraphBuilder {
    pub fn new(author_id: AuthorId, date_created: impl Into<String>) -> Self {
        Self {
            author_id,
            graph: vec![GraphNode::CreativeWork(DescriptorNode::new(date_created))],
            dataset_ids: Vec::new(),
            person_ids: HashSet::new(),
            categories: Vec::new(),
        }
    }

    /// Builder stamped with the current local time
    pub fn now(author_id: AuthorId) -> Self {
        let date = chrono::Local::now().format(DESCRIPTOR_DATE_FORMAT).to_string();
        Self::new(author_id, date)
    }

    pub fn author_id(&self) -> &AuthorId {
        &self.author_id
    }

    /// Add one entry: its File nodes, its Dataset and, once, its Person
    ///
    /// `files` are the resolved File nodes of the entry in element order and
    /// `texts` the TEXT contents, concatenated into the Dataset `text`.
    pub fn add_entry(&mut self, entry: &Entry, files: Vec<FileNode>, texts: &[String]) {
        let has_part = files.iter().map(|f| IdRef::new(f.id.clone())).collect();
        self.graph.extend(files.into_iter().map(GraphNode::File));

        let dataset = DatasetNode {
            id: entry.id.dataset_node_id(),
            name: Some(entry.title.clone()),
            author: Some(IdRef::new(self.author_id.person_node_id())),
            text: Some(texts.concat()),
            keywords: Some(entry.keywords().join(",")),
            date_created: entry.creation_date.clone(),
            date_modified: entry.version_date.clone(),
            has_part,
        };
        self.dataset_ids.push(IdRef::new(dataset.id.clone()));
        self.graph.push(GraphNode::Dataset(dataset));

        let person_id = self.author_id.person_node_id();
        if self.person_ids.insert(person_id.clone()) {
            let profile = entry.author.clone().unwrap_or_default();
            self.graph.push(GraphNode::Person(PersonNode {
                id: person_id,
                family_name: profile.last_name,
                given_name: profile.first_name,
                email: profile.email,
            }));
        }

        if let Some(title) = entry.project_title() {
            if !self.categories.iter().any(|c| c == title) {
                self.categories.push(title.to_string());
            }
        }
    }

    /// Number of entry Datasets added so far
    pub fn entry_count(&self) -> usize {
        self.dataset_ids.len()
    }

    /// Append the root data entity and return the document
    pub fn finish(mut self) -> AuthorGraph {
        self.graph
            .push(GraphNode::Dataset(DatasetNode::root(self.dataset_ids)));

        let document = CrateDocument {
            context: RO_CRATE_CONTEXT.to_string(),
            graph: self.graph,
        };
        let persons = document.persons().cloned().collect();

        AuthorGraph {
            document,
            categories: self.categories,
            persons,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::crate_graph::node::{DESCRIPTOR_ID, ROOT_ID};
    use serde_json::json;

    fn entry(value: serde_json::Value) -> Entry {
        serde_json::from_value(value).unwrap()
    }

    fn file(id: &str) -> FileNode {
        FileNode {
            id: id.to_string(),
            name: "f".to_string(),
            content_size: None,
            encoding_format: None,
            sha256: Some("00".to_string()),
        }
    }

    fn builder() -> CrateGraphBuilder {
        CrateGraphBuilder::new(AuthorId::new("7").unwrap(), "2024-01-01T00:00:00+0000")
    }

    #[test]
    fn test_descriptor_first_root_last() {
        let mut b = builder();
        b.add_entry(&entry(json!({"id": "1", "author_id": "7"})), vec![], &[]);
        let graph = b.finish().document;

        assert_eq!(graph.graph.first().unwrap().id(), DESCRIPTOR_ID);
        assert_eq!(graph.graph.last().unwrap().id(), ROOT_ID);
        assert_eq!(graph.context, RO_CRATE_CONTEXT);
    }

    #[test]
    fn test_same_author_entries_share_one_person() {
        let mut b = builder();
        let author = json!({"first_name": "Ada", "last_name": "Lovelace", "email": "ada@example.org"});
        b.add_entry(
            &entry(json!({"id": "1", "author_id": "7", "author": author.clone()})),
            vec![],
            &[],
        );
        b.add_entry(
            &entry(json!({"id": "2", "author_id": "7", "author": author})),
            vec![],
            &[],
        );
        let graph = b.finish();

        assert_eq!(graph.persons.len(), 1);
        assert_eq!(graph.persons[0].family_name.as_deref(), Some("Lovelace"));

        let datasets: Vec<_> = graph
            .document
            .datasets()
            .filter(|d| d.id != ROOT_ID)
            .map(|d| d.id.clone())
            .collect();
        assert_eq!(datasets, vec!["./1", "./2"]);

        let root_parts: Vec<_> = graph
            .document
            .root()
            .unwrap()
            .has_part
            .iter()
            .map(|r| r.id.clone())
            .collect();
        assert_eq!(root_parts, datasets);
    }

    #[test]
    fn test_dataset_fields() {
        let mut b = builder();
        let e = entry(json!({
            "id": "100",
            "author_id": "7",
            "title": "Buffer prep",
            "creation_date": "2023-01-02",
            "version_date": "2023-01-03",
            "tags": ["a", "b"],
            "project": {"title": "Proteomics"}
        }));
        b.add_entry(
            &e,
            vec![file("./100/e1"), file("./100/e2")],
            &["Hello".to_string(), " world".to_string()],
        );
        let graph = b.finish();

        let dataset = graph
            .document
            .datasets()
            .find(|d| d.id == "./100")
            .unwrap()
            .clone();
        assert_eq!(dataset.name.as_deref(), Some("Buffer prep"));
        assert_eq!(dataset.author, Some(IdRef::new("author://7")));
        assert_eq!(dataset.text.as_deref(), Some("Hello world"));
        assert_eq!(dataset.keywords.as_deref(), Some("a,b,Proteomics"));
        assert_eq!(dataset.date_created.as_deref(), Some("2023-01-02"));
        assert_eq!(dataset.date_modified.as_deref(), Some("2023-01-03"));
        assert_eq!(
            dataset.has_part,
            vec![IdRef::new("./100/e1"), IdRef::new("./100/e2")]
        );
        assert_eq!(graph.document.files().count(), 2);
        assert_eq!(graph.categories, vec!["Proteomics"]);
    }

    #[test]
    fn test_categories_deduplicated_in_first_seen_order() {
        let mut b = builder();
        for (id, project) in [("1", "B"), ("2", "A"), ("3", "B")] {
            b.add_entry(
                &entry(json!({"id": id, "author_id": "7", "project": {"title": project}})),
                vec![],
                &[],
            );
        }
        assert_eq!(b.entry_count(), 3);
        assert_eq!(b.finish().categories, vec!["B", "A"]);
    }

    #[test]
    fn test_person_without_profile_has_only_id() {
        let mut b = builder();
        b.add_entry(&entry(json!({"id": "1", "author_id": "7"})), vec![], &[]);
        let graph = b.finish();
        assert_eq!(graph.persons[0].summary_line(), "author://7 |  |  | ");
    }

    #[test]
    fn test_serialized_document_shape() {
        let mut b = builder();
        b.add_entry(&entry(json!({"id": "1", "author_id": "7", "title": "T"})), vec![], &[]);
        let value = serde_json::to_value(b.finish().document).unwrap();

        assert_eq!(value["@context"], json!(RO_CRATE_CONTEXT));
        let types: Vec<_> = value["@graph"]
            .as_array()
            .unwrap()
            .iter()
            .map(|n| n["@type"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(types, vec!["CreativeWork", "Dataset", "Person", "Dataset"]);
    }
}
