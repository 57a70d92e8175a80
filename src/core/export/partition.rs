//! Grouping of entries by author

use crate::domain::{AuthorId, Entry, RejectedEntry};
use std::collections::BTreeMap;

/// Entries grouped by author, plus the entries no author could be read for
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuthorPartition {
    /// Groups in ascending author id order; each keeps source order
    pub groups: BTreeMap<AuthorId, Vec<Entry>>,

    pub rejected: Vec<RejectedEntry>,
}

impl AuthorPartition {
    pub fn author_count(&self) -> usize {
        self.groups.len()
    }

    pub fn entry_count(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }
}

/// Group `entries` by author id
///
/// Every entry lands in exactly one group, or in `rejected` when it carries
/// no usable author id. No author is invented for such entries.
///
/// # Examples
///
/// ```
/// use eln_export::core::export::partition;
/// use eln_export::domain::Entry;
///
/// let entries: Vec<Entry> = serde_json::from_str(
///     r#"[{"id": "1", "author_id": "b"}, {"id": "2", "author_id": "a"}, {"id": "3"}]"#,
/// ).unwrap();
///
/// let partition = partition(entries);
/// assert_eq!(partition.author_count(), 2);
/// assert_eq!(partition.rejected.len(), 1);
/// ```
pub fn partition(entries: Vec<Entry>) -> AuthorPartition {
    let mut result = AuthorPartition::default();

    for entry in entries {
        match entry.author_id.clone() {
            Some(author_id) => result.groups.entry(author_id).or_default().push(entry),
            None => {
                tracing::warn!(entry_id = %entry.id, "Entry has no author id, rejected");
                result.rejected.push(RejectedEntry {
                    entry_id: entry.id.to_string(),
                    reason: "missing or invalid author_id".to_string(),
                });
            }
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn entries(value: serde_json::Value) -> Vec<Entry> {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_groups_are_stable_and_ordered() {
        let result = partition(entries(json!([
            {"id": "1", "author_id": "20"},
            {"id": "2", "author_id": "10"},
            {"id": "3", "author_id": "20"},
            {"id": "4", "author_id": "10"}
        ])));

        let authors: Vec<_> = result.groups.keys().map(|a| a.as_str()).collect();
        assert_eq!(authors, vec!["10", "20"]);

        let ids: Vec<_> = result.groups[&AuthorId::new("20").unwrap()]
            .iter()
            .map(|e| e.id.as_str())
            .collect();
        assert_eq!(ids, vec!["1", "3"]);
        assert_eq!(result.entry_count(), 4);
    }

    #[test]
    fn test_partition_is_total_and_disjoint() {
        let input = entries(json!([
            {"id": "1", "author_id": "a"},
            {"id": "2"},
            {"id": "3", "author_id": "b"},
            {"id": "4", "author_id": ""}
        ]));
        let result = partition(input);

        assert_eq!(result.entry_count() + result.rejected.len(), 4);
        let rejected: Vec<_> = result.rejected.iter().map(|r| r.entry_id.as_str()).collect();
        assert_eq!(rejected, vec!["2", "4"]);
    }

    #[test]
    fn test_empty_input() {
        let result = partition(Vec::new());
        assert_eq!(result.author_count(), 0);
        assert!(result.rejected.is_empty());
    }
}
