//! Decomposition of TABLE and WELL_PLATE documents into CSV extracts
//!
//! A table document holds `content.sheets`, each sheet a grid
//! `data.dataTable{row -> {column -> {value}}}`. Every sheet with a grid
//! becomes one CSV extract named `<sheet>.csv`.
//!
//! The output is a pure function of the document: sheets are taken in name
//! order, rows and columns in numeric-aware key order, so repeated runs over
//! the same document produce identical bytes.

use crate::domain::metadata::{table_sheets, Sheet};
use serde_json::{Map, Value};
use std::cmp::Ordering;
use std::collections::BTreeSet;

/// Placeholder for a cell that exists but carries no value
pub const MISSING_VALUE: &str = "N/A";

/// One CSV extract of a sheet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetExtract {
    /// `<sheet name>.csv`
    pub name: String,
    pub csv: String,
}

/// Result of decomposing one table document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableExtracts {
    pub extracts: Vec<SheetExtract>,

    /// `false` when the document has no `content.sheets` at all
    pub has_sheets: bool,

    /// Sheets skipped because they hold no `dataTable`
    pub skipped_sheets: Vec<String>,
}

/// Split a table document into per-sheet CSV extracts
pub fn decompose_table(document: &Value) -> TableExtracts {
    let Some(sheets) = table_sheets(document) else {
        return TableExtracts::default();
    };

    let mut result = TableExtracts {
        has_sheets: true,
        ..Default::default()
    };

    let mut names: Vec<&String> = sheets.keys().collect();
    names.sort();

    for name in names {
        let sheet: Sheet = serde_json::from_value(sheets[name].clone()).unwrap_or_default();
        match sheet.data.and_then(|d| d.data_table) {
            Some(table) => result.extracts.push(SheetExtract {
                name: format!("{name}.csv"),
                csv: table_to_csv(&table),
            }),
            None => result.skipped_sheets.push(name.clone()),
        }
    }

    result
}

/// Render one `dataTable` grid as CSV with a header row of column keys
fn table_to_csv(table: &Map<String, Value>) -> String {
    let mut row_keys: Vec<&String> = table.keys().collect();
    row_keys.sort_by(|a, b| numeric_aware_cmp(a, b));

    let columns: BTreeSet<ColumnKey> = table
        .values()
        .filter_map(Value::as_object)
        .flat_map(|row| row.keys().map(|k| ColumnKey(k.as_str())))
        .collect();

    if columns.is_empty() {
        return String::new();
    }

    let mut out = String::new();
    push_record(&mut out, columns.iter().map(|c| c.0.to_string()));

    for key in row_keys {
        let row = table[key.as_str()].as_object();
        push_record(
            &mut out,
            columns.iter().map(|col| match row.and_then(|r| r.get(col.0)) {
                Some(cell) => cell_value(cell),
                None => String::new(),
            }),
        );
    }

    out
}

fn cell_value(cell: &Value) -> String {
    match cell.get("value") {
        None => MISSING_VALUE.to_string(),
        Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

fn push_record(out: &mut String, fields: impl Iterator<Item = String>) {
    let line: Vec<String> = fields.map(|f| escape_field(&f)).collect();
    out.push_str(&line.join(","));
    out.push('\n');
}

/// Quote a field only when it holds a delimiter, quote or line break
fn escape_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Numeric keys first, in numeric order; other keys after them, lexicographically
fn numeric_aware_cmp(a: &str, b: &str) -> Ordering {
    match (a.parse::<u64>(), b.parse::<u64>()) {
        (Ok(x), Ok(y)) => x.cmp(&y).then_with(|| a.cmp(b)),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    }
}

#[derive(Debug, PartialEq, Eq)]
struct ColumnKey<'a>(&'a str);

impl Ord for ColumnKey<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        numeric_aware_cmp(self.0, other.0)
    }
}

impl PartialOrd for ColumnKey<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn table(sheets: Value) -> Value {
        json!({"id": "t-1", "content": {"sheets": sheets}})
    }

    #[test]
    fn test_single_sheet() {
        let doc = table(json!({
            "Sheet1": {"data": {"dataTable": {
                "0": {"0": {"value": "a"}, "1": {"value": "b"}},
                "1": {"0": {"value": 1}, "1": {"value": 2.5}}
            }}}
        }));

        let result = decompose_table(&doc);
        assert!(result.has_sheets);
        assert_eq!(
            result.extracts,
            vec![SheetExtract {
                name: "Sheet1.csv".to_string(),
                csv: "0,1\na,b\n1,2.5\n".to_string(),
            }]
        );
    }

    #[test]
    fn test_missing_value_and_missing_cell() {
        let doc = table(json!({
            "S": {"data": {"dataTable": {
                "0": {"0": {"style": "bold"}, "1": {"value": "x"}},
                "1": {"0": {"value": "y"}}
            }}}
        }));

        let csv = &decompose_table(&doc).extracts[0].csv;
        assert_eq!(csv, "0,1\nN/A,x\ny,\n");
    }

    #[test]
    fn test_rows_and_columns_in_numeric_order() {
        let doc = table(json!({
            "S": {"data": {"dataTable": {
                "10": {"2": {"value": "c"}, "10": {"value": "d"}},
                "2": {"2": {"value": "a"}, "10": {"value": "b"}}
            }}}
        }));

        let csv = &decompose_table(&doc).extracts[0].csv;
        assert_eq!(csv, "2,10\na,b\nc,d\n");
    }

    #[test]
    fn test_sheets_in_name_order_and_missing_data_table_skipped() {
        let doc = table(json!({
            "b": {"data": {"dataTable": {"0": {"0": {"value": 1}}}}},
            "a": {"data": {"dataTable": {"0": {"0": {"value": 2}}}}},
            "c": {"data": {}}
        }));

        let result = decompose_table(&doc);
        let names: Vec<_> = result.extracts.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["a.csv", "b.csv"]);
        assert_eq!(result.skipped_sheets, vec!["c"]);
    }

    #[test]
    fn test_document_without_sheets() {
        let result = decompose_table(&json!({"id": "t", "content": {}}));
        assert!(!result.has_sheets);
        assert!(result.extracts.is_empty());

        let result = decompose_table(&json!({"id": "t"}));
        assert!(!result.has_sheets);
    }

    #[test]
    fn test_quoting() {
        assert_eq!(escape_field("plain"), "plain");
        assert_eq!(escape_field("a,b"), "\"a,b\"");
        assert_eq!(escape_field("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(escape_field("two\nlines"), "\"two\nlines\"");
    }

    #[test]
    fn test_null_value_is_empty() {
        assert_eq!(cell_value(&json!({"value": null})), "");
        assert_eq!(cell_value(&json!({"value": true})), "true");
    }

    #[test]
    fn test_empty_grid_renders_empty() {
        let doc = table(json!({"S": {"data": {"dataTable": {}}}}));
        let result = decompose_table(&doc);
        assert_eq!(result.extracts[0].csv, "");
    }

    #[test]
    fn test_decomposition_is_idempotent() {
        let doc = table(json!({
            "S": {"data": {"dataTable": {"0": {"0": {"value": "x,y"}}, "1": {"0": {}}}}}
        }));
        assert_eq!(decompose_table(&doc), decompose_table(&doc.clone()));
    }
}
