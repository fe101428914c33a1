//! Tabular dataset abstraction for categorical records.
//!
//! Every value in a [`Table`] is a canonical `String` compared by equality,
//! including values that look numeric. Canonicalization happens exactly once
//! at the JSON boundary (see [`canonical_value`]), so a feature's domain
//! cannot fragment between training and prediction.

use std::collections::{HashMap, HashSet};

use serde_json::Value;
use thiserror::Error;

pub mod loader;

/// A single record mapping feature names to canonical categorical values.
///
/// Records may be partial: prediction skips trained features the record
/// lacks and ignores keys the model never saw.
pub type Record = HashMap<String, String>;

/// Errors raised while constructing a [`Table`].
#[derive(Debug, Error)]
pub enum TableError {
    /// A row's width does not match the column count.
    #[error("row {row} has {got} values but the table has {expected} columns")]
    RaggedRow {
        row: usize,
        got: usize,
        expected: usize,
    },
    /// Two columns share the same name.
    #[error("duplicate column name '{0}'")]
    DuplicateColumn(String),
}

/// In-memory table of categorical values: named columns, uniform rows.
#[derive(Debug, Clone, Default)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Build a table, checking that every row has one value per column.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<String>>) -> Result<Self, TableError> {
        let mut seen = HashSet::new();
        for column in &columns {
            if !seen.insert(column.as_str()) {
                return Err(TableError::DuplicateColumn(column.clone()));
            }
        }
        for (row_idx, row) in rows.iter().enumerate() {
            if row.len() != columns.len() {
                return Err(TableError::RaggedRow {
                    row: row_idx,
                    got: row.len(),
                    expected: columns.len(),
                });
            }
        }
        Ok(Self { columns, rows })
    }

    /// Column names in declaration order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Index of a named column, if present.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column == name)
    }

    /// Number of rows.
    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    /// True when the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Value at (`row`, `column`).
    pub fn value(&self, row: usize, column: usize) -> &str {
        &self.rows[row][column]
    }

    /// Materialize one row as a [`Record`].
    pub fn record(&self, row: usize) -> Record {
        self.columns
            .iter()
            .zip(&self.rows[row])
            .map(|(column, value)| (column.clone(), value.clone()))
            .collect()
    }

    /// Materialize one row as a [`Record`], leaving out one column.
    ///
    /// Used to split a labeled row into its feature part.
    pub fn record_without(&self, row: usize, column: usize) -> Record {
        self.columns
            .iter()
            .zip(&self.rows[row])
            .enumerate()
            .filter(|(idx, _)| *idx != column)
            .map(|(_, (name, value))| (name.clone(), value.clone()))
            .collect()
    }
}

/// Canonicalize a JSON scalar into the string form used for all domain and
/// likelihood lookups.
///
/// Strings pass through unchanged; numbers and booleans use their JSON
/// display form, so `1` and `"1"` intentionally collide while `1` and `1.0`
/// stay distinct (matching JSON's own distinction). Objects, arrays, and
/// `null` have no canonical form and yield `None`.
pub fn canonical_value(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| (*value).to_string()).collect()
    }

    #[test]
    fn new_rejects_ragged_rows() {
        let result = Table::new(
            strings(&["a", "b"]),
            vec![strings(&["1", "2"]), strings(&["3"])],
        );
        assert!(matches!(
            result,
            Err(TableError::RaggedRow {
                row: 1,
                got: 1,
                expected: 2
            })
        ));
    }

    #[test]
    fn new_rejects_duplicate_columns() {
        let result = Table::new(strings(&["a", "a"]), Vec::new());
        assert!(matches!(result, Err(TableError::DuplicateColumn(name)) if name == "a"));
    }

    #[test]
    fn record_without_drops_the_target_column() {
        let table = Table::new(
            strings(&["color", "size", "label"]),
            vec![strings(&["red", "small", "yes"])],
        )
        .unwrap();
        let record = table.record_without(0, 2);
        assert_eq!(record.len(), 2);
        assert_eq!(record.get("color").map(String::as_str), Some("red"));
        assert!(!record.contains_key("label"));
    }

    #[test]
    fn canonical_value_covers_scalars() {
        assert_eq!(canonical_value(&json!("red")), Some("red".to_string()));
        assert_eq!(canonical_value(&json!(1)), Some("1".to_string()));
        assert_eq!(canonical_value(&json!(1.0)), Some("1.0".to_string()));
        assert_eq!(canonical_value(&json!(true)), Some("true".to_string()));
        assert_eq!(canonical_value(&json!(null)), None);
        assert_eq!(canonical_value(&json!([1])), None);
    }
}
