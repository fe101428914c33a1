//! JSONL table loader for labeled datasets.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use serde_json::{Map, Value};
use thiserror::Error;

use super::{Table, TableError, canonical_value};

/// Errors raised while loading a JSONL table.
#[derive(Debug, Error)]
pub enum TableLoadError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("line {line}: {source}")]
    Json {
        line: usize,
        source: serde_json::Error,
    },
    #[error("line {line}: expected a JSON object")]
    NotAnObject { line: usize },
    #[error("line {line}: column '{column}' has no canonical scalar value")]
    BadValue { line: usize, column: String },
    #[error("line {line}: columns do not match the first record")]
    ColumnMismatch { line: usize },
    #[error("file contains no records")]
    Empty,
    #[error(transparent)]
    Table(#[from] TableError),
}

/// Load a JSONL file (one JSON object per line) into a [`Table`].
///
/// The first record fixes the column set; every later record must carry
/// exactly the same keys. Blank lines are skipped.
pub fn load_table(path: &Path) -> Result<Table, TableLoadError> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);

    let mut columns: Vec<String> = Vec::new();
    let mut rows: Vec<Vec<String>> = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let line_no = idx + 1;
        let value: Value = serde_json::from_str(&line).map_err(|source| TableLoadError::Json {
            line: line_no,
            source,
        })?;
        let Value::Object(object) = value else {
            return Err(TableLoadError::NotAnObject { line: line_no });
        };
        if columns.is_empty() {
            columns = object.keys().cloned().collect();
        }
        rows.push(row_from_object(&object, &columns, line_no)?);
    }
    if rows.is_empty() {
        return Err(TableLoadError::Empty);
    }
    Ok(Table::new(columns, rows)?)
}

fn row_from_object(
    object: &Map<String, Value>,
    columns: &[String],
    line: usize,
) -> Result<Vec<String>, TableLoadError> {
    if object.len() != columns.len() {
        return Err(TableLoadError::ColumnMismatch { line });
    }
    let mut row = Vec::with_capacity(columns.len());
    for column in columns {
        let value = object
            .get(column)
            .ok_or(TableLoadError::ColumnMismatch { line })?;
        let canonical = canonical_value(value).ok_or_else(|| TableLoadError::BadValue {
            line,
            column: column.clone(),
        })?;
        row.push(canonical);
    }
    Ok(row)
}
