//! Training pass for the categorical naive Bayes model.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use thiserror::Error;

use super::{FeatureTable, NaiveBayesModel};
use crate::dataset::Table;

/// Input validation failures for training and scoring calls.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The dataset has no rows.
    #[error("dataset has no rows")]
    EmptyDataset,
    /// The requested target column is not present in the dataset.
    #[error("target column '{0}' not found in dataset")]
    MissingTargetColumn(String),
    /// Removing the target column leaves nothing to train on.
    #[error("no feature columns besides target '{0}'")]
    NoFeatureColumns(String),
    /// A labeled test set must contain at least one row.
    #[error("test dataset has no rows")]
    EmptyTestSet,
    /// The trained statistics violated a structural invariant.
    #[error("trained model failed validation: {0}")]
    InvalidModel(String),
}

/// Train a model from `table`, using `target_column` as the label column.
///
/// Every other column becomes a feature. A single counting pass collects
/// classes (first-seen order), per-class row counts, priors, and per-feature
/// value domains with (value, class) co-occurrence counts.
pub fn train(table: &Table, target_column: &str) -> Result<NaiveBayesModel, ValidationError> {
    if table.is_empty() {
        return Err(ValidationError::EmptyDataset);
    }
    let target_idx = table
        .column_index(target_column)
        .ok_or_else(|| ValidationError::MissingTargetColumn(target_column.to_string()))?;
    let feature_columns: Vec<usize> = (0..table.columns().len())
        .filter(|&idx| idx != target_idx)
        .collect();
    if feature_columns.is_empty() {
        return Err(ValidationError::NoFeatureColumns(target_column.to_string()));
    }

    let mut classes: Vec<String> = Vec::new();
    let mut class_lookup: HashMap<String, usize> = HashMap::new();
    let mut labels: Vec<usize> = Vec::with_capacity(table.n_rows());
    for row_idx in 0..table.n_rows() {
        let label = table.value(row_idx, target_idx);
        let class_idx = match class_lookup.get(label) {
            Some(&idx) => idx,
            None => {
                let idx = classes.len();
                classes.push(label.to_string());
                class_lookup.insert(label.to_string(), idx);
                idx
            }
        };
        labels.push(class_idx);
    }

    let mut class_counts = vec![0u64; classes.len()];
    for &class_idx in &labels {
        class_counts[class_idx] += 1;
    }
    let total = table.n_rows() as f64;
    let priors: Vec<f64> = class_counts
        .iter()
        .map(|&count| count as f64 / total)
        .collect();

    let mut features = Vec::with_capacity(feature_columns.len());
    for &col_idx in &feature_columns {
        let mut domain: Vec<String> = Vec::new();
        let mut counts: HashMap<String, Vec<u64>> = HashMap::new();
        for (row_idx, &class_idx) in labels.iter().enumerate() {
            let value = table.value(row_idx, col_idx);
            let per_class = match counts.entry(value.to_string()) {
                Entry::Occupied(entry) => entry.into_mut(),
                Entry::Vacant(entry) => {
                    domain.push(value.to_string());
                    entry.insert(vec![0u64; classes.len()])
                }
            };
            per_class[class_idx] += 1;
        }
        features.push(FeatureTable {
            name: table.columns()[col_idx].clone(),
            domain,
            counts,
        });
    }

    let model = NaiveBayesModel {
        classes,
        class_counts,
        priors,
        features,
    };
    model.validate().map_err(ValidationError::InvalidModel)?;
    Ok(model)
}
