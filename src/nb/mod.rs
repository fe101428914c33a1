//! Categorical naive Bayes model over tabular records.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::dataset::Record;

mod train;
pub use train::{ValidationError, train};

/// Co-occurrence statistics for one feature column.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureTable {
    /// Feature (column) name.
    pub name: String,
    /// Distinct values observed during training, in first-seen order.
    pub domain: Vec<String>,
    /// Per-value training counts, one entry per class (parallel to the
    /// model's `classes`).
    pub counts: HashMap<String, Vec<u64>>,
}

impl FeatureTable {
    /// Training count for `value` under class `class_idx` (0 when unseen).
    pub fn count(&self, value: &str, class_idx: usize) -> u64 {
        self.counts
            .get(value)
            .and_then(|per_class| per_class.get(class_idx))
            .copied()
            .unwrap_or(0)
    }
}

/// Trained categorical naive Bayes classifier.
///
/// All statistics are fixed at training time; an instance of this type is
/// immutable evidence that training succeeded. Conditional probabilities use
/// add-one smoothing over each feature's observed domain, so values never
/// seen for a (feature, class) pair still score nonzero.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NaiveBayesModel {
    /// Distinct target values in first-seen training order.
    pub classes: Vec<String>,
    /// Training rows per class (parallel to `classes`).
    pub class_counts: Vec<u64>,
    /// `P(class)` estimated from label frequencies (parallel to `classes`).
    pub priors: Vec<f64>,
    /// Per-feature statistics in feature column order.
    pub features: Vec<FeatureTable>,
}

impl NaiveBayesModel {
    /// Feature column names in training order.
    pub fn feature_names(&self) -> Vec<String> {
        self.features
            .iter()
            .map(|feature| feature.name.clone())
            .collect()
    }

    /// Index of a class label, if the model saw it during training.
    pub fn class_index(&self, class: &str) -> Option<usize> {
        self.classes.iter().position(|name| name == class)
    }

    /// Smoothed conditional probability `P(value | class)` for one feature.
    ///
    /// Seen and unseen values share one formula: `(count + 1) /
    /// (class_count + |domain|)`, with `count` defaulting to 0, so an unseen
    /// value reduces to the smoothing fallback rather than zeroing the
    /// posterior. Indices must come from this model.
    pub fn likelihood(&self, feature_idx: usize, value: &str, class_idx: usize) -> f64 {
        let feature = &self.features[feature_idx];
        let count = feature.count(value, class_idx);
        let denominator = self.class_counts[class_idx] as f64 + feature.domain.len() as f64;
        (count as f64 + 1.0) / denominator
    }

    /// Log-posterior score per class, parallel to `classes`.
    ///
    /// `ln(prior) + Σ ln(P(value | class))` over the trained features the
    /// record carries. Record keys the model never saw contribute nothing;
    /// trained features missing from the record are skipped. Scores rank
    /// classes but are not normalized probabilities.
    pub fn posterior_scores(&self, record: &Record) -> Vec<f64> {
        let mut scores: Vec<f64> = self.priors.iter().map(|prior| prior.ln()).collect();
        for (feature_idx, feature) in self.features.iter().enumerate() {
            let Some(value) = record.get(&feature.name) else {
                continue;
            };
            for (class_idx, score) in scores.iter_mut().enumerate() {
                *score += self.likelihood(feature_idx, value, class_idx).ln();
            }
        }
        scores
    }

    /// Index of the best-scoring class for a record.
    ///
    /// Ties resolve to the lowest index, i.e. the first-seen class.
    pub fn predict_index(&self, record: &Record) -> usize {
        argmax(&self.posterior_scores(record))
    }

    /// Best-scoring class label for a record.
    pub fn predict_class(&self, record: &Record) -> &str {
        &self.classes[self.predict_index(record)]
    }

    /// Validate structural invariants of the trained model.
    pub fn validate(&self) -> Result<(), String> {
        if self.classes.is_empty() {
            return Err("No classes defined".to_string());
        }
        if self.class_counts.len() != self.classes.len() {
            return Err("class_counts length must match classes length".to_string());
        }
        if self.priors.len() != self.classes.len() {
            return Err("priors length must match classes length".to_string());
        }
        let prior_sum: f64 = self.priors.iter().sum();
        if (prior_sum - 1.0).abs() > 1e-9 {
            return Err(format!("priors sum to {prior_sum}, expected 1"));
        }
        if self.features.is_empty() {
            return Err("No feature tables".to_string());
        }
        for feature in &self.features {
            if feature.domain.is_empty() {
                return Err(format!("Feature '{}' has an empty domain", feature.name));
            }
            if feature.domain.len() != feature.counts.len() {
                return Err(format!(
                    "Feature '{}' domain and count table disagree",
                    feature.name
                ));
            }
            for (value, per_class) in &feature.counts {
                if per_class.len() != self.classes.len() {
                    return Err(format!(
                        "Feature '{}' value '{value}' has {} class counts but expected {}",
                        feature.name,
                        per_class.len(),
                        self.classes.len()
                    ));
                }
            }
        }
        Ok(())
    }
}

fn argmax(scores: &[f64]) -> usize {
    let mut best_idx = 0usize;
    let mut best_val = f64::NEG_INFINITY;
    for (idx, &score) in scores.iter().enumerate() {
        if score > best_val {
            best_val = score;
            best_idx = idx;
        }
    }
    best_idx
}
