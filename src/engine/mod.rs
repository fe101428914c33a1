//! Classification engine wrapping a single naive Bayes model.
//!
//! The engine owns at most one trained model plus the target column
//! remembered from training. Builds replace the model wholesale; a failed
//! build leaves the previous state untouched. The engine itself is
//! synchronous and lock-free; a surrounding service that shares one engine
//! across requests is expected to guard it with a coarse mutex.

use serde::Serialize;
use thiserror::Error;
use tracing::info;

use crate::dataset::{Record, Table};
use crate::metrics::{ConfusionMatrix, precision_recall_by_class};
use crate::nb::{NaiveBayesModel, ValidationError, train};

/// Errors surfaced by engine operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// Input failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// A predict or scoring call arrived before a successful build.
    #[error("model has not been trained")]
    NotTrained,
}

/// Introspection snapshot for external callers.
///
/// Always available; `trained` is false and the collections are empty until
/// a build succeeds.
#[derive(Debug, Clone, Serialize)]
pub struct ClassifierInfo {
    pub trained: bool,
    pub target_column: Option<String>,
    pub feature_names: Vec<String>,
    pub classes: Vec<String>,
    pub training_rows: u64,
}

/// Per-class slice of an [`AccuracyReport`].
#[derive(Debug, Clone, Serialize)]
pub struct ClassReport {
    pub class: String,
    pub support: u32,
    pub precision: f64,
    pub recall: f64,
}

/// Result of scoring a labeled test set.
#[derive(Debug, Clone, Serialize)]
pub struct AccuracyReport {
    /// Number of test rows scored.
    pub total: usize,
    /// Rows whose prediction matched the label.
    pub correct: usize,
    /// `correct / total`, in `[0, 1]`.
    pub accuracy: f64,
    /// Precision/recall per trained class, in first-seen class order.
    pub per_class: Vec<ClassReport>,
}

/// Lifecycle wrapper around the naive Bayes model.
#[derive(Debug, Default)]
pub struct ClassificationEngine {
    model: Option<NaiveBayesModel>,
    target_column: Option<String>,
}

impl ClassificationEngine {
    /// Create an engine with no trained model.
    pub fn new() -> Self {
        Self::default()
    }

    /// Train a model from `data`, replacing any previous model on success.
    ///
    /// `target_column` becomes the default for later scoring calls. On any
    /// validation failure the engine keeps its previous model and target
    /// column, so a failed rebuild never corrupts a working engine.
    pub fn build_model(&mut self, data: &Table, target_column: &str) -> Result<(), EngineError> {
        let model = train(data, target_column)?;
        info!(
            rows = data.n_rows(),
            features = model.features.len(),
            classes = model.classes.len(),
            target = target_column,
            "classification model built"
        );
        self.model = Some(model);
        self.target_column = Some(target_column.to_string());
        Ok(())
    }

    /// Classify one record, returning the predicted class label.
    pub fn classify_single_record(&self, record: &Record) -> Result<String, EngineError> {
        let model = self.model.as_ref().ok_or(EngineError::NotTrained)?;
        Ok(model.predict_class(record).to_string())
    }

    /// Posterior log-scores keyed by class label, in first-seen order.
    ///
    /// Scores rank classes; they are not normalized probabilities.
    pub fn posterior_scores(&self, record: &Record) -> Result<Vec<(String, f64)>, EngineError> {
        let model = self.model.as_ref().ok_or(EngineError::NotTrained)?;
        Ok(model
            .classes
            .iter()
            .cloned()
            .zip(model.posterior_scores(record))
            .collect())
    }

    /// Score the model against a labeled test set.
    ///
    /// `target_column` falls back to the column remembered from training.
    /// Each row is classified through the same routine as
    /// [`classify_single_record`], in row order. Rows whose label the model
    /// never saw count toward `total` but can never be correct.
    pub fn test_model_accuracy(
        &self,
        test_data: &Table,
        target_column: Option<&str>,
    ) -> Result<AccuracyReport, EngineError> {
        let model = self.model.as_ref().ok_or(EngineError::NotTrained)?;
        let target = match target_column {
            Some(name) => name,
            None => self.target_column.as_deref().ok_or(EngineError::NotTrained)?,
        };
        let target_idx = test_data
            .column_index(target)
            .ok_or_else(|| ValidationError::MissingTargetColumn(target.to_string()))?;
        if test_data.is_empty() {
            return Err(ValidationError::EmptyTestSet.into());
        }

        let mut cm = ConfusionMatrix::new(model.classes.len());
        let mut correct = 0usize;
        for row_idx in 0..test_data.n_rows() {
            let record = test_data.record_without(row_idx, target_idx);
            let predicted_idx = model.predict_index(&record);
            let actual = test_data.value(row_idx, target_idx);
            if model.classes[predicted_idx] == actual {
                correct += 1;
            }
            if let Some(actual_idx) = model.class_index(actual) {
                cm.add(actual_idx, predicted_idx);
            }
        }

        let total = test_data.n_rows();
        let ratio = correct as f64 / total as f64;
        let per_class = precision_recall_by_class(&cm)
            .into_iter()
            .zip(&model.classes)
            .map(|(stats, class)| ClassReport {
                class: class.clone(),
                support: stats.support,
                precision: stats.precision,
                recall: stats.recall,
            })
            .collect();
        info!(
            total,
            correct,
            accuracy = ratio,
            "model accuracy test complete"
        );
        Ok(AccuracyReport {
            total,
            correct,
            accuracy: ratio,
            per_class,
        })
    }

    /// Describe the trained model, or report an untrained engine.
    pub fn info(&self) -> ClassifierInfo {
        match &self.model {
            Some(model) => ClassifierInfo {
                trained: true,
                target_column: self.target_column.clone(),
                feature_names: model.feature_names(),
                classes: model.classes.clone(),
                training_rows: model.class_counts.iter().sum(),
            },
            None => ClassifierInfo {
                trained: false,
                target_column: None,
                feature_names: Vec::new(),
                classes: Vec::new(),
                training_rows: 0,
            },
        }
    }

    /// True once a build has succeeded.
    pub fn is_model_ready(&self) -> bool {
        self.model.is_some()
    }

    /// Borrow the trained model, if any.
    pub fn model(&self) -> Option<&NaiveBayesModel> {
        self.model.as_ref()
    }
}
