//! Categorical naive Bayes classification engine.
//!
//! Trains from labeled tabular data, classifies individual records, and
//! scores accuracy against labeled test sets. All feature values are
//! treated as categories compared by equality; see [`dataset`] for the
//! canonicalization rules.

/// Application directory helpers.
pub mod app_dirs;
/// Tabular dataset abstraction and JSONL loading.
pub mod dataset;
/// Classification engine lifecycle, scoring, and introspection.
pub mod engine;
/// Logging setup for the CLI tools.
pub mod logging;
/// Evaluation metrics for classification models.
pub mod metrics;
/// Naive Bayes model training and prediction.
pub mod nb;
