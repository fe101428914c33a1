//! End-to-end engine flow over a JSONL dataset on disk.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use bayesline::dataset::loader::load_table;
use bayesline::engine::{ClassificationEngine, EngineError};
use tempfile::tempdir;

const TRAIN_JSONL: &str = r#"{"outlook":"sunny","windy":false,"play":"no"}
{"outlook":"sunny","windy":true,"play":"no"}
{"outlook":"overcast","windy":false,"play":"yes"}
{"outlook":"rainy","windy":false,"play":"yes"}
{"outlook":"rainy","windy":true,"play":"yes"}
{"outlook":"overcast","windy":true,"play":"yes"}
"#;

const TEST_JSONL: &str = r#"{"outlook":"sunny","windy":true,"play":"no"}
{"outlook":"overcast","windy":false,"play":"yes"}
{"outlook":"rainy","windy":true,"play":"yes"}
"#;

fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).unwrap();
    path
}

fn record(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(key, value)| ((*key).to_string(), (*value).to_string()))
        .collect()
}

#[test]
fn train_score_and_classify_from_disk() {
    let dir = tempdir().unwrap();
    let train_path = write_file(dir.path(), "train.jsonl", TRAIN_JSONL);
    let test_path = write_file(dir.path(), "test.jsonl", TEST_JSONL);

    let train_table = load_table(&train_path).unwrap();
    let mut engine = ClassificationEngine::new();
    assert!(!engine.is_model_ready());
    engine.build_model(&train_table, "play").unwrap();
    assert!(engine.is_model_ready());

    let info = engine.info();
    assert!(info.trained);
    assert_eq!(info.target_column.as_deref(), Some("play"));
    assert_eq!(info.training_rows, 6);
    let mut features = info.feature_names.clone();
    features.sort_unstable();
    assert_eq!(features, vec!["outlook".to_string(), "windy".to_string()]);
    assert_eq!(
        info.classes,
        vec!["no".to_string(), "yes".to_string()]
    );

    // Booleans were canonicalized at load time, so records use "true"/"false".
    let predicted = engine
        .classify_single_record(&record(&[("outlook", "overcast"), ("windy", "false")]))
        .unwrap();
    assert_eq!(predicted, "yes");

    let test_table = load_table(&test_path).unwrap();
    let report = engine.test_model_accuracy(&test_table, None).unwrap();
    assert_eq!(report.total, 3);
    assert!(report.correct <= report.total);
    assert!((0.0..=1.0).contains(&report.accuracy));
    assert_eq!(report.per_class.len(), 2);
}

#[test]
fn unseen_feature_value_still_classifies() {
    let dir = tempdir().unwrap();
    let train_path = write_file(dir.path(), "train.jsonl", TRAIN_JSONL);
    let train_table = load_table(&train_path).unwrap();

    let mut engine = ClassificationEngine::new();
    engine.build_model(&train_table, "play").unwrap();

    // "foggy" never appears in training; smoothing keeps every class scored.
    let scores = engine
        .posterior_scores(&record(&[("outlook", "foggy"), ("windy", "true")]))
        .unwrap();
    assert_eq!(scores.len(), 2);
    assert!(scores.iter().all(|(_, score)| score.is_finite()));
    engine
        .classify_single_record(&record(&[("outlook", "foggy")]))
        .unwrap();
}

#[test]
fn failed_rebuild_retains_the_working_model() {
    let dir = tempdir().unwrap();
    let train_path = write_file(dir.path(), "train.jsonl", TRAIN_JSONL);
    let train_table = load_table(&train_path).unwrap();

    let mut engine = ClassificationEngine::new();
    engine.build_model(&train_table, "play").unwrap();
    let before = engine
        .classify_single_record(&record(&[("outlook", "sunny"), ("windy", "true")]))
        .unwrap();

    let err = engine.build_model(&train_table, "weather").unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));
    assert!(engine.is_model_ready());
    let after = engine
        .classify_single_record(&record(&[("outlook", "sunny"), ("windy", "true")]))
        .unwrap();
    assert_eq!(before, after);
}

#[test]
fn untrained_engine_reports_not_trained() {
    let engine = ClassificationEngine::new();
    let err = engine
        .classify_single_record(&record(&[("outlook", "sunny")]))
        .unwrap_err();
    assert_eq!(err, EngineError::NotTrained);

    let info = engine.info();
    assert!(!info.trained);
    assert!(info.classes.is_empty());
    assert_eq!(info.training_rows, 0);
}
