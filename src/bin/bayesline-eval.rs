//! Developer utility to train a classifier and score it against a test set.

use std::path::PathBuf;

use bayesline::dataset::loader::load_table;
use bayesline::engine::ClassificationEngine;
use bayesline::logging;
use bayesline::metrics::{ConfusionMatrix, f1_score};

fn main() {
    if let Err(err) = run() {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

#[derive(Debug, Clone)]
struct CliOptions {
    train_path: PathBuf,
    target: String,
    test_path: Option<PathBuf>,
    test_target: Option<String>,
}

fn run() -> Result<(), String> {
    let options = parse_args(std::env::args().skip(1).collect())?;
    if let Err(err) = logging::init() {
        eprintln!("Logging unavailable: {err}");
    }

    let train_table = load_table(&options.train_path).map_err(|err| err.to_string())?;
    let mut engine = ClassificationEngine::new();
    engine
        .build_model(&train_table, &options.target)
        .map_err(|err| err.to_string())?;

    let (test_table, split_name) = match &options.test_path {
        Some(path) => (load_table(path).map_err(|err| err.to_string())?, "test"),
        None => (train_table, "train (no --test supplied)"),
    };
    let report = engine
        .test_model_accuracy(&test_table, options.test_target.as_deref())
        .map_err(|err| err.to_string())?;

    println!("split: {split_name}");
    println!("records: {}  correct: {}", report.total, report.correct);
    println!("accuracy: {:.4}", report.accuracy);
    for entry in &report.per_class {
        println!(
            "class {:<16}  precision={:.3}  recall={:.3}  f1={:.3}  support={}",
            entry.class,
            entry.precision,
            entry.recall,
            f1_score(entry.precision, entry.recall),
            entry.support
        );
    }

    let model = engine
        .model()
        .ok_or_else(|| "Engine lost its model after a successful build".to_string())?;
    let target = options.test_target.as_deref().unwrap_or(&options.target);
    let target_idx = test_table
        .column_index(target)
        .ok_or_else(|| format!("Target column '{target}' missing from test data"))?;
    let mut cm = ConfusionMatrix::new(model.classes.len());
    for row_idx in 0..test_table.n_rows() {
        let record = test_table.record_without(row_idx, target_idx);
        let predicted = model.predict_index(&record);
        if let Some(truth) = model.class_index(test_table.value(row_idx, target_idx)) {
            cm.add(truth, predicted);
        }
    }
    println!("confusion matrix (rows=true, cols=pred):");
    for truth in 0..cm.n_classes {
        let mut row = String::new();
        for pred in 0..cm.n_classes {
            row.push_str(&format!("{:6}", cm.get(truth, pred)));
        }
        println!("{row}");
    }

    Ok(())
}

fn parse_args(args: Vec<String>) -> Result<CliOptions, String> {
    let mut train_path: Option<PathBuf> = None;
    let mut target: Option<String> = None;
    let mut test_path: Option<PathBuf> = None;
    let mut test_target: Option<String> = None;

    let mut idx = 0usize;
    while idx < args.len() {
        match args[idx].as_str() {
            "-h" | "--help" => return Err(help_text()),
            "--train" => {
                idx += 1;
                let value = args
                    .get(idx)
                    .ok_or_else(|| "--train requires a value".to_string())?;
                train_path = Some(PathBuf::from(value));
            }
            "--target" => {
                idx += 1;
                let value = args
                    .get(idx)
                    .ok_or_else(|| "--target requires a value".to_string())?;
                target = Some(value.clone());
            }
            "--test" => {
                idx += 1;
                let value = args
                    .get(idx)
                    .ok_or_else(|| "--test requires a value".to_string())?;
                test_path = Some(PathBuf::from(value));
            }
            "--test-target" => {
                idx += 1;
                let value = args
                    .get(idx)
                    .ok_or_else(|| "--test-target requires a value".to_string())?;
                test_target = Some(value.clone());
            }
            unknown => return Err(format!("Unknown argument: {unknown}\n\n{}", help_text())),
        }
        idx += 1;
    }

    let train_path = train_path.ok_or_else(|| "--train is required".to_string())?;
    let target = target.ok_or_else(|| "--target is required".to_string())?;
    Ok(CliOptions {
        train_path,
        target,
        test_path,
        test_target,
    })
}

fn help_text() -> String {
    [
        "bayesline-eval",
        "",
        "Trains a categorical naive Bayes classifier and reports accuracy.",
        "",
        "Usage:",
        "  bayesline-eval --train <train.jsonl> --target <column> [options]",
        "",
        "Options:",
        "  --test <file>          Labeled JSONL test set (default: score the training file).",
        "  --test-target <col>    Target column in the test set (default: --target).",
    ]
    .join("\n")
}
