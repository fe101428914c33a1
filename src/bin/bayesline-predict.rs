//! Developer utility to train a classifier and classify a single record.

use std::path::PathBuf;

use bayesline::dataset::{Record, canonical_value, loader::load_table};
use bayesline::engine::ClassificationEngine;
use bayesline::logging;
use serde_json::Value;

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
    record_json: String,
    show_scores: bool,
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

    let record = parse_record(&options.record_json)?;
    let predicted = engine
        .classify_single_record(&record)
        .map_err(|err| err.to_string())?;
    println!("predicted: {predicted}");

    if options.show_scores {
        let scores = engine
            .posterior_scores(&record)
            .map_err(|err| err.to_string())?;
        for (class, score) in scores {
            println!("class {:<16}  log-score={:.4}", class, score);
        }
    }

    Ok(())
}

fn parse_record(json: &str) -> Result<Record, String> {
    let value: Value =
        serde_json::from_str(json).map_err(|err| format!("Invalid --record JSON: {err}"))?;
    let Value::Object(object) = value else {
        return Err("--record must be a JSON object of feature -> value".to_string());
    };
    let mut record = Record::new();
    for (key, value) in object {
        let canonical = canonical_value(&value)
            .ok_or_else(|| format!("Record field '{key}' has no canonical scalar value"))?;
        record.insert(key, canonical);
    }
    Ok(record)
}

fn parse_args(args: Vec<String>) -> Result<CliOptions, String> {
    let mut train_path: Option<PathBuf> = None;
    let mut target: Option<String> = None;
    let mut record_json: Option<String> = None;
    let mut show_scores = false;

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
            "--record" => {
                idx += 1;
                let value = args
                    .get(idx)
                    .ok_or_else(|| "--record requires a value".to_string())?;
                record_json = Some(value.clone());
            }
            "--scores" => {
                show_scores = true;
            }
            unknown => return Err(format!("Unknown argument: {unknown}\n\n{}", help_text())),
        }
        idx += 1;
    }

    let train_path = train_path.ok_or_else(|| "--train is required".to_string())?;
    let target = target.ok_or_else(|| "--target is required".to_string())?;
    let record_json = record_json.ok_or_else(|| "--record is required".to_string())?;
    Ok(CliOptions {
        train_path,
        target,
        record_json,
        show_scores,
    })
}

fn help_text() -> String {
    [
        "bayesline-predict",
        "",
        "Trains a categorical naive Bayes classifier and classifies one record.",
        "",
        "Usage:",
        "  bayesline-predict --train <train.jsonl> --target <column> --record <json> [options]",
        "",
        "Options:",
        "  --record <json>  JSON object of feature -> value (required).",
        "  --scores         Also print per-class posterior log-scores.",
    ]
    .join("\n")
}
