use serde::Serialize;
use std::env;
use std::path::Path;
use stroke_features::config::dataset;
use stroke_features::dataset::{BatchReport, DatasetBuilder, SplitKind};
use stroke_features::io::write_json_file;
use stroke_features::unipen::UnipenCorpus;
use stroke_features::FeatureExtractor;

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let config_path = env::args().nth(1).ok_or_else(usage)?;
    let config = dataset::load_config(Path::new(&config_path))?;
    let params = config.extractor.resolve()?;

    let mut corpus = UnipenCorpus::new();
    if let Some(dir) = &config.include_dir {
        corpus = corpus.with_include_dir(dir);
    }
    for input in &config.inputs {
        corpus.add_file(input).map_err(|e| e.to_string())?;
    }
    let samples = corpus.characters().map_err(|e| e.to_string())?;
    let labels = config.labels.clone().unwrap_or_else(|| corpus.label_set());
    println!(
        "Read {} characters ({} labels) from {} file(s)",
        samples.len(),
        labels.len(),
        config.inputs.len()
    );

    let builder = DatasetBuilder::new(labels, FeatureExtractor::new(params));
    let splits = builder
        .build_splits(&samples, &config.split, config.seed)
        .map_err(|e| e.to_string())?;

    let mut summary = Vec::with_capacity(splits.len());
    for (kind, outcome) in &splits {
        let path = config
            .output
            .split_path(*kind, config.split.percent(*kind));
        write_json_file(&path, &outcome.set)?;
        println!(
            "Saved {} set: {} sequences, {} timesteps to {} (empty={}, malformed={})",
            kind.name(),
            outcome.set.num_seqs(),
            outcome.set.num_timesteps(),
            path.display(),
            outcome.report.empty,
            outcome.report.malformed
        );
        summary.push(SplitSummary {
            split: *kind,
            file: path.display().to_string(),
            report: outcome.report,
        });
    }

    if let Some(report_path) = &config.output.report_json {
        write_json_file(report_path, &summary)?;
        println!("Saved batch reports to {}", report_path.display());
    }
    Ok(())
}

fn usage() -> String {
    "Usage: build_dataset <config.json>".to_string()
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SplitSummary {
    split: SplitKind,
    file: String,
    report: BatchReport,
}
