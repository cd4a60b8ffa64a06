use serde::Serialize;
use std::env;
use std::path::Path;
use stroke_features::config::preview::{self, InputFormat, PreviewToolConfig};
use stroke_features::diagnostics::PipelineTrace;
use stroke_features::io::{load_drawing_json, save_annotated_png, write_json_file};
use stroke_features::unipen::UnipenCorpus;
use stroke_features::{AnnotatedPoint, Drawing, FeatureExtractor, FeatureSequence};

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let config_path = env::args().nth(1).ok_or_else(usage)?;
    let config = preview::load_config(Path::new(&config_path))?;
    let params = config.extractor.resolve()?;
    let drawing = load_input(&config)?;

    let extractor = FeatureExtractor::new(params);
    let points = extractor.annotate(&drawing).map_err(|e| e.to_string())?;
    let (features, trace) = extractor
        .extract_with_trace(&drawing)
        .map_err(|e| e.to_string())?;

    let report = PreviewReport {
        feature_names: extractor.params().features.names(),
        points,
        features,
        trace,
    };
    write_json_file(&config.output.json, &report)?;
    println!(
        "Saved {} timesteps ({} bridge) to {}",
        report.trace.timesteps,
        report.trace.bridge_points,
        config.output.json.display()
    );

    if let Some(png) = &config.output.png {
        let canvas = &extractor.params().normalize;
        let (w, h) = (canvas.canvas_width.ceil() as u32, canvas.canvas_height.ceil() as u32);
        save_annotated_png(&report.points, w, h, png)?;
        println!("Saved preview raster to {}", png.display());
    }
    Ok(())
}

fn load_input(config: &PreviewToolConfig) -> Result<Drawing, String> {
    match config.format {
        InputFormat::Json => load_drawing_json(&config.input),
        InputFormat::Unipen => {
            let corpus = UnipenCorpus::parse_file(&config.input).map_err(|e| e.to_string())?;
            corpus
                .drawings()
                .get(config.character)
                .cloned()
                .ok_or_else(|| {
                    format!(
                        "character {} out of range ({} in {})",
                        config.character,
                        corpus.drawings().len(),
                        config.input.display()
                    )
                })
        }
    }
}

fn usage() -> String {
    "Usage: stroke_preview <config.json>".to_string()
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PreviewReport {
    feature_names: Vec<&'static str>,
    points: Vec<AnnotatedPoint>,
    features: FeatureSequence,
    trace: PipelineTrace,
}
