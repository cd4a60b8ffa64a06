mod common;

use common::{approx_eq, init_logging};
use common::synthetic_drawing::{circle, dot, letter_t, zigzag};
use stroke_features::geometry::dist_point_to_line;
use stroke_features::preprocess::{connect_stroke_endpoints, resample_strokes};
use stroke_features::{
    Drawing, Error, ExtractorParams, FeatureExtractor, FeatureMask, PenState, Stroke,
};

fn pen_runs(states: impl Iterator<Item = PenState>) -> Vec<(PenState, usize)> {
    let mut runs: Vec<(PenState, usize)> = Vec::new();
    for s in states {
        match runs.last_mut() {
            Some((pen, n)) if *pen == s => *n += 1,
            _ => runs.push((s, 1)),
        }
    }
    runs
}

#[test]
fn two_strokes_produce_down_up_down_runs() {
    let strokes = vec![
        Stroke::from(vec![(0.0, 0.0), (10.0, 0.0)]),
        Stroke::from(vec![(20.0, 0.0), (20.0, 10.0)]),
    ];
    let resampled = resample_strokes(&strokes, 5.0, 500).unwrap();
    let annotated = connect_stroke_endpoints(&resampled, 5.0).unwrap();
    assert_eq!(
        pen_runs(annotated.iter().map(|p| p.pen)),
        vec![(PenState::Down, 4), (PenState::Up, 2), (PenState::Down, 4)]
    );
    let bridge: Vec<_> = annotated
        .iter()
        .filter(|p| p.pen == PenState::Up)
        .map(|p| (p.x, p.y))
        .collect();
    assert!(approx_eq(bridge[0].0, 10.0 + 10.0 / 3.0, 1e-9));
    assert!(approx_eq(bridge[1].0, 10.0 + 20.0 / 3.0, 1e-9));
}

#[test]
fn extractor_emits_one_row_per_annotated_point() {
    init_logging();
    let extractor = FeatureExtractor::default();
    for drawing in [zigzag(4, 200.0, 80.0), circle(40, 50.0), letter_t(100.0)] {
        let annotated = extractor.annotate(&drawing).unwrap();
        let seq = extractor.extract(&drawing).unwrap();
        assert_eq!(seq.len(), annotated.len());
        assert!(seq.len() >= 2);
        for row in &seq {
            assert_eq!(row.len(), 12);
            assert!(row.iter().all(|v| v.is_finite()));
            assert!(row[0] == 0.0 || row[0] == 1.0);
            assert!(approx_eq(row[3].hypot(row[4]), 1.0, 1e-9) || (row[3], row[4]) == (0.0, 0.0));
        }
    }
}

#[test]
fn bridge_points_lie_between_strokes() {
    let annotated = FeatureExtractor::default().annotate(&letter_t(100.0)).unwrap();
    let runs = pen_runs(annotated.iter().map(|p| p.pen));
    assert_eq!(runs.len(), 3);
    assert_eq!(runs[1].0, PenState::Up);
    assert!(runs[1].1 > 0);

    let start = runs[0].1 - 1;
    let end = start + runs[1].1 + 1;
    let (a, b) = (annotated[start].point(), annotated[end].point());
    for p in &annotated[start + 1..end] {
        assert!(dist_point_to_line(p.point(), a, b) < 1e-9);
    }
}

#[test]
fn basic_and_extended_masks_are_column_prefixes() {
    let drawing = zigzag(3, 120.0, 60.0);
    let full = FeatureExtractor::default().extract(&drawing).unwrap();
    for (mask, width) in [(FeatureMask::basic(), 3), (FeatureMask::extended(), 7)] {
        let extractor = FeatureExtractor::new(ExtractorParams {
            features: mask,
            ..Default::default()
        });
        assert_eq!(extractor.width(), width);
        let reduced = extractor.extract(&drawing).unwrap();
        assert_eq!(reduced.len(), full.len());
        for (f, r) in full.iter().zip(reduced.iter()) {
            assert_eq!(&f[..width], r.as_slice());
        }
    }
}

#[test]
fn single_point_drawing_is_malformed() {
    let err = FeatureExtractor::default().extract(&dot(5.0, 5.0)).unwrap_err();
    assert!(matches!(err, Error::MalformedInput(_)));

    let repeated = Drawing::from_strokes(vec![Stroke::from(vec![(3.0, 4.0), (3.0, 4.0)])]);
    assert!(FeatureExtractor::default().extract(&repeated).unwrap_err().is_malformed());
}

#[test]
fn extraction_leaves_input_untouched() {
    let drawing = letter_t(80.0);
    let copy = drawing.clone();
    let _ = FeatureExtractor::default().extract(&drawing).unwrap();
    assert_eq!(drawing, copy);
}

#[test]
fn smaller_arc_len_gives_longer_sequences() {
    let drawing = circle(30, 40.0);
    let mut extractor = FeatureExtractor::default();
    let coarse = extractor.extract(&drawing).unwrap().len();
    extractor.set_arc_len(10.0);
    let fine = extractor.extract(&drawing).unwrap().len();
    assert!(fine > 2 * coarse, "fine={fine} coarse={coarse}");
}

#[test]
fn trace_reports_stage_counts() {
    let drawing = letter_t(100.0);
    let (seq, trace) = FeatureExtractor::default()
        .extract_with_trace(&drawing)
        .unwrap();
    assert_eq!(trace.input_strokes, 2);
    assert_eq!(trace.input_points, 6);
    assert_eq!(trace.timesteps, seq.len());
    assert_eq!(trace.resampled_points + trace.bridge_points, seq.len());
    let stages: Vec<_> = trace.timings.stages.iter().map(|s| s.label.as_str()).collect();
    assert_eq!(stages, ["normalize", "resample", "features"]);
}
