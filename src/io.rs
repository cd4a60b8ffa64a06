//! I/O helpers for drawings, JSON and previews.
//!
//! - `load_drawing_json`: read a serialized `Drawing`.
//! - `write_json_file`: pretty-print a serializable value to disk.
//! - `render_annotated`: rasterize a bridged point sequence to grayscale.
//! - `save_annotated_png`: render and write the raster as a PNG.
use crate::types::{AnnotatedPoint, Drawing, PenState};
use image::{GrayImage, Luma};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::Path;

const BACKGROUND: Luma<u8> = Luma([255]);
const PEN_DOWN_INK: Luma<u8> = Luma([0]);
const PEN_UP_INK: Luma<u8> = Luma([190]);

/// Deserialize a JSON file into `T`.
pub fn read_json_file<T: DeserializeOwned>(path: &Path) -> Result<T, String> {
    let data = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read {}: {e}", path.display()))?;
    serde_json::from_str(&data).map_err(|e| format!("Failed to parse {}: {e}", path.display()))
}

/// Load a drawing stored as `{"strokes": [[{"x":..,"y":..}, ..], ..], "width":.., "height":..}`.
pub fn load_drawing_json(path: &Path) -> Result<Drawing, String> {
    read_json_file(path)
}

/// Serialize a value as pretty JSON to `path`, creating parent directories.
pub fn write_json_file<T: Serialize>(path: &Path, value: &T) -> Result<(), String> {
    ensure_parent_dir(path)?;
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| format!("Failed to serialize JSON for {}: {e}", path.display()))?;
    fs::write(path, json).map_err(|e| format!("Failed to write JSON {}: {e}", path.display()))
}

/// Rasterize `points` onto a `width × height` white canvas.
///
/// Consecutive points are joined with a line drawn dark when it ends on a
/// pen-down point and light when it ends on a bridge point.
pub fn render_annotated(points: &[AnnotatedPoint], width: u32, height: u32) -> GrayImage {
    let mut img = GrayImage::from_pixel(width.max(1), height.max(1), BACKGROUND);
    for pair in points.windows(2) {
        let ink = match pair[1].pen {
            PenState::Down => PEN_DOWN_INK,
            PenState::Up => PEN_UP_INK,
        };
        draw_line(&mut img, (pair[0].x, pair[0].y), (pair[1].x, pair[1].y), ink);
    }
    if let [single] = points {
        put_clipped(&mut img, single.x.round(), single.y.round(), PEN_DOWN_INK);
    }
    img
}

pub fn save_annotated_png(
    points: &[AnnotatedPoint],
    width: u32,
    height: u32,
    path: &Path,
) -> Result<(), String> {
    ensure_parent_dir(path)?;
    render_annotated(points, width, height)
        .save(path)
        .map_err(|e| format!("Failed to save {}: {e}", path.display()))
}

fn draw_line(img: &mut GrayImage, a: (f64, f64), b: (f64, f64), ink: Luma<u8>) {
    let (dx, dy) = (b.0 - a.0, b.1 - a.1);
    let steps = dx.abs().max(dy.abs()).ceil().max(1.0) as usize;
    for k in 0..=steps {
        let t = k as f64 / steps as f64;
        put_clipped(img, (a.0 + t * dx).round(), (a.1 + t * dy).round(), ink);
    }
}

fn put_clipped(img: &mut GrayImage, x: f64, y: f64, ink: Luma<u8>) {
    if x < 0.0 || y < 0.0 || !x.is_finite() || !y.is_finite() {
        return;
    }
    let (x, y) = (x as u32, y as u32);
    if x < img.width() && y < img.height() {
        img.put_pixel(x, y, ink);
    }
}

fn ensure_parent_dir(path: &Path) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create {}: {e}", parent.display()))?;
        }
    }
    Ok(())
}
