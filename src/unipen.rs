//! Reader for UNIPEN handwriting corpora.
//!
//! A UNIPEN file is a sequence of keyword blocks: a line starting with
//! `.KEYWORD` opens a block, its arguments run until the next keyword line.
//! Two ways of cutting characters out of a file are understood:
//!
//! - Delineations (the UNIPEN train releases). Every `.PEN_DOWN` and
//!   `.PEN_UP` block is a numbered component, and
//!   `.SEGMENT CHARACTER <delineation> <quality> "<label>"` selects the
//!   components (or parts of them) that make up one character. A delineation
//!   is a comma-separated list of `A[:M]-B[:N]` ranges (or a bare `A`), where
//!   `A`, `B` are component numbers and `M`, `N` inclusive point numbers.
//! - Boxes. When a file uses `.START_BOX`, each box is one character built
//!   from its `.PEN_DOWN` blocks and labeled by the `.SEGMENT CHARACTER`
//!   lines in order.
//!
//! `.X_DIM` / `.Y_DIM` set the canvas of every character in the file.
//! `.INCLUDE <file>` splices another file, looked up in the configured
//! include directory, then `INCLUDE/`, `../INCLUDE/` and the including
//! file's directory. Other keywords are skipped.

use crate::dataset::LabeledDrawing;
use crate::error::{Error, Result};
use crate::types::{Drawing, Point, Stroke};
use log::{debug, warn};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Recognized block keywords.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Keyword {
    Segment,
    StartBox,
    PenDown,
    PenUp,
    Include,
    XDim,
    YDim,
    Other(String),
}

impl Keyword {
    pub fn parse(token: &str) -> Keyword {
        match token {
            "SEGMENT" => Keyword::Segment,
            "START_BOX" => Keyword::StartBox,
            "PEN_DOWN" => Keyword::PenDown,
            "PEN_UP" => Keyword::PenUp,
            "INCLUDE" => Keyword::Include,
            "X_DIM" => Keyword::XDim,
            "Y_DIM" => Keyword::YDim,
            other => Keyword::Other(other.to_string()),
        }
    }
}

/// One keyword with its (possibly multi-line) arguments.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Block {
    pub keyword: Keyword,
    pub args: String,
    /// 1-based line of the keyword. Arguments on continuation lines start
    /// at `line + 1`.
    pub line: usize,
}

fn is_keyword_line(line: &str) -> bool {
    let mut chars = line.chars();
    chars.next() == Some('.') && chars.next().is_some_and(|c| c.is_ascii_uppercase())
}

/// Split `text` into keyword blocks. Lines before the first keyword are
/// ignored.
pub fn blocks(text: &str) -> Vec<Block> {
    let mut out: Vec<Block> = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        if is_keyword_line(line) {
            let (token, args) = line[1..].split_once(' ').unwrap_or((&line[1..], ""));
            out.push(Block {
                keyword: Keyword::parse(token.trim()),
                args: args.to_string(),
                line: idx + 1,
            });
        } else if let Some(block) = out.last_mut() {
            if !block.args.is_empty() {
                block.args.push('\n');
            }
            block.args.push_str(line);
        }
    }
    for block in out.iter_mut() {
        block.args = block.args.trim().to_string();
    }
    out
}

/// One `A[:M]-B[:N]` range of a segment delineation.
///
/// Components are inclusive; `None` point bounds mean "from the first" and
/// "to the last" point of the boundary component.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DelineationRange {
    pub start_comp: usize,
    pub start_point: Option<usize>,
    pub end_comp: usize,
    pub end_point: Option<usize>,
}

fn parse_bound(s: &str) -> std::result::Result<(usize, Option<usize>), String> {
    let number = |v: &str| {
        v.trim()
            .parse::<usize>()
            .map_err(|_| format!("bad delineation number '{v}'"))
    };
    match s.split_once(':') {
        Some((comp, point)) => Ok((number(comp)?, Some(number(point)?))),
        None => Ok((number(s)?, None)),
    }
}

impl FromStr for DelineationRange {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, String> {
        let s = s.trim();
        let range = match s.split_once('-') {
            None => {
                let comp = s
                    .parse::<usize>()
                    .map_err(|_| format!("bad delineation range '{s}'"))?;
                Self {
                    start_comp: comp,
                    start_point: None,
                    end_comp: comp,
                    end_point: None,
                }
            }
            Some((start, end)) => {
                let (start_comp, start_point) = parse_bound(start)?;
                let (end_comp, end_point) = parse_bound(end)?;
                Self {
                    start_comp,
                    start_point,
                    end_comp,
                    end_point,
                }
            }
        };
        if range.end_comp < range.start_comp {
            return Err(format!("delineation range '{s}' runs backwards"));
        }
        Ok(range)
    }
}

/// Parse a comma-separated delineation such as `0-2,3:1-3:4`.
pub fn parse_delineation(s: &str) -> std::result::Result<Vec<DelineationRange>, String> {
    s.split(',').map(DelineationRange::from_str).collect()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ComponentKind {
    Down,
    Up,
}

#[derive(Clone, Debug)]
struct Component {
    kind: ComponentKind,
    points: Vec<Point>,
}

#[derive(Clone, Debug)]
struct CharacterSegment {
    label: String,
    delineation: String,
    line: usize,
}

/// Keywords collected from one top-level file and its includes.
#[derive(Debug, Default)]
struct FileState {
    components: Vec<Component>,
    segments: Vec<CharacterSegment>,
    /// Component indices of each `.START_BOX`.
    boxes: Vec<Vec<usize>>,
    x_dim: Option<f64>,
    y_dim: Option<f64>,
}

impl FileState {
    fn canvas(&self, strokes: Vec<Stroke>) -> Drawing {
        match (self.x_dim, self.y_dim) {
            (Some(w), Some(h)) => Drawing::new(strokes, w, h),
            _ => Drawing::from_strokes(strokes),
        }
    }

    fn box_characters(&self) -> Vec<Drawing> {
        self.boxes
            .iter()
            .map(|members| {
                let strokes = members
                    .iter()
                    .map(|&i| Stroke::new(self.components[i].points.clone()))
                    .collect();
                self.canvas(strokes)
            })
            .collect()
    }

    /// Pen-down strokes selected by `segment`. Pen-up components inside the
    /// range are skipped.
    fn delineated_character(&self, segment: &CharacterSegment) -> Result<Drawing> {
        let ranges = parse_delineation(&segment.delineation).map_err(|message| Error::Parse {
            line: segment.line,
            message,
        })?;
        let mut strokes = Vec::new();
        for range in ranges {
            for comp in range.start_comp..=range.end_comp {
                let component = self.components.get(comp).ok_or_else(|| Error::Parse {
                    line: segment.line,
                    message: format!(
                        "component {comp} of '{}' does not exist ({} in file)",
                        segment.label,
                        self.components.len()
                    ),
                })?;
                if component.kind == ComponentKind::Up {
                    continue;
                }
                let len = component.points.len();
                let lo = if comp == range.start_comp {
                    range.start_point.unwrap_or(0).min(len)
                } else {
                    0
                };
                let hi = if comp == range.end_comp {
                    range.end_point.map_or(len, |n| (n + 1).min(len))
                } else {
                    len
                };
                if lo < hi {
                    strokes.push(Stroke::new(component.points[lo..hi].to_vec()));
                }
            }
        }
        Ok(self.canvas(strokes))
    }
}

/// Labels and characters collected from one or more UNIPEN files.
#[derive(Clone, Debug, Default)]
pub struct UnipenCorpus {
    labels: Vec<String>,
    characters: Vec<Drawing>,
    include_dir: Option<PathBuf>,
}

impl UnipenCorpus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Directory searched first when resolving `.INCLUDE`.
    pub fn with_include_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.include_dir = Some(dir.into());
        self
    }

    /// Parse a single in-memory file. `.INCLUDE` is ignored without a
    /// directory to resolve it against.
    pub fn parse_str(text: &str) -> Result<Self> {
        let mut corpus = Self::new();
        let mut state = FileState::default();
        corpus.feed(&mut state, text, None)?;
        corpus.finish(state)?;
        Ok(corpus)
    }

    pub fn parse_file(path: &Path) -> Result<Self> {
        let mut corpus = Self::new();
        corpus.add_file(path)?;
        Ok(corpus)
    }

    /// Parse several files into one corpus.
    pub fn parse_files<P: AsRef<Path>>(paths: &[P]) -> Result<Self> {
        let mut corpus = Self::new();
        for path in paths {
            corpus.add_file(path.as_ref())?;
        }
        Ok(corpus)
    }

    /// Parse one more file into this corpus.
    pub fn add_file(&mut self, path: &Path) -> Result<()> {
        let text = fs::read_to_string(path)?;
        debug!("unipen: reading {}", path.display());
        let dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
        let mut state = FileState::default();
        self.feed(&mut state, &text, Some(&dir))?;
        self.finish(state)
    }

    fn feed(&self, state: &mut FileState, text: &str, dir: Option<&Path>) -> Result<()> {
        for block in blocks(text) {
            match block.keyword {
                Keyword::Segment => handle_segment(state, &block)?,
                Keyword::StartBox => state.boxes.push(Vec::new()),
                Keyword::PenDown => handle_component(state, &block, ComponentKind::Down)?,
                Keyword::PenUp => handle_component(state, &block, ComponentKind::Up)?,
                Keyword::XDim => state.x_dim = Some(parse_dim(&block)?),
                Keyword::YDim => state.y_dim = Some(parse_dim(&block)?),
                Keyword::Include => match dir {
                    Some(dir) => self.handle_include(state, &block, dir)?,
                    None => debug!("unipen: INCLUDE {} ignored (no base directory)", block.args),
                },
                Keyword::Other(_) => {}
            }
        }
        Ok(())
    }

    fn handle_include(&self, state: &mut FileState, block: &Block, dir: &Path) -> Result<()> {
        let name = block.args.trim();
        let mut candidates: Vec<PathBuf> = Vec::new();
        for base in self
            .include_dir
            .iter()
            .cloned()
            .chain([dir.join("INCLUDE"), dir.join("..").join("INCLUDE"), dir.to_path_buf()])
        {
            candidates.push(base.join(name));
            candidates.push(base.join(name.to_uppercase()));
        }
        match candidates.iter().find(|p| p.is_file()) {
            Some(path) => {
                debug!("unipen: including {}", path.display());
                let text = fs::read_to_string(path)?;
                let include_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
                self.feed(state, &text, Some(&include_dir))
            }
            None => {
                warn!("unipen: INCLUDE {name} not found near {}", dir.display());
                Ok(())
            }
        }
    }

    fn finish(&mut self, state: FileState) -> Result<()> {
        let labels = state.segments.iter().map(|s| s.label.clone());
        if !state.boxes.is_empty() {
            self.labels.extend(labels);
            self.characters.extend(state.box_characters());
            return Ok(());
        }
        for segment in &state.segments {
            self.characters.push(state.delineated_character(segment)?);
        }
        self.labels.extend(labels);
        Ok(())
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn drawings(&self) -> &[Drawing] {
        &self.characters
    }

    /// Distinct labels in sorted order.
    pub fn label_set(&self) -> Vec<String> {
        self.labels
            .iter()
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Pair every character with its label.
    pub fn characters(&self) -> Result<Vec<LabeledDrawing>> {
        if self.labels.len() != self.characters.len() {
            return Err(Error::Parse {
                line: 0,
                message: format!(
                    "{} label(s) for {} character(s)",
                    self.labels.len(),
                    self.characters.len()
                ),
            });
        }
        Ok(self
            .labels
            .iter()
            .zip(self.characters.iter())
            .map(|(label, drawing)| LabeledDrawing::new(label.clone(), drawing.clone()))
            .collect())
    }
}

fn handle_segment(state: &mut FileState, block: &Block) -> Result<()> {
    let fields: Vec<&str> = block.args.split_whitespace().collect();
    if fields.first() != Some(&"CHARACTER") {
        return Ok(());
    }
    let (Some(delineation), Some(label)) = (fields.get(1), fields.get(3)) else {
        return Err(Error::Parse {
            line: block.line,
            message: format!("SEGMENT CHARACTER needs 4 fields, got '{}'", block.args),
        });
    };
    state.segments.push(CharacterSegment {
        label: label.trim_matches('"').to_string(),
        delineation: delineation.to_string(),
        line: block.line,
    });
    Ok(())
}

fn handle_component(state: &mut FileState, block: &Block, kind: ComponentKind) -> Result<()> {
    let mut points = Vec::new();
    for (offset, row) in block.args.lines().enumerate() {
        let row = row.trim();
        if row.is_empty() {
            continue;
        }
        let mut cols = row.split_whitespace().map(str::parse::<i64>);
        match (cols.next(), cols.next()) {
            (Some(Ok(x)), Some(Ok(y))) => points.push(Point::new(x as f64, y as f64)),
            _ => {
                return Err(Error::Parse {
                    line: block.line + offset + 1,
                    message: format!("expected integer coordinates, got '{row}'"),
                })
            }
        }
    }
    // Blocks without points are not numbered.
    if points.is_empty() {
        return Ok(());
    }
    state.components.push(Component { kind, points });
    if kind == ComponentKind::Down {
        let index = state.components.len() - 1;
        if let Some(members) = state.boxes.last_mut() {
            members.push(index);
        }
    }
    Ok(())
}

fn parse_dim(block: &Block) -> Result<f64> {
    block
        .args
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v > 0.0)
        .ok_or_else(|| Error::Parse {
            line: block.line,
            message: format!("expected a positive dimension, got '{}'", block.args),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOXED: &str = "\
.VERSION 1.0
.COORD X Y
.SEGMENT CHARACTER 0-1 ? \"A\"
.START_BOX
.PEN_DOWN
10 10
20 40
30 10
.PEN_UP
.PEN_DOWN
15 25
25 25
.PEN_UP
.SEGMENT CHARACTER 2 ? \"B\"
.START_BOX
.PEN_DOWN
5 5
5 50
.PEN_UP
";

    const DELINEATED: &str = "\
.X_DIM 1000
.Y_DIM 800
.PEN_DOWN
0 0
10 10
20 20
.PEN_UP
25 25
.PEN_DOWN
30 30
40 40
.PEN_DOWN
50 50
60 60
70 70
80 80
.SEGMENT CHARACTER 0-2 ? \"A\"
.SEGMENT CHARACTER 3:1-3:2 ? \"B\"
.SEGMENT CHARACTER 0:1-2:0,3 ? \"C\"
";

    fn coords(drawing: &Drawing) -> Vec<Vec<(f64, f64)>> {
        drawing
            .strokes
            .iter()
            .map(|s| s.points.iter().map(|p| (p.x, p.y)).collect())
            .collect()
    }

    #[test]
    fn blocks_collect_continuation_lines() {
        let blocks = blocks(BOXED);
        let pen_down = blocks
            .iter()
            .find(|b| b.keyword == Keyword::PenDown)
            .unwrap();
        assert_eq!(pen_down.args, "10 10\n20 40\n30 10");
        assert_eq!(pen_down.line, 5);
        assert_eq!(blocks[0].keyword, Keyword::Other("VERSION".into()));
    }

    #[test]
    fn delineation_ranges_parse() {
        assert_eq!(
            "2:5-4:1".parse::<DelineationRange>().unwrap(),
            DelineationRange {
                start_comp: 2,
                start_point: Some(5),
                end_comp: 4,
                end_point: Some(1),
            }
        );
        let whole = parse_delineation("7, 1-3").unwrap();
        assert_eq!(whole.len(), 2);
        assert_eq!((whole[0].start_comp, whole[0].end_comp), (7, 7));
        assert_eq!((whole[1].start_point, whole[1].end_point), (None, None));
        assert!("x-3".parse::<DelineationRange>().is_err());
        assert!("4-2".parse::<DelineationRange>().is_err());
    }

    #[test]
    fn box_characters_pair_labels_and_strokes() {
        let corpus = UnipenCorpus::parse_str(BOXED).unwrap();
        let chars = corpus.characters().unwrap();
        assert_eq!(chars.len(), 2);
        assert_eq!(chars[0].label, "A");
        assert_eq!(chars[0].drawing.stroke_count(), 2);
        assert_eq!(chars[0].drawing.strokes[0].points[1], Point::new(20.0, 40.0));
        assert_eq!(chars[1].label, "B");
        assert_eq!(chars[1].drawing.point_count(), 2);
        assert_eq!(corpus.label_set(), vec!["A".to_string(), "B".to_string()]);
    }

    #[test]
    fn delineated_characters_span_components() {
        let corpus = UnipenCorpus::parse_str(DELINEATED).unwrap();
        let chars = corpus.characters().unwrap();
        assert_eq!(chars.len(), 3);

        // Components 0..=2; the pen-up component 1 carries no ink.
        assert_eq!(chars[0].label, "A");
        assert_eq!(
            coords(&chars[0].drawing),
            vec![
                vec![(0.0, 0.0), (10.0, 10.0), (20.0, 20.0)],
                vec![(30.0, 30.0), (40.0, 40.0)],
            ]
        );
        assert_eq!((chars[0].drawing.width, chars[0].drawing.height), (1000.0, 800.0));
    }

    #[test]
    fn delineated_characters_cut_partial_components() {
        let corpus = UnipenCorpus::parse_str(DELINEATED).unwrap();
        let chars = corpus.characters().unwrap();

        assert_eq!(chars[1].label, "B");
        assert_eq!(coords(&chars[1].drawing), vec![vec![(60.0, 60.0), (70.0, 70.0)]]);

        assert_eq!(chars[2].label, "C");
        assert_eq!(
            coords(&chars[2].drawing),
            vec![
                vec![(10.0, 10.0), (20.0, 20.0)],
                vec![(30.0, 30.0)],
                vec![(50.0, 50.0), (60.0, 60.0), (70.0, 70.0), (80.0, 80.0)],
            ]
        );
    }

    #[test]
    fn missing_component_is_a_parse_error() {
        let text = ".PEN_DOWN\n1 1\n2 2\n.SEGMENT CHARACTER 0-3 ? \"x\"\n";
        match UnipenCorpus::parse_str(text) {
            Err(Error::Parse { line, .. }) => assert_eq!(line, 4),
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn non_character_segments_are_ignored() {
        let text = ".SEGMENT WORD 0-3 ? \"AB\"\n.SEGMENT CHARACTER 0 ? \"A\"\n.START_BOX\n.PEN_DOWN\n1 1\n2 2\n";
        let corpus = UnipenCorpus::parse_str(text).unwrap();
        assert_eq!(corpus.labels(), &["A".to_string()]);
        assert_eq!(corpus.drawings().len(), 1);
    }

    #[test]
    fn bad_coordinates_report_line() {
        let text = ".START_BOX\n.PEN_DOWN\n1 1\n2 x\n";
        match UnipenCorpus::parse_str(text) {
            Err(Error::Parse { line, .. }) => assert_eq!(line, 4),
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn label_count_mismatch_is_reported() {
        let text = ".START_BOX\n.PEN_DOWN\n1 1\n2 2\n";
        let corpus = UnipenCorpus::parse_str(text).unwrap();
        assert!(corpus.characters().is_err());
    }

    #[test]
    fn include_is_resolved_from_include_dir() {
        let root = std::env::temp_dir().join(format!("unipen-include-{}", std::process::id()));
        let include = root.join("include");
        let data = root.join("data");
        fs::create_dir_all(&include).unwrap();
        fs::create_dir_all(&data).unwrap();
        fs::write(include.join("DIMS.INC"), ".X_DIM 500\n.Y_DIM 400\n").unwrap();
        fs::write(
            data.join("digits.dat"),
            ".INCLUDE dims.inc\n.PEN_DOWN\n1 1\n9 9\n.SEGMENT CHARACTER 0 ? \"1\"\n",
        )
        .unwrap();

        let mut corpus = UnipenCorpus::new().with_include_dir(&include);
        corpus.add_file(&data.join("digits.dat")).unwrap();
        let chars = corpus.characters().unwrap();
        assert_eq!(chars.len(), 1);
        assert_eq!((chars[0].drawing.width, chars[0].drawing.height), (500.0, 400.0));
        let _ = fs::remove_dir_all(&root);
    }
}
