//! Pure projection engine: (document, selection) -> chart-ready matrix.
//!
//! This is the one piece with real semantics. Everything here is a total
//! function over its inputs: an empty document or an unset test/style
//! yields an empty projection, never an error. All I/O and logging happen
//! at the boundaries, not here.

use serde::{Deserialize, Serialize};

use crate::model::{BenchmarkDocument, Record, Run};
use crate::state::{Metric, Selection, Threading};

/// Canonical test ordering for the selector row. Values present in the
/// data but absent here are appended in first-seen order.
pub const TEST_ORDER: &[&str] = &[
    "FillRectA",
    "FillRectU",
    "FillRectRot",
    "FillRoundU",
    "FillRoundRot",
    "FillTriangle",
    "FillPolyNZi10",
    "FillPolyEOi10",
    "FillPolyNZi20",
    "FillPolyEOi20",
    "FillPolyNZi40",
    "FillPolyEOi40",
    "FillButterfly",
    "FillFish",
    "FillDragon",
    "FillWorld",
    "StrokeRectA",
    "StrokeRectU",
    "StrokeRectRot",
    "StrokeRoundU",
    "StrokeRoundRot",
    "StrokeTriangle",
    "StrokePoly10",
    "StrokePoly20",
    "StrokePoly40",
    "StrokeButterfly",
    "StrokeFish",
    "StrokeDragon",
    "StrokeWorld",
];

/// Canonical style ordering.
pub const STYLE_ORDER: &[&str] = &["Solid", "Linear", "Radial", "Conic", "Pattern"];

const FALLBACK_COLOR: &str = "rgba(128, 128, 128, 0.8)";

// Renderer token -> fixed color, so a renderer keeps its color across
// threading variants and documents.
const RENDERER_COLORS: &[(&str, &str)] = &[
    ("blend2d", "rgba(255, 99, 132, 0.8)"),
    ("agg", "rgba(54, 162, 235, 0.8)"),
    ("cairo", "rgba(255, 206, 86, 0.8)"),
    ("skia", "rgba(75, 192, 192, 0.8)"),
    ("vello-cpu", "rgba(153, 102, 255, 0.8)"),
    ("tiny-skia", "rgba(255, 159, 64, 0.8)"),
    ("juce", "rgba(199, 199, 199, 0.8)"),
];

/// One chart column: a raster size with per-run values and colors,
/// index-aligned with `Projection::row_labels`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Column {
    pub label: String,
    pub values: Vec<f64>,
    pub colors: Vec<String>,
}

/// The size-ordered, run-ordered matrix handed to a rendering surface.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Projection {
    pub row_labels: Vec<String>,
    pub columns: Vec<Column>,
}

impl Projection {
    pub fn is_empty(&self) -> bool {
        self.row_labels.is_empty()
    }
}

/// Threading mode of a run, decided purely by its display name.
///
/// A whitespace token `ST` is the explicit single-thread marker; a token
/// of digits followed by `T` (`4T`, `16T`) declares a thread count.
/// Single-threaded mode keeps runs with an `ST` token or no thread-count
/// token at all; multi-threaded mode keeps only annotated runs. The
/// asymmetry (unannotated runs never appear in the multi view) matches
/// the upstream naming convention as observed.
pub fn run_matches_threading(name: &str, threading: Threading) -> bool {
    let has_single = name.split_whitespace().skip(1).any(|t| t == "ST");
    let has_count = name.split_whitespace().skip(1).any(is_thread_count_token);
    match threading {
        Threading::Single => has_single || !has_count,
        Threading::Multi => has_single || has_count,
    }
}

fn is_thread_count_token(token: &str) -> bool {
    let digits = token.chars().take_while(|c| c.is_ascii_digit()).count();
    digits > 0 && &token[digits..] == "T"
}

/// Chart color for a run: keyed on the renderer token, the text before
/// the first space, lower-cased. Unknown renderers get a neutral grey.
pub fn renderer_color(run_name: &str) -> &'static str {
    let token = run_name
        .split_whitespace()
        .next()
        .unwrap_or("")
        .to_lowercase();
    RENDERER_COLORS
        .iter()
        .find(|(name, _)| *name == token)
        .map(|(_, color)| *color)
        .unwrap_or(FALLBACK_COLOR)
}

fn find_record<'a>(run: &'a Run, test: &str, style: &str) -> Option<&'a Record> {
    run.records
        .iter()
        .find(|r| r.test == test && r.style == style)
}

fn metric_value(rcpms: f64, metric: Metric) -> f64 {
    match metric {
        // Rate -> duration of 1000 render calls; a zero rate renders as
        // zero duration rather than infinity.
        Metric::Time => {
            if rcpms > 0.0 {
                1000.0 / rcpms
            } else {
                0.0
            }
        }
        Metric::RenderCalls => rcpms,
    }
}

/// Project the current document through the current selection.
///
/// Runs are kept in document order; runs without a record for the selected
/// (test, style) are dropped entirely, not rendered as zero. Records whose
/// rcpms vector is shorter than the size axis contribute 0 at the missing
/// positions so the engine stays total on malformed input.
pub fn project(doc: &BenchmarkDocument, selection: &Selection) -> Projection {
    let (test, style) = match (&selection.test, &selection.style) {
        (Some(t), Some(s)) => (t.as_str(), s.as_str()),
        _ => return Projection::default(),
    };

    let mut row_labels = Vec::new();
    let mut rows: Vec<&Record> = Vec::new();
    let mut colors = Vec::new();

    for run in &doc.runs {
        if !run_matches_threading(&run.name, selection.threading) {
            continue;
        }
        if let Some(record) = find_record(run, test, style) {
            row_labels.push(run.name.clone());
            rows.push(record);
            colors.push(renderer_color(&run.name).to_string());
        }
    }

    let columns = doc
        .options
        .sizes
        .iter()
        .enumerate()
        .map(|(i, size)| Column {
            label: size.to_string(),
            values: rows
                .iter()
                .map(|r| metric_value(r.rcpms.get(i).copied().unwrap_or(0.0), selection.metric))
                .collect(),
            colors: colors.clone(),
        })
        .collect();

    Projection { row_labels, columns }
}

/// Distinct tests and styles across runs surviving the threading filter,
/// each ordered by its canonical priority list with leftovers appended in
/// first-seen order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Availability {
    pub tests: Vec<String>,
    pub styles: Vec<String>,
}

pub fn availability(doc: &BenchmarkDocument, threading: Threading) -> Availability {
    let mut tests_seen: Vec<String> = Vec::new();
    let mut styles_seen: Vec<String> = Vec::new();

    for run in &doc.runs {
        if !run_matches_threading(&run.name, threading) {
            continue;
        }
        for rec in &run.records {
            if !tests_seen.contains(&rec.test) {
                tests_seen.push(rec.test.clone());
            }
            if !styles_seen.contains(&rec.style) {
                styles_seen.push(rec.style.clone());
            }
        }
    }

    Availability {
        tests: prioritize(tests_seen, TEST_ORDER),
        styles: prioritize(styles_seen, STYLE_ORDER),
    }
}

fn prioritize(seen: Vec<String>, order: &[&str]) -> Vec<String> {
    let mut out: Vec<String> = order
        .iter()
        .filter(|name| seen.iter().any(|s| s == *name))
        .map(|name| name.to_string())
        .collect();
    for value in seen {
        if !out.contains(&value) {
            out.push(value);
        }
    }
    out
}

/// Auto-selection rule: keep the previous value if still offered,
/// otherwise fall back to the first offered value, otherwise none.
pub fn resolve_choice(previous: Option<&String>, offered: &[String]) -> Option<String> {
    match previous {
        Some(prev) if offered.iter().any(|v| v == prev) => Some(prev.clone()),
        _ => offered.first().cloned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DocumentOptions, SizeLabel};

    fn record(test: &str, style: &str, rcpms: Vec<f64>) -> Record {
        Record {
            test: test.to_string(),
            style: style.to_string(),
            rcpms,
        }
    }

    fn run(name: &str, records: Vec<Record>) -> Run {
        Run {
            name: name.to_string(),
            records,
        }
    }

    fn doc(runs: Vec<Run>, sizes: Vec<u64>) -> BenchmarkDocument {
        BenchmarkDocument {
            updated: String::new(),
            options: DocumentOptions {
                sizes: sizes.into_iter().map(SizeLabel::Num).collect(),
            },
            runs,
        }
    }

    fn selection(test: &str, style: &str, metric: Metric, threading: Threading) -> Selection {
        Selection {
            test: Some(test.to_string()),
            style: Some(style.to_string()),
            metric,
            threading,
        }
    }

    #[test]
    fn unset_test_or_style_projects_empty() {
        let d = doc(
            vec![run("agg ST", vec![record("FillRectA", "Solid", vec![1.0])])],
            vec![64],
        );
        let mut sel = Selection::default();
        assert!(project(&d, &sel).is_empty());
        sel.set_test(Some("FillRectA".to_string()));
        assert!(project(&d, &sel).is_empty(), "style still unset");
    }

    #[test]
    fn empty_document_projects_empty() {
        let d = BenchmarkDocument::default();
        let sel = selection("FillRectA", "Solid", Metric::Time, Threading::Single);
        assert!(project(&d, &sel).is_empty());
    }

    #[test]
    fn single_threaded_filter_keeps_st_and_unannotated() {
        assert!(run_matches_threading("agg ST", Threading::Single));
        assert!(run_matches_threading("skia", Threading::Single));
        assert!(!run_matches_threading("agg 4T", Threading::Single));
        // Annotated with both: ST wins for the single view
        assert!(run_matches_threading("blend2d ST", Threading::Single));
    }

    #[test]
    fn multi_threaded_filter_requires_annotation() {
        assert!(run_matches_threading("agg 4T", Threading::Multi));
        assert!(run_matches_threading("agg 16T", Threading::Multi));
        assert!(run_matches_threading("agg ST", Threading::Multi));
        // Unannotated runs never appear in the multi view
        assert!(!run_matches_threading("skia", Threading::Multi));
    }

    #[test]
    fn threading_filter_is_a_fixed_point() {
        let names = [
            "agg ST",
            "agg 4T",
            "skia",
            "blend2d 16T",
            "cairo ST",
            "vello-cpu",
        ];
        for threading in [Threading::Single, Threading::Multi] {
            let first: Vec<&&str> = names
                .iter()
                .filter(|n| run_matches_threading(n, threading))
                .collect();
            let second: Vec<&&str> = first
                .iter()
                .filter(|n| run_matches_threading(n, threading))
                .cloned()
                .collect();
            assert_eq!(first, second, "filter must be idempotent");
        }
        // The two modes partition annotated runs; unannotated are single-only
        for name in names {
            let single = run_matches_threading(name, Threading::Single);
            let multi = run_matches_threading(name, Threading::Multi);
            assert!(single || multi, "{} lost by both modes", name);
        }
    }

    #[test]
    fn time_metric_inverts_rate() {
        let d = doc(
            vec![
                run("agg ST", vec![record("FillRectA", "Solid", vec![10.0, 20.0])]),
                run("agg 4T", vec![record("FillRectA", "Solid", vec![40.0, 80.0])]),
            ],
            vec![64, 128],
        );
        let sel = selection("FillRectA", "Solid", Metric::Time, Threading::Single);
        let p = project(&d, &sel);
        assert_eq!(p.row_labels, vec!["agg ST"]);
        assert_eq!(p.columns.len(), 2);
        assert_eq!(p.columns[0].label, "64");
        assert!((p.columns[0].values[0] - 100.0).abs() < 1e-9);
        assert!((p.columns[1].values[0] - 50.0).abs() < 1e-9);
    }

    #[test]
    fn zero_rate_projects_zero_duration() {
        let d = doc(
            vec![run("agg ST", vec![record("FillRectA", "Solid", vec![0.0, 5.0])])],
            vec![64, 128],
        );
        let sel = selection("FillRectA", "Solid", Metric::Time, Threading::Single);
        let p = project(&d, &sel);
        assert_eq!(p.columns[0].values[0], 0.0);
        assert!((p.columns[1].values[0] - 200.0).abs() < 1e-9);
    }

    #[test]
    fn render_calls_metric_passes_through() {
        let d = doc(
            vec![run("agg ST", vec![record("FillRectA", "Solid", vec![12.5])])],
            vec![64],
        );
        let sel = selection("FillRectA", "Solid", Metric::RenderCalls, Threading::Single);
        let p = project(&d, &sel);
        assert_eq!(p.columns[0].values[0], 12.5);
    }

    #[test]
    fn runs_without_matching_record_are_dropped() {
        let d = doc(
            vec![
                run("agg ST", vec![record("FillRectA", "Solid", vec![1.0])]),
                run("cairo ST", vec![record("FillRectA", "Linear", vec![1.0])]),
                run("skia", vec![record("FillRectU", "Solid", vec![1.0])]),
            ],
            vec![64],
        );
        let sel = selection("FillRectA", "Solid", Metric::Time, Threading::Single);
        let p = project(&d, &sel);
        assert_eq!(p.row_labels, vec!["agg ST"]);
        assert_eq!(p.columns[0].values.len(), 1);
    }

    #[test]
    fn row_order_follows_document_order() {
        let d = doc(
            vec![
                run("skia", vec![record("FillRectA", "Solid", vec![1.0])]),
                run("agg ST", vec![record("FillRectA", "Solid", vec![2.0])]),
                run("blend2d ST", vec![record("FillRectA", "Solid", vec![4.0])]),
            ],
            vec![64],
        );
        let sel = selection("FillRectA", "Solid", Metric::RenderCalls, Threading::Single);
        let p = project(&d, &sel);
        assert_eq!(p.row_labels, vec!["skia", "agg ST", "blend2d ST"]);
        assert_eq!(p.columns[0].values, vec![1.0, 2.0, 4.0]);
    }

    #[test]
    fn color_depends_only_on_renderer_token() {
        assert_eq!(renderer_color("agg ST"), renderer_color("agg 4T"));
        assert_eq!(renderer_color("Blend2D ST"), renderer_color("blend2d 16T"));
        assert_eq!(renderer_color("tiny-skia"), "rgba(255, 159, 64, 0.8)");
        assert_eq!(renderer_color("mystery 2T"), "rgba(128, 128, 128, 0.8)");
        assert_eq!(renderer_color(""), "rgba(128, 128, 128, 0.8)");
    }

    #[test]
    fn short_rcpms_pads_with_zero() {
        let d = doc(
            vec![run("agg ST", vec![record("FillRectA", "Solid", vec![10.0])])],
            vec![64, 128],
        );
        let sel = selection("FillRectA", "Solid", Metric::RenderCalls, Threading::Single);
        let p = project(&d, &sel);
        assert_eq!(p.columns[1].values[0], 0.0);
    }

    #[test]
    fn availability_orders_by_priority_then_first_seen() {
        let d = doc(
            vec![
                run(
                    "agg ST",
                    vec![
                        record("FillWorld", "Pattern", vec![1.0]),
                        record("ZCustomTest", "ZCustomStyle", vec![1.0]),
                        record("FillRectA", "Solid", vec![1.0]),
                    ],
                ),
                run("agg 4T", vec![record("StrokeWorld", "Conic", vec![1.0])]),
                run("vello-cpu", vec![record("FillFish", "Radial", vec![1.0])]),
            ],
            vec![64],
        );
        // Single view: ST run + unannotated run, the 4T run is filtered out.
        // Priority entries first, in canonical order; unknown values last.
        let avail = availability(&d, Threading::Single);
        assert_eq!(
            avail.tests,
            vec!["FillRectA", "FillFish", "FillWorld", "ZCustomTest"]
        );
        assert_eq!(avail.styles, vec!["Solid", "Radial", "Pattern", "ZCustomStyle"]);
        // Multi view: ST-annotated runs stay alongside thread-count runs;
        // only the unannotated run drops out.
        let multi = availability(&d, Threading::Multi);
        assert_eq!(
            multi.tests,
            vec!["FillRectA", "FillWorld", "StrokeWorld", "ZCustomTest"]
        );
        assert_eq!(multi.styles, vec!["Solid", "Conic", "Pattern", "ZCustomStyle"]);
    }

    #[test]
    fn availability_has_no_duplicates() {
        let d = doc(
            vec![
                run("agg ST", vec![record("FillRectA", "Solid", vec![1.0])]),
                run("cairo ST", vec![record("FillRectA", "Solid", vec![1.0])]),
            ],
            vec![64],
        );
        let avail = availability(&d, Threading::Single);
        assert_eq!(avail.tests, vec!["FillRectA"]);
        assert_eq!(avail.styles, vec!["Solid"]);
    }

    #[test]
    fn resolve_choice_keeps_previous_else_first() {
        let offered = vec!["FillRectA".to_string(), "FillRectU".to_string()];
        let prev = "FillRectU".to_string();
        assert_eq!(resolve_choice(Some(&prev), &offered), Some(prev.clone()));
        let gone = "StrokeWorld".to_string();
        assert_eq!(
            resolve_choice(Some(&gone), &offered),
            Some("FillRectA".to_string())
        );
        assert_eq!(resolve_choice(None, &offered), Some("FillRectA".to_string()));
        assert_eq!(resolve_choice(Some(&prev), &[]), None);
    }
}
