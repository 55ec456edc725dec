//! Surface payloads built from a projection.
//!
//! The chart itself is drawn elsewhere; this module only fulfils the
//! boundary contract: row labels, per-size series, colors, a title, and
//! the value-formatting rules. Two consumers are served: a Chart.js-style
//! config object and a plain terminal bar chart.

use serde_json::{json, Value};
use std::fmt::Write as _;

use crate::projection::Projection;
use crate::state::Metric;

const BAR_WIDTH: usize = 40;

pub fn chart_title(metric: Metric) -> &'static str {
    match metric {
        Metric::Time => "Time of 1000 render calls",
        Metric::RenderCalls => "Render calls per 1ms",
    }
}

/// Display form of a value: 2 decimals under 1, 1 decimal under 10,
/// integer from 10 up. TIME mode appends the unit.
pub fn format_value(value: f64, metric: Metric) -> String {
    let body = if value < 1.0 {
        format!("{:.2}", value)
    } else if value < 10.0 {
        format!("{:.1}", value)
    } else {
        format!("{}", value.round() as i64)
    };
    match metric {
        Metric::Time => format!("{} ms", body),
        Metric::RenderCalls => body,
    }
}

fn border_color(fill: &str) -> String {
    // Fill colors carry 0.8 alpha; the outline is the opaque variant.
    fill.replace("0.8", "1")
}

/// Chart.js-style horizontal grouped bar config. This is the whole
/// obligation toward the charting collaborator: one dataset per size,
/// values and colors index-aligned with `labels`.
pub fn chart_config(projection: &Projection, metric: Metric) -> Value {
    let datasets: Vec<Value> = projection
        .columns
        .iter()
        .map(|col| {
            let borders: Vec<String> = col.colors.iter().map(|c| border_color(c)).collect();
            json!({
                "label": col.label,
                "data": col.values,
                "backgroundColor": col.colors,
                "borderColor": borders,
                "borderWidth": 1,
            })
        })
        .collect();

    json!({
        "type": "bar",
        "data": {
            "labels": projection.row_labels,
            "datasets": datasets,
        },
        "options": {
            "indexAxis": "y",
            "plugins": {
                "title": { "display": true, "text": chart_title(metric) },
                "legend": { "display": false },
            },
        },
    })
}

/// Terminal rendering: one block per run, one bar per size, all bars
/// scaled against the projection-wide maximum.
pub fn ascii_chart(projection: &Projection, metric: Metric) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", chart_title(metric));
    let _ = writeln!(out, "{}", "=".repeat(chart_title(metric).len()));

    if projection.is_empty() {
        let _ = writeln!(out, "(no data for current selection)");
        return out;
    }

    let max = projection
        .columns
        .iter()
        .flat_map(|c| c.values.iter())
        .fold(0.0f64, |acc, v| acc.max(*v));

    let label_width = projection
        .columns
        .iter()
        .map(|c| c.label.len())
        .max()
        .unwrap_or(0);

    for (row, name) in projection.row_labels.iter().enumerate() {
        let _ = writeln!(out, "{}", name);
        for col in &projection.columns {
            let value = col.values[row];
            let filled = if max > 0.0 {
                ((value / max) * BAR_WIDTH as f64).round() as usize
            } else {
                0
            };
            let _ = writeln!(
                out,
                "  {:>width$} | {}{} {}",
                col.label,
                "#".repeat(filled.min(BAR_WIDTH)),
                " ".repeat(BAR_WIDTH - filled.min(BAR_WIDTH)),
                format_value(value, metric),
                width = label_width
            );
        }
    }
    out
}
