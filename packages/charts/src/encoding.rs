//! Encoding fragments shared across charts.

use road_safety_chart_models::{ChartId, Selection};
use serde_json::{Value, json};

use crate::palette::{FONT_FAMILY, MORTAR};

/// Opacity of marks when nothing is selected, or of the selected mark.
pub const SELECTED_OPACITY: f64 = 1.0;
/// Opacity of unselected marks while a region is selected.
pub const DIMMED_OPACITY: f64 = 0.3;

/// Quotes `value` as a single-quoted Vega expression string literal.
#[must_use]
pub fn expr_string(value: &str) -> String {
    let escaped = value.replace('\\', "\\\\").replace('\'', "\\'");
    format!("'{escaped}'")
}

/// Opacity encoding that highlights the selected region.
///
/// With no selection the condition always holds, so every mark gets
/// `selected`. With a selection, marks whose `field` equals the selected
/// region get `selected` and the rest get `dimmed`.
#[must_use]
pub fn selection_opacity(field: &str, selection: &Selection, selected: f64, dimmed: f64) -> Value {
    let test = selection.region().map_or_else(
        || "true".to_string(),
        |region| format!("datum.{field} == {}", expr_string(region)),
    );

    json!({
        "condition": {"test": test, "value": selected},
        "value": dimmed
    })
}

/// A text mark pinned at a fixed pixel position.
#[must_use]
pub fn pinned_text(text: &str, x: f64, y: f64, mark: Value) -> Value {
    json!({
        "data": {"values": [{"text": text}]},
        "mark": mark,
        "encoding": {
            "x": {"value": x},
            "y": {"value": y},
            "text": {"field": "text"}
        }
    })
}

/// Bold, left-aligned annotation mark in the annotation gray.
#[must_use]
pub fn caption_mark() -> Value {
    json!({
        "type": "text",
        "fontSize": 12,
        "fontWeight": "bold",
        "align": "left",
        "color": MORTAR
    })
}

/// White annotation box at fixed pixel bounds.
#[must_use]
pub fn annotation_box(x: f64, x2: f64, y: f64, y2: f64, opacity: f64) -> Value {
    json!({
        "data": {"values": [{}]},
        "mark": {
            "type": "rect",
            "x": x,
            "x2": x2,
            "y": y,
            "y2": y2,
            "fill": "white",
            "stroke": MORTAR,
            "strokeWidth": 1.5,
            "opacity": opacity
        }
    })
}

/// Adds the shared font configuration to a top-level spec.
#[must_use]
pub fn with_font_config(mut spec: Value) -> Value {
    if let Some(obj) = spec.as_object_mut() {
        obj.insert(
            "config".to_string(),
            json!({
                "axis": {"labelFont": FONT_FAMILY, "titleFont": FONT_FAMILY},
                "legend": {"labelFont": FONT_FAMILY, "titleFont": FONT_FAMILY},
                "header": {"labelFont": FONT_FAMILY, "titleFont": FONT_FAMILY}
            }),
        );
    }
    spec
}

/// Options passed to the embed call for `chart`.
#[must_use]
pub fn embed_options(chart: ChartId) -> Value {
    if chart.definition().custom_tooltip {
        json!({"actions": false, "tooltip": {"theme": "custom"}})
    } else {
        json!({"actions": false})
    }
}
