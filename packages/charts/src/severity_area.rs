//! National casualties by severity as a stacked area with a fixed caption.

use road_safety_dataset_models::{Severity, SeverityRecord};
use serde_json::{Value, json};

use crate::VEGA_LITE_SCHEMA;
use crate::encoding::{annotation_box, pinned_text};
use crate::palette::{MORTAR, severity_color};

/// Year domain of the severity series.
pub const YEAR_DOMAIN: [i32; 2] = [2003, 2016];

enum CaptionStyle {
    Bold,
    Italic,
}

/// Trend captions computed offline from the full series: `(text, y, style)`.
const CAPTIONS: &[(&str, f64, CaptionStyle)] = &[
    ("The Severity Paradox:", 35.0, CaptionStyle::Bold),
    ("Total casualties ↓64%", 53.0, CaptionStyle::Bold),
    ("BUT Deaths ↑14%", 70.0, CaptionStyle::Bold),
    ("(2003–2016)", 85.0, CaptionStyle::Italic),
];

const CAPTION_X: f64 = 270.0;

/// Builds the stacked severity area.
#[must_use]
pub fn build(series: &[SeverityRecord]) -> Value {
    let domain: Vec<&str> = Severity::all().iter().map(AsRef::as_ref).collect();
    let range: Vec<&str> = Severity::all().iter().map(|s| severity_color(*s)).collect();

    let mut layers = vec![
        json!({
            "data": {"values": series},
            "mark": "area",
            "encoding": {
                "x": {
                    "field": "year",
                    "type": "quantitative",
                    "title": "Year",
                    "axis": {"format": "d", "tickCount": 10},
                    "scale": {"domain": YEAR_DOMAIN}
                },
                "y": {
                    "field": "count",
                    "type": "quantitative",
                    "title": "Number of Cases",
                    "stack": "zero"
                },
                "color": {
                    "field": "severity",
                    "type": "nominal",
                    "scale": {"domain": domain, "range": range},
                    "legend": {"title": "Severity", "orient": "top"}
                },
                "tooltip": [
                    {"field": "year", "title": "Year"},
                    {"field": "severity", "title": "Severity"},
                    {"field": "count", "title": "Count", "format": ","}
                ]
            }
        }),
        annotation_box(260.0, 440.0, 20.0, 95.0, 0.9),
    ];

    layers.extend(CAPTIONS.iter().map(|(text, y, style)| {
        let mut mark = json!({
            "type": "text",
            "fontSize": 12,
            "align": "left",
            "color": MORTAR
        });
        match style {
            CaptionStyle::Bold => mark["fontWeight"] = json!("bold"),
            CaptionStyle::Italic => mark["fontStyle"] = json!("italic"),
        }
        pinned_text(text, CAPTION_X, *y, mark)
    }));

    json!({
        "$schema": VEGA_LITE_SCHEMA,
        "width": 450,
        "height": 300,
        "layer": layers
    })
}
