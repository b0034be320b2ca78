//! Vehicles, crashes, and deaths as three stacked line panels.

use road_safety_dataset_models::ExposureRecord;
use serde_json::{Value, json};

use crate::VEGA_LITE_SCHEMA;
use crate::palette::{BLUE, MORTAR, ORANGE};

/// Year domain shared by all three panels.
pub const YEAR_DOMAIN: [i32; 2] = [2003, 2016];

/// Year at which each panel's percent-change annotation is anchored.
const ANNOTATION_YEAR: f64 = 2009.5;

struct Panel {
    title: &'static str,
    field: &'static str,
    axis_title: &'static str,
    tooltip_title: &'static str,
    color: &'static str,
    y_format: &'static str,
    y_domain: [u64; 2],
    y_ticks: Option<&'static [u64]>,
    annotation_y: u64,
    annotation: &'static str,
}

const PANELS: &[Panel] = &[
    Panel {
        title: "Registered Vehicles (Millions)",
        field: "vehicles",
        axis_title: "Vehicles (M)",
        tooltip_title: "Vehicles",
        color: BLUE,
        y_format: ".2s",
        y_domain: [8_000_000, 28_000_000],
        y_ticks: None,
        annotation_y: 20_000_000,
        annotation: "+116%",
    },
    Panel {
        title: "Road Crashes (Thousands)",
        field: "crashes",
        axis_title: "Crashes (K)",
        tooltip_title: "Crashes",
        color: ORANGE,
        y_format: ".3s",
        y_domain: [200_000, 550_000],
        y_ticks: None,
        annotation_y: 400_000,
        annotation: "+75%",
    },
    Panel {
        title: "Road Deaths (Thousands)",
        field: "deaths",
        axis_title: "Deaths",
        tooltip_title: "Deaths",
        color: MORTAR,
        y_format: ".4~s",
        y_domain: [5800, 7300],
        y_ticks: Some(&[6000, 6200, 6400, 6600, 6800, 7000, 7200]),
        annotation_y: 6850,
        annotation: "+14%",
    },
];

/// Builds the stacked exposure panels.
#[must_use]
pub fn build(series: &[ExposureRecord]) -> Value {
    let last = PANELS.len() - 1;
    let panels: Vec<Value> = PANELS
        .iter()
        .enumerate()
        .map(|(i, panel)| build_panel(panel, series, i == last))
        .collect();

    json!({
        "$schema": VEGA_LITE_SCHEMA,
        "vconcat": panels,
        "spacing": 10
    })
}

/// Only the bottom panel labels the shared year axis.
fn build_panel(panel: &Panel, series: &[ExposureRecord], bottom: bool) -> Value {
    let x_axis = if bottom {
        json!({"format": "d"})
    } else {
        json!({"format": "d", "labels": false})
    };

    let x_title = if bottom { json!("Year") } else { Value::Null };

    let mut y_axis = json!({"format": panel.y_format});
    if let Some(ticks) = panel.y_ticks {
        y_axis["values"] = json!(ticks);
    }

    json!({
        "width": 450,
        "height": 120,
        "title": panel.title,
        "data": {"values": series},
        "layer": [
            {
                "mark": {"type": "line", "point": true, "strokeWidth": 2, "color": panel.color},
                "encoding": {
                    "x": {
                        "field": "year",
                        "type": "quantitative",
                        "title": x_title,
                        "axis": x_axis,
                        "scale": {"domain": YEAR_DOMAIN}
                    },
                    "y": {
                        "field": panel.field,
                        "type": "quantitative",
                        "title": panel.axis_title,
                        "axis": y_axis,
                        "scale": {"domain": panel.y_domain}
                    },
                    "tooltip": [
                        {"field": "year", "title": "Year"},
                        {"field": panel.field, "title": panel.tooltip_title, "format": ","}
                    ]
                }
            },
            {
                "mark": {
                    "type": "text",
                    "align": "center",
                    "dy": -10,
                    "fontWeight": "bold",
                    "fontSize": 12,
                    "color": panel.color
                },
                "encoding": {
                    "x": {"datum": ANNOTATION_YEAR},
                    "y": {"datum": panel.annotation_y},
                    "text": {"datum": panel.annotation}
                }
            }
        ]
    })
}
