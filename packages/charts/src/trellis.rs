//! Small multiples of deaths over time, one panel per region.

use road_safety_dataset_models::RegionObservation;
use serde_json::{Value, json};

use crate::encoding::{DIMMED_OPACITY, SELECTED_OPACITY, selection_opacity};
use crate::palette::region_color_scale;
use crate::{VEGA_LITE_SCHEMA, ViewContext};

/// Year domain shared by every panel.
pub const YEAR_DOMAIN: [i32; 2] = [2003, 2019];
/// Death-count domain shared by every panel.
pub const DEATHS_DOMAIN: [i32; 2] = [0, 1200];

const COLUMNS: u32 = 5;

/// Builds the trellis over every region observation.
#[must_use]
pub fn build(regions: &[RegionObservation], ctx: &ViewContext<'_>) -> Value {
    let mut names: Vec<&str> = Vec::new();
    for obs in regions {
        if !names.contains(&obs.state_title.as_str()) {
            names.push(&obs.state_title);
        }
    }

    json!({
        "$schema": VEGA_LITE_SCHEMA,
        "data": {"values": regions},
        "columns": COLUMNS,
        "facet": {"field": "state_title", "type": "nominal", "title": null},
        "spec": {
            "width": 180,
            "height": 110,
            "mark": {"type": "line", "point": true, "strokeWidth": 1.5, "cursor": "pointer"},
            "encoding": {
                "x": {
                    "field": "year",
                    "type": "quantitative",
                    "axis": {"title": "Year", "format": "d", "tickCount": 5, "labelFontSize": 12},
                    "scale": {"domain": YEAR_DOMAIN}
                },
                "y": {
                    "field": "deaths",
                    "type": "quantitative",
                    "axis": {"title": "Deaths", "tickCount": 5, "labelFontSize": 12},
                    "scale": {"zero": true, "domain": DEATHS_DOMAIN}
                },
                "color": {
                    "field": "state_title",
                    "type": "nominal",
                    "scale": region_color_scale(names),
                    "legend": null
                },
                "opacity": selection_opacity(
                    "state_title",
                    ctx.selection,
                    SELECTED_OPACITY,
                    DIMMED_OPACITY
                ),
                "tooltip": [
                    {"field": "state_title", "title": "State"},
                    {"field": "year", "title": "Year"},
                    {"field": "deaths", "title": "Deaths", "format": ","}
                ]
            }
        },
        "resolve": {"scale": {"y": "shared"}}
    })
}
