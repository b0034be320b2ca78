//! Each region's death rate relative to the national rate.

use road_safety_analytics::rates::{deviations, national_rate, observations_for_year};
use road_safety_dataset_models::RegionObservation;
use serde_json::{Value, json};

use crate::encoding::{DIMMED_OPACITY, SELECTED_OPACITY, pinned_text, selection_opacity};
use crate::palette::{MORTAR, PICTON, TENNE};
use crate::{ChartError, VEGA_LITE_SCHEMA, ViewContext};

/// Deviation axis domain, symmetric around the national rate.
pub const DEVIATION_DOMAIN: [i32; 2] = [-15, 15];

fn legend_caption(text: &str, x: f64, y: f64, align: &str, color: &str) -> Value {
    pinned_text(
        text,
        x,
        y,
        json!({
            "type": "text",
            "fontSize": 12,
            "fontWeight": "bold",
            "color": color,
            "align": align
        }),
    )
}

/// Builds the deviation bar for the map year in `ctx`.
///
/// # Errors
///
/// Returns [`ChartError::Analytics`] if the year has no observations or
/// zero total population.
pub fn build(regions: &[RegionObservation], ctx: &ViewContext<'_>) -> Result<Value, ChartError> {
    let observations = observations_for_year(regions, ctx.params.map_year);
    let national = national_rate(&observations)?;
    let rows = deviations(&observations, national);

    Ok(json!({
        "$schema": VEGA_LITE_SCHEMA,
        "width": 450,
        "height": 450,
        "data": {"values": rows},
        "layer": [
            {
                "mark": {"type": "rule", "color": MORTAR, "strokeWidth": 2},
                "encoding": {"x": {"datum": 0}}
            },
            {
                "mark": {"type": "bar", "size": 18, "cursor": "pointer"},
                "encoding": {
                    "y": {
                        "field": "state",
                        "type": "nominal",
                        "title": null,
                        "sort": "-x",
                        "axis": {"labelLimit": 150}
                    },
                    "x": {
                        "field": "deviation",
                        "type": "quantitative",
                        "title": "Deviation from National Average",
                        "scale": {"domain": DEVIATION_DOMAIN}
                    },
                    "color": {
                        "condition": {"test": "datum.deviation > 0", "value": TENNE},
                        "value": PICTON
                    },
                    "opacity": selection_opacity(
                        "state",
                        ctx.selection,
                        SELECTED_OPACITY,
                        DIMMED_OPACITY
                    ),
                    "tooltip": [
                        {"field": "state", "title": "State"},
                        {"field": "death_rate", "title": "State Rate", "format": ".1f"},
                        {"field": "national_rate", "title": "National Rate", "format": ".1f"},
                        {"field": "deviation", "title": "Deviation", "format": "+.1f"}
                    ]
                }
            },
            legend_caption("Above National Avg", 410.0, 430.0, "right", TENNE),
            legend_caption("Below National Avg", 40.0, 20.0, "left", PICTON)
        ]
    }))
}
