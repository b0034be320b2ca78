//! Region deaths in one year against another, with a top-movers caption.

use road_safety_analytics::comparison::{TOP_MOVERS_COUNT, compare_years, max_deaths, top_movers};
use road_safety_analytics_models::YearComparison;
use road_safety_dataset_models::RegionObservation;
use serde_json::{Value, json};

use crate::encoding::{annotation_box, caption_mark, pinned_text, selection_opacity};
use crate::palette::{LIGHT_GRAY, region_color_scale};
use crate::{ChartError, VEGA_LITE_SCHEMA, ViewContext};

/// Point opacity when nothing is selected, or of the selected region.
pub const SELECTED_OPACITY: f64 = 0.8;
/// Point opacity of unselected regions.
pub const DIMMED_OPACITY: f64 = 0.2;

/// Headroom above the largest count on both axes.
const DOMAIN_HEADROOM: f64 = 1.1;

const CAPTION_LINE_HEIGHT: f64 = 12.0;

const HEADING_X: f64 = 20.0;
const ITEM_X: f64 = 25.0;

/// Caption lines for the top-movers box as `(text, x, y)`.
fn mover_captions(comparisons: &[YearComparison]) -> Vec<(String, f64, f64)> {
    let movers = top_movers(comparisons, TOP_MOVERS_COUNT);
    let mut lines = vec![("Top 3 Improvers (↓)".to_string(), HEADING_X, 25.0)];

    let mut y = 40.0;
    for (i, mover) in movers.improvers.iter().enumerate() {
        let pct = mover.pct_change.unwrap_or_default();
        lines.push((format!("{}. {}: {pct:.1}%", i + 1, mover.state), ITEM_X, y));
        y += CAPTION_LINE_HEIGHT;
    }

    lines.push(("Top 3 Decliners (↑)".to_string(), HEADING_X, 85.0));

    let mut y = 100.0;
    for (i, mover) in movers.decliners.iter().enumerate() {
        let pct = mover.pct_change.unwrap_or_default();
        lines.push((format!("{}. {}: {pct:+.1}%", i + 1, mover.state), ITEM_X, y));
        y += CAPTION_LINE_HEIGHT;
    }

    lines
}

/// Builds the scatter comparing the two scatter years in `ctx`.
///
/// # Errors
///
/// Returns [`ChartError::Analytics`] if no region has records in both
/// years.
pub fn build(regions: &[RegionObservation], ctx: &ViewContext<'_>) -> Result<Value, ChartError> {
    let year_a = ctx.params.scatter_year_a;
    let year_b = ctx.params.scatter_year_b;
    let comparisons = compare_years(regions, year_a, year_b)?;

    let max = f64::from(max_deaths(&comparisons));
    let domain = json!([0.0, max * DOMAIN_HEADROOM]);
    let scale = region_color_scale(comparisons.iter().map(|c| c.state.as_str()));

    let mut layers = vec![
        json!({
            "data": {"values": [{"x": 0.0, "y": 0.0}, {"x": max, "y": max}]},
            "mark": {"type": "line", "color": LIGHT_GRAY, "strokeDash": [5, 5], "strokeWidth": 2},
            "encoding": {
                "x": {"field": "x", "type": "quantitative", "scale": {"domain": domain}},
                "y": {"field": "y", "type": "quantitative", "scale": {"domain": domain}}
            }
        }),
        json!({
            "data": {"values": comparisons},
            "mark": {"type": "circle", "size": 150, "cursor": "pointer"},
            "encoding": {
                "x": {
                    "field": "deaths_a",
                    "type": "quantitative",
                    "title": format!("Deaths ({year_a})"),
                    "scale": {"domain": domain}
                },
                "y": {
                    "field": "deaths_b",
                    "type": "quantitative",
                    "title": format!("Deaths ({year_b})"),
                    "scale": {"domain": domain}
                },
                "color": {
                    "field": "state",
                    "type": "nominal",
                    "scale": scale,
                    "legend": {"title": "State", "labelLimit": 150, "columns": 2}
                },
                "opacity": selection_opacity("state", ctx.selection, SELECTED_OPACITY, DIMMED_OPACITY),
                "tooltip": [
                    {"field": "state", "title": "State"},
                    {"field": "deaths_a", "title": year_a.to_string(), "format": ","},
                    {"field": "deaths_b", "title": year_b.to_string(), "format": ","},
                    {"field": "pct_change", "title": "Change", "format": "+.1f"}
                ]
            }
        }),
        annotation_box(10.0, 200.0, 10.0, 155.0, 0.95),
    ];

    layers.extend(
        mover_captions(&comparisons)
            .iter()
            .map(|(text, x, y)| pinned_text(text, *x, *y, caption_mark())),
    );

    Ok(json!({
        "$schema": VEGA_LITE_SCHEMA,
        "width": 600,
        "height": 500,
        "layer": layers
    }))
}
