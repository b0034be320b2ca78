//! Region death rates on a map, with national and extreme-rate captions.

use road_safety_analytics::rates::{national_rate, observations_for_year, rate_extremes};
use road_safety_dataset_models::{Boundaries, RegionObservation};
use road_safety_geography::join::{JOINED_FIELDS, LOOKUP_KEY, join_boundaries, lookup_values};
use serde_json::{Value, json};

use crate::encoding::{DIMMED_OPACITY, SELECTED_OPACITY, pinned_text, selection_opacity};
use crate::palette::MORTAR;
use crate::{ChartError, VEGA_LITE_SCHEMA, ViewContext};

/// Color-scale domain for death rates.
pub const RATE_COLOR_DOMAIN: [i32; 2] = [5, 35];

/// Caption lines for the map: national rate, highest, and lowest region.
///
/// # Errors
///
/// Returns [`ChartError::Analytics`] if `observations` is empty or sums to
/// zero population.
pub fn captions(observations: &[&RegionObservation]) -> Result<[String; 3], ChartError> {
    let national = national_rate(observations)?;
    let extremes = rate_extremes(observations)?;

    Ok([
        format!("National: {national:.1} per 100k"),
        format!(
            "Highest rate: {} ({:.1})",
            extremes.highest.state_title, extremes.highest.death_rate
        ),
        format!(
            "Lowest rate: {} ({:.1})",
            extremes.lowest.state_title, extremes.lowest.death_rate
        ),
    ])
}

/// Data source and transforms for the map layer.
///
/// Feature collections are joined up front. Topologies are inlined with a
/// lookup transform over the translated observations.
fn map_source(
    boundaries: &Boundaries,
    observations: &[&RegionObservation],
    ctx: &ViewContext<'_>,
) -> Result<(Value, Vec<Value>), ChartError> {
    let name_property = &ctx.settings.boundary_name_property;

    match boundaries {
        Boundaries::Features(collection) => {
            let joined = join_boundaries(collection, observations, name_property)?;
            let data = json!({
                "values": serde_json::to_value(&joined)?,
                "format": {"type": "json", "property": "features"}
            });
            Ok((data, Vec::new()))
        }
        Boundaries::Topology(topology) => {
            let object = &ctx.settings.topology_object;
            if !boundaries.has_topology_object(object) {
                return Err(ChartError::MissingTopologyObject {
                    object: object.clone(),
                });
            }
            let data = json!({
                "values": topology,
                "format": {"type": "topojson", "feature": object}
            });
            let lookup = json!({
                "lookup": format!("properties.{name_property}"),
                "from": {
                    "data": {"values": lookup_values(observations)},
                    "key": LOOKUP_KEY,
                    "fields": JOINED_FIELDS
                }
            });
            Ok((data, vec![lookup]))
        }
    }
}

/// Builds the choropleth for the map year in `ctx`.
///
/// # Errors
///
/// Returns [`ChartError`] if the year has no observations, a boundary has
/// no name, the topology lacks the configured object, or the joined
/// features cannot be serialized.
pub fn build(
    regions: &[RegionObservation],
    boundaries: &Boundaries,
    ctx: &ViewContext<'_>,
) -> Result<Value, ChartError> {
    let year = ctx.params.map_year;
    let observations = observations_for_year(regions, year);
    let [national, highest, lowest] = captions(&observations)?;

    let (data, transform) = map_source(boundaries, &observations, ctx)?;
    let name_field = format!("properties.{}", ctx.settings.boundary_name_property);

    let national_mark = json!({
        "type": "text",
        "fontSize": 12,
        "fontWeight": "bold",
        "fill": MORTAR,
        "align": "left"
    });
    let badge_mark = json!({"type": "text", "fontSize": 12, "fill": MORTAR, "align": "left"});

    Ok(json!({
        "$schema": VEGA_LITE_SCHEMA,
        "width": 900,
        "height": 550,
        "layer": [
            {
                "data": data,
                "transform": transform,
                "mark": {
                    "type": "geoshape",
                    "stroke": "white",
                    "strokeWidth": 1.5,
                    "cursor": "pointer"
                },
                "encoding": {
                    "color": {
                        "field": "death_rate",
                        "type": "quantitative",
                        "scale": {"scheme": "orangered", "domain": RATE_COLOR_DOMAIN},
                        "legend": {
                            "title": "Deaths per 100,000",
                            "orient": "bottom-left",
                            "gradientLength": 300
                        }
                    },
                    "opacity": selection_opacity(
                        "state_title",
                        ctx.selection,
                        SELECTED_OPACITY,
                        DIMMED_OPACITY
                    ),
                    "tooltip": [
                        {"field": name_field, "type": "nominal", "title": "State"},
                        {"datum": year, "title": "Year"},
                        {"field": "deaths", "type": "quantitative", "title": "Total Deaths", "format": ","},
                        {"field": "population", "type": "quantitative", "title": "Population (000s)", "format": ",.1f"},
                        {"field": "death_rate", "type": "quantitative", "title": "Rate per 100,000", "format": ".1f"}
                    ]
                },
                "projection": {"type": "mercator", "center": [108, 4], "scale": 2800}
            },
            pinned_text(&national, 20.0, 20.0, national_mark),
            pinned_text(&highest, 20.0, 40.0, badge_mark.clone()),
            pinned_text(&lowest, 20.0, 55.0, badge_mark)
        ]
    }))
}
