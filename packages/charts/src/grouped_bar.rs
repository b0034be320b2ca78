//! Region comparison bars, switching between death rate and death count.

use road_safety_analytics::rates::{national_rate, observations_for_year};
use road_safety_chart_models::MetricMode;
use road_safety_dataset_models::RegionObservation;
use serde_json::{Value, json};

use crate::encoding::{DIMMED_OPACITY, SELECTED_OPACITY, selection_opacity};
use crate::palette::MORTAR;
use crate::{ChartError, VEGA_LITE_SCHEMA, ViewContext};

/// Axis and color settings for one metric mode.
struct Metric {
    field: &'static str,
    title: &'static str,
    axis_format: &'static str,
    axis_domain: [i32; 2],
    color_domain: [i32; 2],
}

const fn metric(mode: MetricMode) -> Metric {
    match mode {
        MetricMode::Rate => Metric {
            field: "death_rate",
            title: "Deaths per 100,000",
            axis_format: ".1f",
            axis_domain: [0, 35],
            color_domain: [5, 35],
        },
        MetricMode::Absolute => Metric {
            field: "deaths",
            title: "Total Deaths",
            axis_format: "~s",
            axis_domain: [0, 1200],
            color_domain: [0, 1200],
        },
    }
}

/// Builds the grouped bar for the map year and metric mode in `ctx`.
///
/// In rate mode a dashed rule marks the national rate.
///
/// # Errors
///
/// Returns [`ChartError::Analytics`] in either mode if the year has no
/// observations or zero total population.
pub fn build(regions: &[RegionObservation], ctx: &ViewContext<'_>) -> Result<Value, ChartError> {
    let observations = observations_for_year(regions, ctx.params.map_year);
    let national = national_rate(&observations)?;
    let mode = ctx.params.metric_mode;
    let metric = metric(mode);

    let mut layers = vec![json!({
        "mark": {"type": "bar", "cursor": "pointer"},
        "encoding": {
            "y": {
                "field": "state_title",
                "type": "nominal",
                "sort": "-x",
                "title": null,
                "axis": {"labelLimit": 150}
            },
            "x": {
                "field": metric.field,
                "type": "quantitative",
                "title": metric.title,
                "axis": {"format": metric.axis_format},
                "scale": {"domain": metric.axis_domain}
            },
            "color": {
                "field": metric.field,
                "type": "quantitative",
                "scale": {"scheme": "orangered", "domain": metric.color_domain},
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
                {"field": "deaths", "title": "Deaths", "format": ","},
                {"field": "death_rate", "title": "Rate per 100k", "format": ".1f"}
            ]
        }
    })];

    if mode == MetricMode::Rate {
        layers.push(json!({
            "mark": {"type": "rule", "color": MORTAR, "strokeDash": [4, 3], "strokeWidth": 2},
            "encoding": {"x": {"datum": national}}
        }));
        layers.push(json!({
            "mark": {
                "type": "text",
                "align": "left",
                "dx": 5,
                "dy": 220,
                "fontSize": 12,
                "fontWeight": "bold",
                "color": MORTAR
            },
            "encoding": {
                "x": {"datum": national},
                "text": {"datum": format!("National Avg: {national:.1}")}
            }
        }));
    }

    Ok(json!({
        "$schema": VEGA_LITE_SCHEMA,
        "width": 450,
        "height": 450,
        "data": {"values": observations},
        "layer": layers
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ChartSettings;
    use crate::fixtures::regions;
    use road_safety_analytics::AnalyticsError;
    use road_safety_analytics::rates::national_rate;
    use road_safety_chart_models::{Selection, ViewParams};

    fn try_build(
        mode: MetricMode,
        map_year: i32,
        selection: &Selection,
    ) -> Result<Value, ChartError> {
        let records = regions();
        let params = ViewParams {
            metric_mode: mode,
            map_year,
            ..ViewParams::default()
        };
        let settings = ChartSettings::default();
        let ctx = ViewContext {
            params: &params,
            selection,
            settings: &settings,
        };
        build(&records, &ctx)
    }

    fn build_with(mode: MetricMode, selection: &Selection) -> Value {
        try_build(mode, ViewParams::default().map_year, selection).unwrap()
    }

    #[test]
    fn rate_mode_draws_national_reference() {
        let spec = build_with(MetricMode::Rate, &Selection::default());
        let layers = spec["layer"].as_array().unwrap();

        let records = regions();
        let expected = national_rate(&observations_for_year(&records, 2019)).unwrap();

        assert_eq!(layers.len(), 3);
        assert_eq!(layers[0]["encoding"]["x"]["field"], "death_rate");
        assert_eq!(layers[0]["encoding"]["x"]["scale"]["domain"], json!([0, 35]));
        assert_eq!(layers[1]["mark"]["strokeDash"], json!([4, 3]));
        assert_eq!(layers[1]["encoding"]["x"]["datum"], expected);
        assert_eq!(
            layers[2]["encoding"]["text"]["datum"],
            format!("National Avg: {expected:.1}")
        );
    }

    #[test]
    fn absolute_mode_switches_field_and_domains() {
        let spec = build_with(MetricMode::Absolute, &Selection::default());
        let layers = spec["layer"].as_array().unwrap();

        assert_eq!(layers.len(), 1);
        let encoding = &layers[0]["encoding"];
        assert_eq!(encoding["x"]["field"], "deaths");
        assert_eq!(encoding["x"]["scale"]["domain"], json!([0, 1200]));
        assert_eq!(encoding["color"]["scale"]["domain"], json!([0, 1200]));
    }

    #[test]
    fn only_map_year_rows_are_inlined() {
        let spec = build_with(MetricMode::Rate, &Selection::of("Perlis"));
        let values = spec["data"]["values"].as_array().unwrap();

        assert_eq!(values.len(), 4);
        assert_eq!(
            spec["layer"][0]["encoding"]["opacity"]["condition"]["test"],
            "datum.state_title == 'Perlis'"
        );
    }

    #[test]
    fn empty_year_fails_in_both_modes() {
        for mode in [MetricMode::Rate, MetricMode::Absolute] {
            let err = try_build(mode, 1990, &Selection::default()).unwrap_err();
            assert!(
                matches!(err, ChartError::Analytics(AnalyticsError::NoObservations)),
                "{mode} built an empty year"
            );
        }
    }
}
