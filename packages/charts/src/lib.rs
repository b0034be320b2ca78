#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Vega-Lite spec builders for the road safety dashboard.
//!
//! Each chart module exposes a `build` function that is a pure function of
//! its dataset slice and the [`ViewContext`] (view parameters, selection,
//! and chart settings). [`build_chart`] dispatches on [`ChartId`] and wraps
//! the result in a [`ChartSpec`] carrying the embed target, embed options,
//! and click-to-selection field.

pub mod choropleth;
pub mod country_rate;
pub mod deviation_bar;
pub mod encoding;
pub mod exposure;
pub mod grouped_bar;
pub mod palette;
pub mod scatter;
pub mod severity_area;
pub mod trellis;

use road_safety_analytics::AnalyticsError;
use road_safety_chart_models::{ChartId, ChartSpec, Selection, ViewParams};
use road_safety_dataset_models::{
    Boundaries, CountryRate, ExposureRecord, RegionObservation, SeverityRecord,
};
use road_safety_geography::GeoError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Vega-Lite schema every spec declares.
pub const VEGA_LITE_SCHEMA: &str = "https://vega.github.io/schema/vega-lite/v5.json";

/// Errors that can occur while building a chart.
#[derive(Debug, Error)]
pub enum ChartError {
    /// Deriving a caption or dataset failed.
    #[error("Analytics error: {0}")]
    Analytics(#[from] AnalyticsError),

    /// Joining boundaries to observations failed.
    #[error("Geography error: {0}")]
    Geography(#[from] GeoError),

    /// The boundary topology has no object with the configured name.
    #[error("Boundary topology has no object named '{object}'")]
    MissingTopologyObject {
        /// Object name that was expected.
        object: String,
    },

    /// Serializing chart data failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The chart was handed a dataset it does not read.
    #[error("Chart {chart} cannot be built from the supplied dataset")]
    DatasetMismatch {
        /// The chart being built.
        chart: ChartId,
    },
}

/// Static chart settings that are configurable but not control-bound.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct ChartSettings {
    /// Country highlighted on the country-rate bar.
    pub highlight_country: String,
    /// Boundary feature property holding the region name.
    pub boundary_name_property: String,
    /// `TopoJSON` object holding the region geometries.
    pub topology_object: String,
}

impl Default for ChartSettings {
    fn default() -> Self {
        Self {
            highlight_country: "Malaysia".to_string(),
            boundary_name_property: "Name".to_string(),
            topology_object: "states".to_string(),
        }
    }
}

/// Everything a builder reads besides its dataset.
#[derive(Debug, Clone, Copy)]
pub struct ViewContext<'a> {
    /// Control-bound view parameters.
    pub params: &'a ViewParams,
    /// Current region selection.
    pub selection: &'a Selection,
    /// Static chart settings.
    pub settings: &'a ChartSettings,
}

/// The dataset slice handed to a builder.
#[derive(Debug, Clone, Copy)]
pub enum ChartData<'a> {
    /// Region observations.
    Regions(&'a [RegionObservation]),
    /// Country-year rates.
    CountryRates(&'a [CountryRate]),
    /// National severity series.
    Severity(&'a [SeverityRecord]),
    /// National exposure series.
    Exposure(&'a [ExposureRecord]),
    /// Region observations plus boundary polygons.
    RegionsWithBoundaries {
        /// Region observations.
        regions: &'a [RegionObservation],
        /// Boundary polygons.
        boundaries: &'a Boundaries,
    },
}

/// Builds the spec for `chart` from `data`.
///
/// # Errors
///
/// * [`ChartError::DatasetMismatch`] if `data` is not the dataset `chart`
///   reads.
/// * Any error the chart's own builder reports.
pub fn build_chart(
    chart: ChartId,
    data: ChartData<'_>,
    ctx: &ViewContext<'_>,
) -> Result<ChartSpec, ChartError> {
    let spec = match (chart, data) {
        (ChartId::CountryRate, ChartData::CountryRates(rates)) => country_rate::build(rates, ctx),
        (ChartId::SeverityArea, ChartData::Severity(series)) => severity_area::build(series),
        (ChartId::Exposure, ChartData::Exposure(series)) => exposure::build(series),
        (
            ChartId::Choropleth,
            ChartData::RegionsWithBoundaries {
                regions,
                boundaries,
            },
        ) => choropleth::build(regions, boundaries, ctx)?,
        (ChartId::GroupedBar, ChartData::Regions(regions)) => grouped_bar::build(regions, ctx)?,
        (ChartId::Scatter, ChartData::Regions(regions)) => scatter::build(regions, ctx)?,
        (ChartId::Trellis, ChartData::Regions(regions)) => trellis::build(regions, ctx),
        (ChartId::DeviationBar, ChartData::Regions(regions)) => {
            deviation_bar::build(regions, ctx)?
        }
        (chart, _) => return Err(ChartError::DatasetMismatch { chart }),
    };

    let definition = chart.definition();
    Ok(ChartSpec {
        chart,
        target: definition.target.to_string(),
        spec: encoding::with_font_config(spec),
        embed_options: encoding::embed_options(chart),
        click_field: definition.click_field.map(str::to_string),
    })
}

#[cfg(test)]
pub(crate) mod fixtures {
    use road_safety_chart_models::{Selection, ViewParams};
    use road_safety_dataset_models::RegionObservation;

    use crate::{ChartSettings, ViewContext};

    pub fn obs(year: i32, name: &str, deaths: u32, population: f64) -> RegionObservation {
        RegionObservation {
            year,
            state_title: name.to_string(),
            deaths,
            population,
            death_rate: f64::from(deaths) / population * 100.0,
        }
    }

    pub fn regions() -> Vec<RegionObservation> {
        vec![
            obs(2003, "Johor", 800, 3000.0),
            obs(2003, "Pulau Pinang", 300, 1400.0),
            obs(2003, "Perlis", 60, 220.0),
            obs(2019, "Johor", 1000, 3800.0),
            obs(2019, "Pulau Pinang", 330, 1770.0),
            obs(2019, "Perlis", 45, 255.0),
            obs(2019, "Labuan", 10, 100.0),
        ]
    }

    pub fn with_ctx<T>(selection: &Selection, f: impl FnOnce(&ViewContext<'_>) -> T) -> T {
        let params = ViewParams::default();
        let settings = ChartSettings::default();
        let ctx = ViewContext {
            params: &params,
            selection,
            settings: &settings,
        };
        f(&ctx)
    }
}
