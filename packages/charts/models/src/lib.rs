#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Chart identifiers, view parameters, and selection state.
//!
//! These types are shared by the spec builders, the dashboard session, and
//! the HTTP API. A [`ChartId`] carries the static facts about each panel
//! (where it is embedded, which dataset it reads, which datum field a click
//! maps to); [`ViewParams`] and [`Selection`] carry the mutable state every
//! builder reads at render time.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// One of the eight dashboard panels.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum ChartId {
    /// Country death rates, horizontal bars.
    CountryRate,
    /// National casualties by severity, stacked area.
    SeverityArea,
    /// Vehicles, crashes, and deaths as stacked small multiples.
    Exposure,
    /// Region death rates on a map.
    Choropleth,
    /// Region comparison bars (rate or absolute deaths).
    GroupedBar,
    /// Region deaths in two years, scatter.
    Scatter,
    /// One line panel per region.
    Trellis,
    /// Region rate minus national rate.
    DeviationBar,
}

/// Which dataset(s) a chart reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetKind {
    /// The region dataset loaded at startup.
    Regions,
    /// Country-year rates, fetched per render.
    CountryRates,
    /// National severity series, fetched per render.
    Severity,
    /// National exposure series, fetched per render.
    Exposure,
    /// The region dataset plus boundary polygons fetched per render.
    RegionsWithBoundaries,
}

/// Static facts about one chart panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartDefinition {
    /// Dataset the chart is built from.
    pub dataset: DatasetKind,
    /// Datum field a click maps to a region name.
    pub click_field: Option<&'static str>,
    /// DOM selector the chart is embedded into.
    pub target: &'static str,
    /// Whether the embed call uses the custom tooltip theme.
    pub custom_tooltip: bool,
}

impl ChartId {
    /// All charts in initialization order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::CountryRate,
            Self::SeverityArea,
            Self::Exposure,
            Self::Choropleth,
            Self::GroupedBar,
            Self::Scatter,
            Self::Trellis,
            Self::DeviationBar,
        ]
    }

    /// Charts whose encoding depends on the selection, in re-render order.
    #[must_use]
    pub const fn selection_aware() -> &'static [Self] {
        &[
            Self::Choropleth,
            Self::GroupedBar,
            Self::Scatter,
            Self::Trellis,
            Self::DeviationBar,
        ]
    }

    /// DOM selector of the element the chart is embedded into.
    #[must_use]
    pub const fn target(self) -> &'static str {
        match self {
            Self::CountryRate => "#chart1-sea-bar",
            Self::SeverityArea => "#chart2-stacked-area",
            Self::Exposure => "#chart3-multi-line",
            Self::Choropleth => "#chart4-choropleth",
            Self::GroupedBar => "#chart5-grouped-bar",
            Self::Scatter => "#chart6-scatter",
            Self::Trellis => "#chart7-trellis",
            Self::DeviationBar => "#chart8-deviation-bar",
        }
    }

    /// Datum field holding the region name a click selects, if clicks on
    /// this chart feed the selection.
    #[must_use]
    pub const fn click_field(self) -> Option<&'static str> {
        match self {
            Self::Choropleth | Self::GroupedBar | Self::Trellis => Some("state_title"),
            Self::Scatter | Self::DeviationBar => Some("state"),
            Self::CountryRate | Self::SeverityArea | Self::Exposure => None,
        }
    }

    /// Dataset the chart is built from.
    #[must_use]
    pub const fn dataset(self) -> DatasetKind {
        match self {
            Self::CountryRate => DatasetKind::CountryRates,
            Self::SeverityArea => DatasetKind::Severity,
            Self::Exposure => DatasetKind::Exposure,
            Self::Choropleth => DatasetKind::RegionsWithBoundaries,
            Self::GroupedBar | Self::Scatter | Self::Trellis | Self::DeviationBar => {
                DatasetKind::Regions
            }
        }
    }

    /// Whether the embed call uses the custom tooltip theme.
    #[must_use]
    pub const fn custom_tooltip(self) -> bool {
        matches!(self, Self::CountryRate | Self::Exposure)
    }

    /// Everything the render pipeline needs to know about the chart.
    #[must_use]
    pub const fn definition(self) -> ChartDefinition {
        ChartDefinition {
            dataset: self.dataset(),
            click_field: self.click_field(),
            target: self.target(),
            custom_tooltip: self.custom_tooltip(),
        }
    }
}

/// Field shown on the grouped bar.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum MetricMode {
    /// Deaths per 100,000 population.
    #[default]
    Rate,
    /// Absolute death count.
    Absolute,
}

impl MetricMode {
    /// Mode for the "show absolute" checkbox state.
    #[must_use]
    pub const fn from_show_absolute(checked: bool) -> Self {
        if checked { Self::Absolute } else { Self::Rate }
    }

    /// Whether the "show absolute" checkbox is checked in this mode.
    #[must_use]
    pub const fn shows_absolute(self) -> bool {
        matches!(self, Self::Absolute)
    }
}

/// Control-bound view parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewParams {
    /// Year shown by the map, grouped bar, and deviation bar.
    pub map_year: i32,
    /// Year shown by the country-rate bar.
    pub country_year: i32,
    /// First scatter comparison year.
    pub scatter_year_a: i32,
    /// Second scatter comparison year.
    pub scatter_year_b: i32,
    /// Grouped-bar metric.
    pub metric_mode: MetricMode,
}

impl Default for ViewParams {
    fn default() -> Self {
        Self {
            map_year: 2019,
            country_year: 2019,
            scatter_year_a: 2003,
            scatter_year_b: 2019,
            metric_mode: MetricMode::Rate,
        }
    }
}

/// The currently selected region, if any.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    region: Option<String>,
}

impl Selection {
    /// A selection with `region` selected.
    #[must_use]
    pub fn of(region: &str) -> Self {
        Self {
            region: Some(region.to_string()),
        }
    }

    /// Selects `region`, or clears the selection if `region` is already
    /// selected.
    pub fn toggle(&mut self, region: &str) {
        if self.region.as_deref() == Some(region) {
            self.region = None;
        } else {
            self.region = Some(region.to_string());
        }
    }

    /// The selected region name.
    #[must_use]
    pub fn region(&self) -> Option<&str> {
        self.region.as_deref()
    }

    /// Whether no region is selected.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.region.is_none()
    }
}

/// A chart specification ready to be embedded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartSpec {
    /// Which chart this is.
    pub chart: ChartId,
    /// DOM selector to embed into.
    pub target: String,
    /// Vega-Lite specification.
    pub spec: serde_json::Value,
    /// Options for the embed call.
    pub embed_options: serde_json::Value,
    /// Datum field a click on this chart maps to a region name.
    pub click_field: Option<String>,
}

/// A text element kept in sync with a control value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Readout {
    /// DOM id of the element.
    pub id: String,
    /// Text to display.
    pub text: String,
}

impl Readout {
    /// A readout showing `year`.
    #[must_use]
    pub fn year(id: &str, year: i32) -> Self {
        Self {
            id: id.to_string(),
            text: year.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_same_region_twice_clears() {
        let mut selection = Selection::default();
        selection.toggle("Johor");
        assert_eq!(selection.region(), Some("Johor"));
        selection.toggle("Johor");
        assert!(selection.is_empty());
    }

    #[test]
    fn toggle_other_region_replaces() {
        let mut selection = Selection::of("Johor");
        selection.toggle("Sabah");
        assert_eq!(selection, Selection::of("Sabah"));
    }

    #[test]
    fn chart_ids_parse_from_kebab_case() {
        for chart in ChartId::all() {
            let parsed: ChartId = chart.as_ref().parse().unwrap();
            assert_eq!(parsed, *chart);
        }
        assert_eq!("deviation-bar".parse::<ChartId>().unwrap(), ChartId::DeviationBar);
    }

    #[test]
    fn selection_aware_charts_have_click_fields() {
        assert_eq!(ChartId::selection_aware().len(), 5);
        for chart in ChartId::all() {
            assert_eq!(
                chart.click_field().is_some(),
                ChartId::selection_aware().contains(chart),
                "{chart} selection awareness mismatch"
            );
        }
    }

    #[test]
    fn targets_are_unique() {
        let mut targets: Vec<&str> = ChartId::all().iter().map(|c| c.target()).collect();
        targets.sort_unstable();
        targets.dedup();
        assert_eq!(targets.len(), ChartId::all().len());
    }

    #[test]
    fn definition_collects_static_facts() {
        let definition = ChartId::Choropleth.definition();
        assert_eq!(definition.dataset, DatasetKind::RegionsWithBoundaries);
        assert_eq!(definition.click_field, Some("state_title"));
        assert_eq!(definition.target, "#chart4-choropleth");
        assert!(!definition.custom_tooltip);
        assert!(ChartId::Exposure.definition().custom_tooltip);
    }

    #[test]
    fn metric_mode_follows_checkbox() {
        assert_eq!(MetricMode::from_show_absolute(true), MetricMode::Absolute);
        assert_eq!(MetricMode::from_show_absolute(false), MetricMode::Rate);
        assert!(!MetricMode::default().shows_absolute());
    }
}
