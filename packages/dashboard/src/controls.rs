//! Descriptor of the dashboard's control surface.

use road_safety_analytics::rates::distinct_years;
use road_safety_chart_models::{Selection, ViewParams};
use road_safety_dataset_models::RegionObservation;
use serde::{Deserialize, Serialize};

/// A year slider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearSlider {
    /// Earliest selectable year.
    pub min: i32,
    /// Latest selectable year.
    pub max: i32,
    /// Current value.
    pub value: i32,
}

/// A year dropdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearDropdown {
    /// Options in ascending order.
    pub options: Vec<i32>,
    /// Selected option.
    pub selected: i32,
}

/// Current state of every dashboard control.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Controls {
    /// Map-year slider, ranging over the region dataset's years. `None`
    /// until the region dataset is loaded.
    pub map_year: Option<YearSlider>,
    /// Country-rate year slider value.
    pub country_year: i32,
    /// First scatter year.
    pub scatter_year_a: YearDropdown,
    /// Second scatter year.
    pub scatter_year_b: YearDropdown,
    /// Whether the "show absolute" checkbox is checked.
    pub show_absolute: bool,
    /// Selected region, if any.
    pub selected_region: Option<String>,
}

impl Controls {
    /// Describes the controls for `regions` in the given state.
    #[must_use]
    pub fn describe(
        regions: &[RegionObservation],
        params: &ViewParams,
        selection: &Selection,
    ) -> Self {
        let years = distinct_years(regions);
        let map_year = match (years.first(), years.last()) {
            (Some(&min), Some(&max)) => Some(YearSlider {
                min,
                max,
                value: params.map_year,
            }),
            _ => None,
        };

        Self {
            map_year,
            country_year: params.country_year,
            scatter_year_a: YearDropdown {
                options: years.clone(),
                selected: params.scatter_year_a,
            },
            scatter_year_b: YearDropdown {
                options: years,
                selected: params.scatter_year_b,
            },
            show_absolute: params.metric_mode.shows_absolute(),
            selected_region: selection.region().map(str::to_string),
        }
    }
}
