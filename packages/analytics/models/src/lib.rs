#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Derived statistic types for the road safety dashboard.
//!
//! These rows are inlined into chart data, so their field names are part of
//! the chart contract: click handlers read `state` straight off the datum.

use serde::{Deserialize, Serialize};

/// A region and its death rate for one year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionRate {
    /// Region display name.
    pub state_title: String,
    /// Deaths per 100,000 population.
    pub death_rate: f64,
}

/// Highest- and lowest-rate regions for one year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateExtremes {
    /// Region with the highest death rate.
    pub highest: RegionRate,
    /// Region with the lowest death rate.
    pub lowest: RegionRate,
}

/// One region's deaths in two comparison years.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearComparison {
    /// Region display name.
    pub state: String,
    /// Deaths in the first comparison year.
    pub deaths_a: u32,
    /// Deaths in the second comparison year.
    pub deaths_b: u32,
    /// Percent change from year A to year B. `None` when year A had zero
    /// deaths.
    pub pct_change: Option<f64>,
}

/// Regions with the largest decreases and increases between two years.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TopMovers {
    /// Most negative percent changes, most negative first.
    pub improvers: Vec<YearComparison>,
    /// Most positive percent changes, most positive first.
    pub decliners: Vec<YearComparison>,
}

/// A region's death rate relative to the national rate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionDeviation {
    /// Region display name.
    pub state: String,
    /// Region death rate.
    pub death_rate: f64,
    /// National death rate for the same year.
    pub national_rate: f64,
    /// `death_rate - national_rate`.
    pub deviation: f64,
    /// Whether the region is strictly above the national rate.
    pub above_national: bool,
}
