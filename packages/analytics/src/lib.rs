#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Rate, comparison, and deviation statistics.
//!
//! Every chart caption that is derived from data (national rate, highest
//! and lowest region, top movers, deviations) is computed here, so the
//! choropleth, the grouped bar, and the deviation bar agree on the same
//! national rate for a given year.

pub mod comparison;
pub mod rates;

use thiserror::Error;

/// Errors that can occur while deriving statistics.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalyticsError {
    /// The filtered observation set is empty.
    #[error("No observations to aggregate")]
    NoObservations,

    /// The filtered observations sum to zero population.
    #[error("Total population is zero")]
    ZeroPopulation,

    /// No region has records in both comparison years.
    #[error("No region has records in both {year_a} and {year_b}")]
    NoComparableRegions {
        /// First comparison year.
        year_a: i32,
        /// Second comparison year.
        year_b: i32,
    },
}
