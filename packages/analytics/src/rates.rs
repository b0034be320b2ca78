//! Year-level rate statistics over the region dataset.

use std::collections::BTreeSet;

use road_safety_analytics_models::{RateExtremes, RegionDeviation, RegionRate};
use road_safety_dataset_models::{RATE_PER_100K_FROM_THOUSANDS, RegionObservation};

use crate::AnalyticsError;

/// Returns the observations for `year`, in dataset order.
#[must_use]
pub fn observations_for_year(records: &[RegionObservation], year: i32) -> Vec<&RegionObservation> {
    records.iter().filter(|r| r.year == year).collect()
}

/// Distinct years present in the dataset, ascending.
#[must_use]
pub fn distinct_years(records: &[RegionObservation]) -> Vec<i32> {
    records
        .iter()
        .map(|r| r.year)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// National death rate: total deaths over total population, per 100,000.
///
/// # Errors
///
/// * [`AnalyticsError::NoObservations`] if `observations` is empty.
/// * [`AnalyticsError::ZeroPopulation`] if the populations sum to zero.
pub fn national_rate(observations: &[&RegionObservation]) -> Result<f64, AnalyticsError> {
    if observations.is_empty() {
        return Err(AnalyticsError::NoObservations);
    }

    let total_deaths: f64 = observations.iter().map(|o| f64::from(o.deaths)).sum();
    let total_population: f64 = observations.iter().map(|o| o.population).sum();

    if total_population == 0.0 {
        return Err(AnalyticsError::ZeroPopulation);
    }

    Ok(total_deaths / total_population * RATE_PER_100K_FROM_THOUSANDS)
}

/// Highest- and lowest-rate regions, using the stored `death_rate`.
///
/// Ties go to the region that appears first in `observations`.
///
/// # Errors
///
/// Returns [`AnalyticsError::NoObservations`] if `observations` is empty.
pub fn rate_extremes(observations: &[&RegionObservation]) -> Result<RateExtremes, AnalyticsError> {
    let (first, rest) = observations
        .split_first()
        .ok_or(AnalyticsError::NoObservations)?;

    let mut highest = *first;
    let mut lowest = *first;
    for &obs in rest {
        if obs.death_rate > highest.death_rate {
            highest = obs;
        }
        if obs.death_rate < lowest.death_rate {
            lowest = obs;
        }
    }

    Ok(RateExtremes {
        highest: region_rate(highest),
        lowest: region_rate(lowest),
    })
}

fn region_rate(obs: &RegionObservation) -> RegionRate {
    RegionRate {
        state_title: obs.state_title.clone(),
        death_rate: obs.death_rate,
    }
}

/// Per-region deviation from `national_rate`, sorted by deviation
/// descending. Equal deviations keep dataset order.
#[must_use]
pub fn deviations(observations: &[&RegionObservation], national_rate: f64) -> Vec<RegionDeviation> {
    let mut rows: Vec<RegionDeviation> = observations
        .iter()
        .map(|obs| RegionDeviation {
            state: obs.state_title.clone(),
            death_rate: obs.death_rate,
            national_rate,
            deviation: obs.death_rate - national_rate,
            above_national: obs.death_rate > national_rate,
        })
        .collect();

    rows.sort_by(|a, b| b.deviation.total_cmp(&a.deviation));
    rows
}
