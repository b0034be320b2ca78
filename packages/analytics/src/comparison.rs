//! Two-year comparison of region deaths.

use road_safety_analytics_models::{TopMovers, YearComparison};
use road_safety_dataset_models::RegionObservation;

use crate::AnalyticsError;
use crate::rates::observations_for_year;

/// Number of regions listed on each side of the top-movers caption.
pub const TOP_MOVERS_COUNT: usize = 3;

/// Pairs each region's deaths in `year_a` with its deaths in `year_b`.
///
/// Regions are emitted in year-A dataset order. A region with no record in
/// `year_b` is left out. When the year-A count is zero the percent change
/// is `None`.
///
/// # Errors
///
/// Returns [`AnalyticsError::NoComparableRegions`] if no region has
/// records in both years.
pub fn compare_years(
    records: &[RegionObservation],
    year_a: i32,
    year_b: i32,
) -> Result<Vec<YearComparison>, AnalyticsError> {
    let observations_b = observations_for_year(records, year_b);

    let merged: Vec<YearComparison> = observations_for_year(records, year_a)
        .into_iter()
        .filter_map(|a| {
            let b = observations_b
                .iter()
                .find(|b| b.state_title == a.state_title)?;
            Some(YearComparison {
                state: a.state_title.clone(),
                deaths_a: a.deaths,
                deaths_b: b.deaths,
                pct_change: percent_change(a.deaths, b.deaths),
            })
        })
        .collect();

    if merged.is_empty() {
        return Err(AnalyticsError::NoComparableRegions { year_a, year_b });
    }

    log::debug!(
        "Compared {} regions between {year_a} and {year_b}",
        merged.len()
    );
    Ok(merged)
}

/// Percent change from `from` to `to`, or `None` when `from` is zero.
#[must_use]
pub fn percent_change(from: u32, to: u32) -> Option<f64> {
    if from == 0 {
        return None;
    }
    let from = f64::from(from);
    Some((f64::from(to) - from) / from * 100.0)
}

/// Largest death count across both comparison years.
#[must_use]
pub fn max_deaths(comparisons: &[YearComparison]) -> u32 {
    comparisons
        .iter()
        .map(|c| c.deaths_a.max(c.deaths_b))
        .max()
        .unwrap_or(0)
}

/// Picks the `count` most negative and `count` most positive changes.
///
/// Comparisons are stably sorted by percent change ascending. Improvers are
/// the head of that order. Decliners are drawn from the tail, most positive
/// first, and never repeat an improver. Comparisons without a percent
/// change are not ranked.
#[must_use]
pub fn top_movers(comparisons: &[YearComparison], count: usize) -> TopMovers {
    let mut ranked: Vec<(&YearComparison, f64)> = comparisons
        .iter()
        .filter_map(|c| c.pct_change.map(|pct| (c, pct)))
        .collect();
    ranked.sort_by(|a, b| a.1.total_cmp(&b.1));

    let improver_count = count.min(ranked.len());
    let decliner_count = count.min(ranked.len() - improver_count);

    let improvers = ranked[..improver_count]
        .iter()
        .map(|(c, _)| (*c).clone())
        .collect();
    let decliners = ranked[ranked.len() - decliner_count..]
        .iter()
        .rev()
        .map(|(c, _)| (*c).clone())
        .collect();

    TopMovers {
        improvers,
        decliners,
    }
}
