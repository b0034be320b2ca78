//! Colors and fonts shared by every chart.

use road_safety_dataset_models::Severity;
use serde_json::{Value, json};

pub const BLUE: &str = "#006BA4";
pub const PICTON: &str = "#5F9ED1";
pub const SAIL: &str = "#A2C8EC";
pub const ORANGE: &str = "#FF800E";
pub const MAC: &str = "#FFBC79";
/// Accent used for the highlighted country and above-average regions.
pub const TENNE: &str = "#C85200";
/// Annotation and reference-line gray.
pub const MORTAR: &str = "#595959";
pub const SUVA: &str = "#898989";
pub const DARK_GRAY: &str = "#ABABAB";
pub const LIGHT_GRAY: &str = "#CFCFCF";
/// Value-label text color.
pub const LABEL_TEXT: &str = "#1a1a1a";

/// Font stack for axis and legend labels and titles.
pub const FONT_FAMILY: &str = "Segoe UI, Arial, sans-serif";

/// Fixed region colors, consistent across every chart.
pub const REGION_COLORS: &[(&str, &str)] = &[
    ("Johor", BLUE),
    ("Selangor", PICTON),
    ("Perak", SAIL),
    ("Pahang", ORANGE),
    ("Kedah", MAC),
    ("Sabah", TENNE),
    ("Sarawak", MORTAR),
    ("Pulau Pinang", SUVA),
    ("Kelantan", DARK_GRAY),
    ("Terengganu", LIGHT_GRAY),
    ("Negeri Sembilan", "#8B4513"),
    ("W.P. Kuala Lumpur", "#2F4F4F"),
    ("Melaka", "#8B008B"),
    ("Perlis", "#006400"),
];

/// Color for regions missing from [`REGION_COLORS`].
pub const FALLBACK_REGION_COLOR: &str = "#333333";

/// Color of `region`, falling back to [`FALLBACK_REGION_COLOR`].
#[must_use]
pub fn region_color(region: &str) -> &'static str {
    REGION_COLORS
        .iter()
        .find(|(name, _)| *name == region)
        .map_or(FALLBACK_REGION_COLOR, |(_, color)| *color)
}

/// Ordinal color scale over the fixed region table.
///
/// Names in `regions` that the table does not know are appended to the
/// domain in first-seen order, each mapped to [`FALLBACK_REGION_COLOR`], so
/// the scale never cycles colors for an unknown region.
#[must_use]
pub fn region_color_scale<'a>(regions: impl IntoIterator<Item = &'a str>) -> Value {
    let mut domain: Vec<&str> = REGION_COLORS.iter().map(|(name, _)| *name).collect();
    let mut range: Vec<&str> = REGION_COLORS.iter().map(|(_, color)| *color).collect();

    for region in regions {
        if !domain.contains(&region) {
            domain.push(region);
            range.push(region_color(region));
        }
    }

    json!({"domain": domain, "range": range})
}

/// Fill color of a severity band.
#[must_use]
pub const fn severity_color(severity: Severity) -> &'static str {
    match severity {
        Severity::Deaths => ORANGE,
        Severity::Serious => MORTAR,
        Severity::Slight => PICTON,
    }
}
