#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Record types for the road safety datasets.
//!
//! Each type mirrors one row of a static JSON document served alongside the
//! dashboard. Field names follow the JSON documents exactly so the records
//! can be inlined into chart specifications without renaming.

use geojson::FeatureCollection;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum_macros::{AsRefStr, Display, EnumString};

/// Multiplier turning `deaths / population` into deaths per 100,000 when
/// population is expressed in thousands.
pub const RATE_PER_100K_FROM_THOUSANDS: f64 = 100.0;

/// One row of the combined region dataset: a single (region, year).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionObservation {
    /// Calendar year.
    pub year: i32,
    /// Region display name as used by the data source (e.g. "Pulau Pinang").
    pub state_title: String,
    /// Road deaths recorded in the region for the year.
    pub deaths: u32,
    /// Population in thousands.
    pub population: f64,
    /// Deaths per 100,000 population, as stored in the source document.
    pub death_rate: f64,
}

/// Road deaths per 100,000 population for one country in one year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryRate {
    /// Country name.
    pub country: String,
    /// Calendar year.
    pub year: i32,
    /// Deaths per 100,000 population.
    pub rate: f64,
}

/// Nation-level exposure figures for one year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExposureRecord {
    /// Calendar year.
    pub year: i32,
    /// Registered vehicles.
    pub vehicles: u64,
    /// Reported road crashes.
    pub crashes: u64,
    /// Road deaths.
    pub deaths: u64,
}

/// Casualty severity category of the national outcome series.
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
pub enum Severity {
    /// Fatal casualties.
    Deaths,
    /// Seriously injured casualties.
    Serious,
    /// Slightly injured casualties.
    Slight,
}

impl Severity {
    /// Returns all variants in stacking order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Deaths, Self::Serious, Self::Slight]
    }
}

/// Casualty count for one severity category in one year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeverityRecord {
    /// Calendar year.
    pub year: i32,
    /// Severity category.
    pub severity: Severity,
    /// Number of casualties.
    pub count: u64,
}

/// Region boundary polygons in either of the two supported encodings.
#[derive(Debug, Clone, PartialEq)]
pub enum Boundaries {
    /// A `GeoJSON` feature collection.
    Features(FeatureCollection),
    /// A `TopoJSON` topology, kept as the raw document.
    Topology(Value),
}

impl Boundaries {
    /// Whether the topology defines an object named `object`. Always false
    /// for feature collections.
    #[must_use]
    pub fn has_topology_object(&self, object: &str) -> bool {
        match self {
            Self::Features(_) => false,
            Self::Topology(topology) => topology
                .get("objects")
                .and_then(|objects| objects.get(object))
                .is_some(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn region_observation_parses_source_fields() {
        let json = r#"{"year": 2019, "state_title": "Johor", "deaths": 1050,
            "population": 3761.2, "death_rate": 27.9}"#;
        let obs: RegionObservation = serde_json::from_str(json).unwrap();
        assert_eq!(obs.year, 2019);
        assert_eq!(obs.state_title, "Johor");
        assert_eq!(obs.deaths, 1050);
    }

    #[test]
    fn severity_names_match_documents() {
        let record: SeverityRecord =
            serde_json::from_str(r#"{"year": 2003, "severity": "Serious", "count": 9040}"#)
                .unwrap();
        assert_eq!(record.severity, Severity::Serious);
        assert_eq!(Severity::Slight.to_string(), "Slight");
        assert_eq!("Deaths".parse::<Severity>().unwrap(), Severity::Deaths);
    }

    #[test]
    fn severity_order_is_stacking_order() {
        let names: Vec<&str> = Severity::all().iter().map(AsRef::as_ref).collect();
        assert_eq!(names, ["Deaths", "Serious", "Slight"]);
    }

    #[test]
    fn topology_objects_are_looked_up_by_name() {
        let topology = Boundaries::Topology(serde_json::json!({
            "type": "Topology",
            "objects": {"states": {"type": "GeometryCollection", "geometries": []}},
            "arcs": []
        }));
        assert!(topology.has_topology_object("states"));
        assert!(!topology.has_topology_object("districts"));
    }
}
