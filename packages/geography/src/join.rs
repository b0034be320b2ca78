//! Boundary-to-observation join.
//!
//! `GeoJSON` features are joined here: every boundary feature is kept, and
//! the observation fields are attached as top-level members of the feature
//! so the chart can reference them as `datum.death_rate`. Features without
//! a matching observation get `null` fields.
//!
//! `TopoJSON` geometries are joined by the renderer's lookup transform
//! instead; [`lookup_values`] prepares its rows.

use std::collections::BTreeMap;

use geojson::{Feature, FeatureCollection, JsonObject};
use road_safety_dataset_models::RegionObservation;
use serde_json::Value;

use crate::GeoError;
use crate::names::boundary_name;

/// Observation fields copied onto each boundary feature.
pub const JOINED_FIELDS: &[&str] = &["deaths", "population", "death_rate", "state_title"];

/// Field of each lookup row holding the translated boundary name.
pub const LOOKUP_KEY: &str = "geo_name";

/// Joins `observations` onto the features of `boundaries`.
///
/// Features are matched on their `name_property` against the translated
/// region name (see [`boundary_name`]). When two observations translate to
/// the same boundary name, the first one wins.
///
/// # Errors
///
/// Returns [`GeoError::MissingName`] if a feature has no string-valued
/// `name_property`.
pub fn join_boundaries(
    boundaries: &FeatureCollection,
    observations: &[&RegionObservation],
    name_property: &str,
) -> Result<FeatureCollection, GeoError> {
    let mut by_boundary_name: BTreeMap<&str, &RegionObservation> = BTreeMap::new();
    for obs in observations {
        by_boundary_name
            .entry(boundary_name(&obs.state_title))
            .or_insert(obs);
    }

    let mut matched: Vec<&str> = Vec::new();
    let mut unmatched_features = Vec::new();
    let mut features = Vec::with_capacity(boundaries.features.len());

    for (index, feature) in boundaries.features.iter().enumerate() {
        let name = feature_name(feature, name_property).ok_or_else(|| GeoError::MissingName {
            index,
            property: name_property.to_string(),
        })?;

        let obs = by_boundary_name.get(name).copied();
        if let Some(obs) = obs {
            matched.push(boundary_name(&obs.state_title));
        } else {
            unmatched_features.push(name.to_string());
        }

        let mut joined = feature.clone();
        let members = joined.foreign_members.get_or_insert_with(JsonObject::new);
        attach_fields(members, obs);
        features.push(joined);
    }

    let unmatched_regions = observations
        .iter()
        .filter(|obs| !matched.contains(&boundary_name(&obs.state_title)))
        .map(|obs| obs.state_title.clone())
        .collect::<Vec<_>>();

    if !unmatched_features.is_empty() {
        log::warn!("Boundaries without observations: {unmatched_features:?}");
    }
    if !unmatched_regions.is_empty() {
        log::warn!("Observations without boundaries: {unmatched_regions:?}");
    }

    Ok(FeatureCollection {
        bbox: boundaries.bbox.clone(),
        features,
        foreign_members: boundaries.foreign_members.clone(),
    })
}

/// Rows for a lookup transform keyed on [`LOOKUP_KEY`].
///
/// Each row carries the [`JOINED_FIELDS`] of one observation plus its
/// translated boundary name. As in [`join_boundaries`], the first
/// observation for a boundary name wins.
#[must_use]
pub fn lookup_values(observations: &[&RegionObservation]) -> Vec<Value> {
    let mut seen: Vec<&str> = Vec::new();
    let mut rows = Vec::with_capacity(observations.len());

    for obs in observations {
        let name = boundary_name(&obs.state_title);
        if seen.contains(&name) {
            continue;
        }
        seen.push(name);

        let mut row = JsonObject::new();
        attach_fields(&mut row, Some(*obs));
        row.insert(LOOKUP_KEY.to_string(), Value::from(name));
        rows.push(Value::Object(row));
    }

    rows
}

fn feature_name<'a>(feature: &'a Feature, name_property: &str) -> Option<&'a str> {
    feature
        .properties
        .as_ref()
        .and_then(|props| props.get(name_property))
        .and_then(Value::as_str)
}

fn attach_fields(members: &mut JsonObject, obs: Option<&RegionObservation>) {
    let values = obs.map_or_else(
        || [Value::Null, Value::Null, Value::Null, Value::Null],
        |obs| {
            [
                Value::from(obs.deaths),
                Value::from(obs.population),
                Value::from(obs.death_rate),
                Value::from(obs.state_title.clone()),
            ]
        },
    );

    for (field, value) in JOINED_FIELDS.iter().zip(values) {
        members.insert((*field).to_string(), value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feature(name: &str) -> Feature {
        let mut props = JsonObject::new();
        props.insert("Name".to_string(), Value::from(name));
        Feature {
            bbox: None,
            geometry: None,
            id: None,
            properties: Some(props),
            foreign_members: None,
        }
    }

    fn obs(name: &str, rate: f64) -> RegionObservation {
        RegionObservation {
            year: 2019,
            state_title: name.to_string(),
            deaths: 100,
            population: 1000.0,
            death_rate: rate,
        }
    }

    fn collection(names: &[&str]) -> FeatureCollection {
        FeatureCollection {
            bbox: None,
            features: names.iter().map(|n| feature(n)).collect(),
            foreign_members: None,
        }
    }

    #[test]
    fn joins_translated_names() {
        let boundaries = collection(&["Penang", "Kuala Lumpur", "Johor"]);
        let records = [
            obs("Pulau Pinang", 12.0),
            obs("W.P. Kuala Lumpur", 8.0),
            obs("Johor", 25.0),
        ];
        let refs: Vec<&RegionObservation> = records.iter().collect();

        let joined = join_boundaries(&boundaries, &refs, "Name").unwrap();

        let penang = joined.features[0].foreign_members.as_ref().unwrap();
        assert_eq!(penang["state_title"], "Pulau Pinang");
        assert_eq!(penang["death_rate"], 12.0);
        let kl = joined.features[1].foreign_members.as_ref().unwrap();
        assert_eq!(kl["state_title"], "W.P. Kuala Lumpur");
    }

    #[test]
    fn unmatched_features_get_null_fields() {
        let boundaries = collection(&["Labuan"]);
        let records = [obs("Johor", 25.0)];
        let refs: Vec<&RegionObservation> = records.iter().collect();

        let joined = join_boundaries(&boundaries, &refs, "Name").unwrap();

        assert_eq!(joined.features.len(), 1);
        let members = joined.features[0].foreign_members.as_ref().unwrap();
        for field in JOINED_FIELDS {
            assert!(members[*field].is_null());
        }
    }

    #[test]
    fn joined_fields_serialize_at_feature_top_level() {
        let boundaries = collection(&["Johor"]);
        let records = [obs("Johor", 25.0)];
        let refs: Vec<&RegionObservation> = records.iter().collect();

        let joined = join_boundaries(&boundaries, &refs, "Name").unwrap();
        let value = serde_json::to_value(&joined).unwrap();

        assert_eq!(value["features"][0]["death_rate"], 25.0);
        assert_eq!(value["features"][0]["properties"]["Name"], "Johor");
    }

    #[test]
    fn missing_name_is_an_error() {
        let mut boundaries = collection(&["Johor"]);
        boundaries.features[0].properties = None;
        let err = join_boundaries(&boundaries, &[], "Name").unwrap_err();
        assert!(matches!(err, GeoError::MissingName { index: 0, .. }));
    }

    #[test]
    fn lookup_rows_carry_translated_key() {
        let records = [
            obs("Pulau Pinang", 12.0),
            obs("Johor", 25.0),
            obs("Johor", 30.0),
        ];
        let refs: Vec<&RegionObservation> = records.iter().collect();

        let rows = lookup_values(&refs);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0][LOOKUP_KEY], "Penang");
        assert_eq!(rows[0]["state_title"], "Pulau Pinang");
        assert_eq!(rows[1][LOOKUP_KEY], "Johor");
        assert_eq!(rows[1]["death_rate"], 25.0);
    }
}
