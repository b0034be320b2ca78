//! Typed loaders for each dataset document.

use road_safety_dataset_models::{
    Boundaries, CountryRate, ExposureRecord, RegionObservation, SeverityRecord,
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::DatasetError;
use crate::fetcher::DatasetFetcher;

/// Document paths for every dataset, relative to the fetcher root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct DatasetPaths {
    /// Combined region dataset (array of region observations).
    pub regions: String,
    /// Country-year death rates.
    pub country_rates: String,
    /// National casualty counts by severity.
    pub severity: String,
    /// National exposure series (vehicles, crashes, deaths).
    pub exposure: String,
    /// Region boundary polygons, as `TopoJSON` or `GeoJSON`.
    pub boundaries: String,
}

impl Default for DatasetPaths {
    fn default() -> Self {
        Self {
            regions: "combined_state_data.json".to_string(),
            country_rates: "sea_death_rates.json".to_string(),
            severity: "national_outcomes.json".to_string(),
            exposure: "national_exposure.json".to_string(),
            boundaries: "geoBoundaries-MYS-ADM0.topojson".to_string(),
        }
    }
}

/// Fetches `path` and deserializes it as JSON.
///
/// # Errors
///
/// Returns [`DatasetError`] if the fetch fails or the body is not valid
/// JSON for `T`.
pub async fn fetch_json<T: DeserializeOwned>(
    fetcher: &dyn DatasetFetcher,
    path: &str,
) -> Result<T, DatasetError> {
    let body = fetcher.fetch(path).await?;
    serde_json::from_slice(&body).map_err(|source| DatasetError::Json {
        path: path.to_string(),
        source,
    })
}

/// Loads the combined region dataset.
///
/// # Errors
///
/// Returns [`DatasetError`] if retrieval or parsing fails.
pub async fn load_regions(
    fetcher: &dyn DatasetFetcher,
    paths: &DatasetPaths,
) -> Result<Vec<RegionObservation>, DatasetError> {
    let records: Vec<RegionObservation> = fetch_json(fetcher, &paths.regions).await?;
    log::info!(
        "Loaded {} region observations from {}",
        records.len(),
        fetcher.describe()
    );
    Ok(records)
}

/// Loads the country-year rate dataset.
///
/// # Errors
///
/// Returns [`DatasetError`] if retrieval or parsing fails.
pub async fn load_country_rates(
    fetcher: &dyn DatasetFetcher,
    paths: &DatasetPaths,
) -> Result<Vec<CountryRate>, DatasetError> {
    fetch_json(fetcher, &paths.country_rates).await
}

/// Loads the national severity series.
///
/// # Errors
///
/// Returns [`DatasetError`] if retrieval or parsing fails.
pub async fn load_severity_series(
    fetcher: &dyn DatasetFetcher,
    paths: &DatasetPaths,
) -> Result<Vec<SeverityRecord>, DatasetError> {
    fetch_json(fetcher, &paths.severity).await
}

/// Loads the national exposure series.
///
/// # Errors
///
/// Returns [`DatasetError`] if retrieval or parsing fails.
pub async fn load_exposure_series(
    fetcher: &dyn DatasetFetcher,
    paths: &DatasetPaths,
) -> Result<Vec<ExposureRecord>, DatasetError> {
    fetch_json(fetcher, &paths.exposure).await
}

/// Loads the region boundary polygons.
///
/// The document's `type` decides the encoding: a `Topology` is kept as-is
/// and a `FeatureCollection` is parsed into `GeoJSON` features.
///
/// # Errors
///
/// Returns [`DatasetError`] if retrieval or parsing fails, or
/// [`DatasetError::UnsupportedBoundaries`] for any other document type.
pub async fn load_boundaries(
    fetcher: &dyn DatasetFetcher,
    paths: &DatasetPaths,
) -> Result<Boundaries, DatasetError> {
    let path = &paths.boundaries;
    let document: Value = fetch_json(fetcher, path).await?;
    let kind = document
        .get("type")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    match kind.as_str() {
        "Topology" => Ok(Boundaries::Topology(document)),
        "FeatureCollection" => serde_json::from_value(document)
            .map(Boundaries::Features)
            .map_err(|source| DatasetError::Json {
                path: path.clone(),
                source,
            }),
        _ => Err(DatasetError::UnsupportedBoundaries {
            path: path.clone(),
            kind,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetcher::StaticFetcher;

    const REGIONS: &str = r#"[
        {"year": 2003, "state_title": "Johor", "deaths": 900, "population": 3000.0, "death_rate": 30.0},
        {"year": 2019, "state_title": "Johor", "deaths": 1000, "population": 4000.0, "death_rate": 25.0}
    ]"#;

    #[tokio::test]
    async fn loads_regions_with_default_paths() {
        let paths = DatasetPaths::default();
        let fetcher = StaticFetcher::new().with_document(&paths.regions, REGIONS);
        let regions = load_regions(&fetcher, &paths).await.unwrap();
        assert_eq!(regions.len(), 2);
        assert_eq!(regions[1].deaths, 1000);
    }

    #[tokio::test]
    async fn malformed_document_reports_path() {
        let paths = DatasetPaths::default();
        let fetcher = StaticFetcher::new().with_document(&paths.country_rates, "{not json");
        let err = load_country_rates(&fetcher, &paths).await.unwrap_err();
        assert!(matches!(err, DatasetError::Json { ref path, .. } if path == "sea_death_rates.json"));
    }

    #[tokio::test]
    async fn loads_boundary_feature_collection() {
        let paths = DatasetPaths::default();
        let doc = r#"{"type": "FeatureCollection", "features": [
            {"type": "Feature", "properties": {"Name": "Penang"},
             "geometry": {"type": "Polygon", "coordinates": [[[100.0, 5.0], [100.5, 5.0], [100.5, 5.5], [100.0, 5.0]]]}}
        ]}"#;
        let fetcher = StaticFetcher::new().with_document(&paths.boundaries, doc);
        let boundaries = load_boundaries(&fetcher, &paths).await.unwrap();
        assert!(matches!(boundaries, Boundaries::Features(ref fc) if fc.features.len() == 1));
    }

    #[tokio::test]
    async fn loads_boundary_topology() {
        let paths = DatasetPaths::default();
        let doc = r#"{"type": "Topology",
            "objects": {"states": {"type": "GeometryCollection", "geometries": [
                {"type": "Polygon", "arcs": [[0]], "properties": {"Name": "Johor"}}
            ]}},
            "arcs": [[[103.0, 1.5], [104.0, 1.5], [104.0, 2.5], [103.0, 1.5]]]}"#;
        let fetcher = StaticFetcher::new().with_document(&paths.boundaries, doc);

        let boundaries = load_boundaries(&fetcher, &paths).await.unwrap();

        assert!(matches!(boundaries, Boundaries::Topology(_)));
        assert!(boundaries.has_topology_object("states"));
    }

    #[tokio::test]
    async fn unknown_boundary_type_is_rejected() {
        let paths = DatasetPaths::default();
        let doc = r#"{"type": "GeometryCollection", "geometries": []}"#;
        let fetcher = StaticFetcher::new().with_document(&paths.boundaries, doc);

        let err = load_boundaries(&fetcher, &paths).await.unwrap_err();

        assert!(matches!(
            err,
            DatasetError::UnsupportedBoundaries { ref kind, .. } if kind == "GeometryCollection"
        ));
    }

    #[test]
    fn partial_paths_fill_defaults() {
        let paths: DatasetPaths =
            serde_json::from_str(r#"{"regions": "regions_v2.json"}"#).unwrap();
        assert_eq!(paths.regions, "regions_v2.json");
        assert_eq!(paths.exposure, DatasetPaths::default().exposure);
    }
}
