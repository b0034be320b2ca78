#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API request and response types for the road safety dashboard server.
//!
//! These types are serialized to JSON for the REST API. They are separate
//! from the session types to allow independent evolution of the API
//! contract.

use road_safety_chart_models::{ChartId, ChartSpec, MetricMode, Readout};
use serde::{Deserialize, Serialize};

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiHealth {
    /// Whether the service is healthy.
    pub healthy: bool,
    /// Whether the region dataset is loaded.
    pub initialized: bool,
    /// Service version.
    pub version: String,
}

/// Body of `POST /api/selection`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SelectionRequest {
    /// Region to toggle.
    pub region: String,
}

/// Body of `POST /api/click`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ClickRequest {
    /// Chart that was clicked.
    pub chart: ChartId,
    /// Datum under the pointer.
    pub datum: serde_json::Value,
}

/// Body of the single-year parameter endpoints.
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct YearRequest {
    /// New year.
    pub year: i32,
}

/// Body of `PUT /api/params/scatter-years`. Omitted years keep their
/// current value.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScatterYearsRequest {
    /// New first comparison year.
    pub year_a: Option<i32>,
    /// New second comparison year.
    pub year_b: Option<i32>,
}

/// Body of `PUT /api/params/metric-mode`.
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricModeRequest {
    /// State of the "show absolute" checkbox.
    pub show_absolute: bool,
}

impl MetricModeRequest {
    /// Grouped-bar metric for this checkbox state.
    #[must_use]
    pub const fn mode(self) -> MetricMode {
        MetricMode::from_show_absolute(self.show_absolute)
    }
}

/// Everything a mutating request re-rendered.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderBatch {
    /// Readout updates, in dispatch order.
    pub readouts: Vec<Readout>,
    /// Rendered chart specs, in dispatch order.
    pub charts: Vec<ChartSpec>,
    /// Selected region after the request.
    pub selection: Option<String>,
}
