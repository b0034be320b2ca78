#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Static JSON dataset fetching for the road safety dashboard.
//!
//! Datasets are small static documents (tens to low hundreds of records)
//! that live either in a local directory or behind an HTTP base URL. The
//! [`fetcher::DatasetFetcher`] trait hides where they come from; the
//! [`loader`] functions fetch and deserialize one document each. Nothing
//! is cached here: callers decide when to re-fetch.

pub mod fetcher;
pub mod loader;

use thiserror::Error;

/// Errors that can occur while retrieving a dataset.
#[derive(Debug, Error)]
pub enum DatasetError {
    /// Reading a local dataset file failed.
    #[error("IO error reading '{path}': {source}")]
    Io {
        /// Dataset path relative to the fetcher root.
        path: String,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing failed.
    #[error("JSON error in '{path}': {source}")]
    Json {
        /// Dataset path relative to the fetcher root.
        path: String,
        /// Underlying parse error.
        source: serde_json::Error,
    },

    /// The boundary document is neither a `TopoJSON` topology nor a
    /// `GeoJSON` feature collection.
    #[error("Unsupported boundary document '{kind}' in '{path}'")]
    UnsupportedBoundaries {
        /// Dataset path relative to the fetcher root.
        path: String,
        /// The document's `type` member, empty if absent.
        kind: String,
    },

    /// The requested document does not exist.
    #[error("Dataset not found: {path}")]
    NotFound {
        /// Dataset path relative to the fetcher root.
        path: String,
    },
}
