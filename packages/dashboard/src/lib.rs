#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Session state and control bindings for the road safety dashboard.
//!
//! A [`session::Dashboard`] owns the region dataset, the control-bound
//! view parameters, and the region selection. Every control or click
//! event mutates that state and re-renders the affected charts through a
//! [`render::RenderTarget`]. Charts that fail to build are logged and left
//! unrendered; the rest of the batch continues.

pub mod config;
pub mod controls;
pub mod render;
pub mod session;

use std::path::PathBuf;

use road_safety_charts::ChartError;
use road_safety_dataset::DatasetError;
use thiserror::Error;

/// Errors that can occur while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Reading the configuration file failed.
    #[error("IO error reading '{}': {source}", path.display())]
    Io {
        /// Configuration file path.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// The configuration document is invalid.
    #[error("Config parse error: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Errors that can occur while driving the dashboard.
#[derive(Debug, Error)]
pub enum DashboardError {
    /// Fetching a dataset failed.
    #[error("Dataset error: {0}")]
    Dataset(#[from] DatasetError),

    /// Building a chart spec failed.
    #[error("Chart error: {0}")]
    Chart(#[from] ChartError),

    /// The region dataset has not been loaded.
    #[error("Dashboard is not initialized")]
    NotInitialized,
}
