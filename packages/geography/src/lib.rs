#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Region name translation and boundary joins.
//!
//! The boundary polygons and the statistics come from different sources
//! that disagree on two region names. [`names`] holds the translation
//! table; [`join`] attaches region observations to boundary features so a
//! choropleth can shade each polygon by its death rate.

pub mod join;
pub mod names;

use thiserror::Error;

/// Errors that can occur during geography operations.
#[derive(Debug, Error)]
pub enum GeoError {
    /// A boundary feature has no usable name property.
    #[error("Boundary feature {index} has no '{property}' property")]
    MissingName {
        /// Position of the feature in the collection.
        index: usize,
        /// Name of the property that was expected.
        property: String,
    },
}
