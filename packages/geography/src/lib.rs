#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! LAPD division boundary loading.
//!
//! Reads the division `GeoJSON` `FeatureCollection` once at startup and
//! turns every polygonal feature into a [`DivisionBoundary`]. Features that
//! can't be used (no id property, no polygon) are skipped with a warning;
//! only an unreadable or structurally wrong file is an error.

pub mod boundaries;

pub use boundaries::{load_boundaries, parse_boundaries};
pub use crime_dashboard_geography_models::{BoundarySet, DivisionBoundary};

use thiserror::Error;

/// Errors that can occur while loading boundaries.
#[derive(Debug, Error)]
pub enum GeographyError {
    /// I/O error reading the boundary file.
    #[error("Failed to read boundary file {path}: {source}")]
    Io {
        /// File that could not be read.
        path: String,
        /// Underlying error.
        source: std::io::Error,
    },

    /// The file is not valid `GeoJSON`.
    #[error("GeoJSON parse error: {0}")]
    GeoJson(#[from] geojson::Error),

    /// The document parsed but is not a `FeatureCollection`.
    #[error("Expected a GeoJSON FeatureCollection, found {found}")]
    NotFeatureCollection {
        /// Kind of `GeoJSON` object that was found instead.
        found: &'static str,
    },
}
