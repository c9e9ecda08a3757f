#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! LAPD division boundary types.
//!
//! Divisions are the unit of aggregation for the dashboard. Each boundary
//! keeps its parsed polygon (for point-in-polygon attribution) next to the
//! original `GeoJSON` feature (which is handed to the browser unchanged
//! apart from the normalized id property).

use std::collections::BTreeMap;

use geo::MultiPolygon;
use geojson::{Feature, FeatureCollection};
use serde::Serialize;

/// Feature property the normalized division id is written to before the
/// boundaries are served to the client.
pub const DIVISION_ID_PROPERTY: &str = "DIVISION_ID";

/// One division polygon.
#[derive(Debug, Clone)]
pub struct DivisionBoundary {
    /// Normalized division identifier (trimmed, upper-case).
    pub id: String,
    /// Division name exactly as it appears in the boundary file.
    pub name: String,
    /// Division geometry.
    pub polygon: MultiPolygon<f64>,
    /// Source feature with [`DIVISION_ID_PROPERTY`] set.
    pub feature: Feature,
}

/// Immutable, ordered collection of division boundaries.
///
/// Iteration follows file order. Identifiers are unique.
#[derive(Debug, Clone, Default)]
pub struct BoundarySet {
    boundaries: Vec<DivisionBoundary>,
    index: BTreeMap<String, usize>,
}

impl BoundarySet {
    /// Builds a set from boundaries, keeping the first boundary for each
    /// identifier. Returns the set and the identifiers that were dropped as
    /// duplicates.
    #[must_use]
    pub fn new(boundaries: Vec<DivisionBoundary>) -> (Self, Vec<String>) {
        let mut set = Self::default();
        let mut duplicates = Vec::new();

        for boundary in boundaries {
            if set.index.contains_key(&boundary.id) {
                duplicates.push(boundary.id);
                continue;
            }
            set.index.insert(boundary.id.clone(), set.boundaries.len());
            set.boundaries.push(boundary);
        }

        (set, duplicates)
    }

    /// Looks up a boundary by normalized identifier.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&DivisionBoundary> {
        self.index.get(id).map(|&i| &self.boundaries[i])
    }

    /// Whether a boundary with this identifier exists.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Iterates boundaries in file order.
    pub fn iter(&self) -> impl Iterator<Item = &DivisionBoundary> {
        self.boundaries.iter()
    }

    /// Division identifiers in file order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.boundaries.iter().map(|b| b.id.as_str())
    }

    /// Number of boundaries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.boundaries.len()
    }

    /// Whether the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.boundaries.is_empty()
    }

    /// Rebuilds a `FeatureCollection` of all boundaries for the client.
    #[must_use]
    pub fn to_feature_collection(&self) -> FeatureCollection {
        FeatureCollection {
            bbox: None,
            features: self.boundaries.iter().map(|b| b.feature.clone()).collect(),
            foreign_members: None,
        }
    }

    /// Lightweight summaries of every division, in file order.
    #[must_use]
    pub fn summaries(&self) -> Vec<DivisionSummary> {
        self.boundaries
            .iter()
            .map(|b| DivisionSummary {
                id: b.id.clone(),
                name: b.name.clone(),
            })
            .collect()
    }
}

/// Identifier and display name of a division.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DivisionSummary {
    /// Normalized identifier.
    pub id: String,
    /// Display name.
    pub name: String,
}
