#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! In-memory spatial index for division attribution.
//!
//! Builds an R-tree over the division polygons once at startup and answers
//! point-in-polygon lookups for incidents whose source row has no usable
//! division name.

use crime_dashboard_geography_models::BoundarySet;
use geo::{BoundingRect as _, Contains as _, MultiPolygon};
use rstar::{AABB, RTree, RTreeObject};

/// A division polygon stored in the R-tree.
struct DivisionEntry {
    id: String,
    envelope: AABB<[f64; 2]>,
    polygon: MultiPolygon<f64>,
}

impl RTreeObject for DivisionEntry {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}

/// Pre-built spatial index over division boundaries.
pub struct DivisionIndex {
    divisions: RTree<DivisionEntry>,
}

impl DivisionIndex {
    /// Builds the index from a loaded boundary set.
    #[must_use]
    pub fn build(boundaries: &BoundarySet) -> Self {
        let entries: Vec<DivisionEntry> = boundaries
            .iter()
            .map(|b| DivisionEntry {
                id: b.id.clone(),
                envelope: compute_envelope(&b.polygon),
                polygon: b.polygon.clone(),
            })
            .collect();

        let divisions = RTree::bulk_load(entries);
        log::info!("Loaded {} divisions into spatial index", divisions.size());

        Self { divisions }
    }

    /// Look up the division identifier for a point.
    ///
    /// Divisions tile the city without overlap, so first match wins.
    #[must_use]
    pub fn lookup(&self, lng: f64, lat: f64) -> Option<&str> {
        let point = geo::Point::new(lng, lat);
        let query_env = AABB::from_point([lng, lat]);

        self.divisions
            .locate_in_envelope_intersecting(&query_env)
            .find(|entry| entry.polygon.contains(&point))
            .map(|entry| entry.id.as_str())
    }

    /// Number of indexed divisions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.divisions.size()
    }

    /// Whether the index is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.divisions.size() == 0
    }
}

/// Compute the bounding box envelope for a [`MultiPolygon`].
fn compute_envelope(mp: &MultiPolygon<f64>) -> AABB<[f64; 2]> {
    mp.bounding_rect().map_or_else(
        || AABB::from_point([0.0, 0.0]),
        |rect| AABB::from_corners([rect.min().x, rect.min().y], [rect.max().x, rect.max().y]),
    )
}
