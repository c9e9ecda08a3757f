//! Division `GeoJSON` parsing.

use std::path::Path;

use crime_dashboard_crime_models::normalize_division;
use crime_dashboard_geography_models::{BoundarySet, DIVISION_ID_PROPERTY, DivisionBoundary};
use geo::MultiPolygon;
use geojson::{Feature, GeoJson};

use crate::GeographyError;

/// Reads and parses the division boundary file at `path`.
///
/// `id_property` names the feature property holding the division name
/// (`APREC` in the LAPD division file).
///
/// # Errors
///
/// Returns [`GeographyError`] if the file can't be read, isn't `GeoJSON`, or
/// isn't a `FeatureCollection`.
pub fn load_boundaries(path: &Path, id_property: &str) -> Result<BoundarySet, GeographyError> {
    log::info!("Loading division boundaries from {}", path.display());

    let data = std::fs::read_to_string(path).map_err(|source| GeographyError::Io {
        path: path.display().to_string(),
        source,
    })?;

    parse_boundaries(&data, id_property)
}

/// Parses a division `FeatureCollection` from a string.
///
/// # Errors
///
/// Returns [`GeographyError`] if the input isn't a `GeoJSON`
/// `FeatureCollection`.
pub fn parse_boundaries(data: &str, id_property: &str) -> Result<BoundarySet, GeographyError> {
    let geojson: GeoJson = data.parse()?;

    let collection = match geojson {
        GeoJson::FeatureCollection(fc) => fc,
        GeoJson::Feature(_) => return Err(GeographyError::NotFeatureCollection { found: "Feature" }),
        GeoJson::Geometry(_) => {
            return Err(GeographyError::NotFeatureCollection { found: "Geometry" });
        }
    };

    let raw_count = collection.features.len();
    let mut boundaries = Vec::with_capacity(raw_count);

    for (i, feature) in collection.features.into_iter().enumerate() {
        let Some(name) = property_string(&feature, id_property) else {
            log::warn!("Skipping boundary feature {i}: missing '{id_property}' property");
            continue;
        };

        let id = normalize_division(&name);
        if id.is_empty() {
            log::warn!("Skipping boundary feature {i}: blank '{id_property}' property");
            continue;
        }

        let Some(polygon) = feature_multipolygon(&feature) else {
            log::warn!("Skipping boundary {id}: geometry is missing or not polygonal");
            continue;
        };

        let mut feature = feature;
        feature.set_property(DIVISION_ID_PROPERTY, id.clone());

        boundaries.push(DivisionBoundary {
            id,
            name: name.trim().to_string(),
            polygon,
            feature,
        });
    }

    let (set, duplicates) = BoundarySet::new(boundaries);
    for id in duplicates {
        log::warn!("Duplicate boundary for division {id}; keeping the first");
    }

    log::info!(
        "Loaded {} division boundaries from {raw_count} features",
        set.len()
    );
    Ok(set)
}

/// Reads a feature property as a string, accepting numeric ids too.
fn property_string(feature: &Feature, key: &str) -> Option<String> {
    match feature.property(key)? {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Converts a feature's geometry into a [`MultiPolygon`].
/// Handles both `Polygon` and `MultiPolygon` geometry types.
fn feature_multipolygon(feature: &Feature) -> Option<MultiPolygon<f64>> {
    let geometry = feature.geometry.clone()?;
    let geo_geom: geo::Geometry<f64> = geometry.try_into().ok()?;
    match geo_geom {
        geo::Geometry::MultiPolygon(mp) => Some(mp),
        geo::Geometry::Polygon(p) => Some(MultiPolygon(vec![p])),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DIVISIONS: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "properties": { "APREC": "77th Street" },
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[-118.30, 33.95], [-118.25, 33.95], [-118.25, 34.00], [-118.30, 34.00], [-118.30, 33.95]]]
                }
            },
            {
                "type": "Feature",
                "properties": { "APREC": "CENTRAL" },
                "geometry": {
                    "type": "MultiPolygon",
                    "coordinates": [[[[-118.26, 34.03], [-118.23, 34.03], [-118.23, 34.06], [-118.26, 34.06], [-118.26, 34.03]]]]
                }
            },
            {
                "type": "Feature",
                "properties": { "NAME": "no id" },
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 0.0]]]
                }
            },
            {
                "type": "Feature",
                "properties": { "APREC": "POINTY" },
                "geometry": { "type": "Point", "coordinates": [-118.0, 34.0] }
            },
            {
                "type": "Feature",
                "properties": { "APREC": "central " },
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 0.0]]]
                }
            }
        ]
    }"#;

    #[test]
    fn parses_polygon_and_multipolygon_features() {
        let set = parse_boundaries(DIVISIONS, "APREC").unwrap();
        assert_eq!(set.ids().collect::<Vec<_>>(), vec!["77TH STREET", "CENTRAL"]);

        let street = set.get("77TH STREET").unwrap();
        assert_eq!(street.name, "77th Street");
        assert_eq!(
            street.feature.property(DIVISION_ID_PROPERTY),
            Some(&serde_json::Value::String("77TH STREET".to_string()))
        );
    }

    #[test]
    fn duplicate_ids_keep_first_feature() {
        let set = parse_boundaries(DIVISIONS, "APREC").unwrap();
        let central = set.get("CENTRAL").unwrap();
        assert_eq!(central.name, "CENTRAL");
    }

    #[test]
    fn rejects_non_collection() {
        let err = parse_boundaries(
            r#"{ "type": "Point", "coordinates": [-118.0, 34.0] }"#,
            "APREC",
        )
        .unwrap_err();
        assert!(matches!(
            err,
            GeographyError::NotFeatureCollection { found: "Geometry" }
        ));
    }

    #[test]
    fn rejects_invalid_json() {
        assert!(matches!(
            parse_boundaries("not json", "APREC"),
            Err(GeographyError::GeoJson(_))
        ));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = load_boundaries(Path::new("does/not/exist.geojson"), "APREC").unwrap_err();
        assert!(matches!(err, GeographyError::Io { .. }));
    }
}
