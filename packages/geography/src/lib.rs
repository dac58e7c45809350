#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Census tract boundary loading.
//!
//! Reads the county's tract polygons from a `GeoJSON` `FeatureCollection`
//! once at startup. Each feature must carry a `GEOID` property; features
//! with a missing key or an unusable geometry are skipped with a warning.
//! A missing or empty boundary file is fatal — the map cannot render
//! without it.

use std::path::Path;

use geo::MultiPolygon;
use geojson::GeoJson;
use housing_map_geography_models::{TractBoundaries, TractBoundary};
use thiserror::Error;

/// Default location of the tract boundary file, relative to the working
/// directory.
pub const DEFAULT_TRACTS_GEOJSON: &str = "data/forsyth_tracts.geojson";

/// Errors that can occur while loading tract boundaries.
#[derive(Debug, Error)]
pub enum GeographyError {
    /// The boundary file could not be opened or read.
    #[error("Failed to read boundary file: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not valid `GeoJSON`.
    #[error("Failed to parse boundary GeoJSON: {0}")]
    Parse(#[from] geojson::Error),

    /// The file parsed but is not a `FeatureCollection`.
    #[error("Boundary file is not a GeoJSON FeatureCollection")]
    NotAFeatureCollection,

    /// No feature yielded a usable tract polygon.
    #[error("Boundary file at {path} contained no usable tract polygons")]
    Empty {
        /// Path the boundaries were loaded from.
        path: String,
    },
}

/// Loads tract boundaries from a `GeoJSON` file at `path`.
///
/// # Errors
///
/// Returns [`GeographyError`] if the file cannot be read, is not a
/// `FeatureCollection`, or yields no usable polygons.
pub fn load_tract_boundaries(path: impl AsRef<Path>) -> Result<TractBoundaries, GeographyError> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path)?;
    let boundaries = parse_tract_boundaries(&raw)?;
    if boundaries.is_empty() {
        return Err(GeographyError::Empty {
            path: path.display().to_string(),
        });
    }
    log::info!(
        "Loaded {} tract boundaries from {}",
        boundaries.len(),
        path.display()
    );
    Ok(boundaries)
}

/// Parses tract boundaries from a `GeoJSON` `FeatureCollection` string.
///
/// # Errors
///
/// Returns [`GeographyError`] if the string is not parseable `GeoJSON` or
/// not a `FeatureCollection`. Individual bad features are skipped, not
/// fatal.
pub fn parse_tract_boundaries(raw: &str) -> Result<TractBoundaries, GeographyError> {
    let geojson: GeoJson = raw.parse()?;
    let GeoJson::FeatureCollection(collection) = geojson else {
        return Err(GeographyError::NotAFeatureCollection);
    };

    let mut boundaries = Vec::new();
    for feature in collection.features {
        let Some(geoid) = geoid_property(&feature) else {
            log::warn!("Skipping boundary feature without a GEOID property");
            continue;
        };

        let Some(geometry) = feature.geometry else {
            log::warn!("Skipping boundary {geoid}: no geometry");
            continue;
        };

        let Some(multi_polygon) = to_multipolygon(geometry) else {
            log::warn!("Skipping boundary {geoid}: geometry is not polygonal");
            continue;
        };

        boundaries.push(TractBoundary {
            geoid,
            geometry: multi_polygon,
        });
    }

    Ok(TractBoundaries::new(boundaries))
}

/// Extracts the `GEOID` property as a string. Some exports write it as a
/// number, so both forms are accepted.
fn geoid_property(feature: &geojson::Feature) -> Option<String> {
    match feature.property("GEOID")? {
        serde_json::Value::String(s) if !s.is_empty() => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Converts a `GeoJSON` geometry into a [`MultiPolygon`].
/// Handles both `Polygon` and `MultiPolygon` geometry types.
fn to_multipolygon(geometry: geojson::Geometry) -> Option<MultiPolygon<f64>> {
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

    const TWO_TRACTS: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "properties": {"GEOID": "13117130100"},
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[-84.2, 34.2], [-84.1, 34.2], [-84.1, 34.3], [-84.2, 34.3], [-84.2, 34.2]]]
                }
            },
            {
                "type": "Feature",
                "properties": {"GEOID": 13117130200},
                "geometry": {
                    "type": "MultiPolygon",
                    "coordinates": [[[[-84.1, 34.2], [-84.0, 34.2], [-84.0, 34.3], [-84.1, 34.3], [-84.1, 34.2]]]]
                }
            }
        ]
    }"#;

    #[test]
    fn parses_polygon_and_multipolygon_features() {
        let boundaries = parse_tract_boundaries(TWO_TRACTS).unwrap();
        assert_eq!(boundaries.len(), 2);
        assert!(boundaries.get("13117130100").is_some());
        // Numeric GEOIDs are stringified
        assert!(boundaries.get("13117130200").is_some());
    }

    #[test]
    fn polygon_features_become_single_element_multipolygons() {
        let boundaries = parse_tract_boundaries(TWO_TRACTS).unwrap();
        let tract = boundaries.get("13117130100").unwrap();
        assert_eq!(tract.geometry.0.len(), 1);
    }

    #[test]
    fn skips_features_without_geoid() {
        let raw = r#"{
            "type": "FeatureCollection",
            "features": [
                {
                    "type": "Feature",
                    "properties": {"NAME": "no geoid here"},
                    "geometry": {
                        "type": "Polygon",
                        "coordinates": [[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 0.0]]]
                    }
                }
            ]
        }"#;
        let boundaries = parse_tract_boundaries(raw).unwrap();
        assert!(boundaries.is_empty());
    }

    #[test]
    fn skips_non_polygonal_geometry() {
        let raw = r#"{
            "type": "FeatureCollection",
            "features": [
                {
                    "type": "Feature",
                    "properties": {"GEOID": "13117130100"},
                    "geometry": {"type": "Point", "coordinates": [-84.1, 34.2]}
                }
            ]
        }"#;
        let boundaries = parse_tract_boundaries(raw).unwrap();
        assert!(boundaries.is_empty());
    }

    #[test]
    fn rejects_bare_geometry_documents() {
        let raw = r#"{"type": "Polygon", "coordinates": [[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 0.0]]]}"#;
        assert!(matches!(
            parse_tract_boundaries(raw),
            Err(GeographyError::NotAFeatureCollection)
        ));
    }

    #[test]
    fn rejects_invalid_json() {
        assert!(parse_tract_boundaries("not geojson").is_err());
    }
}
