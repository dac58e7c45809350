#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Census tract boundary types.
//!
//! One polygon per tract, keyed by GEOID — the join key back to the sales
//! table. The collection is built once at startup from the static boundary
//! file and shared read-only for the life of the process.

use std::collections::BTreeMap;

use geo::MultiPolygon;

/// One census tract's boundary polygon.
#[derive(Debug, Clone, PartialEq)]
pub struct TractBoundary {
    /// Census GEOID (state FIPS + county FIPS + tract code).
    pub geoid: String,
    /// Boundary geometry in WGS84. Single-polygon tracts are stored as a
    /// one-element multipolygon so downstream code handles one shape.
    pub geometry: MultiPolygon<f64>,
}

/// All tract boundaries for the county, keyed by GEOID.
#[derive(Debug, Clone, Default)]
pub struct TractBoundaries {
    tracts: BTreeMap<String, TractBoundary>,
}

impl TractBoundaries {
    /// Builds the collection from parsed boundaries. Later duplicates of a
    /// GEOID replace earlier ones.
    #[must_use]
    pub fn new(boundaries: Vec<TractBoundary>) -> Self {
        let tracts = boundaries
            .into_iter()
            .map(|b| (b.geoid.clone(), b))
            .collect();
        Self { tracts }
    }

    /// Looks up a tract by GEOID.
    #[must_use]
    pub fn get(&self, geoid: &str) -> Option<&TractBoundary> {
        self.tracts.get(geoid)
    }

    /// Number of tracts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tracts.len()
    }

    /// `true` when no tracts are loaded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tracts.is_empty()
    }

    /// Iterates boundaries in GEOID order.
    pub fn iter(&self) -> impl Iterator<Item = &TractBoundary> {
        self.tracts.values()
    }

    /// Iterates GEOIDs in ascending order.
    pub fn geoids(&self) -> impl Iterator<Item = &str> {
        self.tracts.keys().map(String::as_str)
    }
}

impl<'a> IntoIterator for &'a TractBoundaries {
    type Item = &'a TractBoundary;
    type IntoIter = std::collections::btree_map::Values<'a, String, TractBoundary>;

    fn into_iter(self) -> Self::IntoIter {
        self.tracts.values()
    }
}

#[cfg(test)]
mod tests {
    use geo::polygon;

    use super::*;

    fn square(geoid: &str) -> TractBoundary {
        TractBoundary {
            geoid: geoid.to_string(),
            geometry: MultiPolygon(vec![polygon![
                (x: 0.0, y: 0.0),
                (x: 1.0, y: 0.0),
                (x: 1.0, y: 1.0),
                (x: 0.0, y: 1.0),
            ]]),
        }
    }

    #[test]
    fn keyed_by_geoid() {
        let boundaries = TractBoundaries::new(vec![square("13117130200"), square("13117130100")]);
        assert_eq!(boundaries.len(), 2);
        assert!(boundaries.get("13117130100").is_some());
        assert!(boundaries.get("13117999999").is_none());
    }

    #[test]
    fn iterates_in_geoid_order() {
        let boundaries = TractBoundaries::new(vec![square("13117130200"), square("13117130100")]);
        let geoids: Vec<&str> = boundaries.geoids().collect();
        assert_eq!(geoids, vec!["13117130100", "13117130200"]);
    }

    #[test]
    fn duplicate_geoid_replaces() {
        let boundaries = TractBoundaries::new(vec![square("13117130100"), square("13117130100")]);
        assert_eq!(boundaries.len(), 1);
    }
}
