#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Filter criteria and pipeline result types.
//!
//! [`FilterCriteria`] is an immutable value constructed per request and
//! passed explicitly into every pipeline call — there is no ambient filter
//! state anywhere in the system. The result types here are the exact
//! shapes the map, trend chart, and KPI strip consume.

use std::collections::BTreeSet;

use housing_map_sales_models::{
    DEFAULT_YEAR_RANGE, SaleRecord, SquareFootageBucket, SubGeography, VintageBucket,
};
use serde::{Deserialize, Serialize};

/// Which part of the county a request covers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GeographyScope {
    /// No sub-geography restriction.
    EntireCounty,
    /// Restrict to the named regions. An empty set matches nothing.
    SubGeographies(BTreeSet<SubGeography>),
}

impl GeographyScope {
    /// `true` when a record in `region` passes this scope.
    #[must_use]
    pub fn matches(&self, region: SubGeography) -> bool {
        match self {
            Self::EntireCounty => true,
            Self::SubGeographies(regions) => regions.contains(&region),
        }
    }

    /// Builds a sub-geography scope from any iterator of regions.
    #[must_use]
    pub fn regions(regions: impl IntoIterator<Item = SubGeography>) -> Self {
        Self::SubGeographies(regions.into_iter().collect())
    }
}

/// User-chosen filter parameters for one pipeline run.
///
/// Bounds are inclusive throughout. Equal year bounds mean a single-year
/// selection; equal square-footage bounds are invalid and rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterCriteria {
    /// (first, last) transaction year.
    pub year_range: (i32, i32),
    /// (lower, upper) construction vintage bucket.
    pub vintage_range: (VintageBucket, VintageBucket),
    /// (lower, upper) square-footage bucket, sentinels included.
    pub square_footage_range: (SquareFootageBucket, SquareFootageBucket),
    /// Geographic scope.
    pub scope: GeographyScope,
}

impl FilterCriteria {
    /// `true` when the year bounds select a single year (no delta KPI).
    #[must_use]
    pub const fn single_year(&self) -> bool {
        self.year_range.0 == self.year_range.1
    }

    /// The inclusive year-built range the vintage buckets map to.
    #[must_use]
    pub const fn vintage_bounds(&self) -> (i32, i32) {
        (self.vintage_range.0.min_year(), self.vintage_range.1.max_year())
    }
}

impl Default for FilterCriteria {
    /// The dashboard's initial state: last three data years, all vintages,
    /// all sizes, entire county.
    fn default() -> Self {
        Self {
            year_range: DEFAULT_YEAR_RANGE,
            vintage_range: (VintageBucket::Before2000, VintageBucket::From2011To2023),
            square_footage_range: (SquareFootageBucket::Under1000, SquareFootageBucket::Over5000),
            scope: GeographyScope::EntireCounty,
        }
    }
}

/// Period-over-period change in median price per square foot between the
/// boundary years of the selected range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodDelta {
    /// First selected year.
    pub base_year: i32,
    /// Last selected year.
    pub final_year: i32,
    /// Median price/SF across the first year's sales.
    pub base_median_price_sf: f64,
    /// Median price/SF across the last year's sales.
    pub final_median_price_sf: f64,
    /// `(final - base) / base`, as a fraction (0.123 = +12.3%).
    pub percent_change: f64,
}

/// Scalar KPIs computed over the primary filtered set.
///
/// Medians are `None` when the set is empty; `delta` is `None` whenever it
/// is not computable (single-year selection, an empty boundary-year subset,
/// or a zero base median) — the display layer suppresses the widget rather
/// than showing a placeholder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesSummary {
    /// Transaction count.
    pub total_sales: u64,
    /// Median price per square foot.
    pub median_price_sf: Option<f64>,
    /// Median sale price.
    pub median_price: Option<f64>,
    /// Median construction year.
    pub median_year_built: Option<f64>,
    /// Median finished square footage.
    pub median_square_feet: Option<f64>,
    /// Period-over-period delta, when computable.
    pub delta: Option<PeriodDelta>,
}

/// Everything one filter run produces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilteredSales {
    /// Records passing every filter except the year filter. Feeds the
    /// trend chart, which always spans all data years.
    pub timeline: Vec<SaleRecord>,
    /// The primary set: `timeline` restricted to the selected years.
    /// Feeds the map, the aggregates, and the KPIs.
    pub selected: Vec<SaleRecord>,
    /// First-boundary-year subset, present only when the year bounds
    /// differ.
    pub base_year: Option<Vec<SaleRecord>>,
    /// Last-boundary-year subset, present only when the year bounds
    /// differ.
    pub final_year: Option<Vec<SaleRecord>>,
    /// KPIs over `selected`.
    pub summary: SalesSummary,
}

/// Per-tract aggregate of the primary filtered set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TractAggregate {
    /// Census tract GEOID.
    pub geoid: String,
    /// Median price per square foot.
    pub median_price_sf: f64,
    /// Median sale price.
    pub median_price: f64,
    /// Median construction year.
    pub median_year_built: f64,
    /// Transaction count.
    pub sales: u64,
}

/// One render-ready choropleth row: aggregate values joined to boundary
/// geometry, with display strings and the color-bin assignment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TractMapRow {
    /// Census tract GEOID.
    pub geoid: String,
    /// Median price per square foot.
    pub median_price_sf: f64,
    /// Median sale price.
    pub median_price: f64,
    /// Median construction year.
    pub median_year_built: f64,
    /// Transaction count.
    pub sales: u64,
    /// Tooltip string, e.g. `"$187"`.
    pub price_sf_formatted: String,
    /// Tooltip string, e.g. `"1,234"`.
    pub total_sales_formatted: String,
    /// Equal-width color bin, 0 (lightest) through 3 (darkest).
    pub color_bin: u8,
    /// RGB fill color for the bin.
    pub fill_color: [u8; 3],
    /// Boundary geometry, ready to serialize into the map payload.
    pub geometry: geojson::Geometry,
}

/// Accounting for the aggregate-to-boundary inner join. Unmatched rows are
/// dropped (current dashboard behavior), but the drops are counted so the
/// loss is visible in logs and tests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinReport {
    /// Rows carried into the map dataset.
    pub joined: u64,
    /// Aggregates whose GEOID has no boundary polygon.
    pub aggregates_without_boundary: u64,
    /// Boundary polygons with no sales in the filtered set.
    pub boundaries_without_aggregate: u64,
}

impl JoinReport {
    /// Total rows dropped on either side.
    #[must_use]
    pub const fn total_dropped(&self) -> u64 {
        self.aggregates_without_boundary + self.boundaries_without_aggregate
    }

    /// `true` when nothing was dropped.
    #[must_use]
    pub const fn is_clean(&self) -> bool {
        self.total_dropped() == 0
    }
}

/// One point of the monthly trend series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyPoint {
    /// Calendar year.
    pub year: i32,
    /// Calendar month (1-12).
    pub month: u32,
    /// Composite label, month not zero-padded (e.g. `"2021-3"`).
    pub period: String,
    /// Median price per square foot for the month.
    pub median_price_sf: f64,
    /// Transaction count for the month.
    pub sales: u64,
}

/// A vertical marker position on the trend chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodMarker {
    /// Calendar year.
    pub year: i32,
    /// Calendar month (1-12).
    pub month: u32,
    /// Composite label matching the series' period labels.
    pub period: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_criteria_match_dashboard_initial_state() {
        let criteria = FilterCriteria::default();
        assert_eq!(criteria.year_range, (2021, 2023));
        assert!(!criteria.single_year());
        assert_eq!(criteria.vintage_bounds(), (0, 2050));
        assert_eq!(criteria.scope, GeographyScope::EntireCounty);
    }

    #[test]
    fn scope_membership() {
        let scope = GeographyScope::regions([SubGeography::Cumming, SubGeography::NorthForsyth]);
        assert!(scope.matches(SubGeography::Cumming));
        assert!(!scope.matches(SubGeography::SouthForsyth));
        assert!(GeographyScope::EntireCounty.matches(SubGeography::SouthForsyth));
    }

    #[test]
    fn empty_region_set_matches_nothing() {
        let scope = GeographyScope::regions([]);
        for region in SubGeography::all() {
            assert!(!scope.matches(*region));
        }
    }

    #[test]
    fn join_report_accounting() {
        let report = JoinReport {
            joined: 40,
            aggregates_without_boundary: 2,
            boundaries_without_aggregate: 3,
        };
        assert_eq!(report.total_dropped(), 5);
        assert!(!report.is_clean());
        assert!(JoinReport::default().is_clean());
    }
}
