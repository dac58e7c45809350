#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API request and response types for the housing map server.
//!
//! These types are serialized to JSON for the REST API. They are separate
//! from the pipeline types to allow independent evolution of the API
//! contract: responses carry formatted display strings alongside raw
//! values so the frontend never re-implements number formatting.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use housing_map_pipeline_models::{
    FilterCriteria, GeographyScope, JoinReport, MonthlyPoint, PeriodMarker,
};
use housing_map_profile::{DashboardProfile, KpiColumn};
use housing_map_sales_models::{
    DEFAULT_YEAR_RANGE, SquareFootageBucket, SubGeography, VintageBucket,
};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};
use thiserror::Error;

/// Tooltip template for map tracts. Placeholders name fields of
/// [`MapTract`] as they appear in the serialized response.
pub const TOOLTIP_HTML: &str =
    "Median price per SF: <b>{priceSfFormatted}</b><br>Total sales: <b>{totalSalesFormatted}</b>";

/// Layer-level fill opacity applied to every tract polygon.
pub const FILL_OPACITY: f64 = 0.5;

/// Tract outline color (RGBA).
pub const LINE_COLOR: [u8; 4] = [0, 0, 0, 255];

/// Extruded-view height per transaction, in meters.
pub const ELEVATION_PER_SALE: u64 = 50;

/// Errors that can occur while converting query parameters into filter
/// criteria.
#[derive(Debug, Error)]
pub enum CriteriaError {
    /// The vintage label matches no bucket.
    #[error("Unknown vintage bucket: {label}")]
    UnknownVintage {
        /// The label that was requested.
        label: String,
    },
    /// The square-footage label matches no bucket.
    #[error("Unknown square-footage bucket: {label}")]
    UnknownSquareFootage {
        /// The label that was requested.
        label: String,
    },
    /// A sub-geography label matches no region.
    #[error("Unknown sub-geography: {label}")]
    UnknownSubGeography {
        /// The label that was requested.
        label: String,
    },
}

/// Health check response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHealth {
    /// Whether the service is healthy.
    pub healthy: bool,
    /// Service version.
    pub version: String,
}

// ── Filter criteria query parameters ─────────────────────────────────────

/// Filter parameters shared by the summary, map, and trend endpoints.
///
/// All fields are optional; absent fields fall back to the dashboard's
/// initial state. Bucket fields take the same labels the UI shows
/// (`"<2000"`, `"2500"`, `"North Forsyth"`, …).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CriteriaParams {
    /// First transaction year (inclusive).
    pub year_start: Option<i32>,
    /// Last transaction year (inclusive).
    pub year_end: Option<i32>,
    /// Lower vintage bucket label.
    pub vintage_min: Option<String>,
    /// Upper vintage bucket label.
    pub vintage_max: Option<String>,
    /// Lower square-footage bucket label.
    pub sf_min: Option<String>,
    /// Upper square-footage bucket label.
    pub sf_max: Option<String>,
    /// Comma-separated sub-geography labels; absent or empty means the
    /// entire county.
    pub sub_geos: Option<String>,
}

impl CriteriaParams {
    /// Resolves these parameters into [`FilterCriteria`], applying the
    /// dashboard defaults for absent fields.
    ///
    /// # Errors
    ///
    /// Returns a [`CriteriaError`] when a bucket or region label matches
    /// nothing; the caller maps this to HTTP 400.
    pub fn criteria(&self) -> Result<FilterCriteria, CriteriaError> {
        let year_range = (
            self.year_start.unwrap_or(DEFAULT_YEAR_RANGE.0),
            self.year_end.unwrap_or(DEFAULT_YEAR_RANGE.1),
        );

        let vintage_range = (
            parse_vintage(self.vintage_min.as_deref(), VintageBucket::Before2000)?,
            parse_vintage(self.vintage_max.as_deref(), VintageBucket::From2011To2023)?,
        );

        let square_footage_range = (
            parse_square_footage(self.sf_min.as_deref(), SquareFootageBucket::Under1000)?,
            parse_square_footage(self.sf_max.as_deref(), SquareFootageBucket::Over5000)?,
        );

        let scope = match self.sub_geos.as_deref() {
            None | Some("") => GeographyScope::EntireCounty,
            Some(csv) => {
                let mut regions = BTreeSet::new();
                for token in csv.split(',') {
                    let label = token.trim();
                    let region: SubGeography = label.parse().map_err(|_| {
                        CriteriaError::UnknownSubGeography {
                            label: label.to_string(),
                        }
                    })?;
                    regions.insert(region);
                }
                GeographyScope::SubGeographies(regions)
            }
        };

        Ok(FilterCriteria {
            year_range,
            vintage_range,
            square_footage_range,
            scope,
        })
    }
}

fn parse_vintage(
    label: Option<&str>,
    default: VintageBucket,
) -> Result<VintageBucket, CriteriaError> {
    match label {
        None => Ok(default),
        Some(label) => label.parse().map_err(|_| CriteriaError::UnknownVintage {
            label: label.to_string(),
        }),
    }
}

fn parse_square_footage(
    label: Option<&str>,
    default: SquareFootageBucket,
) -> Result<SquareFootageBucket, CriteriaError> {
    match label {
        None => Ok(default),
        Some(label) => label
            .parse()
            .map_err(|_| CriteriaError::UnknownSquareFootage {
                label: label.to_string(),
            }),
    }
}

/// Query parameters for the map endpoint: the shared criteria fields plus
/// the view mode and base-map style.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapQueryParams {
    /// First transaction year (inclusive).
    pub year_start: Option<i32>,
    /// Last transaction year (inclusive).
    pub year_end: Option<i32>,
    /// Lower vintage bucket label.
    pub vintage_min: Option<String>,
    /// Upper vintage bucket label.
    pub vintage_max: Option<String>,
    /// Lower square-footage bucket label.
    pub sf_min: Option<String>,
    /// Upper square-footage bucket label.
    pub sf_max: Option<String>,
    /// Comma-separated sub-geography labels.
    pub sub_geos: Option<String>,
    /// Map view mode (default flat).
    pub view: Option<MapView>,
    /// Base-map style (default streets).
    pub style: Option<MapStyle>,
}

impl From<&MapQueryParams> for CriteriaParams {
    fn from(p: &MapQueryParams) -> Self {
        Self {
            year_start: p.year_start,
            year_end: p.year_end,
            vintage_min: p.vintage_min.clone(),
            vintage_max: p.vintage_max.clone(),
            sf_min: p.sf_min.clone(),
            sf_max: p.sf_max.clone(),
            sub_geos: p.sub_geos.clone(),
        }
    }
}

// ── Map view and style ───────────────────────────────────────────────────

/// Camera state for one map view mode.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewState {
    /// Initial latitude.
    pub latitude: f64,
    /// Initial longitude.
    pub longitude: f64,
    /// Initial zoom level.
    pub zoom: f64,
    /// Minimum zoom the user can reach.
    pub min_zoom: f64,
    /// Maximum zoom the user can reach.
    pub max_zoom: f64,
    /// Camera pitch in degrees.
    pub pitch: f64,
    /// Map canvas height in pixels.
    pub height: u32,
}

/// Map view mode. The extruded view raises each tract by its transaction
/// count and tilts the camera; the flat view is a plain choropleth.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum MapView {
    /// 2D choropleth.
    Flat,
    /// 3D extrusion by transaction count.
    Extruded,
}

impl MapView {
    /// Camera state for this view mode. The extruded camera sits a tenth
    /// of a degree further north so the tilted county stays centered.
    #[must_use]
    pub const fn view_state(self) -> ViewState {
        match self {
            Self::Flat => ViewState {
                latitude: 34.207054643497315,
                longitude: -84.10535919531371,
                zoom: 9.2,
                min_zoom: 8.0,
                max_zoom: 15.0,
                pitch: 0.0,
                height: 565,
            },
            Self::Extruded => ViewState {
                latitude: 34.307054643497315,
                longitude: -84.10535919531371,
                zoom: 9.2,
                min_zoom: 8.0,
                max_zoom: 15.0,
                pitch: 45.0,
                height: 565,
            },
        }
    }

    /// Hover highlight color (RGBA) for this view mode.
    #[must_use]
    pub const fn highlight_color(self) -> [u8; 4] {
        match self {
            Self::Flat => [255, 255, 255, 80],
            Self::Extruded => [255, 255, 255, 90],
        }
    }
}

/// Base-map style selection.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum MapStyle {
    /// Road-centric base map.
    Streets,
    /// Satellite imagery.
    Satellite,
    /// Muted grayscale base map.
    Gray,
}

impl MapStyle {
    /// The UI label for this style.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Streets => "Streets",
            Self::Satellite => "Satellite",
            Self::Gray => "Gray",
        }
    }

    /// The tile provider's style identifier.
    #[must_use]
    pub const fn provider_style(self) -> &'static str {
        match self {
            Self::Streets => "road",
            Self::Satellite => "satellite",
            Self::Gray => "light",
        }
    }

    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Streets, Self::Satellite, Self::Gray]
    }
}

// ── Meta endpoint ────────────────────────────────────────────────────────

/// One selectable base-map style, as listed by the meta endpoint.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiMapStyle {
    /// Query-parameter token for this style.
    pub id: MapStyle,
    /// UI label.
    pub label: String,
    /// Tile provider style identifier.
    pub provider_style: String,
}

impl From<MapStyle> for ApiMapStyle {
    fn from(style: MapStyle) -> Self {
        Self {
            id: style,
            label: style.label().to_string(),
            provider_style: style.provider_style().to_string(),
        }
    }
}

/// The active dashboard profile, as exposed by the meta endpoint.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiProfile {
    /// Profile id (e.g., `"v2"`).
    pub id: String,
    /// Human-readable revision name.
    pub name: String,
    /// Whether the year-over-year delta KPI is shown.
    pub delta_kpi: bool,
    /// Whether the extruded (3D) map view is offered.
    pub extruded_view: bool,
    /// KPI columns, in display order.
    pub kpi_columns: Vec<KpiColumn>,
}

impl From<&DashboardProfile> for ApiProfile {
    fn from(profile: &DashboardProfile) -> Self {
        Self {
            id: profile.id.clone(),
            name: profile.name.clone(),
            delta_kpi: profile.delta_kpi,
            extruded_view: profile.extruded_view,
            kpi_columns: profile.kpi_columns.clone(),
        }
    }
}

/// Last complete data month.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiCoverage {
    /// Calendar year.
    pub year: i32,
    /// Calendar month (1-12).
    pub month: u32,
}

/// Fixed option lists the UI renders its controls from.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetaResponse {
    /// Selectable transaction years, ascending.
    pub years: Vec<i32>,
    /// Initially selected year range.
    pub default_year_range: (i32, i32),
    /// Vintage bucket labels, oldest first.
    pub vintage_buckets: Vec<String>,
    /// Square-footage bucket labels, smallest first.
    pub square_footage_buckets: Vec<String>,
    /// Sub-geography labels.
    pub sub_geographies: Vec<String>,
    /// Selectable base-map styles.
    pub map_styles: Vec<ApiMapStyle>,
    /// Last complete data month.
    pub coverage_end: ApiCoverage,
    /// Date the source extract was pulled.
    pub extract_date: NaiveDate,
    /// The active dashboard profile.
    pub profile: ApiProfile,
}

// ── Summary endpoint ─────────────────────────────────────────────────────

/// Period-over-period change in median price per square foot.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiDelta {
    /// First selected year.
    pub base_year: i32,
    /// Last selected year.
    pub final_year: i32,
    /// Median price/SF across the first year's sales.
    pub base_median_price_sf: f64,
    /// Median price/SF across the last year's sales.
    pub final_median_price_sf: f64,
    /// `(final - base) / base`, as a fraction.
    pub percent_change: f64,
    /// Display string, e.g. `"12.3%"`.
    pub percent_change_formatted: String,
}

/// KPI scalars with display strings alongside raw values.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryResponse {
    /// Transaction count.
    pub total_sales: u64,
    /// Display string, e.g. `"1,234"`.
    pub total_sales_formatted: String,
    /// Median price per square foot.
    pub median_price_sf: Option<f64>,
    /// Display string, e.g. `"$187"`.
    pub median_price_sf_formatted: Option<String>,
    /// Median sale price.
    pub median_price: Option<f64>,
    /// Display string, e.g. `"$410,000"`.
    pub median_price_formatted: Option<String>,
    /// Median construction year.
    pub median_year_built: Option<f64>,
    /// Display string, e.g. `"2004"`.
    pub median_year_built_formatted: Option<String>,
    /// Median finished square footage.
    pub median_square_feet: Option<f64>,
    /// Display string, e.g. `"2,250"`.
    pub median_square_feet_formatted: Option<String>,
    /// Year-over-year delta; omitted when the profile disables it or it
    /// is undefined.
    pub delta: Option<ApiDelta>,
    /// KPI columns the active profile displays, in order.
    pub kpi_columns: Vec<KpiColumn>,
}

// ── Map endpoint ─────────────────────────────────────────────────────────

/// One tract of the choropleth response.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapTract {
    /// Census tract GEOID.
    pub geoid: String,
    /// Median price per square foot.
    pub median_price_sf: f64,
    /// Median sale price.
    pub median_price: f64,
    /// Median construction year.
    pub median_year_built: f64,
    /// Transaction count.
    pub total_sales: u64,
    /// Tooltip display string, e.g. `"$187"`.
    pub price_sf_formatted: String,
    /// Tooltip display string, e.g. `"1,234"`.
    pub total_sales_formatted: String,
    /// Equal-width color bin, 0 (lightest) through 3 (darkest).
    pub color_bin: u8,
    /// RGB fill color for the bin.
    pub fill_color: [u8; 3],
    /// Extrusion height in meters; present only in the extruded view.
    pub elevation: Option<u64>,
    /// Boundary polygon as GeoJSON.
    pub geometry: geojson::Geometry,
}

/// Everything the frontend needs to draw the choropleth.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapResponse {
    /// The view mode this response was built for.
    pub view: MapView,
    /// The base-map style.
    pub style: MapStyle,
    /// Tile provider style identifier.
    pub provider_style: String,
    /// Camera state for the view mode.
    pub view_state: ViewState,
    /// Hover highlight color (RGBA).
    pub highlight_color: [u8; 4],
    /// Layer-level fill opacity.
    pub fill_opacity: f64,
    /// Tract outline color (RGBA).
    pub line_color: [u8; 4],
    /// Tooltip HTML template over [`MapTract`] fields.
    pub tooltip_html: String,
    /// Choropleth rows.
    pub tracts: Vec<MapTract>,
    /// Inner-join accounting for this response.
    pub join: JoinReport,
}

// ── Trend endpoint ───────────────────────────────────────────────────────

/// Monthly trend series with the selected-range markers.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendResponse {
    /// Chart title for the selected geography.
    pub title: String,
    /// Chronological monthly points.
    pub points: Vec<MonthlyPoint>,
    /// Marker at the start of the selected range.
    pub range_start: PeriodMarker,
    /// Marker at the end of the selected range.
    pub range_end: PeriodMarker,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_params_resolve_to_the_default_criteria() {
        let criteria = CriteriaParams::default().criteria().unwrap();
        assert_eq!(criteria, FilterCriteria::default());
    }

    #[test]
    fn bucket_labels_resolve() {
        let params = CriteriaParams {
            year_start: Some(2019),
            year_end: Some(2022),
            vintage_min: Some("2000-2010".to_string()),
            vintage_max: Some("2011-2023".to_string()),
            sf_min: Some("1000".to_string()),
            sf_max: Some(">5000".to_string()),
            sub_geos: None,
        };
        let criteria = params.criteria().unwrap();
        assert_eq!(criteria.year_range, (2019, 2022));
        assert_eq!(criteria.vintage_bounds(), (2000, 2050));
        assert_eq!(
            criteria.square_footage_range,
            (SquareFootageBucket::Sf1000, SquareFootageBucket::Over5000)
        );
    }

    #[test]
    fn sub_geos_parse_as_a_comma_separated_list() {
        let params = CriteriaParams {
            sub_geos: Some("Cumming, North Forsyth".to_string()),
            ..CriteriaParams::default()
        };
        let criteria = params.criteria().unwrap();
        assert!(criteria.scope.matches(SubGeography::Cumming));
        assert!(criteria.scope.matches(SubGeography::NorthForsyth));
        assert!(!criteria.scope.matches(SubGeography::WestForsyth));
    }

    #[test]
    fn empty_sub_geos_mean_the_entire_county() {
        let params = CriteriaParams {
            sub_geos: Some(String::new()),
            ..CriteriaParams::default()
        };
        let criteria = params.criteria().unwrap();
        assert_eq!(criteria.scope, GeographyScope::EntireCounty);
    }

    #[test]
    fn unknown_labels_are_rejected() {
        let bad_vintage = CriteriaParams {
            vintage_min: Some("1990s".to_string()),
            ..CriteriaParams::default()
        };
        assert!(bad_vintage.criteria().is_err());

        let bad_geo = CriteriaParams {
            sub_geos: Some("East Forsyth".to_string()),
            ..CriteriaParams::default()
        };
        let err = bad_geo.criteria().unwrap_err();
        assert!(err.to_string().contains("East Forsyth"));
    }

    #[test]
    fn view_states_differ_only_where_the_camera_moves() {
        let flat = MapView::Flat.view_state();
        let extruded = MapView::Extruded.view_state();

        assert!((flat.pitch - 0.0).abs() < f64::EPSILON);
        assert!((extruded.pitch - 45.0).abs() < f64::EPSILON);
        assert!(extruded.latitude > flat.latitude);
        assert!((flat.longitude - extruded.longitude).abs() < f64::EPSILON);
        assert_eq!(flat.height, 565);
    }

    #[test]
    fn style_tokens_map_to_provider_styles() {
        assert_eq!(MapStyle::Streets.provider_style(), "road");
        assert_eq!(MapStyle::Satellite.provider_style(), "satellite");
        assert_eq!(MapStyle::Gray.provider_style(), "light");
        assert_eq!("gray".parse::<MapStyle>().unwrap(), MapStyle::Gray);
    }
}
