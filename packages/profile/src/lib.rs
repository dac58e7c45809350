#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Dashboard version profiles — loads all profile definitions from embedded
//! TOML configs.
//!
//! The dashboard went through several near-identical layout revisions that
//! differed only in which KPI columns they showed, whether the
//! year-over-year delta appeared, and whether the 3D map toggle existed.
//! Each revision lives on as a `.toml` file in `packages/profile/profiles/`,
//! baked into the binary at compile time via [`include_str!`]; one pipeline
//! serves every profile.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};
use thiserror::Error;

/// TOML configs embedded at compile time.
const PROFILE_TOMLS: &[(&str, &str)] = &[
    ("v0", include_str!("../profiles/v0.toml")),
    ("v1", include_str!("../profiles/v1.toml")),
    ("v2", include_str!("../profiles/v2.toml")),
    ("v3", include_str!("../profiles/v3.toml")),
    ("v4", include_str!("../profiles/v4.toml")),
    ("v5", include_str!("../profiles/v5.toml")),
];

/// Total number of configured profiles (used in tests).
#[cfg(test)]
const EXPECTED_PROFILE_COUNT: usize = 6;

/// The profile served when none is requested — the layout the dashboard
/// shipped with.
pub const DEFAULT_PROFILE_ID: &str = "v2";

/// Errors that can occur while resolving a profile.
#[derive(Debug, Error)]
pub enum ProfileError {
    /// No embedded profile has the requested id.
    #[error("Unknown profile id: {id}")]
    UnknownId {
        /// The id that was requested.
        id: String,
    },
}

/// One KPI column of the summary strip.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum KpiColumn {
    /// Transaction count over the selected filters.
    TotalSales,
    /// Median price per square foot.
    MedianPriceSf,
    /// Median sale price.
    MedianPrice,
    /// Median construction year.
    MedianYearBuilt,
    /// Median finished square footage.
    MedianSquareFeet,
    /// Period-over-period change in median price per square foot.
    YoyDelta,
}

impl KpiColumn {
    /// The on-screen label for this column.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::TotalSales => "Total home sales",
            Self::MedianPriceSf => "Median price / SF",
            Self::MedianPrice => "Median sale price",
            Self::MedianYearBuilt => "Median vintage",
            Self::MedianSquareFeet => "Median size (SF)",
            Self::YoyDelta => "Change in median price / SF",
        }
    }

    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::TotalSales,
            Self::MedianPriceSf,
            Self::MedianPrice,
            Self::MedianYearBuilt,
            Self::MedianSquareFeet,
            Self::YoyDelta,
        ]
    }
}

/// One dashboard revision's behavioral switches.
///
/// Loaded from TOML files at compile time; all revisions run on the same
/// pipeline, so a profile only gates what the response layers expose.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DashboardProfile {
    /// Unique identifier (e.g., `"v2"`).
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

fn parse_profile_toml(toml_str: &str) -> Result<DashboardProfile, String> {
    toml::de::from_str(toml_str).map_err(|e| e.to_string())
}

/// Returns all configured profiles, parsed from embedded TOML.
///
/// # Panics
///
/// Panics if any TOML config is malformed (this is a compile-time guarantee
/// since the configs are embedded).
#[must_use]
pub fn all_profiles() -> Vec<DashboardProfile> {
    PROFILE_TOMLS
        .iter()
        .map(|(name, toml)| {
            parse_profile_toml(toml).unwrap_or_else(|e| panic!("Failed to parse {name}.toml: {e}"))
        })
        .collect()
}

/// Looks up a profile by id.
///
/// # Errors
///
/// Returns [`ProfileError::UnknownId`] when no embedded profile has the
/// requested id.
pub fn find_profile(id: &str) -> Result<DashboardProfile, ProfileError> {
    all_profiles()
        .into_iter()
        .find(|p| p.id == id)
        .ok_or_else(|| ProfileError::UnknownId { id: id.to_string() })
}

/// Returns the default profile.
///
/// # Panics
///
/// Panics if the embedded registry is missing [`DEFAULT_PROFILE_ID`], which
/// the registry tests rule out.
#[must_use]
pub fn default_profile() -> DashboardProfile {
    find_profile(DEFAULT_PROFILE_ID)
        .unwrap_or_else(|e| panic!("Default profile missing from registry: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_all_profiles() {
        let profiles = all_profiles();
        assert_eq!(profiles.len(), EXPECTED_PROFILE_COUNT);
    }

    #[test]
    fn profile_ids_are_unique() {
        let profiles = all_profiles();
        let mut ids: Vec<&str> = profiles.iter().map(|p| p.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), EXPECTED_PROFILE_COUNT);
    }

    #[test]
    fn default_profile_is_the_shipped_layout() {
        let profile = default_profile();
        assert_eq!(profile.id, "v2");
        assert!(profile.delta_kpi);
        assert!(profile.extruded_view);
    }

    #[test]
    fn column_sets_are_consistent_with_flags() {
        for profile in &all_profiles() {
            assert!(
                !profile.kpi_columns.is_empty(),
                "{}: empty KPI column set",
                profile.id
            );
            assert_eq!(
                profile.kpi_columns.contains(&KpiColumn::YoyDelta),
                profile.delta_kpi,
                "{}: delta flag and column set disagree",
                profile.id
            );
        }
    }

    #[test]
    fn unknown_id_is_an_error() {
        let err = find_profile("v99").unwrap_err();
        assert!(err.to_string().contains("v99"));
    }

    #[test]
    fn parses_a_profile_from_toml() {
        let toml_str = r#"
            id = "test"
            name = "Test layout"
            delta_kpi = false
            extruded_view = true
            kpi_columns = ["TOTAL_SALES", "MEDIAN_PRICE_SF"]
        "#;
        let profile = parse_profile_toml(toml_str).unwrap();
        assert_eq!(profile.id, "test");
        assert_eq!(
            profile.kpi_columns,
            vec![KpiColumn::TotalSales, KpiColumn::MedianPriceSf]
        );
    }

    #[test]
    fn column_labels_are_distinct() {
        let mut labels: Vec<&str> = KpiColumn::all().iter().map(|c| c.label()).collect();
        labels.sort_unstable();
        labels.dedup();
        assert_eq!(labels.len(), KpiColumn::all().len());
    }
}
