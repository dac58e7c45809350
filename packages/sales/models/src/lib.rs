#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Sales transaction types and the fixed filter dimensions of the housing data.
//!
//! This crate defines the canonical record type for one real-estate
//! transaction plus the discrete filter dimensions the dashboard exposes:
//! construction vintage buckets, square-footage buckets, and the county's
//! named sub-geographies. Bucket-to-range mappings are fixed lookup tables,
//! never inferred from data.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Calendar years covered by the transaction data.
pub const TRANSACTION_YEARS: &[i32] = &[2018, 2019, 2020, 2021, 2022, 2023];

/// Default selected year range (inclusive).
pub const DEFAULT_YEAR_RANGE: (i32, i32) = (2021, 2023);

/// Transactions below this sale price are excluded during loading as
/// non-qualified, non-market, or bulk transfers.
pub const MIN_QUALIFIED_PRICE: f64 = 1000.0;

/// Homes smaller than this are excluded during loading as recording errors
/// or non-residential parcels.
pub const MIN_HOME_SQUARE_FEET: f64 = 75.0;

/// Last month with complete data in the final covered year. The source
/// extract was pulled 2023-05-11, so 2023 ends at April.
pub const COVERAGE_END: (i32, u32) = (2023, 4);

/// Date the source extract was downloaded from county public records.
#[must_use]
pub fn extract_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2023, 5, 11).unwrap_or_default()
}

/// One of the county's four named sub-geographies.
///
/// Labels match the `Sub_geo` column of the source data exactly.
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
pub enum SubGeography {
    /// The incorporated city in the county's northwest.
    #[serde(rename = "Cumming")]
    #[strum(serialize = "Cumming")]
    Cumming,
    /// Unincorporated area north of the city.
    #[serde(rename = "North Forsyth")]
    #[strum(serialize = "North Forsyth")]
    NorthForsyth,
    /// Unincorporated area west of GA-400.
    #[serde(rename = "West Forsyth")]
    #[strum(serialize = "West Forsyth")]
    WestForsyth,
    /// Unincorporated area toward the Fulton County line.
    #[serde(rename = "South Forsyth")]
    #[strum(serialize = "South Forsyth")]
    SouthForsyth,
}

impl SubGeography {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Cumming,
            Self::NorthForsyth,
            Self::WestForsyth,
            Self::SouthForsyth,
        ]
    }
}

/// Construction vintage bucket.
///
/// Each bucket maps to an explicit inclusive year-built range; a bucket
/// *range* (lower, upper) filters year-built to
/// `[lower.min_year(), upper.max_year()]`.
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
pub enum VintageBucket {
    /// Homes built before 2000.
    #[serde(rename = "<2000")]
    #[strum(serialize = "<2000")]
    Before2000,
    /// Homes built 2000 through 2010.
    #[serde(rename = "2000-2010")]
    #[strum(serialize = "2000-2010")]
    From2000To2010,
    /// Homes built 2011 or later.
    #[serde(rename = "2011-2023")]
    #[strum(serialize = "2011-2023")]
    From2011To2023,
}

impl VintageBucket {
    /// Inclusive lower bound of this bucket's year-built range.
    ///
    /// Recorded construction years are always positive, so a zero lower
    /// bound behaves as open-ended.
    #[must_use]
    pub const fn min_year(self) -> i32 {
        match self {
            Self::Before2000 => 0,
            Self::From2000To2010 => 2000,
            Self::From2011To2023 => 2011,
        }
    }

    /// Inclusive upper bound of this bucket's year-built range.
    ///
    /// The newest bucket's bound sits past its label so in-progress
    /// construction years stay in range.
    #[must_use]
    pub const fn max_year(self) -> i32 {
        match self {
            Self::Before2000 => 1999,
            Self::From2000To2010 => 2010,
            Self::From2011To2023 => 2050,
        }
    }

    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Before2000, Self::From2000To2010, Self::From2011To2023]
    }
}

/// Square-footage bucket, ordered smallest to largest.
///
/// The first and last variants are open-ended sentinels: a range starting
/// at [`Self::Under1000`] has no lower bound, a range ending at
/// [`Self::Over5000`] has no upper bound, and the pair together means no
/// square-footage filter at all.
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
pub enum SquareFootageBucket {
    /// Open-ended minimum sentinel.
    #[serde(rename = "<1000")]
    #[strum(serialize = "<1000")]
    Under1000,
    /// 1,000 square feet.
    #[serde(rename = "1000")]
    #[strum(serialize = "1000")]
    Sf1000,
    /// 2,500 square feet.
    #[serde(rename = "2500")]
    #[strum(serialize = "2500")]
    Sf2500,
    /// 5,000 square feet.
    #[serde(rename = "5000")]
    #[strum(serialize = "5000")]
    Sf5000,
    /// Open-ended maximum sentinel.
    #[serde(rename = ">5000")]
    #[strum(serialize = ">5000")]
    Over5000,
}

impl SquareFootageBucket {
    /// The numeric square footage for this bucket, or `None` for the
    /// open-ended sentinels.
    #[must_use]
    pub const fn threshold(self) -> Option<f64> {
        match self {
            Self::Under1000 | Self::Over5000 => None,
            Self::Sf1000 => Some(1000.0),
            Self::Sf2500 => Some(2500.0),
            Self::Sf5000 => Some(5000.0),
        }
    }

    /// `true` for the open-ended minimum sentinel.
    #[must_use]
    pub const fn is_min_sentinel(self) -> bool {
        matches!(self, Self::Under1000)
    }

    /// `true` for the open-ended maximum sentinel.
    #[must_use]
    pub const fn is_max_sentinel(self) -> bool {
        matches!(self, Self::Over5000)
    }

    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Under1000,
            Self::Sf1000,
            Self::Sf2500,
            Self::Sf5000,
            Self::Over5000,
        ]
    }
}

/// One qualified real-estate transaction.
///
/// Records are loaded once per process from the county extract and never
/// mutated; every filter step produces a new derived view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleRecord {
    /// Deduplication key derived upstream from address + sale date + price.
    pub sale_id: String,
    /// Census tract GEOID. Always present and string-typed so the join to
    /// boundary polygons never trips over numeric coercion.
    pub geoid: String,
    /// Which of the county's named regions the parcel falls in.
    pub sub_geography: SubGeography,
    /// Finished square footage (positive).
    pub square_feet: f64,
    /// Year the home was built.
    pub year_built: i32,
    /// Calendar year of the sale.
    pub sale_year: i32,
    /// Calendar month of the sale (1-12).
    pub sale_month: u32,
    /// Sale price divided by square footage.
    pub price_per_sf: f64,
    /// Total sale price in dollars.
    pub sale_price: f64,
}

impl SaleRecord {
    /// Composite year-month label, month not zero-padded (e.g. `"2021-3"`),
    /// matching the source data's `year-month` column.
    #[must_use]
    pub fn period_label(&self) -> String {
        format!("{}-{}", self.sale_year, self.sale_month)
    }
}
