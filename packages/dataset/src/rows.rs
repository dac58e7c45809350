//! Raw row parsing for the geocoded sales extract.
//!
//! [`RawSaleRow`] mirrors the CSV columns as written; [`RawSaleRow::to_record`]
//! applies the cleaning and the qualified-transaction floors to produce a
//! [`SaleRecord`] or a typed rejection reason.

use std::str::FromStr as _;

use housing_map_sales_models::{
    MIN_HOME_SQUARE_FEET, MIN_QUALIFIED_PRICE, SaleRecord, SubGeography,
};
use serde::Deserialize;
use strum_macros::Display;

use crate::clean;

/// A raw record from the geocoded sales CSV, fields exactly as written.
#[derive(Debug, Deserialize)]
pub struct RawSaleRow {
    /// Deduplication key built upstream from address + sale date + price.
    #[serde(rename = "unique_ID", default)]
    pub unique_id: String,
    /// Census tract GEOID.
    #[serde(rename = "GEOID", default)]
    pub geoid: String,
    /// Sub-geography label (e.g. `"North Forsyth"`).
    #[serde(rename = "Sub_geo", default)]
    pub sub_geo: String,
    /// Finished square footage, possibly with thousands separators.
    #[serde(rename = "Square Ft", default)]
    pub square_ft: String,
    /// Year the home was built.
    #[serde(rename = "year_blt", default)]
    pub year_built: String,
    /// Calendar year of the sale.
    #[serde(rename = "year_sale", default)]
    pub year_sale: String,
    /// Price per square foot.
    #[serde(rename = "price_sf", default)]
    pub price_sf: String,
    /// Total sale price, currency-formatted.
    #[serde(rename = "Sale Price", default)]
    pub sale_price: String,
    /// Sale year again, re-derived by the upstream geocoding join.
    #[serde(rename = "year", default)]
    pub year: String,
    /// Sale month (1-12).
    #[serde(rename = "month", default)]
    pub month: String,
    /// Composite label like `"2021-3"` (unused directly; rebuilt on demand).
    #[serde(rename = "year-month", default)]
    pub year_month: String,
}

/// Why a raw row was rejected during loading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Display)]
pub enum SkipReason {
    /// The CSV reader could not decode the row at all.
    #[strum(serialize = "unparseable row")]
    Malformed,
    /// Missing deduplication key or GEOID.
    #[strum(serialize = "missing sale id or GEOID")]
    MissingKey,
    /// `Sub_geo` label is not one of the four known regions.
    #[strum(serialize = "unknown sub-geography")]
    UnknownSubGeography,
    /// A numeric field failed to parse after cleaning.
    #[strum(serialize = "unparseable numeric field")]
    BadNumeric,
    /// Month outside 1-12.
    #[strum(serialize = "month out of range")]
    BadMonth,
    /// The two sale-year columns disagree.
    #[strum(serialize = "sale year columns disagree")]
    YearMismatch,
    /// Below the $1,000 qualified-sale price floor.
    #[strum(serialize = "below the qualified-sale price floor")]
    PriceFloor,
    /// Below the 75 sq ft minimum home size.
    #[strum(serialize = "below the minimum home size")]
    SizeFloor,
}

impl RawSaleRow {
    /// Converts this raw row into a [`SaleRecord`].
    ///
    /// # Errors
    ///
    /// Returns the [`SkipReason`] when the row fails cleaning or the
    /// qualified-transaction floors.
    pub fn to_record(&self) -> Result<SaleRecord, SkipReason> {
        let sale_id = self.unique_id.trim();
        let geoid = self.geoid.trim();
        if sale_id.is_empty() || geoid.is_empty() {
            return Err(SkipReason::MissingKey);
        }

        let sub_geography = SubGeography::from_str(self.sub_geo.trim())
            .map_err(|_| SkipReason::UnknownSubGeography)?;

        let square_feet = clean::parse_numeric(&self.square_ft).ok_or(SkipReason::BadNumeric)?;
        let year_built = clean::parse_int(&self.year_built).ok_or(SkipReason::BadNumeric)?;
        let sale_year = clean::parse_int(&self.year_sale).ok_or(SkipReason::BadNumeric)?;
        let price_per_sf = clean::parse_numeric(&self.price_sf).ok_or(SkipReason::BadNumeric)?;
        let sale_price = clean::parse_numeric(&self.sale_price).ok_or(SkipReason::BadNumeric)?;

        let sale_month = clean::parse_int(&self.month)
            .and_then(|m| u32::try_from(m).ok())
            .ok_or(SkipReason::BadNumeric)?;
        if !(1..=12).contains(&sale_month) {
            return Err(SkipReason::BadMonth);
        }

        // Both year columns derive from the same sale date upstream; a
        // disagreement means the geocoding join mangled the row.
        let year = clean::parse_int(&self.year).ok_or(SkipReason::BadNumeric)?;
        if year != sale_year {
            return Err(SkipReason::YearMismatch);
        }

        if sale_price < MIN_QUALIFIED_PRICE {
            return Err(SkipReason::PriceFloor);
        }
        if square_feet < MIN_HOME_SQUARE_FEET {
            return Err(SkipReason::SizeFloor);
        }

        Ok(SaleRecord {
            sale_id: sale_id.to_string(),
            geoid: geoid.to_string(),
            sub_geography,
            square_feet,
            year_built,
            sale_year,
            sale_month,
            price_per_sf,
            sale_price,
        })
    }
}
