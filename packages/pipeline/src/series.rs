//! Monthly trend series, range markers, and the chart title.

use std::collections::BTreeMap;

use housing_map_pipeline_models::{GeographyScope, MonthlyPoint, PeriodMarker};
use housing_map_sales_models::{COVERAGE_END, SaleRecord};

use crate::stats;

/// Groups sales by calendar month and computes the median price per
/// square foot for each. Output is chronological: the `(year, month)`
/// grouping key keeps December sorted before the following January,
/// which string period labels would not.
#[must_use]
pub fn monthly_series(records: &[SaleRecord]) -> Vec<MonthlyPoint> {
    let mut by_month: BTreeMap<(i32, u32), Vec<f64>> = BTreeMap::new();
    for record in records {
        by_month
            .entry((record.sale_year, record.sale_month))
            .or_default()
            .push(record.price_per_sf);
    }

    by_month
        .into_iter()
        .map(|((year, month), prices)| MonthlyPoint {
            year,
            month,
            period: format!("{year}-{month}"),
            median_price_sf: stats::median(prices.iter().copied()).unwrap_or_default(),
            sales: prices.len() as u64,
        })
        .collect()
}

/// Vertical markers bracketing the selected year range on the trend
/// chart: January of the first year and December of the last, except
/// the final covered year, which the data only reaches part-way into.
#[must_use]
pub fn trend_markers(year_range: (i32, i32)) -> (PeriodMarker, PeriodMarker) {
    let (first_year, last_year) = year_range;
    let end_month = if last_year == COVERAGE_END.0 {
        COVERAGE_END.1
    } else {
        12
    };

    (
        PeriodMarker {
            year: first_year,
            month: 1,
            period: format!("{first_year}-1"),
        },
        PeriodMarker {
            year: last_year,
            month: end_month,
            period: format!("{last_year}-{end_month}"),
        },
    )
}

/// Trend chart title for the selected geography: the region names for one
/// or two selections, generic wording beyond that.
#[must_use]
pub fn chart_title(scope: &GeographyScope) -> String {
    match scope {
        GeographyScope::EntireCounty => "Countywide Median Price / SF".to_string(),
        GeographyScope::SubGeographies(regions) => {
            let mut names = regions.iter();
            match (names.next(), names.next(), names.next()) {
                (Some(only), None, _) => format!("{only} Median Price / SF"),
                (Some(first), Some(second), None) => {
                    format!("{first} & {second} Median Price / SF")
                }
                _ => "Median Price / SF For Selected Regions".to_string(),
            }
        }
    }
}
