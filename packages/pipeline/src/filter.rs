//! The filter operation: criteria validation and subset derivation.
//!
//! Filters apply in a fixed order — vintage, square footage, geography,
//! year — with the year filter last because it forks the output: the
//! pre-year `timeline` set feeds the trend chart while the year-restricted
//! `selected` set feeds everything else.

use housing_map_pipeline_models::{FilterCriteria, FilteredSales, PeriodDelta, SalesSummary};
use housing_map_sales_models::{SaleRecord, SquareFootageBucket};

use crate::{PipelineError, stats};

/// Checks criteria for self-contradictions.
///
/// # Errors
///
/// Returns [`PipelineError::Validation`] when the square-footage bounds
/// are equal — a range with identical endpoints selects nothing sensible
/// and the slider should never submit one.
pub fn validate(criteria: &FilterCriteria) -> Result<(), PipelineError> {
    let (lower, upper) = criteria.square_footage_range;
    if lower == upper {
        return Err(PipelineError::Validation {
            message: "range bounds must differ".to_string(),
        });
    }
    Ok(())
}

/// Applies `criteria` to the full sales table.
///
/// # Errors
///
/// Returns [`PipelineError::Validation`] for self-contradictory criteria;
/// no partial result is produced. Valid criteria cannot fail.
pub fn filter(
    records: &[SaleRecord],
    criteria: &FilterCriteria,
) -> Result<FilteredSales, PipelineError> {
    validate(criteria)?;

    let (vintage_min, vintage_max) = criteria.vintage_bounds();
    let timeline: Vec<SaleRecord> = records
        .iter()
        .filter(|r| r.year_built >= vintage_min && r.year_built <= vintage_max)
        .filter(|r| square_footage_matches(r.square_feet, criteria.square_footage_range))
        .filter(|r| criteria.scope.matches(r.sub_geography))
        .cloned()
        .collect();

    let (first_year, last_year) = criteria.year_range;
    let selected: Vec<SaleRecord> = timeline
        .iter()
        .filter(|r| r.sale_year >= first_year && r.sale_year <= last_year)
        .cloned()
        .collect();

    let (base_year, final_year) = if criteria.single_year() {
        (None, None)
    } else {
        let base: Vec<SaleRecord> = timeline
            .iter()
            .filter(|r| r.sale_year == first_year)
            .cloned()
            .collect();
        let last: Vec<SaleRecord> = timeline
            .iter()
            .filter(|r| r.sale_year == last_year)
            .cloned()
            .collect();
        (Some(base), Some(last))
    };

    let summary = summarize(
        &selected,
        criteria.year_range,
        base_year.as_deref(),
        final_year.as_deref(),
    );

    Ok(FilteredSales {
        timeline,
        selected,
        base_year,
        final_year,
        summary,
    })
}

/// Square-footage range test with the open-ended sentinel cases: a
/// sentinel lower bound drops the minimum, a sentinel upper bound drops
/// the maximum, and both sentinels together mean no filter at all.
fn square_footage_matches(
    square_feet: f64,
    range: (SquareFootageBucket, SquareFootageBucket),
) -> bool {
    match (range.0.threshold(), range.1.threshold()) {
        (None, None) => true,
        (None, Some(max)) => square_feet <= max,
        (Some(min), None) => square_feet >= min,
        (Some(min), Some(max)) => square_feet >= min && square_feet <= max,
    }
}

fn summarize(
    selected: &[SaleRecord],
    year_range: (i32, i32),
    base_year: Option<&[SaleRecord]>,
    final_year: Option<&[SaleRecord]>,
) -> SalesSummary {
    SalesSummary {
        total_sales: selected.len() as u64,
        median_price_sf: stats::median(selected.iter().map(|r| r.price_per_sf)),
        median_price: stats::median(selected.iter().map(|r| r.sale_price)),
        median_year_built: stats::median(selected.iter().map(|r| f64::from(r.year_built))),
        median_square_feet: stats::median(selected.iter().map(|r| r.square_feet)),
        delta: period_delta(year_range, base_year, final_year),
    }
}

/// Period-over-period delta between the boundary-year subsets. `None`
/// whenever it is not computable: single-year selection, an empty subset,
/// or a zero base median.
fn period_delta(
    year_range: (i32, i32),
    base_year: Option<&[SaleRecord]>,
    final_year: Option<&[SaleRecord]>,
) -> Option<PeriodDelta> {
    let base = base_year?;
    let last = final_year?;

    let base_median = stats::median(base.iter().map(|r| r.price_per_sf))?;
    let final_median = stats::median(last.iter().map(|r| r.price_per_sf))?;

    let Some(percent) = stats::percent_change(base_median, final_median) else {
        log::warn!(
            "Period delta undefined: {} median price/SF is zero",
            year_range.0
        );
        return None;
    };

    Some(PeriodDelta {
        base_year: year_range.0,
        final_year: year_range.1,
        base_median_price_sf: base_median,
        final_median_price_sf: final_median,
        percent_change: percent,
    })
}
