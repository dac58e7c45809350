//! Joining per-tract aggregates to boundary geometry.

use std::collections::BTreeSet;

use housing_map_geography_models::TractBoundaries;
use housing_map_pipeline_models::{JoinReport, TractAggregate, TractMapRow};

use crate::{color, fmt};

/// Inner-joins aggregates to tract boundaries on GEOID and builds the
/// render-ready choropleth rows: display strings, color-bin assignment,
/// and geometry.
///
/// Rows present on only one side are dropped, matching the dashboard's
/// historical behavior, but every drop is counted in the [`JoinReport`]
/// and nonzero drops are logged — unmatched GEOIDs usually mean the
/// boundary file and the sales extract disagree about tract vintage.
#[must_use]
pub fn join_geometry(
    aggregates: &[TractAggregate],
    boundaries: &TractBoundaries,
) -> (Vec<TractMapRow>, JoinReport) {
    let mut report = JoinReport::default();
    let mut matched: Vec<&TractAggregate> = Vec::with_capacity(aggregates.len());
    let mut matched_geoids: BTreeSet<&str> = BTreeSet::new();

    for aggregate in aggregates {
        if boundaries.get(&aggregate.geoid).is_some() {
            matched.push(aggregate);
            matched_geoids.insert(aggregate.geoid.as_str());
        } else {
            report.aggregates_without_boundary += 1;
        }
    }

    report.boundaries_without_aggregate = boundaries
        .iter()
        .filter(|b| !matched_geoids.contains(b.geoid.as_str()))
        .count() as u64;

    // Bin edges come from the joined rows only, like the original which
    // cut the merged frame.
    let min = matched
        .iter()
        .map(|a| a.median_price_sf)
        .fold(f64::INFINITY, f64::min);
    let max = matched
        .iter()
        .map(|a| a.median_price_sf)
        .fold(f64::NEG_INFINITY, f64::max);

    let rows: Vec<TractMapRow> = matched
        .into_iter()
        .map(|aggregate| {
            let bin = color::bin_index(aggregate.median_price_sf, min, max);
            let geometry = boundaries
                .get(&aggregate.geoid)
                .map(|b| geojson::Geometry::new(geojson::Value::from(&b.geometry)));
            TractMapRow {
                geoid: aggregate.geoid.clone(),
                median_price_sf: aggregate.median_price_sf,
                median_price: aggregate.median_price,
                median_year_built: aggregate.median_year_built,
                sales: aggregate.sales,
                price_sf_formatted: fmt::usd(aggregate.median_price_sf),
                total_sales_formatted: fmt::count(aggregate.sales),
                color_bin: bin,
                fill_color: color::fill_color(bin),
                geometry: geometry.unwrap_or_else(|| {
                    geojson::Geometry::new(geojson::Value::MultiPolygon(Vec::new()))
                }),
            }
        })
        .collect();

    report.joined = rows.len() as u64;

    if !report.is_clean() {
        log::warn!(
            "Tract join dropped rows: {} aggregates without a boundary, {} boundaries without sales",
            report.aggregates_without_boundary,
            report.boundaries_without_aggregate
        );
    }

    (rows, report)
}
