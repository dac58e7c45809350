//! Per-tract aggregation of the primary filtered set.

use std::collections::BTreeMap;

use housing_map_pipeline_models::TractAggregate;
use housing_map_sales_models::SaleRecord;

use crate::stats;

/// Groups the filtered set by GEOID and computes per-tract medians and
/// counts. Output is ordered by GEOID ascending, so the same input always
/// produces the same output.
#[must_use]
pub fn aggregate_by_tract(selected: &[SaleRecord]) -> Vec<TractAggregate> {
    let mut groups: BTreeMap<&str, Vec<&SaleRecord>> = BTreeMap::new();
    for record in selected {
        groups.entry(record.geoid.as_str()).or_default().push(record);
    }

    groups
        .into_iter()
        .map(|(geoid, records)| TractAggregate {
            geoid: geoid.to_string(),
            median_price_sf: stats::median(records.iter().map(|r| r.price_per_sf))
                .unwrap_or_default(),
            median_price: stats::median(records.iter().map(|r| r.sale_price)).unwrap_or_default(),
            median_year_built: stats::median(records.iter().map(|r| f64::from(r.year_built)))
                .unwrap_or_default(),
            sales: records.len() as u64,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use housing_map_sales_models::SubGeography;

    use super::*;

    fn sale(geoid: &str, price_per_sf: f64, sale_price: f64, year_built: i32) -> SaleRecord {
        SaleRecord {
            sale_id: format!("{geoid}-{sale_price}"),
            geoid: geoid.to_string(),
            sub_geography: SubGeography::WestForsyth,
            square_feet: 2000.0,
            year_built,
            sale_year: 2021,
            sale_month: 6,
            price_per_sf,
            sale_price,
        }
    }

    #[test]
    fn medians_and_counts_per_tract() {
        let records = vec![
            sale("B", 200.0, 600_000.0, 2012),
            sale("A", 150.0, 300_000.0, 2005),
            sale("A", 120.0, 250_000.0, 1995),
            sale("A", 180.0, 400_000.0, 2010),
        ];
        let aggregates = aggregate_by_tract(&records);

        assert_eq!(aggregates.len(), 2);
        assert_eq!(aggregates[0].geoid, "A");
        assert!((aggregates[0].median_price_sf - 150.0).abs() < f64::EPSILON);
        assert!((aggregates[0].median_year_built - 2005.0).abs() < f64::EPSILON);
        assert_eq!(aggregates[0].sales, 3);
        assert_eq!(aggregates[1].geoid, "B");
        assert_eq!(aggregates[1].sales, 1);
    }

    #[test]
    fn counts_sum_to_input_size() {
        let records = vec![
            sale("A", 150.0, 300_000.0, 2005),
            sale("B", 200.0, 600_000.0, 2012),
            sale("C", 175.0, 450_000.0, 2018),
            sale("B", 210.0, 700_000.0, 2015),
        ];
        let aggregates = aggregate_by_tract(&records);

        let distinct: BTreeSet<&str> = records.iter().map(|r| r.geoid.as_str()).collect();
        assert!(aggregates.len() <= distinct.len());

        let total: u64 = aggregates.iter().map(|a| a.sales).sum();
        assert_eq!(total, records.len() as u64);
    }

    #[test]
    fn output_order_is_stable() {
        let records = vec![
            sale("C", 175.0, 450_000.0, 2018),
            sale("A", 150.0, 300_000.0, 2005),
            sale("B", 200.0, 600_000.0, 2012),
        ];
        let geoids: Vec<String> = aggregate_by_tract(&records)
            .into_iter()
            .map(|a| a.geoid)
            .collect();
        assert_eq!(geoids, vec!["A", "B", "C"]);
    }

    #[test]
    fn empty_input_yields_no_aggregates() {
        assert!(aggregate_by_tract(&[]).is_empty());
    }
}
