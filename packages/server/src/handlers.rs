//! HTTP handler functions for the housing map API.

use actix_web::{HttpResponse, web};
use housing_map_pipeline::{
    aggregate_by_tract, chart_title, filter, fmt, join_geometry, monthly_series, trend_markers,
};
use housing_map_pipeline_models::SalesSummary;
use housing_map_profile::DashboardProfile;
use housing_map_sales_models::{
    COVERAGE_END, DEFAULT_YEAR_RANGE, SquareFootageBucket, SubGeography, TRANSACTION_YEARS,
    VintageBucket, extract_date,
};
use housing_map_server_models::{
    ApiCoverage, ApiDelta, ApiHealth, ApiMapStyle, ApiProfile, CriteriaParams, ELEVATION_PER_SALE,
    FILL_OPACITY, LINE_COLOR, MapQueryParams, MapResponse, MapStyle, MapTract, MapView,
    MetaResponse, SummaryResponse, TOOLTIP_HTML, TrendResponse,
};

use crate::AppState;

/// `GET /api/health`
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `GET /api/meta`
///
/// Returns the fixed option lists the UI renders its controls from.
pub async fn meta(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(MetaResponse {
        years: TRANSACTION_YEARS.to_vec(),
        default_year_range: DEFAULT_YEAR_RANGE,
        vintage_buckets: VintageBucket::all()
            .iter()
            .map(ToString::to_string)
            .collect(),
        square_footage_buckets: SquareFootageBucket::all()
            .iter()
            .map(ToString::to_string)
            .collect(),
        sub_geographies: SubGeography::all().iter().map(ToString::to_string).collect(),
        map_styles: MapStyle::all()
            .iter()
            .copied()
            .map(ApiMapStyle::from)
            .collect(),
        coverage_end: ApiCoverage {
            year: COVERAGE_END.0,
            month: COVERAGE_END.1,
        },
        extract_date: extract_date(),
        profile: ApiProfile::from(&state.profile),
    })
}

/// `GET /api/summary`
///
/// Runs the filter pipeline and returns the KPI scalars with display
/// strings, gated by the active profile.
pub async fn summary(
    state: web::Data<AppState>,
    params: web::Query<CriteriaParams>,
) -> HttpResponse {
    let criteria = match params.criteria() {
        Ok(criteria) => criteria,
        Err(e) => return bad_request(&e.to_string()),
    };

    match filter(&state.dataset.records, &criteria) {
        Ok(filtered) => {
            HttpResponse::Ok().json(summary_response(&filtered.summary, &state.profile))
        }
        Err(e) => bad_request(&e.to_string()),
    }
}

/// `GET /api/map`
///
/// Runs the filter → aggregate → join pipeline and returns the
/// render-ready choropleth with view-state constants for the requested
/// view mode.
pub async fn map(state: web::Data<AppState>, params: web::Query<MapQueryParams>) -> HttpResponse {
    let view = params.view.unwrap_or(MapView::Flat);
    if view == MapView::Extruded && !state.profile.extruded_view {
        return bad_request("The active profile does not offer the extruded view");
    }
    let style = params.style.unwrap_or(MapStyle::Streets);

    let criteria = match CriteriaParams::from(&*params).criteria() {
        Ok(criteria) => criteria,
        Err(e) => return bad_request(&e.to_string()),
    };

    let filtered = match filter(&state.dataset.records, &criteria) {
        Ok(filtered) => filtered,
        Err(e) => return bad_request(&e.to_string()),
    };

    let aggregates = aggregate_by_tract(&filtered.selected);
    let (rows, join) = join_geometry(&aggregates, &state.boundaries);

    let tracts: Vec<MapTract> = rows
        .into_iter()
        .map(|row| {
            let elevation = match view {
                MapView::Extruded => Some(row.sales * ELEVATION_PER_SALE),
                MapView::Flat => None,
            };
            MapTract {
                geoid: row.geoid,
                median_price_sf: row.median_price_sf,
                median_price: row.median_price,
                median_year_built: row.median_year_built,
                total_sales: row.sales,
                price_sf_formatted: row.price_sf_formatted,
                total_sales_formatted: row.total_sales_formatted,
                color_bin: row.color_bin,
                fill_color: row.fill_color,
                elevation,
                geometry: row.geometry,
            }
        })
        .collect();

    HttpResponse::Ok().json(MapResponse {
        view,
        style,
        provider_style: style.provider_style().to_string(),
        view_state: view.view_state(),
        highlight_color: view.highlight_color(),
        fill_opacity: FILL_OPACITY,
        line_color: LINE_COLOR,
        tooltip_html: TOOLTIP_HTML.to_string(),
        tracts,
        join,
    })
}

/// `GET /api/trend`
///
/// Returns the chronological monthly series over the pre-year timeline
/// set, with the selected-range markers and chart title.
pub async fn trend(state: web::Data<AppState>, params: web::Query<CriteriaParams>) -> HttpResponse {
    let criteria = match params.criteria() {
        Ok(criteria) => criteria,
        Err(e) => return bad_request(&e.to_string()),
    };

    match filter(&state.dataset.records, &criteria) {
        Ok(filtered) => {
            let points = monthly_series(&filtered.timeline);
            let (range_start, range_end) = trend_markers(criteria.year_range);
            HttpResponse::Ok().json(TrendResponse {
                title: chart_title(&criteria.scope),
                points,
                range_start,
                range_end,
            })
        }
        Err(e) => bad_request(&e.to_string()),
    }
}

fn bad_request(message: &str) -> HttpResponse {
    HttpResponse::BadRequest().json(serde_json::json!({ "error": message }))
}

fn summary_response(summary: &SalesSummary, profile: &DashboardProfile) -> SummaryResponse {
    let delta = if profile.delta_kpi {
        summary.delta.as_ref().map(|d| ApiDelta {
            base_year: d.base_year,
            final_year: d.final_year,
            base_median_price_sf: d.base_median_price_sf,
            final_median_price_sf: d.final_median_price_sf,
            percent_change: d.percent_change,
            percent_change_formatted: fmt::percent(d.percent_change),
        })
    } else {
        None
    };

    SummaryResponse {
        total_sales: summary.total_sales,
        total_sales_formatted: fmt::count(summary.total_sales),
        median_price_sf: summary.median_price_sf,
        median_price_sf_formatted: summary.median_price_sf.map(fmt::usd),
        median_price: summary.median_price,
        median_price_formatted: summary.median_price.map(fmt::usd_grouped),
        median_year_built: summary.median_year_built,
        median_year_built_formatted: summary.median_year_built.map(fmt::year),
        median_square_feet: summary.median_square_feet,
        median_square_feet_formatted: summary.median_square_feet.map(fmt::grouped),
        delta,
        kpi_columns: profile.kpi_columns.clone(),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::sync::Arc;

    use actix_web::{App, test};
    use geo::{MultiPolygon, polygon};
    use housing_map_dataset::SalesDataset;
    use housing_map_geography_models::{TractBoundaries, TractBoundary};
    use housing_map_profile::find_profile;
    use housing_map_sales_models::SaleRecord;

    use super::*;

    fn sale(geoid: &str, sale_year: i32, sale_month: u32, price_per_sf: f64) -> SaleRecord {
        SaleRecord {
            sale_id: format!("{geoid}-{sale_year}-{sale_month}"),
            geoid: geoid.to_string(),
            sub_geography: SubGeography::Cumming,
            square_feet: 2000.0,
            year_built: 2010,
            sale_year,
            sale_month,
            price_per_sf,
            sale_price: price_per_sf * 2000.0,
        }
    }

    fn boundary(geoid: &str) -> TractBoundary {
        TractBoundary {
            geoid: geoid.to_string(),
            geometry: MultiPolygon(vec![polygon![
                (x: -84.2, y: 34.2),
                (x: -84.1, y: 34.2),
                (x: -84.1, y: 34.3),
                (x: -84.2, y: 34.3),
            ]]),
        }
    }

    fn state_with_profile(profile_id: &str) -> web::Data<AppState> {
        let records = vec![
            sale("13117130100", 2021, 3, 150.0),
            sale("13117130100", 2022, 7, 180.0),
            sale("13117130200", 2023, 1, 240.0),
        ];
        web::Data::new(AppState {
            dataset: Arc::new(SalesDataset {
                records,
                skipped: BTreeMap::new(),
            }),
            boundaries: Arc::new(TractBoundaries::new(vec![
                boundary("13117130100"),
                boundary("13117130200"),
            ])),
            profile: find_profile(profile_id).unwrap(),
        })
    }

    macro_rules! test_app {
        ($state:expr) => {
            test::init_service(
                App::new().app_data($state).service(
                    web::scope("/api")
                        .route("/health", web::get().to(health))
                        .route("/meta", web::get().to(meta))
                        .route("/summary", web::get().to(summary))
                        .route("/map", web::get().to(map))
                        .route("/trend", web::get().to(trend)),
                ),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn health_reports_healthy() {
        let app = test_app!(state_with_profile("v2"));
        let req = test::TestRequest::get().uri("/api/health").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["healthy"], true);
    }

    #[actix_web::test]
    async fn meta_lists_the_fixed_options() {
        let app = test_app!(state_with_profile("v2"));
        let req = test::TestRequest::get().uri("/api/meta").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["years"].as_array().unwrap().len(), 6);
        assert_eq!(body["defaultYearRange"][0], 2021);
        assert_eq!(body["vintageBuckets"][0], "<2000");
        assert_eq!(body["squareFootageBuckets"][4], ">5000");
        assert_eq!(body["subGeographies"].as_array().unwrap().len(), 4);
        assert_eq!(body["mapStyles"][2]["providerStyle"], "light");
        assert_eq!(body["coverageEnd"]["month"], 4);
        assert_eq!(body["profile"]["id"], "v2");
    }

    #[actix_web::test]
    async fn summary_formats_the_kpis() {
        let app = test_app!(state_with_profile("v2"));
        let req = test::TestRequest::get()
            .uri("/api/summary?yearStart=2021&yearEnd=2023")
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["totalSales"], 3);
        assert_eq!(body["totalSalesFormatted"], "3");
        assert_eq!(body["medianPriceSfFormatted"], "$180");
        // 2021 median 150 → 2023 median 240 is +60%
        assert_eq!(body["delta"]["percentChangeFormatted"], "60.0%");
    }

    #[actix_web::test]
    async fn summary_respects_a_profile_without_delta() {
        let app = test_app!(state_with_profile("v1"));
        let req = test::TestRequest::get()
            .uri("/api/summary?yearStart=2021&yearEnd=2023")
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        assert!(body["delta"].is_null());
        assert_eq!(body["kpiColumns"].as_array().unwrap().len(), 5);
    }

    #[actix_web::test]
    async fn equal_square_footage_bounds_are_a_bad_request() {
        let app = test_app!(state_with_profile("v2"));
        let req = test::TestRequest::get()
            .uri("/api/summary?sfMin=2500&sfMax=2500")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 400);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert!(
            body["error"]
                .as_str()
                .unwrap()
                .contains("range bounds must differ")
        );
    }

    #[actix_web::test]
    async fn unknown_region_label_is_a_bad_request() {
        let app = test_app!(state_with_profile("v2"));
        let req = test::TestRequest::get()
            .uri("/api/summary?subGeos=East%20Forsyth")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 400);
    }

    #[actix_web::test]
    async fn map_joins_tracts_to_geometry() {
        let app = test_app!(state_with_profile("v2"));
        let req = test::TestRequest::get()
            .uri("/api/map?yearStart=2018&yearEnd=2023")
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["view"], "flat");
        assert_eq!(body["providerStyle"], "road");
        assert_eq!(body["viewState"]["pitch"], 0.0);
        assert_eq!(body["tracts"].as_array().unwrap().len(), 2);
        assert_eq!(body["join"]["joined"], 2);
        assert_eq!(body["join"]["aggregatesWithoutBoundary"], 0);
        assert!(body["tracts"][0]["elevation"].is_null());
    }

    #[actix_web::test]
    async fn extruded_map_carries_elevations() {
        let app = test_app!(state_with_profile("v2"));
        let req = test::TestRequest::get()
            .uri("/api/map?yearStart=2018&yearEnd=2023&view=extruded&style=satellite")
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["viewState"]["pitch"], 45.0);
        assert_eq!(body["providerStyle"], "satellite");
        // Two sales in the first tract, 50 meters per sale
        assert_eq!(body["tracts"][0]["elevation"], 100);
    }

    #[actix_web::test]
    async fn extruded_view_is_rejected_for_flat_profiles() {
        let app = test_app!(state_with_profile("v4"));
        let req = test::TestRequest::get()
            .uri("/api/map?view=extruded")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 400);
    }

    #[actix_web::test]
    async fn trend_spans_all_years_in_order() {
        let app = test_app!(state_with_profile("v2"));
        let req = test::TestRequest::get()
            .uri("/api/trend?yearStart=2022&yearEnd=2023")
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        // The series ignores the year filter; all three months appear.
        let points = body["points"].as_array().unwrap();
        assert_eq!(points.len(), 3);
        assert_eq!(points[0]["period"], "2021-3");
        assert_eq!(body["rangeStart"]["period"], "2022-1");
        assert_eq!(body["rangeEnd"]["period"], "2023-4");
        assert_eq!(body["title"], "Countywide Median Price / SF");
    }
}
