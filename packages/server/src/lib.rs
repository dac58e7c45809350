#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for the housing map application.
//!
//! Loads the sales extract and tract boundaries into memory once at
//! startup, then serves the filter → aggregate → join → series pipeline
//! over a REST API. The `data/` directory is served statically so the
//! frontend can fetch the raw files if it wants them.

mod handlers;

use std::sync::Arc;

use actix_cors::Cors;
use actix_files::Files;
use actix_web::{App, HttpServer, middleware, web};
use housing_map_dataset::{DEFAULT_SALES_CSV, SalesDataset, load_sales_csv};
use housing_map_geography::{DEFAULT_TRACTS_GEOJSON, load_tract_boundaries};
use housing_map_geography_models::TractBoundaries;
use housing_map_profile::{DEFAULT_PROFILE_ID, DashboardProfile, find_profile};

/// Shared application state.
///
/// Both datasets are immutable after startup; every request derives its
/// views from them through explicit filter criteria.
pub struct AppState {
    /// The cleaned sales table.
    pub dataset: Arc<SalesDataset>,
    /// Census tract boundary polygons.
    pub boundaries: Arc<TractBoundaries>,
    /// The active dashboard profile.
    pub profile: DashboardProfile,
}

/// Starts the housing map API server.
///
/// Loads the sales CSV (`SALES_CSV`), the tract boundaries
/// (`TRACTS_GEOJSON`), and the active profile (`PROFILE`), then starts
/// the Actix-Web HTTP server on `BIND_ADDR:PORT`. This is a regular
/// async function — the caller is responsible for providing the async
/// runtime (e.g. via `#[actix_web::main]`).
///
/// # Errors
///
/// Returns an `std::io::Result` error if the HTTP server fails to bind or
/// encounters a runtime error.
///
/// # Panics
///
/// Panics if the sales extract or boundary file cannot be loaded, or if
/// the requested profile does not exist.
#[allow(clippy::future_not_send)]
pub async fn run_server() -> std::io::Result<()> {
    pretty_env_logger::init_custom_env("RUST_LOG");

    let csv_path = std::env::var("SALES_CSV").unwrap_or_else(|_| DEFAULT_SALES_CSV.to_string());
    let geojson_path =
        std::env::var("TRACTS_GEOJSON").unwrap_or_else(|_| DEFAULT_TRACTS_GEOJSON.to_string());
    let profile_id = std::env::var("PROFILE").unwrap_or_else(|_| DEFAULT_PROFILE_ID.to_string());

    log::info!("Loading sales extract from {csv_path}...");
    let dataset = load_sales_csv(&csv_path).expect("Failed to load sales extract");

    log::info!("Loading tract boundaries from {geojson_path}...");
    let boundaries = load_tract_boundaries(&geojson_path).expect("Failed to load tract boundaries");

    let profile = find_profile(&profile_id).expect("Unknown dashboard profile");
    log::info!("Serving profile {} ({})", profile.id, profile.name);

    let state = web::Data::new(AppState {
        dataset: Arc::new(dataset),
        boundaries: Arc::new(boundaries),
        profile,
    });

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);

    log::info!("Starting server on {bind_addr}:{port}");

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .service(
                web::scope("/api")
                    .route("/health", web::get().to(handlers::health))
                    .route("/meta", web::get().to(handlers::meta))
                    .route("/summary", web::get().to(handlers::summary))
                    .route("/map", web::get().to(handlers::map))
                    .route("/trend", web::get().to(handlers::trend)),
            )
            // Serve the raw extract files
            .service(Files::new("/data", "data").show_files_listing())
    })
    .bind((bind_addr, port))?
    .run()
    .await
}
