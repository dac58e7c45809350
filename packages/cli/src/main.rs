#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI entry point for the housing map pipeline tools.
//!
//! Runs the same filter → aggregate → join pipeline the server exposes,
//! printing the results as plain tables. Useful for spot-checking a new
//! sales extract before deploying it.

use std::time::Instant;

use clap::{Args, Parser, Subcommand};
use housing_map_dataset::{DEFAULT_SALES_CSV, load_sales_csv};
use housing_map_geography::{DEFAULT_TRACTS_GEOJSON, load_tract_boundaries};
use housing_map_pipeline::{
    aggregate_by_tract, chart_title, filter, fmt, join_geometry, monthly_series, trend_markers,
};
use housing_map_pipeline_models::SalesSummary;
use housing_map_profile::{DEFAULT_PROFILE_ID, DashboardProfile, KpiColumn, all_profiles, find_profile};
use housing_map_server_models::CriteriaParams;

#[derive(Parser)]
#[command(name = "housing_map_cli", about = "Housing market pipeline tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Filter flags shared by the pipeline subcommands. Absent flags fall
/// back to the dashboard's initial state.
#[derive(Args)]
struct FilterArgs {
    /// First transaction year (inclusive)
    #[arg(long)]
    year_start: Option<i32>,
    /// Last transaction year (inclusive)
    #[arg(long)]
    year_end: Option<i32>,
    /// Lower vintage bucket label (e.g., "<2000")
    #[arg(long)]
    vintage_min: Option<String>,
    /// Upper vintage bucket label (e.g., "2011-2023")
    #[arg(long)]
    vintage_max: Option<String>,
    /// Lower square-footage bucket label (e.g., "<1000")
    #[arg(long)]
    sf_min: Option<String>,
    /// Upper square-footage bucket label (e.g., ">5000")
    #[arg(long)]
    sf_max: Option<String>,
    /// Comma-separated sub-geography labels (e.g., "Cumming,North Forsyth").
    /// If not specified, the entire county is selected.
    #[arg(long)]
    sub_geos: Option<String>,
}

impl From<FilterArgs> for CriteriaParams {
    fn from(args: FilterArgs) -> Self {
        Self {
            year_start: args.year_start,
            year_end: args.year_end,
            vintage_min: args.vintage_min,
            vintage_max: args.vintage_max,
            sf_min: args.sf_min,
            sf_max: args.sf_max,
            sub_geos: args.sub_geos,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Print the KPI strip for the selected filters
    Summary {
        /// Path to the geocoded sales CSV
        #[arg(long, default_value = DEFAULT_SALES_CSV)]
        csv: String,
        /// Dashboard profile id; controls which KPIs print
        #[arg(long, default_value = DEFAULT_PROFILE_ID)]
        profile: String,
        #[command(flatten)]
        filters: FilterArgs,
    },
    /// Print the per-tract aggregates with their choropleth bins
    Tracts {
        /// Path to the geocoded sales CSV
        #[arg(long, default_value = DEFAULT_SALES_CSV)]
        csv: String,
        /// Path to the tract boundary GeoJSON
        #[arg(long, default_value = DEFAULT_TRACTS_GEOJSON)]
        geojson: String,
        #[command(flatten)]
        filters: FilterArgs,
    },
    /// Print the monthly median price/SF series
    Trend {
        /// Path to the geocoded sales CSV
        #[arg(long, default_value = DEFAULT_SALES_CSV)]
        csv: String,
        #[command(flatten)]
        filters: FilterArgs,
    },
    /// Load both data files and report row quality and join coverage
    Validate {
        /// Path to the geocoded sales CSV
        #[arg(long, default_value = DEFAULT_SALES_CSV)]
        csv: String,
        /// Path to the tract boundary GeoJSON
        #[arg(long, default_value = DEFAULT_TRACTS_GEOJSON)]
        geojson: String,
    },
    /// List the embedded dashboard profiles
    Profiles,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Summary {
            csv,
            profile,
            filters,
        } => {
            let profile = find_profile(&profile)?;
            let criteria = CriteriaParams::from(filters).criteria()?;
            let dataset = load_sales_csv(&csv)?;
            let filtered = filter(&dataset.records, &criteria)?;
            print_summary(&filtered.summary, &profile);
        }
        Commands::Tracts {
            csv,
            geojson,
            filters,
        } => {
            let criteria = CriteriaParams::from(filters).criteria()?;
            let dataset = load_sales_csv(&csv)?;
            let boundaries = load_tract_boundaries(&geojson)?;
            let filtered = filter(&dataset.records, &criteria)?;
            let aggregates = aggregate_by_tract(&filtered.selected);
            let (rows, join) = join_geometry(&aggregates, &boundaries);

            println!(
                "{:<12} {:>6} {:>12} {:>14} {:>8} {:>4}",
                "GEOID", "SALES", "MEDIAN $/SF", "MEDIAN PRICE", "VINTAGE", "BIN"
            );
            println!("{}", "-".repeat(62));
            for row in &rows {
                println!(
                    "{:<12} {:>6} {:>12} {:>14} {:>8} {:>4}",
                    row.geoid,
                    row.sales,
                    fmt::usd(row.median_price_sf),
                    fmt::usd_grouped(row.median_price),
                    fmt::year(row.median_year_built),
                    row.color_bin,
                );
            }
            println!();
            println!(
                "{} tract(s) joined; dropped {} aggregate(s) without a boundary and {} boundary(ies) without sales",
                join.joined, join.aggregates_without_boundary, join.boundaries_without_aggregate
            );
        }
        Commands::Trend { csv, filters } => {
            let criteria = CriteriaParams::from(filters).criteria()?;
            let dataset = load_sales_csv(&csv)?;
            let filtered = filter(&dataset.records, &criteria)?;
            let points = monthly_series(&filtered.timeline);
            let (range_start, range_end) = trend_markers(criteria.year_range);

            println!("{}", chart_title(&criteria.scope));
            println!();
            println!("{:<10} {:>12} {:>8}", "PERIOD", "MEDIAN $/SF", "SALES");
            println!("{}", "-".repeat(32));
            for point in &points {
                println!(
                    "{:<10} {:>12} {:>8}",
                    point.period,
                    fmt::usd(point.median_price_sf),
                    point.sales
                );
            }
            println!();
            println!(
                "Selected range: {} through {}",
                range_start.period, range_end.period
            );
        }
        Commands::Validate { csv, geojson } => {
            let start = Instant::now();
            let dataset = load_sales_csv(&csv)?;
            let boundaries = load_tract_boundaries(&geojson)?;

            println!(
                "Loaded {} qualified sale(s); skipped {} row(s)",
                fmt::count(dataset.records.len() as u64),
                fmt::count(dataset.skipped_total())
            );
            for (reason, count) in &dataset.skipped {
                println!("  {count:>6}  {reason}");
            }
            println!();

            // Join coverage over the whole extract, no filters applied.
            let aggregates = aggregate_by_tract(&dataset.records);
            let (_, join) = join_geometry(&aggregates, &boundaries);
            println!(
                "{} of {} boundary tract(s) have sales; {} aggregate(s) have no boundary",
                join.joined,
                boundaries.len(),
                join.aggregates_without_boundary
            );

            log::info!(
                "Validation complete in {:.1}s",
                start.elapsed().as_secs_f64()
            );
        }
        Commands::Profiles => {
            let profiles = all_profiles();
            println!(
                "{:<6} {:<24} {:<6} {:<5} KPI COLUMNS",
                "ID", "NAME", "DELTA", "3D"
            );
            println!("{}", "-".repeat(70));
            for profile in &profiles {
                let columns = profile
                    .kpi_columns
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", ");
                println!(
                    "{:<6} {:<24} {:<6} {:<5} {columns}",
                    profile.id, profile.name, profile.delta_kpi, profile.extruded_view
                );
            }
        }
    }

    Ok(())
}

fn print_summary(summary: &SalesSummary, profile: &DashboardProfile) {
    println!("Profile {} ({})", profile.id, profile.name);
    println!();
    println!("{:<30} VALUE", "KPI");
    println!("{}", "-".repeat(50));
    for column in &profile.kpi_columns {
        println!("{:<30} {}", column.label(), kpi_value(*column, summary));
    }
}

fn kpi_value(column: KpiColumn, summary: &SalesSummary) -> String {
    match column {
        KpiColumn::TotalSales => fmt::count(summary.total_sales),
        KpiColumn::MedianPriceSf => summary
            .median_price_sf
            .map_or_else(|| "n/a".to_string(), fmt::usd),
        KpiColumn::MedianPrice => summary
            .median_price
            .map_or_else(|| "n/a".to_string(), fmt::usd_grouped),
        KpiColumn::MedianYearBuilt => summary
            .median_year_built
            .map_or_else(|| "n/a".to_string(), fmt::year),
        KpiColumn::MedianSquareFeet => summary
            .median_square_feet
            .map_or_else(|| "n/a".to_string(), fmt::grouped),
        KpiColumn::YoyDelta => summary.delta.as_ref().map_or_else(
            || "n/a".to_string(),
            |d| {
                format!(
                    "{} ({} to {})",
                    fmt::percent(d.percent_change),
                    d.base_year,
                    d.final_year
                )
            },
        ),
    }
}
