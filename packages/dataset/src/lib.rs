#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! County sales extract loading.
//!
//! Reads the geocoded sales CSV once at startup into an immutable in-memory
//! table. Rows that fail cleaning or the qualified-transaction floors are
//! skipped with a log line rather than aborting the load; an unreadable file
//! or a file yielding zero usable rows is fatal.

mod clean;
pub mod rows;

use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use housing_map_sales_models::SaleRecord;
use thiserror::Error;

pub use crate::rows::{RawSaleRow, SkipReason};

/// Default location of the sales extract, relative to the working directory.
pub const DEFAULT_SALES_CSV: &str = "data/Geocoded_Final_Joined4.csv";

/// Errors that can occur while loading the sales extract.
#[derive(Debug, Error)]
pub enum DatasetError {
    /// The extract file could not be opened or read.
    #[error("Failed to read sales extract: {0}")]
    Io(#[from] std::io::Error),

    /// The CSV reader failed before any rows could be decoded.
    #[error("Failed to parse sales extract: {0}")]
    Csv(#[from] csv::Error),

    /// The extract contained no usable rows.
    #[error("Sales extract at {path} produced no usable rows")]
    Empty {
        /// Path the extract was loaded from.
        path: String,
    },
}

/// The loaded, cleaned sales table plus load accounting.
#[derive(Debug, Clone)]
pub struct SalesDataset {
    /// Every qualified transaction, in file order.
    pub records: Vec<SaleRecord>,
    /// Rows rejected during loading, counted by reason.
    pub skipped: BTreeMap<SkipReason, u64>,
}

impl SalesDataset {
    /// Total rows rejected during loading.
    #[must_use]
    pub fn skipped_total(&self) -> u64 {
        self.skipped.values().sum()
    }
}

/// Loads and cleans the sales extract from `path`.
///
/// # Errors
///
/// Returns [`DatasetError`] if the file cannot be read, the CSV is
/// structurally unreadable, or no row survives cleaning.
pub fn load_sales_csv(path: impl AsRef<Path>) -> Result<SalesDataset, DatasetError> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let dataset = read_sales(file)?;
    if dataset.records.is_empty() {
        return Err(DatasetError::Empty {
            path: path.display().to_string(),
        });
    }
    log::info!(
        "Loaded {} qualified sales from {} ({} rows skipped)",
        dataset.records.len(),
        path.display(),
        dataset.skipped_total()
    );
    Ok(dataset)
}

/// Reads and cleans sales rows from any CSV reader.
///
/// # Errors
///
/// Returns [`DatasetError::Csv`] if the reader fails structurally (row-level
/// decode failures are skipped and counted instead).
pub fn read_sales(reader: impl Read) -> Result<SalesDataset, DatasetError> {
    let mut csv_reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);

    let mut records = Vec::new();
    let mut skipped: BTreeMap<SkipReason, u64> = BTreeMap::new();

    for result in csv_reader.deserialize::<RawSaleRow>() {
        let raw = match result {
            Ok(raw) => raw,
            Err(e) => {
                log::warn!("Skipping malformed row: {e}");
                *skipped.entry(SkipReason::Malformed).or_insert(0) += 1;
                continue;
            }
        };
        match raw.to_record() {
            Ok(record) => records.push(record),
            Err(reason @ (SkipReason::PriceFloor | SkipReason::SizeFloor)) => {
                // Expected exclusions, not data problems
                log::debug!("Excluding non-qualified sale {}: {reason}", raw.unique_id);
                *skipped.entry(reason).or_insert(0) += 1;
            }
            Err(reason) => {
                log::warn!("Skipping row {}: {reason}", raw.unique_id);
                *skipped.entry(reason).or_insert(0) += 1;
            }
        }
    }

    Ok(SalesDataset { records, skipped })
}
