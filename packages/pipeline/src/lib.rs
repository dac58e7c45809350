#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! The filter → aggregate → join → series pipeline.
//!
//! Every operation is a pure function over the in-memory sales table:
//! criteria in, derived views out. Nothing here touches I/O, holds state,
//! or can fail on valid input — the only error in the whole pipeline is
//! rejecting self-contradictory criteria up front.

pub mod aggregate;
pub mod color;
pub mod filter;
pub mod fmt;
pub mod join;
pub mod series;
pub mod stats;

use thiserror::Error;

pub use crate::aggregate::aggregate_by_tract;
pub use crate::filter::{filter, validate};
pub use crate::join::join_geometry;
pub use crate::series::{chart_title, monthly_series, trend_markers};

/// Errors that can occur during pipeline operations.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// User-supplied criteria are self-contradictory.
    #[error("Invalid filter criteria: {message}")]
    Validation {
        /// What was wrong with the criteria.
        message: String,
    },
}
