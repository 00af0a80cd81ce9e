//! Skew report comparison.
//!
//! This module compares two skew reports (baseline vs target), e.g. the same
//! workload before and after a generator change, and produces per-class
//! deltas of sample sizes, Beta parameters and hot-key concentration.
//!
//! # Example
//! ```ignore
//! use workload_skew::diff::compare_reports;
//! use workload_skew::output::json::read_report;
//!
//! let baseline = read_report("baseline.json")?;
//! let target = read_report("target.json")?;
//! let comparison = compare_reports(&baseline, &target)?;
//! ```

mod engine;
mod normalizer;
mod output;
mod schema;

// Public API exports
pub use engine::compare_reports;
pub use output::render_terminal_comparison;
pub use schema::{
    ComparisonSummary, CountDelta, EstimateDelta, OperationDelta, ReportMetadata, SkewComparison,
    ValueDelta,
};

// Error type
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CompareError {
    #[error("Incompatible schema versions: baseline={0}, target={1}")]
    IncompatibleVersions(String, String),
}
