//! Skew report assembly and schema.
//!
//! The report is the hand-off point to plotting and workload-spec tooling:
//! per operation class it carries both Beta estimates (explicitly tagged as
//! fitted, not converged or unavailable), hot keys and concentration
//! statistics.

pub mod builder;
pub mod schema;

pub use builder::{analyze_operation, analyze_trace, assemble_report, modeled_kinds};
pub use schema::{EstimateOutcome, OperationSkew, SkewReport, TraceSummary, UnavailableReason};
