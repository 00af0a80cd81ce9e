//! Workload Skew
//!
//! Estimates how skewed key accesses are in a key-value operation trace.
//! Each access is mapped to its key's normalized rank in `(0, 1)`, and the
//! resulting sample per operation class is summarized by a Beta(α, β)
//! distribution fitted by method of moments and by maximum likelihood.
//!
//! This crate provides the core implementation for the
//! `workload-skew` CLI tool; all modules are public for testing.
//!
//! ```bash
//! workload-skew analyze --trace workload.trace --output skew.json --summary
//! ```

pub mod aggregator;
pub mod commands;
pub mod diff;
pub mod estimator;
pub mod output;
pub mod parser;
pub mod report;
pub mod utils;
