//! Aggregation of trace records into per-key statistics.
//!
//! This module transforms parsed operation records into:
//! - Key and frequency tables (one streaming pass)
//! - Normalized rank samples for the estimators
//! - Hot keys and access-concentration statistics

pub mod accumulator;
pub mod metrics;
pub mod rank_index;

// Re-export main types and functions
pub use accumulator::{
    accumulate_trace, AccessAccumulator, AccessStats, ByteVolume, FrequencyTable, KeyTable,
};
pub use metrics::{calculate_access_distribution, calculate_top_keys, AccessDistribution, KeyCount};
pub use rank_index::{build_rank_sample, RankOrder, RankSample};
