//! Schema definitions for report comparisons.

use crate::parser::OperationKind;
use serde::{Deserialize, Serialize};

/// Complete comparison of a baseline and a target report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkewComparison {
    /// Schema version for the comparison format
    pub comparison_version: String,

    /// Timestamp when the comparison was generated
    pub generated_at: String,

    pub baseline: ReportMetadata,

    pub target: ReportMetadata,

    /// One entry per operation class modeled in either report
    pub operations: Vec<OperationDelta>,

    pub summary: ComparisonSummary,
}

/// Metadata extracted from a report for comparison
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub trace: String,

    pub records: u64,

    pub distinct_keys: usize,

    /// When the report was generated
    pub generated_at: String,
}

/// Changes of one operation class
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationDelta {
    pub kind: OperationKind,

    /// Rank sample sizes (0 when the class is missing on one side)
    pub sample_size: CountDelta,

    /// Method-of-moments estimate changes
    pub mom: EstimateDelta,

    /// Maximum-likelihood estimate changes
    pub mle: EstimateDelta,

    /// Share of accesses on the hottest 10% of keys, in percent
    pub hot_share: ValueDelta,
}

/// Integer counter delta
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CountDelta {
    pub baseline: u64,

    pub target: u64,

    /// Absolute change (can be negative)
    pub absolute_change: i64,

    /// Percentage change (can be negative, 0 for an empty baseline)
    pub percent_change: f64,
}

/// Real-valued delta
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValueDelta {
    pub baseline: f64,

    pub target: f64,

    /// target - baseline
    pub change: f64,
}

/// Changes of one estimator's outcome
///
/// Parameter deltas are present only when both sides carry parameters
/// (fitted or not converged).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EstimateDelta {
    pub baseline_status: String,

    pub target_status: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alpha: Option<ValueDelta>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub beta: Option<ValueDelta>,

    /// Mean of the fitted Beta, alpha / (alpha + beta)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mean: Option<ValueDelta>,
}

/// Summary of comparison results
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ComparisonSummary {
    /// Number of operation classes compared
    pub compared_kinds: usize,

    /// Estimates whose status differs between the two sides
    pub status_changes: usize,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}
