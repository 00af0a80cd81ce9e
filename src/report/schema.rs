//! Output JSON schema definitions for skew reports.
//!
//! This module defines the structure of JSON files we write to disk.
//! Schema is versioned to allow future evolution.

use crate::aggregator::{AccessDistribution, ByteVolume, KeyCount, RankOrder};
use crate::estimator::{BetaParameters, FitError, MleFit};
use crate::parser::OperationKind;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Top-level report structure written to JSON
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkewReport {
    /// Schema version for compatibility checking
    pub version: String,

    /// Trace the report was computed from
    pub trace: String,

    /// Key ordering used for normalization
    pub rank_order: RankOrder,

    /// Whole-trace counters
    pub summary: TraceSummary,

    /// One entry per modeled operation class
    pub operations: Vec<OperationSkew>,

    /// Timestamp when report was generated
    pub generated_at: String,
}

impl SkewReport {
    /// Entry for one operation class, if it was modeled
    pub fn operation(&self, kind: OperationKind) -> Option<&OperationSkew> {
        self.operations.iter().find(|op| op.kind == kind)
    }
}

/// Counters over the whole trace
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceSummary {
    /// Non-blank lines processed
    pub records: u64,

    /// Distinct inserted keys
    pub distinct_keys: usize,

    /// Inserts of keys that already existed
    pub duplicate_inserts: u64,

    /// Point queries for keys never inserted
    pub empty_point_queries: u64,

    /// Lines per operation kind
    pub op_counts: BTreeMap<OperationKind, u64>,

    /// Logical bytes written and read
    pub bytes: ByteVolume,
}

/// Skew estimate of one operation class
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationSkew {
    pub kind: OperationKind,

    /// Length of the rank sample (matched operations)
    pub sample_size: u64,

    /// Method-of-moments estimate
    pub beta_mom: EstimateOutcome,

    /// Maximum-likelihood estimate
    pub beta_mle: EstimateOutcome,

    /// Hottest keys, descending by count
    pub top_k_keys: Vec<KeyCount>,

    /// Access concentration statistics
    pub distribution: AccessDistribution,
}

/// Why an estimate is absent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnavailableReason {
    EmptySample,
    DegenerateSample,
    InvalidMomentFit,
}

/// One estimator's outcome, explicitly tagged
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum EstimateOutcome {
    /// Clean fit
    Fitted {
        alpha: f64,
        beta: f64,
        mean: f64,
        variance: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        mean_log_likelihood: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        iterations: Option<usize>,
    },

    /// Best effort of an optimizer that hit its bounds
    NotConverged {
        alpha: f64,
        beta: f64,
        mean_log_likelihood: f64,
        iterations: usize,
    },

    /// No estimate
    Unavailable {
        reason: UnavailableReason,
        detail: String,
    },
}

impl EstimateOutcome {
    /// Parameters of a fitted or best-effort estimate
    pub fn params(&self) -> Option<BetaParameters> {
        match *self {
            Self::Fitted { alpha, beta, .. } | Self::NotConverged { alpha, beta, .. } => {
                Some(BetaParameters { alpha, beta })
            }
            Self::Unavailable { .. } => None,
        }
    }

    pub fn is_fitted(&self) -> bool {
        matches!(self, Self::Fitted { .. })
    }

    /// Short status label for terminal output
    pub fn status(&self) -> &'static str {
        match self {
            Self::Fitted { .. } => "fitted",
            Self::NotConverged { .. } => "not converged",
            Self::Unavailable { .. } => "unavailable",
        }
    }

    /// Outcome of a failed fit; a non-converged fit keeps its best parameters
    fn from_error(err: &FitError) -> Self {
        let reason = match err {
            FitError::FitDidNotConverge { best } => {
                return Self::NotConverged {
                    alpha: best.params.alpha,
                    beta: best.params.beta,
                    mean_log_likelihood: best.mean_log_likelihood,
                    iterations: best.iterations,
                }
            }
            FitError::EmptySample => UnavailableReason::EmptySample,
            FitError::DegenerateSample => UnavailableReason::DegenerateSample,
            FitError::InvalidMomentFit { .. } => UnavailableReason::InvalidMomentFit,
        };
        Self::Unavailable {
            reason,
            detail: err.to_string(),
        }
    }
}

impl From<&Result<BetaParameters, FitError>> for EstimateOutcome {
    fn from(result: &Result<BetaParameters, FitError>) -> Self {
        match result {
            Ok(params) => Self::Fitted {
                alpha: params.alpha,
                beta: params.beta,
                mean: params.mean(),
                variance: params.variance(),
                mean_log_likelihood: None,
                iterations: None,
            },
            Err(err) => Self::from_error(err),
        }
    }
}

impl From<&Result<MleFit, FitError>> for EstimateOutcome {
    fn from(result: &Result<MleFit, FitError>) -> Self {
        match result {
            Ok(fit) => Self::Fitted {
                alpha: fit.params.alpha,
                beta: fit.params.beta,
                mean: fit.params.mean(),
                variance: fit.params.variance(),
                mean_log_likelihood: Some(fit.mean_log_likelihood),
                iterations: Some(fit.iterations),
            },
            Err(err) => Self::from_error(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stalled_fit() -> FitError {
        FitError::FitDidNotConverge {
            best: MleFit::new(
                BetaParameters {
                    alpha: 0.05,
                    beta: 1.2e7,
                },
                30.0,
                28,
            ),
        }
    }

    #[test]
    fn test_non_convergence_is_never_unavailable() {
        let mle: Result<MleFit, FitError> = Err(stalled_fit());
        let mom: Result<BetaParameters, FitError> = Err(stalled_fit());

        for outcome in [EstimateOutcome::from(&mle), EstimateOutcome::from(&mom)] {
            assert_eq!(outcome.status(), "not converged");
            match outcome {
                EstimateOutcome::NotConverged {
                    alpha, iterations, ..
                } => {
                    assert_eq!(alpha, 0.05);
                    assert_eq!(iterations, 28);
                }
                other => panic!("expected NotConverged, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_each_error_keeps_its_reason() {
        let cases = [
            (FitError::EmptySample, UnavailableReason::EmptySample),
            (FitError::DegenerateSample, UnavailableReason::DegenerateSample),
            (
                FitError::InvalidMomentFit { k: -0.5 },
                UnavailableReason::InvalidMomentFit,
            ),
        ];

        for (err, expected) in cases {
            let outcome = EstimateOutcome::from(&Err::<BetaParameters, _>(err));
            assert!(matches!(
                outcome,
                EstimateOutcome::Unavailable { reason, .. } if reason == expected
            ));
        }
    }
}
