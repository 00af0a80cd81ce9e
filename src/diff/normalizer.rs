//! Delta calculation between two skew reports.
//!
//! Handles the math for computing differences between reports,
//! including edge cases like division by zero and classes missing
//! on one side.

use crate::aggregator::AccessDistribution;
use crate::report::{EstimateOutcome, OperationSkew, SkewReport};

use super::schema::{CountDelta, EstimateDelta, OperationDelta, ValueDelta};
use super::CompareError;

/// Calculate the delta between two counters
///
/// # Arguments
/// * `baseline` - Baseline count
/// * `target` - Target count
///
/// # Returns
/// CountDelta with absolute and percentage changes
pub fn calculate_count_delta(baseline: u64, target: u64) -> CountDelta {
    let absolute_change = (target as i64) - (baseline as i64);
    let percent_change = safe_percentage(absolute_change, baseline);

    CountDelta {
        baseline,
        target,
        absolute_change,
        percent_change,
    }
}

pub fn value_delta(baseline: f64, target: f64) -> ValueDelta {
    ValueDelta {
        baseline,
        target,
        change: target - baseline,
    }
}

/// Compare one estimator's outcome on both sides
///
/// Parameter deltas are only filled in when both outcomes carry parameters.
pub fn compare_estimates(baseline: &EstimateOutcome, target: &EstimateOutcome) -> EstimateDelta {
    let mut delta = EstimateDelta {
        baseline_status: baseline.status().to_string(),
        target_status: target.status().to_string(),
        ..EstimateDelta::default()
    };

    if let (Some(b), Some(t)) = (baseline.params(), target.params()) {
        delta.alpha = Some(value_delta(b.alpha, t.alpha));
        delta.beta = Some(value_delta(b.beta, t.beta));
        delta.mean = Some(value_delta(b.mean(), t.mean()));
    }

    delta
}

/// Compare one operation class; either side may be missing
pub fn compare_operation(
    baseline: Option<&OperationSkew>,
    target: Option<&OperationSkew>,
) -> Option<OperationDelta> {
    let kind = baseline.or(target)?.kind;
    let missing = EstimateOutcome::Unavailable {
        reason: crate::report::UnavailableReason::EmptySample,
        detail: "operation class not modeled".to_string(),
    };
    let empty = AccessDistribution::default();

    let sample_size = calculate_count_delta(
        baseline.map_or(0, |op| op.sample_size),
        target.map_or(0, |op| op.sample_size),
    );
    let mom = compare_estimates(
        baseline.map_or(&missing, |op| &op.beta_mom),
        target.map_or(&missing, |op| &op.beta_mom),
    );
    let mle = compare_estimates(
        baseline.map_or(&missing, |op| &op.beta_mle),
        target.map_or(&missing, |op| &op.beta_mle),
    );
    let hot_share = value_delta(
        baseline.map_or(&empty, |op| &op.distribution).top_10_percent_percentage,
        target.map_or(&empty, |op| &op.distribution).top_10_percent_percentage,
    );

    Some(OperationDelta {
        kind,
        sample_size,
        mom,
        mle,
        hot_share,
    })
}

/// Calculate percentage change safely (handles division by zero)
///
/// # Returns
/// Percentage change, or 0.0 if baseline is zero
pub fn safe_percentage(change: i64, baseline: u64) -> f64 {
    if baseline == 0 {
        0.0
    } else {
        (change as f64 / baseline as f64) * 100.0
    }
}

/// Check if two reports are compatible for comparison
pub fn check_compatibility(baseline: &SkewReport, target: &SkewReport) -> Result<(), CompareError> {
    if baseline.version != target.version {
        return Err(CompareError::IncompatibleVersions(
            baseline.version.clone(),
            target.version.clone(),
        ));
    }

    Ok(())
}

/// Check if two reports describe the same analysis
///
/// Generation timestamps are ignored.
pub fn are_reports_identical(baseline: &SkewReport, target: &SkewReport) -> bool {
    baseline.trace == target.trace
        && baseline.rank_order == target.rank_order
        && baseline.summary == target.summary
        && baseline.operations == target.operations
}
