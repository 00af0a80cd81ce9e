//! Core comparison engine.
//! Generates complete comparisons of two skew reports.

use crate::parser::OperationKind;
use crate::report::SkewReport;
use chrono::Utc;
use log::debug;
use std::collections::BTreeSet;

use super::normalizer::{are_reports_identical, check_compatibility, compare_operation};
use super::schema::{ComparisonSummary, ReportMetadata, SkewComparison};
use super::CompareError;

const COMPARISON_VERSION: &str = "1.0.0";

/// Compare two skew reports
///
/// # Arguments
/// * `baseline` - The report to compare against
/// * `target` - The report to compare
///
/// # Returns
/// SkewComparison with one delta per operation class modeled in either report
///
/// # Errors
/// * `CompareError::IncompatibleVersions` - If schema versions don't match
///
/// # Example
/// ```ignore
/// let baseline = read_report("baseline.json")?;
/// let target = read_report("target.json")?;
/// let comparison = compare_reports(&baseline, &target)?;
/// ```
pub fn compare_reports(
    baseline: &SkewReport,
    target: &SkewReport,
) -> Result<SkewComparison, CompareError> {
    check_compatibility(baseline, target)?;

    let kinds: BTreeSet<OperationKind> = baseline
        .operations
        .iter()
        .chain(target.operations.iter())
        .map(|op| op.kind)
        .collect();

    let operations: Vec<_> = kinds
        .into_iter()
        .filter_map(|kind| compare_operation(baseline.operation(kind), target.operation(kind)))
        .collect();

    let status_changes = operations
        .iter()
        .flat_map(|op| [&op.mom, &op.mle])
        .filter(|est| est.baseline_status != est.target_status)
        .count();

    let mut summary = ComparisonSummary {
        compared_kinds: operations.len(),
        status_changes,
        warning: None,
    };

    if are_reports_identical(baseline, target) {
        summary.warning = Some("Baseline and target reports are identical".to_string());
    }

    debug!(
        "Compared {} operation classes ({} status changes)",
        summary.compared_kinds, summary.status_changes
    );

    Ok(SkewComparison {
        comparison_version: COMPARISON_VERSION.to_string(),
        generated_at: Utc::now().to_rfc3339(),
        baseline: metadata(baseline),
        target: metadata(target),
        operations,
        summary,
    })
}

fn metadata(report: &SkewReport) -> ReportMetadata {
    ReportMetadata {
        trace: report.trace.clone(),
        records: report.summary.records,
        distinct_keys: report.summary.distinct_keys,
        generated_at: report.generated_at.clone(),
    }
}
