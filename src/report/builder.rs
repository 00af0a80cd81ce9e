//! Assemble skew reports from finished access statistics.

use super::schema::{EstimateOutcome, OperationSkew, SkewReport, TraceSummary};
use crate::aggregator::{
    accumulate_trace, build_rank_sample, calculate_access_distribution, calculate_top_keys,
    AccessStats, FrequencyTable, KeyTable,
};
use crate::estimator::estimate_both;
use crate::parser::{OperationKind, TraceReader};
use crate::utils::config::{SkewConfig, SCHEMA_VERSION};
use crate::utils::error::{AnalyzeError, RankError};
use chrono::Utc;
use log::{debug, info, warn};

/// Operation classes that get a Beta fit under `config`
pub fn modeled_kinds(config: &SkewConfig) -> Vec<OperationKind> {
    let mut kinds = Vec::with_capacity(3);
    if config.include_inserts {
        kinds.push(OperationKind::Insert);
    }
    kinds.push(OperationKind::Update);
    kinds.push(OperationKind::QueryPoint);
    kinds
}

/// Estimate the skew of one operation class
///
/// # Errors
/// * `RankError::EmptyKeyspace` - No key was inserted
pub fn analyze_operation(
    kind: OperationKind,
    table: &FrequencyTable,
    keys: &KeyTable,
    config: &SkewConfig,
) -> Result<OperationSkew, RankError> {
    let sample = build_rank_sample(table, keys, config.rank_order)?;
    let fits = estimate_both(&sample, &config.mle);

    if let Err(e) = &fits.mom {
        warn!("{}: no method-of-moments estimate: {}", kind, e);
    }
    if let Err(e) = &fits.mle {
        warn!("{}: likelihood fit: {}", kind, e);
    }

    let distribution = calculate_access_distribution(table);
    debug!("{}: {}", kind, distribution.summary());

    Ok(OperationSkew {
        kind,
        sample_size: sample.len(),
        beta_mom: EstimateOutcome::from(&fits.mom),
        beta_mle: EstimateOutcome::from(&fits.mle),
        top_k_keys: calculate_top_keys(table, keys, config.top_k),
        distribution,
    })
}

/// Assemble the report for a finished pass
///
/// **Public** - hand-off point to reporting
///
/// # Errors
/// * `RankError::EmptyKeyspace` - No key was inserted
pub fn assemble_report(
    trace: &str,
    stats: &AccessStats,
    config: &SkewConfig,
) -> Result<SkewReport, RankError> {
    let mut operations = Vec::new();
    for kind in modeled_kinds(config) {
        let Some(table) = stats.frequency(kind) else {
            continue;
        };
        info!("Estimating {} skew over {} accesses...", kind, table.total());
        operations.push(analyze_operation(kind, table, &stats.keys, config)?);
    }

    Ok(SkewReport {
        version: SCHEMA_VERSION.to_string(),
        trace: trace.to_string(),
        rank_order: config.rank_order,
        summary: TraceSummary {
            records: stats.records,
            distinct_keys: stats.keys.len(),
            duplicate_inserts: stats.duplicate_inserts,
            empty_point_queries: stats.empty_point_queries,
            op_counts: stats.op_counts.clone(),
            bytes: stats.bytes,
        },
        operations,
        generated_at: Utc::now().to_rfc3339(),
    })
}

/// Run the whole pipeline for one trace file
///
/// **Public** - main entry point: read, accumulate, rank, estimate, assemble
///
/// # Errors
/// Structural trace problems are fatal for the run:
/// * `AnalyzeError::Accumulate` - I/O, malformed line, unknown key reference
/// * `AnalyzeError::Rank` - No key was inserted
pub fn analyze_trace(reader: &TraceReader, config: &SkewConfig) -> Result<SkewReport, AnalyzeError> {
    let stats = accumulate_trace(reader)?;
    let report = assemble_report(&reader.path().display().to_string(), &stats, config)?;
    Ok(report)
}
