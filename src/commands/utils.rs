use crate::output::read_report;
use crate::utils::config::SCHEMA_VERSION;
use anyhow::Result;
use std::path::PathBuf;

/// Validate a skew report JSON file
pub fn validate_report_file(file_path: PathBuf) -> Result<()> {
    println!("Validating report: {}", file_path.display());

    let report = read_report(&file_path)?;

    println!("✓ Valid skew report JSON");
    println!("  Version: {}", report.version);
    println!("  Trace: {}", report.trace);
    println!("  Records: {}", report.summary.records);
    println!("  Distinct Keys: {}", report.summary.distinct_keys);
    println!("  Rank Order: {}", report.rank_order);
    for op in &report.operations {
        println!(
            "  {}: {} accesses, MoM {}, MLE {}",
            op.kind,
            op.sample_size,
            op.beta_mom.status(),
            op.beta_mle.status()
        );
    }

    if report.version != SCHEMA_VERSION {
        println!(
            "  ⚠️  Schema version differs from current v{}",
            SCHEMA_VERSION
        );
    }

    Ok(())
}

/// Display schema information
pub fn display_schema(show_details: bool) {
    println!("Workload Skew Report Schema");
    println!("Current Version: {}", SCHEMA_VERSION);
    println!();

    if show_details {
        println!("Schema Structure:");
        println!("  version: string            - Schema version (e.g., '1.0.0')");
        println!("  trace: string              - Trace file the report was computed from");
        println!("  rank_order: string         - 'insertion' or 'popularity'");
        println!("  summary: object            - Whole-trace counters");
        println!("    records: number          - Non-blank lines processed");
        println!("    distinct_keys: number    - Distinct inserted keys");
        println!("    duplicate_inserts: number");
        println!("    empty_point_queries: number");
        println!("    op_counts: object        - Lines per operation kind");
        println!("    bytes: object            - {{ written, read }}");
        println!("  operations: array          - One entry per modeled class");
        println!("    kind: string             - insert, update or query_point");
        println!("    sample_size: number      - Matched operations");
        println!("    beta_mom: object         - Method-of-moments estimate");
        println!("    beta_mle: object         - Maximum-likelihood estimate");
        println!("      status: string         - fitted, not_converged or unavailable");
        println!("      alpha, beta: number    - Shape parameters (fitted, not_converged)");
        println!("      mean, variance: number - Of the fitted Beta (fitted)");
        println!("      reason, detail: string - Why no estimate (unavailable)");
        println!("    top_k_keys: array        - Hottest keys with count and percentage");
        println!("    distribution: object     - Access concentration statistics");
        println!("  generated_at: string       - ISO 8601 timestamp");
    } else {
        println!("Use --show for detailed schema information");
    }
}

/// Display version information
pub fn display_version() {
    println!("Workload Skew v{}", env!("CARGO_PKG_VERSION"));
    println!("Report Schema: v{}", SCHEMA_VERSION);
    println!();
    println!("Estimates key-access skew of key-value operation traces as Beta distributions.");
}
