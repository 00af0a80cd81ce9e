//! Analyze command implementation.
//!
//! The analyze command:
//! 1. Resolves settings (file, then command-line overrides)
//! 2. Accumulates access frequencies over the trace
//! 3. Fits Beta skew parameters per operation class
//! 4. Writes the JSON report

use super::models::AnalyzeArgs;
use crate::output::{generate_text_summary, write_report};
use crate::parser::TraceReader;
use crate::report::analyze_trace;
use crate::utils::config::{load_config, SkewConfig, MAX_TOP_K};
use anyhow::{Context, Result};
use log::{debug, info};
use std::time::Instant;

/// Execute the analyze command
///
/// **Public** - main entry point called from main.rs
///
/// # Errors
/// * Unreadable or invalid settings file
/// * Trace I/O errors, malformed lines, updates of unknown keys
/// * Traces without a single insert
/// * File write errors
///
/// # Example
/// ```ignore
/// let args = AnalyzeArgs {
///     trace: PathBuf::from("workload.trace"),
///     output: PathBuf::from("skew.json"),
///     ..Default::default()
/// };
///
/// execute_analyze(args)?;
/// ```
pub fn execute_analyze(args: AnalyzeArgs) -> Result<()> {
    let start_time = Instant::now();

    info!("Starting analysis of trace: {}", args.trace.display());

    // Step 1: Resolve settings
    info!("Step 1/3: Resolving settings...");
    let config = resolve_config(&args)?;
    debug!("Settings: {:?}", config);

    // Step 2: Accumulate and estimate
    info!("Step 2/3: Accumulating accesses and fitting skew...");
    let reader = TraceReader::new(&args.trace);
    let report = analyze_trace(&reader, &config)
        .with_context(|| format!("Failed to analyze trace {}", args.trace.display()))?;

    for op in &report.operations {
        debug!(
            "{}: mom={}, mle={}",
            op.kind,
            op.beta_mom.status(),
            op.beta_mle.status()
        );
    }

    // Step 3: Write outputs
    info!("Step 3/3: Writing output files...");
    write_report(&report, &args.output).context("Failed to write report JSON")?;

    info!("✓ Report written to: {}", args.output.display());

    if args.print_summary {
        println!("\n{}", generate_text_summary(&report, config.top_k));
    }

    let elapsed = start_time.elapsed();
    info!("Analysis completed in {:.2}s", elapsed.as_secs_f64());

    Ok(())
}

/// Merge the settings file and command-line overrides
///
/// **Public** - exposed so settings can be checked without running a pass
pub fn resolve_config(args: &AnalyzeArgs) -> Result<SkewConfig> {
    let mut config = match &args.config {
        Some(path) => load_config(path)
            .with_context(|| format!("Failed to load settings from {}", path.display()))?,
        None => SkewConfig::default(),
    };

    if let Some(top_k) = args.top_k {
        config.top_k = top_k;
    }
    if let Some(order) = args.rank_order {
        config.rank_order = order;
    }
    if args.include_inserts {
        config.include_inserts = true;
    }

    config.validate().context("Invalid settings")?;
    Ok(config)
}

/// Validate analyze arguments
///
/// **Public** - can be called before execute_analyze for early validation
///
/// # Returns
/// Ok if arguments are valid, Err with message if not
pub fn validate_args(args: &AnalyzeArgs) -> Result<()> {
    if args.trace.as_os_str().is_empty() {
        anyhow::bail!("Trace path cannot be empty");
    }

    if !args.trace.is_file() {
        anyhow::bail!("Trace file not found: {}", args.trace.display());
    }

    if args.output.as_os_str().is_empty() {
        anyhow::bail!("Output path cannot be empty");
    }

    if let Some(top_k) = args.top_k {
        if top_k == 0 {
            anyhow::bail!("top_k must be greater than 0");
        }
        if top_k > MAX_TOP_K {
            anyhow::bail!("top_k is too large (max {})", MAX_TOP_K);
        }
    }

    if let Some(config) = &args.config {
        if !config.is_file() {
            anyhow::bail!("Settings file not found: {}", config.display());
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::RankOrder;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn trace_file() -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "I k0 a").unwrap();
        writeln!(file, "P k0").unwrap();
        file
    }

    #[test]
    fn test_validate_args_valid() {
        let trace = trace_file();
        let args = AnalyzeArgs {
            trace: trace.path().to_path_buf(),
            ..Default::default()
        };

        assert!(validate_args(&args).is_ok());
    }

    #[test]
    fn test_validate_args_empty_trace() {
        let args = AnalyzeArgs::default();
        assert!(validate_args(&args).is_err());
    }

    #[test]
    fn test_validate_args_missing_trace() {
        let args = AnalyzeArgs {
            trace: "/definitely/not/here.trace".into(),
            ..Default::default()
        };
        assert!(validate_args(&args).is_err());
    }

    #[test]
    fn test_validate_args_top_k_zero() {
        let trace = trace_file();
        let args = AnalyzeArgs {
            trace: trace.path().to_path_buf(),
            top_k: Some(0),
            ..Default::default()
        };
        assert!(validate_args(&args).is_err());
    }

    #[test]
    fn test_validate_args_top_k_too_large() {
        let trace = trace_file();
        let args = AnalyzeArgs {
            trace: trace.path().to_path_buf(),
            top_k: Some(MAX_TOP_K + 1),
            ..Default::default()
        };
        assert!(validate_args(&args).is_err());
    }

    #[test]
    fn test_resolve_config_overrides_file() {
        let mut settings = NamedTempFile::new().unwrap();
        writeln!(settings, "top_k = 3").unwrap();
        writeln!(settings, "rank_order = \"insertion\"").unwrap();

        let args = AnalyzeArgs {
            config: Some(settings.path().to_path_buf()),
            rank_order: Some(RankOrder::Popularity),
            include_inserts: true,
            ..Default::default()
        };

        let config = resolve_config(&args).unwrap();
        assert_eq!(config.top_k, 3);
        assert_eq!(config.rank_order, RankOrder::Popularity);
        assert!(config.include_inserts);
    }
}
