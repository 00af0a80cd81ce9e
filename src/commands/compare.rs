//! Compare command implementation.
//! Orchestrates the comparison of two skew reports.

use super::models::CompareArgs;
use crate::diff::{compare_reports, render_terminal_comparison};
use crate::output::{read_report, write_json};
use anyhow::{Context, Result};
use colored::*;
use log::warn;

/// Execute the compare command
pub fn execute_compare(args: CompareArgs) -> Result<()> {
    // Step 1: Load reports
    let baseline = read_report(&args.baseline).context("Failed to read baseline report")?;
    let target = read_report(&args.target).context("Failed to read target report")?;

    // Step 2: Compare
    let comparison =
        compare_reports(&baseline, &target).context("Failed to compare reports")?;

    if let Some(warning) = &comparison.summary.warning {
        warn!("{}", warning);
    }

    // Step 3: Write output if requested
    if let Some(path) = &args.output {
        write_json(&comparison, path).context("Failed to write comparison JSON")?;
        println!(
            "📊 Comparison written to {}",
            path.display().to_string().cyan()
        );
    }

    // Step 4: Terminal summary
    if args.summary {
        println!("{}", render_terminal_comparison(&comparison));
    }

    Ok(())
}
