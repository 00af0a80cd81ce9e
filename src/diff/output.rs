//! Terminal output rendering for report comparisons.
//!
//! Provides human-readable summaries with visual cues (emojis) for the
//! direction of each change.

use super::schema::{EstimateDelta, OperationDelta, SkewComparison};
use colored::*;

/// Render a human-readable summary of a comparison for the terminal
pub fn render_terminal_comparison(comparison: &SkewComparison) -> String {
    let mut out = String::new();

    out.push_str(&render_header(comparison));
    for op in &comparison.operations {
        out.push_str(&render_operation(op));
    }
    out.push_str(&render_status(comparison));

    out
}

fn render_header(comparison: &SkewComparison) -> String {
    let mut out = String::new();
    out.push_str("\n📊 ");
    out.push_str(&"Skew Comparison Summary".bold().to_string());
    out.push_str("\n---------------------------------------------------\n");
    out.push_str(&format!(
        "Baseline: {} ({} records, {} keys)\n",
        comparison.baseline.trace, comparison.baseline.records, comparison.baseline.distinct_keys
    ));
    out.push_str(&format!(
        "Target:   {} ({} records, {} keys)\n",
        comparison.target.trace, comparison.target.records, comparison.target.distinct_keys
    ));
    out.push_str("---------------------------------------------------\n");
    out
}

fn render_operation(op: &OperationDelta) -> String {
    let mut out = String::new();
    out.push_str(&format!("\n{}\n", op.kind.to_string().bold()));

    let size = &op.sample_size;
    out.push_str(&format!(
        "  {} Accesses: {} -> {} ({:+.2}%)\n",
        get_delta_symbol(size.absolute_change as f64),
        size.baseline,
        size.target,
        size.percent_change
    ));

    let share = &op.hot_share;
    out.push_str(&format!(
        "  {} Hot 10% share: {:.1}% -> {:.1}% ({:+.1} pts)\n",
        get_delta_symbol(share.change),
        share.baseline,
        share.target,
        share.change
    ));

    out.push_str(&render_estimate("MoM", &op.mom));
    out.push_str(&render_estimate("MLE", &op.mle));
    out
}

fn render_estimate(label: &str, est: &EstimateDelta) -> String {
    match (&est.alpha, &est.beta, &est.mean) {
        (Some(alpha), Some(beta), Some(mean)) => format!(
            "  {} {}: alpha {:.4} -> {:.4}, beta {:.4} -> {:.4}, mean {:.4} -> {:.4}\n",
            get_delta_symbol(mean.change),
            label,
            alpha.baseline,
            alpha.target,
            beta.baseline,
            beta.target,
            mean.baseline,
            mean.target
        ),
        _ => format!(
            "  {} {}: {} -> {}\n",
            "⚠️ ".yellow(),
            label,
            est.baseline_status,
            est.target_status
        ),
    }
}

fn render_status(comparison: &SkewComparison) -> String {
    let mut out = String::new();
    out.push_str("\n---------------------------------------------------\n");
    let status_msg = match &comparison.summary.warning {
        Some(warning) => format!("⚠️  {}", warning).yellow().bold(),
        None if comparison.summary.status_changes > 0 => format!(
            "⚠️  {} estimate(s) changed status",
            comparison.summary.status_changes
        )
        .yellow()
        .bold(),
        None => format!(
            "✅ Compared {} operation classes",
            comparison.summary.compared_kinds
        )
        .green()
        .bold(),
    };
    out.push_str(&status_msg.to_string());
    out.push('\n');
    out
}

fn get_delta_symbol(change: f64) -> &'static str {
    if change > 0.0 {
        "📈"
    } else if change < 0.0 {
        "📉"
    } else {
        "➡️"
    }
}
