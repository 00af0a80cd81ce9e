//! Plain-text summaries of skew reports for the terminal.

use crate::report::{EstimateOutcome, OperationSkew, SkewReport};

const RULE_WIDTH: usize = 78;

/// Format a byte count with binary units (B, KB, MB, ...)
pub fn format_bytes(n_bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

    let mut size = n_bytes as f64;
    for unit in UNITS {
        if size < 1024.0 {
            return format!("{:.2} {}", size, unit);
        }
        size /= 1024.0;
    }
    format!("{:.2} PB", size)
}

/// Render a report as a terminal summary
///
/// **Public** - used by the analyze command with `--summary`
pub fn generate_text_summary(report: &SkewReport, max_keys: usize) -> String {
    let mut lines = Vec::new();
    let rule = "=".repeat(RULE_WIDTH);

    lines.push(rule.clone());
    lines.push("  WORKLOAD SKEW SUMMARY".to_string());
    lines.push(rule.clone());
    lines.push(format!("  Trace:          {}", report.trace));
    lines.push(format!("  Records:        {}", report.summary.records));
    lines.push(format!("  Distinct keys:  {}", report.summary.distinct_keys));
    lines.push(format!(
        "  Dup. inserts:   {}",
        report.summary.duplicate_inserts
    ));
    lines.push(format!(
        "  Empty queries:  {}",
        report.summary.empty_point_queries
    ));
    lines.push(format!(
        "  Bytes written:  {} ({} B)",
        format_bytes(report.summary.bytes.written),
        report.summary.bytes.written
    ));
    lines.push(format!(
        "  Bytes read:     {} ({} B)",
        format_bytes(report.summary.bytes.read),
        report.summary.bytes.read
    ));
    lines.push(format!("  Rank order:     {}", report.rank_order));

    let counts: Vec<String> = report
        .summary
        .op_counts
        .iter()
        .map(|(kind, count)| format!("{}={}", kind.tag(), count))
        .collect();
    lines.push(format!("  Operations:     {}", counts.join(" ")));

    for op in &report.operations {
        lines.push(String::new());
        lines.extend(render_operation(op, max_keys));
    }

    lines.push(rule);
    lines.join("\n")
}

fn render_operation(op: &OperationSkew, max_keys: usize) -> Vec<String> {
    let mut lines = vec![
        format!("  [{}] {} accesses", op.kind, op.sample_size),
        format!("    {}", op.distribution.summary()),
        format!("    MoM: {}", render_estimate(&op.beta_mom)),
        format!("    MLE: {}", render_estimate(&op.beta_mle)),
    ];

    if !op.top_k_keys.is_empty() {
        lines.push(format!("    {:<40} {:>12} {:>8}", "Hot key", "Count", "%"));
        for key in op.top_k_keys.iter().take(max_keys) {
            lines.push(format!(
                "    {:<40} {:>12} {:>7.2}%",
                truncate(&key.key, 40),
                key.count,
                key.percentage
            ));
        }
    }
    lines
}

fn render_estimate(outcome: &EstimateOutcome) -> String {
    match outcome {
        EstimateOutcome::Fitted { alpha, beta, .. } => {
            format!("alpha={:.4} beta={:.4}", alpha, beta)
        }
        EstimateOutcome::NotConverged {
            alpha,
            beta,
            iterations,
            ..
        } => format!(
            "alpha={:.4} beta={:.4} (NOT CONVERGED after {} iterations)",
            alpha, beta, iterations
        ),
        EstimateOutcome::Unavailable { detail, .. } => format!("unavailable ({})", detail),
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let head: String = s.chars().take(max - 3).collect();
        format!("{}...", head)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(0), "0.00 B");
        assert_eq!(format_bytes(1023), "1023.00 B");
        assert_eq!(format_bytes(1536), "1.50 KB");
        assert_eq!(format_bytes(3 * 1024 * 1024), "3.00 MB");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdefghijkl", 8), "abcde...");
    }
}
