use std::io::Write;
use tempfile::{tempdir, NamedTempFile};
use workload_skew::aggregator::RankOrder;
use workload_skew::commands::{
    execute_analyze, execute_compare, validate_args, validate_report_file, AnalyzeArgs,
    CompareArgs,
};
use workload_skew::diff::SkewComparison;
use workload_skew::output::{read_json, read_report};
use workload_skew::parser::OperationKind;

fn write_trace(lines: &[String]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    for line in lines {
        writeln!(file, "{}", line).unwrap();
    }
    file
}

fn workload(hot_modulus: usize) -> Vec<String> {
    let mut lines: Vec<String> = (0..30).map(|i| format!("I k{} v{}", i, i)).collect();
    for i in 0..300 {
        lines.push(format!("U k{} new", (i * 7) % hot_modulus));
        lines.push(format!("P k{}", (i * 11) % 30));
    }
    lines
}

#[test]
fn test_analyze_writes_report() {
    let trace = write_trace(&workload(5));
    let dir = tempdir().unwrap();
    let output = dir.path().join("skew.json");

    let args = AnalyzeArgs {
        trace: trace.path().to_path_buf(),
        output: output.clone(),
        top_k: Some(2),
        rank_order: Some(RankOrder::Insertion),
        include_inserts: true,
        print_summary: true,
        ..Default::default()
    };
    validate_args(&args).unwrap();
    execute_analyze(args).unwrap();

    let report = read_report(&output).unwrap();
    assert_eq!(report.summary.distinct_keys, 30);
    assert_eq!(report.operations.len(), 3);

    let update = report.operation(OperationKind::Update).unwrap();
    assert_eq!(update.sample_size, 300);
    assert_eq!(update.top_k_keys.len(), 2);
    assert!(update.beta_mom.is_fitted());

    validate_report_file(output).unwrap();
}

#[test]
fn test_analyze_with_settings_file() {
    let trace = write_trace(&workload(5));
    let mut settings = NamedTempFile::new().unwrap();
    writeln!(settings, "top_k = 1\nrank_order = \"popularity\"").unwrap();
    let dir = tempdir().unwrap();
    let output = dir.path().join("skew.json");

    execute_analyze(AnalyzeArgs {
        trace: trace.path().to_path_buf(),
        output: output.clone(),
        config: Some(settings.path().to_path_buf()),
        ..Default::default()
    })
    .unwrap();

    let report = read_report(&output).unwrap();
    assert_eq!(report.rank_order, RankOrder::Popularity);
    assert!(report.operations.iter().all(|op| op.top_k_keys.len() <= 1));
}

#[test]
fn test_analyze_rejects_unknown_key_trace() {
    let trace = write_trace(&["I a v".to_string(), "U b w".to_string()]);
    let dir = tempdir().unwrap();
    let output = dir.path().join("skew.json");

    let result = execute_analyze(AnalyzeArgs {
        trace: trace.path().to_path_buf(),
        output: output.clone(),
        ..Default::default()
    });

    let err = result.unwrap_err();
    assert!(format!("{:#}", err).contains("never inserted"));
    assert!(!output.exists());
}

#[test]
fn test_compare_writes_comparison() {
    let dir = tempdir().unwrap();
    let baseline_path = dir.path().join("baseline.json");
    let target_path = dir.path().join("target.json");
    let comparison_path = dir.path().join("comparison.json");

    for (hot, path) in [(5, &baseline_path), (30, &target_path)] {
        let trace = write_trace(&workload(hot));
        execute_analyze(AnalyzeArgs {
            trace: trace.path().to_path_buf(),
            output: path.clone(),
            ..Default::default()
        })
        .unwrap();
    }

    execute_compare(CompareArgs {
        baseline: baseline_path,
        target: target_path,
        output: Some(comparison_path.clone()),
        summary: true,
    })
    .unwrap();

    let comparison: SkewComparison = read_json(&comparison_path).unwrap();
    assert_eq!(comparison.summary.compared_kinds, 2);
    assert!(comparison.summary.warning.is_none());

    let update = comparison
        .operations
        .iter()
        .find(|op| op.kind == OperationKind::Update)
        .unwrap();
    // spreading updates over all keys raises the mean rank
    assert!(update.mom.mean.as_ref().unwrap().change > 0.0);
}

#[test]
fn test_compare_missing_report() {
    let result = execute_compare(CompareArgs {
        baseline: "/nonexistent/a.json".into(),
        target: "/nonexistent/b.json".into(),
        ..Default::default()
    });
    assert!(result.is_err());
}
