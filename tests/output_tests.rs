use pretty_assertions::assert_eq;
use std::io::Write;
use std::path::Path;
use tempfile::{tempdir, NamedTempFile};
use workload_skew::output::{
    format_bytes, generate_text_summary, read_report, validate_path, write_report,
};
use workload_skew::parser::{OperationKind, TraceReader};
use workload_skew::report::{analyze_trace, EstimateOutcome, SkewReport};
use workload_skew::utils::config::{SkewConfig, SCHEMA_VERSION};

fn create_test_report() -> SkewReport {
    let mut trace = NamedTempFile::new().unwrap();
    for i in 0..50 {
        writeln!(trace, "I user{:03} {}", i, "x".repeat(i + 1)).unwrap();
    }
    for i in 0..400u64 {
        let hot = (i * i + 3 * i) % 50;
        writeln!(trace, "U user{:03} y", hot % 10).unwrap();
        writeln!(trace, "P user{:03}", hot).unwrap();
    }
    writeln!(trace, "P nobody").unwrap();

    analyze_trace(&TraceReader::new(trace.path()), &SkewConfig::default()).unwrap()
}

#[test]
fn test_write_and_read_report() {
    let report = create_test_report();
    let temp_file = NamedTempFile::new().unwrap();
    let path = temp_file.path();

    // Write
    write_report(&report, path).unwrap();

    // Read back
    let loaded = read_report(path).unwrap();

    assert_eq!(loaded.version, SCHEMA_VERSION);
    assert_eq!(loaded.trace, report.trace);
    assert_eq!(loaded.summary, report.summary);
    assert_eq!(loaded.operations.len(), report.operations.len());
    for (l, r) in loaded.operations.iter().zip(&report.operations) {
        assert_eq!(l.kind, r.kind);
        assert_eq!(l.sample_size, r.sample_size);
        assert_eq!(l.top_k_keys.len(), r.top_k_keys.len());
        assert_eq!(l.beta_mom.status(), r.beta_mom.status());
        let (lp, rp) = (l.beta_mle.params().unwrap(), r.beta_mle.params().unwrap());
        assert!((lp.alpha - rp.alpha).abs() <= 1e-12 * rp.alpha);
    }
}

#[test]
fn test_report_json_tags_estimates() {
    let report = create_test_report();
    let json = serde_json::to_value(&report).unwrap();

    let update = &json["operations"][0];
    assert_eq!(update["kind"], "update");
    assert_eq!(update["beta_mom"]["status"], "fitted");
    assert!(update["beta_mom"]["alpha"].as_f64().unwrap() > 0.0);
    assert_eq!(json["summary"]["empty_point_queries"], 1);
    assert_eq!(json["summary"]["op_counts"]["query_point"], 401);
}

#[test]
fn test_write_creates_parent_directories() {
    let report = create_test_report();
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join("deeper").join("skew.json");

    write_report(&report, &path).unwrap();
    assert!(path.is_file());
}

#[test]
fn test_write_to_directory_fails() {
    let report = create_test_report();
    let dir = tempdir().unwrap();
    assert!(write_report(&report, dir.path()).is_err());
}

#[test]
fn test_read_invalid_json() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "{{ not json").unwrap();
    assert!(read_report(file.path()).is_err());
}

#[test]
fn test_read_nonexistent_file() {
    assert!(read_report("/nonexistent/skew.json").is_err());
}

#[test]
fn test_validate_path() {
    assert!(validate_path(Path::new("")).is_err());
    assert!(validate_path(Path::new("fresh-output.json")).is_ok());
}

#[test]
fn test_text_summary() {
    let report = create_test_report();
    let summary = generate_text_summary(&report, 3);

    assert!(summary.contains("WORKLOAD SKEW SUMMARY"));
    assert!(summary.contains("Distinct keys:  50"));
    assert!(summary.contains("[update]"));
    assert!(summary.contains("[query_point]"));
    assert!(summary.contains("Hot key"));
}

#[test]
fn test_text_summary_marks_missing_estimates() {
    let mut report = create_test_report();
    let update = report
        .operations
        .iter_mut()
        .find(|op| op.kind == OperationKind::Update)
        .unwrap();
    update.beta_mle = EstimateOutcome::NotConverged {
        alpha: 1.0e7,
        beta: 1.0e7,
        mean_log_likelihood: 8.0,
        iterations: 200,
    };

    let summary = generate_text_summary(&report, 3);
    assert!(summary.contains("NOT CONVERGED after 200 iterations"));
}

#[test]
fn test_format_bytes_units() {
    assert_eq!(format_bytes(512), "512.00 B");
    assert_eq!(format_bytes(5 * 1024 * 1024 * 1024), "5.00 GB");
}
