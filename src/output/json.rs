//! JSON report writer and reader.
//!
//! Writes reports to JSON files with proper formatting.

use super::validate_path;
use crate::report::SkewReport;
use crate::utils::error::OutputError;
use log::{debug, info};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

/// Write a skew report to a JSON file
///
/// **Public** - main entry point for JSON output
///
/// # Errors
/// * `OutputError::WriteFailed` - I/O error during write
/// * `OutputError::SerializationFailed` - JSON serialization error
/// * `OutputError::InvalidPath` - Path cannot be created or is invalid
///
/// # Example
/// ```ignore
/// let report = analyze_trace(&reader, &config)?;
/// write_report(&report, "report.json")?;
/// ```
pub fn write_report(report: &SkewReport, output_path: impl AsRef<Path>) -> Result<(), OutputError> {
    write_json(report, output_path)
}

/// Read a skew report from a JSON file
///
/// **Public** - useful for validation, comparison, and testing
///
/// # Errors
/// * `OutputError::WriteFailed` - File read error (reusing WriteFailed for I/O)
/// * `OutputError::SerializationFailed` - JSON parse error
pub fn read_report(input_path: impl AsRef<Path>) -> Result<SkewReport, OutputError> {
    let report: SkewReport = read_json(input_path)?;
    debug!(
        "Report loaded: version {}, trace {}",
        report.version, report.trace
    );
    Ok(report)
}

/// Pretty-print any serializable document to `output_path`
///
/// Parent directories are created as needed.
pub fn write_json<T: Serialize>(value: &T, output_path: impl AsRef<Path>) -> Result<(), OutputError> {
    let output_path = output_path.as_ref();

    info!("Writing JSON to: {}", output_path.display());

    validate_path(output_path)?;

    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            debug!("Creating parent directories: {}", parent.display());
            std::fs::create_dir_all(parent).map_err(|e| {
                OutputError::InvalidPath(format!(
                    "Cannot create directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }
    }

    let file = File::create(output_path)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, value)?;
    writer.flush()?;

    info!(
        "JSON written successfully ({} bytes)",
        calculate_file_size(output_path)
    );

    Ok(())
}

/// Parse a JSON document from `input_path`
pub fn read_json<T: DeserializeOwned>(input_path: impl AsRef<Path>) -> Result<T, OutputError> {
    let input_path = input_path.as_ref();

    debug!("Reading JSON from: {}", input_path.display());

    let file = File::open(input_path)?;
    let value = serde_json::from_reader(BufReader::new(file))?;
    Ok(value)
}

/// Calculate file size in bytes
///
/// **Private** - internal utility
fn calculate_file_size(path: &Path) -> u64 {
    std::fs::metadata(path).map(|m| m.len()).unwrap_or(0)
}
