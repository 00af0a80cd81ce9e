//! Output writers for skew reports.
//!
//! This module handles writing data to disk and to the terminal:
//! - JSON reports and comparison documents
//! - Text summaries

pub mod json;
pub mod summary;

// Re-export main functions
pub use json::{read_json, read_report, write_json, write_report};
pub use summary::{format_bytes, generate_text_summary};

use crate::utils::error::OutputError;
use std::path::Path;

/// Common path validation for output files
pub fn validate_path(path: &Path) -> Result<(), OutputError> {
    if path.as_os_str().is_empty() {
        return Err(OutputError::InvalidPath("Path is empty".to_string()));
    }

    if path.exists() && path.is_dir() {
        return Err(OutputError::InvalidPath(format!(
            "Path is a directory: {}",
            path.display()
        )));
    }

    Ok(())
}
