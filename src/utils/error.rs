//! Error types for the entire application.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs and commands.

use crate::parser::OperationKind;
use thiserror::Error;

/// Errors that can occur while reading a trace
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("I/O error while reading trace: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed record at line {line}: {reason}")]
    MalformedRecord { line: u64, reason: String },
}

/// Errors that abort an accumulation pass
#[derive(Error, Debug)]
pub enum AccumulateError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("{kind} at line {line} references key '{key}' that was never inserted")]
    UnknownKeyReference {
        line: u64,
        kind: OperationKind,
        key: String,
    },
}

/// Errors that can occur while normalizing ranks
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RankError {
    #[error("No keys were inserted; there is no rank to normalize against")]
    EmptyKeyspace,
}

/// Errors for samples handed to the estimators directly
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SampleError {
    #[error("Sample is empty")]
    Empty,

    #[error("Sample value {value} at index {index} lies outside (0, 1)")]
    OutOfSupport { index: usize, value: f64 },
}

/// Errors that can occur during file output
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to write file: {0}")]
    WriteFailed(#[from] std::io::Error),

    #[error("Failed to serialize JSON: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    #[error("Invalid output path: {0}")]
    InvalidPath(String),
}

/// Errors that can occur while loading settings
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Errors that abort a whole analysis run for one trace
#[derive(Error, Debug)]
pub enum AnalyzeError {
    #[error(transparent)]
    Accumulate(#[from] AccumulateError),

    #[error(transparent)]
    Rank(#[from] RankError),
}
