//! Trace parsing.
//!
//! This module handles:
//! - The operation tag set and record type
//! - Parsing single trace lines
//! - Lazy, restartable iteration over trace files

pub mod operation;
pub mod trace_reader;

// Re-export main types
pub use operation::{parse_line, OperationKind, OperationRecord};
pub use trace_reader::{Records, TraceReader};
