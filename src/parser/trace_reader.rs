//! Lazy, restartable reading of workload traces.
//!
//! `TraceReader` only remembers where the trace lives. Every call to
//! [`TraceReader::records`] re-opens the file and yields a fresh single-pass
//! iterator, so a second pass is just a second call.

use super::operation::{parse_line, OperationRecord};
use crate::utils::error::ParseError;
use log::debug;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

/// Read buffer size; traces run to several gigabytes
const READ_BUFFER_BYTES: usize = 1 << 20;

/// Handle to a trace file on disk
#[derive(Debug, Clone)]
pub struct TraceReader {
    path: PathBuf,
}

impl TraceReader {
    /// Create a reader for the trace at `path`
    ///
    /// The file is not touched until [`records`](Self::records) is called.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the underlying trace
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Open the trace and start a new pass over it
    ///
    /// # Errors
    /// * `ParseError::Io` - The file cannot be opened
    pub fn records(&self) -> Result<Records<BufReader<File>>, ParseError> {
        debug!("Opening trace: {}", self.path.display());
        let file = File::open(&self.path)?;
        Ok(Records::new(BufReader::with_capacity(READ_BUFFER_BYTES, file)))
    }
}

/// Single-pass iterator of `(line_number, record)` pairs
///
/// Blank lines are skipped. A malformed line yields an error and iteration
/// may continue past it; an I/O error ends the sequence.
pub struct Records<R> {
    reader: R,
    buf: Vec<u8>,
    line: u64,
    done: bool,
}

impl<R: BufRead> Records<R> {
    /// Wrap any buffered source, e.g. an in-memory cursor
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buf: Vec::new(),
            line: 0,
            done: false,
        }
    }

    /// Number of lines consumed so far
    pub fn lines_read(&self) -> u64 {
        self.line
    }
}

impl<R: BufRead> Iterator for Records<R> {
    type Item = Result<(u64, OperationRecord), ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.done {
            self.buf.clear();
            match self.reader.read_until(b'\n', &mut self.buf) {
                Ok(0) => self.done = true,
                Ok(_) => {
                    self.line += 1;
                    match parse_line(self.line, &self.buf) {
                        Ok(Some(record)) => return Some(Ok((self.line, record))),
                        Ok(None) => continue,
                        Err(e) => return Some(Err(e)),
                    }
                }
                Err(e) => {
                    self.done = true;
                    return Some(Err(ParseError::Io(e)));
                }
            }
        }
        None
    }
}
