//! Operation records and the single-line trace grammar.
//!
//! A trace line is `<opchar> <key> [<value>]`. The value is everything after
//! the separator that follows the key, so it may itself contain spaces.

use crate::utils::error::ParseError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Operation tag set of a workload trace
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    Insert,
    Update,
    Merge,
    DeletePoint,
    DeleteRange,
    QueryPoint,
    QueryRange,
}

impl OperationKind {
    /// All kinds, in tag order
    pub const ALL: [OperationKind; 7] = [
        Self::Insert,
        Self::Update,
        Self::Merge,
        Self::DeletePoint,
        Self::DeleteRange,
        Self::QueryPoint,
        Self::QueryRange,
    ];

    /// Map a single-character trace tag to its kind
    pub fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            b'I' => Some(Self::Insert),
            b'U' => Some(Self::Update),
            b'M' => Some(Self::Merge),
            b'D' => Some(Self::DeletePoint),
            b'R' => Some(Self::DeleteRange),
            b'P' => Some(Self::QueryPoint),
            b'S' => Some(Self::QueryRange),
            _ => None,
        }
    }

    /// The trace tag for this kind
    pub fn tag(self) -> char {
        match self {
            Self::Insert => 'I',
            Self::Update => 'U',
            Self::Merge => 'M',
            Self::DeletePoint => 'D',
            Self::DeleteRange => 'R',
            Self::QueryPoint => 'P',
            Self::QueryRange => 'S',
        }
    }

    /// Snake-case name, as used in reports
    pub fn name(self) -> &'static str {
        match self {
            Self::Insert => "insert",
            Self::Update => "update",
            Self::Merge => "merge",
            Self::DeletePoint => "delete_point",
            Self::DeleteRange => "delete_range",
            Self::QueryPoint => "query_point",
            Self::QueryRange => "query_range",
        }
    }

    /// Whether the line must carry a value field
    pub fn requires_value(self) -> bool {
        matches!(self, Self::Insert | Self::Update | Self::Merge)
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One parsed trace line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationRecord {
    pub kind: OperationKind,
    pub key: String,
    pub value: Option<Vec<u8>>,
}

impl OperationRecord {
    /// Length of the value field in bytes (0 when absent)
    pub fn value_len(&self) -> u64 {
        self.value.as_ref().map_or(0, |v| v.len() as u64)
    }
}

/// Parse one raw trace line
///
/// **Public** - used by the trace reader, also handy for tests
///
/// # Arguments
/// * `line_no` - 1-based line number, carried into errors
/// * `raw` - Line bytes, with or without the trailing newline
///
/// # Returns
/// `Ok(None)` for blank lines, `Ok(Some(record))` otherwise
///
/// # Errors
/// * `ParseError::MalformedRecord` - Unknown tag, missing key, missing value
pub fn parse_line(line_no: u64, raw: &[u8]) -> Result<Option<OperationRecord>, ParseError> {
    let line = trim_line_ending(raw);
    if line.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }

    let malformed = |reason: String| ParseError::MalformedRecord {
        line: line_no,
        reason,
    };

    let start = skip_whitespace(line, 0);
    let tag_end = token_end(line, start);
    let tag = &line[start..tag_end];
    if tag.len() != 1 {
        return Err(malformed(format!(
            "operation tag must be one character, found '{}'",
            String::from_utf8_lossy(tag)
        )));
    }
    let kind = OperationKind::from_tag(tag[0]).ok_or_else(|| {
        malformed(format!("unrecognized operation tag '{}'", tag[0] as char))
    })?;

    let key_start = skip_whitespace(line, tag_end);
    let key_end = token_end(line, key_start);
    if key_start == key_end {
        return Err(malformed(format!("{} record has no key", kind)));
    }
    let key = std::str::from_utf8(&line[key_start..key_end])
        .map_err(|_| malformed("key is not valid UTF-8".to_string()))?
        .to_string();

    // The value is the remainder after exactly one separator
    let value = if key_end < line.len() {
        Some(line[key_end + 1..].to_vec())
    } else {
        None
    };

    if value.is_none() && kind.requires_value() {
        return Err(malformed(format!("{} record for key '{}' has no value", kind, key)));
    }

    Ok(Some(OperationRecord { kind, key, value }))
}

fn trim_line_ending(raw: &[u8]) -> &[u8] {
    let mut end = raw.len();
    while end > 0 && (raw[end - 1] == b'\n' || raw[end - 1] == b'\r') {
        end -= 1;
    }
    &raw[..end]
}

fn skip_whitespace(line: &[u8], mut pos: usize) -> usize {
    while pos < line.len() && line[pos].is_ascii_whitespace() {
        pos += 1;
    }
    pos
}

fn token_end(line: &[u8], mut pos: usize) -> usize {
    while pos < line.len() && !line[pos].is_ascii_whitespace() {
        pos += 1;
    }
    pos
}
