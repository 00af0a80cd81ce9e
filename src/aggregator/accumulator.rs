//! Single streaming pass from trace records to per-key statistics.
//!
//! The accumulator owns a `KeyTable` (key -> insertion rank) and one
//! `FrequencyTable` per modeled operation class. Nothing is ever removed,
//! so memory is bounded by distinct-key cardinality, not trace length.

use crate::parser::{OperationKind, OperationRecord, TraceReader};
use crate::utils::error::{AccumulateError, ParseError};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

/// Emit a progress line every this many records
const PROGRESS_INTERVAL: u64 = 10_000_000;

/// Key -> insertion rank, assigned on first insert
#[derive(Debug, Clone, Default)]
pub struct KeyTable {
    ranks: HashMap<Arc<str>, usize>,
    keys: Vec<Arc<str>>,
    value_lens: Vec<u64>,
}

impl KeyTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct inserted keys
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn rank_of(&self, key: &str) -> Option<usize> {
        self.ranks.get(key).copied()
    }

    pub fn key_at(&self, rank: usize) -> Option<&str> {
        self.keys.get(rank).map(|k| k.as_ref())
    }

    /// Length of the value currently stored under `rank`
    pub fn value_len(&self, rank: usize) -> u64 {
        self.value_lens.get(rank).copied().unwrap_or(0)
    }

    /// Insert `key` if new. Returns its rank and whether it was new.
    ///
    /// An existing key keeps its rank; only the stored value length changes.
    pub fn insert(&mut self, key: &str, value_len: u64) -> (usize, bool) {
        if let Some(&rank) = self.ranks.get(key) {
            self.value_lens[rank] = value_len;
            return (rank, false);
        }

        let rank = self.keys.len();
        let key: Arc<str> = Arc::from(key);
        self.ranks.insert(Arc::clone(&key), rank);
        self.keys.push(key);
        self.value_lens.push(value_len);
        (rank, true)
    }

    fn set_value_len(&mut self, rank: usize, value_len: u64) {
        if let Some(len) = self.value_lens.get_mut(rank) {
            *len = value_len;
        }
    }
}

/// Occurrence counts for one operation class
///
/// Keyed by insertion rank, which is a bijection with keys for the lifetime
/// of the pass; use [`KeyTable::key_at`] to recover the key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: BTreeMap<usize, u64>,
    total: u64,
}

impl FrequencyTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one access of the key with `rank`
    pub fn record(&mut self, rank: usize) {
        *self.counts.entry(rank).or_insert(0) += 1;
        self.total += 1;
    }

    pub fn get(&self, rank: usize) -> u64 {
        self.counts.get(&rank).copied().unwrap_or(0)
    }

    /// Sum of all counts
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Number of distinct keys with at least one access
    pub fn distinct(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// `(rank, count)` pairs in rank order
    pub fn iter(&self) -> impl Iterator<Item = (usize, u64)> + '_ {
        self.counts.iter().map(|(&rank, &count)| (rank, count))
    }
}

/// Logical byte volume seen during the pass (diagnostic only)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ByteVolume {
    /// Value bytes carried by inserts, updates and merges
    pub written: u64,

    /// Stored value bytes returned by point queries that hit
    pub read: u64,
}

/// Streaming builder of key and frequency tables
#[derive(Debug, Default)]
pub struct AccessAccumulator {
    keys: KeyTable,
    inserts: FrequencyTable,
    updates: FrequencyTable,
    point_queries: FrequencyTable,
    op_counts: BTreeMap<OperationKind, u64>,
    duplicate_inserts: u64,
    empty_point_queries: u64,
    bytes: ByteVolume,
    records: u64,
}

impl AccessAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one record
    ///
    /// # Errors
    /// * `AccumulateError::UnknownKeyReference` - An update names a key that
    ///   was never inserted
    pub fn ingest(&mut self, line: u64, record: OperationRecord) -> Result<(), AccumulateError> {
        self.records += 1;
        *self.op_counts.entry(record.kind).or_insert(0) += 1;

        match record.kind {
            OperationKind::Insert => {
                let value_len = record.value_len();
                self.bytes.written += value_len;
                let (rank, is_new) = self.keys.insert(&record.key, value_len);
                if !is_new {
                    self.duplicate_inserts += 1;
                    debug!("Duplicate insert of '{}' at line {}", record.key, line);
                }
                self.inserts.record(rank);
            }
            OperationKind::Update => {
                let rank = self.keys.rank_of(&record.key).ok_or_else(|| {
                    AccumulateError::UnknownKeyReference {
                        line,
                        kind: record.kind,
                        key: record.key.clone(),
                    }
                })?;
                let value_len = record.value_len();
                self.bytes.written += value_len;
                self.keys.set_value_len(rank, value_len);
                self.updates.record(rank);
            }
            OperationKind::QueryPoint => match self.keys.rank_of(&record.key) {
                Some(rank) => {
                    self.bytes.read += self.keys.value_len(rank);
                    self.point_queries.record(rank);
                }
                None => self.empty_point_queries += 1,
            },
            OperationKind::Merge => {
                self.bytes.written += record.value_len();
            }
            OperationKind::DeletePoint | OperationKind::DeleteRange | OperationKind::QueryRange => {}
        }

        if self.records % PROGRESS_INTERVAL == 0 {
            debug!(
                "Processed {} records ({} distinct keys)",
                self.records,
                self.keys.len()
            );
        }

        Ok(())
    }

    /// Drain a record sequence, aborting on the first error
    pub fn accumulate<I>(&mut self, records: I) -> Result<(), AccumulateError>
    where
        I: IntoIterator<Item = Result<(u64, OperationRecord), ParseError>>,
    {
        for item in records {
            let (line, record) = item?;
            self.ingest(line, record)?;
        }
        Ok(())
    }

    /// Finalize the pass
    pub fn finish(self) -> AccessStats {
        if self.duplicate_inserts > 0 {
            warn!(
                "{} duplicate inserts kept their first rank",
                self.duplicate_inserts
            );
        }

        AccessStats {
            keys: self.keys,
            inserts: self.inserts,
            updates: self.updates,
            point_queries: self.point_queries,
            op_counts: self.op_counts,
            duplicate_inserts: self.duplicate_inserts,
            empty_point_queries: self.empty_point_queries,
            bytes: self.bytes,
            records: self.records,
        }
    }
}

/// Finalized tables of a complete pass
///
/// Only a finished pass is exposed, since rank normalization depends on the
/// final key count.
#[derive(Debug, Clone)]
pub struct AccessStats {
    pub keys: KeyTable,
    pub inserts: FrequencyTable,
    pub updates: FrequencyTable,
    pub point_queries: FrequencyTable,
    pub op_counts: BTreeMap<OperationKind, u64>,
    pub duplicate_inserts: u64,
    pub empty_point_queries: u64,
    pub bytes: ByteVolume,
    pub records: u64,
}

impl AccessStats {
    /// Frequency table of a modeled class
    pub fn frequency(&self, kind: OperationKind) -> Option<&FrequencyTable> {
        match kind {
            OperationKind::Insert => Some(&self.inserts),
            OperationKind::Update => Some(&self.updates),
            OperationKind::QueryPoint => Some(&self.point_queries),
            _ => None,
        }
    }

    pub fn op_count(&self, kind: OperationKind) -> u64 {
        self.op_counts.get(&kind).copied().unwrap_or(0)
    }

    /// Count for `key` in the table of `kind`, looked up by key string
    pub fn count_for_key(&self, kind: OperationKind, key: &str) -> u64 {
        match (self.frequency(kind), self.keys.rank_of(key)) {
            (Some(table), Some(rank)) => table.get(rank),
            _ => 0,
        }
    }
}

/// Run one full pass over a trace file
///
/// **Public** - main entry point for accumulation
///
/// # Errors
/// * `AccumulateError::Parse` - I/O failure or malformed line
/// * `AccumulateError::UnknownKeyReference` - Update of a never-inserted key
pub fn accumulate_trace(reader: &TraceReader) -> Result<AccessStats, AccumulateError> {
    info!("Accumulating accesses from: {}", reader.path().display());

    let mut accumulator = AccessAccumulator::new();
    accumulator.accumulate(reader.records()?)?;
    let stats = accumulator.finish();

    info!(
        "Pass complete: {} records, {} distinct keys, {} empty point queries",
        stats.records,
        stats.keys.len(),
        stats.empty_point_queries
    );

    Ok(stats)
}
