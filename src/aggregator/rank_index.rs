//! Conversion of frequency tables into normalized rank samples.

use super::accumulator::{FrequencyTable, KeyTable};
use crate::utils::config::RANK_FLOOR;
use crate::utils::error::{RankError, SampleError};
use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How keys are ordered before normalization
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankOrder {
    /// Insertion rank divided by the number of inserted keys
    #[default]
    Insertion,

    /// Position in descending-count order among the keys of one table,
    /// divided by the number of keys in that table
    Popularity,
}

impl fmt::Display for RankOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Insertion => f.write_str("insertion"),
            Self::Popularity => f.write_str("popularity"),
        }
    }
}

/// Normalized rank values in `(0, 1)`, stored run-length encoded
///
/// Logically each key contributes `count` copies of its normalized rank;
/// physically it is one `(value, count)` run, so memory is per key rather
/// than per access.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RankSample {
    runs: Vec<(f64, u64)>,
    len: u64,
}

impl RankSample {
    /// Build a sample from explicit values, each counted once
    ///
    /// # Errors
    /// * `SampleError::Empty` - No values
    /// * `SampleError::OutOfSupport` - A value is not strictly inside (0, 1)
    pub fn from_values(values: impl IntoIterator<Item = f64>) -> Result<Self, SampleError> {
        let mut sample = Self::default();
        for (index, value) in values.into_iter().enumerate() {
            if !(value > 0.0 && value < 1.0) {
                return Err(SampleError::OutOfSupport { index, value });
            }
            sample.push_run(value, 1);
        }
        if sample.is_empty() {
            return Err(SampleError::Empty);
        }
        Ok(sample)
    }

    fn push_run(&mut self, value: f64, count: u64) {
        if count == 0 {
            return;
        }
        self.runs.push((value, count));
        self.len += count;
    }

    /// Logical length: the sum of all counts
    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// `(value, copies)` runs
    pub fn runs(&self) -> &[(f64, u64)] {
        &self.runs
    }

    /// Expanded values, `count` copies per run
    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.runs
            .iter()
            .flat_map(|&(value, count)| std::iter::repeat(value).take(count as usize))
    }

    /// Materialize the expanded sequence
    pub fn to_vec(&self) -> Vec<f64> {
        self.iter().collect()
    }
}

/// Build the normalized rank sample for one frequency table
///
/// **Public** - main entry point for rank normalization
///
/// # Arguments
/// * `table` - Frequency table of one operation class
/// * `keys` - Final key table of the same pass
/// * `order` - Insertion rank or popularity rank
///
/// # Errors
/// * `RankError::EmptyKeyspace` - No key was ever inserted
pub fn build_rank_sample(
    table: &FrequencyTable,
    keys: &KeyTable,
    order: RankOrder,
) -> Result<RankSample, RankError> {
    if keys.is_empty() {
        return Err(RankError::EmptyKeyspace);
    }

    let mut sample = RankSample::default();
    match order {
        RankOrder::Insertion => {
            let total_keys = keys.len() as f64;
            for (rank, count) in table.iter() {
                sample.push_run(normalize(rank, total_keys), count);
            }
        }
        RankOrder::Popularity => {
            let total_keys = table.distinct() as f64;
            for (position, (_, count)) in by_popularity(table).into_iter().enumerate() {
                sample.push_run(normalize(position, total_keys), count);
            }
        }
    }

    debug!(
        "Built {} rank sample: {} values over {} keys",
        order,
        sample.len(),
        sample.runs.len()
    );

    Ok(sample)
}

/// `(rank, count)` pairs sorted by descending count, ties by insertion rank
pub fn by_popularity(table: &FrequencyTable) -> Vec<(usize, u64)> {
    let mut entries: Vec<(usize, u64)> = table.iter().collect();
    entries.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    entries
}

fn normalize(position: usize, total: f64) -> f64 {
    (position as f64 / total).max(RANK_FLOOR)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tables(inserted: usize, accesses: &[usize]) -> (KeyTable, FrequencyTable) {
        let mut keys = KeyTable::new();
        for i in 0..inserted {
            keys.insert(&format!("k{i}"), 1);
        }
        let mut table = FrequencyTable::new();
        for &rank in accesses {
            table.record(rank);
        }
        (keys, table)
    }

    #[test]
    fn test_length_matches_counts() {
        let (keys, table) = tables(4, &[0, 0, 1, 3, 3, 3]);
        let sample = build_rank_sample(&table, &keys, RankOrder::Insertion).unwrap();

        assert_eq!(sample.len(), table.total());
        assert_eq!(sample.to_vec().len(), 6);
        assert!(sample.iter().all(|v| v > 0.0 && v < 1.0));
    }

    #[test]
    fn test_rank_zero_is_floored() {
        let (keys, table) = tables(3, &[0, 0, 2]);
        let values = build_rank_sample(&table, &keys, RankOrder::Insertion)
            .unwrap()
            .to_vec();

        assert_eq!(values, vec![f64::EPSILON, f64::EPSILON, 2.0 / 3.0]);
    }

    #[test]
    fn test_empty_keyspace() {
        let keys = KeyTable::new();
        let table = FrequencyTable::new();
        assert_eq!(
            build_rank_sample(&table, &keys, RankOrder::Insertion),
            Err(RankError::EmptyKeyspace)
        );
    }

    #[test]
    fn test_empty_table_gives_empty_sample() {
        let (keys, table) = tables(2, &[]);
        let sample = build_rank_sample(&table, &keys, RankOrder::Insertion).unwrap();
        assert!(sample.is_empty());
    }

    #[test]
    fn test_popularity_order() {
        // rank 2 is hottest, then rank 0, then rank 1
        let (keys, table) = tables(5, &[2, 2, 2, 0, 0, 1]);
        let sample = build_rank_sample(&table, &keys, RankOrder::Popularity).unwrap();

        assert_eq!(
            sample.runs(),
            &[(f64::EPSILON, 3), (1.0 / 3.0, 2), (2.0 / 3.0, 1)]
        );
    }

    #[test]
    fn test_from_values_rejects_bounds() {
        assert_eq!(
            RankSample::from_values([0.5, 1.0]),
            Err(SampleError::OutOfSupport { index: 1, value: 1.0 })
        );
        assert_eq!(
            RankSample::from_values(Vec::<f64>::new()),
            Err(SampleError::Empty)
        );
        assert!(RankSample::from_values([f64::NAN]).is_err());
    }
}
