//! Calculate access-concentration metrics and hot keys from frequency tables.
//!
//! Hot keys are the keys with the most accesses in one operation class.
//! They are the first thing to look at when two workloads disagree.

use super::accumulator::{FrequencyTable, KeyTable};
use super::rank_index::by_popularity;
use crate::utils::config::HOT_KEY_FRACTION;
use log::debug;
use serde::{Deserialize, Serialize};

/// One hot key with its access count
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyCount {
    pub key: String,
    pub count: u64,

    /// Percentage of all accesses of the class
    pub percentage: f64,
}

/// Calculate the `top_k` hottest keys of a table
///
/// **Public** - main entry point for hot key extraction
///
/// # Returns
/// Keys sorted by access count (descending), ties by insertion rank
pub fn calculate_top_keys(table: &FrequencyTable, keys: &KeyTable, top_k: usize) -> Vec<KeyCount> {
    debug!(
        "Calculating top {} keys from {} distinct keys",
        top_k,
        table.distinct()
    );

    by_popularity(table)
        .into_iter()
        .take(top_k)
        .filter_map(|(rank, count)| {
            keys.key_at(rank).map(|key| KeyCount {
                key: key.to_string(),
                count,
                percentage: percentage(count, table.total()),
            })
        })
        .collect()
}

/// Calculate access distribution statistics
///
/// **Public** - provides summary statistics
pub fn calculate_access_distribution(table: &FrequencyTable) -> AccessDistribution {
    if table.is_empty() {
        return AccessDistribution::default();
    }

    let total = table.total();
    let distinct = table.distinct();

    let mut counts: Vec<u64> = table.iter().map(|(_, count)| count).collect();
    counts.sort_unstable_by(|a, b| b.cmp(a));

    let median = counts[counts.len() / 2];

    let hot_count = (distinct as f64 * HOT_KEY_FRACTION).ceil() as usize;
    let hot_accesses: u64 = counts.iter().take(hot_count).sum();

    AccessDistribution {
        total_accesses: total,
        distinct_keys: distinct,
        mean_accesses_per_key: total as f64 / distinct as f64,
        median_accesses_per_key: median,
        top_10_percent_accesses: hot_accesses,
        top_10_percent_percentage: percentage(hot_accesses, total),
    }
}

/// Access distribution statistics for one operation class
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AccessDistribution {
    /// Matched operations of the class
    pub total_accesses: u64,

    /// Keys touched at least once
    pub distinct_keys: usize,

    pub mean_accesses_per_key: f64,

    pub median_accesses_per_key: u64,

    /// Accesses landing on the hottest 10% of touched keys
    pub top_10_percent_accesses: u64,

    /// Percentage of accesses landing on the hottest 10% of touched keys
    pub top_10_percent_percentage: f64,
}

impl AccessDistribution {
    /// True if the hottest 10% of keys take more than 80% of accesses
    pub fn is_highly_concentrated(&self) -> bool {
        self.top_10_percent_percentage > 80.0
    }

    /// Get human-readable summary
    ///
    /// **Public** - for logging and debugging
    pub fn summary(&self) -> String {
        format!(
            "Accesses: {} | Keys: {} | Mean: {:.2} | Median: {} | Top 10%: {:.1}%",
            self.total_accesses,
            self.distinct_keys,
            self.mean_accesses_per_key,
            self.median_accesses_per_key,
            self.top_10_percent_percentage
        )
    }
}

fn percentage(part: u64, total: u64) -> f64 {
    if total > 0 {
        (part as f64 / total as f64) * 100.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (KeyTable, FrequencyTable) {
        let mut keys = KeyTable::new();
        for name in ["a", "b", "c", "d"] {
            keys.insert(name, 0);
        }
        let mut table = FrequencyTable::new();
        for _ in 0..8 {
            table.record(2);
        }
        table.record(0);
        table.record(1);
        (keys, table)
    }

    #[test]
    fn test_calculate_top_keys() {
        let (keys, table) = setup();
        let top = calculate_top_keys(&table, &keys, 2);

        assert_eq!(top.len(), 2);
        assert_eq!(top[0].key, "c");
        assert_eq!(top[0].count, 8);
        assert_eq!(top[0].percentage, 80.0);
        // tie between a and b is broken by insertion rank
        assert_eq!(top[1].key, "a");
    }

    #[test]
    fn test_calculate_access_distribution() {
        let (_, table) = setup();
        let dist = calculate_access_distribution(&table);

        assert_eq!(dist.total_accesses, 10);
        assert_eq!(dist.distinct_keys, 3);
        assert_eq!(dist.median_accesses_per_key, 1);
        assert_eq!(dist.top_10_percent_accesses, 8);
        assert!(!dist.is_highly_concentrated());
    }

    #[test]
    fn test_access_distribution_empty() {
        let dist = calculate_access_distribution(&FrequencyTable::new());
        assert_eq!(dist.total_accesses, 0);
        assert_eq!(dist.distinct_keys, 0);
    }
}
