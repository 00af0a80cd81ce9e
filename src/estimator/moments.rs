//! One-pass summary of a rank sample.
//!
//! Both estimators only need the sample size, mean, variance and the two
//! log-means, so the sample is reduced once and never revisited.

use crate::aggregator::RankSample;

/// Sufficient statistics of a sample on `(0, 1)`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleSummary {
    /// Number of values
    pub n: u64,

    pub mean: f64,

    /// Sum of squared deviations from the mean
    sum_sq_dev: f64,

    /// Mean of `ln(x)`
    pub mean_ln_x: f64,

    /// Mean of `ln(1 - x)`
    pub mean_ln_1mx: f64,
}

impl SampleSummary {
    /// Reduce a sample, run by run (weighted Welford update)
    pub fn from_sample(sample: &RankSample) -> Self {
        let mut n: u64 = 0;
        let mut mean = 0.0;
        let mut sum_sq_dev = 0.0;
        let mut sum_ln_x = 0.0;
        let mut sum_ln_1mx = 0.0;

        for &(value, count) in sample.runs() {
            let weight = count as f64;
            let next_n = n + count;
            let delta = value - mean;
            mean += delta * (weight / next_n as f64);
            sum_sq_dev += weight * delta * (value - mean);
            sum_ln_x += weight * value.ln();
            sum_ln_1mx += weight * (-value).ln_1p();
            n = next_n;
        }

        let (mean_ln_x, mean_ln_1mx) = if n > 0 {
            (sum_ln_x / n as f64, sum_ln_1mx / n as f64)
        } else {
            (0.0, 0.0)
        };

        Self {
            n,
            mean,
            sum_sq_dev,
            mean_ln_x,
            mean_ln_1mx,
        }
    }

    /// Unbiased sample variance (divisor `n - 1`); `None` below two values
    pub fn variance(&self) -> Option<f64> {
        if self.n < 2 {
            return None;
        }
        Some(self.sum_sq_dev / (self.n - 1) as f64)
    }
}
