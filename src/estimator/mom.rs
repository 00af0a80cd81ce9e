//! Method-of-moments Beta fit (closed form).

use super::moments::SampleSummary;
use super::{BetaParameters, FitError};
use crate::aggregator::RankSample;

/// Fit Beta(alpha, beta) from the sample mean and unbiased variance
///
/// With `k = m(1 - m) / v - 1`: `alpha = m k`, `beta = (1 - m) k`.
///
/// # Errors
/// * `FitError::EmptySample` - No values
/// * `FitError::DegenerateSample` - Zero or undefined variance
/// * `FitError::InvalidMomentFit` - `k <= 0`, i.e. `v >= m(1 - m)`
pub fn fit_moments(sample: &RankSample) -> Result<BetaParameters, FitError> {
    fit_moments_from_summary(&SampleSummary::from_sample(sample))
}

pub(crate) fn fit_moments_from_summary(summary: &SampleSummary) -> Result<BetaParameters, FitError> {
    if summary.n == 0 {
        return Err(FitError::EmptySample);
    }

    let variance = match summary.variance() {
        Some(v) if v.is_finite() && v > 0.0 => v,
        _ => return Err(FitError::DegenerateSample),
    };

    let m = summary.mean;
    let k = m * (1.0 - m) / variance - 1.0;
    if !(k.is_finite() && k > 0.0) {
        return Err(FitError::InvalidMomentFit { k });
    }

    Ok(BetaParameters {
        alpha: m * k,
        beta: (1.0 - m) * k,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symmetric_sample() {
        // mean 0.5, variance 1/12 * (n/(n-1)) for the evenly spaced grid
        let values: Vec<f64> = (1..1000).map(|i| i as f64 / 1000.0).collect();
        let params = fit_moments(&RankSample::from_values(values).unwrap()).unwrap();

        assert!((params.alpha - params.beta).abs() < 1e-9);
        assert!((params.alpha - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_zero_variance_is_degenerate() {
        let sample = RankSample::from_values([0.3; 50]).unwrap();
        assert_eq!(fit_moments(&sample), Err(FitError::DegenerateSample));
    }

    #[test]
    fn test_single_value_is_degenerate() {
        let sample = RankSample::from_values([0.3]).unwrap();
        assert_eq!(fit_moments(&sample), Err(FitError::DegenerateSample));
    }

    #[test]
    fn test_variance_too_large_for_mean() {
        // two points hugging the bounds: v is about 0.5, m(1 - m) is 0.25
        let sample = RankSample::from_values([1e-9, 1.0 - 1e-9]).unwrap();
        assert!(matches!(
            fit_moments(&sample),
            Err(FitError::InvalidMomentFit { k }) if k <= 0.0
        ));
    }

    #[test]
    fn test_empty_sample() {
        assert_eq!(fit_moments(&RankSample::default()), Err(FitError::EmptySample));
    }
}
