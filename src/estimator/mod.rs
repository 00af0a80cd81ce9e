//! Beta distribution fitting for normalized rank samples.
//!
//! Two independent estimators are provided:
//! - Method of moments (closed form, can be inapplicable)
//! - Maximum likelihood (Newton iterations, can fail to converge)
//!
//! Both are pure functions of the sample and are safe to run concurrently
//! on independent samples.
//!
//! # Example
//! ```ignore
//! use workload_skew::estimator::{estimate_both, MleOptions};
//!
//! let fits = estimate_both(&sample, &MleOptions::default());
//! if let Ok(params) = &fits.mom {
//!     println!("MoM: alpha={} beta={}", params.alpha, params.beta);
//! }
//! ```

pub mod mle;
pub mod moments;
pub mod mom;
pub mod special;

pub use mle::{fit_mle, mean_log_likelihood, MleOptions};
pub use moments::SampleSummary;
pub use mom::fit_moments;

use crate::aggregator::RankSample;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Shape parameters of a standard Beta distribution
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BetaParameters {
    pub alpha: f64,
    pub beta: f64,
}

impl BetaParameters {
    /// Beta(1, 1), the uniform distribution on (0, 1)
    pub const UNIFORM: Self = Self {
        alpha: 1.0,
        beta: 1.0,
    };

    /// Both shapes finite and strictly positive
    pub fn is_valid(&self) -> bool {
        self.alpha.is_finite() && self.beta.is_finite() && self.alpha > 0.0 && self.beta > 0.0
    }

    /// Mean of the fitted distribution
    pub fn mean(&self) -> f64 {
        self.alpha / (self.alpha + self.beta)
    }

    /// Variance of the fitted distribution
    pub fn variance(&self) -> f64 {
        let sum = self.alpha + self.beta;
        self.alpha * self.beta / (sum * sum * (sum + 1.0))
    }
}

/// Result of a maximum-likelihood fit
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MleFit {
    pub params: BetaParameters,

    /// Log-likelihood divided by the sample size
    pub mean_log_likelihood: f64,

    /// Newton iterations performed
    pub iterations: usize,
}

impl MleFit {
    pub fn new(params: BetaParameters, mean_log_likelihood: f64, iterations: usize) -> Self {
        Self {
            params,
            mean_log_likelihood,
            iterations,
        }
    }
}

/// Why an estimator did not produce a clean fit
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FitError {
    #[error("Sample is empty")]
    EmptySample,

    #[error("Sample variance is zero or undefined")]
    DegenerateSample,

    #[error("Moment fit gives non-positive shape parameters (k = {k})")]
    InvalidMomentFit { k: f64 },

    #[error(
        "Likelihood fit did not converge after {} iterations (best alpha={}, beta={})",
        .best.iterations, .best.params.alpha, .best.params.beta
    )]
    FitDidNotConverge { best: MleFit },
}

/// Both estimates for one sample, kept side by side
#[derive(Debug, Clone, PartialEq)]
pub struct BetaFits {
    pub mom: Result<BetaParameters, FitError>,
    pub mle: Result<MleFit, FitError>,
}

/// Run both estimators on one sample
///
/// The sample is summarized once. A method-of-moments failure only removes
/// the MLE's starting point; it never suppresses the MLE.
pub fn estimate_both(sample: &RankSample, options: &MleOptions) -> BetaFits {
    let summary = SampleSummary::from_sample(sample);
    let mom = mom::fit_moments_from_summary(&summary);
    let mle = mle::fit_mle_from_summary(&summary, mom.as_ref().ok().copied(), options);
    BetaFits { mom, mle }
}
