//! Maximum-likelihood Beta fit.
//!
//! Location is fixed at 0 and scale at 1, leaving the two shape parameters.
//! The mean log-likelihood
//!
//! `l(a, b) = (a - 1) E[ln x] + (b - 1) E[ln(1 - x)] - ln B(a, b)`
//!
//! is concave in `(a, b)`, so Newton's method with step halving climbs
//! monotonically to the optimum when one exists.

use super::moments::SampleSummary;
use super::mom::fit_moments_from_summary;
use super::special::{digamma, ln_beta, trigamma};
use super::{BetaParameters, FitError, MleFit};
use crate::aggregator::RankSample;
use crate::utils::config::{MLE_MAX_ITERATIONS, MLE_MAX_SHAPE, MLE_TOLERANCE};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

/// Step halvings tried before the current point is taken as optimal
const MAX_HALVINGS: usize = 60;

/// Newton optimizer settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MleOptions {
    /// Stop once the relative change of the mean log-likelihood is below this
    pub tolerance: f64,

    /// Iteration bound
    pub max_iterations: usize,

    /// Shape ceiling; crossing it means the likelihood has no finite maximum
    /// in practice (near-degenerate sample)
    pub max_shape: f64,
}

impl Default for MleOptions {
    fn default() -> Self {
        Self {
            tolerance: MLE_TOLERANCE,
            max_iterations: MLE_MAX_ITERATIONS,
            max_shape: MLE_MAX_SHAPE,
        }
    }
}

/// Fit Beta(alpha, beta) by maximum likelihood
///
/// Starts from the method-of-moments estimate when it exists, otherwise
/// from the uniform Beta(1, 1).
///
/// # Errors
/// * `FitError::EmptySample` - No values
/// * `FitError::FitDidNotConverge` - Iteration bound or shape ceiling hit;
///   carries the best fit found
pub fn fit_mle(sample: &RankSample, options: &MleOptions) -> Result<MleFit, FitError> {
    let summary = SampleSummary::from_sample(sample);
    let start = fit_moments_from_summary(&summary).ok();
    fit_mle_from_summary(&summary, start, options)
}

/// Mean log-likelihood of `params` for a summarized sample
pub fn mean_log_likelihood(params: BetaParameters, summary: &SampleSummary) -> f64 {
    (params.alpha - 1.0) * summary.mean_ln_x + (params.beta - 1.0) * summary.mean_ln_1mx
        - ln_beta(params.alpha, params.beta)
}

pub(crate) fn fit_mle_from_summary(
    summary: &SampleSummary,
    start: Option<BetaParameters>,
    options: &MleOptions,
) -> Result<MleFit, FitError> {
    if summary.n == 0 {
        return Err(FitError::EmptySample);
    }

    let mut current = start
        .filter(|p| p.alpha <= options.max_shape && p.beta <= options.max_shape)
        .unwrap_or(BetaParameters::UNIFORM);
    let mut ll = mean_log_likelihood(current, summary);
    if !ll.is_finite() {
        current = BetaParameters::UNIFORM;
        ll = mean_log_likelihood(current, summary);
    }
    debug!(
        "MLE start: alpha={:.6}, beta={:.6}, mean log-likelihood={:.6}",
        current.alpha, current.beta, ll
    );

    for iteration in 1..=options.max_iterations {
        let Some((d_alpha, d_beta)) = newton_direction(current, summary) else {
            debug!(
                "MLE stopped at iteration {}: no usable Newton direction (alpha={:.6e}, beta={:.6e})",
                iteration, current.alpha, current.beta
            );
            return Ok(MleFit::new(current, ll, iteration - 1));
        };

        let Some((next, next_ll)) = line_search(current, ll, d_alpha, d_beta, summary) else {
            // No ascent within floating-point resolution: current is the optimum
            debug!(
                "MLE stopped at iteration {}: step halving found no ascent (alpha={:.6e}, beta={:.6e})",
                iteration, current.alpha, current.beta
            );
            return Ok(MleFit::new(current, ll, iteration));
        };

        let change = (next_ll - ll).abs() / ll.abs().max(1.0);
        current = next;
        ll = next_ll;

        if current.alpha > options.max_shape || current.beta > options.max_shape {
            warn!(
                "MLE shape parameters exceeded {} after {} iterations (alpha={:.3e}, beta={:.3e})",
                options.max_shape, iteration, current.alpha, current.beta
            );
            return Err(FitError::FitDidNotConverge {
                best: MleFit::new(current, ll, iteration),
            });
        }

        if change < options.tolerance {
            debug!("MLE converged after {} iterations", iteration);
            return Ok(MleFit::new(current, ll, iteration));
        }
    }

    warn!(
        "MLE did not converge within {} iterations",
        options.max_iterations
    );
    Err(FitError::FitDidNotConverge {
        best: MleFit::new(current, ll, options.max_iterations),
    })
}

/// Newton step for the log-likelihood at `p`
///
/// The Hessian of `ln B` is positive definite for positive shapes, so the
/// step `H^-1 g` is an ascent direction.
fn newton_direction(p: BetaParameters, summary: &SampleSummary) -> Option<(f64, f64)> {
    let sum = p.alpha + p.beta;
    let psi_sum = digamma(sum);
    let g_alpha = summary.mean_ln_x - digamma(p.alpha) + psi_sum;
    let g_beta = summary.mean_ln_1mx - digamma(p.beta) + psi_sum;

    if g_alpha == 0.0 && g_beta == 0.0 {
        return None;
    }

    let tri_sum = trigamma(sum);
    let h_aa = trigamma(p.alpha) - tri_sum;
    let h_bb = trigamma(p.beta) - tri_sum;
    let h_ab = -tri_sum;
    let det = h_aa * h_bb - h_ab * h_ab;
    if !(det.is_finite() && det > 0.0) {
        return None;
    }

    let d_alpha = (h_bb * g_alpha - h_ab * g_beta) / det;
    let d_beta = (h_aa * g_beta - h_ab * g_alpha) / det;
    if d_alpha.is_finite() && d_beta.is_finite() {
        Some((d_alpha, d_beta))
    } else {
        None
    }
}

/// Halve the step until both shapes stay positive and the likelihood does
/// not drop
fn line_search(
    current: BetaParameters,
    ll: f64,
    d_alpha: f64,
    d_beta: f64,
    summary: &SampleSummary,
) -> Option<(BetaParameters, f64)> {
    let mut step = 1.0;
    for _ in 0..MAX_HALVINGS {
        let candidate = BetaParameters {
            alpha: current.alpha + step * d_alpha,
            beta: current.beta + step * d_beta,
        };
        if candidate.is_valid() {
            let candidate_ll = mean_log_likelihood(candidate, summary);
            if candidate_ll.is_finite() && candidate_ll >= ll {
                return Some((candidate, candidate_ll));
            }
        }
        step *= 0.5;
    }
    None
}
