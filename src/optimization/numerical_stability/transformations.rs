//! Numerically stable simplex transforms.
//!
//! A point on the probability simplex `r ∈ Δ^{P−1}` is represented in the
//! optimizer by `P − 1` additive logits `θ`, with the last logit pinned at 0:
//!
//! ```text
//! r = softmax([θ₀, …, θ_{P−2}, 0])
//! ```
//!
//! Every `θ ∈ ℝ^{P−1}` maps to a valid simplex point, so bound and
//! equality constraints hold by construction and the optimizer can run
//! unconstrained. The softmax is evaluated with a max-shift, which keeps
//! `exp` in range for arbitrarily large logits.
//!
//! # Provided items
//! - [`LOGIT_EPS`]: floor applied to simplex coordinates before taking logs.
//! - [`safe_softmax`]: logits → simplex point.
//! - [`simplex_logits`]: simplex point → logits (inverse on the interior).
//! - [`safe_softmax_deriv`]: pulls a gradient w.r.t. `r` back to `θ`.
use ndarray::{Array1, ArrayView1};

use crate::optimization::loglik_optimizer::{Grad, Theta};

/// Floor for simplex coordinates when mapping to logits.
///
/// Boundary points (`r_p = 0`) have no finite logit; they are mapped to
/// `ln(LOGIT_EPS)` relative to the pinned coordinate instead.
pub const LOGIT_EPS: f64 = 1e-12;

/// Map `P − 1` logits to a point on the `P`-simplex.
///
/// The implicit last logit is 0. Uses the max-shift trick, so no
/// intermediate `exp` overflows regardless of the logit magnitudes.
///
/// # Returns
/// An array of length `theta.len() + 1` with non-negative entries summing
/// to 1 (up to rounding).
pub fn safe_softmax(theta: ArrayView1<f64>) -> Array1<f64> {
    let shift = theta.iter().copied().fold(0.0_f64, f64::max);
    let mut out = Array1::<f64>::zeros(theta.len() + 1);
    for (o, &t) in out.iter_mut().zip(theta.iter()) {
        *o = (t - shift).exp();
    }
    out[theta.len()] = (-shift).exp();
    let total = out.sum();
    out /= total;
    out
}

/// Map a simplex point to additive logits relative to its last coordinate.
///
/// `θ_j = ln(max(r_j, ε)) − ln(max(r_{P−1}, ε))` for `j < P − 1`, with
/// `ε = LOGIT_EPS`. On the interior of the simplex this is the exact inverse
/// of [`safe_softmax`].
pub fn simplex_logits(ratio: ArrayView1<f64>) -> Theta {
    let n = ratio.len();
    if n == 0 {
        return Theta::zeros(0);
    }
    let anchor = ratio[n - 1].max(LOGIT_EPS).ln();
    ratio.iter().take(n - 1).map(|&r| r.max(LOGIT_EPS).ln() - anchor).collect()
}

/// Jacobian-transpose product of the pinned softmax.
///
/// Given `r = safe_softmax(θ)` and `g = ∂f/∂r`, returns `∂f/∂θ` with
///
/// ```text
/// ∂f/∂θ_j = r_j · (g_j − Σ_k r_k g_k),   j < P − 1
/// ```
///
/// `ratio` and `grad_ratio` must have the same length `P ≥ 1`.
pub fn safe_softmax_deriv(ratio: ArrayView1<f64>, grad_ratio: ArrayView1<f64>) -> Grad {
    let mean = ratio.dot(&grad_ratio);
    let n = ratio.len().saturating_sub(1);
    ratio
        .iter()
        .zip(grad_ratio.iter())
        .take(n)
        .map(|(&r, &g)| r * (g - mean))
        .collect()
}
