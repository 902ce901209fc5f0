//! Objectives defined on the probability simplex and their logit-space view.
use ndarray::{Array1, ArrayView1};

use crate::optimization::{
    errors::{OptError, OptResult},
    loglik_optimizer::{validation::validate_theta, Grad, LogLikelihood, Theta},
    numerical_stability::{safe_softmax, safe_softmax_deriv},
};

/// A loss to be **minimized** over the probability simplex.
///
/// Implementors see only mixture vectors `r` with `r_p ∈ [0, 1]` and
/// `Σ r_p = 1`; how the solver keeps iterates feasible is not their concern.
///
/// Required:
/// - `dim()`: number of simplex coordinates `P ≥ 1`.
/// - `loss(r)`: scalar loss at `r`.
///
/// Optional:
/// - `loss_grad(r)`: `∂loss/∂r` (length `P`). The default reports
///   `GradientNotImplemented`, which makes the solver fall back to finite
///   differences.
pub trait SimplexObjective {
    fn dim(&self) -> usize;
    fn loss(&self, ratio: ArrayView1<f64>) -> f64;

    fn loss_grad(&self, _ratio: ArrayView1<f64>) -> OptResult<Array1<f64>> {
        Err(OptError::GradientNotImplemented)
    }
}

/// Logit-space log-likelihood `ℓ(θ) = −loss(softmax([θ, 0])) / scale`.
///
/// Wraps a [`SimplexObjective`] so it can be handed to
/// [`maximize`](crate::optimization::loglik_optimizer::maximize). A positive
/// `scale` leaves the optimum unchanged; it keeps the first quasi-Newton
/// step in a range where the softmax is not saturated when the loss sums
/// over many observations.
#[derive(Debug)]
pub struct SoftmaxLogLik<'o, O: SimplexObjective> {
    objective: &'o O,
    scale: f64,
}

impl<'o, O: SimplexObjective> SoftmaxLogLik<'o, O> {
    pub fn new(objective: &'o O) -> Self {
        Self { objective, scale: 1.0 }
    }

    /// # Errors
    /// - [`OptError::InvalidLossScale`] if `scale` is not finite and positive.
    pub fn scaled(objective: &'o O, scale: f64) -> OptResult<Self> {
        if !scale.is_finite() || scale <= 0.0 {
            return Err(OptError::InvalidLossScale { scale });
        }
        Ok(Self { objective, scale })
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Number of free logits, `P − 1`.
    pub fn free_dim(&self) -> usize {
        self.objective.dim().saturating_sub(1)
    }
}

impl<'o, O: SimplexObjective> LogLikelihood for SoftmaxLogLik<'o, O> {
    type Data = ();

    fn value(&self, theta: &Theta, _data: &()) -> OptResult<f64> {
        let ratio = safe_softmax(theta.view());
        Ok(-self.objective.loss(ratio.view()) / self.scale)
    }

    fn check(&self, theta: &Theta, _data: &()) -> OptResult<()> {
        validate_theta(theta, self.free_dim())
    }

    fn grad(&self, theta: &Theta, _data: &()) -> OptResult<Grad> {
        let ratio = safe_softmax(theta.view());
        let grad_ratio = self.objective.loss_grad(ratio.view())?;
        if grad_ratio.len() != ratio.len() {
            return Err(OptError::GradientDimMismatch {
                expected: ratio.len(),
                found: grad_ratio.len(),
            });
        }
        Ok(-safe_softmax_deriv(ratio.view(), grad_ratio.view()) / self.scale)
    }
}
