//! simplex — minimization over the probability simplex.
//!
//! Purpose
//! -------
//! Fit mixture proportions `r ∈ Δ^{P−1}` (non-negative, summing to 1) by
//! minimizing a caller-supplied loss. Callers implement
//! [`SimplexObjective`] and hand it to a [`SimplexMinimizer`].
//!
//! Key behaviors
//! -------------
//! - [`SoftmaxLbfgs`] reparameterizes `r = softmax([θ, 0])` and maximizes
//!   `−loss` with the crate's L-BFGS driver. Every iterate is feasible.
//! - Analytic `∂loss/∂r` is pulled back to logit space; objectives without
//!   it get a finite-difference gradient.
//! - The loss is rescaled before it reaches L-BFGS, and a stopped run is
//!   accepted only if its Frank–Wolfe gap ([`optimality_gap`]) is small;
//!   otherwise it is restarted nearer the centroid.
//! - `P = 1` is solved directly as `[1.0]`.
//!
//! Invariants
//! ----------
//! - Returned solutions are on the simplex up to rounding.
//! - Only invalid inputs produce `Err`; runtime solver failures come back as
//!   `SimplexMinimum { converged: false, .. }` holding the last point
//!   reached.

pub mod minimizer;
pub mod objective;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::minimizer::{
    optimality_gap, validate_simplex_point, SimplexMinimizer, SimplexMinimum, SoftmaxLbfgs,
    DEFAULT_MAX_ITER, MAX_RESTARTS, OPTIMALITY_GAP_TOL, SIMPLEX_SUM_TOL,
};
pub use self::objective::{SimplexObjective, SoftmaxLogLik};

pub mod prelude {
    pub use super::minimizer::{SimplexMinimizer, SimplexMinimum, SoftmaxLbfgs};
    pub use super::objective::SimplexObjective;
}
