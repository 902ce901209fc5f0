//! optimization — L-BFGS stack, simplex transforms, and unified error surface.
//!
//! Purpose
//! -------
//! Provide the numerical layer behind the admixture fit: an Argmin-backed
//! log-likelihood optimizer, stable simplex ↔ logit transforms, a
//! simplex-constrained minimizer built on both, and a single error/result
//! surface. Callers describe a loss over mixture proportions and get a
//! feasible minimizer back without touching solver details.
//!
//! Key behaviors
//! -------------
//! - `loglik_optimizer`: **maximize** an unconstrained log-likelihood `ℓ(θ)`
//!   with L-BFGS (More–Thuente or Hager–Zhang line search), tolerances, and
//!   a finite-difference gradient fallback.
//! - `numerical_stability`: pinned-softmax map from `P − 1` logits to the
//!   `P`-simplex, its inverse, and the gradient pull-back.
//! - `simplex`: `SimplexObjective` / `SimplexMinimizer` and the default
//!   `SoftmaxLbfgs` implementation.
//! - `errors`: configuration issues, numerical failures, and backend solver
//!   errors normalized into `OptError` with the `OptResult<T>` alias.
//!
//! Invariants & assumptions
//! ------------------------
//! - Optimizers run in an unconstrained space `θ`; feasibility of simplex
//!   points is guaranteed by the softmax map rather than by projection.
//! - Invalid inputs are reported as `OptError`, never as panics.
//! - A solve counts as converged only when the solver stops on its own
//!   criteria; hitting the iteration cap does not.
//!
//! Conventions
//! -----------
//! - Solvers maximize `ℓ(θ)` by minimizing `c(θ) = -ℓ(θ)`. Simplex losses
//!   are minimized, so the simplex layer sets `ℓ = −loss`.
//! - Parameters and gradients are `ndarray` aliases (`Theta`, `Grad`).
//! - This module and its submodules avoid I/O and logging; the admixture
//!   layer reports non-convergence.
//!
//! Downstream usage
//! ----------------
//! - The admixture fit implements `SimplexObjective` for its binomial loss
//!   and calls `SoftmaxLbfgs::minimize` from the uniform mixture.
//! - Front-ends may import `optimization::prelude::*`.
//!
//! Testing notes
//! -------------
//! - `loglik_optimizer`: adapter sign conventions, FD fallback, builder
//!   wiring, tolerance validation, convergence semantics.
//! - `numerical_stability`: overflow safety, round trips, gradient
//!   pull-back against finite differences.
//! - `simplex`: start validation and full solves on toy cross-entropy
//!   objectives with and without analytic gradients.
//! - `errors`: conversions from Argmin errors into `OptError`.

pub mod errors;
pub mod loglik_optimizer;
pub mod numerical_stability;
pub mod simplex;

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use rust_admixture::optimization::prelude::*;
//
// to import the main optimization surface in a single line.

pub mod prelude {
    pub use super::errors::{OptError, OptResult};
    pub use super::loglik_optimizer::prelude::*;
    pub use super::numerical_stability::prelude::*;
    pub use super::simplex::prelude::*;
}
