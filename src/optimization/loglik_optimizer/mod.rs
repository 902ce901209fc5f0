//! loglik_optimizer — argmin-powered log-likelihood optimizer.
//!
//! Purpose
//! -------
//! Provide an Argmin-backed layer for **maximizing log-likelihoods** `ℓ(θ)`
//! over an unconstrained parameter vector. Callers implement
//! [`LogLikelihood`] and invoke [`maximize`] to run L-BFGS with a
//! configurable line search, tolerances, and a finite-difference fallback
//! for problems without analytic gradients.
//!
//! Key behaviors
//! -------------
//! - Convert `ℓ(θ)` into an Argmin cost `c(θ) = -ℓ(θ)` via
//!   [`adapter::ArgMinAdapter`].
//! - [`maximize`] validates the initial guess with [`LogLikelihood::check`],
//!   selects a solver via [`builders`], runs it (see [`run`]), and
//!   normalizes the result into an [`OptimOutcome`].
//! - Centralize configuration ([`Tolerances`], [`MLEOptions`]) and
//!   validation ([`validation`]).
//!
//! Conventions
//! -----------
//! - Parameters live in unconstrained space as [`Theta`]. Constrained
//!   problems (the admixture simplex) are mapped into this space by the
//!   caller; see `optimization::simplex`.
//! - Gradients returned by [`LogLikelihood::grad`] are `∇ℓ(θ)`; the adapter
//!   flips the sign for the cost.
//! - Errors bubble up as [`OptResult<T>`](crate::optimization::errors::OptResult);
//!   nothing here panics. With `verbose` set, the start point and the
//!   termination reason are logged at `debug` level.
//!
//! Testing notes
//! -------------
//! - Unit tests cover adapter sign conventions and FD fallback, builder
//!   wiring, tolerance validation, and outcome convergence semantics.
//! - Full solves are exercised through the simplex minimizer tests.

pub mod adapter;
pub mod builders;
pub mod run;
pub mod traits;
pub mod types;
pub mod validation;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::run::maximize;
pub use self::traits::{LineSearcher, LogLikelihood, MLEOptions, OptimOutcome, Tolerances};
pub use self::types::{Cost, FnEvalMap, Grad, Theta, DEFAULT_LBFGS_MEM};

pub mod prelude {
    pub use super::run::maximize;
    pub use super::traits::{LineSearcher, LogLikelihood, MLEOptions, OptimOutcome, Tolerances};
    pub use super::types::{Cost, Grad, Theta};
}
