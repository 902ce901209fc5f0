//! numerical_stability — transforms between constrained and optimizer space.
//!
//! Purpose
//! -------
//! Keep the simplex ↔ logit mapping in one place so the optimizer can run
//! unconstrained while every evaluated mixture stays a valid probability
//! vector.
//!
//! Key behaviors
//! -------------
//! - `safe_softmax`: max-shifted softmax from `P − 1` logits (last one
//!   pinned at 0) to a `P`-simplex point.
//! - `simplex_logits`: the inverse on interior points, flooring zero
//!   coordinates at `LOGIT_EPS`.
//! - `safe_softmax_deriv`: Jacobian-transpose product used to push
//!   gradients w.r.t. mixture ratios back to logit space.
//!
//! Conventions
//! -----------
//! - Pure functions over `ndarray` views; no logging, no I/O.
//! - Shape checks live with the callers (simplex minimizer).

pub mod transformations;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::transformations::{safe_softmax, safe_softmax_deriv, simplex_logits, LOGIT_EPS};

pub mod prelude {
    pub use super::transformations::{
        safe_softmax, safe_softmax_deriv, simplex_logits, LOGIT_EPS,
    };
}
