//! Simplex-constrained minimizers.
//!
//! [`SimplexMinimizer`] is the seam between the admixture fit and the
//! numerical back end. The shipped implementation, [`SoftmaxLbfgs`], runs
//! the crate's L-BFGS `maximize` in pinned-softmax logit space, so bounds
//! and the unit-sum constraint hold for every iterate.
//!
//! L-BFGS stopping in logit space does not prove optimality on the simplex:
//! near a vertex the softmax saturates and the logit gradient vanishes even
//! when moving mass to another coordinate would lower the loss. A run is
//! therefore accepted only when the Frank–Wolfe gap
//! `Σ_p r_p g_p − min_p g_p` (with `g = ∂loss/∂r`, per unit of the loss
//! scale) is small. The loss is convex for the admixture objective, so the
//! gap bounds the distance to the optimal loss.
use finitediff::FiniteDiff;
use ndarray::{array, Array1, ArrayView1};

use crate::optimization::{
    errors::{OptError, OptResult},
    loglik_optimizer::{
        maximize, validation::verify_tol_grad, LineSearcher, MLEOptions, Tolerances,
    },
    numerical_stability::{safe_softmax, simplex_logits},
    simplex::objective::{SimplexObjective, SoftmaxLogLik},
};

/// Allowed deviation of `Σ r_p` from 1 for a starting point.
pub const SIMPLEX_SUM_TOL: f64 = 1e-9;

/// Default iteration cap for [`SoftmaxLbfgs`].
pub const DEFAULT_MAX_ITER: usize = 500;

/// Largest Frank–Wolfe gap, per unit of loss scale, accepted as optimal
/// (raised to the run tolerance when that is larger).
pub const OPTIMALITY_GAP_TOL: f64 = 1e-3;

/// L-BFGS reruns allowed after a run stops short of the optimum.
pub const MAX_RESTARTS: usize = 3;

/// Weight of the centroid in a restart point.
const RESTART_PULL: f64 = 0.5;

/// Factor applied to the run tolerance on each restart.
const RESTART_TIGHTEN: f64 = 0.1;

/// Result of a simplex minimization.
///
/// - `solution`: final simplex point (the last feasible point when the run
///   failed).
/// - `converged`: solver declared convergence at a point that passed the
///   optimality check.
/// - `status`: termination reason or the runtime error message.
/// - `iterations`: iterations performed, summed over restarts.
/// - `loss`: objective value at `solution`.
#[derive(Debug, Clone, PartialEq)]
pub struct SimplexMinimum {
    pub solution: Array1<f64>,
    pub converged: bool,
    pub status: String,
    pub iterations: usize,
    pub loss: f64,
}

/// Minimize a [`SimplexObjective`] from a feasible starting point.
///
/// `tolerance` is the solver's convergence tolerance.
///
/// # Errors
/// Implementations return `Err` only for invalid inputs (empty simplex,
/// infeasible start, bad tolerance). Failures during the run are reported
/// through `SimplexMinimum::converged == false`.
pub trait SimplexMinimizer {
    fn minimize<O: SimplexObjective>(
        &self, objective: &O, start: ArrayView1<f64>, tolerance: f64,
    ) -> OptResult<SimplexMinimum>;
}

/// L-BFGS over `P − 1` softmax logits.
///
/// The loss is divided by `max(|loss(start)|, 1)` before it reaches the
/// solver. `tolerance` bounds the logit gradient norm of that scaled loss
/// and, in the objective's own units, the per-iteration cost change. A run
/// that stops on those criteria but fails the optimality gap check is
/// restarted from a point pulled halfway towards the centroid with a ten
/// times tighter tolerance, at most [`MAX_RESTARTS`] times.
#[derive(Debug, Clone, PartialEq)]
pub struct SoftmaxLbfgs {
    max_iter: usize,
    line_searcher: LineSearcher,
    lbfgs_mem: Option<usize>,
    verbose: bool,
}

impl SoftmaxLbfgs {
    /// # Errors
    /// - [`OptError::InvalidMaxIter`] if `max_iter == 0`.
    /// - [`OptError::InvalidLBFGSMem`] if `lbfgs_mem == Some(0)`.
    pub fn new(
        max_iter: usize, line_searcher: LineSearcher, lbfgs_mem: Option<usize>, verbose: bool,
    ) -> OptResult<Self> {
        let tols = Tolerances::new(None, None, Some(max_iter))?;
        MLEOptions::new(tols, line_searcher, verbose, lbfgs_mem)?;
        Ok(Self { max_iter, line_searcher, lbfgs_mem, verbose })
    }

    pub fn max_iter(&self) -> usize {
        self.max_iter
    }

    fn options(&self, tolerance: f64, scale: f64) -> OptResult<MLEOptions> {
        let tols = Tolerances::new(Some(tolerance), Some(tolerance / scale), Some(self.max_iter))?;
        MLEOptions::new(tols, self.line_searcher, self.verbose, self.lbfgs_mem)
    }
}

impl Default for SoftmaxLbfgs {
    fn default() -> Self {
        Self {
            max_iter: DEFAULT_MAX_ITER,
            line_searcher: LineSearcher::MoreThuente,
            lbfgs_mem: None,
            verbose: false,
        }
    }
}

impl SimplexMinimizer for SoftmaxLbfgs {
    fn minimize<O: SimplexObjective>(
        &self, objective: &O, start: ArrayView1<f64>, tolerance: f64,
    ) -> OptResult<SimplexMinimum> {
        let dim = objective.dim();
        if dim == 0 {
            return Err(OptError::EmptySimplex);
        }
        validate_simplex_point(start, dim)?;
        verify_tol_grad(Some(tolerance))?;

        if dim == 1 {
            let solution = array![1.0];
            let loss = objective.loss(solution.view());
            return Ok(SimplexMinimum {
                solution,
                converged: true,
                status: "Trivial simplex".to_string(),
                iterations: 0,
                loss,
            });
        }

        let scale = loss_scale(objective, start);
        let problem = SoftmaxLogLik::scaled(objective, scale)?;
        let gap_tol = OPTIMALITY_GAP_TOL.max(tolerance);

        let mut point = start.to_owned();
        let mut last = start.to_owned();
        let mut iterations = 0;
        let mut gap = f64::INFINITY;
        let mut run_tol = tolerance;
        for _ in 0..=MAX_RESTARTS {
            let opts = self.options(run_tol, scale)?;
            let outcome = match maximize(&problem, simplex_logits(point.view()), &(), &opts) {
                Ok(outcome) => outcome,
                Err(err) => {
                    return Ok(SimplexMinimum {
                        loss: objective.loss(point.view()),
                        solution: point,
                        converged: false,
                        status: err.to_string(),
                        iterations,
                    });
                }
            };
            iterations += outcome.iterations;
            let solution = safe_softmax(outcome.theta_hat.view());
            let loss = objective.loss(solution.view());
            if !outcome.converged {
                return Ok(SimplexMinimum {
                    solution,
                    converged: false,
                    status: outcome.status,
                    iterations,
                    loss,
                });
            }

            gap = match optimality_gap(objective, solution.view()) {
                Ok(value) => value / scale,
                Err(err) => {
                    return Ok(SimplexMinimum {
                        solution,
                        converged: false,
                        status: err.to_string(),
                        iterations,
                        loss,
                    });
                }
            };
            if gap <= gap_tol {
                return Ok(SimplexMinimum {
                    solution,
                    converged: true,
                    status: outcome.status,
                    iterations,
                    loss,
                });
            }
            point = solution.mapv(|r| (1.0 - RESTART_PULL) * r + RESTART_PULL / dim as f64);
            last = solution;
            run_tol *= RESTART_TIGHTEN;
        }

        Ok(SimplexMinimum {
            loss: objective.loss(last.view()),
            solution: last,
            converged: false,
            status: format!(
                "Optimality gap {gap:.3e} above {gap_tol:.3e} after {MAX_RESTARTS} restarts"
            ),
            iterations,
        })
    }
}

/// Frank–Wolfe gap `Σ_p r_p g_p − min_p g_p` of `objective` at `ratio`.
///
/// Uses `loss_grad` when implemented, central differences otherwise. A
/// non-finite gradient yields an infinite gap.
///
/// # Errors
/// - Errors from `loss_grad` other than `GradientNotImplemented`.
/// - [`OptError::GradientDimMismatch`] for a gradient of the wrong length.
pub fn optimality_gap<O: SimplexObjective>(
    objective: &O, ratio: ArrayView1<f64>,
) -> OptResult<f64> {
    let grad = match objective.loss_grad(ratio) {
        Ok(grad) => grad,
        Err(OptError::GradientNotImplemented) => {
            ratio.to_owned().central_diff(&|r: &Array1<f64>| objective.loss(r.view()))
        }
        Err(err) => return Err(err),
    };
    if grad.len() != ratio.len() {
        return Err(OptError::GradientDimMismatch { expected: ratio.len(), found: grad.len() });
    }
    if grad.iter().any(|g| !g.is_finite()) {
        return Ok(f64::INFINITY);
    }
    let smallest = grad.iter().copied().fold(f64::INFINITY, f64::min);
    Ok((ratio.dot(&grad) - smallest).max(0.0))
}

fn loss_scale<O: SimplexObjective>(objective: &O, start: ArrayView1<f64>) -> f64 {
    let value = objective.loss(start).abs();
    if value.is_finite() {
        value.max(1.0)
    } else {
        1.0
    }
}

/// Check that `point` lies on the `dim`-simplex.
///
/// # Errors
/// - [`OptError::StartDimMismatch`] on a length mismatch.
/// - [`OptError::InvalidStartPoint`] for a non-finite or out-of-range
///   coordinate, or when the coordinates do not sum to 1 within
///   [`SIMPLEX_SUM_TOL`] (reported at index `dim`).
pub fn validate_simplex_point(point: ArrayView1<f64>, dim: usize) -> OptResult<()> {
    if point.len() != dim {
        return Err(OptError::StartDimMismatch { expected: dim, found: point.len() });
    }
    for (index, &value) in point.iter().enumerate() {
        if !value.is_finite() {
            return Err(OptError::InvalidStartPoint {
                index,
                value,
                reason: "Coordinates must be finite.",
            });
        }
        if !(0.0..=1.0).contains(&value) {
            return Err(OptError::InvalidStartPoint {
                index,
                value,
                reason: "Coordinates must lie in [0, 1].",
            });
        }
    }
    let total = point.sum();
    if (total - 1.0).abs() > SIMPLEX_SUM_TOL {
        return Err(OptError::InvalidStartPoint {
            index: dim,
            value: total,
            reason: "Coordinates must sum to 1.",
        });
    }
    Ok(())
}
