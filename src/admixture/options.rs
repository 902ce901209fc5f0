//! Calculation options for the admixture fit.
//!
//! [`CalcOptions`] bundles the convergence tolerance with the L-BFGS settings
//! of the default simplex minimizer. Construction validates everything, so a
//! held `CalcOptions` always builds a working [`SoftmaxLbfgs`].
use crate::optimization::{
    errors::OptResult,
    loglik_optimizer::{validation::verify_tol_grad, LineSearcher},
    simplex::{SoftmaxLbfgs, DEFAULT_MAX_ITER},
};

/// Default convergence tolerance.
pub const DEFAULT_TOLERANCE: f64 = 1e-4;

/// Configuration of one admixture calculation.
///
/// Default:
/// - `tolerance`: `1e-4`
/// - `max_iter`: `500`
/// - `line_searcher`: `MoreThuente`
/// - `lbfgs_mem`: `None` (L-BFGS default of 7)
/// - `verbose`: `false`
#[derive(Debug, Clone, PartialEq)]
pub struct CalcOptions {
    pub tolerance: f64,
    pub max_iter: usize,
    pub line_searcher: LineSearcher,
    pub lbfgs_mem: Option<usize>,
    pub verbose: bool,
}

impl CalcOptions {
    /// # Errors
    /// - [`OptError::InvalidTolGrad`](crate::optimization::errors::OptError::InvalidTolGrad)
    ///   for a non-finite or non-positive `tolerance`.
    /// - Errors from [`SoftmaxLbfgs::new`] for `max_iter` and `lbfgs_mem`.
    pub fn new(
        tolerance: f64, max_iter: usize, line_searcher: LineSearcher, lbfgs_mem: Option<usize>,
        verbose: bool,
    ) -> OptResult<Self> {
        verify_tol_grad(Some(tolerance))?;
        SoftmaxLbfgs::new(max_iter, line_searcher, lbfgs_mem, verbose)?;
        Ok(Self { tolerance, max_iter, line_searcher, lbfgs_mem, verbose })
    }

    /// Default options with a different tolerance.
    pub fn with_tolerance(tolerance: f64) -> OptResult<Self> {
        let base = Self::default();
        Self::new(tolerance, base.max_iter, base.line_searcher, base.lbfgs_mem, base.verbose)
    }

    /// The simplex minimizer these options describe.
    pub fn minimizer(&self) -> OptResult<SoftmaxLbfgs> {
        SoftmaxLbfgs::new(self.max_iter, self.line_searcher, self.lbfgs_mem, self.verbose)
    }
}

impl Default for CalcOptions {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            max_iter: DEFAULT_MAX_ITER,
            line_searcher: LineSearcher::MoreThuente,
            lbfgs_mem: None,
            verbose: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimization::errors::OptError;

    #[test]
    fn defaults_match_documented_values() {
        let opts = CalcOptions::default();
        assert_eq!(opts.tolerance, 1e-4);
        assert_eq!(opts.max_iter, 500);
        assert_eq!(opts.line_searcher, LineSearcher::MoreThuente);
        assert_eq!(opts.lbfgs_mem, None);
        assert!(!opts.verbose);
        assert_eq!(opts.minimizer().expect("valid").max_iter(), 500);
    }

    #[test]
    fn construction_rejects_bad_settings() {
        assert!(matches!(
            CalcOptions::with_tolerance(0.0),
            Err(OptError::InvalidTolGrad { .. })
        ));
        assert!(matches!(
            CalcOptions::with_tolerance(f64::NAN),
            Err(OptError::InvalidTolGrad { .. })
        ));
        assert!(matches!(
            CalcOptions::new(1e-4, 0, LineSearcher::HagerZhang, None, false),
            Err(OptError::InvalidMaxIter { .. })
        ));
        assert!(matches!(
            CalcOptions::new(1e-4, 10, LineSearcher::HagerZhang, Some(0), false),
            Err(OptError::InvalidLBFGSMem { .. })
        ));
    }
}
