//! admixture — genotype matching, likelihood, fit, and result assembly.
//!
//! Purpose
//! -------
//! Estimate the fraction of a user's ancestry attributable to each reference
//! population of a model by constrained maximum likelihood.
//!
//! Key behaviors
//! -------------
//! - [`genotype`]: count major/minor alleles of the user at each reference
//!   SNP and report coverage in both directions; optional autosomal
//!   pre-filter for raw genotype calls.
//! - [`likelihood`]: binomial mixture loss and its analytic gradient,
//!   exposed to the solver as [`AdmixLoss`].
//! - [`fit`]: simplex-constrained minimization from the uniform mixture,
//!   degrading to zero ratios on non-convergence.
//! - [`result`]: attach ratios and coverage to a metadata copy and sort.
//! - [`calculator`]: the full pipeline behind [`calc_admix`].
//!
//! Invariants
//! ----------
//! - Converged ratios lie on the probability simplex; non-converged ones are
//!   all zero and flagged with `converged == false`.
//! - Identical inputs give identical results.
//!
//! Conventions
//! -----------
//! - Errors surface as [`CalcError`], which wraps model and optimizer
//!   errors.
//! - Match statistics and solver summaries are logged with `tracing`
//!   (`debug`/`info`); degraded fits log a `warn`.

pub mod calculator;
pub mod errors;
pub mod fit;
pub mod genotype;
pub mod likelihood;
pub mod options;
pub mod result;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::calculator::{calc_admix, AdmixCalculator};
pub use self::errors::{CalcError, CalcResult};
pub use self::fit::{fit_admixture, FitOutcome};
pub use self::genotype::{
    autosomal_genotypes, match_genotypes, resolve_alleles, GenotypeCall, GenotypeCounts,
};
pub use self::likelihood::{loss, loss_gradient, AdmixLoss};
pub use self::options::{CalcOptions, DEFAULT_TOLERANCE};
pub use self::result::{assemble, AdmixResult, PopulationRatio};

pub mod prelude {
    pub use super::calculator::{calc_admix, AdmixCalculator};
    pub use super::errors::{CalcError, CalcResult};
    pub use super::genotype::{autosomal_genotypes, GenotypeCall};
    pub use super::options::CalcOptions;
    pub use super::result::{AdmixResult, PopulationRatio};
}
