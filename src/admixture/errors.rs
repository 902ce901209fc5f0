//! Errors for the admixture calculation (input checks, model/metadata
//! consistency, and wrapped lower-layer failures).
//!
//! [`CalcError`] wraps [`ModelError`] and [`OptError`] so a single `?` chain
//! runs from file loading through the fit. Optimizer non-convergence is not
//! an error; see `admixture::fit`.
#[cfg(feature = "python-bindings")]
use pyo3::{exceptions::PyValueError, PyErr};

use crate::{model::errors::ModelError, optimization::errors::OptError};

/// Result alias for admixture calculations.
pub type CalcResult<T> = Result<T, CalcError>;

#[derive(Debug, Clone, PartialEq)]
pub enum CalcError {
    // ---- Inputs ----
    /// The user genotype mapping is empty.
    NoValidUserSNPs,

    // ---- Model consistency ----
    /// The model metadata lists no populations.
    NoPopulationsDefined { key: String },

    /// Frequency columns or ratio length disagree with the population count.
    PopulationCountMismatch { expected: usize, found: usize },

    /// SNP-indexed arrays handed to the likelihood have different lengths.
    SnpCountMismatch { what: &'static str, expected: usize, found: usize },

    // ---- Wrapped ----
    Model(ModelError),
    Optimizer(OptError),
}

impl std::error::Error for CalcError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CalcError::Model(err) => Some(err),
            CalcError::Optimizer(err) => Some(err),
            _ => None,
        }
    }
}

impl std::fmt::Display for CalcError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CalcError::NoValidUserSNPs => {
                write!(f, "User genotype data contains no valid SNPs.")
            }
            CalcError::NoPopulationsDefined { key } => {
                write!(f, "Model '{key}' defines no populations.")
            }
            CalcError::PopulationCountMismatch { expected, found } => {
                write!(
                    f,
                    "Population count mismatch: metadata lists {expected}, data provides {found}"
                )
            }
            CalcError::SnpCountMismatch { what, expected, found } => {
                write!(f, "{what} has {found} SNP rows; expected {expected}")
            }
            CalcError::Model(err) => write!(f, "{err}"),
            CalcError::Optimizer(err) => write!(f, "Optimizer error: {err}"),
        }
    }
}

impl From<ModelError> for CalcError {
    fn from(err: ModelError) -> CalcError {
        CalcError::Model(err)
    }
}

impl From<OptError> for CalcError {
    fn from(err: OptError) -> CalcError {
        CalcError::Optimizer(err)
    }
}

/// Convert a [`CalcError`] into a Python `ValueError` with the error message.
#[cfg(feature = "python-bindings")]
impl From<CalcError> for PyErr {
    fn from(err: CalcError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn lower_layer_errors_convert_and_keep_their_source() {
        let err: CalcError = ModelError::EmptyDataFile { key: "wbbc".into() }.into();
        assert!(matches!(err, CalcError::Model(ModelError::EmptyDataFile { .. })));
        assert!(err.source().is_some());
        assert_eq!(err.to_string(), "Model 'wbbc' has no SNP rows in its data files.");

        let err: CalcError = OptError::EmptySimplex.into();
        assert!(matches!(err, CalcError::Optimizer(OptError::EmptySimplex)));
    }
}
