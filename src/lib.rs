//! rust_admixture — maximum-likelihood admixture estimation with Python bindings.
//!
//! Purpose
//! -------
//! Serve as the crate root for Rust callers and as the PyO3 bridge that
//! exposes the admixture calculator to Python via the `_rust_admixture`
//! extension module. Given a user's genotypes and a reference model (SNP
//! panel, major/minor alleles, per-population major-allele frequencies), the
//! crate estimates the fraction of ancestry attributable to each population.
//!
//! Key behaviors
//! -------------
//! - Re-export the core Rust modules: `model` (catalog and data records),
//!   `admixture` (matching, likelihood, fit, assembly) and `optimization`
//!   (L-BFGS stack and simplex minimizer).
//! - Define the `#[pyfunction]`s and the `#[pymodule]` initializer for the
//!   `_rust_admixture` Python extension when `python-bindings` is enabled.
//!
//! Invariants & assumptions
//! ------------------------
//! - All numerical work lives in the inner modules; this file performs only
//!   FFI glue and error mapping.
//! - Rust errors cross the boundary as Python `ValueError`s carrying the
//!   error's `Display` text.
//!
//! Downstream usage
//! ----------------
//! - Rust callers use [`admixture::calc_admix`] or
//!   [`admixture::AdmixCalculator`] with a [`model::ModelRepository`].
//! - Python callers import `_rust_admixture` and call
//!   `calc_admix(genotypes, model_key, model_dir="model", tolerance=1e-4)`.
//!
//! Testing notes
//! -------------
//! - Core behavior is covered by unit tests in the inner modules and by the
//!   integration tests under `tests/`.

pub mod admixture;
pub mod model;
pub mod optimization;
pub mod utils;

#[cfg(feature = "python-bindings")]
use pyo3::{
    prelude::*,
    types::{PyAny, PyDict},
};

#[cfg(feature = "python-bindings")]
use crate::{
    admixture::options::DEFAULT_TOLERANCE,
    model::repository::ModelRepository,
    utils::{admix_result_to_dict, extract_genotypes},
};

/// calc_admix — estimate admixture ratios from Python.
///
/// Parameters
/// ----------
/// - `genotypes`: `dict[str, str]`
///   rsid to genotype token (`"AG"`, `"A"`, ...). Must not be empty.
/// - `model_key`: `str`
///   Catalog key, matched case-insensitively.
/// - `model_dir`: `str`
///   Directory holding `<key>.alleles`, `<key>.F` and optionally
///   `catalog.json`. Defaults to `"model"`.
/// - `tolerance`: `float`
///   Solver convergence tolerance, defaults to `1e-4`.
///
/// Returns
/// -------
/// `dict` with the model description, `snp_count`, `user_match_ratio`,
/// `model_match_ratio`, `converged` and a `populations` list sorted by
/// `ratio`, descending.
///
/// Errors
/// ------
/// - `TypeError` if `genotypes` is not a mapping of strings.
/// - `ValueError` for every calculation error.
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(
    name = "calc_admix",
    signature = (genotypes, model_key, model_dir = "model", tolerance = DEFAULT_TOLERANCE),
    text_signature = "(genotypes, model_key, /, model_dir='model', tolerance=1e-4)"
)]
pub fn py_calc_admix<'py>(
    py: Python<'py>, genotypes: &Bound<'py, PyAny>, model_key: &str, model_dir: &str,
    tolerance: f64,
) -> PyResult<Bound<'py, PyDict>> {
    let user = extract_genotypes(genotypes)?;
    let repository = ModelRepository::open(model_dir)?;
    let result = admixture::calc_admix(&repository, &user, model_key, tolerance)?;
    admix_result_to_dict(py, &result)
}

/// model_keys — list the model keys available under `model_dir`.
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(name = "model_keys", signature = (model_dir = "model"))]
pub fn py_model_keys(model_dir: &str) -> PyResult<Vec<String>> {
    Ok(ModelRepository::open(model_dir)?.model_keys())
}

/// _rust_admixture — PyO3 module initializer for the Python extension.
#[cfg(feature = "python-bindings")]
#[pymodule]
fn _rust_admixture<'py>(_py: Python<'py>, m: &Bound<'py, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(py_calc_admix, m)?)?;
    m.add_function(wrap_pyfunction!(py_model_keys, m)?)?;
    Ok(())
}
