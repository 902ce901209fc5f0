//! Conversions between Python objects and the admixture API.
#[cfg(feature = "python-bindings")]
use std::collections::HashMap;

#[cfg(feature = "python-bindings")]
use pyo3::{
    exceptions::PyTypeError,
    prelude::*,
    types::{PyAny, PyDict, PyList},
};

#[cfg(feature = "python-bindings")]
use crate::admixture::result::AdmixResult;

/// Extract an `rsid -> genotype` mapping from any Python mapping of strings.
#[cfg(feature = "python-bindings")]
pub fn extract_genotypes(raw: &Bound<'_, PyAny>) -> PyResult<HashMap<String, String>> {
    raw.extract::<HashMap<String, String>>().map_err(|_| {
        PyTypeError::new_err("genotypes must be a dict mapping rsid (str) to genotype (str)")
    })
}

/// Build the Python `dict` returned by `calc_admix`.
///
/// Keys mirror the fields of [`AdmixResult`]; `populations` is a list of
/// dicts already sorted by `ratio`, descending.
#[cfg(feature = "python-bindings")]
pub fn admix_result_to_dict<'py>(
    py: Python<'py>, result: &AdmixResult,
) -> PyResult<Bound<'py, PyDict>> {
    let out = PyDict::new(py);
    out.set_item("key", &result.key)?;
    out.set_item("name", &result.name)?;
    out.set_item("localized_name", &result.localized_name)?;
    out.set_item("description", &result.description)?;
    out.set_item("localized_description", &result.localized_description)?;
    out.set_item("snp_count", result.snp_count)?;
    out.set_item("user_match_ratio", result.user_match_ratio)?;
    out.set_item("model_match_ratio", result.model_match_ratio)?;
    out.set_item("converged", result.converged)?;

    let populations = PyList::empty(py);
    for population in &result.populations {
        let entry = PyDict::new(py);
        entry.set_item("name", &population.name)?;
        entry.set_item("localized_name", &population.localized_name)?;
        entry.set_item("description", &population.description)?;
        entry.set_item("localized_description", &population.localized_description)?;
        entry.set_item("ratio", population.ratio)?;
        populations.append(entry)?;
    }
    out.set_item("populations", populations)?;
    Ok(out)
}
