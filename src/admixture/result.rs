//! Merge fitted ratios into model metadata.
use ndarray::ArrayView1;
use serde::Serialize;

use crate::{
    admixture::errors::{CalcError, CalcResult},
    model::metadata::ModelMetadata,
};

/// One population of the result with its fitted share.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PopulationRatio {
    pub name: String,
    pub localized_name: String,
    pub description: String,
    pub localized_description: String,
    pub ratio: f64,
}

/// Enriched model description returned to the caller.
///
/// `populations` is sorted by `ratio`, descending; ties keep catalog order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdmixResult {
    pub key: String,
    pub name: String,
    pub localized_name: String,
    pub description: String,
    pub localized_description: String,
    pub snp_count: usize,
    pub user_match_ratio: f64,
    pub model_match_ratio: f64,
    pub converged: bool,
    pub populations: Vec<PopulationRatio>,
}

/// Attach `ratio[i]` to `metadata.populations[i]`, add coverage statistics
/// and sort populations by ratio.
///
/// Consumes the caller's metadata copy; the catalog is never touched.
///
/// # Errors
/// - [`CalcError::PopulationCountMismatch`] if `ratio.len()` differs from the
///   number of populations.
pub fn assemble(
    metadata: ModelMetadata, ratio: ArrayView1<f64>, snp_count: usize, model_match_ratio: f64,
    user_match_ratio: f64, converged: bool,
) -> CalcResult<AdmixResult> {
    if ratio.len() != metadata.populations.len() {
        return Err(CalcError::PopulationCountMismatch {
            expected: metadata.populations.len(),
            found: ratio.len(),
        });
    }

    let mut populations: Vec<PopulationRatio> = metadata
        .populations
        .into_iter()
        .zip(ratio.iter())
        .map(|(p, &ratio)| PopulationRatio {
            name: p.name,
            localized_name: p.localized_name,
            description: p.description,
            localized_description: p.localized_description,
            ratio,
        })
        .collect();
    populations.sort_by(|a, b| b.ratio.total_cmp(&a.ratio));

    Ok(AdmixResult {
        key: metadata.key,
        name: metadata.name,
        localized_name: metadata.localized_name,
        description: metadata.description,
        localized_description: metadata.localized_description,
        snp_count,
        user_match_ratio,
        model_match_ratio,
        converged,
        populations,
    })
}
