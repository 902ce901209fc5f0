//! End-to-end admixture calculation.
//!
//! Pipeline per request:
//! 1. reject an empty user mapping,
//! 2. copy the model metadata and check it lists populations,
//! 3. load the model records and check their population count,
//! 4. count user alleles against the reference panel,
//! 5. fit the ratio vector on the simplex,
//! 6. merge ratios and coverage into the metadata copy.
//!
//! Every step either succeeds or returns a [`CalcError`]; no partial result
//! is produced. Non-convergence in step 5 is reported through
//! `AdmixResult::converged`, not as an error.
use std::{collections::HashMap, hash::BuildHasher, path::PathBuf};

use tracing::{debug, info};

use crate::{
    admixture::{
        errors::{CalcError, CalcResult},
        fit::fit_admixture,
        genotype::match_genotypes,
        options::CalcOptions,
        result::{assemble, AdmixResult},
    },
    model::repository::ModelRepository,
};

/// A model repository paired with calculation options.
#[derive(Debug, Clone, PartialEq)]
pub struct AdmixCalculator {
    repository: ModelRepository,
    options: CalcOptions,
}

impl AdmixCalculator {
    pub fn new(repository: ModelRepository, options: CalcOptions) -> Self {
        Self { repository, options }
    }

    /// Open the repository at `root` with default options.
    ///
    /// # Errors
    /// - Catalog errors from [`ModelRepository::open`].
    pub fn open(root: impl Into<PathBuf>) -> CalcResult<Self> {
        Ok(Self::new(ModelRepository::open(root)?, CalcOptions::default()))
    }

    pub fn repository(&self) -> &ModelRepository {
        &self.repository
    }

    pub fn options(&self) -> &CalcOptions {
        &self.options
    }

    /// Estimate the admixture ratios of `user` under model `model_key`.
    ///
    /// `user` maps rsid to a genotype token (see
    /// [`resolve_alleles`](crate::admixture::genotype::resolve_alleles)).
    ///
    /// # Errors
    /// - [`CalcError::NoValidUserSNPs`] if `user` is empty.
    /// - [`CalcError::Model`] for unknown keys and data-file problems.
    /// - [`CalcError::NoPopulationsDefined`] if the metadata lists none.
    /// - [`CalcError::PopulationCountMismatch`] if the frequency columns do
    ///   not match the metadata populations.
    /// - [`CalcError::Optimizer`] for invalid solver settings.
    pub fn calc_admix<S: BuildHasher>(
        &self, user: &HashMap<String, String, S>, model_key: &str,
    ) -> CalcResult<AdmixResult> {
        if user.is_empty() {
            return Err(CalcError::NoValidUserSNPs);
        }

        let metadata = self.repository.get_metadata(model_key)?;
        let populations = metadata.population_count();
        if populations == 0 {
            return Err(CalcError::NoPopulationsDefined { key: metadata.key });
        }

        let data = self.repository.get_model_data(&metadata.key)?;
        if data.population_count() != populations {
            return Err(CalcError::PopulationCountMismatch {
                expected: populations,
                found: data.population_count(),
            });
        }

        let counts = match_genotypes(user, &data.rsids, &data.major, &data.minor)?;
        debug!(
            model = %metadata.key,
            matched = counts.matched,
            model_match_ratio = counts.model_match_ratio,
            user_match_ratio = counts.user_match_ratio,
            "matched user genotypes"
        );

        let minimizer = self.options.minimizer()?;
        let fit = fit_admixture(
            counts.major.view(),
            counts.minor.view(),
            data.frequency.view(),
            self.options.tolerance,
            &minimizer,
        )?;
        info!(
            model = %metadata.key,
            snps = data.snp_count(),
            converged = fit.converged,
            iterations = fit.iterations,
            "admixture fit finished"
        );

        assemble(
            metadata,
            fit.ratio.view(),
            data.snp_count(),
            counts.model_match_ratio,
            counts.user_match_ratio,
            fit.converged,
        )
    }
}

/// One-shot calculation with default options and the given `tolerance`.
///
/// # Errors
/// - As [`AdmixCalculator::calc_admix`].
/// - [`CalcError::Optimizer`] for an invalid `tolerance`.
pub fn calc_admix<S: BuildHasher>(
    repository: &ModelRepository, user: &HashMap<String, String, S>, model_key: &str,
    tolerance: f64,
) -> CalcResult<AdmixResult> {
    let options = CalcOptions::with_tolerance(tolerance)?;
    AdmixCalculator::new(repository.clone(), options).calc_admix(user, model_key)
}
