//! Constrained fit of the admixture ratio vector.
//!
//! Minimizes the binomial mixture loss over the probability simplex,
//! starting from the uniform mixture `1/P`. A converged run returns the
//! solver optimum. Anything else degrades to an all-zero ratio vector with
//! `converged == false`; callers can tell the two apart without an error
//! path.
use ndarray::{Array1, ArrayView1, ArrayView2};
use tracing::{debug, warn};

use crate::{
    admixture::{errors::CalcResult, likelihood::AdmixLoss},
    optimization::simplex::SimplexMinimizer,
};

/// Fitted ratios plus solver diagnostics.
///
/// - `ratio`: length `P`; on the simplex when `converged`, all zeros
///   otherwise.
/// - `status`: solver termination reason or runtime error text.
/// - `loss`: loss at the solver's final point.
#[derive(Debug, Clone, PartialEq)]
pub struct FitOutcome {
    pub ratio: Array1<f64>,
    pub converged: bool,
    pub status: String,
    pub iterations: usize,
    pub loss: f64,
}

/// Fit the admixture ratios for the given allele counts.
///
/// # Errors
/// - [`CalcError::SnpCountMismatch`](crate::admixture::CalcError::SnpCountMismatch)
///   if the counts are not aligned with `frequency`.
/// - [`CalcError::Optimizer`](crate::admixture::CalcError::Optimizer) for
///   invalid solver inputs: zero populations or a bad `tolerance`.
pub fn fit_admixture<'a, M: SimplexMinimizer>(
    major_count: ArrayView1<'a, f64>, minor_count: ArrayView1<'a, f64>,
    frequency: ArrayView2<'a, f64>, tolerance: f64, minimizer: &M,
) -> CalcResult<FitOutcome> {
    let objective = AdmixLoss::new(major_count, minor_count, frequency)?;
    let populations = frequency.ncols();
    let start = uniform_start(populations);

    let minimum = minimizer.minimize(&objective, start.view(), tolerance)?;
    debug!(
        iterations = minimum.iterations,
        status = %minimum.status,
        loss = minimum.loss,
        "simplex minimizer finished"
    );

    let ratio = if minimum.converged {
        minimum.solution
    } else {
        warn!(
            status = %minimum.status,
            iterations = minimum.iterations,
            "admixture fit did not converge; reporting zero ratios"
        );
        Array1::zeros(populations)
    };

    Ok(FitOutcome {
        ratio,
        converged: minimum.converged,
        status: minimum.status,
        iterations: minimum.iterations,
        loss: minimum.loss,
    })
}

fn uniform_start(populations: usize) -> Array1<f64> {
    if populations == 0 {
        return Array1::zeros(0);
    }
    Array1::from_elem(populations, 1.0 / populations as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        admixture::{errors::CalcError, likelihood::loss},
        optimization::{
            errors::{OptError, OptResult},
            simplex::{SimplexMinimum, SimplexObjective, SoftmaxLbfgs},
        },
    };
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    // Minimizer that never converges and echoes the start point.
    struct Stalled;

    impl SimplexMinimizer for Stalled {
        fn minimize<O: SimplexObjective>(
            &self, objective: &O, start: ArrayView1<f64>, _tolerance: f64,
        ) -> OptResult<SimplexMinimum> {
            Ok(SimplexMinimum {
                solution: start.to_owned(),
                converged: false,
                status: "MaxItersReached".to_string(),
                iterations: 3,
                loss: objective.loss(start),
            })
        }
    }

    #[test]
    // Purpose
    // -------
    // Homozygous-major evidence at SNPs where population 0 carries the
    // major allele far more often must pull the mixture towards population 0.
    //
    // Given
    // -----
    // - f = [[0.9, 0.1], [0.8, 0.2]], major counts [2, 2], minor [0, 0].
    //
    // Expect
    // ------
    // - Converged, ratio[0] > 0.8, ratio on the simplex.
    fn homozygous_major_evidence_favours_first_population() {
        // Arrange
        let freq = array![[0.9, 0.1], [0.8, 0.2]];
        let major = array![2.0, 2.0];
        let minor = array![0.0, 0.0];

        // Act
        let fit = fit_admixture(
            major.view(),
            minor.view(),
            freq.view(),
            1e-4,
            &SoftmaxLbfgs::default(),
        )
        .expect("valid inputs");

        // Assert
        assert!(fit.converged, "status: {}", fit.status);
        assert!(fit.ratio[0] > 0.8);
        assert_abs_diff_eq!(fit.ratio.sum(), 1.0, epsilon = 1e-9);
        assert!(fit.ratio.iter().all(|&r| (0.0..=1.0).contains(&r)));
    }

    // Deterministic heterogeneous frequencies in [0.05, 0.95]: one Weyl
    // sequence per population.
    fn weyl_frequencies(snps: usize) -> ndarray::Array2<f64> {
        let steps = [0.414_213_562_4, 0.732_050_807_6, 0.645_751_311_1, 0.141_592_653_6];
        ndarray::Array2::from_shape_fn((snps, steps.len()), |(s, p)| {
            0.05 + 0.9 * ((s + 1) as f64 * steps[p]).fract()
        })
    }

    #[test]
    // Purpose
    // -------
    // With many SNPs the loss gradient at the uniform start is large. The fit
    // must still land on the interior optimum, not a saturated vertex.
    //
    // Given
    // -----
    // - 20 000 SNPs, 4 populations, heterogeneous frequencies.
    // - Expected allele counts of the mixture t = [0.55, 0.25, 0.15, 0.05],
    //   so t is the exact minimizer.
    //
    // Expect
    // ------
    // - Converged, ratio within 0.01 of t, loss(fit) no worse than loss(t)
    //   beyond 1e-5 relative.
    fn many_snp_mixture_recovers_interior_ratios() {
        // Arrange
        let freq = weyl_frequencies(20_000);
        let truth = array![0.55, 0.25, 0.15, 0.05];
        let mean = freq.dot(&truth);
        let major = mean.mapv(|m| 2.0 * m);
        let minor = mean.mapv(|m| 2.0 * (1.0 - m));

        // Act
        let fit = fit_admixture(
            major.view(),
            minor.view(),
            freq.view(),
            1e-4,
            &SoftmaxLbfgs::default(),
        )
        .expect("valid inputs");

        // Assert
        assert!(fit.converged, "status: {}", fit.status);
        for (r, t) in fit.ratio.iter().zip(truth.iter()) {
            assert_abs_diff_eq!(r, t, epsilon = 1e-2);
        }
        let loss_truth = loss(major.view(), minor.view(), freq.view(), truth.view());
        let loss_fit = loss(major.view(), minor.view(), freq.view(), fit.ratio.view());
        assert!(loss_fit - loss_truth <= 1e-5 * loss_truth.abs(), "{loss_fit} vs {loss_truth}");
    }

    #[test]
    fn non_convergence_degrades_to_zero_ratios() {
        let freq = array![[0.9, 0.1, 0.5]];
        let fit = fit_admixture(
            array![1.0].view(),
            array![1.0].view(),
            freq.view(),
            1e-4,
            &Stalled,
        )
        .expect("degraded result is not an error");
        assert!(!fit.converged);
        assert_eq!(fit.ratio, array![0.0, 0.0, 0.0]);
        assert_eq!(fit.status, "MaxItersReached");
        assert_eq!(fit.iterations, 3);
    }

    #[test]
    fn single_population_is_trivially_fitted() {
        let freq = array![[0.3], [0.6]];
        let fit = fit_admixture(
            array![1.0, 0.0].view(),
            array![1.0, 2.0].view(),
            freq.view(),
            1e-4,
            &SoftmaxLbfgs::default(),
        )
        .expect("valid inputs");
        assert!(fit.converged);
        assert_eq!(fit.ratio, array![1.0]);
    }

    #[test]
    fn invalid_inputs_are_errors() {
        let freq = array![[0.9, 0.1]];
        let solver = SoftmaxLbfgs::default();
        assert!(matches!(
            fit_admixture(array![1.0].view(), array![1.0].view(), freq.view(), -1.0, &solver),
            Err(CalcError::Optimizer(OptError::InvalidTolGrad { .. }))
        ));
        assert!(matches!(
            fit_admixture(array![1.0, 1.0].view(), array![1.0].view(), freq.view(), 1e-4, &solver),
            Err(CalcError::SnpCountMismatch { .. })
        ));
        let empty = ndarray::Array2::<f64>::zeros((1, 0));
        assert_eq!(
            fit_admixture(array![1.0].view(), array![1.0].view(), empty.view(), 1e-4, &solver),
            Err(CalcError::Optimizer(OptError::EmptySimplex))
        );
    }
}
