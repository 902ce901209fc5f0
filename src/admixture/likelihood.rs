//! Binomial mixture log-likelihood over population ratios.
//!
//! For SNP `s`, population `p`, major-allele frequency `f[s][p]` and ratio
//! vector `r`:
//!
//! ```text
//! major_mean[s] = Σ_p f[s][p] · r[p]
//! minor_mean[s] = Σ_p (1 − f[s][p]) · r[p]
//! loss(r) = −Σ_s ( major[s] · ln(major_mean[s]) + minor[s] · ln(minor_mean[s]) )
//! ```
//!
//! A mean that is not strictly positive contributes `ln(1) = 0`, i.e. the
//! evidence at that SNP is dropped rather than driving the loss to infinity.
//! The gradient applies the same guard term by term.
use ndarray::{Array1, ArrayView1, ArrayView2};

use crate::{
    admixture::errors::{CalcError, CalcResult},
    optimization::{errors::OptResult, simplex::SimplexObjective},
};

/// Negative log-likelihood of the allele counts under mixture `ratio`.
///
/// Inputs must be aligned: `major_count.len() == minor_count.len() ==
/// frequency.nrows()` and `ratio.len() == frequency.ncols()`. [`AdmixLoss`]
/// checks this once up front.
pub fn loss(
    major_count: ArrayView1<f64>, minor_count: ArrayView1<f64>, frequency: ArrayView2<f64>,
    ratio: ArrayView1<f64>,
) -> f64 {
    let mut log_lik = 0.0;
    for (s, row) in frequency.outer_iter().enumerate() {
        let (major_mean, minor_mean) = mixture_means(row, ratio);
        log_lik += major_count[s] * guarded_ln(major_mean);
        log_lik += minor_count[s] * guarded_ln(minor_mean);
    }
    -log_lik
}

/// Gradient of [`loss`] with respect to `ratio`.
///
/// ```text
/// ∂loss/∂r[p] = −Σ_s ( major[s] · f[s][p] / major_mean[s]
///                     + minor[s] · (1 − f[s][p]) / minor_mean[s] )
/// ```
///
/// Terms whose mean is not strictly positive are skipped.
pub fn loss_gradient(
    major_count: ArrayView1<f64>, minor_count: ArrayView1<f64>, frequency: ArrayView2<f64>,
    ratio: ArrayView1<f64>,
) -> Array1<f64> {
    let mut grad = Array1::<f64>::zeros(ratio.len());
    for (s, row) in frequency.outer_iter().enumerate() {
        let (major_mean, minor_mean) = mixture_means(row, ratio);
        let major_w = if major_mean > 0.0 { major_count[s] / major_mean } else { 0.0 };
        let minor_w = if minor_mean > 0.0 { minor_count[s] / minor_mean } else { 0.0 };
        for (g, &f) in grad.iter_mut().zip(row.iter()) {
            *g -= major_w * f + minor_w * (1.0 - f);
        }
    }
    grad
}

fn mixture_means(row: ArrayView1<f64>, ratio: ArrayView1<f64>) -> (f64, f64) {
    row.iter().zip(ratio.iter()).fold((0.0, 0.0), |(major, minor), (&f, &r)| {
        (major + f * r, minor + (1.0 - f) * r)
    })
}

fn guarded_ln(mean: f64) -> f64 {
    if mean > 0.0 {
        mean.ln()
    } else {
        0.0
    }
}

/// Allele counts and frequencies bundled as a [`SimplexObjective`].
#[derive(Debug, Clone)]
pub struct AdmixLoss<'a> {
    major_count: ArrayView1<'a, f64>,
    minor_count: ArrayView1<'a, f64>,
    frequency: ArrayView2<'a, f64>,
}

impl<'a> AdmixLoss<'a> {
    /// # Errors
    /// - [`CalcError::SnpCountMismatch`] if either count vector is not
    ///   aligned with the frequency rows.
    pub fn new(
        major_count: ArrayView1<'a, f64>, minor_count: ArrayView1<'a, f64>,
        frequency: ArrayView2<'a, f64>,
    ) -> CalcResult<Self> {
        let snps = frequency.nrows();
        for (what, found) in
            [("Major count vector", major_count.len()), ("Minor count vector", minor_count.len())]
        {
            if found != snps {
                return Err(CalcError::SnpCountMismatch { what, expected: snps, found });
            }
        }
        Ok(Self { major_count, minor_count, frequency })
    }

    pub fn snp_count(&self) -> usize {
        self.frequency.nrows()
    }
}

impl SimplexObjective for AdmixLoss<'_> {
    fn dim(&self) -> usize {
        self.frequency.ncols()
    }

    fn loss(&self, ratio: ArrayView1<f64>) -> f64 {
        loss(self.major_count, self.minor_count, self.frequency, ratio)
    }

    fn loss_grad(&self, ratio: ArrayView1<f64>) -> OptResult<Array1<f64>> {
        Ok(loss_gradient(self.major_count, self.minor_count, self.frequency, ratio))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    #[test]
    // Purpose
    // -------
    // Hand-computed value for a single SNP with two populations.
    //
    // Given
    // -----
    // - f = [0.9, 0.1], r = [0.5, 0.5], one major and one minor copy.
    //
    // Expect
    // ------
    // - Both means are 0.5, so loss = −2 ln 0.5.
    fn single_snp_value() {
        let value = loss(
            array![1.0].view(),
            array![1.0].view(),
            array![[0.9, 0.1]].view(),
            array![0.5, 0.5].view(),
        );
        assert_abs_diff_eq!(value, -2.0 * 0.5_f64.ln(), epsilon = 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // A zero mixture mean drops that SNP's evidence instead of producing
    // an infinite loss.
    fn zero_mean_contributes_nothing() {
        // Arrange: the minor mean at SNP 0 is exactly 0 under r = [1, 0].
        let freq = array![[1.0, 0.2], [0.5, 0.5]];
        let ratio = array![1.0, 0.0];

        // Act
        let (major, minor) = (array![0.0, 1.0], array![2.0, 1.0]);
        let guarded = loss(major.view(), minor.view(), freq.view(), ratio.view());
        let grad = loss_gradient(major.view(), minor.view(), freq.view(), ratio.view());

        // Assert
        assert_abs_diff_eq!(guarded, -2.0 * 0.5_f64.ln(), epsilon = 1e-12);
        assert!(grad.iter().all(|g| g.is_finite()));
    }

    #[test]
    fn gradient_matches_central_difference() {
        // Arrange
        let major = array![2.0, 1.0, 0.0];
        let minor = array![0.0, 1.0, 2.0];
        let freq = array![[0.9, 0.4, 0.2], [0.6, 0.5, 0.3], [0.1, 0.7, 0.8]];
        let ratio = array![0.5, 0.3, 0.2];
        let h = 1e-6;

        // Act
        let grad = loss_gradient(major.view(), minor.view(), freq.view(), ratio.view());

        // Assert
        for p in 0..ratio.len() {
            let mut up = ratio.clone();
            let mut dn = ratio.clone();
            up[p] += h;
            dn[p] -= h;
            let numeric = (loss(major.view(), minor.view(), freq.view(), up.view())
                - loss(major.view(), minor.view(), freq.view(), dn.view()))
                / (2.0 * h);
            assert_abs_diff_eq!(grad[p], numeric, epsilon = 1e-6);
        }
    }

    #[test]
    fn objective_rejects_misaligned_counts() {
        let freq = array![[0.5, 0.5], [0.4, 0.6]];
        let major = array![1.0];
        let minor = array![1.0, 1.0];
        assert_eq!(
            AdmixLoss::new(major.view(), minor.view(), freq.view()).err(),
            Some(CalcError::SnpCountMismatch {
                what: "Major count vector",
                expected: 2,
                found: 1
            })
        );
    }

    #[test]
    fn objective_delegates_to_free_functions() {
        let freq = array![[0.9, 0.1], [0.8, 0.2]];
        let major = array![2.0, 2.0];
        let minor = array![0.0, 0.0];
        let objective = AdmixLoss::new(major.view(), minor.view(), freq.view()).expect("aligned");
        let ratio = array![0.7, 0.3];
        assert_eq!(objective.dim(), 2);
        assert_eq!(objective.snp_count(), 2);
        assert_eq!(
            objective.loss(ratio.view()),
            loss(major.view(), minor.view(), freq.view(), ratio.view())
        );
        assert_eq!(
            objective.loss_grad(ratio.view()).expect("analytic"),
            loss_gradient(major.view(), minor.view(), freq.view(), ratio.view())
        );
    }
}
