//! Numeric primitives for probabilistic registration.
//!
//! Gaussian information fusion used by the model updater.

use nalgebra::{Matrix3, Vector3};

/// Fuse two Gaussian position estimates (Kalman form).
///
/// Treats `(prior_mean, prior_cov)` as the existing model entry and
/// `(obs_mean, obs_cov)` as new evidence:
///
/// ```text
/// S  = Σp + Σo
/// K  = Σp · S⁻¹
/// μ' = μp + K (μo − μp)
/// Σ' = Σp − K Σp
/// ```
///
/// This is equivalent to precision-weighted averaging: the fused
/// covariance never has a larger trace than either input. If `S` is not
/// invertible the prior is returned unchanged.
pub fn fuse_gaussians(
    prior_mean: &Vector3<f32>,
    prior_cov: &Matrix3<f32>,
    obs_mean: &Vector3<f32>,
    obs_cov: &Matrix3<f32>,
) -> (Vector3<f32>, Matrix3<f32>) {
    let innovation_cov = prior_cov + obs_cov;
    match innovation_cov.try_inverse() {
        Some(inv) => {
            let gain = prior_cov * inv;
            let mean = prior_mean + gain * (obs_mean - prior_mean);
            let cov = prior_cov - gain * prior_cov;
            // Symmetrize to clean up floating-point drift.
            (mean, (cov + cov.transpose()) * 0.5)
        }
        None => (*prior_mean, *prior_cov),
    }
}
