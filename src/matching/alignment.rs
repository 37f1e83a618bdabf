//! SVD rigid alignment and the iterate-until-convergence loop.
//!
//! Each iteration: find correspondences against the model, solve for the
//! incremental rigid transform in closed form (Kabsch), apply it to the
//! working points and compose it onto the accumulated correction.
//! Converged when the incremental rotation and translation both fall
//! below their epsilons; hitting the iteration cap without convergence is
//! a typed failure and the caller must not update the model.

use nalgebra::{Matrix3, Vector3};

use super::correspondence::{find_euclidean, find_mahalanobis};
use super::icp::IcpParams;
use super::{Correspondence, CorrespondenceMode};
use crate::core::types::Transform3D;
use crate::error::{OdomError, Result};
use crate::model::FeatureModel;

/// Output of a converged alignment.
pub struct Alignment {
    /// Accumulated correction mapping the seeded data into model space.
    pub correction: Transform3D,
    /// Iterations spent, including the converging one.
    pub iterations: u32,
    /// Correspondence set from the final iteration.
    pub correspondences: Vec<Correspondence>,
}

/// Run the alignment loop for one frame.
///
/// `data_means` must already be transformed into the fixed frame by the
/// pose prediction; `data_covariances` likewise rotated. The covariances
/// are held fixed across iterations: the incremental corrections are
/// small, so re-rotating them each iteration is not worth the cost.
pub fn align(
    model: &mut FeatureModel,
    data_means: &[Vector3<f32>],
    data_covariances: &[Matrix3<f32>],
    mode: CorrespondenceMode,
    params: &IcpParams,
) -> Result<Alignment> {
    let mut working: Vec<Vector3<f32>> = data_means.to_vec();
    let mut correction = Transform3D::identity();

    for iteration in 1..=params.max_iterations {
        let correspondences = match mode {
            CorrespondenceMode::Euclidean => {
                find_euclidean(model, &working, params.max_corresp_dist_eucl_sq)
            }
            CorrespondenceMode::Mahalanobis => find_mahalanobis(
                model,
                &working,
                data_covariances,
                params.n_nearest_neighbors,
                params.max_assoc_dist_mah_sq,
                params.max_corresp_dist_mah_sq,
            ),
        };

        if correspondences.len() < params.min_correspondences {
            return Err(OdomError::InsufficientCorrespondences {
                found: correspondences.len(),
                required: params.min_correspondences,
            });
        }

        let Some(delta) = rigid_from_pairs(&working, model, &correspondences) else {
            return Err(OdomError::AlignmentDiverged {
                iterations: iteration,
            });
        };

        for point in &mut working {
            *point = delta.transform_point(point);
        }
        correction = delta.compose(&correction);

        if delta.rotation_angle() < params.epsilon_angular
            && delta.translation_norm() < params.epsilon_linear
        {
            return Ok(Alignment {
                correction,
                iterations: iteration,
                correspondences,
            });
        }
    }

    Err(OdomError::AlignmentDiverged {
        iterations: params.max_iterations,
    })
}

/// Closed-form rigid transform minimizing the summed squared residual
/// over matched pairs (data → model).
///
/// Kabsch: center both sides, accumulate the cross-covariance
/// `H = Σ dᵢ·mᵢᵀ`, factor `H = U S Vᵀ` and take `R = V Uᵀ`. A reflective
/// solution (determinant −1) is repaired by negating the singular vector
/// of the smallest singular value, guaranteeing a proper rotation.
/// Returns `None` when the SVD factors are unavailable.
pub fn rigid_from_pairs(
    data_means: &[Vector3<f32>],
    model: &FeatureModel,
    correspondences: &[Correspondence],
) -> Option<Transform3D> {
    if correspondences.is_empty() {
        return None;
    }
    let n = correspondences.len() as f32;

    let mut data_centroid = Vector3::zeros();
    let mut model_centroid = Vector3::zeros();
    for c in correspondences {
        data_centroid += data_means[c.data_idx];
        model_centroid += model.entry(c.model_idx).mean;
    }
    data_centroid /= n;
    model_centroid /= n;

    let mut h = Matrix3::zeros();
    for c in correspondences {
        let d = data_means[c.data_idx] - data_centroid;
        let m = model.entry(c.model_idx).mean - model_centroid;
        h += d * m.transpose();
    }

    let svd = h.svd(true, true);
    let u = svd.u?;
    let v_t = svd.v_t?;
    let mut v = v_t.transpose();

    let mut rotation = v * u.transpose();
    if rotation.determinant() < 0.0 {
        // Reflection case: flip the smallest singular vector.
        let flipped = -v.column(2);
        v.set_column(2, &flipped);
        rotation = v * u.transpose();
    }

    let translation = model_centroid - rotation * data_centroid;
    Some(Transform3D::from_matrix(rotation, translation))
}
