//! Feature point types: per-frame observations and persistent model entries.

use nalgebra::{Matrix3, Vector3};

/// One 3D feature point measured in the current sensor frame.
///
/// The covariance expresses measurement uncertainty and must be symmetric
/// positive semi-definite. Observations are transient: they are consumed
/// by the per-frame pipeline and either fused into the model or discarded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureObservation {
    /// Estimated 3D position in meters.
    pub mean: Vector3<f32>,
    /// 3×3 position covariance.
    pub covariance: Matrix3<f32>,
}

impl FeatureObservation {
    /// Create an observation from mean and covariance.
    #[inline]
    pub fn new(mean: Vector3<f32>, covariance: Matrix3<f32>) -> Self {
        Self { mean, covariance }
    }

    /// Create an observation with isotropic uncertainty `variance · I`.
    #[inline]
    pub fn isotropic(mean: Vector3<f32>, variance: f32) -> Self {
        Self {
            mean,
            covariance: Matrix3::identity() * variance,
        }
    }
}

/// One persistent feature in the model (world/fixed) frame.
///
/// Entries are created at model bootstrap or by insertion of an unmatched
/// observation, refined in place by weighted fusion, and destroyed only
/// when the ring buffer evicts them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelEntry {
    /// Feature position in the fixed frame, meters.
    pub mean: Vector3<f32>,
    /// 3×3 position covariance.
    pub covariance: Matrix3<f32>,
}

impl ModelEntry {
    /// Create an entry from mean and covariance.
    #[inline]
    pub fn new(mean: Vector3<f32>, covariance: Matrix3<f32>) -> Self {
        Self { mean, covariance }
    }
}

impl From<&FeatureObservation> for ModelEntry {
    fn from(obs: &FeatureObservation) -> Self {
        Self {
            mean: obs.mean,
            covariance: obs.covariance,
        }
    }
}
