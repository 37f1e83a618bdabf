//! Rigid transform type for 3D registration.

use nalgebra::{Matrix3, Rotation3, UnitQuaternion, Vector3};

/// A rigid transform in 3D: rotation followed by translation.
///
/// The rotation is stored as a unit quaternion, so it stays a proper
/// rotation (orthonormal, determinant +1) under composition. Rotation
/// matrices produced by the alignment solver are renormalized through
/// [`Transform3D::from_matrix`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform3D {
    /// Rotation component.
    pub rotation: UnitQuaternion<f32>,
    /// Translation component in meters.
    pub translation: Vector3<f32>,
}

impl Transform3D {
    /// Create a transform from rotation and translation parts.
    #[inline]
    pub fn new(rotation: UnitQuaternion<f32>, translation: Vector3<f32>) -> Self {
        Self {
            rotation,
            translation,
        }
    }

    /// Identity transform.
    #[inline]
    pub fn identity() -> Self {
        Self {
            rotation: UnitQuaternion::identity(),
            translation: Vector3::zeros(),
        }
    }

    /// Create a transform from a rotation matrix and translation.
    ///
    /// The matrix is renormalized into a unit quaternion, which absorbs
    /// small orthonormality drift from numerical solvers.
    pub fn from_matrix(rotation: Matrix3<f32>, translation: Vector3<f32>) -> Self {
        let rot = Rotation3::from_matrix_unchecked(rotation);
        Self {
            rotation: UnitQuaternion::from_rotation_matrix(&rot),
            translation,
        }
    }

    /// Compose two transforms: `self ∘ other` (apply `other` first).
    ///
    /// ```text
    /// C = A ∘ B:
    ///   C.R = A.R · B.R
    ///   C.t = A.R · B.t + A.t
    /// ```
    #[inline]
    pub fn compose(&self, other: &Transform3D) -> Transform3D {
        Transform3D {
            rotation: self.rotation * other.rotation,
            translation: self.rotation * other.translation + self.translation,
        }
    }

    /// Inverse of this transform.
    #[inline]
    pub fn inverse(&self) -> Transform3D {
        let inv = self.rotation.inverse();
        Transform3D {
            rotation: inv,
            translation: -(inv * self.translation),
        }
    }

    /// Transform a point: `R·p + t`.
    #[inline]
    pub fn transform_point(&self, point: &Vector3<f32>) -> Vector3<f32> {
        self.rotation * point + self.translation
    }

    /// Rotate a covariance matrix into this transform's frame: `R Σ Rᵀ`.
    #[inline]
    pub fn rotate_covariance(&self, covariance: &Matrix3<f32>) -> Matrix3<f32> {
        let r = self.rotation.to_rotation_matrix().into_inner();
        r * covariance * r.transpose()
    }

    /// Rotation magnitude in radians.
    #[inline]
    pub fn rotation_angle(&self) -> f32 {
        self.rotation.angle()
    }

    /// Translation magnitude in meters.
    #[inline]
    pub fn translation_norm(&self) -> f32 {
        self.translation.norm()
    }

    /// Rotation component as a 3×3 matrix.
    #[inline]
    pub fn rotation_matrix(&self) -> Matrix3<f32> {
        self.rotation.to_rotation_matrix().into_inner()
    }
}

impl Default for Transform3D {
    fn default() -> Self {
        Self::identity()
    }
}
