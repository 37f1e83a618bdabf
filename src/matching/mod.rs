//! Probabilistic ICP registration.
//!
//! # Components
//!
//! - [`correspondence`]: Euclidean and Mahalanobis correspondence search
//! - [`alignment`]: SVD rigid alignment and the convergence loop
//! - [`ProbModelIcp`]: per-frame engine tying search, alignment and the
//!   model update together
//!
//! # Example
//!
//! ```ignore
//! use drishti_odom::{CorrespondenceMode, IcpParams, ProbModelIcp, Transform3D};
//!
//! let mut engine = ProbModelIcp::new(IcpParams::default(), CorrespondenceMode::Mahalanobis);
//! let estimate = engine.estimate_motion(&observations, &prediction)?;
//! println!("pose: {:?}", estimate.pose);
//! ```

pub mod alignment;
pub mod correspondence;

mod icp;

pub use icp::{IcpParams, ProbModelIcp};

use serde::{Deserialize, Serialize};

use crate::core::types::Transform3D;

/// One accepted observation/model pairing.
///
/// Within a single alignment iteration an observation index appears at
/// most once, and a model index is claimed by at most one observation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Correspondence {
    /// Index into the frame's observation set.
    pub data_idx: usize,
    /// Storage index into the feature model.
    pub model_idx: usize,
    /// Squared metric distance under the active strategy.
    pub dist_sq: f32,
}

/// Correspondence search strategy.
///
/// Both strategies share the iterate/correspond/align loop and differ only
/// in the correspondence step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CorrespondenceMode {
    /// Plain nearest-neighbor matching on positions.
    Euclidean,
    /// Covariance-weighted matching; higher precision when the
    /// uncertainty estimates are trustworthy.
    Mahalanobis,
}

/// Result of a successful per-frame motion estimate.
#[derive(Debug, Clone, Copy)]
pub struct MotionEstimate {
    /// Estimated motion since the previous frame.
    pub motion: Transform3D,
    /// Updated fixed-frame pose after applying the motion.
    pub pose: Transform3D,
    /// Alignment iterations performed (0 for the bootstrap frame).
    pub iterations: u32,
    /// Correspondences in the final alignment iteration.
    pub correspondences: usize,
}
