//! Registration configuration section.

use serde::{Deserialize, Serialize};

use super::defaults;
use crate::matching::CorrespondenceMode;

/// Registration settings section.
///
/// Metric thresholds are given unsquared here; they are squared when
/// converted to runtime parameters.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RegistrationSection {
    /// Correspondence strategy: "euclidean" or "mahalanobis"
    #[serde(default = "defaults::mode")]
    pub mode: CorrespondenceMode,

    /// Alignment iteration cap
    #[serde(default = "defaults::max_iterations")]
    pub max_iterations: u32,

    /// Minimum matches to accept an iteration
    #[serde(default = "defaults::min_correspondences")]
    pub min_correspondences: usize,

    /// Convergence threshold on incremental translation (meters)
    #[serde(default = "defaults::tf_epsilon_linear")]
    pub tf_epsilon_linear: f32,

    /// Convergence threshold on incremental rotation (radians)
    #[serde(default = "defaults::tf_epsilon_angular")]
    pub tf_epsilon_angular: f32,

    /// Mahalanobis association gate (coarse candidate admission)
    #[serde(default = "defaults::max_assoc_dist_mah")]
    pub max_assoc_dist_mah: f32,

    /// Mahalanobis correspondence gate (final acceptance)
    #[serde(default = "defaults::max_corresp_dist_mah")]
    pub max_corresp_dist_mah: f32,

    /// Euclidean correspondence gate (meters)
    #[serde(default = "defaults::max_corresp_dist_eucl")]
    pub max_corresp_dist_eucl: f32,
}

impl Default for RegistrationSection {
    fn default() -> Self {
        Self {
            mode: defaults::mode(),
            max_iterations: defaults::max_iterations(),
            min_correspondences: defaults::min_correspondences(),
            tf_epsilon_linear: defaults::tf_epsilon_linear(),
            tf_epsilon_angular: defaults::tf_epsilon_angular(),
            max_assoc_dist_mah: defaults::max_assoc_dist_mah(),
            max_corresp_dist_mah: defaults::max_corresp_dist_mah(),
            max_corresp_dist_eucl: defaults::max_corresp_dist_eucl(),
        }
    }
}
