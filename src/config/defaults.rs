//! Default values for configuration sections.

use crate::matching::CorrespondenceMode;

pub fn mode() -> CorrespondenceMode {
    CorrespondenceMode::Mahalanobis
}

pub fn max_iterations() -> u32 {
    10
}

pub fn min_correspondences() -> usize {
    15
}

pub fn tf_epsilon_linear() -> f32 {
    1e-4
}

pub fn tf_epsilon_angular() -> f32 {
    1.7e-3
}

pub fn max_assoc_dist_mah() -> f32 {
    10.0
}

pub fn max_corresp_dist_mah() -> f32 {
    7.0
}

pub fn max_corresp_dist_eucl() -> f32 {
    0.15
}

pub fn max_model_size() -> usize {
    3000
}

pub fn n_nearest_neighbors() -> usize {
    4
}

pub fn publish_model() -> bool {
    true
}

pub fn publish_model_covariances() -> bool {
    false
}
