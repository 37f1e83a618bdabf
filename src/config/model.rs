//! Feature model configuration section.

use serde::{Deserialize, Serialize};

use super::defaults;

/// Feature model settings section.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ModelSection {
    /// Ring-buffer capacity (features kept in the persistent model)
    #[serde(default = "defaults::max_model_size")]
    pub max_model_size: usize,

    /// Euclidean prefilter width for the Mahalanobis search
    #[serde(default = "defaults::n_nearest_neighbors")]
    pub n_nearest_neighbors: usize,
}

impl Default for ModelSection {
    fn default() -> Self {
        Self {
            max_model_size: defaults::max_model_size(),
            n_nearest_neighbors: defaults::n_nearest_neighbors(),
        }
    }
}
