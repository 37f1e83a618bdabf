//! Visualization configuration section.

use serde::{Deserialize, Serialize};

use super::defaults;

/// Visualization settings section.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VisualizationSection {
    /// Expose model feature positions for rendering
    #[serde(default = "defaults::publish_model")]
    pub publish_model: bool,

    /// Include covariance ellipsoids in the snapshot
    #[serde(default = "defaults::publish_model_covariances")]
    pub publish_model_covariances: bool,
}

impl Default for VisualizationSection {
    fn default() -> Self {
        Self {
            publish_model: defaults::publish_model(),
            publish_model_covariances: defaults::publish_model_covariances(),
        }
    }
}
