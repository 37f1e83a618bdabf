//! Unified configuration loading for drishti-odom.
//!
//! Loads all configuration from a single YAML file with sensible
//! defaults; every field falls back to its default when omitted.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use drishti_odom::config::DrishtiConfig;
//!
//! // Load from the default path (configs/config.yaml)
//! let config = DrishtiConfig::load_default()?;
//!
//! // Or use built-in defaults (no file needed)
//! let config = DrishtiConfig::default();
//!
//! // Convert to runtime parameters
//! let params = config.to_icp_params();
//! let engine = ProbModelIcp::new(params, config.mode());
//! ```
//!
//! ## Example YAML
//!
//! ```yaml
//! registration:
//!   mode: mahalanobis
//!   max_iterations: 10
//!   min_correspondences: 15
//!   max_corresp_dist_eucl: 0.15   # meters, stored squared internally
//!
//! model:
//!   max_model_size: 3000
//!   n_nearest_neighbors: 4
//!
//! visualization:
//!   publish_model: true
//!   publish_model_covariances: false
//! ```

mod defaults;
mod model;
mod registration;
mod visualization;

pub use model::ModelSection;
pub use registration::RegistrationSection;
pub use visualization::VisualizationSection;

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{OdomError, Result};
use crate::matching::{CorrespondenceMode, IcpParams};

/// Full drishti-odom configuration loaded from YAML.
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct DrishtiConfig {
    /// Registration settings
    #[serde(default)]
    pub registration: RegistrationSection,

    /// Feature model settings
    #[serde(default)]
    pub model: ModelSection,

    /// Visualization settings
    #[serde(default)]
    pub visualization: VisualizationSection,
}

impl DrishtiConfig {
    /// Load configuration from a YAML file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }

    /// Load from the default config path (configs/config.yaml).
    pub fn load_default() -> Result<Self> {
        let path = Path::new("configs/config.yaml");
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(|e| OdomError::Config(e.to_string()))
    }

    /// Convert to runtime ICP parameters (squares the metric thresholds).
    pub fn to_icp_params(&self) -> IcpParams {
        IcpParams {
            max_iterations: self.registration.max_iterations,
            min_correspondences: self.registration.min_correspondences,
            n_nearest_neighbors: self.model.n_nearest_neighbors,
            max_model_size: self.model.max_model_size,
            epsilon_linear: self.registration.tf_epsilon_linear,
            epsilon_angular: self.registration.tf_epsilon_angular,
            max_assoc_dist_mah_sq: self.registration.max_assoc_dist_mah.powi(2),
            max_corresp_dist_mah_sq: self.registration.max_corresp_dist_mah.powi(2),
            max_corresp_dist_eucl_sq: self.registration.max_corresp_dist_eucl.powi(2),
        }
    }

    /// Selected correspondence strategy.
    pub fn mode(&self) -> CorrespondenceMode {
        self.registration.mode
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_default_config() {
        let config = DrishtiConfig::default();
        assert_eq!(config.registration.max_iterations, 10);
        assert_eq!(config.model.max_model_size, 3000);
        assert_eq!(config.mode(), CorrespondenceMode::Mahalanobis);
        assert!(config.visualization.publish_model);
        assert!(!config.visualization.publish_model_covariances);
    }

    #[test]
    fn test_yaml_overrides_and_defaults_mix() {
        let yaml = r#"
registration:
  mode: euclidean
  max_iterations: 25
model:
  max_model_size: 500
"#;
        let config = DrishtiConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.mode(), CorrespondenceMode::Euclidean);
        assert_eq!(config.registration.max_iterations, 25);
        assert_eq!(config.model.max_model_size, 500);
        // Omitted fields keep their defaults.
        assert_eq!(config.registration.min_correspondences, 15);
        assert_eq!(config.model.n_nearest_neighbors, 4);
    }

    #[test]
    fn test_to_icp_params_squares_thresholds() {
        let config = DrishtiConfig::default();
        let params = config.to_icp_params();
        assert_relative_eq!(params.max_assoc_dist_mah_sq, 100.0);
        assert_relative_eq!(params.max_corresp_dist_mah_sq, 49.0);
        assert_relative_eq!(params.max_corresp_dist_eucl_sq, 0.0225);
    }

    #[test]
    fn test_yaml_roundtrip() {
        let config = DrishtiConfig::default();
        let yaml = serde_yaml::to_string(&config).unwrap();
        let parsed = DrishtiConfig::from_yaml(&yaml).unwrap();
        assert_eq!(
            parsed.registration.max_iterations,
            config.registration.max_iterations
        );
        assert_eq!(parsed.mode(), config.mode());
    }

    #[test]
    fn test_malformed_yaml_is_config_error() {
        let result = DrishtiConfig::from_yaml("registration: [not, a, map]");
        assert!(matches!(result, Err(OdomError::Config(_))));
    }
}
