//! Per-frame probabilistic ICP engine.
//!
//! Owns the persistent feature model and the running fixed-frame pose.
//! Each frame: seed with the motion prediction, align the observations
//! against the model, then commit the frame into the model — matched
//! observations are fused into their entries, unmatched ones inserted
//! with ring eviction. A failed alignment leaves both the pose and the
//! model untouched.

use std::path::Path;

use nalgebra::{Matrix3, Vector3};

use super::alignment::align;
use super::{CorrespondenceMode, MotionEstimate};
use crate::core::math::fuse_gaussians;
use crate::core::types::{FeatureObservation, ModelEntry, Transform3D};
use crate::error::Result;
use crate::model::{persistence, FeatureModel, ModelSnapshot};

/// Runtime parameters for the ICP engine.
///
/// Metric thresholds are stored squared; [`crate::config::DrishtiConfig`]
/// squares them during conversion.
#[derive(Debug, Clone)]
pub struct IcpParams {
    /// Alignment iteration cap.
    pub max_iterations: u32,
    /// Minimum matches to accept an alignment iteration.
    pub min_correspondences: usize,
    /// Euclidean prefilter width for the Mahalanobis search.
    pub n_nearest_neighbors: usize,
    /// Feature model ring-buffer capacity.
    pub max_model_size: usize,
    /// Convergence threshold on incremental translation (meters).
    pub epsilon_linear: f32,
    /// Convergence threshold on incremental rotation (radians).
    pub epsilon_angular: f32,
    /// Squared Mahalanobis association gate (coarse candidate admission).
    pub max_assoc_dist_mah_sq: f32,
    /// Squared Mahalanobis correspondence gate (final acceptance).
    pub max_corresp_dist_mah_sq: f32,
    /// Squared Euclidean correspondence gate.
    pub max_corresp_dist_eucl_sq: f32,
}

impl Default for IcpParams {
    fn default() -> Self {
        Self {
            max_iterations: 10,
            min_correspondences: 15,
            n_nearest_neighbors: 4,
            max_model_size: 3000,
            epsilon_linear: 1e-4,
            epsilon_angular: 1.7e-3,
            max_assoc_dist_mah_sq: 10.0 * 10.0,
            max_corresp_dist_mah_sq: 7.0 * 7.0,
            max_corresp_dist_eucl_sq: 0.15 * 0.15,
        }
    }
}

/// Probabilistic ICP motion estimator over a bounded feature model.
pub struct ProbModelIcp {
    params: IcpParams,
    mode: CorrespondenceMode,
    model: FeatureModel,
    /// Fixed frame to base (moving) frame.
    pose: Transform3D,
}

impl ProbModelIcp {
    /// Create an engine with an empty model.
    pub fn new(params: IcpParams, mode: CorrespondenceMode) -> Self {
        let model = FeatureModel::new(params.max_model_size);
        Self {
            params,
            mode,
            model,
            pose: Transform3D::identity(),
        }
    }

    /// Current parameters.
    pub fn params(&self) -> &IcpParams {
        &self.params
    }

    /// Active correspondence strategy.
    pub fn mode(&self) -> CorrespondenceMode {
        self.mode
    }

    /// Current fixed-frame pose estimate.
    pub fn pose(&self) -> &Transform3D {
        &self.pose
    }

    /// Override the pose estimate (e.g. after relocalization).
    pub fn set_pose(&mut self, pose: Transform3D) {
        self.pose = pose;
    }

    /// The persistent feature model.
    pub fn model(&self) -> &FeatureModel {
        &self.model
    }

    /// Current model size.
    pub fn model_size(&self) -> usize {
        self.model.len()
    }

    /// Read-only model copy for rendering.
    pub fn snapshot(&self, include_covariances: bool) -> ModelSnapshot {
        self.model.snapshot(include_covariances)
    }

    /// Estimate the motion for one frame.
    ///
    /// `observations` are expressed in the sensor/base frame;
    /// `prediction` is the predicted motion since the previous frame. On
    /// the first frame the model is bootstrapped from the observations
    /// and the prediction is taken as the motion. On alignment failure
    /// the error is returned and neither the pose nor the model changes.
    pub fn estimate_motion(
        &mut self,
        observations: &[FeatureObservation],
        prediction: &Transform3D,
    ) -> Result<MotionEstimate> {
        let predicted_pose = prediction.compose(&self.pose);

        // Observations into the fixed frame, covariances rotated along.
        let mut means: Vec<Vector3<f32>> = Vec::with_capacity(observations.len());
        let mut covariances: Vec<Matrix3<f32>> = Vec::with_capacity(observations.len());
        for obs in observations {
            means.push(predicted_pose.transform_point(&obs.mean));
            covariances.push(predicted_pose.rotate_covariance(&obs.covariance));
        }

        if self.model.is_empty() {
            let fixed: Vec<FeatureObservation> = means
                .iter()
                .zip(&covariances)
                .map(|(m, c)| FeatureObservation::new(*m, *c))
                .collect();
            self.model.initialize(&fixed)?;
            self.pose = predicted_pose;
            log::info!("feature model initialized with {} entries", self.model.len());
            return Ok(MotionEstimate {
                motion: *prediction,
                pose: self.pose,
                iterations: 0,
                correspondences: 0,
            });
        }

        let aligned = align(&mut self.model, &means, &covariances, self.mode, &self.params)
            .map_err(|e| {
                log::warn!("frame alignment failed: {e}");
                e
            })?;

        let motion = aligned.correction.compose(prediction);
        self.pose = motion.compose(&self.pose);

        // Move the observations to their corrected positions before the
        // model commit.
        for mean in &mut means {
            *mean = aligned.correction.transform_point(mean);
        }
        for cov in &mut covariances {
            *cov = aligned.correction.rotate_covariance(cov);
        }

        // Stage the frame's mutations, then apply as one batch.
        let mut matched = vec![false; means.len()];
        let mut fusions = Vec::with_capacity(aligned.correspondences.len());
        for c in &aligned.correspondences {
            matched[c.data_idx] = true;
            let entry = self.model.entry(c.model_idx);
            let (mean, cov) = fuse_gaussians(
                &entry.mean,
                &entry.covariance,
                &means[c.data_idx],
                &covariances[c.data_idx],
            );
            fusions.push((c.model_idx, ModelEntry::new(mean, cov)));
        }
        let inserts: Vec<ModelEntry> = (0..means.len())
            .filter(|&i| !matched[i])
            .map(|i| ModelEntry::new(means[i], covariances[i]))
            .collect();
        let n_correspondences = aligned.correspondences.len();
        self.model.commit(fusions, inserts);

        log::debug!(
            "frame aligned: {} iterations, {} correspondences, model size {}",
            aligned.iterations,
            n_correspondences,
            self.model.len()
        );

        Ok(MotionEstimate {
            motion,
            pose: self.pose,
            iterations: aligned.iterations,
            correspondences: n_correspondences,
        })
    }

    /// Save the feature model to a file.
    pub fn save_model<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        persistence::save(&self.model, path.as_ref())?;
        log::info!(
            "saved feature model ({} entries) to {}",
            self.model.len(),
            path.as_ref().display()
        );
        Ok(())
    }

    /// Replace the in-memory model with one loaded from a file.
    pub fn load_model<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        self.model = persistence::load(path.as_ref())?;
        log::info!(
            "loaded feature model ({} entries) from {}",
            self.model.len(),
            path.as_ref().display()
        );
        Ok(())
    }
}
