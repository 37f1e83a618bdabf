//! Correspondence search between frame observations and the feature model.
//!
//! Two interchangeable strategies:
//!
//! - **Euclidean**: single nearest neighbor, gated by a squared distance
//!   threshold.
//! - **Mahalanobis**: a cheap Euclidean k-NN prefilter, then the candidate
//!   minimizing the Mahalanobis distance under the combined covariance
//!   (observation + model entry). A looser association gate admits
//!   candidates; a stricter correspondence gate accepts the winner.
//!
//! Both return sets that are unique per observation and per model entry
//! within the iteration: accepted pairs are sorted by distance and the
//! closest claim on a model entry wins.

use std::collections::HashSet;

use nalgebra::{Matrix3, Vector3};

use super::Correspondence;
use crate::model::FeatureModel;

/// Euclidean strategy: nearest model entry per observation.
///
/// Pairs farther than `max_dist_sq` (squared meters) are rejected; the
/// observation stays unmatched for this iteration.
pub fn find_euclidean(
    model: &mut FeatureModel,
    data_means: &[Vector3<f32>],
    max_dist_sq: f32,
) -> Vec<Correspondence> {
    let mut accepted = Vec::with_capacity(data_means.len());

    for (data_idx, mean) in data_means.iter().enumerate() {
        if let Some((model_idx, dist_sq)) = model.query_nearest(mean) {
            if dist_sq <= max_dist_sq {
                accepted.push(Correspondence {
                    data_idx,
                    model_idx,
                    dist_sq,
                });
            }
        }
    }

    dedup_by_model(&mut accepted);
    accepted
}

/// Mahalanobis strategy with Euclidean k-NN prefilter.
///
/// For each observation, `n_neighbors` candidates are retrieved by
/// Euclidean proximity. Per candidate the combined covariance
/// `Σ_data + Σ_model` is inverted; singular combinations are skipped.
/// Candidates over `max_assoc_dist_sq` are inadmissible; the best
/// admissible candidate is accepted iff its squared Mahalanobis distance
/// is within `max_corresp_dist_sq`.
pub fn find_mahalanobis(
    model: &mut FeatureModel,
    data_means: &[Vector3<f32>],
    data_covariances: &[Matrix3<f32>],
    n_neighbors: usize,
    max_assoc_dist_sq: f32,
    max_corresp_dist_sq: f32,
) -> Vec<Correspondence> {
    let mut accepted = Vec::with_capacity(data_means.len());

    for (data_idx, mean) in data_means.iter().enumerate() {
        let candidates = model.query_k_nearest(mean, n_neighbors);

        let mut best: Option<(usize, f32)> = None;
        for (model_idx, _eucl_dist_sq) in candidates {
            let entry = model.entry(model_idx);
            let combined = data_covariances[data_idx] + entry.covariance;
            // Singular combined covariance: skip the candidate, never fail.
            let Some(inv) = combined.try_inverse() else {
                continue;
            };
            let diff = entry.mean - mean;
            let mah_dist_sq = (inv * diff).dot(&diff);

            if mah_dist_sq > max_assoc_dist_sq {
                continue;
            }
            if best.map_or(true, |(_, d)| mah_dist_sq < d) {
                best = Some((model_idx, mah_dist_sq));
            }
        }

        if let Some((model_idx, dist_sq)) = best {
            if dist_sq <= max_corresp_dist_sq {
                accepted.push(Correspondence {
                    data_idx,
                    model_idx,
                    dist_sq,
                });
            }
        }
    }

    dedup_by_model(&mut accepted);
    accepted
}

/// Resolve many-to-one claims: sort by distance, closest claim wins.
fn dedup_by_model(correspondences: &mut Vec<Correspondence>) {
    correspondences.sort_by(|a, b| a.dist_sq.partial_cmp(&b.dist_sq).unwrap());
    let mut claimed = HashSet::new();
    correspondences.retain(|c| claimed.insert(c.model_idx));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::FeatureObservation;

    fn model_from_points(points: &[[f32; 3]], variance: f32) -> FeatureModel {
        let mut model = FeatureModel::new(64);
        let observations: Vec<_> = points
            .iter()
            .map(|p| FeatureObservation::isotropic(Vector3::new(p[0], p[1], p[2]), variance))
            .collect();
        model.initialize(&observations).unwrap();
        model
    }

    #[test]
    fn test_euclidean_accepts_within_gate() {
        let mut model = model_from_points(&[[0.0, 0.0, 0.0], [2.0, 0.0, 0.0]], 0.01);
        let data = vec![Vector3::new(0.1, 0.0, 0.0)];

        let matches = find_euclidean(&mut model, &data, 0.15 * 0.15);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].data_idx, 0);
        assert_eq!(matches[0].model_idx, 0);
    }

    #[test]
    fn test_euclidean_rejects_beyond_gate() {
        let mut model = model_from_points(&[[0.0, 0.0, 0.0]], 0.01);
        let data = vec![Vector3::new(1.0, 0.0, 0.0)];

        let matches = find_euclidean(&mut model, &data, 0.15 * 0.15);
        assert!(matches.is_empty());
    }

    #[test]
    fn test_euclidean_empty_model_returns_no_matches() {
        let mut model = FeatureModel::new(8);
        let data = vec![Vector3::new(0.0, 0.0, 0.0)];
        assert!(find_euclidean(&mut model, &data, 1.0).is_empty());
    }

    #[test]
    fn test_closest_claim_wins_on_shared_entry() {
        let mut model = model_from_points(&[[0.0, 0.0, 0.0]], 0.01);
        let data = vec![Vector3::new(0.10, 0.0, 0.0), Vector3::new(0.05, 0.0, 0.0)];

        let matches = find_euclidean(&mut model, &data, 1.0);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].data_idx, 1);
    }

    #[test]
    fn test_mahalanobis_prefers_consistent_candidate() {
        // Two candidates at equal Euclidean distance; the one whose
        // covariance is loose along the displacement axis wins.
        let mut model = FeatureModel::new(8);
        let tight = Matrix3::identity() * 1e-4;
        let mut loose_x = Matrix3::identity() * 1e-4;
        loose_x[(0, 0)] = 0.25;
        model
            .initialize(&[
                FeatureObservation::new(Vector3::new(0.3, 0.0, 0.0), loose_x),
                FeatureObservation::new(Vector3::new(-0.3, 0.0, 0.0), tight),
            ])
            .unwrap();

        let data = vec![Vector3::new(0.0, 0.0, 0.0)];
        let covs = vec![Matrix3::identity() * 1e-4];

        let matches = find_mahalanobis(&mut model, &data, &covs, 4, 1e6, 1e6);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].model_idx, 0);
    }

    #[test]
    fn test_mahalanobis_skips_singular_candidates() {
        let mut model = FeatureModel::new(8);
        model
            .initialize(&[FeatureObservation::new(
                Vector3::new(0.1, 0.0, 0.0),
                Matrix3::zeros(),
            )])
            .unwrap();

        let data = vec![Vector3::new(0.0, 0.0, 0.0)];
        let covs = vec![Matrix3::zeros()]; // combined covariance singular

        let matches = find_mahalanobis(&mut model, &data, &covs, 4, 1e6, 1e6);
        assert!(matches.is_empty());
    }

    #[test]
    fn test_mahalanobis_association_gate_excludes() {
        let mut model = model_from_points(&[[1.0, 0.0, 0.0]], 0.01);
        let data = vec![Vector3::new(0.0, 0.0, 0.0)];
        let covs = vec![Matrix3::identity() * 0.01];

        // mah² = 1.0 / 0.02 = 50; association gate below that excludes it.
        let matches = find_mahalanobis(&mut model, &data, &covs, 4, 25.0, 1e6);
        assert!(matches.is_empty());
    }

    #[test]
    fn test_mahalanobis_correspondence_gate_is_stricter() {
        let mut model = model_from_points(&[[0.1, 0.0, 0.0]], 0.01);
        let data = vec![Vector3::new(0.0, 0.0, 0.0)];
        let covs = vec![Matrix3::identity() * 0.01];

        // mah² = 0.01 / 0.02 = 0.5: admitted by association, rejected by
        // the final acceptance gate.
        let matches = find_mahalanobis(&mut model, &data, &covs, 4, 100.0, 0.25);
        assert!(matches.is_empty());

        let matches = find_mahalanobis(&mut model, &data, &covs, 4, 100.0, 1.0);
        assert_eq!(matches.len(), 1);
    }
}
