//! Test utilities for drishti-odom integration tests.

#![allow(dead_code)]

use drishti_odom::{FeatureObservation, Transform3D};
use nalgebra::{UnitQuaternion, Vector3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// A jittered 3D grid of feature observations.
///
/// Grid spacing is large relative to the motions used in tests, so
/// nearest-neighbor matching stays unambiguous; the jitter breaks the
/// grid's rotational symmetry.
pub fn grid_scene(nx: usize, ny: usize, nz: usize, spacing: f32) -> Vec<FeatureObservation> {
    let mut observations = Vec::with_capacity(nx * ny * nz);
    for x in 0..nx {
        for y in 0..ny {
            for z in 0..nz {
                let mean = Vector3::new(
                    x as f32 * spacing + 0.021 * (y as f32 + 1.0).sin(),
                    y as f32 * spacing + 0.019 * (z as f32 + 2.0).sin(),
                    z as f32 * spacing + 0.023 * (x as f32 + 3.0).sin(),
                );
                observations.push(FeatureObservation::isotropic(mean, 0.004));
            }
        }
    }
    observations
}

/// Random scattered observations (for capacity/fuzz tests).
pub fn random_scene(n: usize, extent: f32, seed: u64) -> Vec<FeatureObservation> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|_| {
            let mean = Vector3::new(
                rng.gen_range(0.0..extent),
                rng.gen_range(0.0..extent),
                rng.gen_range(0.0..extent),
            );
            FeatureObservation::isotropic(mean, 0.004)
        })
        .collect()
}

/// A small rigid motion: rotation about z plus a translation.
pub fn small_motion(angle: f32, tx: f32, ty: f32, tz: f32) -> Transform3D {
    Transform3D::new(
        UnitQuaternion::from_axis_angle(&Vector3::z_axis(), angle),
        Vector3::new(tx, ty, tz),
    )
}

/// What a sensor at `pose` observes of a fixed-frame scene.
pub fn observe(scene: &[FeatureObservation], pose: &Transform3D) -> Vec<FeatureObservation> {
    let inv = pose.inverse();
    scene
        .iter()
        .map(|f| {
            FeatureObservation::new(inv.transform_point(&f.mean), inv.rotate_covariance(&f.covariance))
        })
        .collect()
}
