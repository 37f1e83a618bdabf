//! Core data types for probabilistic registration.
//!
//! - [`Transform3D`]: rigid transform (rotation + translation)
//! - [`FeatureObservation`]: per-frame 3D feature with uncertainty
//! - [`ModelEntry`]: persistent feature in the fixed frame

mod feature;
mod transform;

pub use feature::{FeatureObservation, ModelEntry};
pub use transform::Transform3D;
