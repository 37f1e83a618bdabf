//! Drishti-Odom — probabilistic ICP visual odometry over a bounded
//! persistent feature model.
//!
//! Estimates the rigid-body motion of an RGB-D sensor between frames by
//! registering per-frame 3D feature observations (mean + covariance)
//! against a persistent probabilistic feature model.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                   matching/                         │  ← Registration engine
//! │      (correspondence, alignment, ProbModelIcp)      │
//! └─────────────────────────────────────────────────────┘
//!                          │
//! ┌─────────────────────────────────────────────────────┐
//! │                    model/                           │  ← Feature store
//! │       (ring buffer, k-d index, persistence)         │
//! └─────────────────────────────────────────────────────┘
//!                          │
//! ┌─────────────────────────────────────────────────────┐
//! │                     core/                           │  ← Foundation
//! │                 (types, math)                       │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! Per-frame control flow: correspondence search against the model →
//! iterative alignment until convergence or budget exhaustion → on
//! success, a single batched model commit (fuse matched observations,
//! insert unmatched ones with oldest-first ring eviction).
//!
//! The pipeline is single-threaded and synchronous: one frame is fully
//! processed before the next is accepted, and the model update for a
//! frame is applied as one batch so no query ever observes a partially
//! updated store.

// ============================================================================
// Layer 1: Core foundation (no internal deps)
// ============================================================================
pub mod core;

// ============================================================================
// Layer 2: Feature model (depends on core)
// ============================================================================
pub mod model;

// ============================================================================
// Layer 3: Registration engine (depends on core, model)
// ============================================================================
pub mod matching;

// ============================================================================
// Cross-cutting: errors and configuration
// ============================================================================
pub mod config;
pub mod error;

// ============================================================================
// Convenience re-exports (flat namespace for common use)
// ============================================================================

pub use config::DrishtiConfig;
pub use self::core::math;
pub use self::core::types::{FeatureObservation, ModelEntry, Transform3D};
pub use error::{OdomError, Result};
pub use matching::{
    Correspondence, CorrespondenceMode, IcpParams, MotionEstimate, ProbModelIcp,
};
pub use model::{FeatureModel, ModelSnapshot};
