//! Error types for drishti-odom.

use thiserror::Error;

/// Drishti odometry error type.
#[derive(Error, Debug)]
pub enum OdomError {
    /// Model bootstrap was attempted with zero observations.
    #[error("cannot initialize model from an empty observation set")]
    InsufficientData,

    /// An alignment iteration produced fewer correspondences than required.
    #[error("insufficient correspondences: found {found}, required {required}")]
    InsufficientCorrespondences { found: usize, required: usize },

    /// The alignment loop hit its iteration cap without converging.
    #[error("alignment did not converge within {iterations} iterations")]
    AlignmentDiverged { iterations: u32 },

    /// Persistence I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A model file failed validation on load.
    #[error("corrupt model file: {0}")]
    CorruptFile(String),

    /// Configuration parse failure.
    #[error("configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, OdomError>;
