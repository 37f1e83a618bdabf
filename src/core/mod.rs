//! Core foundation: data types and numeric primitives.

pub mod math;
pub mod types;
