//! Geometric utility functions for d-dimensional point sets.
//!
//! This module contains norm and distance helpers shared by the solver and its
//! quality checks, together with seeded random point-set generation for tests
//! and benchmarks.

pub mod norms;
pub mod point_generation;

pub use norms::*;
pub use point_generation::*;

use crate::geometry::point_set::PointSetError;

/// Errors that can occur during random point-set generation.
#[derive(Clone, Debug, thiserror::Error, PartialEq)]
pub enum RandomPointGenerationError {
    /// The coordinate range is empty or not finite.
    #[error("Invalid coordinate range: min ({min}) must be finite and less than max ({max})")]
    InvalidRange {
        /// Lower bound.
        min: f64,
        /// Upper bound.
        max: f64,
    },
    /// The generated coordinates do not form a valid point set.
    #[error(transparent)]
    PointSet(#[from] PointSetError),
}
