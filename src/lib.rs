//! # miniball
//!
//! This is a library for computing the smallest enclosing ball of a finite set of
//! points in d-dimensional space, following the iterative algorithm of
//! Fischer, Gärtner and Kutz. Its main consumer is terrain tiling, where the
//! bounding sphere of a tile's vertices feeds the tile header and its horizon
//! occlusion point.
//!
//! # Features
//!
//! - Arbitrary runtime dimension `d >= 1`
//! - Incrementally updated QR factorization of the support (Givens rotations, `O(d²)` per update)
//! - Explicit phase state machine with an iteration cap instead of unbounded loops
//! - Quality diagnostics for the computed ball
//! - Serialization/Deserialization of inputs, options and results with [serde](https://serde.rs)
//!
//! # Basic Usage
//!
//! ```rust
//! use miniball::prelude::*;
//!
//! let points = PointSet::from_points(&[
//!     [0.0, 0.0, 0.0],
//!     [2.0, 0.0, 0.0],
//!     [0.0, 2.0, 0.0],
//!     [1.0, 1.0, 0.5],
//! ])
//! .unwrap();
//!
//! let ball = smallest_enclosing_ball(&points).unwrap();
//! assert!((ball.center[0] - 1.0).abs() < 1e-12);
//! assert!((ball.center[1] - 1.0).abs() < 1e-12);
//! assert!((ball.radius - 2.0_f64.sqrt()).abs() < 1e-12);
//! assert!(points.iter().all(|p| ball.contains(p, 1e-12)));
//! ```
//!
//! # Terrain Tiles
//!
//! Tile vertices are usually stored as `[T; 3]` with `T` any numeric type:
//!
//! ```rust
//! use miniball::prelude::*;
//!
//! let vertices: Vec<[f32; 3]> = vec![[0.0, 0.0, 0.0], [6.0, 0.0, 0.0], [3.0, 1.0, 0.5]];
//! let sphere = tile_bounding_sphere(&vertices).unwrap();
//! assert_eq!(sphere.center, [3.0, 0.0, 0.0]);
//! assert_eq!(sphere.radius, 3.0);
//! ```
//!
//! # Configuration
//!
//! Tolerance and iteration cap are set through [`SolverOptions`](core::options::SolverOptions),
//! and the solver can be stepped phase by phase:
//!
//! ```rust
//! use miniball::prelude::*;
//!
//! let points = generate_random_point_set(100, 4, (-1.0, 1.0), 7).unwrap();
//! let options = SolverOptionsBuilder::default().epsilon(1e-12).build().unwrap();
//! let mut solver = EnclosingBallSolver::with_options(&points, options);
//!
//! while solver.step().unwrap() != Phase::Converged {}
//! let quality = solver.quality().unwrap();
//! assert!(quality.is_within(1e-9));
//! assert!(quality.support_size <= 5);
//! ```
//!
//! # Errors
//!
//! Invalid input is rejected when the [`PointSet`](geometry::point_set::PointSet) is
//! built; the solver itself only fails with
//! [`MiniballError::NonConvergence`](core::algorithms::enclosing_ball::MiniballError::NonConvergence)
//! when the iteration cap is exhausted.
//!
//! # Logging
//!
//! The solver emits [`tracing`](https://docs.rs/tracing) events: `debug` for
//! phase transitions and convergence, `trace` for individual drop and walk
//! decisions, and `warn` on non-convergence. No subscriber is installed by the
//! library.

// Forbid unsafe code throughout the entire crate
#![forbid(unsafe_code)]

#[macro_use]
extern crate derive_builder;

/// The `core` module contains the support basis, the solver and its result types.
pub mod core {
    /// Enclosing-ball algorithms
    pub mod algorithms {
        pub mod enclosing_ball;
        pub use enclosing_ball::*;
    }
    pub mod affine_basis;
    pub mod ball;
    pub mod options;
    // Re-export the `core` modules.
    pub use affine_basis::*;
    pub use algorithms::*;
    pub use ball::*;
    pub use options::*;
}

/// Contains point storage, the dense matrix helpers and geometric utilities.
pub mod geometry {
    pub mod matrix;
    pub mod point_set;
    /// Geometric utility functions for d-dimensional point sets
    pub mod util;
    pub use matrix::*;
    pub use point_set::*;
    pub use util::*;
}

/// A prelude module that re-exports commonly used types and functions.
/// This makes it easier to import the most commonly used items from the crate.
pub mod prelude {
    // Re-export from core
    pub use crate::core::{
        affine_basis::*, algorithms::enclosing_ball::*, ball::*, options::*,
    };

    // Re-export from geometry
    pub use crate::geometry::{point_set::*, util::*};
}

/// The function `is_normal` checks that structs implement `auto` traits.
/// Traits are checked at compile time, so this function is only used for
/// testing.
#[must_use]
pub const fn is_normal<T: Sized + Send + Sync + Unpin>() -> bool {
    true
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use crate::{
        core::{
            affine_basis::AffineBasis,
            algorithms::enclosing_ball::{EnclosingBallSolver, MiniballError},
            ball::{BoundingSphere, BoundingSphereError, EnclosingBall, Quality},
            options::SolverOptions,
        },
        geometry::point_set::PointSet,
        is_normal,
    };

    // =============================================================================
    // TYPE SAFETY TESTS
    // =============================================================================

    #[test]
    fn normal_types() {
        assert!(is_normal::<PointSet>());
        assert!(is_normal::<AffineBasis<'static>>());
        assert!(is_normal::<EnclosingBallSolver<'static>>());
        assert!(is_normal::<EnclosingBall>());
        assert!(is_normal::<BoundingSphere>());
        assert!(is_normal::<BoundingSphereError>());
        assert!(is_normal::<Quality>());
        assert!(is_normal::<SolverOptions>());
        assert!(is_normal::<MiniballError>());
    }

    #[test]
    fn test_prelude_exports() {
        use crate::prelude::*;

        let points = generate_random_point_set(20, 3, (-1.0, 1.0), 1).unwrap();
        let ball = smallest_enclosing_ball(&points).unwrap();
        assert!(points.iter().all(|p| ball.contains(p, 1e-10)));
        assert_eq!(SolverOptions::default().epsilon, DEFAULT_EPSILON);
        assert!(squared_distance(&[0.0, 0.0], &[3.0, 4.0]) > 24.0);
    }
}
