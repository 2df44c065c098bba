//! Result types of a solve.
//!
//! - [`EnclosingBall`]: center, radius and support of the smallest enclosing ball.
//! - [`Quality`]: numeric diagnostics measuring how well a ball satisfies the
//!   optimality conditions.
//! - [`BoundingSphere`]: the three-dimensional form used for terrain tiles.

#![forbid(unsafe_code)]

use serde::{Deserialize, Serialize};

use crate::geometry::util::squared_distance;

/// The smallest enclosing ball of a point set.
///
/// # Examples
///
/// ```rust
/// use miniball::prelude::*;
///
/// let points = PointSet::from_points(&[[0.0, 0.0], [2.0, 0.0]]).unwrap();
/// let ball = smallest_enclosing_ball(&points).unwrap();
/// assert!((ball.radius - 1.0).abs() < 1e-12);
/// assert!(ball.contains(&[1.0, 0.5], 1e-12));
/// assert_eq!(ball.support_size(), 2);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnclosingBall {
    /// Center coordinates.
    pub center: Vec<f64>,
    /// Radius, `sqrt(squared_radius)`.
    pub radius: f64,
    /// Squared radius as maintained by the solver.
    pub squared_radius: f64,
    /// Global indices of the support points, in support order.
    pub support: Vec<usize>,
    /// Measure steps taken by the solve.
    pub iterations: usize,
}

impl EnclosingBall {
    /// Number of support points, between `1` and `d + 1`.
    #[inline]
    #[must_use]
    pub fn support_size(&self) -> usize {
        self.support.len()
    }

    /// Dimension of the center.
    #[inline]
    #[must_use]
    pub fn dimension(&self) -> usize {
        self.center.len()
    }

    /// Whether `point` lies within `radius * (1 + tolerance)` of the center.
    ///
    /// A point of the wrong dimension is never contained.
    #[must_use]
    pub fn contains(&self, point: &[f64], tolerance: f64) -> bool {
        if point.len() != self.center.len() {
            return false;
        }
        let bound = self.radius * (1.0 + tolerance);
        squared_distance(point, &self.center) <= bound * bound
    }
}

/// Numeric diagnostics of a converged ball.
///
/// Lengths are relative to the radius when it is positive, absolute otherwise.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Quality {
    /// Largest amount by which any point lies outside the ball.
    pub max_overlength: f64,
    /// Largest amount by which a support point lies inside the boundary.
    pub max_underlength: f64,
    /// Smallest affine coefficient of the center with respect to the support.
    /// Non-negative (up to noise) for an optimal ball.
    pub min_convex_coefficient: f64,
    /// Largest absolute entry of `A - QR` for the final support basis.
    pub representation_error: f64,
    /// Measure steps taken.
    pub iterations: usize,
    /// Number of support points.
    pub support_size: usize,
}

impl Quality {
    /// Whether the ball is optimal within `tolerance`: no point outside, the
    /// support on the boundary and the center in their convex hull.
    #[must_use]
    pub fn is_within(&self, tolerance: f64) -> bool {
        self.max_overlength <= tolerance
            && self.max_underlength <= tolerance
            && self.min_convex_coefficient >= -tolerance
    }
}

/// Errors converting an [`EnclosingBall`] into a [`BoundingSphere`].
#[derive(Clone, Copy, Debug, thiserror::Error, PartialEq, Eq)]
pub enum BoundingSphereError {
    /// The ball does not live in three dimensions.
    #[error("Bounding sphere needs a {expected}-dimensional ball, got dimension {actual}")]
    DimensionMismatch {
        /// Always three.
        expected: usize,
        /// Dimension of the ball.
        actual: usize,
    },
}

/// Bounding sphere of a terrain tile.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoundingSphere {
    /// Sphere center.
    pub center: [f64; 3],
    /// Sphere radius.
    pub radius: f64,
}

impl BoundingSphere {
    /// Whether `point` lies within `radius * (1 + tolerance)` of the center.
    #[must_use]
    pub fn contains(&self, point: [f64; 3], tolerance: f64) -> bool {
        let bound = self.radius * (1.0 + tolerance);
        squared_distance(&point, &self.center) <= bound * bound
    }
}

impl TryFrom<&EnclosingBall> for BoundingSphere {
    type Error = BoundingSphereError;

    fn try_from(ball: &EnclosingBall) -> Result<Self, Self::Error> {
        match ball.center.as_slice() {
            &[x, y, z] => Ok(Self {
                center: [x, y, z],
                radius: ball.radius,
            }),
            other => Err(BoundingSphereError::DimensionMismatch {
                expected: 3,
                actual: other.len(),
            }),
        }
    }
}
