//! Smallest enclosing ball of a d-dimensional point set.
//!
//! This module implements the iterative "Miniball" algorithm of Fischer, Gärtner
//! and Kutz. The solver keeps a candidate ball whose boundary passes through a
//! *support* set of at most `d + 1` points and repeatedly moves the center
//! towards the affine hull of the support until the center lies in the support's
//! convex hull.
//!
//! # Algorithm Overview
//!
//! 1. **Init**: the center starts at the first point; the farthest point becomes
//!    the only support member.
//! 2. **Measure**: compute the shortest vector from the center to the affine hull
//!    of the support.
//! 3. **Drop**: if the center is (numerically) on the hull, express it in affine
//!    coefficients of the support and remove the member with the smallest
//!    non-positive coefficient. When every coefficient is positive the ball is
//!    optimal for its support and the containment check decides convergence.
//! 4. **Walk**: otherwise move the center towards the hull until a non-support
//!    point hits the shrinking boundary; that point joins the support. A walk
//!    that nothing blocks ends on the hull and goes straight to Drop.
//!
//! When rounding leaves a point outside a ball whose support is stable, the
//! support restarts from that point, as in Init but at the current center.
//!
//! Control flow is an explicit [`Phase`] state machine driven by
//! [`EnclosingBallSolver::step`], bounded by an iteration cap (see
//! [`SolverOptions::iteration_cap`]).
//!
//! # References
//!
//! - **Fischer, K., Gärtner, B., Kutz, M.** "Fast Smallest-Enclosing-Ball
//!   Computation in High Dimensions." *Algorithms - ESA 2003*, LNCS 2832,
//!   pp. 630-641.
//!
//! # Examples
//!
//! ```rust
//! use miniball::prelude::*;
//!
//! let points = PointSet::from_points(&[[0.0, 0.0], [1.0, 0.0], [0.0, 1.0], [1.0, 1.0]]).unwrap();
//! let mut solver = EnclosingBallSolver::new(&points);
//! let ball = solver.solve().unwrap();
//!
//! assert!((ball.center[0] - 0.5).abs() < 1e-12);
//! assert!((ball.center[1] - 0.5).abs() < 1e-12);
//! assert!((ball.squared_radius - 0.5).abs() < 1e-12);
//! assert!(solver.quality().unwrap().is_within(1e-12));
//! ```

#![forbid(unsafe_code)]

use std::fmt;

use nalgebra::DVector;
use num_traits::cast::NumCast;
use serde::{Deserialize, Serialize};

use crate::core::affine_basis::{AffineBasis, AffineBasisError};
use crate::core::ball::{BoundingSphere, EnclosingBall, Quality};
use crate::core::options::SolverOptions;
use crate::geometry::point_set::{PointSet, PointSetError};
use crate::geometry::util::squared_distance;

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors that can occur while computing an enclosing ball.
#[derive(Clone, Debug, thiserror::Error, PartialEq)]
pub enum MiniballError {
    /// The input points could not form a valid [`PointSet`].
    #[error("Invalid input: {0}")]
    InvalidInput(#[from] PointSetError),
    /// The support basis rejected an operation; this indicates a broken
    /// solver invariant.
    #[error("Degenerate support operation: {0}")]
    DegenerateOperation(#[from] AffineBasisError),
    /// The iteration cap was reached before convergence.
    #[error("No convergence after {iterations} iterations (cap {cap})")]
    NonConvergence {
        /// Measure steps performed.
        iterations: usize,
        /// The configured cap.
        cap: usize,
    },
}

// =============================================================================
// PHASES
// =============================================================================

/// State of an [`EnclosingBallSolver`]; each [`EnclosingBallSolver::step`]
/// executes the current phase and moves to the next one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Nothing computed yet.
    Init,
    /// Measure the distance from the center to the support's affine hull.
    MeasureAffineDistance,
    /// Try to remove a support member the center does not depend on.
    Drop,
    /// Move the center towards the affine hull.
    Walk,
    /// The ball is final.
    Converged,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Init => "init",
            Self::MeasureAffineDistance => "measure",
            Self::Drop => "drop",
            Self::Walk => "walk",
            Self::Converged => "converged",
        };
        f.write_str(name)
    }
}

// =============================================================================
// SOLVER
// =============================================================================

/// Iterative smallest-enclosing-ball solver over a borrowed [`PointSet`].
///
/// The solver owns its [`AffineBasis`] and ball state; the point set is only
/// read, so several solvers may share one point set across threads.
///
/// All distances are taken relative to the first point, so the result does
/// not lose precision when the whole set sits far from the coordinate origin
/// (for example terrain tiles in Earth-centred coordinates).
#[derive(Clone, Debug)]
pub struct EnclosingBallSolver<'a> {
    points: &'a PointSet,
    options: SolverOptions,
    cap: usize,
    basis: AffineBasis<'a>,
    phase: Phase,
    /// Center minus the first point.
    displacement: DVector<f64>,
    /// Absolute center, rebuilt from `displacement` after every move.
    center: Vec<f64>,
    squared_radius: f64,
    radius: f64,
    /// Shortest vector from the center to the support's affine hull.
    center_to_aff: DVector<f64>,
    dist_to_aff: f64,
    dist_to_aff_square: f64,
    /// Non-support point found outside the ball by a failed convergence check.
    violator: Option<usize>,
    iterations: usize,
}

impl<'a> EnclosingBallSolver<'a> {
    /// A solver with [`SolverOptions::default`].
    #[must_use]
    pub fn new(points: &'a PointSet) -> Self {
        Self::with_options(points, SolverOptions::default())
    }

    /// A solver with explicit options.
    #[must_use]
    pub fn with_options(points: &'a PointSet, options: SolverOptions) -> Self {
        let dimension = points.dimension();
        Self {
            points,
            options,
            cap: options.iteration_cap(points.size(), dimension),
            basis: AffineBasis::new(points),
            phase: Phase::Init,
            displacement: DVector::zeros(dimension),
            center: vec![0.0; dimension],
            squared_radius: 0.0,
            radius: 0.0,
            center_to_aff: DVector::zeros(dimension),
            dist_to_aff: 0.0,
            dist_to_aff_square: 0.0,
            violator: None,
            iterations: 0,
        }
    }

    /// Current phase.
    #[inline]
    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// Current center.
    #[inline]
    #[must_use]
    pub fn center(&self) -> &[f64] {
        &self.center
    }

    /// Current radius.
    #[inline]
    #[must_use]
    pub const fn radius(&self) -> f64 {
        self.radius
    }

    /// Current squared radius.
    #[inline]
    #[must_use]
    pub const fn squared_radius(&self) -> f64 {
        self.squared_radius
    }

    /// Global indices of the current support.
    #[inline]
    #[must_use]
    pub fn support(&self) -> &[usize] {
        self.basis.members()
    }

    /// Measure steps performed so far.
    #[inline]
    #[must_use]
    pub const fn iterations(&self) -> usize {
        self.iterations
    }

    /// The iteration cap of this solve.
    #[inline]
    #[must_use]
    pub const fn iteration_cap(&self) -> usize {
        self.cap
    }

    /// The options this solver was created with.
    #[inline]
    #[must_use]
    pub const fn options(&self) -> &SolverOptions {
        &self.options
    }

    /// Executes the current phase and returns the next one.
    ///
    /// Stepping a converged solver is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`MiniballError::NonConvergence`] when a measure step would
    /// exceed the iteration cap, or [`MiniballError::DegenerateOperation`] if
    /// the support basis rejects an update.
    pub fn step(&mut self) -> Result<Phase, MiniballError> {
        match self.phase {
            Phase::Init => self.initialize()?,
            Phase::MeasureAffineDistance => self.measure_affine_distance()?,
            Phase::Drop => self.try_drop()?,
            Phase::Walk => self.walk()?,
            Phase::Converged => {}
        }
        Ok(self.phase)
    }

    /// Runs the solver to convergence.
    ///
    /// # Errors
    ///
    /// See [`step`](Self::step). No partial result is returned on failure.
    pub fn solve(&mut self) -> Result<EnclosingBall, MiniballError> {
        while self.phase != Phase::Converged {
            self.step()?;
        }
        tracing::debug!(
            iterations = self.iterations,
            support_size = self.basis.size(),
            radius = self.radius,
            "enclosing ball converged"
        );
        Ok(self.ball())
    }

    /// Snapshot of the current ball.
    #[must_use]
    pub fn ball(&self) -> EnclosingBall {
        EnclosingBall {
            center: self.center.clone(),
            radius: self.radius,
            squared_radius: self.squared_radius,
            support: self.basis.members().to_vec(),
            iterations: self.iterations,
        }
    }

    /// Numeric diagnostics of the current ball.
    ///
    /// # Errors
    ///
    /// Returns [`MiniballError::DegenerateOperation`] before initialization,
    /// when the support is still empty.
    pub fn quality(&self) -> Result<Quality, MiniballError> {
        let lambdas = self.coefficients_at_center()?;
        let scale = if self.radius > 0.0 { self.radius } else { 1.0 };

        let mut max_overlength = 0.0_f64;
        let mut max_underlength = 0.0_f64;
        for (i, point) in self.points.iter().enumerate() {
            let gap = self.squared_distance_to_center(point).sqrt() - self.radius;
            max_overlength = max_overlength.max(gap / scale);
            if self.basis.is_member(i) {
                max_underlength = max_underlength.max(-gap / scale);
            }
        }

        Ok(Quality {
            max_overlength,
            max_underlength,
            min_convex_coefficient: lambdas.iter().copied().fold(f64::INFINITY, f64::min),
            representation_error: self.basis.representation_error(),
            iterations: self.iterations,
            support_size: self.basis.size(),
        })
    }

    // =========================================================================
    // PHASES
    // =========================================================================

    fn initialize(&mut self) -> Result<(), MiniballError> {
        let points = self.points;
        let first = points.point(0)?;
        self.displacement.fill(0.0);
        self.center.copy_from_slice(first);

        let mut farthest = 0;
        let mut max_squared = 0.0;
        for (i, point) in points.iter().enumerate() {
            let squared = squared_distance(point, first);
            if squared > max_squared {
                max_squared = squared;
                farthest = i;
            }
        }
        self.squared_radius = max_squared;
        self.radius = max_squared.sqrt();
        self.basis.add(farthest)?;

        tracing::debug!(
            points = points.size(),
            dimension = points.dimension(),
            farthest,
            radius = self.radius,
            cap = self.cap,
            "initialized enclosing ball"
        );
        self.phase = Phase::MeasureAffineDistance;
        Ok(())
    }

    fn measure_affine_distance(&mut self) -> Result<(), MiniballError> {
        if self.iterations >= self.cap {
            tracing::warn!(
                iterations = self.iterations,
                cap = self.cap,
                support_size = self.basis.size(),
                "enclosing ball did not converge"
            );
            return Err(MiniballError::NonConvergence {
                iterations: self.iterations,
                cap: self.cap,
            });
        }
        self.iterations += 1;

        let (to_hull, squared) = self.basis.shortest_vector_to_affine_hull_relative(
            self.points.row(0),
            self.displacement.as_slice(),
        )?;
        self.center_to_aff = to_hull;
        self.dist_to_aff_square = squared;
        self.dist_to_aff = squared.sqrt();

        let full = self.basis.size() == self.points.dimension() + 1;
        self.phase = if self.dist_to_aff <= self.options.epsilon * self.radius || full {
            Phase::Drop
        } else {
            Phase::Walk
        };
        tracing::debug!(
            iteration = self.iterations,
            support_size = self.basis.size(),
            radius = self.radius,
            dist_to_aff = self.dist_to_aff,
            next = %self.phase,
            "measured distance to affine hull"
        );
        Ok(())
    }

    fn try_drop(&mut self) -> Result<(), MiniballError> {
        let lambdas = self.coefficients_at_center()?;
        let (weakest, min_lambda) = lambdas.iter().copied().enumerate().fold(
            (0, f64::INFINITY),
            |best, (i, lambda)| if lambda < best.1 { (i, lambda) } else { best },
        );

        if min_lambda <= self.options.epsilon {
            let dropped = self.basis.global_index(weakest)?;
            self.basis.remove(weakest)?;
            tracing::trace!(dropped, lambda = min_lambda, "dropped support member");
            self.phase = Phase::MeasureAffineDistance;
            return Ok(());
        }

        self.violator = self.farthest_violator();
        self.phase = match self.violator {
            None => Phase::Converged,
            Some(violator) => {
                tracing::trace!(violator, "stable support leaves a point outside the ball");
                Phase::Walk
            }
        };
        Ok(())
    }

    fn walk(&mut self) -> Result<(), MiniballError> {
        if let Some(violator) = self.violator.take() {
            return self.restart_from(violator);
        }

        let points = self.points;
        let threshold = self.options.epsilon * self.radius * self.dist_to_aff;
        let mut scale = 1.0;
        let mut stopper = None;
        for (j, point) in points.iter().enumerate() {
            if self.basis.is_member(j) {
                continue;
            }
            let mut direction_dot = 0.0;
            let mut squared_length = 0.0;
            for (offset, v) in self.offsets_from_center(point).zip(self.center_to_aff.iter()) {
                direction_dot += v * offset;
                squared_length += offset * offset;
            }
            let approach = self.dist_to_aff_square - direction_dot;
            // Points the walk does not approach can never block it.
            if approach <= threshold {
                continue;
            }
            let bound = ((self.squared_radius - squared_length) / (2.0 * approach)).max(0.0);
            if bound < scale {
                scale = bound;
                stopper = Some(j);
            }
        }

        self.displacement.axpy(scale, &self.center_to_aff, 1.0);
        self.sync_center();
        self.update_radius();
        tracing::trace!(scale, ?stopper, radius = self.radius, "walked towards affine hull");
        self.phase = match stopper {
            Some(stopper) => {
                self.basis.add(stopper)?;
                Phase::MeasureAffineDistance
            }
            // An unblocked walk ends on the affine hull.
            None => Phase::Drop,
        };
        Ok(())
    }

    // =========================================================================
    // HELPERS
    // =========================================================================

    /// Restarts the support from `violator`, the point farthest from the
    /// center. Growing the radius to reach it keeps every point inside the
    /// ball with the single support member on the boundary.
    fn restart_from(&mut self, violator: usize) -> Result<(), MiniballError> {
        let previous_support_size = self.basis.size();
        self.basis = AffineBasis::with_member(self.points, violator)?;
        self.update_radius();
        tracing::debug!(
            violator,
            previous_support_size,
            radius = self.radius,
            "restarted support from point outside a stable ball"
        );
        self.phase = Phase::MeasureAffineDistance;
        Ok(())
    }

    /// Recomputes the radius from the support origin.
    fn update_radius(&mut self) {
        if let Some(origin) = self.basis.origin() {
            self.squared_radius = self.squared_distance_to_center(self.points.row(origin));
            self.radius = self.squared_radius.sqrt();
        }
    }

    /// Rebuilds the absolute center from the first point and the displacement.
    fn sync_center(&mut self) {
        let first = self.points.row(0);
        for ((c, x), d) in self.center.iter_mut().zip(first).zip(self.displacement.iter()) {
            *c = x + d;
        }
    }

    /// Components of `point - center`, each formed as `(point - first) - displacement`.
    fn offsets_from_center<'s>(&'s self, point: &'s [f64]) -> impl Iterator<Item = f64> + 's {
        point
            .iter()
            .zip(self.points.row(0))
            .zip(self.displacement.iter())
            .map(|((p, x), d)| (p - x) - d)
    }

    fn squared_distance_to_center(&self, point: &[f64]) -> f64 {
        self.offsets_from_center(point)
            .fold(0.0, |sum, offset| offset.mul_add(offset, sum))
    }

    fn coefficients_at_center(&self) -> Result<Vec<f64>, AffineBasisError> {
        self.basis
            .affine_coefficients_relative(self.points.row(0), self.displacement.as_slice())
    }

    /// The non-support point farthest outside `radius * (1 + epsilon)`, if any.
    fn farthest_violator(&self) -> Option<usize> {
        let tolerance = 1.0 + self.options.epsilon;
        let bound = self.squared_radius * tolerance * tolerance;
        let mut farthest = None;
        let mut max_squared = bound;
        for (i, point) in self.points.iter().enumerate() {
            let squared = self.squared_distance_to_center(point);
            if squared > max_squared && !self.basis.is_member(i) {
                max_squared = squared;
                farthest = Some(i);
            }
        }
        farthest
    }
}

// =============================================================================
// CONVENIENCE FUNCTIONS
// =============================================================================

/// Smallest enclosing ball of `points` with default options.
///
/// # Errors
///
/// See [`EnclosingBallSolver::step`].
///
/// # Examples
///
/// ```rust
/// use miniball::prelude::*;
///
/// let points = PointSet::from_points(&[[3.0, 4.0, 5.0]]).unwrap();
/// let ball = smallest_enclosing_ball(&points).unwrap();
/// assert_eq!(ball.center, vec![3.0, 4.0, 5.0]);
/// assert_eq!(ball.radius, 0.0);
/// ```
pub fn smallest_enclosing_ball(points: &PointSet) -> Result<EnclosingBall, MiniballError> {
    EnclosingBallSolver::new(points).solve()
}

/// Bounding sphere of terrain tile vertices.
///
/// # Errors
///
/// Returns [`MiniballError::InvalidInput`] for an empty slice or coordinates
/// that are not finite or cannot be represented as `f64`.
///
/// # Examples
///
/// ```rust
/// use miniball::prelude::*;
///
/// let vertices: [[f32; 3]; 2] = [[0.0, 0.0, 10.0], [0.0, 0.0, 30.0]];
/// let sphere = tile_bounding_sphere(&vertices).unwrap();
/// assert_eq!(sphere.center, [0.0, 0.0, 20.0]);
/// assert_eq!(sphere.radius, 10.0);
/// ```
pub fn tile_bounding_sphere<T>(vertices: &[[T; 3]]) -> Result<BoundingSphere, MiniballError>
where
    T: NumCast + Copy + fmt::Debug,
{
    let points = PointSet::from_points(vertices)?;
    let ball = smallest_enclosing_ball(&points)?;
    Ok(BoundingSphere {
        center: std::array::from_fn(|i| ball.center[i]),
        radius: ball.radius,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::options::SolverOptionsBuilder;
    use crate::geometry::util::{generate_points_on_sphere, generate_random_point_set};
    use approx::assert_relative_eq;

    fn assert_encloses(points: &PointSet, ball: &EnclosingBall) {
        for (i, point) in points.iter().enumerate() {
            assert!(
                ball.contains(point, 1e-10),
                "point {i} at {point:?} lies outside {ball:?}"
            );
        }
    }

    #[test]
    fn single_point_has_zero_radius() {
        let points = PointSet::new(3, vec![1.5, -2.0, 7.0]).unwrap();
        let ball = smallest_enclosing_ball(&points).unwrap();
        assert_eq!(ball.center, vec![1.5, -2.0, 7.0]);
        assert_eq!(ball.radius, 0.0);
        assert_eq!(ball.support, vec![0]);
    }

    #[test]
    fn two_points_share_the_boundary() {
        let points = PointSet::from_points(&[[0.0, 0.0], [2.0, 0.0]]).unwrap();
        let ball = smallest_enclosing_ball(&points).unwrap();
        assert_relative_eq!(ball.center[0], 1.0, epsilon = 1e-12);
        assert_relative_eq!(ball.center[1], 0.0, epsilon = 1e-12);
        assert_relative_eq!(ball.radius, 1.0, epsilon = 1e-12);
        assert_eq!(ball.support_size(), 2);
    }

    #[test]
    fn unit_square_uses_diagonal() {
        let points =
            PointSet::from_points(&[[0.0, 0.0], [1.0, 0.0], [0.0, 1.0], [1.0, 1.0]]).unwrap();
        let ball = smallest_enclosing_ball(&points).unwrap();
        assert_relative_eq!(ball.center[0], 0.5, epsilon = 1e-12);
        assert_relative_eq!(ball.center[1], 0.5, epsilon = 1e-12);
        assert_relative_eq!(ball.squared_radius, 0.5, epsilon = 1e-12);
        assert!((2..=3).contains(&ball.support_size()));
        assert_encloses(&points, &ball);
    }

    #[test]
    fn duplicate_points_collapse() {
        let points = PointSet::from_points(&[[1.0, 1.0, 1.0]; 5]).unwrap();
        let ball = smallest_enclosing_ball(&points).unwrap();
        assert_eq!(ball.radius, 0.0);
        assert_eq!(ball.support_size(), 1);
    }

    #[test]
    fn interior_points_do_not_enter_support() {
        let points = PointSet::from_points(&[
            [-1.0, 0.0],
            [0.1, 0.2],
            [1.0, 0.0],
            [-0.3, -0.1],
            [0.0, 0.5],
        ])
        .unwrap();
        let ball = smallest_enclosing_ball(&points).unwrap();
        assert_relative_eq!(ball.radius, 1.0, epsilon = 1e-12);
        let mut support = ball.support.clone();
        support.sort_unstable();
        assert_eq!(support, vec![0, 2]);
    }

    #[test]
    fn obtuse_triangle_drops_middle_vertex() {
        // The circumcircle is larger than the ball on the longest edge.
        let points = PointSet::from_points(&[[0.0, 0.0], [4.0, 0.0], [2.0, 0.5]]).unwrap();
        let ball = smallest_enclosing_ball(&points).unwrap();
        assert_relative_eq!(ball.center[0], 2.0, epsilon = 1e-12);
        assert_relative_eq!(ball.center[1], 0.0, epsilon = 1e-12);
        assert_relative_eq!(ball.radius, 2.0, epsilon = 1e-12);
        assert_eq!(ball.support_size(), 2);
    }

    #[test]
    fn regular_simplex_needs_full_support() {
        let points = PointSet::from_points(&[
            [1.0, 1.0, 1.0],
            [1.0, -1.0, -1.0],
            [-1.0, 1.0, -1.0],
            [-1.0, -1.0, 1.0],
        ])
        .unwrap();
        let ball = smallest_enclosing_ball(&points).unwrap();
        for c in &ball.center {
            assert!(c.abs() < 1e-12);
        }
        assert_relative_eq!(ball.squared_radius, 3.0, epsilon = 1e-12);
        assert_eq!(ball.support_size(), 4);
    }

    #[test]
    fn points_on_sphere_recover_sphere() {
        let points = generate_points_on_sphere(200, &[1.0, -2.0, 3.0], 5.0, 9).unwrap();
        let ball = smallest_enclosing_ball(&points).unwrap();
        assert_encloses(&points, &ball);
        assert!(ball.radius <= 5.0 * (1.0 + 1e-10));
        assert!(ball.radius > 4.0);
    }

    #[test]
    fn random_sets_converge_with_good_quality() {
        for dimension in 1..=6 {
            let points = generate_random_point_set(300, dimension, (-50.0, 50.0), 42).unwrap();
            let mut solver = EnclosingBallSolver::new(&points);
            let ball = solver.solve().unwrap();
            assert_encloses(&points, &ball);
            assert!(ball.support_size() <= dimension + 1);

            let quality = solver.quality().unwrap();
            assert!(quality.is_within(1e-9), "dimension {dimension}: {quality:?}");
            assert!(quality.representation_error < 1e-9);
            assert_eq!(quality.iterations, ball.iterations);
        }
    }

    #[test]
    fn stepping_visits_phases_in_order() {
        let points = PointSet::from_points(&[[0.0, 0.0], [2.0, 0.0]]).unwrap();
        let mut solver = EnclosingBallSolver::new(&points);
        assert_eq!(solver.phase(), Phase::Init);

        assert_eq!(solver.step().unwrap(), Phase::MeasureAffineDistance);
        assert_eq!(solver.support(), &[1]);
        assert_relative_eq!(solver.radius(), 2.0);

        // Center (0, 0) is 2 away from the single support point.
        assert_eq!(solver.step().unwrap(), Phase::Walk);
        // Point 0 stops the walk halfway, at center (1, 0).
        assert_eq!(solver.step().unwrap(), Phase::MeasureAffineDistance);
        assert_eq!(solver.support(), &[1, 0]);

        let mut phases = Vec::new();
        while solver.phase() != Phase::Converged {
            phases.push(solver.step().unwrap());
        }
        assert_eq!(phases.last(), Some(&Phase::Converged));
        assert_relative_eq!(solver.center()[0], 1.0, epsilon = 1e-12);

        // Stepping a converged solver changes nothing.
        let iterations = solver.iterations();
        assert_eq!(solver.step().unwrap(), Phase::Converged);
        assert_eq!(solver.iterations(), iterations);
    }

    #[test]
    fn stable_support_with_outside_point_restarts_from_it() {
        // A, B and C lie on the unit circle; D is far below it.
        let h = 3.0_f64.sqrt() / 2.0;
        let points =
            PointSet::from_points(&[[0.0, 1.0], [-h, -0.5], [h, -0.5], [0.0, -5.0]]).unwrap();
        let mut solver = EnclosingBallSolver::new(&points);
        for i in 0..3 {
            solver.basis.add(i).unwrap();
        }
        // Unit circle around the origin, i.e. one unit below point A.
        solver.displacement = DVector::from_vec(vec![0.0, -1.0]);
        solver.sync_center();
        solver.update_radius();
        solver.phase = Phase::Drop;
        assert_eq!(solver.center(), &[0.0, 0.0]);
        assert_relative_eq!(solver.radius(), 1.0, epsilon = 1e-12);

        // Every coefficient is positive, yet D is outside.
        assert_eq!(solver.step().unwrap(), Phase::Walk);
        assert_eq!(solver.violator, Some(3));

        assert_eq!(solver.step().unwrap(), Phase::MeasureAffineDistance);
        assert_eq!(solver.support(), &[3]);
        assert_relative_eq!(solver.radius(), 5.0, epsilon = 1e-12);
        assert_encloses(&points, &solver.ball());

        let ball = solver.solve().unwrap();
        assert_relative_eq!(ball.center[0], 0.0, epsilon = 1e-12);
        assert_relative_eq!(ball.center[1], -2.0, epsilon = 1e-12);
        assert_relative_eq!(ball.radius, 3.0, epsilon = 1e-12);
        assert!(ball.support_size() <= 3);
        assert_encloses(&points, &ball);

        let quality = solver.quality().unwrap();
        assert!(quality.max_underlength <= 1e-9, "{quality:?}");
        assert!(quality.is_within(1e-9), "{quality:?}");
    }

    #[test]
    fn unblocked_walk_lands_on_hull() {
        // From (1, -0.5) the walk to the segment midpoint moves away from (1, 0.1).
        let points = PointSet::from_points(&[[0.0, 0.0], [2.0, 0.0], [1.0, 0.1]]).unwrap();
        let mut solver = EnclosingBallSolver::new(&points);
        for i in [0, 1] {
            solver.basis.add(i).unwrap();
        }
        solver.displacement = DVector::from_vec(vec![1.0, -0.5]);
        solver.sync_center();
        solver.update_radius();
        solver.phase = Phase::MeasureAffineDistance;

        assert_eq!(solver.step().unwrap(), Phase::Walk);
        assert_eq!(solver.step().unwrap(), Phase::Drop);
        assert_relative_eq!(solver.center()[0], 1.0, epsilon = 1e-12);
        assert_relative_eq!(solver.center()[1], 0.0, epsilon = 1e-12);
        assert_eq!(solver.step().unwrap(), Phase::Converged);
        assert_relative_eq!(solver.radius(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn iteration_cap_reports_non_convergence() {
        let points = generate_random_point_set(50, 3, (-1.0, 1.0), 3).unwrap();
        let options = SolverOptionsBuilder::default()
            .max_iterations(1_usize)
            .build()
            .unwrap();
        let mut solver = EnclosingBallSolver::with_options(&points, options);
        assert_eq!(solver.iteration_cap(), 1);
        let err = solver.solve().unwrap_err();
        assert_eq!(
            err,
            MiniballError::NonConvergence {
                iterations: 1,
                cap: 1
            }
        );
    }

    #[test]
    fn quality_before_init_is_an_error() {
        let points = PointSet::new(1, vec![0.0, 1.0]).unwrap();
        let solver = EnclosingBallSolver::new(&points);
        assert_eq!(
            solver.quality(),
            Err(MiniballError::DegenerateOperation(
                AffineBasisError::EmptySupport
            ))
        );
    }

    #[test]
    fn tile_bounding_sphere_rejects_empty_tiles() {
        let vertices: [[f64; 3]; 0] = [];
        assert_eq!(
            tile_bounding_sphere(&vertices),
            Err(MiniballError::InvalidInput(PointSetError::EmptyPointSet))
        );
    }

    #[test]
    fn phase_display_names() {
        assert_eq!(Phase::MeasureAffineDistance.to_string(), "measure");
        assert_eq!(Phase::Converged.to_string(), "converged");
    }
}
