//! Random point-set generation.
//!
//! Seeded generators used by the test suites and benchmarks to build
//! reproducible inputs of arbitrary dimension.

use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::geometry::point_set::PointSet;

pub use super::RandomPointGenerationError;

/// Generate `n_points` uniformly distributed points in `[min, max)^dimension`
/// from a fixed seed.
///
/// # Errors
///
/// Returns [`RandomPointGenerationError::InvalidRange`] if the range is empty
/// or not finite, and [`RandomPointGenerationError::PointSet`] if the result is
/// not a valid point set (zero points or zero dimension).
///
/// # Examples
///
/// ```
/// use miniball::geometry::util::generate_random_point_set;
///
/// let a = generate_random_point_set(10, 3, (-1.0, 1.0), 42).unwrap();
/// let b = generate_random_point_set(10, 3, (-1.0, 1.0), 42).unwrap();
/// assert_eq!(a, b);
/// assert_eq!(a.size(), 10);
/// ```
pub fn generate_random_point_set(
    n_points: usize,
    dimension: usize,
    range: (f64, f64),
    seed: u64,
) -> Result<PointSet, RandomPointGenerationError> {
    let (min, max) = range;
    if !min.is_finite() || !max.is_finite() || min >= max {
        return Err(RandomPointGenerationError::InvalidRange { min, max });
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let coords = (0..n_points * dimension)
        .map(|_| rng.random_range(min..max))
        .collect();

    Ok(PointSet::new(dimension, coords)?)
}

/// Generate `n_points` points on the sphere of the given `radius` around
/// `center`, from a fixed seed.
///
/// Directions are drawn from a Gaussian-like sum of uniforms and normalized,
/// so every generated point lies on the sphere up to rounding.
///
/// # Errors
///
/// Returns [`RandomPointGenerationError::InvalidRange`] if `radius` is not a
/// finite non-negative value, and [`RandomPointGenerationError::PointSet`] for
/// an empty result.
pub fn generate_points_on_sphere(
    n_points: usize,
    center: &[f64],
    radius: f64,
    seed: u64,
) -> Result<PointSet, RandomPointGenerationError> {
    if !radius.is_finite() || radius < 0.0 {
        return Err(RandomPointGenerationError::InvalidRange {
            min: 0.0,
            max: radius,
        });
    }

    let dimension = center.len();
    let mut rng = StdRng::seed_from_u64(seed);
    let mut coords = Vec::with_capacity(n_points * dimension);
    let mut direction = vec![0.0; dimension];
    for _ in 0..n_points {
        let length = loop {
            for x in &mut direction {
                *x = (0..4).map(|_| rng.random_range(-1.0_f64..1.0)).sum::<f64>();
            }
            let length = super::norms::hypot(&direction);
            if length > 1e-6 {
                break length;
            }
        };
        coords.extend(
            direction
                .iter()
                .zip(center)
                .map(|(d, c)| radius.mul_add(d / length, *c)),
        );
    }

    Ok(PointSet::new(dimension, coords)?)
}
