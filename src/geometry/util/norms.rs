//! Vector norm and distance computations.
//!
//! This module provides numerically stable functions for computing norms and
//! distances of d-dimensional coordinate slices.

/// Sum of squares of `coords`.
///
/// # Examples
///
/// ```
/// use miniball::geometry::util::squared_norm;
///
/// assert_eq!(squared_norm(&[3.0, 4.0]), 25.0);
/// assert_eq!(squared_norm(&[1.0, 2.0, 2.0]), 9.0);
/// ```
#[inline]
#[must_use]
pub fn squared_norm(coords: &[f64]) -> f64 {
    coords.iter().fold(0.0, |acc, &x| x.mul_add(x, acc))
}

/// Squared Euclidean distance between two points of equal dimension.
///
/// Extra coordinates of the longer slice are ignored.
///
/// # Examples
///
/// ```
/// use miniball::geometry::util::squared_distance;
///
/// assert_eq!(squared_distance(&[1.0, 1.0], &[4.0, 5.0]), 25.0);
/// ```
#[inline]
#[must_use]
pub fn squared_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).fold(0.0, |acc, (&x, &y)| {
        let diff = x - y;
        diff.mul_add(diff, acc)
    })
}

/// The Euclidean norm of `coords`, scaled by the largest component so that
/// very large or very small coordinates neither overflow nor underflow.
///
/// # Examples
///
/// ```
/// use miniball::geometry::util::hypot;
///
/// assert_eq!(hypot(&[3.0, 4.0]), 5.0);
/// assert_eq!(hypot(&[1.0, 2.0, 2.0]), 3.0);
/// assert!(hypot(&[1e200, 1e200, 1e200]).is_finite());
/// ```
#[must_use]
pub fn hypot(coords: &[f64]) -> f64 {
    match coords {
        [] => 0.0,
        [x] => x.abs(),
        [x, y] => x.hypot(*y),
        _ => {
            let max_abs = coords.iter().fold(0.0_f64, |acc, x| acc.max(x.abs()));
            if max_abs == 0.0 {
                return 0.0;
            }
            let sum_of_scaled_squares = coords.iter().fold(0.0, |acc, &x| {
                let scaled = x / max_abs;
                scaled.mul_add(scaled, acc)
            });
            max_abs * sum_of_scaled_squares.sqrt()
        }
    }
}

/// Euclidean distance between two points of equal dimension.
///
/// # Examples
///
/// ```
/// use miniball::geometry::util::distance;
///
/// assert_eq!(distance(&[0.0, 0.0, 0.0], &[2.0, 3.0, 6.0]), 7.0);
/// ```
#[must_use]
pub fn distance(a: &[f64], b: &[f64]) -> f64 {
    let diff: Vec<f64> = a.iter().zip(b).map(|(x, y)| x - y).collect();
    hypot(&diff)
}
