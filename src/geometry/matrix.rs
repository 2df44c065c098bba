//! Matrix operations.
//!
//! This module provides the planar rotations used to keep the incrementally
//! updated QR factorization of [`AffineBasis`](crate::core::affine_basis::AffineBasis)
//! triangular. Matrices are dense, heap-allocated `nalgebra` matrices because the
//! ambient dimension is only known at runtime.

#![forbid(unsafe_code)]

use nalgebra::DMatrix;

/// Dense dynamically-sized matrix type used by this crate.
pub type Matrix = DMatrix<f64>;

/// A Givens rotation `(c, s)` with `c * a + s * b = ±sqrt(a² + b²)` and
/// `c * b - s * a = 0`.
///
/// The sign of the resulting nonzero entry is unspecified; callers must not
/// rely on it.
///
/// Source: G. H. Golub and C. F. Van Loan, *Matrix Computations*, 2nd edition,
/// Johns Hopkins University Press, 1989, p. 216.
///
/// # Examples
///
/// ```rust
/// use miniball::geometry::matrix::Givens;
///
/// let g = Givens::new(3.0, 4.0);
/// let (kept, zeroed) = g.apply(3.0, 4.0);
/// assert!((kept.abs() - 5.0).abs() < 1e-12);
/// assert!(zeroed.abs() < 1e-12);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Givens {
    /// Cosine of the rotation angle.
    pub c: f64,
    /// Sine of the rotation angle.
    pub s: f64,
}

impl Givens {
    /// The rotation that zeroes `b` against `a`.
    #[must_use]
    pub fn new(a: f64, b: f64) -> Self {
        if b == 0.0 {
            Self { c: 1.0, s: 0.0 }
        } else if b.abs() > a.abs() {
            let t = a / b;
            let s = 1.0 / t.mul_add(t, 1.0).sqrt();
            Self { c: s * t, s }
        } else {
            let t = b / a;
            let c = 1.0 / t.mul_add(t, 1.0).sqrt();
            Self { c, s: c * t }
        }
    }

    /// Rotates the pair `(a, b)`, returning `(c*a + s*b, c*b - s*a)`.
    #[inline]
    #[must_use]
    pub fn apply(self, a: f64, b: f64) -> (f64, f64) {
        (self.c.mul_add(a, self.s * b), self.c.mul_add(b, -(self.s * a)))
    }

    /// Rotates rows `i` and `k` of `m`, restricted to columns `first_col..last_col`.
    pub fn rotate_rows(self, m: &mut Matrix, i: usize, k: usize, first_col: usize, last_col: usize) {
        for j in first_col..last_col {
            let (a, b) = self.apply(m[(i, j)], m[(k, j)]);
            m[(i, j)] = a;
            m[(k, j)] = b;
        }
    }

    /// Rotates columns `i` and `k` of `m` over all rows.
    pub fn rotate_columns(self, m: &mut Matrix, i: usize, k: usize) {
        for row in 0..m.nrows() {
            let (a, b) = self.apply(m[(row, i)], m[(row, k)]);
            m[(row, i)] = a;
            m[(row, k)] = b;
        }
    }
}

/// Largest absolute entry of `QᵀQ - I`.
///
/// Used to check that an incrementally rotated factor is still orthonormal.
///
/// # Examples
///
/// ```rust
/// use miniball::geometry::matrix::{orthonormality_error, Matrix};
///
/// assert_eq!(orthonormality_error(&Matrix::identity(3, 3)), 0.0);
/// ```
#[must_use]
pub fn orthonormality_error(q: &Matrix) -> f64 {
    let gram = q.tr_mul(q);
    let n = gram.nrows();
    (gram - Matrix::identity(n, n)).amax()
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    #[test]
    fn givens_zeroes_second_entry() {
        for &(a, b) in &[(3.0, 4.0), (4.0, 3.0), (0.0, 2.5), (-1.0, 1e-9), (1e8, -7.0)] {
            let g = Givens::new(a, b);
            let (kept, zeroed) = g.apply(a, b);
            assert_relative_eq!(kept.abs(), f64::hypot(a, b), max_relative = 1e-12);
            assert!(zeroed.abs() <= 1e-12 * f64::hypot(a, b));
            assert_relative_eq!(g.c.mul_add(g.c, g.s * g.s), 1.0, epsilon = 1e-14);
        }
    }

    #[test]
    fn givens_identity_when_nothing_to_clear() {
        assert_eq!(Givens::new(2.0, 0.0), Givens { c: 1.0, s: 0.0 });
        assert_eq!(Givens::new(0.0, 0.0), Givens { c: 1.0, s: 0.0 });
    }

    #[test]
    fn rotations_preserve_orthonormality() {
        let mut q = Matrix::identity(4, 4);
        Givens::new(1.0, 2.0).rotate_columns(&mut q, 0, 1);
        Givens::new(-3.0, 0.5).rotate_columns(&mut q, 1, 3);
        Givens::new(0.25, 7.0).rotate_columns(&mut q, 2, 3);
        assert!(orthonormality_error(&q) < 1e-15);
    }

    #[test]
    fn rotate_rows_respects_column_range() {
        let mut m = Matrix::from_row_slice(2, 3, &[1.0, 3.0, 5.0, 2.0, 4.0, 6.0]);
        let g = Givens::new(3.0, 4.0);
        g.rotate_rows(&mut m, 0, 1, 1, 3);
        assert_eq!(m[(0, 0)], 1.0);
        assert_eq!(m[(1, 0)], 2.0);
        assert!(m[(1, 1)].abs() < 1e-12);
    }
}
