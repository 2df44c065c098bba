//! Incrementally maintained orthogonal basis of a support subset.
//!
//! An [`AffineBasis`] tracks up to `d + 1` members of a [`PointSet`] and keeps a
//! QR factorization of the vectors from the *origin* (the most recently added
//! member) to every other member:
//!
//! ```text
//! A = [S[m_0] - S[o], ..., S[m_{r-1}] - S[o]] = Q R
//! ```
//!
//! `Q` is a `d × d` orthonormal matrix whose first `r` columns span the linear
//! space parallel to the affine hull of the members, and `R` is upper
//! triangular with zero columns beyond `r`. Insertion and removal re-triangularize
//! `R` with Givens rotations in `O(d²)`, so the solver never refactors from
//! scratch.
//!
//! The update scheme follows the subspan maintenance of
//! K. Fischer, B. Gärtner and M. Kutz, "Fast Smallest-Enclosing-Ball
//! Computation in High Dimensions", ESA 2003.

#![forbid(unsafe_code)]

use nalgebra::DVector;

use crate::geometry::matrix::{Givens, Matrix, orthonormality_error};
use crate::geometry::point_set::PointSet;

/// Errors raised by [`AffineBasis`] operations.
///
/// [`SupportFull`](Self::SupportFull), [`AlreadyMember`](Self::AlreadyMember)
/// and [`EmptySupport`](Self::EmptySupport) are degenerate operations: the
/// solver never issues them on valid input, so they indicate a broken
/// algorithm invariant rather than bad data.
#[derive(Clone, Debug, thiserror::Error, PartialEq, Eq)]
pub enum AffineBasisError {
    /// The support already spans the whole space.
    #[error("Support already holds {size} members, the maximum in dimension {dimension}")]
    SupportFull {
        /// Current number of members.
        size: usize,
        /// Ambient dimension.
        dimension: usize,
    },
    /// The point is already a member of the support.
    #[error("Point {index} is already a support member")]
    AlreadyMember {
        /// Global index of the point.
        index: usize,
    },
    /// The operation needs at least one member.
    #[error("Support is empty")]
    EmptySupport,
    /// A local (support) index is not below [`AffineBasis::size`].
    #[error("Local index {index} out of range for support of size {size}")]
    LocalIndexOutOfRange {
        /// Requested local index.
        index: usize,
        /// Current number of members.
        size: usize,
    },
    /// A global (point set) index is not below [`PointSet::size`].
    #[error("Point index {index} out of range for point set of size {size}")]
    PointIndexOutOfRange {
        /// Requested global index.
        index: usize,
        /// Number of points.
        size: usize,
    },
    /// A query point has the wrong number of coordinates.
    #[error("Query point has {actual} coordinates, expected {expected}")]
    DimensionMismatch {
        /// Ambient dimension.
        expected: usize,
        /// Length of the query.
        actual: usize,
    },
}

impl AffineBasisError {
    /// Whether this error is a degenerate operation (an internal invariant
    /// breach) rather than an indexing mistake.
    #[must_use]
    pub const fn is_degenerate_operation(&self) -> bool {
        matches!(
            self,
            Self::SupportFull { .. } | Self::AlreadyMember { .. } | Self::EmptySupport
        )
    }
}

/// QR-factorized support basis over a borrowed [`PointSet`].
///
/// # Examples
///
/// ```rust
/// use miniball::core::affine_basis::AffineBasis;
/// use miniball::geometry::point_set::PointSet;
///
/// let points = PointSet::from_points(&[[0.0, 0.0, 0.0], [2.0, 0.0, 0.0], [0.0, 2.0, 0.0]]).unwrap();
/// let mut basis = AffineBasis::new(&points);
/// basis.add(0).unwrap();
/// basis.add(1).unwrap();
/// basis.add(2).unwrap();
/// assert_eq!(basis.origin(), Some(2));
///
/// // Distance from a point above the plane z = 0 to the affine hull.
/// let (to_hull, squared) = basis.shortest_vector_to_affine_hull(&[0.5, 0.5, 3.0]).unwrap();
/// assert!((squared - 9.0).abs() < 1e-12);
/// assert!((to_hull[2] + 3.0).abs() < 1e-12);
/// ```
#[derive(Clone, Debug)]
pub struct AffineBasis<'a> {
    points: &'a PointSet,
    /// Global indices; the last entry is the origin.
    members: Vec<usize>,
    membership: Vec<bool>,
    q: Matrix,
    r: Matrix,
    /// Scratch vectors reused by the updates.
    u: DVector<f64>,
    w: DVector<f64>,
}

impl<'a> AffineBasis<'a> {
    /// An empty basis over `points` with `Q = I` and `R = 0`.
    #[must_use]
    pub fn new(points: &'a PointSet) -> Self {
        let dimension = points.dimension();
        Self {
            points,
            members: Vec::with_capacity(dimension + 1),
            membership: vec![false; points.size()],
            q: Matrix::identity(dimension, dimension),
            r: Matrix::zeros(dimension, dimension),
            u: DVector::zeros(dimension),
            w: DVector::zeros(dimension),
        }
    }

    /// A basis whose only member is `index`.
    ///
    /// # Errors
    ///
    /// Returns [`AffineBasisError::PointIndexOutOfRange`] for an invalid index.
    pub fn with_member(points: &'a PointSet, index: usize) -> Result<Self, AffineBasisError> {
        let mut basis = Self::new(points);
        basis.add(index)?;
        Ok(basis)
    }

    /// The ambient dimension `d`.
    #[inline]
    #[must_use]
    pub fn dimension(&self) -> usize {
        self.points.dimension()
    }

    /// Number of members, between `0` and `d + 1`.
    #[inline]
    #[must_use]
    pub fn size(&self) -> usize {
        self.members.len()
    }

    /// Whether the support has no members.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Dimension `r` of the affine hull of the members (`size() - 1`).
    #[inline]
    #[must_use]
    pub fn rank(&self) -> usize {
        self.members.len().saturating_sub(1)
    }

    /// Whether point `index` of the point set is a member.
    #[inline]
    #[must_use]
    pub fn is_member(&self, index: usize) -> bool {
        self.membership.get(index).copied().unwrap_or(false)
    }

    /// Global index of the member at `local` position.
    ///
    /// # Errors
    ///
    /// Returns [`AffineBasisError::LocalIndexOutOfRange`] if `local >= size()`.
    pub fn global_index(&self, local: usize) -> Result<usize, AffineBasisError> {
        self.members
            .get(local)
            .copied()
            .ok_or(AffineBasisError::LocalIndexOutOfRange {
                index: local,
                size: self.members.len(),
            })
    }

    /// Global index of the origin, the most recently added member.
    #[inline]
    #[must_use]
    pub fn origin(&self) -> Option<usize> {
        self.members.last().copied()
    }

    /// Global indices of all members in local order; the origin is last.
    #[inline]
    #[must_use]
    pub fn members(&self) -> &[usize] {
        &self.members
    }

    /// Adds point `index` as the new origin.
    ///
    /// The previous origin becomes column `r` of the factorization and every
    /// stored column is re-expressed relative to the new origin through a
    /// rank-one update of `R`.
    ///
    /// # Errors
    ///
    /// Returns [`AffineBasisError::PointIndexOutOfRange`] for an invalid index,
    /// [`AffineBasisError::SupportFull`] if the support already has `d + 1`
    /// members and [`AffineBasisError::AlreadyMember`] if the point is a member.
    pub fn add(&mut self, index: usize) -> Result<(), AffineBasisError> {
        let size = self.points.size();
        if index >= size {
            return Err(AffineBasisError::PointIndexOutOfRange { index, size });
        }
        let dimension = self.dimension();
        if self.members.len() > dimension {
            return Err(AffineBasisError::SupportFull {
                size: self.members.len(),
                dimension,
            });
        }
        if self.membership[index] {
            return Err(AffineBasisError::AlreadyMember { index });
        }

        if let Some(previous_origin) = self.origin() {
            // The new column starts at zero; the update below adds
            // u = previous_origin - index to it and to every older column.
            let column = self.rank();
            self.load_difference(previous_origin, index);
            self.r.column_mut(column).fill(0.0);
            self.members.push(index);
            self.membership[index] = true;
            self.rank_one_update();
        } else {
            self.members.push(index);
            self.membership[index] = true;
        }
        Ok(())
    }

    /// Removes the member at `local` position.
    ///
    /// Removing the origin promotes the previous member to origin.
    ///
    /// # Errors
    ///
    /// Returns [`AffineBasisError::EmptySupport`] if there are no members and
    /// [`AffineBasisError::LocalIndexOutOfRange`] if `local >= size()`.
    pub fn remove(&mut self, local: usize) -> Result<(), AffineBasisError> {
        if self.members.is_empty() {
            return Err(AffineBasisError::EmptySupport);
        }
        let size = self.members.len();
        if local >= size {
            return Err(AffineBasisError::LocalIndexOutOfRange { index: local, size });
        }

        let rank = self.rank();
        self.membership[self.members[local]] = false;
        if rank == 0 {
            self.members.clear();
            return Ok(());
        }

        if local == rank {
            let old_origin = self.members[rank];
            let new_origin = self.members[rank - 1];
            self.load_difference(old_origin, new_origin);
            self.members.pop();
            // Column rank - 1 held new_origin - old_origin and is dropped.
            self.r.column_mut(rank - 1).fill(0.0);
            self.rank_one_update();
        } else {
            for j in local..rank - 1 {
                self.r.swap_columns(j, j + 1);
            }
            self.r.column_mut(rank - 1).fill(0.0);
            self.members.remove(local);
            self.clear_subdiagonal(local);
        }
        Ok(())
    }

    /// The shortest vector from `point` to the affine hull of the members,
    /// together with its squared length.
    ///
    /// # Errors
    ///
    /// Returns [`AffineBasisError::EmptySupport`] without members and
    /// [`AffineBasisError::DimensionMismatch`] for a query of the wrong length.
    pub fn shortest_vector_to_affine_hull(
        &self,
        point: &[f64],
    ) -> Result<(DVector<f64>, f64), AffineBasisError> {
        Ok(self.project_onto_complement(self.origin_minus_query(point, None)?))
    }

    /// [`shortest_vector_to_affine_hull`](Self::shortest_vector_to_affine_hull)
    /// for the query `anchor + offset`.
    ///
    /// The sum is never formed: with `anchor` near the members, `offset` keeps
    /// its full precision even when the coordinates themselves are large.
    ///
    /// # Errors
    ///
    /// As for [`shortest_vector_to_affine_hull`](Self::shortest_vector_to_affine_hull),
    /// with both slices checked against the dimension.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use miniball::core::affine_basis::AffineBasis;
    /// use miniball::geometry::point_set::PointSet;
    ///
    /// let points = PointSet::from_points(&[[4.0e6, 0.0], [4.0e6 + 2.0, 0.0]]).unwrap();
    /// let mut basis = AffineBasis::new(&points);
    /// basis.add(0).unwrap();
    /// basis.add(1).unwrap();
    /// let anchor = points.point(0).unwrap();
    /// let (to_hull, squared) = basis
    ///     .shortest_vector_to_affine_hull_relative(anchor, &[1.0, 1.0e-9])
    ///     .unwrap();
    /// assert!((squared - 1.0e-18).abs() < 1e-30);
    /// assert!((to_hull[1] + 1.0e-9).abs() < 1e-21);
    /// ```
    pub fn shortest_vector_to_affine_hull_relative(
        &self,
        anchor: &[f64],
        offset: &[f64],
    ) -> Result<(DVector<f64>, f64), AffineBasisError> {
        Ok(self.project_onto_complement(self.origin_minus_query(anchor, Some(offset))?))
    }

    fn project_onto_complement(&self, mut to_hull: DVector<f64>) -> (DVector<f64>, f64) {
        for j in 0..self.rank() {
            let direction = self.q.column(j);
            let scale = direction.dot(&to_hull);
            to_hull.axpy(-scale, &direction, 1.0);
        }
        let squared_length = to_hull.norm_squared();
        (to_hull, squared_length)
    }

    /// Affine coefficients of `point` with respect to the members, in local
    /// order (the origin's coefficient is last). They sum to one.
    ///
    /// Only meaningful when `point` lies on, or very near, the affine hull.
    ///
    /// # Errors
    ///
    /// Returns [`AffineBasisError::EmptySupport`] without members and
    /// [`AffineBasisError::DimensionMismatch`] for a query of the wrong length.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use miniball::core::affine_basis::AffineBasis;
    /// use miniball::geometry::point_set::PointSet;
    ///
    /// let points = PointSet::from_points(&[[0.0, 0.0], [4.0, 0.0]]).unwrap();
    /// let mut basis = AffineBasis::new(&points);
    /// basis.add(0).unwrap();
    /// basis.add(1).unwrap();
    /// let lambdas = basis.affine_coefficients(&[1.0, 0.0]).unwrap();
    /// assert!((lambdas[0] - 0.75).abs() < 1e-12); // point 0
    /// assert!((lambdas[1] - 0.25).abs() < 1e-12); // point 1, the origin
    /// ```
    pub fn affine_coefficients(&self, point: &[f64]) -> Result<Vec<f64>, AffineBasisError> {
        Ok(self.solve_coefficients(&-self.origin_minus_query(point, None)?))
    }

    /// [`affine_coefficients`](Self::affine_coefficients) of the point
    /// `anchor + offset`, without forming the sum.
    ///
    /// # Errors
    ///
    /// As for [`affine_coefficients`](Self::affine_coefficients), with both
    /// slices checked against the dimension.
    pub fn affine_coefficients_relative(
        &self,
        anchor: &[f64],
        offset: &[f64],
    ) -> Result<Vec<f64>, AffineBasisError> {
        Ok(self.solve_coefficients(&-self.origin_minus_query(anchor, Some(offset))?))
    }

    /// Coefficients of `relative = query - origin`.
    fn solve_coefficients(&self, relative: &DVector<f64>) -> Vec<f64> {
        let rank = self.rank();
        let mut lambdas = vec![0.0; rank + 1];
        let mut origin_lambda = 1.0;
        // Back-substitution against R, bottom to top.
        for j in (0..rank).rev() {
            let mut rhs = self.q.column(j).dot(relative);
            for k in j + 1..rank {
                rhs -= lambdas[k] * self.r[(j, k)];
            }
            lambdas[j] = rhs / self.r[(j, j)];
            origin_lambda -= lambdas[j];
        }
        lambdas[rank] = origin_lambda;
        lambdas
    }

    /// Largest absolute entry of `A - QR`, where `A` holds the member vectors
    /// relative to the origin.
    #[must_use]
    pub fn representation_error(&self) -> f64 {
        let Some(origin) = self.origin() else {
            return 0.0;
        };
        let origin = self.points.row(origin);
        let mut error = 0.0_f64;
        for (j, &member) in self.members[..self.rank()].iter().enumerate() {
            let reconstructed = &self.q * self.r.column(j);
            let member = self.points.row(member);
            for (i, value) in reconstructed.iter().enumerate() {
                error = error.max((member[i] - origin[i] - value).abs());
            }
        }
        error
    }

    /// Largest absolute entry of `QᵀQ - I`.
    #[must_use]
    pub fn orthonormality_error(&self) -> f64 {
        orthonormality_error(&self.q)
    }

    /// `origin - (anchor + offset)`, subtracting `anchor` first.
    fn origin_minus_query(
        &self,
        anchor: &[f64],
        offset: Option<&[f64]>,
    ) -> Result<DVector<f64>, AffineBasisError> {
        let dimension = self.dimension();
        for len in std::iter::once(anchor.len()).chain(offset.map(<[f64]>::len)) {
            if len != dimension {
                return Err(AffineBasisError::DimensionMismatch {
                    expected: dimension,
                    actual: len,
                });
            }
        }
        let origin = self.points.row(self.origin().ok_or(AffineBasisError::EmptySupport)?);
        let mut difference =
            DVector::from_iterator(dimension, origin.iter().zip(anchor).map(|(o, a)| o - a));
        if let Some(offset) = offset {
            for (d, x) in difference.iter_mut().zip(offset) {
                *d -= x;
            }
        }
        Ok(difference)
    }

    /// Stores `S[a] - S[b]` in the scratch vector `u`.
    fn load_difference(&mut self, a: usize, b: usize) {
        let a = self.points.row(a);
        let b = self.points.row(b);
        for (i, (x, y)) in a.iter().zip(b).enumerate() {
            self.u[i] = x - y;
        }
    }

    /// Adds the scratch vector `u` to every column `j < r` of `A = QR`.
    ///
    /// `w = Qᵀu` is rotated onto the first unit vector, which turns `R` upper
    /// Hessenberg; adding `w₀` to the first row then realizes the update and
    /// [`clear_subdiagonal`](Self::clear_subdiagonal) restores triangularity.
    fn rank_one_update(&mut self) {
        let dimension = self.dimension();
        let rank = self.rank();

        self.w.gemv_tr(1.0, &self.q, &self.u, 0.0);
        for k in (1..dimension).rev() {
            let g = Givens::new(self.w[k - 1], self.w[k]);
            self.w[k - 1] = g.apply(self.w[k - 1], self.w[k]).0;
            self.w[k] = 0.0;
            // Columns left of k - 1 are zero in rows k - 1 and k.
            g.rotate_rows(&mut self.r, k - 1, k, k - 1, rank);
            g.rotate_columns(&mut self.q, k - 1, k);
        }

        for j in 0..rank {
            self.r[(0, j)] += self.w[0];
        }
        self.clear_subdiagonal(0);
    }

    /// Zeroes the subdiagonal entries `R[pos + 1, pos]` for `pos >= start`.
    fn clear_subdiagonal(&mut self, start: usize) {
        let rank = self.rank();
        let end = rank.min(self.dimension().saturating_sub(1));
        for pos in start..end {
            let g = Givens::new(self.r[(pos, pos)], self.r[(pos + 1, pos)]);
            g.rotate_rows(&mut self.r, pos, pos + 1, pos, rank);
            self.r[(pos + 1, pos)] = 0.0;
            g.rotate_columns(&mut self.q, pos, pos + 1);
        }
    }
}
