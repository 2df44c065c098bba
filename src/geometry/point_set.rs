//! Flat, immutable storage for `n` points in d-dimensional space.
//!
//! A [`PointSet`] stores its coordinates row-major in a single buffer of
//! `n * d` finite `f64` values. It is validated once at construction and never
//! mutated afterwards, so one instance can back any number of concurrent solves.

#![forbid(unsafe_code)]

use num_traits::cast;
use serde::{Deserialize, Serialize};
use std::any;
use std::fmt;

/// Errors that can occur while building or indexing a [`PointSet`].
///
/// # Examples
///
/// ```rust
/// use miniball::geometry::point_set::{PointSet, PointSetError};
///
/// let err = PointSet::new(2, Vec::new()).unwrap_err();
/// assert!(matches!(err, PointSetError::EmptyPointSet));
/// ```
#[derive(Clone, Debug, thiserror::Error, PartialEq, Eq)]
pub enum PointSetError {
    /// No points were supplied.
    #[error("Point set must contain at least one point")]
    EmptyPointSet,
    /// The ambient dimension is zero.
    #[error("Point set dimension must be at least 1")]
    ZeroDimension,
    /// A flat coordinate buffer does not split evenly into points.
    #[error("Coordinate buffer of length {len} is not a multiple of dimension {dimension}")]
    CoordinateCountMismatch {
        /// Length of the supplied buffer.
        len: usize,
        /// Requested dimension.
        dimension: usize,
    },
    /// A point has a different number of coordinates than the first point.
    #[error("Point {point_index} has {actual} coordinates, expected {expected}")]
    ArityMismatch {
        /// Index of the offending point.
        point_index: usize,
        /// Number of coordinates of the first point.
        expected: usize,
        /// Number of coordinates of the offending point.
        actual: usize,
    },
    /// A coordinate is NaN or infinite.
    #[error(
        "Non-finite coordinate {coordinate_index} of point {point_index}: {coordinate_value}"
    )]
    NonFiniteCoordinate {
        /// Index of the offending point.
        point_index: usize,
        /// Index of the offending coordinate within the point.
        coordinate_index: usize,
        /// Debug representation of the value.
        coordinate_value: String,
    },
    /// A coordinate could not be represented as `f64`.
    #[error(
        "Failed to convert coordinate {coordinate_index} of point {point_index} from {from_type} to f64: {coordinate_value}"
    )]
    ConversionFailed {
        /// Index of the offending point.
        point_index: usize,
        /// Index of the offending coordinate within the point.
        coordinate_index: usize,
        /// Debug representation of the value.
        coordinate_value: String,
        /// Source type name.
        from_type: &'static str,
    },
    /// A point index is not below [`PointSet::size`].
    #[error("Point index {index} out of range for point set of size {size}")]
    PointIndexOutOfRange {
        /// Requested index.
        index: usize,
        /// Number of points.
        size: usize,
    },
    /// A coordinate index is not below [`PointSet::dimension`].
    #[error("Coordinate index {index} out of range for dimension {dimension}")]
    CoordinateIndexOutOfRange {
        /// Requested index.
        index: usize,
        /// Ambient dimension.
        dimension: usize,
    },
}

/// An immutable set of `n >= 1` points in `R^d`, `d >= 1`.
///
/// # Examples
///
/// ```rust
/// use miniball::geometry::point_set::PointSet;
///
/// let points = PointSet::from_points(&[[0.0, 0.0], [2.0, 0.0]]).unwrap();
/// assert_eq!(points.dimension(), 2);
/// assert_eq!(points.size(), 2);
/// assert_eq!(points.coordinate(1, 0).unwrap(), 2.0);
/// assert!(points.coordinate(2, 0).is_err());
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawPointSet")]
pub struct PointSet {
    dimension: usize,
    coords: Vec<f64>,
}

/// Unvalidated wire form used during deserialization.
#[derive(Deserialize)]
struct RawPointSet {
    dimension: usize,
    coords: Vec<f64>,
}

impl TryFrom<RawPointSet> for PointSet {
    type Error = PointSetError;

    fn try_from(raw: RawPointSet) -> Result<Self, Self::Error> {
        Self::new(raw.dimension, raw.coords)
    }
}

impl PointSet {
    /// Builds a point set from a row-major buffer of `n * dimension` coordinates.
    ///
    /// # Errors
    ///
    /// Returns [`PointSetError::ZeroDimension`], [`PointSetError::EmptyPointSet`],
    /// [`PointSetError::CoordinateCountMismatch`] or
    /// [`PointSetError::NonFiniteCoordinate`] for invalid input.
    pub fn new(dimension: usize, coords: Vec<f64>) -> Result<Self, PointSetError> {
        if dimension == 0 {
            return Err(PointSetError::ZeroDimension);
        }
        if coords.is_empty() {
            return Err(PointSetError::EmptyPointSet);
        }
        if coords.len() % dimension != 0 {
            return Err(PointSetError::CoordinateCountMismatch {
                len: coords.len(),
                dimension,
            });
        }
        if let Some(position) = coords.iter().position(|c| !c.is_finite()) {
            return Err(PointSetError::NonFiniteCoordinate {
                point_index: position / dimension,
                coordinate_index: position % dimension,
                coordinate_value: format!("{:?}", coords[position]),
            });
        }
        Ok(Self { dimension, coords })
    }

    /// Builds a point set from fixed-size points of any numeric type.
    ///
    /// Every coordinate is cast to `f64` and checked for finiteness.
    ///
    /// # Errors
    ///
    /// Returns [`PointSetError::EmptyPointSet`] or
    /// [`PointSetError::ZeroDimension`] for empty input, and
    /// [`PointSetError::ConversionFailed`] /
    /// [`PointSetError::NonFiniteCoordinate`] for unusable coordinates.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use miniball::geometry::point_set::PointSet;
    ///
    /// let vertices: [[i32; 3]; 2] = [[0, 0, 0], [4, 0, 3]];
    /// let points = PointSet::from_points(&vertices).unwrap();
    /// assert_eq!(points.point(1).unwrap(), &[4.0, 0.0, 3.0]);
    /// ```
    pub fn from_points<T, const D: usize>(points: &[[T; D]]) -> Result<Self, PointSetError>
    where
        T: cast::NumCast + Copy + fmt::Debug,
    {
        if D == 0 {
            return Err(PointSetError::ZeroDimension);
        }
        let mut coords = Vec::with_capacity(points.len() * D);
        for (point_index, point) in points.iter().enumerate() {
            for (coordinate_index, &c) in point.iter().enumerate() {
                let value: f64 =
                    cast::cast(c).ok_or_else(|| PointSetError::ConversionFailed {
                        point_index,
                        coordinate_index,
                        coordinate_value: format!("{c:?}"),
                        from_type: any::type_name::<T>(),
                    })?;
                coords.push(value);
            }
        }
        Self::new(D, coords)
    }

    /// Builds a point set from variable-length rows; every row must have the
    /// arity of the first one.
    ///
    /// # Errors
    ///
    /// Returns [`PointSetError::EmptyPointSet`] for no rows,
    /// [`PointSetError::ZeroDimension`] for empty rows and
    /// [`PointSetError::ArityMismatch`] when row lengths differ.
    pub fn from_rows<R: AsRef<[f64]>>(rows: &[R]) -> Result<Self, PointSetError> {
        let first = rows.first().ok_or(PointSetError::EmptyPointSet)?;
        let dimension = first.as_ref().len();
        let mut coords = Vec::with_capacity(rows.len() * dimension);
        for (point_index, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != dimension {
                return Err(PointSetError::ArityMismatch {
                    point_index,
                    expected: dimension,
                    actual: row.len(),
                });
            }
            coords.extend_from_slice(row);
        }
        Self::new(dimension, coords)
    }

    /// The ambient dimension `d`.
    #[inline]
    #[must_use]
    pub const fn dimension(&self) -> usize {
        self.dimension
    }

    /// The number of points `n`.
    #[inline]
    #[must_use]
    pub fn size(&self) -> usize {
        self.coords.len() / self.dimension
    }

    /// The `j`-th coordinate of the `i`-th point.
    ///
    /// # Errors
    ///
    /// Returns [`PointSetError::PointIndexOutOfRange`] if `i >= size()` and
    /// [`PointSetError::CoordinateIndexOutOfRange`] if `j >= dimension()`.
    pub fn coordinate(&self, i: usize, j: usize) -> Result<f64, PointSetError> {
        if j >= self.dimension {
            return Err(PointSetError::CoordinateIndexOutOfRange {
                index: j,
                dimension: self.dimension,
            });
        }
        Ok(self.point(i)?[j])
    }

    /// The coordinates of the `i`-th point.
    ///
    /// # Errors
    ///
    /// Returns [`PointSetError::PointIndexOutOfRange`] if `i >= size()`.
    pub fn point(&self, i: usize) -> Result<&[f64], PointSetError> {
        if i >= self.size() {
            return Err(PointSetError::PointIndexOutOfRange {
                index: i,
                size: self.size(),
            });
        }
        Ok(self.row(i))
    }

    /// Iterates over the points in order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &[f64]> + '_ {
        self.coords.chunks_exact(self.dimension)
    }

    /// The underlying row-major coordinate buffer.
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.coords
    }

    /// Unchecked row access for indices the caller has already validated.
    #[inline]
    pub(crate) fn row(&self, i: usize) -> &[f64] {
        &self.coords[i * self.dimension..(i + 1) * self.dimension]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_rejects_invalid_shapes() {
        assert_eq!(
            PointSet::new(0, vec![1.0]),
            Err(PointSetError::ZeroDimension)
        );
        assert_eq!(PointSet::new(3, vec![]), Err(PointSetError::EmptyPointSet));
        assert_eq!(
            PointSet::new(3, vec![1.0, 2.0, 3.0, 4.0]),
            Err(PointSetError::CoordinateCountMismatch {
                len: 4,
                dimension: 3
            })
        );
    }

    #[test]
    fn new_rejects_non_finite_coordinates() {
        let err = PointSet::new(2, vec![0.0, 1.0, 2.0, f64::NAN]).unwrap_err();
        match err {
            PointSetError::NonFiniteCoordinate {
                point_index,
                coordinate_index,
                ..
            } => {
                assert_eq!(point_index, 1);
                assert_eq!(coordinate_index, 1);
            }
            other => panic!("Expected NonFiniteCoordinate, got {other:?}"),
        }

        let err = PointSet::from_points(&[[f64::INFINITY, 0.0]]).unwrap_err();
        assert!(matches!(err, PointSetError::NonFiniteCoordinate { .. }));
    }

    #[test]
    fn from_points_casts_integer_and_f32_inputs() {
        let ints = PointSet::from_points(&[[1_i64, 2], [3, 4]]).unwrap();
        assert_eq!(ints.as_slice(), &[1.0, 2.0, 3.0, 4.0]);

        let floats = PointSet::from_points(&[[0.5_f32, -1.5, 2.0]]).unwrap();
        assert_eq!(floats.dimension(), 3);
        assert_eq!(floats.point(0).unwrap(), &[0.5, -1.5, 2.0]);
    }

    #[test]
    fn from_points_rejects_empty_inputs() {
        let none: [[f64; 3]; 0] = [];
        assert_eq!(
            PointSet::from_points(&none),
            Err(PointSetError::EmptyPointSet)
        );
        let zero_dim: [[f64; 0]; 2] = [[], []];
        assert_eq!(
            PointSet::from_points(&zero_dim),
            Err(PointSetError::ZeroDimension)
        );
    }

    #[test]
    fn from_rows_detects_arity_mismatch() {
        let rows = vec![vec![0.0, 0.0, 0.0], vec![1.0, 1.0], vec![2.0, 2.0, 2.0]];
        assert_eq!(
            PointSet::from_rows(&rows),
            Err(PointSetError::ArityMismatch {
                point_index: 1,
                expected: 3,
                actual: 2
            })
        );

        let empty: Vec<Vec<f64>> = Vec::new();
        assert_eq!(PointSet::from_rows(&empty), Err(PointSetError::EmptyPointSet));
    }

    #[test]
    fn coordinate_access_is_bounds_checked() {
        let points = PointSet::from_rows(&[[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]).unwrap();
        assert_eq!(points.size(), 2);
        assert_eq!(points.coordinate(1, 2), Ok(6.0));
        assert_eq!(
            points.coordinate(2, 0),
            Err(PointSetError::PointIndexOutOfRange { index: 2, size: 2 })
        );
        assert_eq!(
            points.coordinate(0, 3),
            Err(PointSetError::CoordinateIndexOutOfRange {
                index: 3,
                dimension: 3
            })
        );
    }

    #[test]
    fn iter_yields_rows_in_order() {
        let points = PointSet::new(2, vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
        let rows: Vec<&[f64]> = points.iter().collect();
        assert_eq!(rows, vec![&[0.0, 1.0][..], &[2.0, 3.0][..], &[4.0, 5.0][..]]);
    }

    #[test]
    fn deserialization_validates_input() {
        let points = PointSet::from_points(&[[1.0, 2.0], [3.0, 4.0]]).unwrap();
        let json = serde_json::to_string(&points).unwrap();
        let back: PointSet = serde_json::from_str(&json).unwrap();
        assert_eq!(back, points);

        let bad = r#"{"dimension":2,"coords":[1.0,2.0,3.0]}"#;
        let err = serde_json::from_str::<PointSet>(bad).unwrap_err();
        assert!(err.to_string().contains("not a multiple of dimension 2"));
    }
}
