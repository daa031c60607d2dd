//! Dense point sets and strided coordinate views.

use crate::error::MatchError;

/// Storage order of a flat coordinate buffer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Layout {
    /// Point `i`, coordinate `k` lives at `i * dims + k`.
    #[default]
    RowMajor,
    /// Point `i`, coordinate `k` lives at `k * n_points + i`
    /// (the layout of a MATLAB or Fortran `n_points × dims` matrix).
    ColumnMajor,
}

/// An ordered set of points sharing one dimensionality.
///
/// The coordinates are kept in a single flat buffer in either
/// [`Layout`]; [`PointSet::point`] hands out a strided [`Coords`] view so
/// neither layout is ever copied into the other.
///
/// # Example
///
/// ```
/// use proxima_match::{Layout, PointSet};
///
/// // Two 2-D points stored column-major: x-coordinates first, then y.
/// let points = PointSet::new(vec![0.0, 10.0, 1.0, 2.0], 2, Layout::ColumnMajor).unwrap();
/// assert_eq!(points.len(), 2);
/// assert_eq!(points.point(1).to_vec(), vec![10.0, 2.0]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct PointSet {
    data: Vec<f64>,
    n_points: usize,
    dims: usize,
    layout: Layout,
}

impl PointSet {
    /// Wraps a flat coordinate buffer.
    ///
    /// # Errors
    ///
    /// Returns [`MatchError::ZeroDimension`] if `dims == 0` and
    /// [`MatchError::ShapeMismatch`] if `data.len()` is not a multiple of `dims`.
    pub fn new(data: Vec<f64>, dims: usize, layout: Layout) -> Result<Self, MatchError> {
        if dims == 0 {
            return Err(MatchError::ZeroDimension);
        }
        if !data.len().is_multiple_of(dims) {
            return Err(MatchError::ShapeMismatch {
                len: data.len(),
                dims,
            });
        }
        Ok(Self {
            n_points: data.len() / dims,
            data,
            dims,
            layout,
        })
    }

    /// Creates an empty point set of the given dimensionality.
    pub fn empty(dims: usize) -> Result<Self, MatchError> {
        Self::new(Vec::new(), dims, Layout::RowMajor)
    }

    /// Builds a row-major point set from one slice per point.
    ///
    /// # Errors
    ///
    /// Returns [`MatchError::ZeroDimension`] if `dims == 0` and
    /// [`MatchError::RaggedRow`] if any row does not have exactly `dims`
    /// coordinates.
    pub fn from_rows<R: AsRef<[f64]>>(rows: &[R], dims: usize) -> Result<Self, MatchError> {
        if dims == 0 {
            return Err(MatchError::ZeroDimension);
        }
        let mut data = Vec::with_capacity(rows.len() * dims);
        for (row, coords) in rows.iter().enumerate() {
            let coords = coords.as_ref();
            if coords.len() != dims {
                return Err(MatchError::RaggedRow {
                    row,
                    got: coords.len(),
                    expected: dims,
                });
            }
            data.extend_from_slice(coords);
        }
        Self::new(data, dims, Layout::RowMajor)
    }

    /// Returns the number of points.
    pub fn len(&self) -> usize {
        self.n_points
    }

    /// Returns `true` if the set holds no points.
    pub fn is_empty(&self) -> bool {
        self.n_points == 0
    }

    /// Returns the number of coordinates per point.
    pub fn dims(&self) -> usize {
        self.dims
    }

    /// Returns the storage layout.
    pub fn layout(&self) -> Layout {
        self.layout
    }

    /// Returns the raw coordinate buffer in its storage layout.
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Returns a view of point `i`.
    ///
    /// # Panics
    ///
    /// Panics if `i >= self.len()`.
    #[inline]
    pub fn point(&self, i: usize) -> Coords<'_> {
        assert!(i < self.n_points, "point index {i} out of range");
        match self.layout {
            Layout::RowMajor => Coords {
                data: &self.data[i * self.dims..(i + 1) * self.dims],
                stride: 1,
                dims: self.dims,
            },
            Layout::ColumnMajor => Coords {
                data: &self.data[i..],
                stride: self.n_points,
                dims: self.dims,
            },
        }
    }

    /// Iterates over all points in order.
    pub fn iter(&self) -> impl Iterator<Item = Coords<'_>> + '_ {
        (0..self.n_points).map(move |i| self.point(i))
    }

    /// Returns `true` if every coordinate is finite.
    pub fn is_finite(&self) -> bool {
        self.data.iter().all(|v| v.is_finite())
    }
}

/// A read-only view of one point's coordinates.
///
/// Coordinate `k` is `data[k * stride]`, so both row-major (stride 1) and
/// column-major (stride `n_points`) storage are read in place.
#[derive(Debug, Clone, Copy)]
pub struct Coords<'a> {
    data: &'a [f64],
    stride: usize,
    dims: usize,
}

impl<'a> Coords<'a> {
    /// Creates a view over contiguous coordinates.
    pub fn new(coords: &'a [f64]) -> Self {
        Self {
            data: coords,
            stride: 1,
            dims: coords.len(),
        }
    }

    /// Returns the number of coordinates.
    pub fn dims(&self) -> usize {
        self.dims
    }

    /// Returns coordinate `k`.
    #[inline]
    pub fn get(&self, k: usize) -> f64 {
        debug_assert!(k < self.dims);
        self.data[k * self.stride]
    }

    /// Iterates over the coordinates.
    #[inline]
    pub fn iter(self) -> impl Iterator<Item = f64> + 'a {
        self.data.iter().step_by(self.stride).take(self.dims).copied()
    }

    /// Copies the coordinates into a new vector.
    pub fn to_vec(self) -> Vec<f64> {
        self.iter().collect()
    }
}
