//! Core matrix type

use matrica_core::{MatrixError, Real, Shape};
use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};
use crate::format::WidthTracker;

/// A dense, row-major matrix of `Real` values
///
/// The buffer always holds exactly `rows * cols` entries. `max_width` caches
/// the widest rendered entry and is used only when printing; every operation
/// that writes a full set of entries recomputes it in the same pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "MatrixData", into = "MatrixData")]
pub struct Matrix {
    pub(crate) rows: usize,
    pub(crate) cols: usize,
    pub(crate) data: Vec<Real>,
    pub(crate) max_width: usize,
}

/// Serialized form: dimensions plus row-major entries
#[derive(Serialize, Deserialize)]
struct MatrixData {
    rows: usize,
    cols: usize,
    data: Vec<Real>,
}

impl TryFrom<MatrixData> for Matrix {
    type Error = MatrixError;

    fn try_from(raw: MatrixData) -> Result<Self, Self::Error> {
        Matrix::from_vec(raw.rows, raw.cols, raw.data)
    }
}

impl From<Matrix> for MatrixData {
    fn from(m: Matrix) -> Self {
        MatrixData { rows: m.rows, cols: m.cols, data: m.data }
    }
}

/// Largest number of entries a single matrix may hold (512 MiB of `f64`)
///
/// Larger shapes fail with `MatrixError::Allocation` before any memory is
/// reserved.
pub const MAX_ENTRIES: usize = 1 << 26;

/// Allocate a zero-filled buffer, reporting failure instead of aborting
pub(crate) fn alloc_zeroed(rows: usize, cols: usize) -> Result<Vec<Real>, MatrixError> {
    if rows == 0 || cols == 0 {
        return Err(MatrixError::InvalidDimensions { rows, cols });
    }
    let len = Shape::new(rows, cols)
        .len()
        .filter(|&n| n <= MAX_ENTRIES)
        .ok_or(MatrixError::Allocation { rows, cols })?;

    let mut data = Vec::new();
    data.try_reserve_exact(len)
        .map_err(|_| MatrixError::Allocation { rows, cols })?;
    data.resize(len, 0.0);
    Ok(data)
}

impl Matrix {
    /// Create a zero-filled `rows`x`cols` matrix
    pub fn zeros(rows: usize, cols: usize) -> Result<Self, MatrixError> {
        let data = alloc_zeroed(rows, cols)?;
        Ok(Self { rows, cols, data, max_width: 1 })
    }

    /// Create an `n`x`n` identity matrix
    pub fn identity(n: usize) -> Result<Self, MatrixError> {
        let mut m = Self::zeros(n, n)?;
        for i in 0..n {
            m.data[i * n + i] = 1.0;
        }
        Ok(m)
    }

    /// Create from row-major entries
    pub fn from_vec(rows: usize, cols: usize, data: Vec<Real>) -> Result<Self, MatrixError> {
        if rows == 0 || cols == 0 {
            return Err(MatrixError::InvalidDimensions { rows, cols });
        }
        let expected = Shape::new(rows, cols)
            .len()
            .ok_or(MatrixError::Allocation { rows, cols })?;
        if data.len() != expected {
            return Err(MatrixError::DataLength { expected, got: data.len() });
        }

        let mut m = Self { rows, cols, data, max_width: 1 };
        m.refresh_width();
        Ok(m)
    }

    /// Create from a list of equally long rows
    pub fn from_rows<R: AsRef<[Real]>>(rows: &[R]) -> Result<Self, MatrixError> {
        let cols = rows.first().map_or(0, |r| r.as_ref().len());
        let mut m = Self::zeros(rows.len(), cols)?;
        m.fill(rows)?;
        Ok(m)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn shape(&self) -> Shape {
        Shape::new(self.rows, self.cols)
    }

    pub fn is_square(&self) -> bool {
        self.rows == self.cols
    }

    /// Cached width of the widest rendered entry
    pub fn max_width(&self) -> usize {
        self.max_width
    }

    /// Row-major view of all entries
    pub fn as_slice(&self) -> &[Real] {
        &self.data
    }

    /// One row as a slice
    pub fn row(&self, row: usize) -> Option<&[Real]> {
        if row >= self.rows {
            return None;
        }
        let start = row * self.cols;
        Some(&self.data[start..start + self.cols])
    }

    fn offset(&self, row: usize, col: usize) -> Result<usize, MatrixError> {
        if row >= self.rows || col >= self.cols {
            return Err(MatrixError::OutOfBounds { row, col, rows: self.rows, cols: self.cols });
        }
        Ok(row * self.cols + col)
    }

    /// Bounds-checked read
    pub fn get(&self, row: usize, col: usize) -> Result<Real, MatrixError> {
        self.offset(row, col).map(|i| self.data[i])
    }

    /// Bounds-checked write
    ///
    /// Leaves `max_width` alone; call [`Matrix::refresh_width`] after a batch
    /// of writes.
    pub fn set(&mut self, row: usize, col: usize, value: Real) -> Result<(), MatrixError> {
        let i = self.offset(row, col)?;
        self.data[i] = value;
        Ok(())
    }

    /// Overwrite every entry from validated rows and recompute the width
    pub fn fill<R: AsRef<[Real]>>(&mut self, rows: &[R]) -> Result<(), MatrixError> {
        if rows.len() != self.rows {
            return Err(MatrixError::DataLength { expected: self.rows, got: rows.len() });
        }
        if let Some(bad) = rows.iter().find(|r| r.as_ref().len() != self.cols) {
            return Err(MatrixError::DataLength { expected: self.cols, got: bad.as_ref().len() });
        }

        let mut width = WidthTracker::new();
        for (dst, &value) in self.data.iter_mut().zip(rows.iter().flat_map(|r| r.as_ref())) {
            *dst = width.observe(value);
        }
        self.max_width = width.finish();
        Ok(())
    }

    /// Recompute `max_width` from the current entries
    pub fn refresh_width(&mut self) {
        let mut width = WidthTracker::new();
        for &value in &self.data {
            width.observe(value);
        }
        self.max_width = width.finish();
    }

    /// Deep copy with fallible allocation
    pub fn try_clone(&self) -> Result<Self, MatrixError> {
        let mut data = alloc_zeroed(self.rows, self.cols)?;
        data.copy_from_slice(&self.data);
        Ok(Self { rows: self.rows, cols: self.cols, data, max_width: self.max_width })
    }

    /// Copy `self` into a result slot
    ///
    /// A slot that already has the same shape keeps its buffer and has its
    /// entries overwritten; any other slot receives a fresh copy.
    pub fn assign_to(&self, slot: &mut Option<Matrix>) -> Result<(), MatrixError> {
        match slot {
            Some(dst) if dst.shape() == self.shape() => {
                dst.data.copy_from_slice(&self.data);
                dst.max_width = self.max_width;
            }
            _ => *slot = Some(self.try_clone()?),
        }
        Ok(())
    }

    /// Entry-wise comparison within `eps`
    pub fn approx_eq(&self, other: &Matrix, eps: Real) -> bool {
        self.shape() == other.shape()
            && self.data.iter().zip(&other.data).all(|(a, b)| (a - b).abs() <= eps)
    }
}

/// Unchecked-by-shape access; panics if the flat index is out of range
impl Index<(usize, usize)> for Matrix {
    type Output = Real;

    fn index(&self, (row, col): (usize, usize)) -> &Real {
        &self.data[row * self.cols + col]
    }
}

impl IndexMut<(usize, usize)> for Matrix {
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut Real {
        &mut self.data[row * self.cols + col]
    }
}
