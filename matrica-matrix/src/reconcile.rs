//! Result slot reconciliation
//!
//! Operations write into an `Option<Matrix>` result slot. Before writing they
//! ask for the output shape here:
//! - empty slot: a fresh zero-filled matrix is allocated
//! - same shape: nothing happens, the existing entries are kept
//! - other shape: the buffer is replaced by a zero-filled one and the cached
//!   width is reset to 1
//!
//! On allocation failure the slot is left as it was.

use matrica_core::{MatrixError, Shape};
use tracing::debug;
use crate::types::{alloc_zeroed, Matrix};

impl Matrix {
    /// Make this matrix `rows`x`cols`, discarding the entries only if the shape changes
    pub fn ensure_shape(&mut self, rows: usize, cols: usize) -> Result<(), MatrixError> {
        if self.rows == rows && self.cols == cols {
            return Ok(());
        }

        let data = alloc_zeroed(rows, cols)?;
        debug!(from = %self.shape(), to = %Shape::new(rows, cols), "reallocating result buffer");
        self.data = data;
        self.rows = rows;
        self.cols = cols;
        self.max_width = 1;
        Ok(())
    }
}

/// Give `slot` the shape `rows`x`cols` and return the matrix in it
pub fn reconcile(slot: &mut Option<Matrix>, rows: usize, cols: usize) -> Result<&mut Matrix, MatrixError> {
    match slot.take() {
        Some(mut m) => match m.ensure_shape(rows, cols) {
            Ok(()) => Ok(slot.insert(m)),
            Err(e) => {
                *slot = Some(m);
                Err(e)
            }
        },
        None => Ok(slot.insert(Matrix::zeros(rows, cols)?)),
    }
}
