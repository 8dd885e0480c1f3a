//! Matrix dimensions

use serde::{Deserialize, Serialize};
use std::fmt;

/// Rows and columns of a matrix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Shape {
    pub rows: usize,
    pub cols: usize,
}

impl Shape {
    pub const fn new(rows: usize, cols: usize) -> Self {
        Self { rows, cols }
    }

    pub fn is_square(&self) -> bool {
        self.rows == self.cols
    }

    /// Number of entries, or `None` if `rows * cols` overflows
    pub fn len(&self) -> Option<usize> {
        self.rows.checked_mul(self.cols)
    }

    pub fn transposed(&self) -> Self {
        Self::new(self.cols, self.rows)
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.rows, self.cols)
    }
}
