//! Matrica Matrix - the matrix engine
//!
//! Provides:
//! - `Matrix`: owned row-major storage with a cached display width
//! - Result slot reconciliation (`reconcile`, `Matrix::ensure_shape`)
//! - Arithmetic (multiply, N-ary add/subtract, integer power, transpose)
//! - Determinant, cofactors, adjugate and inverse by Laplace expansion
//! - Bordered grid rendering (`Display for Matrix`)
//!
//! Operations that write a result come in two flavours: `*_into` functions
//! that fill an `Option<Matrix>` slot, reusing its buffer when the shape
//! matches, and `Matrix` methods that return a new matrix.

mod types;
mod helpers;
mod reconcile;
mod ops;
mod cofactor;
mod format;

pub use types::{Matrix, MAX_ENTRIES};
pub use reconcile::reconcile;
pub use ops::{multiply_into, add_into, subtract_into, power_into, transpose_into};
pub use cofactor::{determinant, adjugate_into, inverse_into, Invertibility};
pub use helpers::{check_matmul_dims, check_same_dims, check_square};
