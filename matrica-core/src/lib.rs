//! Matrica Core - Fundamental types
//!
//! This crate provides the pieces shared by the matrix engine and the console:
//! - `Real`: the scalar type, the trailing-zero-free entry formatter and the
//!   general formatter for scalar results
//! - `Shape`: matrix dimensions
//! - `input`: validation and conversion of space-separated number lines
//! - `MatrixError`, `InputError`, `CalcError`: error types

mod number;
mod shape;
mod error;
pub mod input;

pub use number::{Real, DECIMAL_PLACES, SIGNIFICANT_DIGITS, format_real, format_general, display_width};
pub use shape::Shape;
pub use error::{MatrixError, InputError, CalcError, Severity, codes};
pub use input::TokenKind;
