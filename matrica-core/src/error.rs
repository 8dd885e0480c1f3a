//! Error types
//!
//! Engine and parser failures are plain `thiserror` enums. The console layer
//! folds them into a structured [`CalcError`] that carries a machine-readable
//! code, a suggestion, and a severity telling the caller whether to re-prompt
//! or give up.
//!
//! A singular matrix is not an error: inversion reports it as a normal outcome.

use crate::Shape;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Standard error codes (machine-readable)
pub mod codes {
    pub const ALLOCATION: &str = "ALLOCATION";
    pub const INVALID_INPUT: &str = "INVALID_INPUT";
    pub const DIMENSION: &str = "DIMENSION";
    pub const OUT_OF_BOUNDS: &str = "OUT_OF_BOUNDS";
    pub const IO: &str = "IO";
    pub const END_OF_INPUT: &str = "END_OF_INPUT";
}

/// Failures raised by the matrix engine
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatrixError {
    #[error("Allocation failed for a {rows}x{cols} matrix")]
    Allocation { rows: usize, cols: usize },

    #[error("Invalid dimensions {rows}x{cols}: rows and columns must be at least 1")]
    InvalidDimensions { rows: usize, cols: usize },

    #[error("Index ({row}, {col}) out of bounds for a {rows}x{cols} matrix")]
    OutOfBounds { row: usize, col: usize, rows: usize, cols: usize },

    #[error("{op}: incompatible dimensions {left} and {right}")]
    DimensionMismatch { op: &'static str, left: Shape, right: Shape },

    #[error("{op}: requires a square matrix, got {rows}x{cols}")]
    NotSquare { op: &'static str, rows: usize, cols: usize },

    #[error("{op}: requires at least 2 matrices, got {got}")]
    TooFewOperands { op: &'static str, got: usize },

    #[error("Power must be at least 1, got {0}")]
    InvalidPower(u32),

    #[error("Expected {expected} values, got {got}")]
    DataLength { expected: usize, got: usize },
}

impl MatrixError {
    /// True for failures that abort the whole program rather than one request
    pub fn is_allocation(&self) -> bool {
        matches!(self, MatrixError::Allocation { .. })
    }
}

/// Failures raised while validating or converting a line of input
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("Input is empty")]
    Empty,

    #[error("Line exceeds {limit} bytes")]
    TooLong { limit: usize },

    #[error("Line is not valid UTF-8 at byte {position}")]
    InvalidEncoding { position: usize },

    #[error("Invalid character {ch:?} at byte {position}")]
    InvalidCharacter { ch: char, position: usize },

    #[error("Malformed number: {0:?}")]
    MalformedNumber(String),

    #[error("Empty token at position {0}")]
    EmptyToken(usize),

    #[error("Value must be greater than zero: {0:?}")]
    ZeroValue(String),

    #[error("Value out of range: {0:?}")]
    Overflow(String),

    #[error("Expected {expected} numbers, got {got}")]
    TokenCount { expected: usize, got: usize },

    #[error("Destination holds {capacity} values, line has {got}")]
    Capacity { capacity: usize, got: usize },
}

/// How the caller should react to an error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Re-prompt and carry on
    Recoverable,
    /// Abort the program
    Fatal,
}

/// Structured error for the console layer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalcError {
    /// Machine-readable error code
    pub code: String,

    /// Human-readable error message
    pub message: String,

    /// Suggestion for fixing the error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,

    /// Severity level
    pub severity: Severity,
}

impl CalcError {
    /// Create a new recoverable error
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            suggestion: None,
            severity: Severity::Recoverable,
        }
    }

    /// Builder: add suggestion
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Builder: set severity
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    pub fn is_fatal(&self) -> bool {
        self.severity == Severity::Fatal
    }

    pub fn is_end_of_input(&self) -> bool {
        self.code == codes::END_OF_INPUT
    }

    pub fn is_allocation(&self) -> bool {
        self.code == codes::ALLOCATION
    }

    // ========== Common Error Constructors ==========

    pub fn allocation(details: impl Into<String>) -> Self {
        Self::new(codes::ALLOCATION, format!("Memory allocation failure: {}", details.into()))
            .with_severity(Severity::Fatal)
    }

    pub fn invalid_input(details: impl Into<String>) -> Self {
        Self::new(codes::INVALID_INPUT, format!("Input error: {}", details.into()))
            .with_suggestion("Re-enter input")
    }

    pub fn end_of_input() -> Self {
        Self::new(codes::END_OF_INPUT, "End of input")
            .with_severity(Severity::Fatal)
    }
}

impl std::fmt::Display for CalcError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(ref suggestion) = self.suggestion {
            write!(f, " (suggestion: {})", suggestion)?;
        }
        Ok(())
    }
}

impl std::error::Error for CalcError {}

impl From<MatrixError> for CalcError {
    fn from(err: MatrixError) -> Self {
        if err.is_allocation() {
            return Self::allocation(err.to_string());
        }
        match err {
            MatrixError::OutOfBounds { .. } => Self::new(codes::OUT_OF_BOUNDS, err.to_string()),
            _ => Self::new(codes::DIMENSION, err.to_string())
                .with_suggestion("Re-enter the dimensions"),
        }
    }
}

impl From<InputError> for CalcError {
    fn from(err: InputError) -> Self {
        Self::invalid_input(err.to_string())
    }
}

impl From<std::io::Error> for CalcError {
    fn from(err: std::io::Error) -> Self {
        Self::new(codes::IO, format!("I/O error: {}", err)).with_severity(Severity::Fatal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocation_is_fatal() {
        let err: CalcError = MatrixError::Allocation { rows: 3, cols: 4 }.into();
        assert_eq!(err.code, codes::ALLOCATION);
        assert!(err.is_fatal());
        assert!(err.is_allocation());
        assert!(err.message.contains("3x4"));
    }

    #[test]
    fn test_matrix_error_codes() {
        assert!(MatrixError::Allocation { rows: 1, cols: 1 }.is_allocation());
        assert!(!MatrixError::InvalidPower(0).is_allocation());

        let err: CalcError = MatrixError::NotSquare { op: "power", rows: 2, cols: 3 }.into();
        assert_eq!(err.code, codes::DIMENSION);
        assert!(!err.is_fatal());

        let err: CalcError = MatrixError::OutOfBounds { row: 4, col: 0, rows: 2, cols: 2 }.into();
        assert_eq!(err.code, codes::OUT_OF_BOUNDS);
    }

    #[test]
    fn test_invalid_encoding_is_recoverable() {
        let err: CalcError = InputError::InvalidEncoding { position: 0 }.into();
        assert_eq!(err.code, codes::INVALID_INPUT);
        assert!(!err.is_fatal());
    }

    #[test]
    fn test_end_of_input() {
        let err = CalcError::end_of_input();
        assert!(err.is_fatal());
        assert!(err.is_end_of_input());
        assert!(!err.is_allocation());
    }

    #[test]
    fn test_input_error_is_recoverable() {
        let err: CalcError = InputError::TokenCount { expected: 2, got: 3 }.into();
        assert_eq!(err.code, codes::INVALID_INPUT);
        assert!(!err.is_fatal());
        assert_eq!(err.suggestion.as_deref(), Some("Re-enter input"));
    }

    #[test]
    fn test_display() {
        let err = CalcError::invalid_input("bad token");
        assert_eq!(
            err.to_string(),
            "[INVALID_INPUT] Input error: bad token (suggestion: Re-enter input)"
        );
    }

    #[test]
    fn test_dimension_mismatch_message() {
        let err = MatrixError::DimensionMismatch {
            op: "multiply",
            left: Shape::new(2, 3),
            right: Shape::new(2, 3),
        };
        assert_eq!(err.to_string(), "multiply: incompatible dimensions 2x3 and 2x3");
    }

    #[test]
    fn test_serialized_shape() {
        let err: CalcError = MatrixError::Allocation { rows: 1, cols: 1 }.into();
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["code"], "ALLOCATION");
        assert_eq!(json["severity"], "fatal");
        assert!(json.get("suggestion").is_none());
    }
}
