//! Dimension checks shared by the operations

use matrica_core::MatrixError;
use crate::types::Matrix;

/// Check that two matrices have compatible dimensions for multiplication
pub fn check_matmul_dims(a: &Matrix, b: &Matrix, op: &'static str) -> Result<(), MatrixError> {
    if a.cols() != b.rows() {
        return Err(MatrixError::DimensionMismatch { op, left: a.shape(), right: b.shape() });
    }
    Ok(())
}

/// Check that every operand has the shape of the first, and that there are at least two
pub fn check_same_dims(operands: &[&Matrix], op: &'static str) -> Result<(), MatrixError> {
    let first = match operands {
        [first, _, ..] => first,
        _ => return Err(MatrixError::TooFewOperands { op, got: operands.len() }),
    };
    if let Some(other) = operands.iter().find(|m| m.shape() != first.shape()) {
        return Err(MatrixError::DimensionMismatch { op, left: first.shape(), right: other.shape() });
    }
    Ok(())
}

/// Check that a matrix is square
pub fn check_square(m: &Matrix, op: &'static str) -> Result<(), MatrixError> {
    if !m.is_square() {
        return Err(MatrixError::NotSquare { op, rows: m.rows(), cols: m.cols() });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use matrica_core::Shape;

    #[test]
    fn test_check_matmul_dims() {
        let a = Matrix::zeros(2, 3).unwrap();
        let b = Matrix::zeros(3, 4).unwrap();
        assert!(check_matmul_dims(&a, &b, "multiply").is_ok());
        assert_eq!(
            check_matmul_dims(&b, &a, "multiply"),
            Err(MatrixError::DimensionMismatch {
                op: "multiply",
                left: Shape::new(3, 4),
                right: Shape::new(2, 3),
            })
        );
    }

    #[test]
    fn test_check_same_dims() {
        let a = Matrix::zeros(2, 2).unwrap();
        let b = Matrix::zeros(2, 2).unwrap();
        let c = Matrix::zeros(2, 3).unwrap();
        assert!(check_same_dims(&[&a, &b], "add").is_ok());
        assert!(check_same_dims(&[&a, &b, &c], "add").is_err());
        assert_eq!(
            check_same_dims(&[&a], "add"),
            Err(MatrixError::TooFewOperands { op: "add", got: 1 })
        );
    }

    #[test]
    fn test_check_square() {
        assert!(check_square(&Matrix::zeros(3, 3).unwrap(), "determinant").is_ok());
        assert!(check_square(&Matrix::zeros(3, 2).unwrap(), "determinant").is_err());
    }
}
