//! Determinant, cofactors, adjugate and inverse by Laplace expansion
//!
//! Every recursive step builds its own minor and drops it before the next
//! one; nothing is shared between a matrix and its minors. The expansion is
//! O(n!) and is meant for the small matrices typed in at the console.

use matrica_core::{MatrixError, Real};
use tracing::{debug, trace};
use crate::format::WidthTracker;
use crate::helpers::check_square;
use crate::ops::transpose_into;
use crate::reconcile::reconcile;
use crate::types::Matrix;

/// Outcome of an inversion that could be attempted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Invertibility {
    /// The result slot holds the inverse
    Invertible,
    /// Determinant is exactly zero; the result slot was not touched
    Singular,
}

impl Invertibility {
    pub fn is_invertible(&self) -> bool {
        *self == Invertibility::Invertible
    }
}

/// Negate without producing `-0`
fn negate(value: Real) -> Real {
    if value == 0.0 { 0.0 } else { -value }
}

/// The matrix left after deleting `skip_row` and `skip_col`
fn minor(a: &Matrix, skip_row: usize, skip_col: usize) -> Result<Matrix, MatrixError> {
    let mut sub = Matrix::zeros(a.rows - 1, a.cols - 1)?;
    let mut dst = sub.data.iter_mut();
    for (i, row) in a.data.chunks(a.cols).enumerate() {
        if i == skip_row {
            continue;
        }
        for (j, &value) in row.iter().enumerate() {
            if j == skip_col {
                continue;
            }
            if let Some(slot) = dst.next() {
                *slot = value;
            }
        }
    }
    Ok(sub)
}

/// Determinant of a square matrix of size >= 1
fn expand(a: &Matrix) -> Result<Real, MatrixError> {
    match a.rows {
        1 => Ok(a.data[0]),
        2 => {
            // a21 is read from (0, 1) and a12 from (1, 0)
            let a11 = a[(0, 0)];
            let a21 = a[(0, 1)];
            let a12 = a[(1, 0)];
            let a22 = a[(1, 1)];
            Ok(a11 * a22 - a21 * a12)
        }
        n => {
            trace!(n, "laplace expansion");
            let mut sum: Real = 0.0;
            for col in 0..n {
                let entry = a[(0, col)];
                let sub = minor(a, 0, col)?;
                let term = entry * expand(&sub)?;
                if col % 2 == 0 {
                    sum += term;
                } else {
                    sum -= term;
                }
            }
            Ok(sum)
        }
    }
}

/// `C[i][j] = (-1)^(i+j) · det(minor(a, i, j))`, for `n >= 2`
fn cofactor_matrix(a: &Matrix) -> Result<Matrix, MatrixError> {
    let n = a.rows;
    let mut out = Matrix::zeros(n, n)?;
    let mut width = WidthTracker::new();
    for i in 0..n {
        for j in 0..n {
            let det = expand(&minor(a, i, j)?)?;
            let signed = if (i + j) % 2 == 0 { det } else { negate(det) };
            out[(i, j)] = width.observe(signed);
        }
    }
    out.max_width = width.finish();
    Ok(out)
}

/// Adjugate of a 1x1 or 2x2 matrix, written into an already shaped `out`
fn small_adjugate_to(a: &Matrix, out: &mut Matrix) {
    if a.rows == 1 {
        out.data[0] = if a.data[0] != 0.0 { 1.0 } else { 0.0 };
        out.max_width = 1;
        return;
    }

    let mut width = WidthTracker::new();
    out[(0, 0)] = width.observe(a[(1, 1)]);
    out[(0, 1)] = width.observe(negate(a[(0, 1)]));
    out[(1, 0)] = width.observe(negate(a[(1, 0)]));
    out[(1, 1)] = width.observe(a[(0, 0)]);
    out.max_width = width.finish();
}

/// Determinant of a square matrix
pub fn determinant(a: &Matrix) -> Result<Real, MatrixError> {
    check_square(a, "determinant")?;
    expand(a)
}

/// `slot = adj(a)`
///
/// For 3x3 and larger the cofactor matrix is built before the slot is
/// touched, so a failure leaves the slot as it was.
pub fn adjugate_into(a: &Matrix, slot: &mut Option<Matrix>) -> Result<(), MatrixError> {
    check_square(a, "adjugate")?;
    if a.rows <= 2 {
        let out = reconcile(slot, a.rows, a.cols)?;
        small_adjugate_to(a, out);
        return Ok(());
    }
    let cofactors = cofactor_matrix(a)?;
    transpose_into(&cofactors, slot)
}

/// `slot = a⁻¹` unless `a` is singular
///
/// A zero determinant is a normal outcome: `Singular` is returned and the
/// slot is left alone.
pub fn inverse_into(a: &Matrix, slot: &mut Option<Matrix>) -> Result<Invertibility, MatrixError> {
    check_square(a, "inverse")?;
    let det = expand(a)?;
    if det == 0.0 {
        debug!(shape = %a.shape(), "matrix is singular");
        return Ok(Invertibility::Singular);
    }

    let adjugate = a.adjugate()?;
    let out = reconcile(slot, a.rows, a.cols)?;
    let mut width = WidthTracker::new();
    for (dst, &value) in out.data.iter_mut().zip(&adjugate.data) {
        *dst = width.observe(value / det);
    }
    out.max_width = width.finish();
    Ok(Invertibility::Invertible)
}

impl Matrix {
    pub fn determinant(&self) -> Result<Real, MatrixError> {
        determinant(self)
    }

    /// Matrix of cofactors; a 1x1 matrix has the single cofactor 1
    pub fn cofactors(&self) -> Result<Matrix, MatrixError> {
        check_square(self, "cofactors")?;
        if self.rows == 1 {
            return Matrix::from_vec(1, 1, vec![1.0]);
        }
        cofactor_matrix(self)
    }

    pub fn adjugate(&self) -> Result<Matrix, MatrixError> {
        check_square(self, "adjugate")?;
        if self.rows <= 2 {
            let mut out = Matrix::zeros(self.rows, self.cols)?;
            small_adjugate_to(self, &mut out);
            return Ok(out);
        }
        cofactor_matrix(self)?.transpose()
    }

    /// The inverse, or `None` when the determinant is zero
    pub fn inverse(&self) -> Result<Option<Matrix>, MatrixError> {
        let mut slot = None;
        match inverse_into(self, &mut slot)? {
            Invertibility::Invertible => Ok(slot),
            Invertibility::Singular => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::DMatrix;

    const EPS: Real = 1e-9;

    fn m(rows: &[&[Real]]) -> Matrix {
        Matrix::from_rows(rows).unwrap()
    }

    fn oracle(a: &Matrix) -> DMatrix<f64> {
        DMatrix::from_row_slice(a.rows(), a.cols(), a.as_slice())
    }

    fn sample_4x4() -> Matrix {
        m(&[
            &[2.0, -1.0, 0.5, 3.0],
            &[1.0, 4.0, -2.0, 0.0],
            &[0.0, 1.5, 3.0, -1.0],
            &[5.0, 0.0, 1.0, 2.0],
        ])
    }

    #[test]
    fn test_determinant_small() {
        assert_eq!(m(&[&[-3.5]]).determinant(), Ok(-3.5));
        assert_eq!(m(&[&[4.0, 7.0], &[2.0, 6.0]]).determinant(), Ok(10.0));
        assert_eq!(m(&[&[1.0, 2.0], &[3.0, 4.0]]).determinant(), Ok(-2.0));
    }

    #[test]
    fn test_determinant_3x3() {
        let a = m(&[&[6.0, 1.0, 1.0], &[4.0, -2.0, 5.0], &[2.0, 8.0, 7.0]]);
        assert_eq!(a.determinant(), Ok(-306.0));
    }

    #[test]
    fn test_determinant_matches_oracle() {
        let a = sample_4x4();
        let det = a.determinant().unwrap();
        assert!((det - oracle(&a).determinant()).abs() < EPS);
    }

    #[test]
    fn test_determinant_of_transpose() {
        let a = sample_4x4();
        let t = a.transpose().unwrap();
        assert!((a.determinant().unwrap() - t.determinant().unwrap()).abs() < EPS);

        let b = m(&[&[4.0, 7.0], &[2.0, 6.0]]);
        assert_eq!(b.determinant(), b.transpose().unwrap().determinant());
    }

    #[test]
    fn test_determinant_not_square() {
        assert!(matches!(
            m(&[&[1.0, 2.0]]).determinant(),
            Err(MatrixError::NotSquare { op: "determinant", rows: 1, cols: 2 })
        ));
    }

    #[test]
    fn test_adjugate_1x1() {
        assert_eq!(m(&[&[5.0]]).adjugate().unwrap().as_slice(), &[1.0]);
        assert_eq!(m(&[&[0.0]]).adjugate().unwrap().as_slice(), &[0.0]);
    }

    #[test]
    fn test_adjugate_2x2() {
        let adj = m(&[&[4.0, 7.0], &[2.0, 6.0]]).adjugate().unwrap();
        assert_eq!(adj.as_slice(), &[6.0, -7.0, -2.0, 4.0]);
        assert_eq!(adj.max_width(), 2);

        let adj = m(&[&[1.0, 0.0], &[0.0, 1.0]]).adjugate().unwrap();
        assert!(adj.as_slice().iter().all(|v| v.is_sign_positive()));
    }

    #[test]
    fn test_adjugate_3x3() {
        let a = m(&[&[1.0, 2.0, 3.0], &[0.0, 1.0, 4.0], &[5.0, 6.0, 0.0]]);
        let adj = a.adjugate().unwrap();
        assert_eq!(
            adj.as_slice(),
            &[-24.0, 18.0, 5.0, 20.0, -15.0, -4.0, -5.0, 4.0, 1.0]
        );
        // a · adj(a) = det(a) · I
        let product = a.multiply(&adj).unwrap();
        let det = a.determinant().unwrap();
        assert_eq!(det, 1.0);
        assert!(product.approx_eq(&Matrix::identity(3).unwrap(), EPS));
    }

    #[test]
    fn test_cofactors() {
        let a = m(&[&[1.0, 2.0, 3.0], &[0.0, 1.0, 4.0], &[5.0, 6.0, 0.0]]);
        let c = a.cofactors().unwrap();
        assert_eq!(c, a.adjugate().unwrap().transpose().unwrap());
        assert_eq!(m(&[&[9.0]]).cofactors().unwrap().as_slice(), &[1.0]);
    }

    #[test]
    fn test_inverse_2x2() {
        let a = m(&[&[4.0, 7.0], &[2.0, 6.0]]);
        let inv = a.inverse().unwrap().unwrap();
        let expected = m(&[&[0.6, -0.7], &[-0.2, 0.4]]);
        assert!(inv.approx_eq(&expected, EPS));
        assert_eq!(inv.max_width(), 4);
    }

    #[test]
    fn test_inverse_1x1() {
        let inv = m(&[&[4.0]]).inverse().unwrap().unwrap();
        assert_eq!(inv.as_slice(), &[0.25]);
        assert_eq!(inv.max_width(), 4);
    }

    #[test]
    fn test_inverse_times_matrix_is_identity() {
        let a = sample_4x4();
        let inv = a.inverse().unwrap().unwrap();
        let id = Matrix::identity(4).unwrap();
        assert!(a.multiply(&inv).unwrap().approx_eq(&id, EPS));
        assert!(inv.multiply(&a).unwrap().approx_eq(&id, EPS));

        let reference = oracle(&a).try_inverse().unwrap();
        assert!(inv.approx_eq(&Matrix::from_vec(4, 4, reference.transpose().as_slice().to_vec()).unwrap(), EPS));
    }

    #[test]
    fn test_singular() {
        let a = m(&[&[1.0, 2.0], &[2.0, 4.0]]);
        assert_eq!(a.inverse(), Ok(None));

        let previous = m(&[&[9.0]]);
        let mut slot = Some(previous.clone());
        assert_eq!(inverse_into(&a, &mut slot), Ok(Invertibility::Singular));
        assert_eq!(slot, Some(previous));

        let mut empty = None;
        assert_eq!(inverse_into(&a, &mut empty), Ok(Invertibility::Singular));
        assert!(empty.is_none());
    }

    #[test]
    fn test_inverse_into_reuses_slot() {
        let a = m(&[&[2.0, 0.0], &[0.0, 4.0]]);
        let mut slot = Some(Matrix::zeros(2, 2).unwrap());
        let outcome = inverse_into(&a, &mut slot).unwrap();
        assert!(outcome.is_invertible());
        assert_eq!(slot.unwrap().as_slice(), &[0.5, 0.0, 0.0, 0.25]);
    }

    #[test]
    fn test_adjugate_into_slot() {
        let a = m(&[&[1.0, 2.0, 3.0], &[0.0, 1.0, 4.0], &[5.0, 6.0, 0.0]]);
        let mut slot = Some(Matrix::zeros(1, 1).unwrap());
        adjugate_into(&a, &mut slot).unwrap();
        assert_eq!(slot, Some(a.adjugate().unwrap()));
    }
}
