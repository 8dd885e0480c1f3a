//! Matrix operations: multiply, add, subtract, power, transpose
//!
//! Each operation comes in two forms. The `*_into` functions write into a
//! result slot through [`reconcile`], reusing its buffer when the shape
//! already matches. The `Matrix` methods return a freshly allocated result.

use matrica_core::{MatrixError, Real};
use tracing::debug;
use crate::format::WidthTracker;
use crate::helpers::{check_matmul_dims, check_same_dims, check_square};
use crate::reconcile::reconcile;
use crate::types::Matrix;

// ============ kernels ============

/// `out` must already be `a.rows` x `b.cols`
fn multiply_to(a: &Matrix, b: &Matrix, out: &mut Matrix) {
    let mut width = WidthTracker::new();
    for i in 0..a.rows {
        for j in 0..b.cols {
            let mut sum: Real = 0.0;
            for k in 0..a.cols {
                sum += a[(i, k)] * b[(k, j)];
            }
            out[(i, j)] = width.observe(sum);
        }
    }
    out.max_width = width.finish();
}

/// First operand positive; the rest added or, with `negate_rest`, subtracted
fn combine_to(operands: &[&Matrix], negate_rest: bool, out: &mut Matrix) {
    let mut width = WidthTracker::new();
    for (idx, dst) in out.data.iter_mut().enumerate() {
        let mut sum: Real = 0.0;
        for (n, m) in operands.iter().enumerate() {
            if n > 0 && negate_rest {
                sum -= m.data[idx];
            } else {
                sum += m.data[idx];
            }
        }
        *dst = width.observe(sum);
    }
    out.max_width = width.finish();
}

/// `out` must already be `a.cols` x `a.rows`
fn transpose_to(a: &Matrix, out: &mut Matrix) {
    for i in 0..a.rows {
        for j in 0..a.cols {
            out[(j, i)] = a[(i, j)];
        }
    }
    out.max_width = a.max_width;
}

// ============ multiply ============

/// `slot = a × b`
pub fn multiply_into(a: &Matrix, b: &Matrix, slot: &mut Option<Matrix>) -> Result<(), MatrixError> {
    check_matmul_dims(a, b, "multiply")?;
    let out = reconcile(slot, a.rows, b.cols)?;
    multiply_to(a, b, out);
    Ok(())
}

// ============ add / subtract ============

/// `slot = m₁ + m₂ + … + mₙ`
pub fn add_into(operands: &[&Matrix], slot: &mut Option<Matrix>) -> Result<(), MatrixError> {
    check_same_dims(operands, "add")?;
    let out = reconcile(slot, operands[0].rows, operands[0].cols)?;
    combine_to(operands, false, out);
    Ok(())
}

/// `slot = m₁ − m₂ − … − mₙ`
pub fn subtract_into(operands: &[&Matrix], slot: &mut Option<Matrix>) -> Result<(), MatrixError> {
    check_same_dims(operands, "subtract")?;
    let out = reconcile(slot, operands[0].rows, operands[0].cols)?;
    combine_to(operands, true, out);
    Ok(())
}

// ============ power ============

fn check_power(a: &Matrix, power: u32) -> Result<(), MatrixError> {
    check_square(a, "power")?;
    if power == 0 {
        return Err(MatrixError::InvalidPower(power));
    }
    Ok(())
}

/// Repeated multiplication for `power >= 2`; each intermediate is dropped
/// as soon as the next one exists
fn repeated_product(a: &Matrix, power: u32) -> Result<Matrix, MatrixError> {
    let mut running = a.multiply(a)?;
    for step in 3..=power {
        let next = a.multiply(&running)?;
        debug!(step, "power intermediate");
        running = next;
    }
    Ok(running)
}

/// `slot = aᵖ` for `p >= 1`
///
/// `p = 1` copies `a`, `p = 2` multiplies once; larger powers build the
/// product separately and replace the slot's content only once it is done.
pub fn power_into(a: &Matrix, power: u32, slot: &mut Option<Matrix>) -> Result<(), MatrixError> {
    check_power(a, power)?;
    match power {
        1 => a.assign_to(slot),
        2 => multiply_into(a, a, slot),
        _ => {
            *slot = Some(repeated_product(a, power)?);
            Ok(())
        }
    }
}

// ============ transpose ============

/// `slot = aᵀ`
pub fn transpose_into(a: &Matrix, slot: &mut Option<Matrix>) -> Result<(), MatrixError> {
    let shape = a.shape().transposed();
    let out = reconcile(slot, shape.rows, shape.cols)?;
    transpose_to(a, out);
    Ok(())
}

// ============ owned forms ============

impl Matrix {
    /// `self × rhs`
    pub fn multiply(&self, rhs: &Matrix) -> Result<Matrix, MatrixError> {
        check_matmul_dims(self, rhs, "multiply")?;
        let mut out = Matrix::zeros(self.rows, rhs.cols)?;
        multiply_to(self, rhs, &mut out);
        Ok(out)
    }

    /// Sum of all operands
    pub fn add_all(operands: &[&Matrix]) -> Result<Matrix, MatrixError> {
        check_same_dims(operands, "add")?;
        let mut out = Matrix::zeros(operands[0].rows, operands[0].cols)?;
        combine_to(operands, false, &mut out);
        Ok(out)
    }

    /// First operand minus all the others
    pub fn subtract_all(operands: &[&Matrix]) -> Result<Matrix, MatrixError> {
        check_same_dims(operands, "subtract")?;
        let mut out = Matrix::zeros(operands[0].rows, operands[0].cols)?;
        combine_to(operands, true, &mut out);
        Ok(out)
    }

    /// `selfᵖ` for `p >= 1`
    pub fn power(&self, power: u32) -> Result<Matrix, MatrixError> {
        check_power(self, power)?;
        match power {
            1 => self.try_clone(),
            _ => repeated_product(self, power),
        }
    }

    pub fn transpose(&self) -> Result<Matrix, MatrixError> {
        let shape = self.shape().transposed();
        let mut out = Matrix::zeros(shape.rows, shape.cols)?;
        transpose_to(self, &mut out);
        Ok(out)
    }
}
