//! Menu loop and the seven console operations
//!
//! A single result slot lives for the whole session and is handed to every
//! operation, so consecutive results of the same shape reuse one buffer.

use std::fmt;
use std::io::{BufRead, Write};
use matrica_core::input::parse_unsigned;
use matrica_core::{format_general, CalcError, Shape};
use matrica_matrix::{
    add_into, determinant, inverse_into, multiply_into, power_into, subtract_into,
    transpose_into, Invertibility, Matrix,
};
use thiserror::Error;
use tracing::{debug, info, warn};
use crate::console::{Console, Subject};

/// Exit status for a fatal I/O failure (`EX_IOERR`)
pub const EXIT_IO: i32 = 74;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Multiplication,
    Addition,
    Subtraction,
    Power,
    Transpose,
    Determinant,
    Inverse,
}

impl Operation {
    /// Menu order
    pub const ALL: [Operation; 7] = [
        Operation::Multiplication,
        Operation::Addition,
        Operation::Subtraction,
        Operation::Power,
        Operation::Transpose,
        Operation::Determinant,
        Operation::Inverse,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Operation::Multiplication => "multiplication",
            Operation::Addition => "addition",
            Operation::Subtraction => "subtraction",
            Operation::Power => "power",
            Operation::Transpose => "transpose",
            Operation::Determinant => "determinant",
            Operation::Inverse => "inverse",
        }
    }

    /// Menu number, also the exit status on allocation failure
    pub fn number(&self) -> i32 {
        match self {
            Operation::Multiplication => 1,
            Operation::Addition => 2,
            Operation::Subtraction => 3,
            Operation::Power => 4,
            Operation::Transpose => 5,
            Operation::Determinant => 6,
            Operation::Inverse => 7,
        }
    }

    pub fn from_number(n: usize) -> Option<Self> {
        n.checked_sub(1).and_then(|idx| Self::ALL.get(idx).copied())
    }

    /// Phrase used in "Memory allocation failure during ..."
    fn context(&self) -> &'static str {
        match self {
            Operation::Multiplication => "matrix multiplication",
            Operation::Addition => "matrix addition",
            Operation::Subtraction => "matrix subtraction",
            Operation::Power => "the matrix power operation",
            Operation::Transpose => "the matrix transpose operation",
            Operation::Determinant => "the matrix determinant operation",
            Operation::Inverse => "the matrix inverse operation",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    Quit,
    Run(Operation),
}

/// The menu as shown before every choice
pub fn menu_text() -> String {
    let mut text = String::from("------ MENU ------\n");
    for op in Operation::ALL {
        text.push_str(&format!("{}) {}\n", op.number(), op.name()));
    }
    text.push_str("0) quit\n\n");
    text.push_str("Enter the number of the operation to perform or enter 0 to quit.\n");
    text
}

/// A session that had to stop on a fatal error
#[derive(Debug, Error)]
#[error("session aborted: {error}")]
pub struct Aborted {
    /// Operation that was running, if any
    pub operation: Option<Operation>,
    #[source]
    pub error: CalcError,
}

impl Aborted {
    /// Allocation failures exit with the operation's menu number
    pub fn exit_code(&self) -> i32 {
        match self.operation {
            Some(op) if self.error.is_allocation() => op.number(),
            _ => EXIT_IO,
        }
    }
}

pub struct Session<R, W> {
    console: Console<R, W>,
    result: Option<Matrix>,
}

impl<R: BufRead, W: Write> Session<R, W> {
    pub fn new(console: Console<R, W>) -> Self {
        Self { console, result: None }
    }

    #[cfg(test)]
    pub fn into_console(self) -> Console<R, W> {
        self.console
    }

    /// Show the menu and run operations until quit or end of input
    pub fn run(&mut self) -> Result<(), Aborted> {
        loop {
            let choice = match self.read_choice() {
                Ok(choice) => choice,
                Err(e) if e.is_end_of_input() => Choice::Quit,
                Err(error) => return Err(Aborted { operation: None, error }),
            };
            let op = match choice {
                Choice::Quit => break,
                Choice::Run(op) => op,
            };

            info!(operation = %op, "running");
            match self.perform(op) {
                Ok(()) => {}
                Err(e) if e.is_end_of_input() => break,
                Err(e) if !e.is_fatal() => {
                    warn!(operation = %op, error = %e, "operation failed");
                }
                Err(error) => {
                    if error.is_allocation() {
                        // the console may be unusable too; the exit status still reports it
                        let _ = self.console.say(format!(
                            "\n\nMemory allocation failure during {}.\n\n\
                             Error - memory allocation failure. Exiting the program.\n",
                            op.context()
                        ));
                    }
                    return Err(Aborted { operation: Some(op), error });
                }
            }
        }
        info!("quit");
        Ok(())
    }

    pub fn read_choice(&mut self) -> Result<Choice, CalcError> {
        self.console.say(menu_text())?;
        let choice = self.console.prompt_until("Choice: ", |line| {
            let n = parse_unsigned(line, 1)?[0];
            if n == 0 {
                return Ok(Choice::Quit);
            }
            Operation::from_number(n)
                .map(Choice::Run)
                .ok_or_else(|| CalcError::invalid_input(format!("no operation numbered {}", n)))
        })?;
        self.console.say("\n")?;
        Ok(choice)
    }

    pub fn perform(&mut self, op: Operation) -> Result<(), CalcError> {
        match op {
            Operation::Multiplication => self.multiplication(),
            Operation::Addition => self.combine(op, "add", "added"),
            Operation::Subtraction => self.combine(op, "subtract", "subtracted"),
            Operation::Power => self.power(),
            Operation::Transpose => self.transpose(),
            Operation::Determinant => self.determinant(),
            Operation::Inverse => self.inverse(),
        }
    }

    // ============ helpers ============

    fn show(&mut self, matrix: &Matrix) -> Result<(), CalcError> {
        self.console.say(format!("{}\n\n", matrix))
    }

    fn show_result(&mut self) -> Result<(), CalcError> {
        if let Some(result) = self.result.as_ref() {
            self.console.say(format!("{}\n\n", result))?;
        }
        Ok(())
    }

    /// Allocate a matrix of `shape` and read its entries
    fn read_matrix(&mut self, shape: Shape, number: Option<usize>) -> Result<Matrix, CalcError> {
        let mut matrix = Matrix::zeros(shape.rows, shape.cols)?;
        self.console.read_entries(&mut matrix, number)?;
        Ok(matrix)
    }

    fn read_square(&mut self, op: Operation) -> Result<Matrix, CalcError> {
        let shape = self.console.read_shape(Subject::Single, true, op.name())?;
        self.read_matrix(shape, None)
    }

    // ============ operations ============

    fn multiplication(&mut self) -> Result<(), CalcError> {
        let op = Operation::Multiplication;
        self.console.say(
            "For matrix multiplication, the columns of the first matrix must equal the rows of the second matrix.\n",
        )?;
        let (first, second) = loop {
            let first = self.console.read_shape(Subject::Nth(1), false, op.name())?;
            let second = self.console.read_shape(Subject::Nth(2), false, op.name())?;
            if first.cols == second.rows {
                break (first, second);
            }
            debug!(%first, %second, "shapes cannot be multiplied");
            self.console.say(
                "Input error. The columns of matrix 1 must equal the rows of matrix 2 in order \
                 for two matrices to be multiplied.\nRe-enter the dimensions starting with the first matrix.\n",
            )?;
        };

        let a = self.read_matrix(first, Some(1))?;
        let b = self.read_matrix(second, Some(2))?;
        multiply_into(&a, &b, &mut self.result)?;

        self.console.say("\nThe two matrices being multiplied are:\n")?;
        self.show(&a)?;
        self.show(&b)?;
        self.console.say("The resulting matrix after multiplication is:\n")?;
        self.show_result()
    }

    /// Addition and subtraction of two or more same-shaped matrices
    fn combine(&mut self, op: Operation, verb: &str, participle: &str) -> Result<(), CalcError> {
        let count = self.console.read_operand_count(verb)?;
        let shape = self.console.read_shape(Subject::All, false, op.name())?;

        let mut operands = Vec::with_capacity(count);
        for n in 1..=count {
            operands.push(self.read_matrix(shape, Some(n))?);
        }
        let refs: Vec<&Matrix> = operands.iter().collect();
        match op {
            Operation::Subtraction => subtract_into(&refs, &mut self.result)?,
            _ => add_into(&refs, &mut self.result)?,
        }

        self.console.say(format!("The {} matrices being {} are:\n", count, participle))?;
        for m in &operands {
            self.show(m)?;
        }
        self.console.say(format!("The resulting matrix after {} is:\n", op.name()))?;
        self.show_result()
    }

    fn power(&mut self) -> Result<(), CalcError> {
        let power = self.console.read_power()?;
        let a = self.read_square(Operation::Power)?;
        power_into(&a, power, &mut self.result)?;

        self.console.say("The original matrix in the power operation is:\n")?;
        self.show(&a)?;
        self.console.say(format!("The result of the matrix raised to the power of {} is:\n", power))?;
        self.show_result()
    }

    fn transpose(&mut self) -> Result<(), CalcError> {
        let shape = self.console.read_shape(Subject::Single, false, Operation::Transpose.name())?;
        let a = self.read_matrix(shape, None)?;
        transpose_into(&a, &mut self.result)?;

        self.console.say("The matrix being transposed is:\n")?;
        self.show(&a)?;
        self.console.say("The resulting transposed matrix is:\n")?;
        self.show_result()
    }

    fn determinant(&mut self) -> Result<(), CalcError> {
        let a = self.read_square(Operation::Determinant)?;
        let det = determinant(&a)?;

        self.console.say(format!(
            "The determinant of the following matrix is {}\n",
            format_general(det)
        ))?;
        self.show(&a)
    }

    fn inverse(&mut self) -> Result<(), CalcError> {
        let a = self.read_square(Operation::Inverse)?;
        match inverse_into(&a, &mut self.result)? {
            Invertibility::Invertible => {
                self.console.say("The matrix is:\n")?;
                self.show(&a)?;
                self.console.say("Its inverse is:\n")?;
                self.show_result()
            }
            Invertibility::Singular => {
                self.console.say(
                    "The determinant of the following matrix is 0. Therefore, it has no inverse.\n",
                )?;
                self.show(&a)
            }
        }
    }
}
