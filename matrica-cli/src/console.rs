//! Prompting and line reading
//!
//! `Console` is generic over its input and output so whole sessions can be
//! driven from in-memory buffers.

use std::fmt::Display;
use std::io::{BufRead, Write};
use matrica_core::input::{parse_positive, parse_reals};
use matrica_core::{CalcError, InputError, MatrixError, Real, Shape};
use matrica_matrix::Matrix;
use tracing::warn;

/// `1st`, `2nd`, `3rd`, `4th` … `11th`, `12th`, `13th` … `21st`
pub fn ordinal(n: usize) -> String {
    let suffix = match (n % 10, n % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{}{}", n, suffix)
}

/// Which matrix a dimension prompt is about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Subject {
    /// "the matrix"
    Single,
    /// "the matrices"
    All,
    /// "the 2nd matrix"
    Nth(usize),
}

impl Subject {
    fn describe(&self) -> String {
        match self {
            Subject::Single => "matrix".to_string(),
            Subject::All => "matrices".to_string(),
            Subject::Nth(n) => format!("{} matrix", ordinal(*n)),
        }
    }
}

pub struct Console<R, W> {
    input: R,
    output: W,
    max_line: usize,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W, max_line: usize) -> Self {
        Self { input, output, max_line }
    }

    /// Give back the output sink
    #[cfg(test)]
    pub fn into_output(self) -> W {
        self.output
    }

    /// Write text as-is and flush
    pub fn say(&mut self, text: impl Display) -> Result<(), CalcError> {
        write!(self.output, "{}", text)?;
        self.output.flush()?;
        Ok(())
    }

    /// Read one line without its terminator; end of input is fatal
    ///
    /// Over-long lines and bytes that are not UTF-8 are recoverable input
    /// errors, and the whole line is consumed either way.
    fn read_line(&mut self) -> Result<String, CalcError> {
        let mut bytes = Vec::new();
        if self.input.read_until(b'\n', &mut bytes)? == 0 {
            return Err(CalcError::end_of_input());
        }
        while matches!(bytes.last(), Some(b'\n' | b'\r')) {
            bytes.pop();
        }
        if bytes.len() > self.max_line {
            return Err(InputError::TooLong { limit: self.max_line }.into());
        }
        String::from_utf8(bytes).map_err(|e| {
            CalcError::from(InputError::InvalidEncoding { position: e.utf8_error().valid_up_to() })
        })
    }

    /// Show `prompt`, read a line and parse it, repeating until it parses
    ///
    /// Recoverable errors print `Input error. Re-enter input.` and retry;
    /// fatal ones are returned.
    pub fn prompt_until<T>(
        &mut self,
        prompt: &str,
        mut parse: impl FnMut(&str) -> Result<T, CalcError>,
    ) -> Result<T, CalcError> {
        loop {
            self.say(prompt)?;
            match self.read_line().and_then(|line| parse(&line)) {
                Ok(value) => return Ok(value),
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => {
                    warn!(error = %e, "rejected input");
                    self.say("Input error. Re-enter input.\n")?;
                }
            }
        }
    }

    /// Rows and columns as two positive integers
    ///
    /// With `square`, unequal dimensions are rejected.
    pub fn read_shape(&mut self, subject: Subject, square: bool, operation: &str) -> Result<Shape, CalcError> {
        let mut prompt = format!(
            "Enter the desired rows and columns for the {} separated by a space.\n",
            subject.describe()
        );
        if square {
            prompt.push_str(&format!(
                "For the matrix {} operation, the rows must equal the columns.\n\
                 For example, enter \"3 3\" to create a 3 x 3 matrix.\n",
                operation
            ));
        } else {
            prompt.push_str("For example, enter \"3 5\" to create a 3 x 5 matrix.\n");
        }

        self.prompt_until(&prompt, |line| {
            let dims = parse_positive(line, 2)?;
            let shape = Shape::new(dims[0], dims[1]);
            if square && !shape.is_square() {
                return Err(MatrixError::NotSquare { op: "input", rows: shape.rows, cols: shape.cols }.into());
            }
            Ok(shape)
        })
    }

    /// How many matrices to combine; at least 2
    pub fn read_operand_count(&mut self, verb: &str) -> Result<usize, CalcError> {
        let prompt = format!(
            "Enter the number of matrices to {}. Must be an integer that is at least 2.\n",
            verb
        );
        self.prompt_until(&prompt, |line| {
            let n = parse_positive(line, 1)?[0];
            if n < 2 {
                return Err(MatrixError::TooFewOperands { op: "input", got: n }.into());
            }
            Ok(n)
        })
    }

    /// Exponent for the power operation; at least 1
    pub fn read_power(&mut self) -> Result<u32, CalcError> {
        self.prompt_until(
            "Enter the matrix power. It must be an integer that is at least 1.\n",
            |line| {
                let n = parse_positive(line, 1)?[0];
                u32::try_from(n).map_err(|_| CalcError::from(InputError::Overflow(line.to_string())))
            },
        )
    }

    /// Fill `matrix` row by row
    ///
    /// An invalid row restarts the whole matrix; the matrix is only written
    /// once every row has been read.
    pub fn read_entries(&mut self, matrix: &mut Matrix, number: Option<usize>) -> Result<(), CalcError> {
        let which = number.map(|n| format!("{} ", ordinal(n))).unwrap_or_default();
        let prompt = format!(
            "Enter values for the {}{} x {} matrix with each row separated by a newline.\n",
            which,
            matrix.rows(),
            matrix.cols()
        );
        let (rows, cols) = (matrix.rows(), matrix.cols());

        'matrix: loop {
            // the prompt is shown before the first row only
            let mut values: Vec<Vec<Real>> = vec![self.prompt_until(&prompt, |first| {
                Ok(parse_reals(first, cols)?)
            })?];
            while values.len() < rows {
                match self.read_line().and_then(|line| Ok(parse_reals(&line, cols)?)) {
                    Ok(row) => values.push(row),
                    Err(e) if e.is_fatal() => return Err(e),
                    Err(e) => {
                        warn!(error = %e, "rejected matrix row");
                        self.say("Input error. Re-enter input.\n")?;
                        continue 'matrix;
                    }
                }
            }

            matrix.fill(&values)?;
            self.say("\n")?;
            return Ok(());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn console(input: &str) -> Console<Cursor<Vec<u8>>, Vec<u8>> {
        Console::new(Cursor::new(input.as_bytes().to_vec()), Vec::new(), 500)
    }

    fn output(c: Console<Cursor<Vec<u8>>, Vec<u8>>) -> String {
        String::from_utf8(c.into_output()).unwrap()
    }

    #[test]
    fn test_ordinal() {
        let got: Vec<String> = [1, 2, 3, 4, 11, 12, 13, 20, 21, 22, 23, 101, 111, 112]
            .iter()
            .map(|&n| ordinal(n))
            .collect();
        assert_eq!(
            got,
            ["1st", "2nd", "3rd", "4th", "11th", "12th", "13th", "20th", "21st", "22nd", "23rd", "101st", "111th", "112th"]
        );
    }

    #[test]
    fn test_read_shape_reprompts() {
        let mut c = console("0 3\n2 a\n2 3\n");
        let shape = c.read_shape(Subject::Nth(1), false, "multiplication").unwrap();
        assert_eq!(shape, Shape::new(2, 3));
        let out = output(c);
        assert_eq!(out.matches("Input error. Re-enter input.").count(), 2);
        assert!(out.starts_with("Enter the desired rows and columns for the 1st matrix"));
    }

    #[test]
    fn test_read_shape_square() {
        let mut c = console("2 3\n3 3\n");
        let shape = c.read_shape(Subject::Single, true, "determinant").unwrap();
        assert_eq!(shape, Shape::new(3, 3));
        assert!(output(c).contains("For the matrix determinant operation"));
    }

    #[test]
    fn test_read_operand_count() {
        let mut c = console("1\n3\n");
        assert_eq!(c.read_operand_count("add").unwrap(), 3);
    }

    #[test]
    fn test_read_power() {
        let mut c = console("0\n-2\n5\n");
        assert_eq!(c.read_power().unwrap(), 5);
    }

    #[test]
    fn test_read_entries() {
        let mut c = console("1 2.5\n-3 .5\n");
        let mut m = Matrix::zeros(2, 2).unwrap();
        c.read_entries(&mut m, Some(2)).unwrap();
        assert_eq!(m.as_slice(), &[1.0, 2.5, -3.0, 0.5]);
        assert_eq!(m.max_width(), 3);
        assert!(output(c).starts_with("Enter values for the 2nd 2 x 2 matrix"));
    }

    #[test]
    fn test_read_entries_restarts_on_bad_row() {
        let mut c = console("1 2\n3 x\n5 6\n7 8\n");
        let mut m = Matrix::zeros(2, 2).unwrap();
        c.read_entries(&mut m, None).unwrap();
        assert_eq!(m.as_slice(), &[5.0, 6.0, 7.0, 8.0]);
        let out = output(c);
        assert_eq!(out.matches("Enter values for the 2 x 2 matrix").count(), 2);
    }

    #[test]
    fn test_many_bad_rows_do_not_grow_the_stack() {
        let mut input = "1 2\nx\n".repeat(10_000);
        input.push_str("1 2\n3 4\n");
        let mut c = console(&input);
        let mut m = Matrix::zeros(2, 2).unwrap();
        c.read_entries(&mut m, None).unwrap();
        assert_eq!(m.as_slice(), &[1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_invalid_utf8_reprompts() {
        let mut c = Console::new(Cursor::new(b"\xff\xfe\n7\n".to_vec()), Vec::new(), 500);
        assert_eq!(c.read_power().unwrap(), 7);
        let out = String::from_utf8(c.into_output()).unwrap();
        assert_eq!(out.matches("Input error. Re-enter input.").count(), 1);
    }

    #[test]
    fn test_end_of_input_is_fatal() {
        let mut c = console("1 2\n");
        let mut m = Matrix::zeros(2, 2).unwrap();
        let err = c.read_entries(&mut m, None).unwrap_err();
        assert!(err.is_fatal());
        assert_eq!(m.as_slice(), &[0.0; 4]);
    }

    #[test]
    fn test_line_limit() {
        let mut c = Console::new(Cursor::new(b"1 2 3 4 5\n1\n".to_vec()), Vec::new(), 4);
        assert_eq!(c.read_power().unwrap(), 1);
    }

    #[test]
    fn test_crlf() {
        let mut c = console("4\r\n");
        assert_eq!(c.read_power().unwrap(), 4);
    }
}
