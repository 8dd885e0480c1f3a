//! Line validation and conversion
//!
//! A line holds a fixed number of tokens separated by single ASCII spaces.
//! Validation checks every token against a [`TokenKind`] and then the token
//! count; conversion runs only on lines that passed validation.

use crate::error::InputError;
use crate::number::Real;
use std::str::FromStr;

/// What each token on a line must look like
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// `-1.5`, `.25`, `-.5`, `42`
    SignedReal,
    /// Digits only, value greater than zero
    PositiveInt,
    /// Digits only, zero permitted
    UnsignedInt,
}

/// Split a line into its space-delimited tokens
///
/// A single trailing space is dropped. Leading, doubled or repeated trailing
/// spaces produce empty tokens, which validation rejects.
fn tokens(line: &str) -> impl Iterator<Item = (usize, &str)> {
    let mut offset = 0;
    line.strip_suffix(' ').unwrap_or(line).split(' ').map(move |tok| {
        let start = offset;
        offset += tok.len() + 1;
        (start, tok)
    })
}

/// Validate `line` against `kind` and an exact token count
pub fn validate(line: &str, expected: usize, kind: TokenKind) -> Result<(), InputError> {
    if line.trim().is_empty() {
        return Err(InputError::Empty);
    }

    let mut count = 0;
    for (start, tok) in tokens(line) {
        if tok.is_empty() {
            return Err(InputError::EmptyToken(count));
        }
        match kind {
            TokenKind::SignedReal => check_real(tok, start)?,
            TokenKind::PositiveInt => {
                check_digits(tok, start)?;
                if parse_u64(tok)? == 0 {
                    return Err(InputError::ZeroValue(tok.to_string()));
                }
            }
            TokenKind::UnsignedInt => {
                check_digits(tok, start)?;
                parse_u64(tok)?;
            }
        }
        count += 1;
    }

    if count != expected {
        return Err(InputError::TokenCount { expected, got: count });
    }
    Ok(())
}

fn check_digits(tok: &str, start: usize) -> Result<(), InputError> {
    match tok.char_indices().find(|(_, c)| !c.is_ascii_digit()) {
        Some((i, ch)) => Err(InputError::InvalidCharacter { ch, position: start + i }),
        None => Ok(()),
    }
}

fn parse_u64(tok: &str) -> Result<u64, InputError> {
    tok.parse::<u64>().map_err(|_| InputError::Overflow(tok.to_string()))
}

/// Accepts an optional leading `-`, then either `digits[.digits]` or `.digits`
fn check_real(tok: &str, start: usize) -> Result<(), InputError> {
    let malformed = || InputError::MalformedNumber(tok.to_string());
    let bytes = tok.as_bytes();
    let mut seen_point = false;

    for (i, &b) in bytes.iter().enumerate() {
        let next_is_digit = bytes.get(i + 1).map_or(false, u8::is_ascii_digit);
        match b {
            b'0'..=b'9' => {}
            b'-' => {
                // only as the first character, followed by a digit or a point
                let next_ok = next_is_digit || bytes.get(i + 1) == Some(&b'.');
                if i != 0 || !next_ok {
                    return Err(malformed());
                }
            }
            b'.' => {
                if seen_point || !next_is_digit {
                    return Err(malformed());
                }
                seen_point = true;
            }
            _ => {
                let (offset, ch) = tok[i..].char_indices().next().unwrap_or((0, '?'));
                return Err(InputError::InvalidCharacter { ch, position: start + i + offset });
            }
        }
    }
    Ok(())
}

/// Convert a validated line into `dest`, returning how many values were written
///
/// Fails with `Capacity` when `dest` is shorter than the line.
pub fn convert_into<T: FromStr>(line: &str, dest: &mut [T]) -> Result<usize, InputError> {
    let got = tokens(line).count();
    if got > dest.len() {
        return Err(InputError::Capacity { capacity: dest.len(), got });
    }
    for (slot, (_, tok)) in dest.iter_mut().zip(tokens(line)) {
        *slot = tok.parse().map_err(|_| InputError::MalformedNumber(tok.to_string()))?;
    }
    Ok(got)
}

fn parse_exact<T: FromStr + Clone + Default>(
    line: &str,
    expected: usize,
    kind: TokenKind,
) -> Result<Vec<T>, InputError> {
    validate(line, expected, kind)?;
    let mut values = vec![T::default(); expected];
    convert_into(line, &mut values)?;
    Ok(values)
}

/// Validate and convert a line of `expected` signed reals
pub fn parse_reals(line: &str, expected: usize) -> Result<Vec<Real>, InputError> {
    parse_exact(line, expected, TokenKind::SignedReal)
}

/// Validate and convert a line of `expected` positive integers
pub fn parse_positive(line: &str, expected: usize) -> Result<Vec<usize>, InputError> {
    parse_exact(line, expected, TokenKind::PositiveInt)
}

/// Validate and convert a line of `expected` unsigned integers
pub fn parse_unsigned(line: &str, expected: usize) -> Result<Vec<usize>, InputError> {
    parse_exact(line, expected, TokenKind::UnsignedInt)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_letters() {
        let err = validate("1 2 a", 2, TokenKind::SignedReal).unwrap_err();
        assert_eq!(err, InputError::InvalidCharacter { ch: 'a', position: 4 });
    }

    #[test]
    fn test_accepts_signed_reals() {
        assert_eq!(parse_reals("-1.5 2.0", 2).unwrap(), vec![-1.5, 2.0]);
        assert_eq!(parse_reals(".25 -.5 7", 3).unwrap(), vec![0.25, -0.5, 7.0]);
    }

    #[test]
    fn test_rejects_double_point() {
        assert!(matches!(
            validate("1..2", 1, TokenKind::SignedReal),
            Err(InputError::MalformedNumber(_))
        ));
        assert!(validate("1.2.3", 1, TokenKind::SignedReal).is_err());
    }

    #[test]
    fn test_minus_placement() {
        assert!(validate("-3", 1, TokenKind::SignedReal).is_ok());
        assert!(validate("3-", 1, TokenKind::SignedReal).is_err());
        assert!(validate("5-3", 1, TokenKind::SignedReal).is_err());
        assert!(validate("--3", 1, TokenKind::SignedReal).is_err());
        assert!(validate("- 3", 2, TokenKind::SignedReal).is_err());
        assert!(validate("-", 1, TokenKind::SignedReal).is_err());
    }

    #[test]
    fn test_point_needs_following_digit() {
        assert!(validate("5.", 1, TokenKind::SignedReal).is_err());
        assert!(validate(".", 1, TokenKind::SignedReal).is_err());
        assert!(validate("-.", 1, TokenKind::SignedReal).is_err());
    }

    #[test]
    fn test_empty_and_whitespace() {
        assert_eq!(validate("", 1, TokenKind::SignedReal), Err(InputError::Empty));
        assert_eq!(validate("   ", 1, TokenKind::UnsignedInt), Err(InputError::Empty));
        assert!(matches!(
            validate("1\t2", 2, TokenKind::SignedReal),
            Err(InputError::InvalidCharacter { ch: '\t', .. })
        ));
    }

    #[test]
    fn test_exact_token_count() {
        assert_eq!(
            validate("1 2 3", 2, TokenKind::SignedReal),
            Err(InputError::TokenCount { expected: 2, got: 3 })
        );
        assert_eq!(
            validate("1", 2, TokenKind::SignedReal),
            Err(InputError::TokenCount { expected: 2, got: 1 })
        );
    }

    #[test]
    fn test_spacing() {
        assert!(validate("1 2 ", 2, TokenKind::SignedReal).is_ok());
        assert_eq!(validate("3 5  ", 2, TokenKind::PositiveInt), Err(InputError::EmptyToken(2)));
        assert_eq!(validate("1  2", 2, TokenKind::SignedReal), Err(InputError::EmptyToken(1)));
        assert_eq!(validate(" 1 2", 2, TokenKind::SignedReal), Err(InputError::EmptyToken(0)));
    }

    #[test]
    fn test_positive_int() {
        assert_eq!(parse_positive("3 5", 2).unwrap(), vec![3, 5]);
        assert_eq!(parse_positive("007", 1).unwrap(), vec![7]);
        assert!(matches!(parse_positive("0 5", 2), Err(InputError::ZeroValue(_))));
        assert!(parse_positive("-3 5", 2).is_err());
        assert!(parse_positive("2.5", 1).is_err());
        assert!(matches!(
            parse_positive("99999999999999999999999", 1),
            Err(InputError::Overflow(_))
        ));
    }

    #[test]
    fn test_unsigned_int() {
        assert_eq!(parse_unsigned("0", 1).unwrap(), vec![0]);
        assert!(parse_unsigned("-1", 1).is_err());
    }

    #[test]
    fn test_convert_capacity() {
        let mut dest = [0.0; 2];
        assert_eq!(
            convert_into("1 2 3", &mut dest),
            Err(InputError::Capacity { capacity: 2, got: 3 })
        );
        let mut dest = [0.0; 4];
        assert_eq!(convert_into("1 2 3", &mut dest), Ok(3));
        assert_eq!(dest, [1.0, 2.0, 3.0, 0.0]);
    }
}
