//! Scalar type and number formatting
//!
//! Every entry is rendered the same way whether it is being measured for
//! column width or printed: integral values without a fractional part, all
//! other values with six decimals and the trailing zeros stripped.

/// Scalar used for every matrix entry and every accumulation
pub type Real = f64;

/// Decimal places used for non-integral values before trimming
pub const DECIMAL_PLACES: usize = 6;

/// Significant digits kept by `format_general`
pub const SIGNIFICANT_DIGITS: usize = 6;

/// Drop trailing zeros after a decimal point, then the point itself
fn trim_fraction(s: &mut String) {
    if s.contains('.') {
        let kept = s.trim_end_matches('0').len();
        s.truncate(kept);
        if s.ends_with('.') {
            s.pop();
        }
    }
}

/// Render a value without trailing zeros
///
/// `2.0` renders as `"2"`, `0.25` as `"0.25"`, `1.0 / 3.0` as `"0.333333"`.
/// Values that round to zero at six decimals render as `"0"`, never `"-0"`.
pub fn format_real(value: Real) -> String {
    let mut s = if value.trunc() == value {
        format!("{:.0}", value)
    } else {
        format!("{:.prec$}", value, prec = DECIMAL_PLACES)
    };

    trim_fraction(&mut s);
    if s == "-0" {
        s.remove(0);
    }
    s
}

/// Render a scalar result with six significant digits
///
/// Fixed notation while the decimal exponent is in `-4..6`, otherwise
/// scientific with a signed two-digit exponent: `-306`, `0.0001`,
/// `1.23457e+06`, `1e-05`. Trailing zeros are dropped in both forms.
pub fn format_general(value: Real) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }

    // rounding to the kept digits can move the exponent, so read it back
    let sci = format!("{:.*e}", SIGNIFICANT_DIGITS - 1, value);
    let (mantissa, exp) = match sci.split_once('e') {
        Some((m, e)) => (m.to_string(), e.parse::<i32>().unwrap_or(0)),
        None => (sci.clone(), 0),
    };

    if exp < -4 || exp >= SIGNIFICANT_DIGITS as i32 {
        let mut m = mantissa;
        trim_fraction(&mut m);
        let sign = if exp < 0 { '-' } else { '+' };
        format!("{}e{}{:02}", m, sign, exp.abs())
    } else {
        let prec = (SIGNIFICANT_DIGITS as i32 - 1 - exp) as usize;
        let mut s = format!("{:.prec$}", value, prec = prec);
        trim_fraction(&mut s);
        s
    }
}

/// Number of characters `format_real` produces for `value`
pub fn display_width(value: Real) -> usize {
    format_real(value).chars().count()
}
