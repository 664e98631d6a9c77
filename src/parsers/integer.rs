//! The shared integer conversion helper.

use crate::{
    error::{ErrorMessage, ParseError},
    options::IntegerSyntax,
};

/// Converts `text` to an integer using [`IntegerSyntax::Strict`].
///
/// `label` names the value in error messages ("year", "hour", ...) and
/// `position` is reported back unchanged in any error.
///
/// # Errors
///
/// Returns a syntax error when `text` is not an optionally signed run of
/// ASCII digits, and a range error when it does not fit in an `i64`.
pub fn to_int(text: &str, label: &'static str, position: usize) -> Result<i64, ParseError> {
    to_int_with(text, label, position, IntegerSyntax::Strict)
}

/// Converts `text` to an integer with the given syntax.
///
/// With [`IntegerSyntax::Lenient`] this also accepts notations such as
/// `0x1F`, `1e3`, or `12.00` that the lexer never produces, for callers
/// converting text that did not come from a `Number` token.
///
/// # Errors
///
/// As for [`to_int`], with the notations of `syntax`.
pub fn to_int_with(
    text: &str,
    label: &'static str,
    position: usize,
    syntax: IntegerSyntax,
) -> Result<i64, ParseError> {
    let result = match syntax {
        IntegerSyntax::Strict => parse_strict(text),
        IntegerSyntax::Lenient => parse_lenient(text),
    };
    result.map_err(|err| match err {
        IntError::Invalid => ParseError::syntax(ErrorMessage::InvalidInteger(label), position),
        IntError::Overflow => ParseError::range(ErrorMessage::IntegerOutOfRange(label), position),
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum IntError {
    Invalid,
    Overflow,
}

fn split_sign(text: &str) -> (bool, &str) {
    match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    }
}

fn all_digits(text: &str, radix: u32) -> bool {
    !text.is_empty() && text.chars().all(|ch| ch.is_digit(radix))
}

fn parse_strict(text: &str) -> Result<i64, IntError> {
    let (_, digits) = split_sign(text);
    if !all_digits(digits, 10) {
        return Err(IntError::Invalid);
    }
    // `i64::from_str` accepts exactly an optional sign followed by digits.
    text.parse::<i64>().map_err(|_| IntError::Overflow)
}

fn parse_lenient(text: &str) -> Result<i64, IntError> {
    let text = text.trim();

    for (prefix, radix) in [("0x", 16), ("0X", 16), ("0o", 8), ("0O", 8), ("0b", 2), ("0B", 2)] {
        if let Some(digits) = text.strip_prefix(prefix) {
            if !all_digits(digits, radix) {
                return Err(IntError::Invalid);
            }
            return i64::from_str_radix(digits, radix).map_err(|_| IntError::Overflow);
        }
    }

    let (negative, unsigned) = split_sign(text);
    let (mantissa, exponent) = match unsigned.find(['e', 'E']) {
        Some(index) => (&unsigned[..index], Some(&unsigned[index + 1..])),
        None => (unsigned, None),
    };
    let (integral, fraction) = match mantissa.split_once('.') {
        Some((integral, fraction)) => (integral, fraction),
        None => (mantissa, ""),
    };
    let integral_ok = integral.is_empty() || all_digits(integral, 10);
    let fraction_ok = fraction.is_empty() || all_digits(fraction, 10);
    if !integral_ok || !fraction_ok || (integral.is_empty() && fraction.is_empty()) {
        return Err(IntError::Invalid);
    }

    let exponent = match exponent {
        Some(exponent) => {
            let (exp_negative, exp_digits) = split_sign(exponent);
            if !all_digits(exp_digits, 10) {
                return Err(IntError::Invalid);
            }
            let value = exp_digits.parse::<i64>().map_err(|_| IntError::Overflow)?;
            if exp_negative {
                -value
            } else {
                value
            }
        }
        None => 0,
    };

    // The value is `digits * 10^(exponent - fraction.len())`.
    let shift = exponent
        .checked_sub(fraction.len() as i64)
        .ok_or(IntError::Overflow)?;
    let digits = integral.bytes().chain(fraction.bytes());
    let mut magnitude: i128 = 0;
    let mut kept = integral.len() + fraction.len();
    if shift < 0 {
        // Digits shifted past the decimal point must all be zero.
        let dropped = usize::try_from(shift.unsigned_abs()).map_err(|_| IntError::Invalid)?;
        let total = integral.len() + fraction.len();
        let mut dropped_digits = integral
            .bytes()
            .chain(fraction.bytes())
            .skip(total.saturating_sub(dropped));
        if dropped_digits.any(|d| d != b'0') {
            return Err(IntError::Invalid);
        }
        kept = total.saturating_sub(dropped);
    }
    for digit in digits.take(kept) {
        magnitude = magnitude
            .checked_mul(10)
            .and_then(|m| m.checked_add(i128::from(digit - b'0')))
            .ok_or(IntError::Overflow)?;
        if magnitude > i128::from(i64::MAX) + 1 {
            return Err(IntError::Overflow);
        }
    }
    if shift > 0 {
        for _ in 0..shift {
            if magnitude == 0 {
                break;
            }
            magnitude = magnitude.checked_mul(10).ok_or(IntError::Overflow)?;
            if magnitude > i128::from(i64::MAX) + 1 {
                return Err(IntError::Overflow);
            }
        }
    }
    let value = if negative { -magnitude } else { magnitude };
    i64::try_from(value).map_err(|_| IntError::Overflow)
}

#[cfg(test)]
mod tests {
    use super::{to_int, to_int_with};
    use crate::{
        error::{ErrorKind, ErrorMessage},
        options::IntegerSyntax,
    };

    #[test]
    fn strict_accepts_signed_digit_runs() {
        assert_eq!(to_int("2025", "year", 0), Ok(2025));
        assert_eq!(to_int("0044", "year", 0), Ok(44));
        assert_eq!(to_int("-0044", "year", 0), Ok(-44));
        assert_eq!(to_int("+7", "year", 0), Ok(7));
    }

    #[test]
    fn strict_rejects_other_notations() {
        for text in ["", "-", "1.5", "1e3", "0x10", " 12", "NaN", "Infinity", "1_000"] {
            let err = to_int(text, "hour", 3).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Syntax, "{text}");
            assert_eq!(err.message(), ErrorMessage::InvalidInteger("hour"));
            assert_eq!(err.position(), 3);
        }
    }

    #[test]
    fn strict_overflow_is_a_range_error() {
        let err = to_int("99999999999999999999", "days", 0).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Range);
        assert_eq!(err.message(), ErrorMessage::IntegerOutOfRange("days"));
    }

    #[test]
    fn lenient_accepts_host_style_numbers() {
        let lenient = |text| to_int_with(text, "value", 0, IntegerSyntax::Lenient);
        assert_eq!(lenient(" 42 "), Ok(42));
        assert_eq!(lenient("0x1F"), Ok(31));
        assert_eq!(lenient("0o17"), Ok(15));
        assert_eq!(lenient("0b101"), Ok(5));
        assert_eq!(lenient("1e3"), Ok(1000));
        assert_eq!(lenient("-2.50e1"), Ok(-25));
        assert_eq!(lenient("12.000"), Ok(12));
        assert_eq!(lenient("1200e-2"), Ok(12));
        assert_eq!(lenient(".0"), Ok(0));
    }

    #[test]
    fn syntax_changes_the_result() {
        for text in ["0x1F", "1e3", "12.00", " 12 "] {
            let strict = to_int_with(text, "value", 0, IntegerSyntax::Strict);
            let lenient = to_int_with(text, "value", 0, IntegerSyntax::Lenient);
            assert!(strict.is_err(), "{text}");
            assert!(lenient.is_ok(), "{text}");
            assert_eq!(to_int(text, "value", 0), strict);
        }
    }

    #[test]
    fn lenient_still_rejects_non_integers() {
        let lenient = |text| to_int_with(text, "value", 0, IntegerSyntax::Lenient);
        for text in ["", "1.5", "NaN", "Infinity", "1e", "0x", "0xZZ", "1e-1", "."] {
            assert!(lenient(text).is_err(), "{text}");
        }
        assert_eq!(lenient("1e400").unwrap_err().kind(), ErrorKind::Range);
    }
}
