//! The standalone UTC offset parser.

use alloc::string::ToString;

use crate::{
    ast::NumericOffset,
    error::{ErrorMessage, ParseError},
    Sign,
};

const MAX_OFFSET_HOURS: i64 = 14;
const MAX_OFFSET_MINUTES: i64 = 59;

/// Parses offset text such as `+08:00`, `-0530`, or `+09`.
///
/// The accepted shapes after the sign are `HH:MM`, `HHMM`, and `HH`. Hours
/// must be within `0..=14` and minutes within `0..=59`; both bounds apply to
/// either sign. The original text is kept in [`NumericOffset::raw`].
///
/// `position` is reported back unchanged in any error.
///
/// # Errors
///
/// - A syntax error when the sign is missing, nothing follows it, or the
///   digits do not form one of the accepted shapes.
/// - A range error when the hours or minutes are out of bounds.
pub fn parse_offset(text: &str, position: usize) -> Result<NumericOffset, ParseError> {
    let Some(sign) = text.bytes().next().and_then(Sign::from_ascii) else {
        return Err(ParseError::syntax(ErrorMessage::OffsetNeedsSign, position));
    };
    let body = &text[1..];
    if body.is_empty() {
        return Err(ParseError::syntax(ErrorMessage::OffsetEmpty, position));
    }
    if !body.is_ascii() {
        return Err(format_error(position));
    }

    let (hours, minutes) = match body.split_once(':') {
        Some((hours, minutes)) => (hours, minutes),
        None if body.len() == 4 => body.split_at(2),
        None if body.len() == 2 => (body, "00"),
        None => return Err(format_error(position)),
    };
    if !is_digit_pair(hours) || !is_digit_pair(minutes) {
        return Err(format_error(position));
    }

    let hours = digit_pair_value(hours);
    let minutes = digit_pair_value(minutes);
    if hours > MAX_OFFSET_HOURS {
        return Err(ParseError::range(ErrorMessage::OffsetHourRange(hours), position));
    }
    if minutes > MAX_OFFSET_MINUTES {
        return Err(ParseError::range(ErrorMessage::OffsetMinuteRange(minutes), position));
    }

    Ok(NumericOffset {
        sign,
        hours: hours as u8,
        minutes: minutes as u8,
        raw: text.to_string(),
    })
}

fn format_error(position: usize) -> ParseError {
    ParseError::syntax(ErrorMessage::OffsetFormat, position)
}

/// `HH:MM` splits into exactly two parts, so a second `:` lands in the
/// minutes and fails here.
fn is_digit_pair(text: &str) -> bool {
    text.len() == 2 && text.bytes().all(|b| b.is_ascii_digit())
}

fn digit_pair_value(text: &str) -> i64 {
    text.bytes()
        .fold(0, |value, digit| value * 10 + i64::from(digit - b'0'))
}
