//! This module implements logic for Duration parsing.

use alloc::string::{String, ToString};

use super::{
    annotations::{into_annotation, parse_bracket_groups},
    cursor::Cursor,
    lexer::TokenKind,
};
use crate::{
    ast::Duration,
    error::{ErrorMessage, ParseError},
};

/// The duration field a unit designator accumulates into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Unit {
    Years,
    Months,
    Weeks,
    Days,
    Hours,
    Minutes,
    Seconds,
}

impl Unit {
    /// Looks up a designator. `M` is months before the `T` marker and
    /// minutes after it.
    fn from_designator(designator: &str, in_time: bool) -> Option<Self> {
        let unit = match (in_time, designator) {
            (false, "Y") => Self::Years,
            (false, "M") => Self::Months,
            (false, "W") => Self::Weeks,
            (false, "D") => Self::Days,
            (true, "H") => Self::Hours,
            (true, "M") => Self::Minutes,
            (true, "S") => Self::Seconds,
            _ => return None,
        };
        Some(unit)
    }

    fn field(self, duration: &mut Duration) -> &mut Option<u64> {
        match self {
            Self::Years => &mut duration.years,
            Self::Months => &mut duration.months,
            Self::Weeks => &mut duration.weeks,
            Self::Days => &mut duration.days,
            Self::Hours => &mut duration.hours,
            Self::Minutes => &mut duration.minutes,
            Self::Seconds => &mut duration.seconds,
        }
    }
}

/// `Duration := 'P' ((Number (('.' | ',') Number)? Ident) | 'T')* BracketGroup*`
///
/// Repeated designators are summed. Parsing stops at the first token that
/// cannot continue the duration, leaving it to the caller.
pub(crate) fn parse_duration(cursor: &mut Cursor<'_, '_>) -> Result<Duration, ParseError> {
    if !cursor.at_ident("P") {
        return Err(cursor.unexpected("'P'"));
    }
    cursor.advance();

    let mut duration = Duration {
        raw: String::from("P"),
        ..Duration::default()
    };
    let mut in_time = false;

    loop {
        match cursor.kind() {
            TokenKind::T => {
                cursor.advance();
                in_time = true;
                duration.raw.push('T');
            }
            TokenKind::Number => parse_designated_value(cursor, &mut duration, in_time)?,
            _ => break,
        }
    }

    for group in parse_bracket_groups(cursor)? {
        duration.annotations.push(into_annotation(group));
    }
    Ok(duration)
}

/// `Number (('.' | ',') Number)? Ident`
fn parse_designated_value(
    cursor: &mut Cursor<'_, '_>,
    duration: &mut Duration,
    in_time: bool,
) -> Result<(), ParseError> {
    let mut text = cursor
        .current()
        .map(|token| token.text().to_string())
        .unwrap_or_default();
    let value: u64 = cursor.number_as("duration value")?;

    let separator = cursor
        .next_if(TokenKind::Dot)
        .or_else(|| cursor.next_if(TokenKind::Comma));
    let fraction = match separator {
        Some(separator) => {
            let digits = cursor.expect(TokenKind::Number, "fractional digits")?;
            text.push_str(separator.text);
            text.push_str(digits.text);
            Some(digits.text)
        }
        None => None,
    };

    let Some(designator) = cursor.current().and_then(|t| t.raw_of(TokenKind::Ident)) else {
        return Err(cursor.error(ErrorMessage::DurationMissingUnit));
    };
    let Some(unit) = Unit::from_designator(designator.text, in_time) else {
        let msg = if in_time {
            ErrorMessage::DurationTimeUnit
        } else {
            ErrorMessage::DurationDateUnit
        };
        return Err(cursor.error(msg));
    };

    let field = unit.field(duration);
    let sum = field
        .unwrap_or(0)
        .checked_add(value)
        .ok_or_else(|| cursor.range_error(ErrorMessage::DurationOverflow))?;
    *field = Some(sum);
    if let (Unit::Seconds, Some(fraction)) = (unit, fraction) {
        duration.fraction = Some(fraction.to_string());
    }

    duration.raw.push_str(&text);
    duration.raw.push_str(designator.text);
    cursor.advance();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::parse_duration;
    use crate::{
        error::{ErrorKind, ErrorMessage},
        options::ParseOptions,
        parsers::{cursor::Cursor, fuse_offsets, lex, TokenKind},
    };

    macro_rules! duration {
        ($source:expr) => {{
            let tokens = fuse_offsets(lex($source).unwrap());
            let mut cursor = Cursor::new(&tokens, ParseOptions::default());
            parse_duration(&mut cursor).map(|d| (d, cursor.kind()))
        }};
    }

    #[test]
    fn all_designators() {
        let (d, next) = duration!("P1Y2M3W4DT5H6M7.25S").unwrap();
        assert_eq!(next, TokenKind::End);
        assert_eq!(
            [d.years, d.months, d.weeks, d.days, d.hours, d.minutes, d.seconds],
            [Some(1), Some(2), Some(3), Some(4), Some(5), Some(6), Some(7)]
        );
        assert_eq!(d.fraction.as_deref(), Some("25"));
        assert_eq!(d.raw, "P1Y2M3W4DT5H6M7.25S");
    }

    #[test]
    fn month_and_minute_share_a_designator() {
        let (d, _) = duration!("P1MT1M").unwrap();
        assert_eq!((d.months, d.minutes), (Some(1), Some(1)));
    }

    #[test]
    fn repeated_designators_are_summed() {
        let (d, _) = duration!("P1Y2Y").unwrap();
        assert_eq!(d.years, Some(3));
        let (d, _) = duration!("PT30M45M").unwrap();
        assert_eq!(d.minutes, Some(75));
    }

    #[test]
    fn zero_values_are_present() {
        let (d, _) = duration!("P0Y0M1D").unwrap();
        assert_eq!((d.years, d.months, d.days), (Some(0), Some(0), Some(1)));
        assert_eq!(d.weeks, None);
        assert!(!d.is_empty());
        assert!(duration!("P").unwrap().0.is_empty());
    }

    #[test]
    fn fraction_separators() {
        let (d, _) = duration!("PT1,5S").unwrap();
        assert_eq!(d.fraction.as_deref(), Some("5"));
        assert_eq!(d.raw, "PT1,5S");
        // Fractions only attach to seconds.
        let (d, _) = duration!("PT1.5H").unwrap();
        assert_eq!((d.hours, d.fraction), (Some(1), None));
    }

    #[test]
    fn unit_must_match_the_part() {
        let err = duration!("PT1Y").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Syntax);
        assert_eq!(err.message(), ErrorMessage::DurationTimeUnit);
        assert_eq!(err.position(), 3);

        let err = duration!("P1H").unwrap_err();
        assert_eq!(err.message(), ErrorMessage::DurationDateUnit);
        assert_eq!(err.position(), 2);
        assert_eq!(err.span(), Some((2, 3)));

        assert_eq!(
            duration!("P1YM").unwrap_err().message(),
            ErrorMessage::DurationDateUnit
        );
    }

    #[test]
    fn value_needs_a_unit() {
        let err = duration!("P12").unwrap_err();
        assert_eq!(err.message(), ErrorMessage::DurationMissingUnit);
        assert_eq!(err.position(), 2);
    }

    #[test]
    fn stops_at_foreign_tokens() {
        let (d, next) = duration!("P1D/2025").unwrap();
        assert_eq!(d.days, Some(1));
        assert_eq!(next, TokenKind::Slash);
    }

    #[test]
    fn bracket_groups_become_annotations() {
        let (d, _) = duration!("PT1H[Asia/Tokyo][!u-ca=iso8601]").unwrap();
        assert_eq!(d.annotations.len(), 2);
        assert_eq!(d.annotations[0].raw, "Asia/Tokyo");
        assert!(d.annotations[1].critical);
    }

    #[test]
    fn overflow_is_a_range_error() {
        let err = duration!("P9223372036854775807Y9223372036854775807Y9Y").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Range);
        assert_eq!(err.message(), ErrorMessage::DurationOverflow);
    }

    #[test]
    fn requires_the_designator() {
        let err = duration!("1Y").unwrap_err();
        assert_eq!(
            err.message(),
            ErrorMessage::UnexpectedToken {
                expected: "'P'",
                found: TokenKind::Number
            }
        );
    }
}
