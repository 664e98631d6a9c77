//! Parsing for the date, time, and offset productions.

use alloc::string::ToString;

use super::{
    annotations::{classify_groups, parse_bracket_groups},
    cursor::Cursor,
    fuser::FusedToken,
    integer::to_int_with,
    lexer::{Token, TokenKind},
    offset::parse_offset,
};
use crate::{
    ast::{Date, DateTime, Offset, Time},
    error::{ErrorMessage, ParseError},
    Sign,
};

/// `DateTime := Date ('T' Time)? Offset? BracketGroup*`
pub(crate) fn parse_date_time(cursor: &mut Cursor<'_, '_>) -> Result<DateTime, ParseError> {
    let date = parse_date(cursor)?;
    let time = if cursor.next_if(TokenKind::T).is_some() {
        Some(parse_time(cursor)?)
    } else {
        None
    };
    let offset = parse_utc_offset(cursor)?;
    let groups = parse_bracket_groups(cursor)?;
    let (time_zone, annotations) = classify_groups(groups, cursor.options().time_zone_policy);

    Ok(DateTime {
        date,
        time,
        offset,
        time_zone,
        annotations,
    })
}

/// `Date := Sign? Number ('-' Number ('-' Number)?)?`
///
/// The year may carry a sign for years before 1 BC. After a `/` the fuser
/// may already have merged a sign with the following number, so a two part
/// offset token is accepted wherever a sign and a number are.
pub(crate) fn parse_date(cursor: &mut Cursor<'_, '_>) -> Result<Date, ParseError> {
    let year = match peek_signed_number(cursor) {
        Some(signed) => {
            signed.consume(cursor);
            signed.value(cursor, "year")?
        }
        None => cursor.number_as("year")?,
    };

    let Some(month) = date_part(cursor, "month")? else {
        return Ok(Date::Year(year));
    };
    let Some(day) = date_part(cursor, "day")? else {
        return Ok(Date::YearMonth(year, month));
    };
    Ok(Date::YearMonthDay(year, month, day))
}

/// Parses `'-' Number` when the cursor is at a dash.
fn date_part(cursor: &mut Cursor<'_, '_>, label: &'static str) -> Result<Option<u32>, ParseError> {
    match peek_signed_number(cursor) {
        Some(signed) if signed.sign == Sign::Negative => {
            signed.consume(cursor);
            // The dash is a separator here, not a sign.
            let value: i64 = signed.magnitude(cursor, label)?;
            signed.narrow(value, label).map(Some)
        }
        _ if cursor.next_if(TokenKind::Dash).is_some() => cursor.number_as(label).map(Some),
        _ => Ok(None),
    }
}

/// A sign immediately followed by a number, either as two raw tokens or as
/// a fused `±NN` token.
struct SignedNumber<'a> {
    sign: Sign,
    digits: Token<'a>,
    /// The index of the token holding the digits.
    pos: usize,
    /// The number of tokens to consume.
    len: usize,
}

impl SignedNumber<'_> {
    fn consume(&self, cursor: &mut Cursor<'_, '_>) {
        for _ in 0..self.len {
            cursor.advance();
        }
    }

    fn magnitude(&self, cursor: &Cursor<'_, '_>, label: &'static str) -> Result<i64, ParseError> {
        to_int_with(self.digits.text, label, self.pos, cursor.options().integer_syntax)
            .map_err(|err| err.with_span(self.digits.start, self.digits.end))
    }

    fn value<T: TryFrom<i64>>(
        &self,
        cursor: &Cursor<'_, '_>,
        label: &'static str,
    ) -> Result<T, ParseError> {
        let magnitude = self.magnitude(cursor, label)?;
        self.narrow(i64::from(self.sign.as_sign_multiplier()) * magnitude, label)
    }

    fn narrow<T: TryFrom<i64>>(&self, value: i64, label: &'static str) -> Result<T, ParseError> {
        T::try_from(value).map_err(|_| {
            ParseError::range(ErrorMessage::IntegerOutOfRange(label), self.pos)
                .with_span(self.digits.start, self.digits.end)
        })
    }
}

fn peek_signed_number<'a>(cursor: &Cursor<'_, 'a>) -> Option<SignedNumber<'a>> {
    match cursor.current()? {
        FusedToken::Offset(offset) => {
            let [sign, digits] = offset.parts.as_slice() else {
                return None;
            };
            Some(SignedNumber {
                sign: sign.text.bytes().next().and_then(Sign::from_ascii)?,
                digits: *digits,
                pos: cursor.pos(),
                len: 1,
            })
        }
        FusedToken::Raw(token) if token.is_sign() => Some(SignedNumber {
            sign: token.text.bytes().next().and_then(Sign::from_ascii)?,
            digits: *cursor.peek_n(1)?.raw_of(TokenKind::Number)?,
            pos: cursor.pos() + 1,
            len: 2,
        }),
        FusedToken::Raw(_) => None,
    }
}

/// `Time := Number ':' Number (':' Number (('.' | ',') Number)?)?`
pub(crate) fn parse_time(cursor: &mut Cursor<'_, '_>) -> Result<Time, ParseError> {
    let hour = cursor.number_as("hour")?;
    cursor.expect(TokenKind::Colon, "':'")?;
    let minute = cursor.number_as("minute")?;

    let mut time = Time {
        hour,
        minute,
        second: None,
        fraction: None,
    };
    if cursor.next_if(TokenKind::Colon).is_none() {
        return Ok(time);
    }
    time.second = Some(cursor.number_as("second")?);

    if cursor.next_if(TokenKind::Dot).is_some() || cursor.next_if(TokenKind::Comma).is_some() {
        let fraction = cursor.expect(TokenKind::Number, "fractional seconds")?;
        time.fraction = Some(fraction.text.to_string());
    }
    Ok(time)
}

/// `Offset := 'Z' | TimeZoneOffset`, absent otherwise.
pub(crate) fn parse_utc_offset(cursor: &mut Cursor<'_, '_>) -> Result<Option<Offset>, ParseError> {
    if cursor.next_if(TokenKind::Z).is_some() {
        return Ok(Some(Offset::Utc));
    }
    let Some(FusedToken::Offset(token)) = cursor.current() else {
        return Ok(None);
    };
    let offset = parse_offset(&token.text, cursor.pos())
        .map_err(|err| err.with_span(token.start, token.end))?;
    cursor.advance();
    Ok(Some(Offset::Numeric(offset)))
}

#[cfg(test)]
mod tests {
    use super::{parse_date, parse_date_time, parse_time};
    use crate::{
        ast::{Date, Offset},
        error::{ErrorKind, ErrorMessage},
        options::ParseOptions,
        parsers::{cursor::Cursor, fuse_offsets, lex, TokenKind},
        Sign,
    };

    macro_rules! with_cursor {
        ($source:expr, |$cursor:ident| $body:expr) => {{
            let tokens = fuse_offsets(lex($source).unwrap());
            let mut $cursor = Cursor::new(&tokens, ParseOptions::default());
            $body
        }};
    }

    #[test]
    fn progressive_date_precision() {
        assert_eq!(with_cursor!("2025", |c| parse_date(&mut c)), Ok(Date::Year(2025)));
        assert_eq!(
            with_cursor!("2025-07", |c| parse_date(&mut c)),
            Ok(Date::YearMonth(2025, 7))
        );
        assert_eq!(
            with_cursor!("2025-07-31", |c| parse_date(&mut c)),
            Ok(Date::YearMonthDay(2025, 7, 31))
        );
        // Calendar validity is not checked.
        assert_eq!(
            with_cursor!("2025-13-32", |c| parse_date(&mut c)),
            Ok(Date::YearMonthDay(2025, 13, 32))
        );
    }

    #[test]
    fn signed_years() {
        assert_eq!(
            with_cursor!("-0044-03-15", |c| parse_date(&mut c)),
            Ok(Date::YearMonthDay(-44, 3, 15))
        );
        assert_eq!(with_cursor!("+2025", |c| parse_date(&mut c)), Ok(Date::Year(2025)));
        assert_eq!(with_cursor!("0000", |c| parse_date(&mut c)).map(|d| d.year()), Ok(0));
    }

    #[test]
    fn fused_date_parts_after_a_slash() {
        // The fuser merges `-0044`, `-03`, and `-15` after the slash.
        let date = with_cursor!("/-0044-03-15", |c| {
            c.advance();
            parse_date(&mut c)
        });
        assert_eq!(date, Ok(Date::YearMonthDay(-44, 3, 15)));
    }

    #[test]
    fn date_stops_before_a_plus() {
        with_cursor!("/2025+01", |c| {
            c.advance();
            assert_eq!(parse_date(&mut c), Ok(Date::Year(2025)));
            assert_eq!(c.kind(), TokenKind::Plus);
        });
    }

    #[test]
    fn missing_year() {
        let err = with_cursor!("", |c| parse_date(&mut c)).unwrap_err();
        assert_eq!(err.position(), 0);
        assert_eq!(
            err.message(),
            ErrorMessage::UnexpectedToken {
                expected: "year",
                found: TokenKind::End
            }
        );
        assert!(with_cursor!("2025-", |c| parse_date(&mut c)).is_err());
    }

    #[test]
    fn time_forms() {
        let time = with_cursor!("10:30", |c| parse_time(&mut c)).unwrap();
        assert_eq!((time.hour, time.minute, time.second), (10, 30, None));

        let time = with_cursor!("10:30:15,250", |c| parse_time(&mut c)).unwrap();
        assert_eq!(time.second, Some(15));
        assert_eq!(time.fraction.as_deref(), Some("250"));

        let time = with_cursor!("23:59:59.000000001", |c| parse_time(&mut c)).unwrap();
        assert_eq!(time.fraction.as_deref(), Some("000000001"));

        let err = with_cursor!("1030", |c| parse_time(&mut c)).unwrap_err();
        assert_eq!(err.position(), 1);
        assert!(with_cursor!("10:30:15.", |c| parse_time(&mut c)).is_err());
    }

    #[test]
    fn offsets() {
        let dt = with_cursor!("2025-01-12T10:00:00Z", |c| parse_date_time(&mut c)).unwrap();
        assert_eq!(dt.offset, Some(Offset::Utc));

        let dt = with_cursor!("2025-01-12T10:00:00-00:00", |c| parse_date_time(&mut c)).unwrap();
        let Some(Offset::Numeric(offset)) = dt.offset else {
            panic!("expected a numeric offset");
        };
        assert_eq!(offset.sign, Sign::Negative);
        assert_eq!((offset.hours, offset.minutes), (0, 0));

        let dt = with_cursor!("2025-01-12T10:00", |c| parse_date_time(&mut c)).unwrap();
        assert_eq!(dt.offset, None);
    }

    #[test]
    fn offset_errors_point_at_the_offset_token() {
        let err = with_cursor!("2025-01-12T10:00+15:00", |c| parse_date_time(&mut c))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Range);
        assert_eq!(err.message(), ErrorMessage::OffsetHourRange(15));
        assert_eq!(err.position(), 9);
        assert_eq!(err.span(), Some((16, 22)));
    }

    #[test]
    fn oversized_fields_are_range_errors() {
        let err = with_cursor!("99999999999", |c| parse_date(&mut c)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Range);
        assert_eq!(err.message(), ErrorMessage::IntegerOutOfRange("year"));

        let err = with_cursor!("10:99999999999", |c| parse_time(&mut c)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Range);
        assert_eq!(err.position(), 2);
    }
}
