//! This module implements temporal string parsing.
//!
//! Parsing runs as a pipeline: [`lex`], then [`fuse_offsets`], then the
//! recursive-descent productions over a cursor. Every stage is a pure
//! function of its input, so parses never share state.

use core::str::FromStr;

use crate::{
    ast::{NumericOffset, Range, TemporalAst, Time, Value},
    error::ParseError,
    options::ParseOptions,
    TemporalError, TemporalResult,
};

mod annotations;
mod cursor;
mod datetime;
mod duration;
mod fuser;
mod grammar;
mod integer;
mod lexer;
mod offset;


use cursor::Cursor;

pub use fuser::{fuse_offsets, FusedToken, OffsetToken};
pub use grammar::{is_bracket_word_char, is_digit, is_letter};
pub use integer::{to_int, to_int_with};
pub use lexer::{lex, Token, TokenKind};
pub use offset::parse_offset;

/// A parser for temporal strings with configurable [`ParseOptions`].
///
/// ```rust
/// use temporal_syntax::{ParseOptions, TemporalAst, TemporalParser, TimeZonePolicy};
///
/// let parser = TemporalParser::with_options(
///     ParseOptions::new().with_time_zone_policy(TimeZonePolicy::AnnotationsOnly),
/// );
/// let TemporalAst::DateTime(dt) = parser.parse("2025-03-01[Europe/Oslo]").unwrap() else {
///     unreachable!();
/// };
/// assert!(dt.time_zone.is_none());
/// assert_eq!(dt.annotations[0].raw, "Europe/Oslo");
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TemporalParser {
    options: ParseOptions,
}

impl TemporalParser {
    /// Creates a new `TemporalParser` with the default options.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self::with_options(ParseOptions::new())
    }

    /// Creates a new `TemporalParser` with the provided options.
    #[inline]
    #[must_use]
    pub const fn with_options(options: ParseOptions) -> Self {
        Self { options }
    }

    /// Returns this parser's options.
    #[inline]
    #[must_use]
    pub const fn options(&self) -> ParseOptions {
        self.options
    }

    /// Parses a complete temporal string.
    ///
    /// The accepted grammar is:
    ///
    /// ```text
    /// Temporal := '/' Value?
    ///           | Value ('/' Value?)?
    /// Value    := Duration | DateTime
    /// ```
    ///
    /// followed by the end of input. A value is a duration when it starts
    /// with the identifier `P`.
    pub fn parse(&self, source: &str) -> TemporalResult<TemporalAst> {
        let tokens = fuse_offsets(lex(source)?);
        let ast = self.parse_tokens(&tokens)?;
        #[cfg(feature = "log")]
        log::debug!("parsed {source:?} from {} tokens", tokens.len());
        Ok(ast)
    }

    /// Parses an already lexed and fused token sequence.
    ///
    /// Error positions are indices into `tokens`.
    pub fn parse_tokens(&self, tokens: &[FusedToken<'_>]) -> Result<TemporalAst, ParseError> {
        let mut cursor = Cursor::new(tokens, self.options);
        let ast = parse_temporal_ast(&mut cursor)?;
        cursor.close()?;
        Ok(ast)
    }

    /// Parses a standalone time such as `10:30`, `T10:30:15`, or
    /// `23:59:59.999`.
    ///
    /// [`parse`][Self::parse] never produces a bare time; this is the only
    /// entry point for one.
    pub fn parse_time(&self, source: &str) -> TemporalResult<Time> {
        let tokens = fuse_offsets(lex(source)?);
        let mut cursor = Cursor::new(&tokens, self.options);
        cursor.next_if(TokenKind::T);
        let time = datetime::parse_time(&mut cursor)?;
        cursor.close()?;
        Ok(time)
    }

    /// Parses standalone offset text such as `+05:30`.
    ///
    /// Equivalent to [`parse_offset`] at position `0`.
    pub fn parse_offset(&self, source: &str) -> Result<NumericOffset, ParseError> {
        parse_offset(source, 0)
    }

    /// Converts integer text with this parser's [`IntegerSyntax`].
    ///
    /// [`IntegerSyntax`]: crate::IntegerSyntax
    pub fn to_int(
        &self,
        text: &str,
        label: &'static str,
        position: usize,
    ) -> Result<i64, ParseError> {
        to_int_with(text, label, position, self.options.integer_syntax)
    }
}

/// Parses a temporal string with the default options.
///
/// See [`TemporalParser::parse`] for the grammar.
#[inline]
pub fn parse_temporal(source: &str) -> TemporalResult<TemporalAst> {
    TemporalParser::new().parse(source)
}

/// Parses a temporal string with the provided options.
#[inline]
pub fn parse_temporal_with_options(
    source: &str,
    options: ParseOptions,
) -> TemporalResult<TemporalAst> {
    TemporalParser::with_options(options).parse(source)
}

/// Parses a standalone time with the default options.
///
/// See [`TemporalParser::parse_time`].
#[inline]
pub fn parse_time(source: &str) -> TemporalResult<Time> {
    TemporalParser::new().parse_time(source)
}

fn parse_temporal_ast(cursor: &mut Cursor<'_, '_>) -> Result<TemporalAst, ParseError> {
    if cursor.next_if(TokenKind::Slash).is_some() {
        let end = parse_open_value(cursor)?;
        return Ok(TemporalAst::Range(Range { start: None, end }));
    }

    let start = parse_value(cursor)?;
    if cursor.next_if(TokenKind::Slash).is_none() {
        return Ok(start.into());
    }
    let end = parse_open_value(cursor)?;
    Ok(TemporalAst::Range(Range {
        start: Some(start),
        end,
    }))
}

/// A range side is open when nothing follows the slash.
fn parse_open_value(cursor: &mut Cursor<'_, '_>) -> Result<Option<Value>, ParseError> {
    if cursor.kind() == TokenKind::End {
        return Ok(None);
    }
    parse_value(cursor).map(Some)
}

fn parse_value(cursor: &mut Cursor<'_, '_>) -> Result<Value, ParseError> {
    if cursor.at_ident("P") {
        return duration::parse_duration(cursor).map(Value::Duration);
    }
    datetime::parse_date_time(cursor).map(Value::DateTime)
}

impl FromStr for TemporalAst {
    type Err = TemporalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_temporal(s)
    }
}

impl FromStr for Time {
    type Err = TemporalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_time(s)
    }
}
