//! This module implements the lexical and syntactic errors of `temporal_syntax`.

use core::fmt;

use crate::parsers::TokenKind;

/// The kind of a [`ParseError`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The token stream or offset text does not match the grammar.
    #[default]
    Syntax,
    /// A value is well formed but outside the range it must fall into.
    Range,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Syntax => "SyntaxError",
            Self::Range => "RangeError",
        }
        .fmt(f)
    }
}

/// An error raised while scanning source text.
///
/// The offset is a byte offset into the scanned source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LexError {
    msg: ErrorMessage,
    offset: usize,
}

impl LexError {
    #[inline]
    #[must_use]
    pub(crate) const fn new(msg: ErrorMessage, offset: usize) -> Self {
        Self { msg, offset }
    }

    /// The byte offset of the offending character.
    #[inline]
    #[must_use]
    pub const fn offset(&self) -> usize {
        self.offset
    }

    /// The error message.
    #[inline]
    #[must_use]
    pub const fn message(&self) -> ErrorMessage {
        self.msg
    }
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LexicalError: {} at offset {}", self.msg, self.offset)
    }
}

impl core::error::Error for LexError {}

/// An error raised while parsing a token stream, or while parsing offset or
/// integer text.
///
/// `position` is the index of the offending token in the fused token
/// sequence. For the standalone [`parse_offset`][crate::parse_offset] and
/// [`to_int`][crate::to_int] helpers it is the position supplied by the
/// caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseError {
    kind: ErrorKind,
    msg: ErrorMessage,
    position: usize,
    span: Option<(usize, usize)>,
}

impl ParseError {
    #[inline]
    #[must_use]
    const fn new(kind: ErrorKind, msg: ErrorMessage, position: usize) -> Self {
        Self {
            kind,
            msg,
            position,
            span: None,
        }
    }

    /// Create a syntax error.
    #[inline]
    #[must_use]
    pub(crate) const fn syntax(msg: ErrorMessage, position: usize) -> Self {
        Self::new(ErrorKind::Syntax, msg, position)
    }

    /// Create a range error.
    #[inline]
    #[must_use]
    pub(crate) const fn range(msg: ErrorMessage, position: usize) -> Self {
        Self::new(ErrorKind::Range, msg, position)
    }

    /// Attach the byte span of the offending token.
    #[inline]
    #[must_use]
    pub(crate) const fn with_span(mut self, start: usize, end: usize) -> Self {
        self.span = Some((start, end));
        self
    }

    /// Returns this error's kind.
    #[inline]
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// The error message.
    #[inline]
    #[must_use]
    pub const fn message(&self) -> ErrorMessage {
        self.msg
    }

    /// The token index, or the caller supplied position.
    #[inline]
    #[must_use]
    pub const fn position(&self) -> usize {
        self.position
    }

    /// The half-open byte span of the offending token, when the error was
    /// raised against a token.
    #[inline]
    #[must_use]
    pub const fn span(&self) -> Option<(usize, usize)> {
        self.span
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} (token {})", self.kind, self.msg, self.position)?;
        if let Some((start, end)) = self.span {
            write!(f, " at {start}..{end}")?;
        }
        Ok(())
    }
}

impl core::error::Error for ParseError {}

/// The error returned by the composed parsing entry points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemporalError {
    Lex(LexError),
    Parse(ParseError),
}

impl TemporalError {
    /// The byte offset into the source the error points at, if known.
    #[must_use]
    pub const fn byte_offset(&self) -> Option<usize> {
        match self {
            Self::Lex(err) => Some(err.offset()),
            Self::Parse(err) => match err.span() {
                Some((start, _)) => Some(start),
                None => None,
            },
        }
    }

    /// The error message.
    #[must_use]
    pub const fn message(&self) -> ErrorMessage {
        match self {
            Self::Lex(err) => err.message(),
            Self::Parse(err) => err.message(),
        }
    }
}

impl fmt::Display for TemporalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lex(err) => err.fmt(f),
            Self::Parse(err) => err.fmt(f),
        }
    }
}

impl core::error::Error for TemporalError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            Self::Lex(err) => Some(err),
            Self::Parse(err) => Some(err),
        }
    }
}

impl From<LexError> for TemporalError {
    fn from(error: LexError) -> Self {
        Self::Lex(error)
    }
}

impl From<ParseError> for TemporalError {
    fn from(error: ParseError) -> Self {
        Self::Parse(error)
    }
}

/// The error message
#[non_exhaustive]
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ErrorMessage {
    // Lexing
    UnexpectedChar(char),
    UnexpectedBracketChar(char),
    UnterminatedBracket,

    // Token stream
    UnexpectedToken {
        expected: &'static str,
        found: TokenKind,
    },
    ExpectedEnd(TokenKind),
    DurationDateUnit,
    DurationTimeUnit,
    DurationMissingUnit,
    DurationOverflow,

    // Integers
    InvalidInteger(&'static str),
    IntegerOutOfRange(&'static str),

    // Offsets
    OffsetNeedsSign,
    OffsetEmpty,
    OffsetFormat,
    OffsetHourRange(i64),
    OffsetMinuteRange(i64),
}

impl fmt::Display for ErrorMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::UnexpectedChar(ch) => write!(f, "unexpected character {ch:?}"),
            Self::UnexpectedBracketChar(ch) => {
                write!(f, "unexpected character {ch:?} inside brackets")
            }
            Self::UnterminatedBracket => f.write_str("unterminated bracket"),
            Self::UnexpectedToken { expected, found } => {
                write!(f, "expected {expected}, found {found}")
            }
            Self::ExpectedEnd(found) => write!(f, "expected end of input, found {found}"),
            Self::DurationDateUnit => f.write_str("invalid duration unit in date part"),
            Self::DurationTimeUnit => f.write_str("invalid duration unit in time part"),
            Self::DurationMissingUnit => f.write_str("duration value is missing its unit"),
            Self::DurationOverflow => f.write_str("duration field exceeds the supported range"),
            Self::InvalidInteger(label) => write!(f, "{label} is not a valid integer"),
            Self::IntegerOutOfRange(label) => write!(f, "{label} is out of range"),
            Self::OffsetNeedsSign => f.write_str("offset must start with '+' or '-'"),
            Self::OffsetEmpty => f.write_str("offset has no digits after its sign"),
            Self::OffsetFormat => f.write_str("offset must be in the form HH:MM, HHMM, or HH"),
            Self::OffsetHourRange(hours) => {
                write!(f, "offset hours {hours} are outside the range 0-14")
            }
            Self::OffsetMinuteRange(minutes) => {
                write!(f, "offset minutes {minutes} are outside the range 0-59")
            }
        }
    }
}
