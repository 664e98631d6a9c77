//! The `temporal_syntax` crate parses ISO 8601, RFC 3339, and IXDTF
//! (RFC 9557) temporal strings into a small, closed AST, and serializes
//! that AST back into canonical text.
//!
//! ```rust
//! use temporal_syntax::{parse_temporal, stringify_temporal, TemporalAst};
//!
//! let ast = parse_temporal("2025-01-12T10:00:00+0530[Asia/Kolkata]").unwrap();
//! let TemporalAst::DateTime(date_time) = &ast else {
//!     panic!("expected a date-time");
//! };
//! assert_eq!(date_time.date.year(), 2025);
//! assert_eq!(date_time.time_zone.as_ref().unwrap().id, "Asia/Kolkata");
//!
//! // Offsets are always written back in the `±HH:MM` form.
//! assert_eq!(
//!     stringify_temporal(&ast),
//!     "2025-01-12T10:00:00+05:30[Asia/Kolkata]"
//! );
//! ```
//!
//! The pipeline runs in four stages, each a pure function of the previous
//! stage's output:
//!
//! 1. [`lex`] scans the source into [`Token`]s.
//! 2. [`fuse_offsets`] merges sign/number/colon runs into single
//!    [`FusedToken::Offset`] tokens where the context makes an offset
//!    unambiguous.
//! 3. The recursive-descent parser builds a [`TemporalAst`].
//! 4. The formatter writes the AST back out via [`writeable::Writeable`].
//!
//! [`parse_temporal`] composes the first three stages.
#![no_std]
#![cfg_attr(not(test), forbid(clippy::unwrap_used))]
#![allow(
    clippy::module_name_repetitions,
    clippy::redundant_pub_crate,
    clippy::missing_errors_doc,
    clippy::option_if_let_else,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]

extern crate alloc;
extern crate core;

#[cfg(test)]
extern crate std;

pub mod ast;
pub mod error;
pub mod formatter;
pub mod options;
pub mod parsers;

#[doc(inline)]
pub use error::{ErrorKind, LexError, ParseError, TemporalError};

pub use ast::{
    Annotation, AnnotationValue, Date, DateTime, Duration, NumericOffset, Offset, Range,
    TemporalAst, Time, TimeZone, Value,
};
pub use formatter::{
    stringify_annotation, stringify_date, stringify_date_time, stringify_duration,
    stringify_offset, stringify_range, stringify_temporal, stringify_time, stringify_time_zone,
};
pub use options::{IntegerSyntax, ParseOptions, TimeZonePolicy};
pub use parsers::{
    fuse_offsets, lex, parse_offset, parse_temporal, parse_temporal_with_options, parse_time,
    to_int, to_int_with, FusedToken, OffsetToken, TemporalParser, Token, TokenKind,
};

/// The result type for the composed parsing entry points.
pub type TemporalResult<T> = Result<T, TemporalError>;

/// The sign of a numeric UTC offset.
///
/// Unlike a general numeric sign there is no zero variant: `+00:00` and
/// `-00:00` are different offsets (RFC 3339 §4.3).
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Sign {
    #[default]
    Positive,
    Negative,
}

impl Sign {
    /// Returns `1` or `-1`.
    pub const fn as_sign_multiplier(&self) -> i8 {
        match self {
            Self::Positive => 1,
            Self::Negative => -1,
        }
    }

    /// The ASCII character this sign is written as.
    pub const fn as_char(&self) -> char {
        match self {
            Self::Positive => '+',
            Self::Negative => '-',
        }
    }

    pub(crate) fn from_ascii(byte: u8) -> Option<Self> {
        match byte {
            b'+' => Some(Self::Positive),
            b'-' => Some(Self::Negative),
            _ => None,
        }
    }
}
