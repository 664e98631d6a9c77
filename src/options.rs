//! Parsing options.
//!
//! The defaults reproduce the grammar exactly as documented on
//! [`parse_temporal`][crate::parse_temporal]. The options only widen or
//! narrow the two policies that are heuristic by nature: how integer text
//! is converted and how bracket groups are classified.

use core::{fmt, str::FromStr};

/// Options for [`TemporalParser`][crate::TemporalParser].
#[non_exhaustive]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Which integer notations [`TemporalParser::to_int`] accepts.
    ///
    /// Number tokens are plain digit runs, so this never changes the
    /// result of [`TemporalParser::parse`]; it only applies to integer text
    /// converted directly through the parser.
    ///
    /// [`TemporalParser::to_int`]: crate::TemporalParser::to_int
    /// [`TemporalParser::parse`]: crate::TemporalParser::parse
    pub integer_syntax: IntegerSyntax,
    /// How bracket groups are split between the time zone and annotations.
    pub time_zone_policy: TimeZonePolicy,
}

impl ParseOptions {
    /// Creates the default options.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            integer_syntax: IntegerSyntax::Strict,
            time_zone_policy: TimeZonePolicy::FirstIanaLike,
        }
    }

    #[inline]
    #[must_use]
    pub const fn with_integer_syntax(mut self, integer_syntax: IntegerSyntax) -> Self {
        self.integer_syntax = integer_syntax;
        self
    }

    #[inline]
    #[must_use]
    pub const fn with_time_zone_policy(mut self, time_zone_policy: TimeZonePolicy) -> Self {
        self.time_zone_policy = time_zone_policy;
        self
    }
}

// ==== IntegerSyntax ====

/// The notations accepted when converting integer text.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum IntegerSyntax {
    /// An optional `+` or `-` followed by ASCII decimal digits.
    #[default]
    Strict,
    /// Also accepts surrounding whitespace, `0x`/`0o`/`0b` prefixes, a
    /// zero-only fraction (`12.00`), and exponents with an integral result
    /// (`1e3`).
    Lenient,
}

/// A parsing error for `IntegerSyntax`.
#[derive(Debug, Clone, Copy)]
pub struct ParseIntegerSyntaxError;

impl fmt::Display for ParseIntegerSyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("provided string was not a valid integer syntax value")
    }
}

impl FromStr for IntegerSyntax {
    type Err = ParseIntegerSyntaxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "strict" => Ok(Self::Strict),
            "lenient" => Ok(Self::Lenient),
            _ => Err(ParseIntegerSyntaxError),
        }
    }
}

impl fmt::Display for IntegerSyntax {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Strict => "strict",
            Self::Lenient => "lenient",
        }
        .fmt(f)
    }
}

// ==== TimeZonePolicy ====

/// Decides which bracket group, if any, is read as the time zone.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum TimeZonePolicy {
    /// The first group without `=` that contains `/` (or starts with
    /// `Etc/`) is the time zone. Every other group is an annotation.
    #[default]
    FirstIanaLike,
    /// Every group is an annotation.
    AnnotationsOnly,
}

/// A parsing error for `TimeZonePolicy`.
#[derive(Debug, Clone, Copy)]
pub struct ParseTimeZonePolicyError;

impl fmt::Display for ParseTimeZonePolicyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("provided string was not a valid time zone policy value")
    }
}

impl FromStr for TimeZonePolicy {
    type Err = ParseTimeZonePolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "firstIanaLike" => Ok(Self::FirstIanaLike),
            "annotationsOnly" => Ok(Self::AnnotationsOnly),
            _ => Err(ParseTimeZonePolicyError),
        }
    }
}

impl fmt::Display for TimeZonePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FirstIanaLike => "firstIanaLike",
            Self::AnnotationsOnly => "annotationsOnly",
        }
        .fmt(f)
    }
}
