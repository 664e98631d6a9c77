//! The parsed representation of a temporal string.
//!
//! Every node is built once by the parser and never mutated afterwards.
//! Optional fields are `None` when the corresponding component did not
//! appear in the source, which is distinct from a zero value.

use alloc::{collections::BTreeMap, string::String, vec::Vec};

use crate::Sign;

/// The result of parsing a complete temporal string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemporalAst {
    DateTime(DateTime),
    Duration(Duration),
    Range(Range),
}

impl From<Value> for TemporalAst {
    fn from(value: Value) -> Self {
        match value {
            Value::DateTime(dt) => Self::DateTime(dt),
            Value::Duration(d) => Self::Duration(d),
        }
    }
}

/// A single side of a [`Range`], or a standalone value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    DateTime(DateTime),
    Duration(Duration),
}

/// An interval written as `start/end`, where either side may be open.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Range {
    /// `None` for an open start (`/2025-12-31`).
    pub start: Option<Value>,
    /// `None` for an open end (`2025-01-01/`).
    pub end: Option<Value>,
}

impl Range {
    /// Returns whether at least one side of the range is unbounded.
    #[inline]
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.start.is_none() || self.end.is_none()
    }
}

/// A calendar date with progressive precision.
///
/// A day can only be present together with a month. Values are not checked
/// for calendar validity: month 13 or day 32 parse as written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Date {
    /// `YYYY`
    Year(i32),
    /// `YYYY-MM`
    YearMonth(i32, u32),
    /// `YYYY-MM-DD`
    YearMonthDay(i32, u32, u32),
}

impl Date {
    /// The astronomical year: `0` is 1 BC, `-1` is 2 BC.
    #[inline]
    #[must_use]
    pub const fn year(&self) -> i32 {
        match *self {
            Self::Year(year) | Self::YearMonth(year, _) | Self::YearMonthDay(year, _, _) => year,
        }
    }

    #[inline]
    #[must_use]
    pub const fn month(&self) -> Option<u32> {
        match *self {
            Self::Year(_) => None,
            Self::YearMonth(_, month) | Self::YearMonthDay(_, month, _) => Some(month),
        }
    }

    #[inline]
    #[must_use]
    pub const fn day(&self) -> Option<u32> {
        match *self {
            Self::YearMonthDay(_, _, day) => Some(day),
            _ => None,
        }
    }
}

/// A wall-clock time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Time {
    pub hour: u32,
    pub minute: u32,
    pub second: Option<u32>,
    /// The fractional second digits exactly as written, without the
    /// separator. Only written out when `second` is present.
    pub fraction: Option<String>,
}

/// A UTC offset.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Offset {
    /// The `Z` designator.
    Utc,
    /// A signed `±HH:MM` offset. `-00:00` stays distinct from [`Offset::Utc`]:
    /// it means the local offset is unknown.
    Numeric(NumericOffset),
}

impl Offset {
    /// Returns whether this is the `Z` designator. `+00:00` is not.
    #[inline]
    #[must_use]
    pub const fn is_utc(&self) -> bool {
        matches!(self, Self::Utc)
    }
}

/// A numeric UTC offset.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NumericOffset {
    pub sign: Sign,
    /// In `0..=14`.
    pub hours: u8,
    /// In `0..=59`.
    pub minutes: u8,
    /// The offset text as it appeared in the source, e.g. `+0530`.
    pub raw: String,
}

impl NumericOffset {
    /// The signed offset from UTC in minutes.
    #[inline]
    #[must_use]
    pub fn total_minutes(&self) -> i16 {
        let magnitude = i16::from(self.hours) * 60 + i16::from(self.minutes);
        magnitude * i16::from(self.sign.as_sign_multiplier())
    }
}

/// A bracketed time zone identifier such as `[Asia/Singapore]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TimeZone {
    pub id: String,
    pub critical: bool,
}

/// The value side of an annotation entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AnnotationValue {
    /// `key=value`
    Text(String),
    /// A bare `key` without `=`.
    Flag,
}

/// A bracketed annotation such as `[u-ca=iso8601]`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Annotation {
    /// The bracket content as written, including a leading `!`.
    pub raw: String,
    pub critical: bool,
    /// Best-effort `key=value` entries. Later duplicates replace earlier
    /// ones.
    pub entries: BTreeMap<String, AnnotationValue>,
}

impl Annotation {
    /// Looks up the entry for `key`.
    #[inline]
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&AnnotationValue> {
        self.entries.get(key)
    }
}

/// A date with optional time, offset, time zone, and annotations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateTime {
    pub date: Date,
    pub time: Option<Time>,
    pub offset: Option<Offset>,
    pub time_zone: Option<TimeZone>,
    /// In source order.
    pub annotations: Vec<Annotation>,
}

impl DateTime {
    /// The value of the first `u-ca` annotation key, if any.
    #[must_use]
    pub fn calendar(&self) -> Option<&str> {
        self.annotations.iter().find_map(|a| match a.get("u-ca") {
            Some(AnnotationValue::Text(calendar)) => Some(calendar.as_str()),
            _ => None,
        })
    }
}

/// An ISO 8601 duration such as `P1Y2M3DT4H5M6S`.
///
/// A field is `Some` when its designator appeared in the source, even with a
/// value of zero. Repeated designators are summed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Duration {
    pub years: Option<u64>,
    pub months: Option<u64>,
    pub weeks: Option<u64>,
    pub days: Option<u64>,
    pub hours: Option<u64>,
    pub minutes: Option<u64>,
    pub seconds: Option<u64>,
    /// Fractional second digits as written.
    pub fraction: Option<String>,
    /// The duration text rebuilt from the consumed tokens.
    pub raw: String,
    pub annotations: Vec<Annotation>,
}

impl Duration {
    /// Returns whether no designator was present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        [
            self.years,
            self.months,
            self.weeks,
            self.days,
            self.hours,
            self.minutes,
            self.seconds,
        ]
        .iter()
        .all(Option::is_none)
    }

    pub(crate) fn has_time_part(&self) -> bool {
        self.hours.is_some() || self.minutes.is_some() || self.seconds.is_some()
    }
}
