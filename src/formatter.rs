//! Canonical serialization of the AST.
//!
//! Every node is rebuilt from its parsed fields. Offsets always come out as
//! `±HH:MM`, years are padded to four digits, and duration designators are
//! written when present, even with a value of zero. Annotations are the one
//! exception: they are written back from their raw bracket text.

use alloc::string::String;
use core::fmt::{self, Write};

use writeable::{impl_display_with_writeable, LengthHint, Writeable};

use crate::ast::{
    Annotation, Date, DateTime, Duration, NumericOffset, Offset, Range, TemporalAst, Time,
    TimeZone, Value,
};

fn digit_count(value: u64) -> usize {
    value.checked_ilog10().map_or(1, |log| log as usize + 1)
}

/// The length of `value` padded to at least `width` digits.
fn padded_len(value: u64, width: usize) -> usize {
    digit_count(value).max(width)
}

fn write_padded<W: Write + ?Sized>(value: u64, width: usize, sink: &mut W) -> fmt::Result {
    for _ in digit_count(value)..width {
        sink.write_char('0')?;
    }
    value.write_to(sink)
}

/// Writes `.fraction` unless the fraction is missing or empty.
fn write_fraction<W: Write + ?Sized>(fraction: Option<&str>, sink: &mut W) -> fmt::Result {
    match fraction {
        Some(fraction) if !fraction.is_empty() => {
            sink.write_char('.')?;
            sink.write_str(fraction)
        }
        _ => Ok(()),
    }
}

fn fraction_len(fraction: Option<&str>) -> usize {
    fraction.map_or(0, |f| if f.is_empty() { 0 } else { f.len() + 1 })
}

// ==== Date and time ====

impl Writeable for Date {
    fn write_to<W: Write + ?Sized>(&self, sink: &mut W) -> fmt::Result {
        let year = self.year();
        if year < 0 {
            sink.write_char('-')?;
        }
        write_padded(u64::from(year.unsigned_abs()), 4, sink)?;
        if let Some(month) = self.month() {
            sink.write_char('-')?;
            write_padded(u64::from(month), 2, sink)?;
        }
        if let Some(day) = self.day() {
            sink.write_char('-')?;
            write_padded(u64::from(day), 2, sink)?;
        }
        Ok(())
    }

    fn writeable_length_hint(&self) -> LengthHint {
        let year = self.year();
        let mut len = usize::from(year < 0) + padded_len(u64::from(year.unsigned_abs()), 4);
        len += self.month().map_or(0, |m| 1 + padded_len(u64::from(m), 2));
        len += self.day().map_or(0, |d| 1 + padded_len(u64::from(d), 2));
        LengthHint::exact(len)
    }
}

impl Writeable for Time {
    fn write_to<W: Write + ?Sized>(&self, sink: &mut W) -> fmt::Result {
        write_padded(u64::from(self.hour), 2, sink)?;
        sink.write_char(':')?;
        write_padded(u64::from(self.minute), 2, sink)?;
        let Some(second) = self.second else {
            return Ok(());
        };
        sink.write_char(':')?;
        write_padded(u64::from(second), 2, sink)?;
        write_fraction(self.fraction.as_deref(), sink)
    }

    fn writeable_length_hint(&self) -> LengthHint {
        let mut len =
            padded_len(u64::from(self.hour), 2) + 1 + padded_len(u64::from(self.minute), 2);
        if let Some(second) = self.second {
            len += 1 + padded_len(u64::from(second), 2);
            len += fraction_len(self.fraction.as_deref());
        }
        LengthHint::exact(len)
    }
}

// ==== Offsets and brackets ====

impl Writeable for NumericOffset {
    fn write_to<W: Write + ?Sized>(&self, sink: &mut W) -> fmt::Result {
        sink.write_char(self.sign.as_char())?;
        write_padded(u64::from(self.hours), 2, sink)?;
        sink.write_char(':')?;
        write_padded(u64::from(self.minutes), 2, sink)
    }

    fn writeable_length_hint(&self) -> LengthHint {
        LengthHint::exact(
            2 + padded_len(u64::from(self.hours), 2) + padded_len(u64::from(self.minutes), 2),
        )
    }
}

impl Writeable for Offset {
    fn write_to<W: Write + ?Sized>(&self, sink: &mut W) -> fmt::Result {
        match self {
            Self::Utc => sink.write_char('Z'),
            Self::Numeric(offset) => offset.write_to(sink),
        }
    }

    fn writeable_length_hint(&self) -> LengthHint {
        match self {
            Self::Utc => LengthHint::exact(1),
            Self::Numeric(offset) => offset.writeable_length_hint(),
        }
    }
}

impl Writeable for TimeZone {
    fn write_to<W: Write + ?Sized>(&self, sink: &mut W) -> fmt::Result {
        sink.write_char('[')?;
        if self.critical {
            sink.write_char('!')?;
        }
        sink.write_str(&self.id)?;
        sink.write_char(']')
    }

    fn writeable_length_hint(&self) -> LengthHint {
        LengthHint::exact(2 + usize::from(self.critical) + self.id.len())
    }
}

impl Writeable for Annotation {
    fn write_to<W: Write + ?Sized>(&self, sink: &mut W) -> fmt::Result {
        sink.write_char('[')?;
        sink.write_str(&self.raw)?;
        sink.write_char(']')
    }

    fn writeable_length_hint(&self) -> LengthHint {
        LengthHint::exact(2 + self.raw.len())
    }
}

fn annotations_length_hint(annotations: &[Annotation]) -> LengthHint {
    annotations
        .iter()
        .map(|annotation| annotation.writeable_length_hint())
        .sum()
}

// ==== Composite values ====

impl Writeable for DateTime {
    fn write_to<W: Write + ?Sized>(&self, sink: &mut W) -> fmt::Result {
        self.date.write_to(sink)?;
        if let Some(time) = &self.time {
            sink.write_char('T')?;
            time.write_to(sink)?;
        }
        if let Some(offset) = &self.offset {
            offset.write_to(sink)?;
        }
        if let Some(time_zone) = &self.time_zone {
            time_zone.write_to(sink)?;
        }
        for annotation in &self.annotations {
            annotation.write_to(sink)?;
        }
        Ok(())
    }

    fn writeable_length_hint(&self) -> LengthHint {
        let time_length = self
            .time
            .as_ref()
            .map(|t| t.writeable_length_hint() + 1)
            .unwrap_or(LengthHint::exact(0));
        let offset_length = self
            .offset
            .as_ref()
            .map(|offset| offset.writeable_length_hint())
            .unwrap_or(LengthHint::exact(0));
        let time_zone_length = self
            .time_zone
            .as_ref()
            .map(|tz| tz.writeable_length_hint())
            .unwrap_or(LengthHint::exact(0));

        self.date.writeable_length_hint()
            + time_length
            + offset_length
            + time_zone_length
            + annotations_length_hint(&self.annotations)
    }
}

impl Duration {
    /// The date fields in emission order.
    fn date_fields(&self) -> [(Option<u64>, char); 4] {
        [
            (self.years, 'Y'),
            (self.months, 'M'),
            (self.weeks, 'W'),
            (self.days, 'D'),
        ]
    }

    /// The time fields in emission order, without seconds.
    fn time_fields(&self) -> [(Option<u64>, char); 2] {
        [(self.hours, 'H'), (self.minutes, 'M')]
    }
}

impl Writeable for Duration {
    fn write_to<W: Write + ?Sized>(&self, sink: &mut W) -> fmt::Result {
        sink.write_char('P')?;
        for (value, designator) in self.date_fields() {
            if let Some(value) = value {
                value.write_to(sink)?;
                sink.write_char(designator)?;
            }
        }
        if self.has_time_part() {
            sink.write_char('T')?;
        }
        for (value, designator) in self.time_fields() {
            if let Some(value) = value {
                value.write_to(sink)?;
                sink.write_char(designator)?;
            }
        }
        if let Some(seconds) = self.seconds {
            seconds.write_to(sink)?;
            write_fraction(self.fraction.as_deref(), sink)?;
            sink.write_char('S')?;
        }
        for annotation in &self.annotations {
            annotation.write_to(sink)?;
        }
        Ok(())
    }

    fn writeable_length_hint(&self) -> LengthHint {
        let designated = |value: Option<u64>| value.map_or(0, |v| digit_count(v) + 1);
        let mut len = 1 + usize::from(self.has_time_part());
        len += self
            .date_fields()
            .iter()
            .chain(self.time_fields().iter())
            .map(|&(value, _)| designated(value))
            .sum::<usize>();
        if self.seconds.is_some() {
            len += designated(self.seconds) + fraction_len(self.fraction.as_deref());
        }
        LengthHint::exact(len) + annotations_length_hint(&self.annotations)
    }
}

impl Writeable for Value {
    fn write_to<W: Write + ?Sized>(&self, sink: &mut W) -> fmt::Result {
        match self {
            Self::DateTime(dt) => dt.write_to(sink),
            Self::Duration(d) => d.write_to(sink),
        }
    }

    fn writeable_length_hint(&self) -> LengthHint {
        match self {
            Self::DateTime(dt) => dt.writeable_length_hint(),
            Self::Duration(d) => d.writeable_length_hint(),
        }
    }
}

impl Writeable for Range {
    fn write_to<W: Write + ?Sized>(&self, sink: &mut W) -> fmt::Result {
        if let Some(start) = &self.start {
            start.write_to(sink)?;
        }
        sink.write_char('/')?;
        if let Some(end) = &self.end {
            end.write_to(sink)?;
        }
        Ok(())
    }

    fn writeable_length_hint(&self) -> LengthHint {
        let side = |value: &Option<Value>| {
            value
                .as_ref()
                .map(|value| value.writeable_length_hint())
                .unwrap_or(LengthHint::exact(0))
        };
        side(&self.start) + 1 + side(&self.end)
    }
}

impl Writeable for TemporalAst {
    fn write_to<W: Write + ?Sized>(&self, sink: &mut W) -> fmt::Result {
        match self {
            Self::DateTime(dt) => dt.write_to(sink),
            Self::Duration(d) => d.write_to(sink),
            Self::Range(range) => range.write_to(sink),
        }
    }

    fn writeable_length_hint(&self) -> LengthHint {
        match self {
            Self::DateTime(dt) => dt.writeable_length_hint(),
            Self::Duration(d) => d.writeable_length_hint(),
            Self::Range(range) => range.writeable_length_hint(),
        }
    }
}

impl_display_with_writeable!(Date);
impl_display_with_writeable!(Time);
impl_display_with_writeable!(NumericOffset);
impl_display_with_writeable!(Offset);
impl_display_with_writeable!(TimeZone);
impl_display_with_writeable!(Annotation);
impl_display_with_writeable!(DateTime);
impl_display_with_writeable!(Duration);
impl_display_with_writeable!(Value);
impl_display_with_writeable!(Range);
impl_display_with_writeable!(TemporalAst);

// ==== String helpers ====

/// Serializes any parse result into canonical text.
///
/// ```rust
/// use temporal_syntax::{parse_temporal, stringify_temporal};
///
/// let ast = parse_temporal("2025-01-01T08:00:00.5+0100/P1D").unwrap();
/// assert_eq!(stringify_temporal(&ast), "2025-01-01T08:00:00.5+01:00/P1D");
/// ```
pub fn stringify_temporal(ast: &TemporalAst) -> String {
    ast.write_to_string().into_owned()
}

/// Serializes a date as `YYYY`, `YYYY-MM`, or `YYYY-MM-DD`.
pub fn stringify_date(date: &Date) -> String {
    date.write_to_string().into_owned()
}

pub fn stringify_time(time: &Time) -> String {
    time.write_to_string().into_owned()
}

/// Serializes an offset as `Z` or `±HH:MM`.
pub fn stringify_offset(offset: &Offset) -> String {
    offset.write_to_string().into_owned()
}

pub fn stringify_time_zone(time_zone: &TimeZone) -> String {
    time_zone.write_to_string().into_owned()
}

/// Serializes an annotation from its raw bracket text.
pub fn stringify_annotation(annotation: &Annotation) -> String {
    annotation.write_to_string().into_owned()
}

pub fn stringify_duration(duration: &Duration) -> String {
    duration.write_to_string().into_owned()
}

pub fn stringify_date_time(date_time: &DateTime) -> String {
    date_time.write_to_string().into_owned()
}

pub fn stringify_range(range: &Range) -> String {
    range.write_to_string().into_owned()
}

#[cfg(test)]
mod tests {
    use super::{stringify_offset, stringify_time};
    use alloc::format;
    use crate::{
        ast::{Annotation, Date, Duration, NumericOffset, Offset, Range, Time, TimeZone, Value},
        Sign,
    };
    use alloc::{string::String, vec};
    use writeable::assert_writeable_eq;

    #[test]
    fn dates_pad_the_year_magnitude() {
        assert_writeable_eq!(Date::YearMonthDay(2025, 1, 7), "2025-01-07");
        assert_writeable_eq!(Date::YearMonthDay(-44, 3, 15), "-0044-03-15");
        assert_writeable_eq!(Date::Year(0), "0000");
        assert_writeable_eq!(Date::YearMonth(12345, 12), "12345-12");
        assert_writeable_eq!(Date::Year(-123456), "-123456");
    }

    #[test]
    fn times() {
        let mut time = Time {
            hour: 9,
            minute: 5,
            second: None,
            fraction: Some("5".into()),
        };
        // The fraction belongs to the seconds.
        assert_writeable_eq!(time, "09:05");
        time.second = Some(0);
        assert_writeable_eq!(time, "09:05:00.5");
        time.fraction = Some(String::new());
        assert_writeable_eq!(time, "09:05:00");
        assert_eq!(stringify_time(&time), "09:05:00");
    }

    #[test]
    fn offsets_are_normalized() {
        let offset = NumericOffset {
            sign: Sign::Positive,
            hours: 5,
            minutes: 30,
            raw: "+0530".into(),
        };
        assert_writeable_eq!(offset, "+05:30");
        let offset = NumericOffset {
            sign: Sign::Negative,
            hours: 0,
            minutes: 0,
            raw: "-00".into(),
        };
        assert_writeable_eq!(Offset::Numeric(offset), "-00:00");
        assert_writeable_eq!(Offset::Utc, "Z");
        assert_eq!(stringify_offset(&Offset::Utc), "Z");
    }

    #[test]
    fn brackets() {
        let tz = TimeZone {
            id: "Asia/Singapore".into(),
            critical: true,
        };
        assert_writeable_eq!(tz, "[!Asia/Singapore]");
        let annotation = Annotation {
            raw: "!u-ca=iso8601".into(),
            critical: true,
            ..Annotation::default()
        };
        assert_writeable_eq!(annotation, "[!u-ca=iso8601]");
    }

    #[test]
    fn duration_presence_controls_emission() {
        let duration = Duration {
            years: Some(0),
            months: Some(0),
            days: Some(1),
            ..Duration::default()
        };
        assert_writeable_eq!(duration, "P0Y0M1D");

        let duration = Duration {
            minutes: Some(0),
            seconds: Some(12),
            fraction: Some("034".into()),
            ..Duration::default()
        };
        assert_writeable_eq!(duration, "PT0M12.034S");

        // A `T` without time fields is dropped.
        assert_writeable_eq!(Duration::default(), "P");
    }

    #[test]
    fn duration_annotations_follow_the_duration() {
        let duration = Duration {
            hours: Some(1),
            annotations: vec![Annotation {
                raw: "u-ca=iso8601".into(),
                ..Annotation::default()
            }],
            ..Duration::default()
        };
        assert_writeable_eq!(duration, "PT1H[u-ca=iso8601]");
    }

    #[test]
    fn open_ranges() {
        let duration = Value::Duration(Duration {
            days: Some(2),
            ..Duration::default()
        });
        assert_writeable_eq!(
            Range {
                start: None,
                end: Some(duration.clone()),
            },
            "/P2D"
        );
        assert_writeable_eq!(
            Range {
                start: Some(duration),
                end: None,
            },
            "P2D/"
        );
        assert_writeable_eq!(Range::default(), "/");
    }
}
