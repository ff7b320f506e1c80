//! Timestamps with precision and offset.
//!
//! Fields are held in local time. The offset is in minutes east of UTC;
//! `None` is the unknown offset (written `-00:00`). Timestamps with less
//! than minute precision never carry an offset.

use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::decimal::Decimal;

/// How many fields of a timestamp are significant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Precision {
    /// `2001T`
    Year,
    /// `2001-02T`
    Month,
    /// `2001-02-03`
    Day,
    /// `2001-02-03T04:05Z`
    Minute,
    /// `2001-02-03T04:05:06Z`, optionally with fractional seconds.
    Second,
}

/// A point in time.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Timestamp {
    year: u16,
    month: u8,
    day: u8,
    hour: u8,
    minute: u8,
    second: u8,
    fraction: Option<Decimal>,
    offset: Option<i16>,
    precision: Precision,
}

/// Error returned when timestamp fields or text are invalid.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TimestampError(pub String);

impl fmt::Display for TimestampError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid timestamp: {}", self.0)
    }
}

impl std::error::Error for TimestampError {}

type TsResult<T> = std::result::Result<T, TimestampError>;

impl Timestamp {
    /// Year precision.
    ///
    /// # Errors
    ///
    /// Fails if the year is outside 1..=9999.
    pub fn with_year(year: u16) -> TsResult<Self> {
        Self::build(year, 1, 1, 0, 0, 0, None, None, Precision::Year)
    }

    /// Month precision.
    ///
    /// # Errors
    ///
    /// Fails if a field is out of range.
    pub fn with_month(year: u16, month: u8) -> TsResult<Self> {
        Self::build(year, month, 1, 0, 0, 0, None, None, Precision::Month)
    }

    /// Day precision.
    ///
    /// # Errors
    ///
    /// Fails if a field is out of range.
    pub fn with_day(year: u16, month: u8, day: u8) -> TsResult<Self> {
        Self::build(year, month, day, 0, 0, 0, None, None, Precision::Day)
    }

    /// Minute precision.
    ///
    /// # Errors
    ///
    /// Fails if a field is out of range.
    pub fn with_minute(
        year: u16,
        month: u8,
        day: u8,
        hour: u8,
        minute: u8,
        offset: Option<i16>,
    ) -> TsResult<Self> {
        Self::build(year, month, day, hour, minute, 0, None, offset, Precision::Minute)
    }

    /// Second precision with optional fractional seconds in `[0, 1)`.
    ///
    /// A zero fraction with a non-negative exponent carries no precision and
    /// is dropped.
    ///
    /// # Errors
    ///
    /// Fails if a field is out of range or the fraction is not in `[0, 1)`.
    #[allow(clippy::too_many_arguments)]
    pub fn with_second(
        year: u16,
        month: u8,
        day: u8,
        hour: u8,
        minute: u8,
        second: u8,
        fraction: Option<Decimal>,
        offset: Option<i16>,
    ) -> TsResult<Self> {
        let fraction = fraction.filter(|f| !(f.is_zero() && f.exponent() >= 0));
        Self::build(year, month, day, hour, minute, second, fraction, offset, Precision::Second)
    }

    #[allow(clippy::too_many_arguments)]
    fn build(
        year: u16,
        month: u8,
        day: u8,
        hour: u8,
        minute: u8,
        second: u8,
        fraction: Option<Decimal>,
        offset: Option<i16>,
        precision: Precision,
    ) -> TsResult<Self> {
        if !(1..=9999).contains(&year) {
            return Err(TimestampError(format!("year {year} out of range")));
        }
        if !(1..=12).contains(&month) {
            return Err(TimestampError(format!("month {month} out of range")));
        }
        if day < 1 || day > days_in_month(year, month) {
            return Err(TimestampError(format!("day {day} out of range")));
        }
        if hour > 23 || minute > 59 || second > 59 {
            return Err(TimestampError(format!(
                "time {hour:02}:{minute:02}:{second:02} out of range"
            )));
        }
        if let Some(off) = offset {
            if off.abs() >= 24 * 60 {
                return Err(TimestampError(format!("offset {off} out of range")));
            }
        }
        if let Some(frac) = &fraction {
            if frac.is_sign_negative() {
                return Err(TimestampError("negative fractional seconds".into()));
            }
            let digits = i64::try_from(frac.coefficient().to_string().len()).unwrap_or(i64::MAX);
            if !frac.is_zero() && digits > -frac.exponent() {
                return Err(TimestampError("fractional seconds must be below 1".into()));
            }
        }
        let offset = if precision >= Precision::Minute { offset } else { None };
        Ok(Self {
            year,
            month,
            day,
            hour,
            minute,
            second,
            fraction,
            offset,
            precision,
        })
    }

    /// Returns the year.
    #[must_use]
    pub const fn year(&self) -> u16 {
        self.year
    }

    /// Returns the month (1 when below month precision).
    #[must_use]
    pub const fn month(&self) -> u8 {
        self.month
    }

    /// Returns the day (1 when below day precision).
    #[must_use]
    pub const fn day(&self) -> u8 {
        self.day
    }

    /// Returns the hour.
    #[must_use]
    pub const fn hour(&self) -> u8 {
        self.hour
    }

    /// Returns the minute.
    #[must_use]
    pub const fn minute(&self) -> u8 {
        self.minute
    }

    /// Returns the whole seconds.
    #[must_use]
    pub const fn second(&self) -> u8 {
        self.second
    }

    /// Returns the fractional seconds, if any.
    #[must_use]
    pub const fn fraction(&self) -> Option<&Decimal> {
        self.fraction.as_ref()
    }

    /// Returns the offset in minutes; `None` is the unknown offset.
    #[must_use]
    pub const fn offset(&self) -> Option<i16> {
        self.offset
    }

    /// Returns the precision.
    #[must_use]
    pub const fn precision(&self) -> Precision {
        self.precision
    }

    /// Returns `(year, month, day, hour, minute)` shifted to UTC.
    ///
    /// Timestamps below minute precision or with an unknown offset are
    /// returned unchanged.
    #[must_use]
    pub fn utc_fields(&self) -> (u16, u8, u8, u8, u8) {
        let off = match self.offset {
            Some(off) if self.precision >= Precision::Minute => off,
            _ => return (self.year, self.month, self.day, self.hour, self.minute),
        };
        shift_minutes(
            self.year,
            self.month,
            self.day,
            self.hour,
            self.minute,
            -i64::from(off),
        )
    }

    /// Rebuilds a timestamp from UTC fields and the offset to apply.
    ///
    /// The UTC year may fall one outside the local range (0 or 10000) when
    /// the offset carries the local time back across it.
    ///
    /// # Errors
    ///
    /// Fails if the UTC fields are not a valid instant or the resulting
    /// local fields are out of range.
    #[allow(clippy::too_many_arguments)]
    pub fn from_utc_fields(
        precision: Precision,
        utc: (u16, u8, u8, u8, u8),
        second: u8,
        fraction: Option<Decimal>,
        offset: Option<i16>,
    ) -> TsResult<Self> {
        let (y, mo, d, h, mi) = utc;
        match precision {
            Precision::Year => Self::with_year(y),
            Precision::Month => Self::with_month(y, mo),
            Precision::Day => Self::with_day(y, mo, d),
            Precision::Minute | Precision::Second => {
                if y > 10000
                    || !(1..=12).contains(&mo)
                    || d == 0
                    || d > days_in_month(y, mo)
                    || h > 23
                    || mi > 59
                {
                    return Err(TimestampError(format!(
                        "UTC time {y:04}-{mo:02}-{d:02}T{h:02}:{mi:02} out of range"
                    )));
                }
                let (y, mo, d, h, mi) = match offset {
                    Some(off) => shift_minutes(y, mo, d, h, mi, i64::from(off)),
                    None => (y, mo, d, h, mi),
                };
                if precision == Precision::Minute {
                    Self::with_minute(y, mo, d, h, mi, offset)
                } else {
                    Self::with_second(y, mo, d, h, mi, second, fraction, offset)
                }
            }
        }
    }
}

fn is_leap(year: u16) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

fn days_in_month(year: u16, month: u8) -> u8 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap(year) => 29,
        2 => 28,
        _ => 0,
    }
}

fn days_from_civil(year: i64, month: i64, day: i64) -> i64 {
    let y = if month <= 2 { year - 1 } else { year };
    let era = y.div_euclid(400);
    let yoe = y - era * 400;
    let mp = (month + 9) % 12;
    let doy = (153 * mp + 2) / 5 + day - 1;
    let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy;
    era * 146_097 + doe - 719_468
}

fn civil_from_days(days: i64) -> (i64, i64, i64) {
    let z = days + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z - era * 146_097;
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = doy - (153 * mp + 2) / 5 + 1;
    let month = if mp < 10 { mp + 3 } else { mp - 9 };
    let year = yoe + era * 400 + i64::from(month <= 2);
    (year, month, day)
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn shift_minutes(year: u16, month: u8, day: u8, hour: u8, minute: u8, delta: i64) -> (u16, u8, u8, u8, u8) {
    let days = days_from_civil(i64::from(year), i64::from(month), i64::from(day));
    let total = days * 1440 + i64::from(hour) * 60 + i64::from(minute) + delta;
    let (y, m, d) = civil_from_days(total.div_euclid(1440));
    let rem = total.rem_euclid(1440);
    (y as u16, m as u8, d as u8, (rem / 60) as u8, (rem % 60) as u8)
}

fn write_offset(f: &mut fmt::Formatter<'_>, offset: Option<i16>) -> fmt::Result {
    match offset {
        None => f.write_str("-00:00"),
        Some(0) => f.write_str("Z"),
        Some(off) => {
            let sign = if off < 0 { '-' } else { '+' };
            let abs = off.unsigned_abs();
            write!(f, "{sign}{:02}:{:02}", abs / 60, abs % 60)
        }
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}", self.year)?;
        if self.precision == Precision::Year {
            return f.write_str("T");
        }
        write!(f, "-{:02}", self.month)?;
        if self.precision == Precision::Month {
            return f.write_str("T");
        }
        write!(f, "-{:02}", self.day)?;
        if self.precision == Precision::Day {
            return Ok(());
        }
        write!(f, "T{:02}:{:02}", self.hour, self.minute)?;
        if self.precision == Precision::Second {
            write!(f, ":{:02}", self.second)?;
            if let Some(frac) = &self.fraction {
                // fraction digits are the coefficient left-padded to -exponent places
                let width = usize::try_from(-frac.exponent()).unwrap_or(0);
                if width > 0 {
                    write!(f, ".{:0>width$}", frac.coefficient().to_string())?;
                }
            }
        }
        write_offset(f, self.offset)
    }
}

struct TsParser<'a> {
    text: &'a str,
    pos: usize,
}

impl TsParser<'_> {
    fn error(&self, what: &str) -> TimestampError {
        TimestampError(format!("{what} in {:?} at {}", self.text, self.pos))
    }

    fn digits(&mut self, count: usize) -> TsResult<u16> {
        let end = self.pos + count;
        let slice = self
            .text
            .get(self.pos..end)
            .filter(|s| s.bytes().all(|b| b.is_ascii_digit()))
            .ok_or_else(|| self.error("expected digits"))?;
        self.pos = end;
        slice.parse().map_err(|_| self.error("expected digits"))
    }

    fn two(&mut self) -> TsResult<u8> {
        // two ASCII digits never exceed u8
        self.digits(2).map(|n| n as u8)
    }

    fn eat(&mut self, c: u8) -> bool {
        if self.text.as_bytes().get(self.pos) == Some(&c) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn at_end(&self) -> bool {
        self.pos == self.text.len()
    }

    fn offset(&mut self) -> TsResult<Option<i16>> {
        if self.eat(b'Z') || self.eat(b'z') {
            return Ok(Some(0));
        }
        let negative = if self.eat(b'+') {
            false
        } else if self.eat(b'-') {
            true
        } else {
            return Err(self.error("expected offset"));
        };
        let hours = i16::from(self.two()?);
        if !self.eat(b':') {
            return Err(self.error("expected ':' in offset"));
        }
        let minutes = i16::from(self.two()?);
        let total = hours * 60 + minutes;
        Ok(match (negative, total) {
            (true, 0) => None,
            (true, t) => Some(-t),
            (false, t) => Some(t),
        })
    }
}

impl FromStr for Timestamp {
    type Err = TimestampError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut p = TsParser { text: s, pos: 0 };
        let year = p.digits(4)?;
        if p.eat(b'T') && p.at_end() {
            return Self::with_year(year);
        }
        if !p.eat(b'-') {
            return Err(p.error("expected '-' after year"));
        }
        let month = p.two()?;
        if p.eat(b'T') && p.at_end() {
            return Self::with_month(year, month);
        }
        if !p.eat(b'-') {
            return Err(p.error("expected '-' after month"));
        }
        let day = p.two()?;
        if p.at_end() {
            return Self::with_day(year, month, day);
        }
        if !p.eat(b'T') {
            return Err(p.error("expected 'T' after day"));
        }
        if p.at_end() {
            return Self::with_day(year, month, day);
        }
        let hour = p.two()?;
        if !p.eat(b':') {
            return Err(p.error("expected ':' after hour"));
        }
        let minute = p.two()?;
        if !p.eat(b':') {
            let offset = p.offset()?;
            if !p.at_end() {
                return Err(p.error("trailing characters"));
            }
            return Self::with_minute(year, month, day, hour, minute, offset);
        }
        let second = p.two()?;
        let mut fraction = None;
        if p.eat(b'.') {
            let start = p.pos;
            while p.text.as_bytes().get(p.pos).is_some_and(u8::is_ascii_digit) {
                p.pos += 1;
            }
            if p.pos == start {
                return Err(p.error("expected fraction digits"));
            }
            let text = format!("0.{}", &s[start..p.pos]);
            fraction = Some(text.parse::<Decimal>().map_err(|e| TimestampError(e.to_string()))?);
        }
        let offset = p.offset()?;
        if !p.at_end() {
            return Err(p.error("trailing characters"));
        }
        Self::with_second(year, month, day, hour, minute, second, fraction, offset)
    }
}
