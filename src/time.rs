//! RFC 3339 date and time records used by the TOML value model.
//!
//! The lexer uses [`scan`] to find the extent of a date/time lexeme without
//! judging its field values; the parser then runs [`Moment::parse`] over the
//! lexeme to validate ranges and classify it as a full date-time, a date, or
//! a bare time.

use std::fmt;

#[cfg(test)]
#[path = "./time_tests.rs"]
mod tests;

/// A calendar date: `YYYY-MM-DD`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Date {
    /// Four-digit year, `0..=9999`.
    pub year: u16,
    /// Month of year, `1..=12`.
    pub month: u8,
    /// Day of month, `1..=days_in_month(month)`.
    pub day: u8,
}

/// A time of day: `HH:MM:SS` with optional fractional seconds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Time {
    /// Hour, `0..=23`.
    pub hour: u8,
    /// Minute, `0..=59`.
    pub minute: u8,
    /// Second, `0..=60` (leap second tolerated).
    pub second: u8,
    /// Sub-second precision in nanoseconds, `0..=999_999_999`.
    pub nanosecond: u32,
}

/// A date-time: date, time, and an optional UTC offset in signed minutes.
///
/// `offset: None` is a *local* date-time with no defined absolute instant;
/// `Some(0)` is UTC and renders as `Z`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Datetime {
    /// The calendar date.
    pub date: Date,
    /// The time of day.
    pub time: Time,
    /// UTC offset in minutes, strictly between -1440 and 1440.
    pub offset: Option<i16>,
}

impl Date {
    /// Creates a date. Field ranges are not checked here; the parser
    /// validates them before constructing values.
    pub fn new(year: u16, month: u8, day: u8) -> Self {
        Self { year, month, day }
    }
}

impl Time {
    /// Creates a time. Field ranges are not checked here; the parser
    /// validates them before constructing values.
    pub fn new(hour: u8, minute: u8, second: u8, nanosecond: u32) -> Self {
        Self {
            hour,
            minute,
            second,
            nanosecond,
        }
    }
}

impl Datetime {
    /// Creates a date-time from its parts.
    pub fn new(date: Date, time: Time, offset: Option<i16>) -> Self {
        Self { date, time, offset }
    }
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

impl fmt::Display for Time {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}:{:02}", self.hour, self.minute, self.second)?;
        if self.nanosecond > 0 {
            let digits = format!("{:09}", self.nanosecond);
            write!(f, ".{}", digits.trim_end_matches('0'))?;
        }
        Ok(())
    }
}

impl fmt::Display for Datetime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}T{}", self.date, self.time)?;
        match self.offset {
            None => Ok(()),
            Some(0) => f.write_str("Z"),
            Some(minutes) => {
                let (sign, abs) = if minutes < 0 {
                    ('-', -(minutes as i32) as u16)
                } else {
                    ('+', minutes as u16)
                };
                write!(f, "{}{:02}:{:02}", sign, abs / 60, abs % 60)
            }
        }
    }
}

/// Maximum day number per month. February admits 29 in every year.
pub(crate) fn days_in_month(month: u8) -> u8 {
    const DAYS: [u8; 13] = [0, 31, 29, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];
    DAYS[month as usize]
}

/// Returns `true` if `bytes` opens with the `YYYY-MM-DD` digit pattern.
pub(crate) fn looks_like_date(bytes: &[u8]) -> bool {
    bytes.len() >= 10
        && bytes[..4].iter().all(u8::is_ascii_digit)
        && bytes[4] == b'-'
        && bytes[5..7].iter().all(u8::is_ascii_digit)
        && bytes[7] == b'-'
        && bytes[8..10].iter().all(u8::is_ascii_digit)
}

/// Returns `true` if `bytes` opens with the `HH:MM:SS` digit pattern.
pub(crate) fn looks_like_time(bytes: &[u8]) -> bool {
    bytes.len() >= 8
        && bytes[..2].iter().all(u8::is_ascii_digit)
        && bytes[2] == b':'
        && bytes[3..5].iter().all(u8::is_ascii_digit)
        && bytes[5] == b':'
        && bytes[6..8].iter().all(u8::is_ascii_digit)
}

/// Length of the fractional-seconds part (`.digits`) at the front of
/// `bytes`, or 0 when absent.
fn scan_fraction(bytes: &[u8]) -> usize {
    if bytes.len() >= 2 && bytes[0] == b'.' && bytes[1].is_ascii_digit() {
        let mut i = 2;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        i
    } else {
        0
    }
}

/// Length of an `HH:MM:SS[.frac]` run at the front of `bytes`.
/// Callers must have established [`looks_like_time`].
fn scan_time(bytes: &[u8]) -> usize {
    8 + scan_fraction(&bytes[8..])
}

/// Length of a `±HH:MM` or `Z`/`z` offset at the front of `bytes`, or 0.
fn scan_offset(bytes: &[u8]) -> usize {
    match bytes.first() {
        Some(b'Z' | b'z') => 1,
        Some(b'+' | b'-')
            if bytes.len() >= 6
                && bytes[1].is_ascii_digit()
                && bytes[2].is_ascii_digit()
                && bytes[3] == b':'
                && bytes[4].is_ascii_digit()
                && bytes[5].is_ascii_digit() =>
        {
            6
        }
        _ => 0,
    }
}

/// Structural scan of a date/time lexeme: returns how many bytes belong to
/// it. Field ranges are not checked here. Callers must have established
/// [`looks_like_date`] or [`looks_like_time`] first.
///
/// A bare time never takes an offset; a date only takes a time part when a
/// `T`/`t`/space separator is followed by a full `HH:MM:SS`.
pub(crate) fn scan(bytes: &[u8]) -> usize {
    if !looks_like_date(bytes) {
        return scan_time(bytes);
    }
    let rest = &bytes[10..];
    let has_time = matches!(rest.first(), Some(b'T' | b't' | b' ')) && looks_like_time(&rest[1..]);
    if !has_time {
        return 10;
    }
    let mut i = 11 + scan_time(&bytes[11..]);
    i += scan_offset(&bytes[i..]);
    i
}

/// A classified date/time value: the parser turns a `Datetime` token into
/// one of these three shapes.
#[derive(Clone, Copy, Debug)]
pub(crate) enum Moment {
    Datetime(Datetime),
    Date(Date),
    Time(Time),
}

fn two_digits(bytes: &[u8]) -> u8 {
    (bytes[0] - b'0') * 10 + (bytes[1] - b'0')
}

fn parse_date(bytes: &[u8]) -> Result<Date, &'static str> {
    let year = bytes[..4]
        .iter()
        .fold(0u16, |acc, b| acc * 10 + (b - b'0') as u16);
    let month = two_digits(&bytes[5..]);
    let day = two_digits(&bytes[8..]);
    if !(1..=12).contains(&month) {
        return Err("month must be between 1 and 12");
    }
    if day < 1 || day > days_in_month(month) {
        return Err("day is out of range for the month");
    }
    Ok(Date { year, month, day })
}

/// Decodes `HH:MM:SS[.frac]`, returning the time and the number of bytes
/// consumed. Fractional digits beyond nine are truncated.
fn parse_time(bytes: &[u8]) -> Result<(Time, usize), &'static str> {
    let hour = two_digits(bytes);
    let minute = two_digits(&bytes[3..]);
    let second = two_digits(&bytes[6..]);
    if hour > 23 {
        return Err("hour must be between 0 and 23");
    }
    if minute > 59 {
        return Err("minute must be between 0 and 59");
    }
    if second > 60 {
        return Err("second must be between 0 and 60");
    }
    let frac = scan_fraction(&bytes[8..]);
    let mut nanosecond = 0u32;
    if frac > 0 {
        let digits = &bytes[9..8 + frac];
        for (i, b) in digits.iter().enumerate() {
            if i >= 9 {
                break;
            }
            nanosecond = nanosecond * 10 + (b - b'0') as u32;
        }
        // Scale up when fewer than nine digits were given.
        for _ in digits.len()..9 {
            nanosecond *= 10;
        }
    }
    Ok((
        Time {
            hour,
            minute,
            second,
            nanosecond,
        },
        8 + frac,
    ))
}

fn parse_offset(bytes: &[u8]) -> Result<Option<i16>, &'static str> {
    match bytes.first() {
        None => Ok(None),
        Some(b'Z' | b'z') => Ok(Some(0)),
        Some(sign @ (b'+' | b'-')) => {
            if bytes.len() != 6
                || !bytes[1].is_ascii_digit()
                || !bytes[2].is_ascii_digit()
                || bytes[3] != b':'
                || !bytes[4].is_ascii_digit()
                || !bytes[5].is_ascii_digit()
            {
                return Err("malformed offset");
            }
            let hours = two_digits(&bytes[1..]);
            let minutes = two_digits(&bytes[4..]);
            if hours > 23 || minutes > 59 {
                return Err("offset is out of range");
            }
            let total = hours as i16 * 60 + minutes as i16;
            Ok(Some(if *sign == b'-' { -total } else { total }))
        }
        Some(_) => Err("malformed offset"),
    }
}

impl Moment {
    /// Decodes and validates a lexeme previously delimited by [`scan`].
    /// Classification: date with no time part ⇒ `Date`; bare `HH:MM:SS` ⇒
    /// `Time`; everything else ⇒ `Datetime`.
    pub(crate) fn parse(s: &str) -> Result<Moment, &'static str> {
        let bytes = s.as_bytes();
        if !looks_like_date(bytes) {
            if !looks_like_time(bytes) {
                return Err("malformed time");
            }
            let (time, used) = parse_time(bytes)?;
            if used != bytes.len() {
                return Err("malformed time");
            }
            return Ok(Moment::Time(time));
        }
        let date = parse_date(bytes)?;
        if bytes.len() == 10 {
            return Ok(Moment::Date(date));
        }
        if !matches!(bytes[10], b'T' | b't' | b' ') || !looks_like_time(&bytes[11..]) {
            return Err("malformed date-time");
        }
        let (time, used) = parse_time(&bytes[11..])?;
        let offset = parse_offset(&bytes[11 + used..])?;
        Ok(Moment::Datetime(Datetime { date, time, offset }))
    }
}
