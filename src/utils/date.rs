// Date-only window primitives shared by the overlap calculator and the insight engine.
// Every comparison in the crate goes through DateWindow so both sides agree on
// end-of-day inclusion.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Parse an ISO date or timestamp string down to a calendar date.
///
/// Accepts `2026-03-01`, RFC 3339 (`2026-03-01T09:00:00+09:00`, `...Z`) and naive
/// `2026-03-01T09:00[:00]`. The time part is discarded; for RFC 3339 input the date
/// is taken in the offset the string was written in.
pub fn parse_iso_date(expr: &str) -> Option<NaiveDate> {
    let expr = expr.trim();
    if expr.is_empty() {
        return None;
    }

    if let Ok(date) = NaiveDate::parse_from_str(expr, "%Y-%m-%d") {
        return Some(date);
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(expr) {
        return Some(dt.date_naive());
    }

    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(expr, fmt) {
            return Some(dt.date());
        }
    }

    None
}

/// Inclusive range of whole days.
///
/// `end` covers the entire final day, so a window ending on the 5th contains the 5th
/// up to 23:59:59.999. Working on `NaiveDate` makes that the plain `<=` comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn single_day(day: NaiveDate) -> Self {
        Self { start: day, end: day }
    }

    pub fn contains(&self, day: NaiveDate) -> bool {
        self.start <= day && day <= self.end
    }

    /// Inclusive overlap test; windows that only touch on one day overlap.
    pub fn overlaps(&self, other: &DateWindow) -> bool {
        self.start <= other.end && self.end >= other.start
    }

    pub fn span_days(&self) -> i64 {
        (self.end - self.start).num_days()
    }

    pub fn is_reversed(&self) -> bool {
        self.start > self.end
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid month '{0}'. Expected YYYY-MM (e.g. 2026-03).")]
pub struct MonthParseError(pub String);

/// A displayed calendar month
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(|_| Self { year, month })
    }

    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn current() -> Self {
        Self::of(chrono::Local::now().date_naive())
    }

    pub fn first_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
            .unwrap_or(NaiveDate::MIN)
    }

    pub fn last_day(&self) -> NaiveDate {
        self.next().first_day().pred_opt().unwrap_or(NaiveDate::MAX)
    }

    pub fn next(&self) -> Self {
        if self.month == 12 {
            Self { year: self.year + 1, month: 1 }
        } else {
            Self { year: self.year, month: self.month + 1 }
        }
    }

    pub fn prev(&self) -> Self {
        if self.month == 1 {
            Self { year: self.year - 1, month: 12 }
        } else {
            Self { year: self.year, month: self.month - 1 }
        }
    }

    /// Every date of the month, in order
    pub fn days(&self) -> Vec<NaiveDate> {
        self.first_day()
            .iter_days()
            .take_while(|d| d.month() == self.month && d.year() == self.year)
            .collect()
    }

    pub fn window(&self) -> DateWindow {
        DateWindow::new(self.first_day(), self.last_day())
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for YearMonth {
    type Err = MonthParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let (year, month) = trimmed
            .split_once('-')
            .ok_or_else(|| MonthParseError(s.to_string()))?;
        let year: i32 = year.parse().map_err(|_| MonthParseError(s.to_string()))?;
        let month: u32 = month.parse().map_err(|_| MonthParseError(s.to_string()))?;
        YearMonth::new(year, month).ok_or_else(|| MonthParseError(s.to_string()))
    }
}

/// Serialize a date as `YYYY-MM-DD`
pub fn serialize_iso_date<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&date.format("%Y-%m-%d").to_string())
}

pub fn serialize_opt_iso_date<S: Serializer>(
    date: &Option<NaiveDate>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match date {
        Some(d) => serialize_iso_date(d, serializer),
        None => serializer.serialize_none(),
    }
}

/// Deserialize an ISO date or timestamp string into a date
pub fn deserialize_iso_date<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
    let raw = String::deserialize(deserializer)?;
    parse_iso_date(&raw)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid ISO date: {}", raw)))
}

pub fn deserialize_opt_iso_date<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<NaiveDate>, D::Error> {
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw {
        None => Ok(None),
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => parse_iso_date(&s)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid ISO date: {}", s))),
    }
}
