//! Calendar-day utilities
//!
//! Everything in the engine works on whole calendar days. This module holds
//! the small set of pure helpers the other crates share:
//!
//! - [`days_between`]: signed day difference
//! - [`day_range`]: inclusive day enumeration
//! - [`parse_date`]: lenient parsing of the date strings record dumps contain
//! - [`DateWindow`]: a closed `[start, end]` interval
//! - [`DateFormatter`]: the locale formatting seam used by renderers

use std::fmt::Write as _;

use chrono::{DateTime, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

/// Signed number of days from `from` to `to`.
pub fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    (to - from).num_days()
}

/// Every calendar day from `start` to `end`, both inclusive.
///
/// Yields nothing when `end < start`.
pub fn day_range(start: NaiveDate, end: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    start.iter_days().take_while(move |d| *d <= end)
}

/// Time-of-day layouts accepted after an ISO date; the time itself is dropped.
const TIME_FORMATS: [&str; 2] = ["%H:%M:%S", "%H:%M"];

/// Date-only layouts, tried in order.
const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%d.%m.%Y", "%d/%m/%Y"];

/// Parse a calendar date from a record field.
///
/// Accepts ISO dates, ISO date-times with or without a UTC offset (the
/// date as written is kept) and day-first `DD.MM.YYYY` / `DD/MM/YYYY`.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d);
        }
    }

    parse_date_time(s)
        .or_else(|| DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.date_naive()))
}

/// `YYYY-MM-DD` followed by `T` or a space and a time of day.
///
/// The calendar date is kept as written. Fractional seconds and a UTC
/// offset (`Z`, `+03:00`, `-0500`, `+03`) are tolerated and ignored.
fn parse_date_time(s: &str) -> Option<NaiveDate> {
    let date = s.get(..10)?;
    let time = s.get(10..)?.strip_prefix(['T', ' '])?;

    let time = time.trim_end_matches('Z');
    let time = time.split(['+', '-']).next().unwrap_or(time);
    let time = time.split('.').next().unwrap_or(time).trim_end();
    if !TIME_FORMATS
        .iter()
        .any(|fmt| NaiveTime::parse_from_str(time, fmt).is_ok())
    {
        return None;
    }

    NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()
}

/// Closed calendar interval `[start, end]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    /// Create a window, or `None` when `end < start`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Option<Self> {
        (start <= end).then_some(Self { start, end })
    }

    /// Number of calendar days covered, counting both ends.
    pub fn span_days(&self) -> i64 {
        days_between(self.start, self.end) + 1
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Closed-interval overlap with a stay `[check_in, check_out]`.
    ///
    /// Touching on a single boundary day counts as overlap.
    pub fn overlaps(&self, check_in: NaiveDate, check_out: NaiveDate) -> bool {
        check_in <= self.end && check_out >= self.start
    }

    /// Iterate the days of the window.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        day_range(self.start, self.end)
    }
}

impl std::fmt::Display for DateWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// Locale-aware day/month/year formatting.
///
/// Renderers never format dates themselves; they go through this trait so
/// the caller can inject whatever convention the tenant uses.
pub trait DateFormatter {
    fn format_date(&self, date: NaiveDate) -> String;
}

/// `strftime`-style formatter. Defaults to the Turkish `DD.MM.YYYY` layout.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PatternFormatter {
    pattern: String,
}

impl PatternFormatter {
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
        }
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }
}

impl Default for PatternFormatter {
    fn default() -> Self {
        Self::new("%d.%m.%Y")
    }
}

impl DateFormatter for PatternFormatter {
    fn format_date(&self, date: NaiveDate) -> String {
        let mut out = String::new();
        // An invalid pattern makes chrono's Display fail; fall back to ISO
        if write!(out, "{}", date.format(&self.pattern)).is_err() {
            return date.format("%Y-%m-%d").to_string();
        }
        out
    }
}

impl<F: DateFormatter + ?Sized> DateFormatter for &F {
    fn format_date(&self, date: NaiveDate) -> String {
        (**self).format_date(date)
    }
}
