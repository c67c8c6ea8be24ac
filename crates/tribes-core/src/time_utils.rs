use std::fmt;

use chrono::{DateTime, Datelike, Month, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tracing::debug;

// ── YearMonth ─────────────────────────────────────────────────────────────────

/// A calendar month identifier with the day-of-month discarded.
///
/// Ordering is chronological: `(year, month)` compared lexicographically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct YearMonth {
    year: i32,
    month: u32,
}

impl YearMonth {
    /// Build a year-month, returning `None` when `month` is outside `1..=12`.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (1..=12).contains(&month).then_some(Self { year, month })
    }

    /// Truncate a calendar date to its month.
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// The month `n` months after this one, rolling over year boundaries.
    pub fn plus_months(self, n: u32) -> Self {
        let index = i64::from(self.year) * 12 + i64::from(self.month - 1) + i64::from(n);
        Self {
            year: index.div_euclid(12) as i32,
            month: index.rem_euclid(12) as u32 + 1,
        }
    }

    /// Full English month name followed by the 4-digit year, e.g. `"March 2024"`.
    pub fn label(&self) -> String {
        let name = u8::try_from(self.month)
            .ok()
            .and_then(|m| Month::try_from(m).ok())
            .map(|m| m.name())
            .unwrap_or("Unknown");
        format!("{} {:04}", name, self.year)
    }
}

/// Renders as the sortable `YYYY-MM` key.
impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

// ── Date parsing ──────────────────────────────────────────────────────────────

/// Date-only layouts accepted in invariant culture.
const DATE_FMTS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

/// Date-and-time layouts accepted in invariant culture. The time is dropped.
const DATETIME_FMTS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%m/%d/%Y %I:%M:%S %p",
    "%m/%d/%Y %I:%M %p",
];

/// Parse a locale-invariant date string into a calendar date.
///
/// Accepts ISO dates, ISO date-times (with or without an RFC 3339 offset)
/// and US-style `M/D/YYYY` dates with an optional 24h or AM/PM time.
/// An offset, if present, is ignored: the date as written is kept.
/// Returns `None` for empty strings or unrecognised formats.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    for fmt in DATE_FMTS {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return Some(date);
        }
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_local().date());
    }

    for fmt in DATETIME_FMTS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(naive.date());
        }
    }

    debug!("parse_date: no format matched \"{}\"", s);
    None
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn ym(year: i32, month: u32) -> YearMonth {
        YearMonth::new(year, month).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    // ── YearMonth ─────────────────────────────────────────────────────────────

    #[test]
    fn test_new_rejects_out_of_range_month() {
        assert!(YearMonth::new(2024, 0).is_none());
        assert!(YearMonth::new(2024, 13).is_none());
        assert!(YearMonth::new(2024, 12).is_some());
    }

    #[test]
    fn test_from_date_discards_day() {
        assert_eq!(YearMonth::from_date(date(2024, 3, 31)), ym(2024, 3));
        assert_eq!(YearMonth::from_date(date(2024, 3, 1)), ym(2024, 3));
    }

    #[test]
    fn test_plus_months_within_year() {
        assert_eq!(ym(2024, 1).plus_months(0), ym(2024, 1));
        assert_eq!(ym(2024, 1).plus_months(11), ym(2024, 12));
    }

    #[test]
    fn test_plus_months_rolls_over_year() {
        assert_eq!(ym(2024, 1).plus_months(12), ym(2025, 1));
        assert_eq!(ym(2024, 11).plus_months(3), ym(2025, 2));
        assert_eq!(ym(2023, 12).plus_months(25), ym(2026, 1));
    }

    #[test]
    fn test_ordering_is_chronological() {
        let mut months = vec![ym(2025, 1), ym(2024, 12), ym(2024, 2), ym(2024, 10)];
        months.sort();
        assert_eq!(months, vec![ym(2024, 2), ym(2024, 10), ym(2024, 12), ym(2025, 1)]);
    }

    #[test]
    fn test_display_is_sortable_key() {
        assert_eq!(ym(2024, 3).to_string(), "2024-03");
        assert_eq!(ym(987, 11).to_string(), "0987-11");
    }

    #[test]
    fn test_label_uses_english_month_name() {
        assert_eq!(ym(2024, 3).label(), "March 2024");
        assert_eq!(ym(2025, 12).label(), "December 2025");
        assert_eq!(ym(2023, 1).label(), "January 2023");
    }

    // ── parse_date ────────────────────────────────────────────────────────────

    #[test]
    fn test_parse_iso_date() {
        assert_eq!(parse_date("2024-03-15"), Some(date(2024, 3, 15)));
        assert_eq!(parse_date("2024/03/15"), Some(date(2024, 3, 15)));
    }

    #[test]
    fn test_parse_iso_datetime() {
        assert_eq!(parse_date("2024-03-15T08:30:00"), Some(date(2024, 3, 15)));
        assert_eq!(parse_date("2024-03-15 23:59:59"), Some(date(2024, 3, 15)));
        assert_eq!(
            parse_date("2024-03-15T08:30:00.123"),
            Some(date(2024, 3, 15))
        );
    }

    #[test]
    fn test_parse_rfc3339_keeps_written_date() {
        assert_eq!(
            parse_date("2024-03-31T23:30:00-05:00"),
            Some(date(2024, 3, 31))
        );
        assert_eq!(parse_date("2024-03-01T00:15:00Z"), Some(date(2024, 3, 1)));
    }

    #[test]
    fn test_parse_us_invariant_forms() {
        assert_eq!(parse_date("03/15/2024"), Some(date(2024, 3, 15)));
        assert_eq!(parse_date("3/5/2024"), Some(date(2024, 3, 5)));
        assert_eq!(parse_date("3/5/2024 14:05:00"), Some(date(2024, 3, 5)));
        assert_eq!(parse_date("3/5/2024 2:05:00 PM"), Some(date(2024, 3, 5)));
    }

    #[test]
    fn test_parse_trims_whitespace() {
        assert_eq!(parse_date("  2024-03-15 "), Some(date(2024, 3, 15)));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("   "), None);
        assert_eq!(parse_date("yesterday"), None);
        assert_eq!(parse_date("2024-13-01"), None);
    }
}
