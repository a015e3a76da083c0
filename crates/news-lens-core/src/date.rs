//! Best-effort date parsing.
//!
//! Source dates arrive in whatever shape the publisher used. Parsing walks a
//! fixed cascade of [`DateTier`]s and stops at the first success:
//!
//! 1. [`DateTier::DayFirst`]: the whole trimmed string, ambiguous numeric
//!    dates read as day/month.
//! 2. [`DateTier::MonthFirst`]: the whole string, read as month/day.
//! 3. [`DateTier::DateToken`]: only the part before the first space or `T`,
//!    read day-first with date-only formats.
//!
//! When every tier fails the date is absent. That is never an error.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, NaiveTime};

/// The tier of the cascade that produced a parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateTier {
    DayFirst,
    MonthFirst,
    DateToken,
}

impl DateTier {
    /// Tiers in the order they are tried.
    pub const CASCADE: [DateTier; 3] = [DateTier::DayFirst, DateTier::MonthFirst, DateTier::DateToken];
}

const DAY_FIRST_DATETIME: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
    "%d.%m.%Y %H:%M:%S",
    "%d.%m.%Y %H:%M",
    "%d-%m-%Y %H:%M:%S",
    "%d-%m-%Y %H:%M",
    "%d %B %Y %H:%M:%S",
    "%d %B %Y %H:%M",
    "%d %b %Y %H:%M:%S",
    "%d %b %Y %H:%M",
    "%d/%m/%y %H:%M",
    "%d.%m.%y %H:%M",
];

const DAY_FIRST_DATE: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%Y.%m.%d",
    "%d/%m/%Y",
    "%d.%m.%Y",
    "%d-%m-%Y",
    "%d %B %Y",
    "%d %b %Y",
    "%Y%m%d",
    "%d/%m/%y",
    "%d.%m.%y",
    "%d-%m-%y",
];

const MONTH_FIRST_DATETIME: &[&str] = &[
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%m-%d-%Y %H:%M:%S",
    "%m-%d-%Y %H:%M",
    "%B %d, %Y %H:%M",
    "%b %d, %Y %H:%M",
];

const MONTH_FIRST_DATE: &[&str] = &[
    "%m/%d/%Y",
    "%m-%d-%Y",
    "%m.%d.%Y",
    "%B %d, %Y",
    "%b %d, %Y",
    "%B %d %Y",
    "%b %d %Y",
    "%m/%d/%y",
    "%m-%d-%y",
];

/// `%Y` accepts one to four digits; anything before this year is a
/// two-digit year read literally and is left to the `%y` formats.
const MIN_YEAR: i32 = 1000;

/// Parse `raw` through the full cascade.
pub fn parse_date(raw: &str) -> Option<NaiveDateTime> {
    parse_date_tiered(raw).map(|(dt, _)| dt)
}

/// Parse `raw` and report which tier succeeded.
pub fn parse_date_tiered(raw: &str) -> Option<(NaiveDateTime, DateTier)> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    DateTier::CASCADE
        .iter()
        .find_map(|&tier| parse_with_tier(s, tier).map(|dt| (dt, tier)))
}

/// Attempt a single tier on an already-trimmed string.
pub fn parse_with_tier(s: &str, tier: DateTier) -> Option<NaiveDateTime> {
    match tier {
        DateTier::DayFirst => parse_zoned(s)
            .or_else(|| parse_formats(s, DAY_FIRST_DATETIME, DAY_FIRST_DATE)),
        DateTier::MonthFirst => parse_formats(s, MONTH_FIRST_DATETIME, MONTH_FIRST_DATE),
        DateTier::DateToken => {
            let token = s.split([' ', 'T']).next().unwrap_or("");
            if token.is_empty() {
                return None;
            }
            parse_formats(token, &[], DAY_FIRST_DATE)
        }
    }
}

/// RFC 3339 / RFC 2822 timestamps, converted to naive UTC.
fn parse_zoned(s: &str) -> Option<NaiveDateTime> {
    DateTime::parse_from_rfc3339(s)
        .or_else(|_| DateTime::parse_from_rfc2822(s))
        .ok()
        .map(|dt| dt.naive_utc())
}

fn parse_formats(s: &str, datetime_formats: &[&str], date_formats: &[&str]) -> Option<NaiveDateTime> {
    datetime_formats
        .iter()
        .filter_map(|f| NaiveDateTime::parse_from_str(s, f).ok())
        .find(|dt| dt.year() >= MIN_YEAR)
        .or_else(|| {
            date_formats
                .iter()
                .filter_map(|f| NaiveDate::parse_from_str(s, f).ok())
                .find(|d| d.year() >= MIN_YEAR)
                .map(|d| d.and_time(NaiveTime::MIN))
        })
}

/// Whole days from `date` to `now`, rounded toward negative infinity.
///
/// Future dates give a negative age.
pub fn age_days(date: NaiveDateTime, now: NaiveDateTime) -> i64 {
    (now - date).num_seconds().div_euclid(86_400)
}

/// Monthly period key, e.g. `2024-03`.
pub fn period_key(date: NaiveDateTime) -> String {
    date.format("%Y-%m").to_string()
}
