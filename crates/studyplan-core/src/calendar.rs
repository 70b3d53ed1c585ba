//! Calendar-day arithmetic helpers.
//!
//! Everything here operates on `chrono::NaiveDate` local calendar days.
//! Day counts come from date comparison, never from elapsed-millisecond
//! division, so timezone and DST shifts cannot move a day boundary.
//!
//! Weekday indices follow the 0=Sunday .. 6=Saturday convention used by
//! material exclusion sets.

use chrono::{Datelike, Duration, NaiveDate};
use std::collections::BTreeSet;

/// Format a date as the ISO `YYYY-MM-DD` key used throughout the crate.
pub fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Parse a `YYYY-MM-DD` key back into a date.
pub fn parse_date_key(key: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(key, "%Y-%m-%d").ok()
}

/// Weekday index with Sunday = 0 .. Saturday = 6.
pub fn weekday_index(date: NaiveDate) -> u8 {
    date.weekday().num_days_from_sunday() as u8
}

/// Whether the date's weekday is in the excluded set.
pub fn is_excluded(date: NaiveDate, excluded: &BTreeSet<u8>) -> bool {
    excluded.contains(&weekday_index(date))
}

/// First eligible day at or after `date`, or `None` when every weekday is
/// excluded.
pub fn next_eligible(date: NaiveDate, excluded: &BTreeSet<u8>) -> Option<NaiveDate> {
    if (0u8..7).all(|w| excluded.contains(&w)) {
        return None;
    }
    let mut day = date;
    while is_excluded(day, excluded) {
        day = day.succ_opt()?;
    }
    Some(day)
}

/// Eligible days in the inclusive window `[start, end]`, in order.
pub fn eligible_days(start: NaiveDate, end: NaiveDate, excluded: &BTreeSet<u8>) -> Vec<NaiveDate> {
    let mut days = Vec::new();
    let mut day = start;
    while day <= end {
        if !is_excluded(day, excluded) {
            days.push(day);
        }
        day = match day.succ_opt() {
            Some(next) => next,
            None => break,
        };
    }
    days
}

/// Sunday..Saturday bounds of the week containing `date`.
pub fn week_bounds(date: NaiveDate) -> (NaiveDate, NaiveDate) {
    let back = date.weekday().num_days_from_sunday() as i64;
    let start = date - Duration::days(back);
    (start, start + Duration::days(6))
}
