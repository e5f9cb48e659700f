//! Day counting over inclusive date ranges.

use chrono::{Datelike, NaiveDate, Weekday};

use super::overrides::{DayOverrides, EMPTY_STATUS};

/// Keeps at most the first ten characters of a date or datetime string.
fn date_prefix(s: &str) -> &str {
    s.char_indices().nth(10).map_or(s, |(idx, _)| &s[..idx])
}

/// Parses the `YYYY-MM-DD` prefix of a date or datetime string.
#[must_use]
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(date_prefix(s), "%Y-%m-%d").ok()
}

/// Returns true for a bare `YYYY-MM-DD` calendar date.
#[must_use]
pub fn is_iso_date(s: &str) -> bool {
    s.len() == 10 && NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok()
}

/// Counts working days in the inclusive range `start..=end`.
///
/// The count is `floor(total - total / 7)` where `total` is the number of
/// calendar days. Missing or unparseable bounds give 0.
///
/// # Example
///
/// ```
/// use shootlogix_core::schedule::working_days;
///
/// assert_eq!(working_days(Some("2026-03-20"), Some("2026-04-25")), 31);
/// assert_eq!(working_days(None, Some("2026-04-25")), 0);
/// ```
#[must_use]
pub fn working_days(start: Option<&str>, end: Option<&str>) -> i64 {
    let (Some(start), Some(end)) = (start.and_then(parse_date), end.and_then(parse_date)) else {
        return 0;
    };
    let total = (end - start).num_days() + 1;
    // floor(total - total/7) == floor(6 * total / 7)
    (6 * total).div_euclid(7)
}

/// Counts working days, corrected by per-day overrides.
///
/// Only weekdays (Monday to Friday) are affected. Keys that are not dates
/// are ignored and the result never drops below zero.
#[must_use]
pub fn active_working_days(
    start: Option<&str>,
    end: Option<&str>,
    overrides: &DayOverrides,
) -> i64 {
    let base = working_days(start, end);
    if overrides.is_empty() {
        return base;
    }

    let lo = start.map(date_prefix).filter(|s| !s.is_empty());
    let hi = end.map(date_prefix).filter(|s| !s.is_empty());

    let delta: i64 = overrides
        .iter()
        .filter_map(|(key, status)| {
            let day = NaiveDate::parse_from_str(key, "%Y-%m-%d").ok()?;
            let is_weekday = !matches!(day.weekday(), Weekday::Sat | Weekday::Sun);
            if !is_weekday {
                return None;
            }
            let in_range = matches!((lo, hi), (Some(lo), Some(hi)) if lo <= key && key <= hi);
            match (status == EMPTY_STATUS, in_range) {
                (true, true) => Some(-1),
                (false, false) => Some(1),
                _ => None,
            }
        })
        .sum();

    (base + delta).max(0)
}
