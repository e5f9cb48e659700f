//! Working-day counting for assignment date ranges.
//!
//! The base count approximates one rest day per seven calendar days. Day
//! overrides then correct individual weekdays: an `"empty"` weekday inside
//! the range is removed, any other status on a weekday outside the range is
//! added.

mod overrides;
mod working_days;

#[cfg(test)]
mod tests;

pub use overrides::{DayOverrides, EMPTY_STATUS, OverridesError};
pub use working_days::{active_working_days, is_iso_date, parse_date, working_days};
