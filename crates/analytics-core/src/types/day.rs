//! Calendar day keys and rolling windows.

use chrono::{Days, NaiveDate};

use crate::error::CacheError;

/// Format used for day keys (`YYYY-MM-DD`).
pub const DAY_KEY_FORMAT: &str = "%Y-%m-%d";

/// Format a date as a day key.
pub fn format_day_key(date: NaiveDate) -> String {
    date.format(DAY_KEY_FORMAT).to_string()
}

/// Parse a `YYYY-MM-DD` day key.
pub fn parse_day_key(s: &str) -> Result<NaiveDate, CacheError> {
    NaiveDate::parse_from_str(s.trim(), DAY_KEY_FORMAT)
        .map_err(|e| CacheError::InvalidDate(format!("{}: {}", s, e)))
}

/// Rolling window of `days` calendar dates ending at `today`, oldest first.
///
/// A zero-day window is empty.
pub fn rolling_window(today: NaiveDate, days: u32) -> Vec<NaiveDate> {
    (0..days)
        .rev()
        .filter_map(|offset| today.checked_sub_days(Days::new(u64::from(offset))))
        .collect()
}
