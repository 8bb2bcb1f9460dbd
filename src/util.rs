// Utility helpers for date parsing and number formatting.
//
// Everything that touches raw text dates lives here so the rest of the code
// only ever sees `NaiveDate`.
use chrono::NaiveDate;
use num_format::{Locale, ToFormattedString};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a `YYYY-MM-DD` string. Surrounding whitespace is rejected, not
/// trimmed.
pub fn parse_date_safe(s: Option<&str>) -> Option<NaiveDate> {
    let s = s?;
    if s.is_empty() || s.trim() != s {
        return None;
    }
    NaiveDate::parse_from_str(s, DATE_FORMAT).ok()
}

/// Parse the calendar-date prefix of an ISO-8601 date-time such as
/// `2020-02-24T18:00:00`. The time component is ignored.
pub fn parse_date_prefix(s: &str) -> Option<NaiveDate> {
    let prefix = s.trim().get(..10)?;
    NaiveDate::parse_from_str(prefix, DATE_FORMAT).ok()
}

pub fn format_date(d: NaiveDate) -> String {
    d.format(DATE_FORMAT).to_string()
}

pub fn format_int<T>(n: T) -> String
where
    T: ToFormattedString,
{
    // Used for counts in log lines (e.g., `1,234,567 cases`).
    n.to_formatted_string(&Locale::en)
}
