//! Date, datetime, and clock-time parsing for payload decoding.
//!
//! Incoming temporal strings are whitespace-normalized before parsing: date
//! and time values have all whitespace stripped, datetime values have runs
//! collapsed to single spaces. Formats are chrono format strings carried on
//! the field metadata.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};

/// Default format for `date` fields.
pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d";

/// Default format for `datetime` fields.
pub const DEFAULT_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Clock formats accepted by the lenient `time` parse, tried in order.
const TIME_FORMATS: &[&str] = &["%H:%M:%S", "%H:%M", "%I:%M:%S%p", "%I:%M%p", "%I%p"];

/// Remove every whitespace character.
pub fn strip_whitespace(value: &str) -> String {
    value.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Collapse whitespace runs to single spaces and trim the ends.
pub fn collapse_whitespace(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Parse a calendar date after stripping whitespace.
pub fn parse_date(value: &str, format: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(&strip_whitespace(value), format).ok()
}

/// Parse a datetime after collapsing whitespace runs.
///
/// A date-only format resolves to midnight of the parsed date.
pub fn parse_datetime(value: &str, format: &str) -> Option<NaiveDateTime> {
    let normalized = collapse_whitespace(value);
    NaiveDateTime::parse_from_str(&normalized, format)
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(&normalized, format)
                .ok()
                .map(|date| date.and_time(NaiveTime::MIN))
        })
}

/// Leniently parse a clock time after stripping whitespace.
///
/// Returns seconds past midnight.
pub fn parse_time(value: &str) -> Option<i64> {
    let normalized = strip_whitespace(value).to_uppercase();
    TIME_FORMATS
        .iter()
        .find_map(|format| NaiveTime::parse_from_str(&normalized, format).ok())
        .map(|time| i64::from(time.num_seconds_from_midnight()))
}
