//! Lenient date parsing for bowl `lastFillDate` attributes.
//!
//! Clients submit fill dates in several shapes; a value counts as a date if
//! any accepted pattern parses it.

use chrono::{DateTime, NaiveDate};

/// Returns true if `value` parses as an RFC 3339 timestamp, an RFC 2822
/// timestamp, or a bare `YYYY-MM-DD` date.
pub fn is_date(value: &str) -> bool {
    DateTime::parse_from_rfc3339(value).is_ok()
        || DateTime::parse_from_rfc2822(value).is_ok()
        || NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok()
}
