//! Calendar and time-of-day helpers.
//!
//! Every date and time in turfbook is a facility-local value: a calendar
//! [`NaiveDate`] plus a [`chrono::NaiveTime`] of day. No timezone conversion happens
//! anywhere; bookings, blackouts and candidate slots are compared as-is.

use chrono::{Local, NaiveDate, TimeDelta};

/// Length of a single reservable slot.
#[must_use]
pub fn slot_length() -> TimeDelta {
    TimeDelta::hours(1)
}

/// Today's date on the host's local calendar.
#[must_use]
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Parse a `YYYY-MM-DD` calendar date.
///
/// # Errors
///
/// Returns the chrono parse error when `value` is not a valid date.
pub fn parse_date(value: &str) -> Result<NaiveDate, chrono::ParseError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_use_one_hour_slots() {
        assert_eq!(slot_length().num_minutes(), 60);
    }

    #[test]
    fn should_parse_iso_calendar_date() {
        let date = parse_date("2024-06-01").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());
    }

    #[test]
    fn should_reject_malformed_date() {
        assert!(parse_date("01/06/2024").is_err());
    }
}
