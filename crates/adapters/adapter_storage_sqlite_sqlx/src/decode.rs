//! Column codecs shared by the repositories.
//!
//! Dates are stored as `YYYY-MM-DD` and times as `HH:MM:SS` with an optional
//! fraction in groups of three digits, so lexical comparison in SQL matches
//! chronological order. Prices are exact decimal text.

use std::str::FromStr;

use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;

use turfbook_domain::interval::TimeInterval;

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMAT: &str = "%H:%M:%S%.f";

fn decode_err<E>(err: E) -> sqlx::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    sqlx::Error::Decode(Box::new(err))
}

pub(crate) fn encode_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub(crate) fn encode_time(time: NaiveTime) -> String {
    time.format(TIME_FORMAT).to_string()
}

pub(crate) fn date(value: &str) -> Result<NaiveDate, sqlx::Error> {
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(decode_err)
}

pub(crate) fn time(value: &str) -> Result<NaiveTime, sqlx::Error> {
    NaiveTime::parse_from_str(value, TIME_FORMAT).map_err(decode_err)
}

pub(crate) fn interval(start: &str, end: &str) -> Result<TimeInterval, sqlx::Error> {
    TimeInterval::new(time(start)?, time(end)?).map_err(decode_err)
}

pub(crate) fn decimal(value: &str) -> Result<Decimal, sqlx::Error> {
    Decimal::from_str(value).map_err(decode_err)
}

pub(crate) fn count(value: i64) -> Result<u64, sqlx::Error> {
    u64::try_from(value).map_err(decode_err)
}
