//! Wire forms of temporal values
//!
//! Dates travel as `YYYY-MM-DD` strings. Datetimes are milliseconds since
//! the Unix epoch and time deltas are milliseconds, both as JSON numbers.

use crate::value::Value;
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeDelta};

const DATE_FORMAT: &str = "%Y-%m-%d";

pub(crate) fn date_to_wire(date: &NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub(crate) fn datetime_to_ms(dt: &NaiveDateTime) -> f64 {
    dt.and_utc().timestamp_micros() as f64 / 1000.0
}

pub(crate) fn timedelta_to_ms(td: &TimeDelta) -> f64 {
    match td.num_microseconds() {
        Some(us) => us as f64 / 1000.0,
        None => td.num_milliseconds() as f64,
    }
}

fn finite_ms(value: &Value) -> Option<f64> {
    value.as_f64().filter(|ms| ms.is_finite())
}

fn ms_to_micros(ms: f64) -> Option<i64> {
    let us = (ms * 1000.0).round();
    (us.abs() < i64::MAX as f64).then_some(us as i64)
}

pub(crate) fn date_from_wire(value: &Value) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.as_str()?, DATE_FORMAT).ok()
}

pub(crate) fn datetime_from_wire(value: &Value) -> Option<NaiveDateTime> {
    let us = ms_to_micros(finite_ms(value)?)?;
    DateTime::from_timestamp_micros(us).map(|dt| dt.naive_utc())
}

pub(crate) fn timedelta_from_wire(value: &Value) -> Option<TimeDelta> {
    ms_to_micros(finite_ms(value)?).map(TimeDelta::microseconds)
}
