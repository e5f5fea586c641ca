use chrono::{NaiveDate, Weekday};
use thiserror::Error;

use crate::interval::Endpoint;

/// Errors raised while building or decoding opening-hours specifications.
///
/// Every variant signals a malformed argument. Nothing is repaired silently:
/// the caller decides how to present the failure.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HoursError {
    #[error("Unknown specification entry kind: {0}")]
    UnknownKind(String),

    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    #[error("Invalid time of day (expected HH:MM): {0}")]
    InvalidTimeOfDay(String),

    #[error("Invalid weekday {0}, expected a value in 0..=6")]
    InvalidWeekday(i64),

    #[error("Duration cannot be negative: {0} seconds")]
    NegativeDuration(i64),

    #[error("Duration of {seconds} seconds exceeds the maximum of {max} seconds")]
    DurationTooLong { seconds: i64, max: i64 },

    #[error("Period is configured for {expected:?} but {date} is a {actual:?}")]
    WeekdayMismatch {
        expected: Weekday,
        actual: Weekday,
        date: NaiveDate,
    },

    #[error("Interval start {start} is after its end {end}")]
    InvertedInterval { start: Endpoint, end: Endpoint },

    #[error("Missing field `{field}` for entry kind `{kind}`")]
    MissingField { kind: String, field: &'static str },
}

impl HoursError {
    /// All variants belong to the invalid-argument class.
    pub fn is_invalid_argument(&self) -> bool {
        true
    }
}
