//! Concrete opening periods and their weekly recurring templates.

use std::fmt::Display;

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, Timelike, Weekday};
use qtty::{Quantity, Second};

use crate::error::HoursError;
use crate::interval::{Endpoint, Interval};
use crate::units::{seconds, spill_days, to_time_delta, whole_seconds, SECONDS_PER_DAY};

/// A concrete opening `[start, end)` in local time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Period {
    start: NaiveDateTime,
    end: NaiveDateTime,
}

impl Period {
    /// Creates period `[start, end)`.
    ///
    /// # Errors
    ///
    /// Returns [`HoursError::InvertedInterval`] if `start > end`.
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Result<Self, HoursError> {
        if start > end {
            return Err(HoursError::InvertedInterval {
                start: Endpoint::At(start),
                end: Endpoint::At(end),
            });
        }
        Ok(Self { start, end })
    }

    pub const fn start(&self) -> NaiveDateTime {
        self.start
    }

    pub const fn end(&self) -> NaiveDateTime {
        self.end
    }

    pub fn duration(&self) -> Quantity<Second> {
        seconds((self.end - self.start).num_seconds())
    }

    /// Returns true if `instant` ∈ `[start, end)`.
    pub fn contains(&self, instant: NaiveDateTime) -> bool {
        self.start <= instant && instant < self.end
    }

    pub fn interval(&self) -> Interval {
        Interval::from_ordered(Endpoint::At(self.start), Endpoint::At(self.end))
    }
}

impl Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} – {}",
            self.start.format("%Y-%m-%d %H:%M"),
            self.end.format("%Y-%m-%d %H:%M")
        )
    }
}

/// Longest duration a weekly period may have: one full week.
pub const MAX_RECURRING_DURATION_SECS: i64 = 7 * SECONDS_PER_DAY;

/// Weekly template: opens every `weekday` at `start_time` for `duration`.
///
/// Durations longer than the rest of the day carry the period over midnight,
/// possibly across several days.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecurringPeriod {
    weekday: Weekday,
    start_time: NaiveTime,
    duration: Quantity<Second>,
}

impl RecurringPeriod {
    /// # Errors
    ///
    /// Returns [`HoursError::NegativeDuration`] for a negative duration and
    /// [`HoursError::DurationTooLong`] above [`MAX_RECURRING_DURATION_SECS`].
    pub fn new(
        weekday: Weekday,
        start_time: NaiveTime,
        duration: Quantity<Second>,
    ) -> Result<Self, HoursError> {
        let secs = whole_seconds(duration);
        if secs < 0 {
            return Err(HoursError::NegativeDuration(secs));
        }
        if secs > MAX_RECURRING_DURATION_SECS {
            return Err(HoursError::DurationTooLong {
                seconds: secs,
                max: MAX_RECURRING_DURATION_SECS,
            });
        }
        Ok(Self {
            weekday,
            start_time: truncate_to_minute(start_time),
            duration: seconds(secs),
        })
    }

    /// Builds a period from its serialized parts: `"HH:MM"`, seconds and a
    /// weekday index (0 = Monday).
    pub fn from_parts(
        start_time: &str,
        duration_secs: i64,
        weekday: i64,
    ) -> Result<Self, HoursError> {
        Self::new(
            weekday_from_index(weekday)?,
            parse_time_of_day(start_time)?,
            seconds(duration_secs),
        )
    }

    pub const fn weekday(&self) -> Weekday {
        self.weekday
    }

    pub const fn start_time(&self) -> NaiveTime {
        self.start_time
    }

    pub const fn duration(&self) -> Quantity<Second> {
        self.duration
    }

    /// Time of day at which the period closes, ignoring how many midnights
    /// it crosses.
    pub fn end_time(&self) -> NaiveTime {
        let (time, _) = self
            .start_time
            .overflowing_add_signed(to_time_delta(self.duration));
        time
    }

    /// How many days back a period of this template can still be running.
    pub fn spill_days(&self) -> i64 {
        spill_days(self.duration)
    }

    /// Concrete period on `date`.
    ///
    /// # Errors
    ///
    /// Returns [`HoursError::WeekdayMismatch`] if `date` does not fall on this
    /// period's weekday.
    pub fn materialize(&self, date: NaiveDate) -> Result<Period, HoursError> {
        if date.weekday() != self.weekday {
            return Err(HoursError::WeekdayMismatch {
                expected: self.weekday,
                actual: date.weekday(),
                date,
            });
        }
        let start = date.and_time(self.start_time);
        let end = start
            .checked_add_signed(to_time_delta(self.duration))
            .ok_or_else(|| HoursError::InvalidTimestamp(format!("{start} + {}s", self.secs())))?;
        Period::new(start, end)
    }

    pub(crate) fn secs(&self) -> i64 {
        whole_seconds(self.duration)
    }
}

/// Serialized weekday index, 0 = Monday … 6 = Sunday.
pub fn weekday_index(weekday: Weekday) -> i64 {
    i64::from(weekday.num_days_from_monday())
}

pub fn weekday_from_index(index: i64) -> Result<Weekday, HoursError> {
    u8::try_from(index)
        .ok()
        .and_then(|i| Weekday::try_from(i).ok())
        .ok_or(HoursError::InvalidWeekday(index))
}

/// Parses `"HH:MM"`.
pub fn parse_time_of_day(text: &str) -> Result<NaiveTime, HoursError> {
    NaiveTime::parse_from_str(text.trim(), "%H:%M")
        .map_err(|_| HoursError::InvalidTimeOfDay(text.to_string()))
}

pub fn format_time_of_day(time: NaiveTime) -> String {
    time.format("%H:%M").to_string()
}

fn truncate_to_minute(time: NaiveTime) -> NaiveTime {
    time.with_second(0)
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(time)
}
