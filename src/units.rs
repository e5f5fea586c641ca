//! Bridges between `qtty` time quantities and `chrono` calendar arithmetic.
//!
//! Durations are carried as typed quantities (`Quantity<Second>`,
//! `Quantity<Day>`) so configuration and serialized records cannot mix up
//! their units. Calendar arithmetic, on the other hand, happens on
//! `chrono::TimeDelta`. The helpers here are the only place the two meet.

use chrono::TimeDelta;
use qtty::{Day, Quantity, Second, Unit};

/// Number of seconds in one civil day (no leap-second handling).
pub const SECONDS_PER_DAY: i64 = 86_400;

/// Builds a whole-second quantity.
#[inline]
pub fn seconds(value: i64) -> Quantity<Second> {
    Quantity::<Second>::new(value as f64)
}

/// Builds a whole-day quantity.
#[inline]
pub fn days(value: i64) -> Quantity<Day> {
    Quantity::<Day>::new(value as f64)
}

/// Rounds any time quantity to whole seconds.
pub fn whole_seconds<U>(q: Quantity<U>) -> i64
where
    U: Unit<Dim = <Second as Unit>::Dim>,
{
    q.to::<Second>().value().round() as i64
}

/// Converts a time quantity into a `TimeDelta`, saturating at the
/// representable bounds.
pub fn to_time_delta<U>(q: Quantity<U>) -> TimeDelta
where
    U: Unit<Dim = <Second as Unit>::Dim>,
{
    TimeDelta::try_seconds(whole_seconds(q)).unwrap_or(if q.value() < 0.0 {
        TimeDelta::MIN
    } else {
        TimeDelta::MAX
    })
}

/// Converts a `TimeDelta` into seconds.
pub fn from_time_delta(delta: TimeDelta) -> Quantity<Second> {
    seconds(delta.num_seconds())
}

/// Number of calendar days a duration may reach past the day it starts on.
///
/// A period starting late in the evening with a duration of `n` days can
/// still be running on the `n + 1`-th following day.
pub fn spill_days(q: Quantity<Second>) -> i64 {
    let secs = whole_seconds(q).max(0);
    secs / SECONDS_PER_DAY + 1
}
