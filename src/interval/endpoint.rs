//! Interval endpoints: concrete local timestamps or one of the two infinities.

use std::fmt::Display;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use qtty::{Quantity, Second};

use crate::error::HoursError;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

const NAIVE_FORMATS: [&str; 4] = [
    TIMESTAMP_FORMAT,
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

const NEG_INF_LITERAL: &str = "-INF";
const POS_INF_LITERAL: &str = "INF";

/// A boundary of an [`Interval`](super::Interval).
///
/// The variant order is the total order: `NegInf < At(_) < PosInf`, with
/// concrete timestamps ordered chronologically. Equal sentinels compare equal,
/// so `Ord::min`/`Ord::max` never have to subtract two infinities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Endpoint {
    NegInf,
    At(NaiveDateTime),
    PosInf,
}

impl Endpoint {
    pub const fn at(timestamp: NaiveDateTime) -> Self {
        Endpoint::At(timestamp)
    }

    /// Midnight at the start of `date`.
    pub fn start_of(date: NaiveDate) -> Self {
        Endpoint::At(date.and_time(NaiveTime::MIN))
    }

    pub const fn is_finite(&self) -> bool {
        matches!(self, Endpoint::At(_))
    }

    /// Returns the concrete timestamp, or `None` for a sentinel.
    pub const fn timestamp(&self) -> Option<NaiveDateTime> {
        match self {
            Endpoint::At(t) => Some(*t),
            _ => None,
        }
    }

    /// Epoch seconds of the local timestamp; sentinels map to ±∞.
    pub fn as_seconds(&self) -> Quantity<Second> {
        let value = match self {
            Endpoint::NegInf => f64::NEG_INFINITY,
            Endpoint::At(t) => t.and_utc().timestamp() as f64,
            Endpoint::PosInf => f64::INFINITY,
        };
        Quantity::<Second>::new(value)
    }

    /// Signed number of seconds from `self` to `other`.
    ///
    /// Two equal sentinels are zero apart. Any other pairing that involves a
    /// sentinel is infinitely far apart, with the sign given by the order.
    pub fn seconds_until(&self, other: &Endpoint) -> Quantity<Second> {
        match (self, other) {
            (Endpoint::At(a), Endpoint::At(b)) => {
                Quantity::<Second>::new((*b - *a).num_seconds() as f64)
            }
            _ if self == other => Quantity::<Second>::new(0.0),
            _ if self < other => Quantity::<Second>::new(f64::INFINITY),
            _ => Quantity::<Second>::new(f64::NEG_INFINITY),
        }
    }

    /// Whole days from `self` to `other`, when both are concrete or both are
    /// the same sentinel.
    pub fn days_until(&self, other: &Endpoint) -> Option<i64> {
        match (self, other) {
            (Endpoint::At(a), Endpoint::At(b)) => Some((*b - *a).num_days()),
            _ if self == other => Some(0),
            _ => None,
        }
    }

    /// Parses the serialized form: `-INF`, `INF` or a timestamp accepted by
    /// [`parse_timestamp`].
    pub fn parse(text: &str) -> Result<Self, HoursError> {
        match text.trim() {
            NEG_INF_LITERAL => Ok(Endpoint::NegInf),
            POS_INF_LITERAL => Ok(Endpoint::PosInf),
            other => parse_timestamp(other).map(Endpoint::At),
        }
    }
}

impl From<NaiveDateTime> for Endpoint {
    fn from(timestamp: NaiveDateTime) -> Self {
        Endpoint::At(timestamp)
    }
}

impl FromStr for Endpoint {
    type Err = HoursError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Endpoint::parse(s)
    }
}

impl Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Endpoint::NegInf => f.write_str(NEG_INF_LITERAL),
            Endpoint::At(t) => f.write_str(&format_timestamp(t)),
            Endpoint::PosInf => f.write_str(POS_INF_LITERAL),
        }
    }
}

/// Formats a local timestamp the way serialized records store it.
pub fn format_timestamp(timestamp: &NaiveDateTime) -> String {
    timestamp.format(TIMESTAMP_FORMAT).to_string()
}

/// Parses an ISO-8601 local timestamp.
///
/// Accepts second or minute precision, `T` or space as separator, a bare
/// date (read as midnight), and an explicit numeric offset, which is dropped.
pub fn parse_timestamp(text: &str) -> Result<NaiveDateTime, HoursError> {
    let text = text.trim();
    for format in NAIVE_FORMATS {
        if let Ok(t) = NaiveDateTime::parse_from_str(text, format) {
            return Ok(t);
        }
    }
    if let Ok(t) = DateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%z") {
        return Ok(t.naive_local());
    }
    if let Ok(t) = DateTime::parse_from_rfc3339(text) {
        return Ok(t.naive_local());
    }
    if let Ok(d) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return Ok(d.and_time(NaiveTime::MIN));
    }
    Err(HoursError::InvalidTimestamp(text.to_string()))
}

/// Parses a calendar date, accepting any timestamp form and keeping the day.
pub fn parse_date(text: &str) -> Result<NaiveDate, HoursError> {
    parse_timestamp(text).map(|t| t.date())
}

// =============================================================================
// Endpoint Serde Support
// =============================================================================

#[cfg(feature = "serde")]
impl serde::Serialize for Endpoint {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Endpoint {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Endpoint::parse(&raw).map_err(serde::de::Error::custom)
    }
}
