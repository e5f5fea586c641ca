//! Half-open intervals over [`Endpoint`]s.

use std::fmt::Display;

use chrono::NaiveDateTime;

use super::endpoint::Endpoint;
use crate::error::HoursError;

/// Half-open range `[start, end)`, possibly unbounded on either side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Interval {
    start: Endpoint,
    end: Endpoint,
}

impl Interval {
    /// Creates interval `[start, end)`.
    ///
    /// # Errors
    ///
    /// Returns [`HoursError::InvertedInterval`] if `start > end`.
    pub fn new(start: Endpoint, end: Endpoint) -> Result<Self, HoursError> {
        if start > end {
            return Err(HoursError::InvertedInterval { start, end });
        }
        Ok(Self { start, end })
    }

    /// Wraps endpoints already known to satisfy `start <= end`.
    pub(crate) fn from_ordered(start: Endpoint, end: Endpoint) -> Self {
        debug_assert!(start <= end, "Interval start must be <= end");
        Self { start, end }
    }

    pub fn between(start: NaiveDateTime, end: NaiveDateTime) -> Result<Self, HoursError> {
        Self::new(Endpoint::At(start), Endpoint::At(end))
    }

    /// `(-∞, +∞)`.
    pub const fn unbounded() -> Self {
        Self {
            start: Endpoint::NegInf,
            end: Endpoint::PosInf,
        }
    }

    pub const fn start(&self) -> Endpoint {
        self.start
    }

    pub const fn end(&self) -> Endpoint {
        self.end
    }

    /// True when `start == end`.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Returns true if `instant` ∈ `[start, end)`.
    pub fn contains(&self, instant: NaiveDateTime) -> bool {
        let at = Endpoint::At(instant);
        self.start <= at && at < self.end
    }

    /// Checks whether the two half-open ranges share at least one instant.
    pub fn intersects(&self, other: &Interval) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Clamps this interval into `[min, max]`.
    ///
    /// Returns `None` when the interval lies entirely outside, that is when
    /// it ends before `min` or starts after `max`. An interval that merely
    /// touches a bound survives as an empty interval on that bound.
    pub fn clamp_to(&self, min: Endpoint, max: Endpoint) -> Option<Interval> {
        if self.end < min || self.start > max {
            return None;
        }
        let start = self.start.max(min);
        let end = self.end.min(max);
        if start > end {
            return None;
        }
        Some(Interval { start, end })
    }

    /// Overlapping part of two intervals, if they intersect.
    pub fn intersection(&self, other: &Interval) -> Option<Interval> {
        if self.intersects(other) {
            Some(Interval {
                start: self.start.max(other.start),
                end: self.end.min(other.end),
            })
        } else {
            None
        }
    }
}

impl Display for Interval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

// =============================================================================
// Interval Serde Support
// =============================================================================

#[cfg(feature = "serde")]
impl serde::Serialize for Interval {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeStruct;
        let mut s = serializer.serialize_struct("Interval", 2)?;
        s.serialize_field("start", &self.start)?;
        s.serialize_field("end", &self.end)?;
        s.end()
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Interval {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(serde::Deserialize)]
        struct Raw {
            start: Endpoint,
            end: Endpoint,
        }

        let raw = Raw::deserialize(deserializer)?;
        Interval::new(raw.start, raw.end).map_err(serde::de::Error::custom)
    }
}
