//! Intervals tagged with the entry that governs them.

use std::fmt::Display;

use chrono::NaiveDateTime;

use crate::error::HoursError;
use crate::interval::{Endpoint, Interval};

/// A half-open span `[start, end)` governed by `owner`.
///
/// The owner is generic: the resolver tags spans with borrowed
/// [`SpecEntry`](crate::spec::SpecEntry) nodes, other callers may use ids or
/// schedule handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ValidityPeriod<O> {
    interval: Interval,
    owner: O,
}

impl<O> ValidityPeriod<O> {
    /// # Errors
    ///
    /// Returns [`HoursError::InvertedInterval`] if `start > end`.
    pub fn new(start: Endpoint, end: Endpoint, owner: O) -> Result<Self, HoursError> {
        Ok(Self {
            interval: Interval::new(start, end)?,
            owner,
        })
    }

    pub const fn from_interval(interval: Interval, owner: O) -> Self {
        Self { interval, owner }
    }

    pub const fn start(&self) -> Endpoint {
        self.interval.start()
    }

    pub const fn end(&self) -> Endpoint {
        self.interval.end()
    }

    pub const fn interval(&self) -> Interval {
        self.interval
    }

    pub const fn owner(&self) -> &O {
        &self.owner
    }

    pub fn into_owner(self) -> O {
        self.owner
    }

    /// Returns true if `instant` ∈ `[start, end)`.
    pub fn contains(&self, instant: NaiveDateTime) -> bool {
        self.interval.contains(instant)
    }

    /// Same owner, different span.
    pub fn with_interval(&self, interval: Interval) -> Self
    where
        O: Clone,
    {
        Self {
            interval,
            owner: self.owner.clone(),
        }
    }

    /// Clamps the span into `[min, max]`, see [`Interval::clamp_to`].
    pub fn clamp_to(&self, min: Endpoint, max: Endpoint) -> Option<Self>
    where
        O: Clone,
    {
        self.interval
            .clamp_to(min, max)
            .map(|interval| self.with_interval(interval))
    }
}

impl<O> Display for ValidityPeriod<O> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.interval)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(text: &str) -> Endpoint {
        Endpoint::At(NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M").unwrap())
    }

    #[test]
    fn test_new_and_accessors() {
        let vp = ValidityPeriod::new(at("2016-01-13 00:00"), Endpoint::PosInf, "base").unwrap();
        assert_eq!(vp.start(), at("2016-01-13 00:00"));
        assert_eq!(vp.end(), Endpoint::PosInf);
        assert_eq!(*vp.owner(), "base");
        assert_eq!(vp.into_owner(), "base");
    }

    #[test]
    fn test_new_rejects_inverted() {
        let result = ValidityPeriod::new(at("2016-01-14 00:00"), at("2016-01-13 00:00"), 1u32);
        assert!(matches!(result, Err(HoursError::InvertedInterval { .. })));
    }

    #[test]
    fn test_clamp_keeps_owner() {
        let vp = ValidityPeriod::new(Endpoint::NegInf, Endpoint::PosInf, 7u32).unwrap();
        let clamped = vp
            .clamp_to(at("2016-01-13 00:00"), at("2016-01-14 00:00"))
            .unwrap();
        assert_eq!(clamped.start(), at("2016-01-13 00:00"));
        assert_eq!(clamped.end(), at("2016-01-14 00:00"));
        assert_eq!(*clamped.owner(), 7);
    }

    #[test]
    fn test_display() {
        let vp = ValidityPeriod::new(Endpoint::NegInf, at("2016-01-13 00:00"), ()).unwrap();
        assert_eq!(vp.to_string(), "[-INF, 2016-01-13T00:00:00)");
    }
}
