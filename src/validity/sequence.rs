//! An ordered container of owner-tagged, non-overlapping validity periods.
//!
//! [`ValiditySequence`] wraps a `Vec<ValidityPeriod<O>>` kept in **monotonic
//! order**: periods are sorted by start and each one ends no later than the
//! next starts. Every operation returns a new sequence; nothing is mutated
//! in place.
//!
//! Read access is transparent via `Deref<Target = [ValidityPeriod<O>]>`.

use std::fmt::Display;
use std::ops::{Deref, Index};

use chrono::NaiveDateTime;

use super::period::ValidityPeriod;
use crate::interval::Endpoint;

/// A sorted, non-overlapping run of [`ValidityPeriod`]s.
#[derive(Debug, Clone, PartialEq)]
pub struct ValiditySequence<O>(Vec<ValidityPeriod<O>>);

// ─────────────────────────────────────────────────────────────────────
// Constructors
// ─────────────────────────────────────────────────────────────────────

impl<O> ValiditySequence<O> {
    /// Creates an empty sequence.
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Wraps a `Vec` that is **already monotonic** without re-sorting.
    ///
    /// In debug builds this asserts the invariant. A violation is a
    /// programming error in the caller.
    pub fn from_sorted(periods: Vec<ValidityPeriod<O>>) -> Self {
        debug_assert!(
            super::assertions::is_monotonic(&periods),
            "ValiditySequence::from_sorted called with non-monotonic input"
        );
        Self(periods)
    }
}

// ─────────────────────────────────────────────────────────────────────
// Bounds and lookup
// ─────────────────────────────────────────────────────────────────────

impl<O> ValiditySequence<O> {
    /// Start of the first period, or `-∞` when empty.
    pub fn start(&self) -> Endpoint {
        self.0.first().map_or(Endpoint::NegInf, ValidityPeriod::start)
    }

    /// End of the last period, or `+∞` when empty.
    pub fn end(&self) -> Endpoint {
        self.0.last().map_or(Endpoint::PosInf, ValidityPeriod::end)
    }

    pub fn periods(&self) -> &[ValidityPeriod<O>] {
        &self.0
    }

    /// Consumes the sequence and returns the underlying `Vec`.
    pub fn into_periods(self) -> Vec<ValidityPeriod<O>> {
        self.0
    }

    /// The period whose `[start, end)` contains `instant`.
    pub fn active_at(&self, instant: NaiveDateTime) -> Option<&ValidityPeriod<O>> {
        self.0.iter().find(|p| p.contains(instant))
    }

    /// Index of the period containing `instant`, or of the first period
    /// starting after it.
    pub(crate) fn position_from(&self, instant: NaiveDateTime) -> Option<usize> {
        let at = Endpoint::At(instant);
        self.0.iter().position(|p| at < p.end() && !p.interval().is_empty())
    }
}

// ─────────────────────────────────────────────────────────────────────
// Derived sequences
// ─────────────────────────────────────────────────────────────────────

impl<O: Clone> ValiditySequence<O> {
    /// Restricts the sequence to `[min, max]`.
    ///
    /// Periods entirely outside (ending before `min` or starting after `max`)
    /// are dropped; the others are clamped. A period that only touches a bound
    /// is kept as an empty period on that bound.
    pub fn restricted_to_interval(&self, min: Endpoint, max: Endpoint) -> Self {
        Self(
            self.0
                .iter()
                .filter_map(|p| p.clamp_to(min, max))
                .collect(),
        )
    }

    /// Overlays `self` on `background`.
    ///
    /// The result keeps every period of `self` and fills the spans before,
    /// between and after them with the clipped periods of `background`.
    pub fn cover(&self, background: &ValiditySequence<O>) -> Self {
        if self.0.is_empty() {
            return background.clone();
        }
        let fill = |min: Endpoint, max: Endpoint| {
            background
                .restricted_to_interval(min, max)
                .into_iter()
                .filter(|p| !p.interval().is_empty())
        };

        let mut periods: Vec<ValidityPeriod<O>> = fill(Endpoint::NegInf, self.start()).collect();
        for (i, period) in self.0.iter().enumerate() {
            periods.push(period.clone());
            if let Some(next) = self.0.get(i + 1) {
                if period.end() < next.start() {
                    periods.extend(fill(period.end(), next.start()));
                }
            }
        }
        periods.extend(fill(self.end(), Endpoint::PosInf));
        Self::from_sorted(periods)
    }
}

// ─────────────────────────────────────────────────────────────────────
// Transparent read access
// ─────────────────────────────────────────────────────────────────────

impl<O> Deref for ValiditySequence<O> {
    type Target = [ValidityPeriod<O>];

    fn deref(&self) -> &[ValidityPeriod<O>] {
        &self.0
    }
}

impl<O> AsRef<[ValidityPeriod<O>]> for ValiditySequence<O> {
    fn as_ref(&self) -> &[ValidityPeriod<O>] {
        &self.0
    }
}

impl<O> Index<usize> for ValiditySequence<O> {
    type Output = ValidityPeriod<O>;

    fn index(&self, index: usize) -> &ValidityPeriod<O> {
        &self.0[index]
    }
}

// ─────────────────────────────────────────────────────────────────────
// Iterators
// ─────────────────────────────────────────────────────────────────────

impl<O> IntoIterator for ValiditySequence<O> {
    type Item = ValidityPeriod<O>;
    type IntoIter = std::vec::IntoIter<ValidityPeriod<O>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a, O> IntoIterator for &'a ValiditySequence<O> {
    type Item = &'a ValidityPeriod<O>;
    type IntoIter = std::slice::Iter<'a, ValidityPeriod<O>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

// ─────────────────────────────────────────────────────────────────────
// Trait impls
// ─────────────────────────────────────────────────────────────────────

impl<O> Default for ValiditySequence<O> {
    fn default() -> Self {
        Self::new()
    }
}

impl<O> Display for ValiditySequence<O> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{")?;
        for (i, period) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", period)?;
        }
        write!(f, "}}")
    }
}

/// Enables `assert_eq!(sequence, vec![...])` in tests.
impl<O: PartialEq> PartialEq<Vec<ValidityPeriod<O>>> for ValiditySequence<O> {
    fn eq(&self, other: &Vec<ValidityPeriod<O>>) -> bool {
        self.0 == *other
    }
}

// ─────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn at(text: &str) -> Endpoint {
        Endpoint::At(NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M").unwrap())
    }

    fn vp(start: Endpoint, end: Endpoint, owner: &'static str) -> ValidityPeriod<&'static str> {
        ValidityPeriod::new(start, end, owner).unwrap()
    }

    fn day(n: u32) -> Endpoint {
        at(&format!("2016-01-{n:02} 00:00"))
    }

    fn three() -> ValiditySequence<&'static str> {
        ValiditySequence::from_sorted(vec![
            vp(Endpoint::NegInf, day(10), "a"),
            vp(day(10), day(20), "b"),
            vp(day(20), Endpoint::PosInf, "c"),
        ])
    }

    // ── Bounds ────────────────────────────────────────────────────────

    #[test]
    fn empty_sentinels() {
        let seq = ValiditySequence::<()>::new();
        assert!(seq.is_empty());
        assert_eq!(seq.start(), Endpoint::NegInf);
        assert_eq!(seq.end(), Endpoint::PosInf);
    }

    #[test]
    fn bounds_of_non_empty() {
        let seq = ValiditySequence::from_sorted(vec![vp(day(3), day(5), "x"), vp(day(5), day(9), "y")]);
        assert_eq!(seq.start(), day(3));
        assert_eq!(seq.end(), day(9));
        assert_eq!(seq.len(), 2);
    }

    // ── Restriction ───────────────────────────────────────────────────

    #[test]
    fn restrict_clamps_and_drops() {
        let restricted = three().restricted_to_interval(day(12), day(15));
        assert_eq!(restricted, vec![vp(day(12), day(15), "b")]);
    }

    #[test]
    fn restrict_spanning_boundaries() {
        let restricted = three().restricted_to_interval(day(5), day(25));
        assert_eq!(
            restricted,
            vec![
                vp(day(5), day(10), "a"),
                vp(day(10), day(20), "b"),
                vp(day(20), day(25), "c"),
            ]
        );
    }

    #[test]
    fn restrict_keeps_touching_period_as_empty() {
        let restricted = three().restricted_to_interval(Endpoint::NegInf, day(10));
        assert_eq!(
            restricted,
            vec![vp(Endpoint::NegInf, day(10), "a"), vp(day(10), day(10), "b")]
        );
    }

    #[test]
    fn restrict_is_idempotent() {
        let once = three().restricted_to_interval(day(5), day(15));
        let twice = once.restricted_to_interval(day(5), day(15));
        assert_eq!(once, twice);
    }

    #[test]
    fn restrict_empty() {
        let seq = ValiditySequence::<&str>::new().restricted_to_interval(day(1), day(2));
        assert!(seq.is_empty());
    }

    // ── Lookup ────────────────────────────────────────────────────────

    #[test]
    fn active_at_finds_owner() {
        let seq = three();
        let t = NaiveDateTime::parse_from_str("2016-01-10 00:00", "%Y-%m-%d %H:%M").unwrap();
        assert_eq!(*seq.active_at(t).unwrap().owner(), "b");
        let early = NaiveDateTime::parse_from_str("1999-01-01 00:00", "%Y-%m-%d %H:%M").unwrap();
        assert_eq!(*seq.active_at(early).unwrap().owner(), "a");
    }

    #[test]
    fn active_at_gap_is_none() {
        let seq = ValiditySequence::from_sorted(vec![vp(day(1), day(2), "x"), vp(day(3), day(4), "y")]);
        let t = NaiveDateTime::parse_from_str("2016-01-02 12:00", "%Y-%m-%d %H:%M").unwrap();
        assert!(seq.active_at(t).is_none());
    }

    // ── Cover ─────────────────────────────────────────────────────────

    #[test]
    fn cover_fills_gaps_with_background() {
        let background = ValiditySequence::from_sorted(vec![vp(Endpoint::NegInf, Endpoint::PosInf, "bg")]);
        let foreground =
            ValiditySequence::from_sorted(vec![vp(day(5), day(8), "x"), vp(day(12), day(14), "y")]);
        let covered = foreground.cover(&background);
        assert_eq!(
            covered,
            vec![
                vp(Endpoint::NegInf, day(5), "bg"),
                vp(day(5), day(8), "x"),
                vp(day(8), day(12), "bg"),
                vp(day(12), day(14), "y"),
                vp(day(14), Endpoint::PosInf, "bg"),
            ]
        );
    }

    #[test]
    fn cover_adjacent_foreground_has_no_filler() {
        let background = ValiditySequence::from_sorted(vec![vp(day(1), day(30), "bg")]);
        let foreground =
            ValiditySequence::from_sorted(vec![vp(day(5), day(8), "x"), vp(day(8), day(14), "y")]);
        let covered = foreground.cover(&background);
        assert_eq!(
            covered,
            vec![
                vp(day(1), day(5), "bg"),
                vp(day(5), day(8), "x"),
                vp(day(8), day(14), "y"),
                vp(day(14), day(30), "bg"),
            ]
        );
    }

    #[test]
    fn cover_empty_foreground_is_background() {
        let background = three();
        let covered = ValiditySequence::new().cover(&background);
        assert_eq!(covered, background);
    }

    // ── Display / iteration ───────────────────────────────────────────

    #[test]
    fn display_format() {
        let s = format!("{}", three());
        assert!(s.starts_with("{[-INF, "));
        assert!(s.ends_with("INF)}"));
    }

    #[test]
    fn into_iter_owned_and_borrowed() {
        let seq = three();
        assert_eq!((&seq).into_iter().count(), 3);
        let owners: Vec<_> = seq.into_iter().map(ValidityPeriod::into_owner).collect();
        assert_eq!(owners, vec!["a", "b", "c"]);
    }
}
