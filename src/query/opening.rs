//! Opening queries on a settled validity sequence.

use chrono::NaiveDateTime;
use tracing::trace;

use super::config::QueryConfig;
use crate::interval::{Endpoint, Interval};
use crate::spec::{Period, SpecEntry};
use crate::units::to_time_delta;
use crate::validity::{resolve, ValidityPeriod, ValiditySequence};

/// Pushes span boundaries past periods that are still running.
///
/// For each adjacent pair `(prev, next)`, `next` is replaced by
/// `prev.owner().transform_covering_period(next)` and `prev` is stretched up to
/// the new boundary. A period running across midnight therefore keeps
/// governing until it closes, even when a holiday or override starts at
/// midnight. Empty spans are dropped.
pub fn settle_overhangs(sequence: ValiditySequence<&SpecEntry>) -> ValiditySequence<&SpecEntry> {
    let mut settled: Vec<ValidityPeriod<&SpecEntry>> = Vec::with_capacity(sequence.len());
    for period in sequence {
        if period.interval().is_empty() {
            continue;
        }
        let Some(prev) = settled.last_mut() else {
            settled.push(period);
            continue;
        };
        let shifted = prev.owner().transform_covering_period(&period);
        if shifted.start() > period.start() {
            trace!(from = %period.start(), to = %shifted.start(), "boundary pushed by running period");
            *prev = prev.with_interval(Interval::from_ordered(prev.start(), shifted.start()));
        }
        if !shifted.interval().is_empty() {
            settled.push(shifted);
        }
    }
    ValiditySequence::from_sorted(settled)
}

/// Opening-hours queries over one specification tree.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDateTime;
/// use venue_hours::query::OpeningQuery;
/// use venue_hours::spec::{RecurringPeriod, RecurringPeriods, SpecEntry};
///
/// // Mondays 09:00 for eight hours
/// let monday = RecurringPeriod::from_parts("09:00", 8 * 3600, 0).unwrap();
/// let root = SpecEntry::from(RecurringPeriods::unbounded(vec![monday]));
/// let query = OpeningQuery::new(&root);
///
/// let t = NaiveDateTime::parse_from_str("2016-01-11 10:00", "%Y-%m-%d %H:%M").unwrap();
/// assert!(query.is_open_at(t));
///
/// let sunday = NaiveDateTime::parse_from_str("2016-01-17 10:00", "%Y-%m-%d %H:%M").unwrap();
/// let next = query.next_open_period(sunday).unwrap();
/// assert_eq!(next.start().to_string(), "2016-01-18 09:00:00");
/// ```
#[derive(Debug, Clone)]
pub struct OpeningQuery<'a> {
    sequence: ValiditySequence<&'a SpecEntry>,
    config: QueryConfig,
}

impl<'a> OpeningQuery<'a> {
    pub fn new(root: &'a SpecEntry) -> Self {
        Self::with_config(root, QueryConfig::default())
    }

    pub fn with_config(root: &'a SpecEntry, config: QueryConfig) -> Self {
        Self {
            sequence: settle_overhangs(resolve(root)),
            config,
        }
    }

    /// The settled sequence the queries run on.
    pub fn sequence(&self) -> &ValiditySequence<&'a SpecEntry> {
        &self.sequence
    }

    pub fn config(&self) -> &QueryConfig {
        &self.config
    }

    /// The entry governing `instant`.
    pub fn entry_at(&self, instant: NaiveDateTime) -> Option<&'a SpecEntry> {
        self.sequence.active_at(instant).map(|p| *p.owner())
    }

    /// The period open at `instant`, if any.
    ///
    /// Only periods of the governing entry that started inside its span
    /// count: a period that began under a different entry does not reopen
    /// the venue.
    pub fn open_period_at(&self, instant: NaiveDateTime) -> Option<Period> {
        let span = self.sequence.active_at(instant)?;
        span.owner()
            .periods_active_at(instant)
            .into_iter()
            .find(|p| Endpoint::At(p.start()) >= span.start())
    }

    pub fn is_open_at(&self, instant: NaiveDateTime) -> bool {
        self.open_period_at(instant).is_some()
    }

    /// The period open at `instant`, or else the next one to open within the
    /// configured look-ahead.
    pub fn next_open_period(&self, instant: NaiveDateTime) -> Option<Period> {
        if let Some(current) = self.open_period_at(instant) {
            return Some(current);
        }
        let horizon = instant
            .checked_add_signed(to_time_delta(self.config.lookahead))
            .unwrap_or(NaiveDateTime::MAX);
        let found = self.open_periods_between(instant, horizon).into_iter().next();
        trace!(%instant, found = ?found, "next open period lookup");
        found
    }

    /// Effective open periods whose start lies in `[from, to)`, in order.
    pub fn open_periods_between(&self, from: NaiveDateTime, to: NaiveDateTime) -> Vec<Period> {
        if from >= to {
            return Vec::new();
        }
        let Some(first) = self.sequence.position_from(from) else {
            return Vec::new();
        };
        let window = Interval::from_ordered(Endpoint::At(from), Endpoint::At(to));
        let mut found = Vec::new();
        for span in &self.sequence.periods()[first..] {
            let Some(part) = span.interval().intersection(&window) else {
                if span.start() >= window.end() {
                    break;
                }
                continue;
            };
            if let (Some(lo), Some(hi)) = (part.start().timestamp(), part.end().timestamp()) {
                found.extend(span.owner().open_periods_between(lo, hi));
            }
        }
        found
    }
}
