//! Day-granular partition of a horizon among a base schedule and children.

use std::fmt::Display;

use chrono::{Days, NaiveDate};
use tracing::{debug, trace};

use super::config::PartitionConfig;
use crate::error::HoursError;
use crate::interval::Endpoint;

/// A child schedule restricted to a date range.
///
/// `start: None` reaches back before the reference date; `end: None` runs to
/// the end of the partition (see [`Partitioner::partition`]). The fields are
/// public; a hand-built child with `start > end` is skipped by the partitioner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChildSchedule<S> {
    pub schedule: S,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl<S> ChildSchedule<S> {
    /// # Errors
    ///
    /// Returns [`HoursError::InvertedInterval`] if both bounds are given and
    /// `start > end`.
    pub fn new(
        schedule: S,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Self, HoursError> {
        if let (Some(start), Some(end)) = (start, end) {
            if start > end {
                return Err(HoursError::InvertedInterval {
                    start: Endpoint::start_of(start),
                    end: Endpoint::start_of(end),
                });
            }
        }
        Ok(Self {
            schedule,
            start,
            end,
        })
    }

    /// A child covering `[start, end]`, both inclusive.
    pub fn between(schedule: S, start: NaiveDate, end: NaiveDate) -> Result<Self, HoursError> {
        Self::new(schedule, Some(start), Some(end))
    }
}

/// One day range `[start, end]` (inclusive) assigned to `schedule`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PartitionEntry<S> {
    pub schedule: S,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl<S> PartitionEntry<S> {
    pub fn new(schedule: S, start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            schedule,
            start,
            end,
        }
    }

    /// Returns true if `date` ∈ `[start, end]`.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Number of days covered, both ends included.
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}

impl<S: Display> Display for PartitionEntry<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} [{}, {}]", self.schedule, self.start, self.end)
    }
}

/// Assigns the days of a horizon to a base schedule or its children.
#[derive(Debug, Clone, Copy, Default)]
pub struct Partitioner {
    config: PartitionConfig,
}

impl Partitioner {
    pub fn new(config: PartitionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PartitionConfig {
        &self.config
    }

    /// Partitions `[reference, horizon end]` among `base` and `children`.
    ///
    /// 1. Children that ended before `reference`, start after the horizon end
    ///    or have `start > end` are dropped.
    /// 2. Child starts are moved up to `reference` (a missing start counts as
    ///    `reference`).
    /// 3. Missing ends become the latest explicit end among the remaining
    ///    children, or the horizon end if there is none (or if that end would
    ///    fall before the child's own start).
    /// 4. Children are ordered by start; ties keep their input order.
    /// 5. Days before the first child and gaps of at least one whole day after
    ///    each child (up to the next child or the horizon end) go to `base`.
    ///
    /// Overlapping children are passed through as they are: the output then
    /// contains overlapping entries.
    pub fn partition<S: Clone>(
        &self,
        base: &S,
        children: &[ChildSchedule<S>],
        reference: NaiveDate,
    ) -> Vec<PartitionEntry<S>> {
        let horizon_end = self.config.horizon_end(reference);

        // (child, effective start) for every child overlapping the horizon
        let current: Vec<(&ChildSchedule<S>, NaiveDate)> = children
            .iter()
            .map(|child| (child, child.start.map_or(reference, |s| s.max(reference))))
            .filter(|(child, start)| {
                *start <= horizon_end && child.end.map_or(true, |end| end >= *start)
            })
            .collect();
        let dropped = children.len() - current.len();
        if dropped > 0 {
            debug!(dropped, %reference, %horizon_end, "ignoring child schedules outside the horizon");
        }

        if current.is_empty() {
            return vec![PartitionEntry::new(base.clone(), reference, horizon_end)];
        }

        let latest_end = current.iter().filter_map(|(child, _)| child.end).max();

        let mut entries: Vec<PartitionEntry<S>> = current
            .into_iter()
            .map(|(child, start)| {
                let end = child.end.unwrap_or_else(|| match latest_end {
                    Some(latest) if latest >= start => latest,
                    _ => horizon_end,
                });
                PartitionEntry::new(child.schedule.clone(), start, end)
            })
            .collect();
        entries.sort_by_key(|entry| entry.start);

        let mut partition = Vec::with_capacity(entries.len() * 2 + 1);

        if let Some(first) = entries.first() {
            if first.start > reference {
                if let Some(last_base_day) = day_before(first.start) {
                    trace!(start = %reference, end = %last_base_day, "base before first child");
                    partition.push(PartitionEntry::new(base.clone(), reference, last_base_day));
                }
            }
        }

        for (i, entry) in entries.iter().enumerate() {
            partition.push(entry.clone());

            let next_start = match entries.get(i + 1) {
                Some(next) => Some(next.start),
                None => day_after(horizon_end),
            };
            let filler = match next_start {
                Some(next_start) => gap_between(entry.end, next_start),
                // Horizon ends on the last representable date
                None => day_after(entry.end)
                    .filter(|first| *first <= horizon_end)
                    .map(|first| (first, horizon_end)),
            };
            if let Some((start, end)) = filler {
                trace!(%start, %end, "base fills gap");
                partition.push(PartitionEntry::new(base.clone(), start, end));
            }
        }

        debug!(
            children = entries.len(),
            entries = partition.len(),
            %reference,
            %horizon_end,
            "partitioned schedules"
        );
        partition
    }
}

/// Partitions with the default one-year horizon.
pub fn partition<S: Clone>(
    base: &S,
    children: &[ChildSchedule<S>],
    reference: NaiveDate,
) -> Vec<PartitionEntry<S>> {
    Partitioner::default().partition(base, children, reference)
}

/// The whole days strictly between `end` and `next_start`, if there is at
/// least one.
fn gap_between(end: NaiveDate, next_start: NaiveDate) -> Option<(NaiveDate, NaiveDate)> {
    if (next_start - end).num_days() <= 1 {
        return None;
    }
    Some((day_after(end)?, day_before(next_start)?))
}

fn day_after(date: NaiveDate) -> Option<NaiveDate> {
    date.checked_add_days(Days::new(1))
}

fn day_before(date: NaiveDate) -> Option<NaiveDate> {
    date.checked_sub_days(Days::new(1))
}
