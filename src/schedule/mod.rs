//! Named schedules: a specification tree with a stable identity.
//!
//! A venue usually has one main schedule and several date-ranged child
//! schedules (summer hours, renovation weeks). The partitioner decides which
//! of them applies on each day; each schedule resolves its own tree.

use chrono::{Days, NaiveDate};

use crate::error::HoursError;
use crate::interval::Endpoint;
use crate::partition::ChildSchedule;
use crate::query::OpeningQuery;
use crate::spec::SpecEntry;
use crate::validity::{resolve, ValiditySequence};
use crate::{generate_id, Id};

/// A specification tree with an id and a display name.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleSet {
    id: Id,
    name: String,
    spec: SpecEntry,
}

impl ScheduleSet {
    /// Creates a schedule with a freshly generated id.
    pub fn new(name: impl Into<String>, spec: SpecEntry) -> Self {
        Self::with_id(generate_id(), name, spec)
    }

    pub fn with_id(id: impl Into<Id>, name: impl Into<String>, spec: SpecEntry) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            spec,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn spec(&self) -> &SpecEntry {
        &self.spec
    }

    /// Resolves the schedule's tree.
    pub fn resolve(&self) -> ValiditySequence<&SpecEntry> {
        resolve(&self.spec)
    }

    pub fn query(&self) -> OpeningQuery<'_> {
        OpeningQuery::new(&self.spec)
    }

    /// First and last calendar day covered by the root's own bounds.
    ///
    /// An unbounded side yields `None`. The end bound is exclusive, so a set
    /// ending at midnight covers up to the day before.
    pub fn date_bounds(&self) -> (Option<NaiveDate>, Option<NaiveDate>) {
        let interval = self.spec.validity_interval();
        let first = interval.start().timestamp().map(|t| t.date());
        let last = match self.spec {
            SpecEntry::RecurringPeriods(ref rp) => last_covered_day(rp.end()),
            _ => last_covered_day(interval.end()),
        };
        (first, last)
    }

    /// Describes this schedule as a date-ranged child for the partitioner.
    ///
    /// # Errors
    ///
    /// Returns [`HoursError::InvertedInterval`] for a schedule whose bounds
    /// cover no whole day, e.g. one starting and ending at the same midnight.
    pub fn as_child(&self) -> Result<ChildSchedule<&ScheduleSet>, HoursError> {
        let (start, end) = self.date_bounds();
        ChildSchedule::new(self, start, end)
    }
}

/// Last calendar day a span with exclusive `end` reaches into.
pub(crate) fn last_covered_day(end: Endpoint) -> Option<NaiveDate> {
    let at = end.timestamp()?;
    if at.time() == chrono::NaiveTime::MIN {
        at.date().checked_sub_days(Days::new(1))
    } else {
        Some(at.date())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::{Holiday, RecurringPeriod, RecurringPeriods};

    fn d(text: &str) -> NaiveDate {
        NaiveDate::parse_from_str(text, "%Y-%m-%d").unwrap()
    }

    fn summer() -> SpecEntry {
        RecurringPeriods::new(
            Endpoint::start_of(d("2018-06-01")),
            Endpoint::start_of(d("2018-09-01")),
            vec![RecurringPeriod::from_parts("10:00", 10 * 3600, 5).unwrap()],
            Vec::new(),
        )
        .unwrap()
        .into()
    }

    #[test]
    fn test_generated_ids_are_unique() {
        let a = ScheduleSet::new("Main", summer());
        let b = ScheduleSet::new("Main", summer());
        assert_ne!(a.id(), b.id());
        assert_eq!(a.name(), "Main");
    }

    #[test]
    fn test_with_id() {
        let set = ScheduleSet::with_id("42", "Summer", summer());
        assert_eq!(set.id(), "42");
        assert_eq!(set.spec().kind(), crate::spec::EntryKind::RecurringPeriods);
    }

    #[test]
    fn test_date_bounds_exclusive_end() {
        let set = ScheduleSet::with_id("s", "Summer", summer());
        assert_eq!(set.date_bounds(), (Some(d("2018-06-01")), Some(d("2018-08-31"))));
        let child = set.as_child().unwrap();
        assert_eq!(child.start, Some(d("2018-06-01")));
        assert_eq!(child.end, Some(d("2018-08-31")));
        assert_eq!(child.schedule.id(), "s");
    }

    #[test]
    fn test_empty_schedule_is_not_a_child() {
        let spec = RecurringPeriods::new(
            Endpoint::start_of(d("2018-06-01")),
            Endpoint::start_of(d("2018-06-01")),
            Vec::new(),
            Vec::new(),
        )
        .unwrap();
        let set = ScheduleSet::with_id("e", "Empty", spec.into());
        assert!(matches!(set.as_child(), Err(HoursError::InvertedInterval { .. })));
    }

    #[test]
    fn test_date_bounds_unbounded() {
        let set = ScheduleSet::with_id("m", "Main", RecurringPeriods::unbounded(Vec::new()).into());
        assert_eq!(set.date_bounds(), (None, None));
    }

    #[test]
    fn test_resolve_delegates() {
        let spec: SpecEntry = RecurringPeriods::unbounded(Vec::new())
            .with_child(Holiday::for_dates("Off", d("2018-05-01"), d("2018-05-01")).unwrap())
            .into();
        let set = ScheduleSet::with_id("m", "Main", spec);
        assert_eq!(set.resolve().len(), 3);
        assert!(!set
            .query()
            .is_open_at(d("2018-05-01").and_hms_opt(12, 0, 0).unwrap()));
    }
}
