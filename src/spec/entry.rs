//! Nodes of the opening-hours specification tree.

use std::cmp::Reverse;

use chrono::{Datelike, Days, NaiveDate, NaiveDateTime, NaiveTime};
use tracing::trace;

use super::period::{Period, RecurringPeriod};
use crate::error::HoursError;
use crate::interval::{Endpoint, Interval};
use crate::validity::ValidityPeriod;

/// Discriminator of a [`SpecEntry`], as written in serialized records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    RecurringPeriods,
    Holiday,
    DayOverride,
}

impl EntryKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            EntryKind::RecurringPeriods => "recurringPeriods",
            EntryKind::Holiday => "holiday",
            EntryKind::DayOverride => "dayOverride",
        }
    }
}

impl std::str::FromStr for EntryKind {
    type Err = HoursError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "recurringPeriods" => Ok(EntryKind::RecurringPeriods),
            "holiday" => Ok(EntryKind::Holiday),
            "dayOverride" => Ok(EntryKind::DayOverride),
            other => Err(HoursError::UnknownKind(other.to_string())),
        }
    }
}

impl std::fmt::Display for EntryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A node of the specification tree.
///
/// - **RecurringPeriods**: weekly periods valid within `[start, end)`, may
///   nest further entries that override it
/// - **Holiday**: closed for a date range
/// - **DayOverride**: explicit periods replacing a single day
///
/// Children are owned by their parent; the tree has no back-references and is
/// never mutated after construction.
#[derive(Debug, Clone, PartialEq)]
pub enum SpecEntry {
    RecurringPeriods(RecurringPeriods),
    Holiday(Holiday),
    DayOverride(DayOverride),
}

/// Weekly periods bounded by `[start, end)`, with nested overrides.
#[derive(Debug, Clone, PartialEq)]
pub struct RecurringPeriods {
    start: Endpoint,
    end: Endpoint,
    periods: Vec<RecurringPeriod>,
    children: Vec<SpecEntry>,
}

/// A closure for the date range `[start, end)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Holiday {
    name: String,
    start: NaiveDateTime,
    end: NaiveDateTime,
}

/// Explicit periods for one calendar day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayOverride {
    name: String,
    date: NaiveDate,
    periods: Vec<Period>,
}

// ─────────────────────────────────────────────────────────────────────
// RecurringPeriods
// ─────────────────────────────────────────────────────────────────────

impl RecurringPeriods {
    /// # Errors
    ///
    /// Returns [`HoursError::InvertedInterval`] if `start > end`.
    pub fn new(
        start: Endpoint,
        end: Endpoint,
        periods: Vec<RecurringPeriod>,
        children: Vec<SpecEntry>,
    ) -> Result<Self, HoursError> {
        if start > end {
            return Err(HoursError::InvertedInterval { start, end });
        }
        Ok(Self {
            start,
            end,
            periods,
            children,
        })
    }

    /// Periods valid for all time, without children.
    pub fn unbounded(periods: Vec<RecurringPeriod>) -> Self {
        Self {
            start: Endpoint::NegInf,
            end: Endpoint::PosInf,
            periods,
            children: Vec::new(),
        }
    }

    /// Appends a child entry.
    pub fn with_child(mut self, child: impl Into<SpecEntry>) -> Self {
        self.children.push(child.into());
        self
    }

    pub const fn start(&self) -> Endpoint {
        self.start
    }

    pub const fn end(&self) -> Endpoint {
        self.end
    }

    pub fn periods(&self) -> &[RecurringPeriod] {
        &self.periods
    }

    pub fn children(&self) -> &[SpecEntry] {
        &self.children
    }

    /// Validity `[start, end)`, stretched to the end of a period that is
    /// still running at `end`.
    pub fn validity_interval(&self) -> Interval {
        let end = match self.end {
            Endpoint::At(at) => self
                .periods_active_at(at)
                .iter()
                .map(|p| Endpoint::At(p.end()))
                .max()
                .map_or(self.end, |overhang| overhang.max(self.end)),
            other => other,
        };
        Interval::from_ordered(self.start, end)
    }

    /// Whether a period starting at `start` belongs to this set's bounds.
    fn owns_start(&self, start: NaiveDateTime) -> bool {
        let at = Endpoint::At(start);
        self.start <= at && at < self.end
    }

    fn max_spill_days(&self) -> i64 {
        self.periods
            .iter()
            .map(RecurringPeriod::spill_days)
            .max()
            .unwrap_or(0)
    }

    /// Periods running at `instant`, sorted by start.
    pub fn periods_active_at(&self, instant: NaiveDateTime) -> Vec<Period> {
        let mut active = Vec::new();
        for back in 0..=self.max_spill_days() {
            let Some(date) = instant.date().checked_sub_days(Days::new(back as u64)) else {
                break;
            };
            active.extend(
                self.materialize_on(date)
                    .filter(|p| p.contains(instant) && self.owns_start(p.start())),
            );
        }
        active.sort();
        active
    }

    /// Periods whose start lies in `[from, to)`, sorted by start.
    pub fn open_periods_between(&self, from: NaiveDateTime, to: NaiveDateTime) -> Vec<Period> {
        if from >= to {
            return Vec::new();
        }
        let last = to.date();
        let mut found: Vec<Period> = from
            .date()
            .iter_days()
            .take_while(|date| *date <= last)
            .flat_map(|date| self.materialize_on(date))
            .filter(|p| from <= p.start() && p.start() < to && self.owns_start(p.start()))
            .collect();
        found.sort();
        found
    }

    fn materialize_on(&self, date: NaiveDate) -> impl Iterator<Item = Period> + '_ {
        self.periods
            .iter()
            .filter(move |rp| rp.weekday() == date.weekday())
            // Weekday matches and durations are bounded to a week, so this only
            // fails for a period ending past the last representable date.
            .filter_map(move |rp| match rp.materialize(date) {
                Ok(period) => Some(period),
                Err(err) => {
                    trace!(%date, %err, "skipping unrepresentable period");
                    None
                }
            })
    }
}

// ─────────────────────────────────────────────────────────────────────
// Holiday
// ─────────────────────────────────────────────────────────────────────

impl Holiday {
    /// # Errors
    ///
    /// Returns [`HoursError::InvertedInterval`] if `start > end`.
    pub fn new(
        name: impl Into<String>,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Self, HoursError> {
        if start > end {
            return Err(HoursError::InvertedInterval {
                start: Endpoint::At(start),
                end: Endpoint::At(end),
            });
        }
        Ok(Self {
            name: name.into(),
            start,
            end,
        })
    }

    /// Whole days from `first` through `last` inclusive.
    pub fn for_dates(
        name: impl Into<String>,
        first: NaiveDate,
        last: NaiveDate,
    ) -> Result<Self, HoursError> {
        let end = last
            .checked_add_days(Days::new(1))
            .ok_or_else(|| HoursError::InvalidTimestamp(last.to_string()))?;
        Self::new(
            name,
            first.and_time(NaiveTime::MIN),
            end.and_time(NaiveTime::MIN),
        )
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub const fn start(&self) -> NaiveDateTime {
        self.start
    }

    pub const fn end(&self) -> NaiveDateTime {
        self.end
    }

    pub fn validity_interval(&self) -> Interval {
        Interval::from_ordered(Endpoint::At(self.start), Endpoint::At(self.end))
    }
}

// ─────────────────────────────────────────────────────────────────────
// DayOverride
// ─────────────────────────────────────────────────────────────────────

impl DayOverride {
    pub fn new(name: impl Into<String>, date: NaiveDate, periods: Vec<Period>) -> Self {
        Self {
            name: name.into(),
            date,
            periods,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub const fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn periods(&self) -> &[Period] {
        &self.periods
    }

    /// `[date 00:00, max(date + 1 day, latest period end))`.
    pub fn validity_interval(&self) -> Interval {
        let start = self.date.and_time(NaiveTime::MIN);
        let day_end = self
            .date
            .checked_add_days(Days::new(1))
            .map_or(Endpoint::PosInf, Endpoint::start_of);
        let end = self
            .periods
            .iter()
            .map(|p| Endpoint::At(p.end()))
            .fold(day_end, Endpoint::max);
        Interval::from_ordered(Endpoint::At(start), end)
    }

    pub fn periods_active_at(&self, instant: NaiveDateTime) -> Vec<Period> {
        let mut active: Vec<Period> = self
            .periods
            .iter()
            .filter(|p| p.contains(instant))
            .copied()
            .collect();
        active.sort();
        active
    }

    pub fn open_periods_between(&self, from: NaiveDateTime, to: NaiveDateTime) -> Vec<Period> {
        let mut found: Vec<Period> = self
            .periods
            .iter()
            .filter(|p| from <= p.start() && p.start() < to)
            .copied()
            .collect();
        found.sort();
        found
    }
}

// ─────────────────────────────────────────────────────────────────────
// SpecEntry
// ─────────────────────────────────────────────────────────────────────

impl SpecEntry {
    pub const fn kind(&self) -> EntryKind {
        match self {
            SpecEntry::RecurringPeriods(_) => EntryKind::RecurringPeriods,
            SpecEntry::Holiday(_) => EntryKind::Holiday,
            SpecEntry::DayOverride(_) => EntryKind::DayOverride,
        }
    }

    /// Display name of holidays and day overrides.
    pub fn name(&self) -> Option<&str> {
        match self {
            SpecEntry::RecurringPeriods(_) => None,
            SpecEntry::Holiday(h) => Some(h.name()),
            SpecEntry::DayOverride(o) => Some(o.name()),
        }
    }

    /// Nested entries; always empty for holidays and day overrides.
    pub fn children(&self) -> &[SpecEntry] {
        match self {
            SpecEntry::RecurringPeriods(rp) => rp.children(),
            SpecEntry::Holiday(_) | SpecEntry::DayOverride(_) => &[],
        }
    }

    /// The span this entry governs on its own.
    pub fn validity_interval(&self) -> Interval {
        match self {
            SpecEntry::RecurringPeriods(rp) => rp.validity_interval(),
            SpecEntry::Holiday(h) => h.validity_interval(),
            SpecEntry::DayOverride(o) => o.validity_interval(),
        }
    }

    /// [`validity_interval`](Self::validity_interval) tagged with this entry.
    pub fn validity_period(&self) -> ValidityPeriod<&SpecEntry> {
        ValidityPeriod::from_interval(self.validity_interval(), self)
    }

    /// This entry's own periods running at `instant`, sorted by start.
    pub fn periods_active_at(&self, instant: NaiveDateTime) -> Vec<Period> {
        match self {
            SpecEntry::RecurringPeriods(rp) => rp.periods_active_at(instant),
            SpecEntry::Holiday(_) => Vec::new(),
            SpecEntry::DayOverride(o) => o.periods_active_at(instant),
        }
    }

    /// This entry's own periods starting within `[from, to)`, sorted by start.
    pub fn open_periods_between(&self, from: NaiveDateTime, to: NaiveDateTime) -> Vec<Period> {
        match self {
            SpecEntry::RecurringPeriods(rp) => rp.open_periods_between(from, to),
            SpecEntry::Holiday(_) => Vec::new(),
            SpecEntry::DayOverride(o) => o.open_periods_between(from, to),
        }
    }

    /// Shortens a following span while one of this entry's periods is still
    /// running at its start.
    ///
    /// Among the periods active at `covered.start()`, the earliest-starting one
    /// wins; the result is `[that period's end, covered.end())` with the
    /// original owner. Without an active period (always the case for holidays)
    /// `covered` comes back unchanged.
    pub fn transform_covering_period<O: Clone>(
        &self,
        covered: &ValidityPeriod<O>,
    ) -> ValidityPeriod<O> {
        let Some(at) = covered.start().timestamp() else {
            return covered.clone();
        };
        let covering = self
            .periods_active_at(at)
            .into_iter()
            .min_by_key(|p| (p.start(), Reverse(p.end())));
        match covering {
            Some(period) => {
                let start = Endpoint::At(period.end()).min(covered.end());
                ValidityPeriod::from_interval(
                    Interval::from_ordered(start, covered.end()),
                    covered.owner().clone(),
                )
            }
            None => covered.clone(),
        }
    }
}

impl From<RecurringPeriods> for SpecEntry {
    fn from(entry: RecurringPeriods) -> Self {
        SpecEntry::RecurringPeriods(entry)
    }
}

impl From<Holiday> for SpecEntry {
    fn from(entry: Holiday) -> Self {
        SpecEntry::Holiday(entry)
    }
}

impl From<DayOverride> for SpecEntry {
    fn from(entry: DayOverride) -> Self {
        SpecEntry::DayOverride(entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(text: &str) -> NaiveDate {
        NaiveDate::parse_from_str(text, "%Y-%m-%d").unwrap()
    }

    fn dt(text: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M").unwrap()
    }

    fn at(text: &str) -> Endpoint {
        Endpoint::At(dt(text))
    }

    fn period(start: &str, end: &str) -> Period {
        Period::new(dt(start), dt(end)).unwrap()
    }

    /// Mon–Fri 13:00–17:00 plus Wed 22:00–Thu 05:00.
    fn weekly() -> Vec<RecurringPeriod> {
        let mut periods: Vec<RecurringPeriod> = (0..5)
            .map(|w| RecurringPeriod::from_parts("13:00", 4 * 3600, w).unwrap())
            .collect();
        periods.push(RecurringPeriod::from_parts("22:00", 7 * 3600, 2).unwrap());
        periods
    }

    #[test]
    fn test_kinds_and_children() {
        let holiday = Holiday::for_dates("Christmas", d("2016-12-24"), d("2016-12-26")).unwrap();
        let root = RecurringPeriods::unbounded(weekly()).with_child(holiday);
        let entry = SpecEntry::from(root);
        assert_eq!(entry.kind(), EntryKind::RecurringPeriods);
        assert_eq!(entry.children().len(), 1);
        assert_eq!(entry.children()[0].kind(), EntryKind::Holiday);
        assert_eq!(entry.children()[0].name(), Some("Christmas"));
        assert!(entry.children()[0].children().is_empty());
    }

    #[test]
    fn test_kind_strings() {
        for kind in [
            EntryKind::RecurringPeriods,
            EntryKind::Holiday,
            EntryKind::DayOverride,
        ] {
            assert_eq!(kind.as_str().parse::<EntryKind>().unwrap(), kind);
        }
        assert_eq!(
            "weekly".parse::<EntryKind>(),
            Err(HoursError::UnknownKind("weekly".to_string()))
        );
    }

    #[test]
    fn test_recurring_periods_inverted_bounds() {
        let result = RecurringPeriods::new(
            at("2016-02-01 00:00"),
            at("2016-01-01 00:00"),
            weekly(),
            Vec::new(),
        );
        assert!(matches!(result, Err(HoursError::InvertedInterval { .. })));
    }

    #[test]
    fn test_holiday_validity_is_exact() {
        let holiday = Holiday::new("Fair", dt("2016-01-13 12:00"), dt("2016-01-15 09:00")).unwrap();
        let entry = SpecEntry::from(holiday);
        let vp = entry.validity_period();
        assert_eq!(vp.start(), at("2016-01-13 12:00"));
        assert_eq!(vp.end(), at("2016-01-15 09:00"));
        assert!(std::ptr::eq(*vp.owner(), &entry));
    }

    #[test]
    fn test_holiday_for_dates_is_inclusive() {
        let holiday = Holiday::for_dates("Break", d("2016-01-13"), d("2016-01-14")).unwrap();
        assert_eq!(holiday.start(), dt("2016-01-13 00:00"));
        assert_eq!(holiday.end(), dt("2016-01-15 00:00"));
    }

    #[test]
    fn test_day_override_validity_whole_day() {
        let o = DayOverride::new(
            "Short day",
            d("2016-01-13"),
            vec![period("2016-01-13 10:00", "2016-01-13 12:00")],
        );
        let interval = o.validity_interval();
        assert_eq!(interval.start(), at("2016-01-13 00:00"));
        assert_eq!(interval.end(), at("2016-01-14 00:00"));
    }

    #[test]
    fn test_day_override_validity_extends_past_midnight() {
        let o = DayOverride::new(
            "Late night",
            d("2016-01-13"),
            vec![period("2016-01-13 22:00", "2016-01-14 05:00")],
        );
        let interval = o.validity_interval();
        assert_eq!(interval.start(), at("2016-01-13 00:00"));
        assert_eq!(interval.end(), at("2016-01-14 05:00"));
    }

    #[test]
    fn test_day_override_without_periods() {
        let o = DayOverride::new("Closed", d("2016-01-13"), Vec::new());
        assert_eq!(o.validity_interval().end(), at("2016-01-14 00:00"));
        assert!(o.periods_active_at(dt("2016-01-13 12:00")).is_empty());
    }

    #[test]
    fn test_recurring_validity_plain() {
        let rp = RecurringPeriods::new(
            at("2016-01-01 00:00"),
            at("2016-01-13 12:00"),
            weekly(),
            Vec::new(),
        )
        .unwrap();
        // Wed 2016-01-13 12:00: nothing running yet
        assert_eq!(rp.validity_interval().end(), at("2016-01-13 12:00"));
    }

    #[test]
    fn test_recurring_validity_extended_by_running_period() {
        let rp = RecurringPeriods::new(
            at("2016-01-01 00:00"),
            at("2016-01-14 00:00"),
            weekly(),
            Vec::new(),
        )
        .unwrap();
        // Wed 22:00 – Thu 05:00 is running at the bound
        assert_eq!(rp.validity_interval().end(), at("2016-01-14 05:00"));
    }

    #[test]
    fn test_recurring_validity_not_extended_by_period_starting_at_end() {
        let rp = RecurringPeriods::new(
            at("2016-01-01 00:00"),
            at("2016-01-13 13:00"),
            weekly(),
            Vec::new(),
        )
        .unwrap();
        assert_eq!(rp.validity_interval().end(), at("2016-01-13 13:00"));
    }

    #[test]
    fn test_recurring_unbounded_validity() {
        let rp = RecurringPeriods::unbounded(weekly());
        assert_eq!(rp.validity_interval(), Interval::unbounded());
    }

    #[test]
    fn test_periods_active_at_looks_back_over_midnight() {
        let rp = RecurringPeriods::unbounded(weekly());
        let active = rp.periods_active_at(dt("2016-01-14 02:00"));
        assert_eq!(active, vec![period("2016-01-13 22:00", "2016-01-14 05:00")]);
        assert!(rp.periods_active_at(dt("2016-01-14 06:00")).is_empty());
        assert_eq!(
            rp.periods_active_at(dt("2016-01-14 13:00")),
            vec![period("2016-01-14 13:00", "2016-01-14 17:00")]
        );
    }

    #[test]
    fn test_week_long_period_extends_validity() {
        let monday_week =
            RecurringPeriod::from_parts("00:00", crate::spec::MAX_RECURRING_DURATION_SECS, 0)
                .unwrap();
        let rp = RecurringPeriods::new(
            at("2017-12-01 00:00"),
            at("2018-01-03 00:00"),
            vec![monday_week],
            Vec::new(),
        )
        .unwrap();
        assert_eq!(rp.validity_interval().end(), at("2018-01-08 00:00"));
    }

    #[test]
    fn test_periods_active_at_first_representable_day() {
        let rp = RecurringPeriods::unbounded(weekly());
        let active = rp.periods_active_at(NaiveDate::MIN.and_time(NaiveTime::MIN));
        assert!(active.len() <= 1);
    }

    #[test]
    fn test_unrepresentable_period_is_skipped() {
        let weekday = i64::from(NaiveDate::MAX.weekday().num_days_from_monday());
        let short = RecurringPeriod::from_parts("00:00", 3600, weekday).unwrap();
        let overflowing = RecurringPeriod::from_parts("12:00", 86_400, weekday).unwrap();
        let rp = RecurringPeriods::unbounded(vec![short, overflowing]);

        let active = rp.periods_active_at(NaiveDate::MAX.and_hms_opt(0, 30, 0).unwrap());
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].start(), NaiveDate::MAX.and_time(NaiveTime::MIN));
        assert!(rp
            .periods_active_at(NaiveDate::MAX.and_hms_opt(13, 0, 0).unwrap())
            .is_empty());
    }

    #[test]
    fn test_periods_active_at_respects_bounds() {
        let rp = RecurringPeriods::new(
            at("2016-01-14 00:00"),
            Endpoint::PosInf,
            weekly(),
            Vec::new(),
        )
        .unwrap();
        // The Wednesday night period started before the set begins
        assert!(rp.periods_active_at(dt("2016-01-14 02:00")).is_empty());
    }

    #[test]
    fn test_open_periods_between() {
        let rp = RecurringPeriods::unbounded(weekly());
        let found = rp.open_periods_between(dt("2016-01-13 00:00"), dt("2016-01-14 00:00"));
        assert_eq!(
            found,
            vec![
                period("2016-01-13 13:00", "2016-01-13 17:00"),
                period("2016-01-13 22:00", "2016-01-14 05:00"),
            ]
        );
        let weekend = rp.open_periods_between(dt("2016-01-16 00:00"), dt("2016-01-18 00:00"));
        assert!(weekend.is_empty());
        assert!(rp
            .open_periods_between(dt("2016-01-14 00:00"), dt("2016-01-13 00:00"))
            .is_empty());
    }

    #[test]
    fn test_transform_covering_period_pushes_start() {
        let base = SpecEntry::from(RecurringPeriods::unbounded(weekly()));
        let holiday =
            SpecEntry::from(Holiday::for_dates("Day off", d("2016-01-14"), d("2016-01-14")).unwrap());
        let covered = holiday.validity_period();
        let transformed = base.transform_covering_period(&covered);
        assert_eq!(transformed.start(), at("2016-01-14 05:00"));
        assert_eq!(transformed.end(), at("2016-01-15 00:00"));
        assert!(std::ptr::eq(*transformed.owner(), &holiday));
    }

    #[test]
    fn test_transform_covering_period_identity() {
        let base = SpecEntry::from(RecurringPeriods::unbounded(weekly()));
        let holiday =
            SpecEntry::from(Holiday::for_dates("Day off", d("2016-01-15"), d("2016-01-15")).unwrap());
        let covered = holiday.validity_period();
        assert_eq!(base.transform_covering_period(&covered), covered);
        // Holidays never pre-empt anything
        let other = base.validity_period();
        assert_eq!(holiday.transform_covering_period(&other), other);
    }

    #[test]
    fn test_transform_covering_period_clamps_to_end() {
        let base = SpecEntry::from(RecurringPeriods::unbounded(weekly()));
        let short = SpecEntry::from(
            Holiday::new("Hour", dt("2016-01-14 00:00"), dt("2016-01-14 01:00")).unwrap(),
        );
        let transformed = base.transform_covering_period(&short.validity_period());
        assert!(transformed.interval().is_empty());
        assert_eq!(transformed.start(), at("2016-01-14 01:00"));
    }
}
