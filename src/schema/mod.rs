//! schema.org `OpeningHoursSpecification` records from a schedule partition.
//!
//! Each partition entry contributes the weekly hours of its schedule, valid
//! over the entry's days, followed by one record per holiday or day override
//! falling inside those days. Holidays and empty overrides are emitted as
//! closed records (no weekdays, `opens == closes == 00:00:00`). A period
//! lasting whole days closes one second before it opens, so an all-day
//! period reads `00:00:00`–`23:59:59`.

use chrono::{NaiveDate, NaiveTime, TimeDelta, Weekday};
use tracing::debug;

use crate::interval::Endpoint;
use crate::partition::PartitionEntry;
use crate::schedule::{last_covered_day, ScheduleSet};
use crate::spec::{RecurringPeriod, SpecEntry};

/// One schema.org opening-hours record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpeningHoursSpecification {
    pub name: Option<String>,
    /// Empty for date-bound records (holidays, day overrides).
    pub day_of_week: Vec<Weekday>,
    pub opens: NaiveTime,
    pub closes: NaiveTime,
    pub valid_from: NaiveDate,
    pub valid_through: NaiveDate,
}

impl OpeningHoursSpecification {
    /// A record stating the venue is closed on `[from, through]`.
    pub fn closed(name: Option<String>, from: NaiveDate, through: NaiveDate) -> Self {
        Self {
            name,
            day_of_week: Vec::new(),
            opens: NaiveTime::MIN,
            closes: NaiveTime::MIN,
            valid_from: from,
            valid_through: through,
        }
    }

    /// True for records built by [`closed`](Self::closed): date-bound, with
    /// both times at midnight.
    pub fn is_closed(&self) -> bool {
        self.day_of_week.is_empty() && self.opens == NaiveTime::MIN && self.closes == NaiveTime::MIN
    }
}

/// Full schema.org URL of a day, e.g. `https://schema.org/Monday`.
pub fn day_of_week_url(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "https://schema.org/Monday",
        Weekday::Tue => "https://schema.org/Tuesday",
        Weekday::Wed => "https://schema.org/Wednesday",
        Weekday::Thu => "https://schema.org/Thursday",
        Weekday::Fri => "https://schema.org/Friday",
        Weekday::Sat => "https://schema.org/Saturday",
        Weekday::Sun => "https://schema.org/Sunday",
    }
}

/// Emits the records for every entry of `partition`, in partition order.
pub fn opening_hours_specifications(
    partition: &[PartitionEntry<&ScheduleSet>],
) -> Vec<OpeningHoursSpecification> {
    let mut records = Vec::new();
    for entry in partition {
        let (first, last) = entry.schedule.date_bounds();
        let Some((from, through)) = narrow(entry.start, entry.end, first, last) else {
            continue;
        };
        emit(entry.schedule.spec(), from, through, &mut records);
    }
    debug!(
        partition = partition.len(),
        records = records.len(),
        "emitted opening hours specifications"
    );
    records
}

fn emit(
    entry: &SpecEntry,
    from: NaiveDate,
    through: NaiveDate,
    records: &mut Vec<OpeningHoursSpecification>,
) {
    match entry {
        SpecEntry::RecurringPeriods(set) => {
            let first = set.start().timestamp().map(|t| t.date());
            let last = last_covered_day(set.end());
            let Some((from, through)) = narrow(from, through, first, last) else {
                return;
            };
            records.extend(weekly_records(set.periods(), from, through));
            for child in set.children() {
                emit(child, from, through, records);
            }
        }
        SpecEntry::Holiday(holiday) => {
            let first = holiday.start().date();
            let last = last_covered_day(Endpoint::At(holiday.end())).unwrap_or(first);
            if let Some((from, through)) = narrow(from, through, Some(first), Some(last)) {
                records.push(OpeningHoursSpecification::closed(
                    Some(holiday.name().to_string()),
                    from,
                    through,
                ));
            }
        }
        SpecEntry::DayOverride(day) => {
            let date = day.date();
            if date < from || date > through {
                return;
            }
            let name = Some(day.name().to_string());
            if day.periods().is_empty() {
                records.push(OpeningHoursSpecification::closed(name, date, date));
                return;
            }
            records.extend(day.periods().iter().map(|p| {
                let opens = p.start().time();
                let open_secs = (p.end() - p.start()).num_seconds();
                OpeningHoursSpecification {
                    name: name.clone(),
                    day_of_week: Vec::new(),
                    opens,
                    closes: closing_time(opens, p.end().time(), open_secs),
                    valid_from: date,
                    valid_through: date,
                }
            }));
        }
    }
}

/// Groups weekly periods sharing opening and closing times, in order of first
/// appearance.
fn weekly_records(
    periods: &[RecurringPeriod],
    from: NaiveDate,
    through: NaiveDate,
) -> Vec<OpeningHoursSpecification> {
    let mut records: Vec<OpeningHoursSpecification> = Vec::new();
    for period in periods {
        let opens = period.start_time();
        let closes = closing_time(opens, period.end_time(), period.secs());
        match records
            .iter_mut()
            .find(|r| r.opens == opens && r.closes == closes)
        {
            Some(record) => {
                if !record.day_of_week.contains(&period.weekday()) {
                    record.day_of_week.push(period.weekday());
                }
            }
            None => records.push(OpeningHoursSpecification {
                name: None,
                day_of_week: vec![period.weekday()],
                opens,
                closes,
                valid_from: from,
                valid_through: through,
            }),
        }
    }
    for record in &mut records {
        record.day_of_week.sort_by_key(Weekday::num_days_from_monday);
    }
    records
}

/// The published closing time. A non-empty period that closes at its own
/// opening time lasts whole days; it is written as closing one second earlier
/// so it cannot read as a closed record.
fn closing_time(opens: NaiveTime, closes: NaiveTime, open_secs: i64) -> NaiveTime {
    if open_secs > 0 && opens == closes {
        let (time, _) = opens.overflowing_sub_signed(TimeDelta::seconds(1));
        time
    } else {
        closes
    }
}

/// Intersects `[from, through]` with optional bounds; `None` when empty.
fn narrow(
    from: NaiveDate,
    through: NaiveDate,
    first: Option<NaiveDate>,
    last: Option<NaiveDate>,
) -> Option<(NaiveDate, NaiveDate)> {
    let from = first.map_or(from, |f| f.max(from));
    let through = last.map_or(through, |l| l.min(through));
    (from <= through).then_some((from, through))
}

#[cfg(feature = "serde")]
impl serde::Serialize for OpeningHoursSpecification {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeMap;

        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("@type", "OpeningHoursSpecification")?;
        if let Some(name) = &self.name {
            map.serialize_entry("name", name)?;
        }
        if !self.day_of_week.is_empty() {
            let days: Vec<&str> = self.day_of_week.iter().map(|d| day_of_week_url(*d)).collect();
            map.serialize_entry("dayOfWeek", &days)?;
        }
        map.serialize_entry("opens", &self.opens.format("%H:%M:%S").to_string())?;
        map.serialize_entry("closes", &self.closes.format("%H:%M:%S").to_string())?;
        map.serialize_entry("validFrom", &self.valid_from.format("%Y-%m-%d").to_string())?;
        map.serialize_entry(
            "validThrough",
            &self.valid_through.format("%Y-%m-%d").to_string(),
        )?;
        map.end()
    }
}
