//! Self-describing records exchanged with the persistence layer.
//!
//! A record carries a `kind` discriminator plus the fields of that kind:
//!
//! ```text
//! recurringPeriods: { kind, start, end, periods: [{startTime, duration, weekday}], children }
//! holiday:          { kind, name, start, end }
//! dayOverride:      { kind, name, date, periods: [{start, end}] }
//! ```
//!
//! Timestamps are ISO-8601 strings; unbounded ends are `"-INF"` / `"INF"`.

use chrono::NaiveTime;

use super::entry::{DayOverride, EntryKind, Holiday, RecurringPeriods, SpecEntry};
use super::period::{format_time_of_day, weekday_index, Period, RecurringPeriod};
use crate::error::HoursError;
use crate::interval::{format_timestamp, parse_date, parse_timestamp, Endpoint};

/// Serialized form of a [`SpecEntry`].
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SerializedEntry {
    pub kind: String,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub name: Option<String>,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub start: Option<String>,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub end: Option<String>,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub date: Option<String>,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub periods: Option<Vec<SerializedPeriod>>,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub children: Option<Vec<SerializedEntry>>,
}

/// Serialized period: weekly template or concrete range.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum SerializedPeriod {
    Recurring {
        #[cfg_attr(feature = "serde", serde(rename = "startTime"))]
        start_time: String,
        duration: i64,
        weekday: i64,
    },
    Concrete {
        start: String,
        end: String,
    },
}

impl SerializedEntry {
    fn require<'a>(&self, value: &'a Option<String>, field: &'static str) -> Result<&'a str, HoursError> {
        value.as_deref().ok_or_else(|| HoursError::MissingField {
            kind: self.kind.clone(),
            field,
        })
    }
}

impl SpecEntry {
    /// Converts this tree into its serialized record.
    pub fn to_serializable(&self) -> SerializedEntry {
        match self {
            SpecEntry::RecurringPeriods(rp) => SerializedEntry {
                kind: EntryKind::RecurringPeriods.as_str().to_string(),
                start: Some(rp.start().to_string()),
                end: Some(rp.end().to_string()),
                periods: Some(
                    rp.periods()
                        .iter()
                        .map(|p| SerializedPeriod::Recurring {
                            start_time: format_time_of_day(p.start_time()),
                            duration: p.secs(),
                            weekday: weekday_index(p.weekday()),
                        })
                        .collect(),
                ),
                children: Some(
                    rp.children()
                        .iter()
                        .map(SpecEntry::to_serializable)
                        .collect(),
                ),
                ..Default::default()
            },
            SpecEntry::Holiday(h) => SerializedEntry {
                kind: EntryKind::Holiday.as_str().to_string(),
                name: Some(h.name().to_string()),
                start: Some(format_timestamp(&h.start())),
                end: Some(format_timestamp(&h.end())),
                ..Default::default()
            },
            SpecEntry::DayOverride(o) => SerializedEntry {
                kind: EntryKind::DayOverride.as_str().to_string(),
                name: Some(o.name().to_string()),
                date: Some(format_timestamp(&o.date().and_time(NaiveTime::MIN))),
                periods: Some(
                    o.periods()
                        .iter()
                        .map(|p| SerializedPeriod::Concrete {
                            start: format_timestamp(&p.start()),
                            end: format_timestamp(&p.end()),
                        })
                        .collect(),
                ),
                ..Default::default()
            },
        }
    }

    /// Rebuilds a tree from its serialized record.
    ///
    /// # Errors
    ///
    /// - [`HoursError::UnknownKind`] for an unrecognized `kind`
    /// - [`HoursError::MissingField`] when a field required by the kind is absent
    /// - parse errors for malformed timestamps, times of day or weekdays
    pub fn from_serializable(record: &SerializedEntry) -> Result<SpecEntry, HoursError> {
        let kind: EntryKind = record.kind.parse()?;
        match kind {
            EntryKind::RecurringPeriods => {
                let start = Endpoint::parse(record.require(&record.start, "start")?)?;
                let end = Endpoint::parse(record.require(&record.end, "end")?)?;
                let periods = record
                    .periods
                    .iter()
                    .flatten()
                    .map(|p| match p {
                        SerializedPeriod::Recurring {
                            start_time,
                            duration,
                            weekday,
                        } => RecurringPeriod::from_parts(start_time, *duration, *weekday),
                        SerializedPeriod::Concrete { .. } => Err(HoursError::MissingField {
                            kind: record.kind.clone(),
                            field: "startTime",
                        }),
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                let children = record
                    .children
                    .iter()
                    .flatten()
                    .map(SpecEntry::from_serializable)
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(RecurringPeriods::new(start, end, periods, children)?.into())
            }
            EntryKind::Holiday => {
                let name = record.require(&record.name, "name")?;
                let start = parse_timestamp(record.require(&record.start, "start")?)?;
                let end = parse_timestamp(record.require(&record.end, "end")?)?;
                Ok(Holiday::new(name, start, end)?.into())
            }
            EntryKind::DayOverride => {
                let name = record.require(&record.name, "name")?;
                let date = parse_date(record.require(&record.date, "date")?)?;
                let periods = record
                    .periods
                    .iter()
                    .flatten()
                    .map(|p| match p {
                        SerializedPeriod::Concrete { start, end } => {
                            Period::new(parse_timestamp(start)?, parse_timestamp(end)?)
                        }
                        SerializedPeriod::Recurring { .. } => Err(HoursError::MissingField {
                            kind: record.kind.clone(),
                            field: "start",
                        }),
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(DayOverride::new(name, date, periods).into())
            }
        }
    }
}

impl TryFrom<&SerializedEntry> for SpecEntry {
    type Error = HoursError;

    fn try_from(record: &SerializedEntry) -> Result<Self, Self::Error> {
        SpecEntry::from_serializable(record)
    }
}

impl From<&SpecEntry> for SerializedEntry {
    fn from(entry: &SpecEntry) -> Self {
        entry.to_serializable()
    }
}
