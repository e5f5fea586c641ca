//! venue_hours - opening-hours specification engine
//!
//! Resolves a tree of weekly opening periods, holidays and single-day
//! overrides into a flat sequence of validity spans, answers "is it open"
//! queries against it, and partitions a one-year horizon among a main
//! schedule and date-ranged child schedules for schema.org emission.
//!
//! ```
//! use chrono::NaiveDate;
//! use venue_hours::spec::{Holiday, RecurringPeriod, RecurringPeriods, SpecEntry};
//! use venue_hours::validity::resolve;
//!
//! let day = |s: &str| NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap();
//! let weekdays = (0..5)
//!     .map(|w| RecurringPeriod::from_parts("09:00", 8 * 3600, w))
//!     .collect::<Result<Vec<_>, _>>()
//!     .unwrap();
//! let root = SpecEntry::from(
//!     RecurringPeriods::unbounded(weekdays)
//!         .with_child(Holiday::for_dates("Closed", day("2018-05-01"), day("2018-05-01")).unwrap()),
//! );
//! assert_eq!(resolve(&root).len(), 3);
//! ```

pub mod error;
pub mod interval;
pub mod partition;
pub mod query;
pub mod schedule;
pub mod schema;
pub mod spec;
pub mod units;
pub mod validity;

pub use error::HoursError;
pub use interval::{Endpoint, Interval};
pub use partition::{partition, ChildSchedule, PartitionConfig, PartitionEntry, Partitioner};
pub use query::{OpeningQuery, QueryConfig};
pub use schedule::ScheduleSet;
pub use spec::SpecEntry;
pub use validity::{active_entry, resolve, ValidityPeriod, ValiditySequence};

/// Identifier type used for schedule sets.
pub type Id = String;

/// Result alias for fallible operations in this crate.
pub type Result<T> = std::result::Result<T, HoursError>;

/// Generates a new unique identifier (UUID v4).
pub fn generate_id() -> Id {
    uuid::Uuid::new_v4().to_string()
}
