//! Opening-hours specification trees.
//!
//! A tree is rooted in a [`RecurringPeriods`] set whose children (holidays,
//! day overrides, nested sets) override it within their own spans.

mod entry;
mod period;
mod serial;
mod store;
mod tree;

pub use entry::{DayOverride, EntryKind, Holiday, RecurringPeriods, SpecEntry};
pub use period::{
    format_time_of_day, parse_time_of_day, weekday_from_index, weekday_index, Period,
    RecurringPeriod, MAX_RECURRING_DURATION_SECS,
};
pub use serial::{SerializedEntry, SerializedPeriod};
pub use store::{MemoryStore, SpecStore};
