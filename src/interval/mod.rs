//! Interval primitives: endpoints with ±∞ sentinels and half-open intervals.

mod endpoint;
#[allow(clippy::module_inception)]
mod interval;

pub use endpoint::{format_timestamp, parse_date, parse_timestamp, Endpoint};
pub use interval::Interval;
