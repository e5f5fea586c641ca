//! Configuration for opening-hours queries.

use qtty::{Day, Quantity};

use crate::units::days;

/// Bounds for forward-looking queries.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QueryConfig {
    /// How far [`next_open_period`](super::OpeningQuery::next_open_period)
    /// scans ahead before giving up.
    pub lookahead: Quantity<Day>,
}

impl QueryConfig {
    pub fn with_lookahead(lookahead: Quantity<Day>) -> Self {
        Self { lookahead }
    }
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            lookahead: days(366),
        }
    }
}
