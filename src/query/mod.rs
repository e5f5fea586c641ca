//! Point and look-ahead queries over a resolved specification.
//!
//! The resolved sequence answers "which entry governs instant T". These
//! queries go one step further and answer "is the venue open at T" and
//! "when does it open next", which needs the concrete periods of the
//! governing entries.

mod config;
mod opening;

pub use config::QueryConfig;
pub use opening::{settle_overhangs, OpeningQuery};
