//! Splits a date horizon between a base schedule and date-ranged child
//! schedules.
//!
//! The result is a list of inclusive day ranges, each owned by exactly one
//! schedule, with the base schedule filling every day no child claims.

mod config;
mod partitioner;


pub use config::PartitionConfig;
pub use partitioner::{partition, ChildSchedule, PartitionEntry, Partitioner};
