//! Validity sequences: owner-tagged, non-overlapping intervals, and the
//! resolver folding a specification tree into one.

#[cfg(debug_assertions)]
pub mod assertions;

#[cfg(not(debug_assertions))]
pub mod assertions {
    use super::ValidityPeriod;

    pub fn is_monotonic<O>(_periods: &[ValidityPeriod<O>]) -> bool {
        true
    }
}

mod period;
mod resolver;
mod sequence;

pub use period::ValidityPeriod;
pub use resolver::{active_entry, resolve};
pub use sequence::ValiditySequence;
