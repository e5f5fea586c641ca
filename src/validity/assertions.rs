//! Invariant checks for validity sequences.

use super::period::ValidityPeriod;

/// Returns true if `periods` is monotonic: sorted by start, and each period
/// ends no later than the next one starts (previous end <= next start).
pub fn is_monotonic<O>(periods: &[ValidityPeriod<O>]) -> bool {
    periods.windows(2).all(|w| {
        let prev = &w[0];
        let curr = &w[1];
        prev.start() <= curr.start() && prev.end() <= curr.start()
    })
}
