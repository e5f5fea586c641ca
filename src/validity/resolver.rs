//! Folds a specification tree into a single validity sequence.

use chrono::NaiveDateTime;
use tracing::{debug, trace};

use super::sequence::ValiditySequence;
use crate::interval::Endpoint;
use crate::spec::SpecEntry;

/// Resolves `root` into a flat, ordered [`ValiditySequence`].
///
/// Entries are merged in tree order, parent before children. Each merged
/// entry overwrites whatever part of the running sequence its own validity
/// covers, so children override their parent and later siblings override
/// earlier ones where they overlap.
pub fn resolve(root: &SpecEntry) -> ValiditySequence<&SpecEntry> {
    let sequence = merge_in(ValiditySequence::new(), root);
    debug!(
        entries = root.node_count(),
        periods = sequence.len(),
        "resolved specification tree"
    );
    sequence
}

/// Replaces the span of `entry` in `sequence`, then folds its children into
/// the result.
fn merge_in<'a>(
    sequence: ValiditySequence<&'a SpecEntry>,
    entry: &'a SpecEntry,
) -> ValiditySequence<&'a SpecEntry> {
    let foreground = entry.validity_period();
    trace!(kind = %entry.kind(), span = %foreground, "merging entry");

    let before = sequence.restricted_to_interval(Endpoint::NegInf, foreground.start());
    let after = sequence.restricted_to_interval(foreground.end(), Endpoint::PosInf);

    let mut periods = before.into_periods();
    periods.reserve(after.len() + 1);
    periods.push(foreground);
    periods.extend(after);

    let merged = ValiditySequence::from_sorted(periods);
    entry.children().iter().fold(merged, merge_in)
}

/// The entry governing `instant`, by linear scan.
pub fn active_entry<'a>(
    sequence: &ValiditySequence<&'a SpecEntry>,
    instant: NaiveDateTime,
) -> Option<&'a SpecEntry> {
    sequence.active_at(instant).map(|p| *p.owner())
}
