//! Tree analysis operations: depth, node counts and traversal.

use super::entry::{EntryKind, SpecEntry};

impl SpecEntry {
    /// Returns the depth of this specification tree.
    ///
    /// - Leaf entries have depth 1
    /// - Recurring-period sets have depth = 1 + max(child depths)
    pub fn depth(&self) -> usize {
        1 + self
            .children()
            .iter()
            .map(SpecEntry::depth)
            .max()
            .unwrap_or(0)
    }

    /// Returns the total number of entries in this tree.
    pub fn node_count(&self) -> usize {
        1 + self
            .children()
            .iter()
            .map(SpecEntry::node_count)
            .sum::<usize>()
    }

    /// Returns whether this entry can carry children.
    pub fn is_leaf(&self) -> bool {
        !matches!(self, SpecEntry::RecurringPeriods(_))
    }

    /// Visits all entries in tree order (parent before children).
    pub fn visit_preorder<'a, F>(&'a self, visitor: &mut F)
    where
        F: FnMut(&'a SpecEntry),
    {
        visitor(self);
        for child in self.children() {
            child.visit_preorder(visitor);
        }
    }

    /// Collects the entries of the given kind in tree order.
    pub fn entries_of_kind(&self, kind: EntryKind) -> Vec<&SpecEntry> {
        let mut found = Vec::new();
        self.visit_preorder(&mut |entry| {
            if entry.kind() == kind {
                found.push(entry);
            }
        });
        found
    }
}
