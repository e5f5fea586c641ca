//! Storage seam for serialized specifications.
//!
//! The resolution engine never touches storage. Callers load a record,
//! rebuild the tree with [`SpecEntry::from_serializable`](super::SpecEntry::from_serializable),
//! resolve it, and store edited trees back through this trait.

use std::collections::HashMap;

use super::serial::SerializedEntry;

/// Key-addressed persistence of specification records.
pub trait SpecStore {
    fn load(&self, key: &str) -> Option<SerializedEntry>;

    fn store(&mut self, key: &str, record: SerializedEntry);
}

/// In-process store backed by a `HashMap`.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    records: HashMap<String, SerializedEntry>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl SpecStore for MemoryStore {
    fn load(&self, key: &str) -> Option<SerializedEntry> {
        self.records.get(key).cloned()
    }

    fn store(&mut self, key: &str, record: SerializedEntry) {
        self.records.insert(key.to_string(), record);
    }
}
