//! Last-applied attribute sets, keyed by identity.

use crate::value::Value;
use std::collections::HashMap;

/// SnapshotRepository remembers the attributes last applied to each resource.
///
/// The owner stores a snapshot after every successful create or update and
/// hands the stored value to
/// [`WriteTranscoder::diff_to_patch`](crate::transcode::WriteTranscoder::diff_to_patch)
/// as the previous attributes on the next update.
#[derive(Debug, Clone, Default)]
pub struct SnapshotRepository {
    snapshots: HashMap<String, Value>,
}

impl SnapshotRepository {
    pub fn new() -> Self {
        SnapshotRepository::default()
    }

    /// Stores a snapshot, returning the one it replaces.
    pub fn store(&mut self, identity: impl Into<String>, attrs: Value) -> Option<Value> {
        self.snapshots.insert(identity.into(), attrs)
    }

    pub fn load(&self, identity: &str) -> Option<&Value> {
        self.snapshots.get(identity)
    }

    pub fn remove(&mut self, identity: &str) -> Option<Value> {
        self.snapshots.remove(identity)
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}
