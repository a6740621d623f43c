//! In-memory snapshot store
//!
//! Keeps encoded envelopes, so reload goes through the same decode and
//! checksum path as the file store.

use std::collections::BTreeMap;

use parking_lot::Mutex;

use crate::domain::ChainSnapshot;
use crate::error::StoreError;
use crate::ports::SnapshotStore;

#[derive(Default)]
pub struct InMemorySnapshotStore {
    entries: Mutex<BTreeMap<String, Vec<u8>>>,
}

impl InMemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store raw bytes under `name`, bypassing encoding
    pub fn put_raw(&self, name: &str, bytes: Vec<u8>) {
        self.entries.lock().insert(name.to_string(), bytes);
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

impl SnapshotStore for InMemorySnapshotStore {
    fn load_all(&self) -> Result<Vec<ChainSnapshot>, StoreError> {
        self.entries
            .lock()
            .iter()
            .map(|(name, bytes)| ChainSnapshot::decode(name, bytes))
            .collect()
    }

    fn save(&self, snapshot: &ChainSnapshot) -> Result<(), StoreError> {
        let bytes = snapshot.encode()?;
        self.entries.lock().insert(snapshot.name.clone(), bytes);
        Ok(())
    }
}
