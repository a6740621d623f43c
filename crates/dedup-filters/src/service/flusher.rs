//! Snapshot flushing
//!
//! Saves collections whose generation moved since their last successful
//! save. Snapshots are taken under a read lock, so a flush never blocks
//! lookups and only briefly blocks adds.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, error, info};

use super::registry::CollectionRegistry;
use crate::domain::CollectionName;
use crate::ports::SnapshotStore;

/// Outcome of one flush pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlushReport {
    pub saved: usize,
    pub unchanged: usize,
    pub failed: usize,
}

impl FlushReport {
    pub fn is_clean(&self) -> bool {
        self.failed == 0
    }
}

/// Persists changed collections to a [`SnapshotStore`]
pub struct SnapshotFlusher {
    registry: Arc<CollectionRegistry>,
    store: Arc<dyn SnapshotStore>,
    flushed: Mutex<HashMap<CollectionName, u64>>,
}

impl SnapshotFlusher {
    pub fn new(registry: Arc<CollectionRegistry>, store: Arc<dyn SnapshotStore>) -> Self {
        Self {
            registry,
            store,
            flushed: Mutex::new(HashMap::new()),
        }
    }

    /// Record the current generation of every collection as persisted
    ///
    /// Called right after restoring from the same store.
    pub fn mark_clean(&self) {
        let mut flushed = self.flushed.lock();
        for (name, chain) in self.registry.collections() {
            flushed.insert(name, chain.read().generation());
        }
    }

    /// Save every collection that changed since its last save
    ///
    /// A failed save is logged and retried on the next pass; it does not
    /// stop the other collections from being saved.
    pub fn flush(&self) -> FlushReport {
        let mut report = FlushReport::default();
        // Serializes concurrent flush passes.
        let mut flushed = self.flushed.lock();

        for (name, chain) in self.registry.collections() {
            let (generation, snapshot) = {
                let chain = chain.read();
                if flushed.get(&name) == Some(&chain.generation()) {
                    report.unchanged += 1;
                    continue;
                }
                (chain.generation(), chain.to_snapshot())
            };

            match self.store.save(&snapshot) {
                Ok(()) => {
                    debug!(collection = %name, generation, "Saved snapshot");
                    flushed.insert(name, generation);
                    self.registry.metrics().record_flush(true);
                    report.saved += 1;
                }
                Err(e) => {
                    error!(collection = %name, error = %e, "Failed to save snapshot");
                    self.registry.metrics().record_flush(false);
                    report.failed += 1;
                }
            }
        }

        if report.saved > 0 || report.failed > 0 {
            info!(
                saved = report.saved,
                unchanged = report.unchanged,
                failed = report.failed,
                "Flushed snapshots"
            );
        }
        report
    }
}
