//! Outbound Ports (Driven Ports)
//!
//! Durable storage the engine depends on for reload and flush.

use crate::domain::ChainSnapshot;
use crate::error::StoreError;

/// Snapshot storage (Driven Port)
///
/// One snapshot per collection; saving replaces the previous snapshot of
/// the same name atomically.
pub trait SnapshotStore: Send + Sync {
    /// Load every stored snapshot
    ///
    /// Fails on the first unreadable snapshot: starting with a silently
    /// emptied collection would re-admit items already seen.
    fn load_all(&self) -> Result<Vec<ChainSnapshot>, StoreError>;

    /// Persist one collection
    fn save(&self, snapshot: &ChainSnapshot) -> Result<(), StoreError>;
}
