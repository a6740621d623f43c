//! Service layer
//!
//! Orchestrates the domain chains: the registry owns them, the coordinator
//! runs batches against them, and the flusher persists them.

mod coordinator;
mod dedup_service;
mod flusher;
mod registry;
mod stats;

pub use coordinator::BatchCoordinator;
pub use dedup_service::DedupService;
pub use flusher::{FlushReport, SnapshotFlusher};
pub use registry::{ChainHandle, CollectionRegistry};
pub use stats::StatsReporter;
