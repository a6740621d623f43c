//! # Dedup Filters
//!
//! Scalable Bloom filter engine for deduplicating URL-like items across a
//! fixed set of named collections.
//!
//! ## Architecture
//!
//! This crate follows Hexagonal Architecture (Ports & Adapters):
//!
//! - **Domain Layer** (`domain/`): Pure logic, no I/O
//!   - `FilterUnit`: one fixed-size bit array with `k` hash functions
//!   - `FilterChain`: growth-ordered units for one collection
//!   - `FilterConfig` / `FilterConfigBuilder`: sizing and growth parameters
//!   - `AllowList`: the collection names requests may use
//!   - `ChainSnapshot`: persisted form of a chain
//!
//! - **Ports Layer** (`ports/`): Trait definitions
//!   - `DeduplicationApi`: Driving port (inbound API)
//!   - `SnapshotStore`: Driven port (durable storage)
//!
//! - **Service Layer** (`service/`): Orchestration
//!   - `CollectionRegistry`: name to chain map with lazy creation
//!   - `BatchCoordinator`: per-item locked batch add / test
//!   - `StatsReporter`: collection counters
//!   - `DedupService`: implements `DeduplicationApi`
//!   - `SnapshotFlusher`: saves changed chains
//!
//! - **Adapters Layer** (`adapters/`): File and in-memory snapshot stores,
//!   the data directory lock and the transport request handler
//!
//! - **Events Layer** (`events/`): request / response messages
//!
//! ## Invariants
//!
//! - No false negatives: once `add` reported an item as new, every later
//!   `exists` for it returns true.
//! - The sum of unit error rates stays below the configured error rate.
//! - Results are positional; `true` means the item was already present.
//!
//! ## Usage Example
//!
//! ```ignore
//! use dedup_filters::{AllowList, CollectionRegistry, DedupService, DeduplicationApi, FilterConfig};
//! use std::sync::Arc;
//!
//! let registry = Arc::new(CollectionRegistry::new(AllowList::default(), FilterConfig::default())?);
//! let service = DedupService::new(registry);
//!
//! let added = service.add_batch("main", vec!["http://a".into(), "http://b".into()]).await?;
//! assert_eq!(added, vec![false, false]);
//!
//! let exists = service.exists_batch("main", vec!["http://a".into(), "http://c".into()]).await?;
//! assert_eq!(exists, vec![true, false]);
//! ```

pub mod adapters;
pub mod domain;
pub mod error;
pub mod events;
pub mod metrics;
pub mod ports;
pub mod service;

// Re-exports for convenience
pub use domain::{
    decode_items, newly_seen, AllowList, ChainInfo, ChainSnapshot, CollectionName, FilterChain,
    FilterConfig, FilterConfigBuilder, FilterUnit, DEFAULT_COLLECTIONS,
};
pub use error::{FilterError, StoreError};
pub use metrics::{Metrics, MetricsRecorder, MetricsSnapshot, NoOpMetrics};
pub use ports::{DeduplicationApi, SnapshotStore};
pub use service::{
    BatchCoordinator, ChainHandle, CollectionRegistry, DedupService, FlushReport,
    SnapshotFlusher, StatsReporter,
};

pub use adapters::{DataDirLock, DedupRequestHandler, FileSnapshotStore, InMemorySnapshotStore};
