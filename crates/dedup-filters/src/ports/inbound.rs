//! Inbound Ports (Driving Ports)
//!
//! The API a transport layer uses to reach the deduplication engine.

use async_trait::async_trait;

use crate::domain::ChainInfo;
use crate::error::FilterError;

/// Primary deduplication API (Driving Port)
///
/// Every operation validates `collection` against the allow-list first and
/// fails with `FilterError::InvalidCollection` without touching any state.
/// Results are positional: `result[i]` belongs to `items[i]`, and `true`
/// means "already present".
#[async_trait]
pub trait DeduplicationApi: Send + Sync {
    /// Add items in order; each add observes the effects of earlier items
    async fn add_batch(
        &self,
        collection: &str,
        items: Vec<String>,
    ) -> Result<Vec<bool>, FilterError>;

    /// Test items in order without modifying the collection
    async fn exists_batch(
        &self,
        collection: &str,
        items: Vec<String>,
    ) -> Result<Vec<bool>, FilterError>;

    /// Aggregated counters of a collection
    async fn info(&self, collection: &str) -> Result<ChainInfo, FilterError>;
}
