//! Async facade over the coordinator
//!
//! Filter work is CPU-bound and takes blocking locks, so each call runs on
//! the blocking pool. A caller that stops waiting (timeout, dropped future)
//! does not cancel the batch: it still runs to completion.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::task;

use super::coordinator::BatchCoordinator;
use super::registry::CollectionRegistry;
use super::stats::StatsReporter;
use crate::domain::ChainInfo;
use crate::error::FilterError;
use crate::ports::DeduplicationApi;

/// Deduplication service implementing [`DeduplicationApi`]
#[derive(Clone)]
pub struct DedupService {
    registry: Arc<CollectionRegistry>,
    coordinator: BatchCoordinator,
    stats: StatsReporter,
}

impl DedupService {
    pub fn new(registry: Arc<CollectionRegistry>) -> Self {
        Self {
            coordinator: BatchCoordinator::new(Arc::clone(&registry)),
            stats: StatsReporter::new(Arc::clone(&registry)),
            registry,
        }
    }

    pub fn registry(&self) -> &Arc<CollectionRegistry> {
        &self.registry
    }

    pub fn stats(&self) -> &StatsReporter {
        &self.stats
    }

    async fn run_blocking<T, F>(f: F) -> Result<T, FilterError>
    where
        T: Send + 'static,
        F: FnOnce() -> Result<T, FilterError> + Send + 'static,
    {
        task::spawn_blocking(f)
            .await
            .map_err(|e| FilterError::Internal(format!("Batch task failed: {}", e)))?
    }
}

#[async_trait]
impl DeduplicationApi for DedupService {
    async fn add_batch(
        &self,
        collection: &str,
        items: Vec<String>,
    ) -> Result<Vec<bool>, FilterError> {
        let name = self.registry.validate(collection)?;
        let coordinator = self.coordinator.clone();
        Self::run_blocking(move || coordinator.batch_add(name.as_str(), &items)).await
    }

    async fn exists_batch(
        &self,
        collection: &str,
        items: Vec<String>,
    ) -> Result<Vec<bool>, FilterError> {
        let name = self.registry.validate(collection)?;
        let coordinator = self.coordinator.clone();
        Self::run_blocking(move || coordinator.batch_test(name.as_str(), &items)).await
    }

    async fn info(&self, collection: &str) -> Result<ChainInfo, FilterError> {
        let name = self.registry.validate(collection)?;
        let stats = self.stats.clone();
        Self::run_blocking(move || stats.report(name.as_str())).await
    }
}
