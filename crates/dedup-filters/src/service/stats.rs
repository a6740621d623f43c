//! Per-collection statistics

use std::sync::Arc;

use super::registry::CollectionRegistry;
use crate::domain::{ChainInfo, CollectionName};
use crate::error::FilterError;

/// Reports aggregated chain counters
#[derive(Clone)]
pub struct StatsReporter {
    registry: Arc<CollectionRegistry>,
}

impl StatsReporter {
    pub fn new(registry: Arc<CollectionRegistry>) -> Self {
        Self { registry }
    }

    /// Counters of one collection
    ///
    /// An allow-listed name that has not been used yet reports zero units
    /// and is not created, so nothing gets allocated or flushed for it.
    pub fn report(&self, collection: &str) -> Result<ChainInfo, FilterError> {
        let name = self.registry.validate(collection)?;
        let info = match self.registry.get(&name) {
            Some(chain) => chain.read().info(),
            None => ChainInfo {
                inserted_num: 0,
                capacity: 0,
                filter_num: 0,
                size_bits: 0,
                expansion_rate: self.registry.config().growth_ratio,
            },
        };
        Ok(info)
    }

    /// Counters of every collection created so far, ordered by name
    pub fn report_all(&self) -> Vec<(CollectionName, ChainInfo)> {
        self.registry
            .collections()
            .into_iter()
            .map(|(name, chain)| {
                let info = chain.read().info();
                (name, info)
            })
            .collect()
    }
}
