//! Collection registry
//!
//! Maps allow-listed collection names to their filter chains. Chains are
//! created on first reference; concurrent first references to the same
//! name produce exactly one chain (double-checked under the map's write
//! lock). Different collections never share a chain lock.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{info, warn};

use crate::domain::{AllowList, ChainSnapshot, CollectionName, FilterChain, FilterConfig};
use crate::error::FilterError;
use crate::metrics::{MetricsRecorder, NoOpMetrics};

/// Shared handle to one collection's chain
pub type ChainHandle = Arc<RwLock<FilterChain>>;

/// Owner of every filter chain served by the process
pub struct CollectionRegistry {
    allow_list: AllowList,
    config: FilterConfig,
    chains: RwLock<HashMap<CollectionName, ChainHandle>>,
    metrics: Arc<dyn MetricsRecorder>,
}

impl CollectionRegistry {
    /// Create an empty registry; the config is validated here
    pub fn new(allow_list: AllowList, config: FilterConfig) -> Result<Self, FilterError> {
        config.validate()?;
        Ok(Self {
            allow_list,
            config,
            chains: RwLock::new(HashMap::new()),
            metrics: Arc::new(NoOpMetrics),
        })
    }

    /// Record into the given metrics instead of discarding them
    pub fn with_metrics(mut self, metrics: Arc<dyn MetricsRecorder>) -> Self {
        self.metrics = metrics;
        self
    }

    /// Check a name against the allow-list
    pub fn validate(&self, name: &str) -> Result<CollectionName, FilterError> {
        self.allow_list.validate(name).inspect_err(|_| {
            self.metrics.record_rejected();
            warn!(collection = %name, "Rejected request for unknown collection");
        })
    }

    /// Get the chain for `name`, creating it on first reference
    pub fn resolve(&self, name: &str) -> Result<ChainHandle, FilterError> {
        let name = self.validate(name)?;

        if let Some(chain) = self.chains.read().get(&name) {
            return Ok(Arc::clone(chain));
        }

        let mut chains = self.chains.write();
        if let Some(chain) = chains.get(&name) {
            return Ok(Arc::clone(chain));
        }

        let chain = FilterChain::new(name.clone(), &self.config)?;
        self.record_new_chain(&chain);
        info!(
            collection = %name,
            capacity = self.config.initial_capacity,
            error_rate = self.config.error_rate,
            "Created collection"
        );

        let handle = Arc::new(RwLock::new(chain));
        chains.insert(name, Arc::clone(&handle));
        Ok(handle)
    }

    /// Get an existing chain without creating one
    pub fn get(&self, name: &CollectionName) -> Option<ChainHandle> {
        self.chains.read().get(name).cloned()
    }

    /// All existing chains, sorted by name
    pub fn collections(&self) -> Vec<(CollectionName, ChainHandle)> {
        let mut entries: Vec<_> = self
            .chains
            .read()
            .iter()
            .map(|(name, chain)| (name.clone(), Arc::clone(chain)))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        entries
    }

    /// Install chains loaded from durable storage
    ///
    /// Snapshots for names outside the allow-list are skipped. Returns the
    /// number of chains installed.
    pub fn restore(&self, snapshots: Vec<ChainSnapshot>) -> Result<usize, FilterError> {
        let mut restored = Vec::new();
        for snapshot in snapshots {
            let Ok(name) = self.allow_list.validate(&snapshot.name) else {
                warn!(collection = %snapshot.name, "Skipping snapshot for collection not in allow-list");
                continue;
            };
            let chain = FilterChain::from_snapshot(name.clone(), snapshot, self.config.max_unit_bits)?;
            restored.push((name, chain));
        }

        let count = restored.len();
        let mut chains = self.chains.write();
        for (name, chain) in restored {
            let info = chain.info();
            info!(
                collection = %name,
                filter_num = info.filter_num,
                inserted_num = info.inserted_num,
                capacity = info.capacity,
                "Restored collection"
            );
            self.record_new_chain(&chain);
            chains.insert(name, Arc::new(RwLock::new(chain)));
        }
        Ok(count)
    }

    fn record_new_chain(&self, chain: &FilterChain) {
        self.metrics.record_collection_created();
        for unit in chain.units() {
            self.metrics
                .record_unit_created(unit.size_bits(), unit.hash_count(), unit.capacity());
        }
    }

    pub fn allow_list(&self) -> &AllowList {
        &self.allow_list
    }

    pub fn config(&self) -> &FilterConfig {
        &self.config
    }

    pub fn metrics(&self) -> &Arc<dyn MetricsRecorder> {
        &self.metrics
    }

    /// Number of chains created so far
    pub fn len(&self) -> usize {
        self.chains.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.chains.read().is_empty()
    }
}
