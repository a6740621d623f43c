//! Batch operation coordinator
//!
//! Runs batches item by item against one chain. Each item takes the chain
//! lock on its own, so other batches may interleave between items, but
//! every item observes all earlier items of its own batch.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, error};

use super::registry::CollectionRegistry;
use crate::error::FilterError;

/// Dispatches batch adds and tests to collection chains
#[derive(Clone)]
pub struct BatchCoordinator {
    registry: Arc<CollectionRegistry>,
}

impl BatchCoordinator {
    pub fn new(registry: Arc<CollectionRegistry>) -> Self {
        Self { registry }
    }

    /// Test each item; `result[i]` is whether `items[i]` already exists
    ///
    /// Repeated items are tested independently.
    pub fn batch_test<S: AsRef<[u8]>>(
        &self,
        collection: &str,
        items: &[S],
    ) -> Result<Vec<bool>, FilterError> {
        let chain = self.registry.resolve(collection)?;
        let metrics = self.registry.metrics();

        let mut results = Vec::with_capacity(items.len());
        for item in items {
            let start = Instant::now();
            let found = chain.read().exists(item.as_ref());
            metrics.record_lookup(start.elapsed(), found);
            results.push(found);
        }

        debug!(
            collection,
            items = items.len(),
            present = results.iter().filter(|&&present| present).count(),
            "Tested batch"
        );
        Ok(results)
    }

    /// Add each item in order; `result[i]` is whether `items[i]` was
    /// already present when it was added
    ///
    /// If adding an item fails (the chain could not grow), the batch stops
    /// there with the error; items before it stay added.
    pub fn batch_add<S: AsRef<[u8]>>(
        &self,
        collection: &str,
        items: &[S],
    ) -> Result<Vec<bool>, FilterError> {
        let chain = self.registry.resolve(collection)?;
        let metrics = self.registry.metrics();

        let mut results = Vec::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            let start = Instant::now();
            let mut guard = chain.write();
            let units_before = guard.units().len();

            let already_present = guard.add(item.as_ref()).inspect_err(|e| {
                error!(collection, index, error = %e, "Batch add aborted");
            })?;

            if let Some(unit) = guard.units().get(units_before) {
                metrics.record_unit_created(unit.size_bits(), unit.hash_count(), unit.capacity());
            }
            drop(guard);

            metrics.record_insert(start.elapsed(), already_present);
            results.push(already_present);
        }

        debug!(
            collection,
            items = items.len(),
            new = results.iter().filter(|&&present| !present).count(),
            "Added batch"
        );
        Ok(results)
    }
}
