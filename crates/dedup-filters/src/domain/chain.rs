//! Scalable filter chain
//!
//! A chain is the ordered list of filter units behind one collection. New
//! items always go into the last unit; when that unit reaches its capacity
//! a larger, tighter unit is appended. Queries consult every unit.
//!
//! INVARIANTS:
//! - No false negatives: an item added to any unit is found by `exists`
//! - Units are only appended, never removed or resized
//! - Sum of unit error rates stays below the chain's configured error rate

use serde::{Deserialize, Serialize};
use tracing::info;

use super::allow_list::CollectionName;
use super::config::FilterConfig;
use super::filter_unit::FilterUnit;
use super::snapshot::ChainSnapshot;
use crate::error::{FilterError, StoreError};

/// Aggregated counters for one collection
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainInfo {
    /// Sum of per-unit item counts (biased low by false positives)
    pub inserted_num: u64,
    /// Sum of per-unit designed capacities
    pub capacity: u64,
    /// Number of units
    pub filter_num: usize,
    /// Sum of per-unit bit array sizes
    pub size_bits: u64,
    /// Capacity multiplier between consecutive units
    pub expansion_rate: usize,
}

/// Ordered sequence of filter units for one collection
#[derive(Debug)]
pub struct FilterChain {
    name: CollectionName,
    /// Units in creation order; never empty
    units: Vec<FilterUnit>,
    error_rate: f64,
    growth_ratio: usize,
    tightening_ratio: f64,
    max_unit_bits: usize,
    /// Bumped on every state change; used to detect unflushed chains
    generation: u64,
}

impl FilterChain {
    /// Create a chain with its first unit
    pub fn new(name: CollectionName, config: &FilterConfig) -> Result<Self, FilterError> {
        let first = FilterUnit::try_new(
            config.initial_capacity,
            config.first_unit_error_rate(),
            config.max_unit_bits,
        )
        .map_err(|e| FilterError::CapacityExhausted {
            collection: name.to_string(),
            requested_bits: e.requested_bits,
        })?;

        Ok(Self {
            name,
            units: vec![first],
            error_rate: config.error_rate,
            growth_ratio: config.growth_ratio,
            tightening_ratio: config.tightening_ratio,
            max_unit_bits: config.max_unit_bits,
            generation: 0,
        })
    }

    /// Test every unit; true if any unit reports the item
    pub fn exists(&self, item: &[u8]) -> bool {
        self.units.iter().any(|unit| unit.test(item))
    }

    /// Add an item, returning whether it was already present
    ///
    /// A present item leaves the chain untouched. Otherwise the item goes
    /// into the current unit, after appending a new unit if the current one
    /// is full. If that new unit cannot be allocated the chain is left as it
    /// was and the item is not added.
    pub fn add(&mut self, item: &[u8]) -> Result<bool, FilterError> {
        if self.exists(item) {
            return Ok(true);
        }

        if self.current().is_full() {
            self.grow()?;
        }

        let already_present = self.current_mut().add(item);
        self.generation += 1;
        Ok(already_present)
    }

    fn grow(&mut self) -> Result<(), FilterError> {
        let current = self.current();
        let capacity = current.capacity().saturating_mul(self.growth_ratio);
        let error_rate = current.error_rate() * self.tightening_ratio;

        let unit = FilterUnit::try_new(capacity, error_rate, self.max_unit_bits).map_err(|e| {
            FilterError::CapacityExhausted {
                collection: self.name.to_string(),
                requested_bits: e.requested_bits,
            }
        })?;

        info!(
            collection = %self.name,
            filter_num = self.units.len() + 1,
            capacity,
            error_rate,
            size_bits = unit.size_bits(),
            hash_count = unit.hash_count(),
            "Appended filter unit"
        );

        self.units.push(unit);
        self.generation += 1;
        Ok(())
    }

    fn current(&self) -> &FilterUnit {
        // `units` is never empty: constructors always provide one unit.
        &self.units[self.units.len() - 1]
    }

    fn current_mut(&mut self) -> &mut FilterUnit {
        let last = self.units.len() - 1;
        &mut self.units[last]
    }

    /// Aggregate unit counters
    pub fn info(&self) -> ChainInfo {
        ChainInfo {
            inserted_num: self.units.iter().map(|u| u.count() as u64).sum(),
            capacity: self.units.iter().map(|u| u.capacity() as u64).sum(),
            filter_num: self.units.len(),
            size_bits: self.units.iter().map(|u| u.size_bits() as u64).sum(),
            expansion_rate: self.growth_ratio,
        }
    }

    pub fn name(&self) -> &CollectionName {
        &self.name
    }

    /// Units in creation order
    pub fn units(&self) -> &[FilterUnit] {
        &self.units
    }

    pub fn error_rate(&self) -> f64 {
        self.error_rate
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Total bytes held by all bit arrays
    pub fn size_bytes(&self) -> usize {
        self.units.iter().map(FilterUnit::size_bytes).sum()
    }

    /// Capture the chain in its persisted form
    pub fn to_snapshot(&self) -> ChainSnapshot {
        ChainSnapshot {
            name: self.name.to_string(),
            error_rate: self.error_rate,
            growth_ratio: self.growth_ratio as u64,
            tightening_ratio: self.tightening_ratio,
            units: self.units.iter().map(FilterUnit::to_snapshot).collect(),
        }
    }

    /// Rebuild a chain from its persisted form, keeping unit order
    ///
    /// `max_unit_bits` comes from the running configuration and only bounds
    /// future growth.
    pub fn from_snapshot(
        name: CollectionName,
        snapshot: ChainSnapshot,
        max_unit_bits: usize,
    ) -> Result<Self, StoreError> {
        let corrupt = |reason: String| StoreError::Corrupt {
            name: name.to_string(),
            reason,
        };

        if snapshot.units.is_empty() {
            return Err(corrupt("chain has no units".to_string()));
        }
        if !(snapshot.error_rate > 0.0 && snapshot.error_rate < 1.0) {
            return Err(corrupt(format!(
                "error rate {} out of range",
                snapshot.error_rate
            )));
        }
        if snapshot.growth_ratio == 0 {
            return Err(corrupt("growth ratio is 0".to_string()));
        }
        if !(snapshot.tightening_ratio > 0.0 && snapshot.tightening_ratio < 1.0) {
            return Err(corrupt(format!(
                "tightening ratio {} out of range",
                snapshot.tightening_ratio
            )));
        }

        let growth_ratio = usize::try_from(snapshot.growth_ratio).map_err(|e| corrupt(e.to_string()))?;
        let units = snapshot
            .units
            .into_iter()
            .enumerate()
            .map(|(i, unit)| {
                FilterUnit::from_snapshot(unit).map_err(|reason| corrupt(format!("unit {}: {}", i, reason)))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            name,
            units,
            error_rate: snapshot.error_rate,
            growth_ratio,
            tightening_ratio: snapshot.tightening_ratio,
            max_unit_bits,
            generation: 0,
        })
    }
}
