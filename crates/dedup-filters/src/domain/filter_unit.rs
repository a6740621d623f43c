//! Fixed-size filter unit
//!
//! INVARIANTS:
//! - No false negatives: once `add(x)` has run, `test(x)` returns true
//! - Sizing (m, k, capacity, p) never changes after creation
//! - `n` only grows, and only for items whose bits were not all set already

use bitvec::prelude::*;
use thiserror::Error;

use super::hash_functions::compute_hash_positions;
use super::parameters::{bytes_for_bits, calculate_fpr, calculate_optimal_parameters};
use super::snapshot::UnitSnapshot;

/// The bit array for a unit could not be allocated
#[derive(Debug, Error)]
#[error("cannot allocate {requested_bits} bits")]
pub struct AllocationError {
    pub requested_bits: usize,
}

/// A single bloom filter sized for a fixed capacity and error rate
#[derive(Clone, Debug)]
pub struct FilterUnit {
    /// Bit array storing the filter state
    bits: BitVec<u8, Lsb0>,
    /// Number of hash functions (k)
    k: usize,
    /// Size in bits (m)
    m: usize,
    /// Number of items added (n), biased low by false positives
    n: usize,
    /// Designed capacity
    capacity: usize,
    /// Designed false positive rate at capacity
    error_rate: f64,
}

impl FilterUnit {
    /// Create a unit with optimal parameters for `capacity` and `error_rate`
    ///
    /// Fails without allocating when the computed size exceeds `max_bits`,
    /// or when the allocator refuses the bit array.
    pub fn try_new(
        capacity: usize,
        error_rate: f64,
        max_bits: usize,
    ) -> Result<Self, AllocationError> {
        let params = calculate_optimal_parameters(capacity, error_rate);
        if params.size_bits > max_bits {
            return Err(AllocationError {
                requested_bits: params.size_bits,
            });
        }

        Ok(Self {
            bits: allocate_bits(params.size_bits)?,
            k: params.hash_count,
            m: params.size_bits,
            n: 0,
            capacity,
            error_rate,
        })
    }

    /// Add an item, returning whether it was already present
    ///
    /// "Already present" means all k bits were set before the call. In that
    /// case nothing changes; otherwise the missing bits are set and `n` is
    /// incremented.
    pub fn add(&mut self, item: &[u8]) -> bool {
        let mut already_present = true;
        for pos in compute_hash_positions(item, self.k, self.m) {
            if !self.bits[pos] {
                already_present = false;
                self.bits.set(pos, true);
            }
        }

        if !already_present {
            self.n += 1;
        }
        already_present
    }

    /// Test if an item might be in the unit
    ///
    /// Returns:
    /// - `true` if the item might be present (could be a false positive)
    /// - `false` if the item was definitely never added
    pub fn test(&self, item: &[u8]) -> bool {
        compute_hash_positions(item, self.k, self.m)
            .iter()
            .all(|&pos| self.bits[pos])
    }

    /// Whether the unit has reached its designed capacity
    pub fn is_full(&self) -> bool {
        self.n >= self.capacity
    }

    /// Number of items added
    pub fn count(&self) -> usize {
        self.n
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn error_rate(&self) -> f64 {
        self.error_rate
    }

    pub fn size_bits(&self) -> usize {
        self.m
    }

    pub fn hash_count(&self) -> usize {
        self.k
    }

    /// Number of bytes held by the bit array
    pub fn size_bytes(&self) -> usize {
        bytes_for_bits(self.m)
    }

    /// Get the number of bits set
    pub fn bits_set(&self) -> usize {
        self.bits.count_ones()
    }

    /// Fraction of bits set
    pub fn fill_ratio(&self) -> f64 {
        self.bits_set() as f64 / self.m as f64
    }

    /// Estimated false positive rate at the current fill
    ///
    /// Formula: FPR = (1 - e^(-kn/m))^k
    pub fn estimated_fpr(&self) -> f64 {
        calculate_fpr(self.m, self.n, self.k)
    }

    /// Capture the unit in its persisted form
    pub fn to_snapshot(&self) -> UnitSnapshot {
        UnitSnapshot {
            size_bits: self.m as u64,
            hash_count: self.k as u32,
            capacity: self.capacity as u64,
            error_rate: self.error_rate,
            inserted: self.n as u64,
            bits: self.bits.as_raw_slice().to_vec(),
        }
    }

    /// Rebuild a unit from its persisted form
    pub fn from_snapshot(snapshot: UnitSnapshot) -> Result<Self, String> {
        let m = usize::try_from(snapshot.size_bits).map_err(|e| e.to_string())?;
        let capacity = usize::try_from(snapshot.capacity).map_err(|e| e.to_string())?;
        let n = usize::try_from(snapshot.inserted).map_err(|e| e.to_string())?;
        let k = snapshot.hash_count as usize;

        if m == 0 || k == 0 {
            return Err(format!("degenerate unit: m={}, k={}", m, k));
        }
        if capacity == 0 {
            return Err("unit capacity is 0".to_string());
        }
        if n > capacity {
            return Err(format!("unit holds {} items over capacity {}", n, capacity));
        }
        if !(snapshot.error_rate > 0.0 && snapshot.error_rate < 1.0) {
            return Err(format!("error rate {} out of range", snapshot.error_rate));
        }
        if snapshot.bits.len() != bytes_for_bits(m) {
            return Err(format!(
                "bit array has {} bytes, expected {} for m={}",
                snapshot.bits.len(),
                bytes_for_bits(m),
                m
            ));
        }

        let mut bits = BitVec::<u8, Lsb0>::from_vec(snapshot.bits);
        bits.truncate(m);

        Ok(Self {
            bits,
            k,
            m,
            n,
            capacity,
            error_rate: snapshot.error_rate,
        })
    }
}

fn allocate_bits(m: usize) -> Result<BitVec<u8, Lsb0>, AllocationError> {
    let bytes = bytes_for_bits(m);
    let mut raw: Vec<u8> = Vec::new();
    raw.try_reserve_exact(bytes)
        .map_err(|_| AllocationError { requested_bits: m })?;
    raw.resize(bytes, 0);

    let mut bits = BitVec::<u8, Lsb0>::from_vec(raw);
    bits.truncate(m);
    Ok(bits)
}
