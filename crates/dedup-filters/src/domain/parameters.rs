//! Optimal filter unit parameter calculation
//!
//! Formulas:
//! - m = ceil(-c*ln(p) / (ln(2)^2))  -- optimal bits
//! - k = round((m/c) * ln(2))        -- optimal hash functions
//! - FPR = (1 - e^(-kn/m))^k         -- expected false positive rate

use std::f64::consts::LN_2;

/// Sizing of a single filter unit
#[derive(Clone, Debug, PartialEq)]
pub struct UnitParams {
    /// Number of bits in the unit (m)
    pub size_bits: usize,
    /// Number of hash functions (k)
    pub hash_count: usize,
    /// Expected false positive rate once the unit is at capacity
    pub expected_fpr: f64,
}

/// Calculate optimal unit parameters for a capacity and false positive target
///
/// Both `size_bits` and `hash_count` are at least 1.
pub fn calculate_optimal_parameters(capacity: usize, target_fpr: f64) -> UnitParams {
    if capacity == 0 {
        return UnitParams {
            size_bits: 1,
            hash_count: 1,
            expected_fpr: 1.0,
        };
    }

    let c = capacity as f64;
    let ln2_squared = LN_2 * LN_2;

    let m = ((-c * target_fpr.ln() / ln2_squared).ceil() as usize).max(1);
    let k = (((m as f64 / c) * LN_2).round() as usize).max(1);

    UnitParams {
        size_bits: m,
        hash_count: k,
        expected_fpr: calculate_fpr(m, capacity, k),
    }
}

/// Calculate the false positive rate for given parameters
///
/// Formula: FPR = (1 - e^(-kn/m))^k
pub fn calculate_fpr(m: usize, n: usize, k: usize) -> f64 {
    if m == 0 {
        return 1.0;
    }
    let exponent = -(k as f64) * (n as f64) / (m as f64);
    (1.0 - exponent.exp()).powi(k as i32)
}

/// Number of bytes backing a bit array of `m` bits
pub fn bytes_for_bits(m: usize) -> usize {
    m.div_ceil(8)
}
