//! Filter chain configuration and validation
//!
//! # Example
//!
//! ```ignore
//! use dedup_filters::domain::FilterConfigBuilder;
//!
//! let config = FilterConfigBuilder::new()
//!     .initial_capacity(1_000_000)
//!     .error_rate(0.001)
//!     .build()
//!     .expect("Valid config");
//! ```

use serde::{Deserialize, Serialize};

use super::parameters::calculate_optimal_parameters;
use crate::error::FilterError;

/// Configuration applied to every chain created by a registry
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FilterConfig {
    /// Capacity of the first unit of a new chain
    pub initial_capacity: usize,
    /// Cumulative false positive bound for the whole chain
    pub error_rate: f64,
    /// Capacity multiplier for each new unit (r)
    pub growth_ratio: usize,
    /// Error rate multiplier for each new unit (s)
    pub tightening_ratio: f64,
    /// Largest bit array a single unit may allocate
    pub max_unit_bits: usize,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            initial_capacity: 100,
            error_rate: 0.01,
            growth_ratio: 2,
            tightening_ratio: 0.5,
            max_unit_bits: 1 << 34, // 2 GiB
        }
    }
}

impl FilterConfig {
    /// Validate ranges and check that the first unit fits the bit limit
    pub fn validate(&self) -> Result<(), FilterError> {
        if self.initial_capacity == 0 {
            return Err(FilterError::InvalidParameters(
                "initial_capacity cannot be 0".to_string(),
            ));
        }

        if !(self.error_rate > 0.0 && self.error_rate < 1.0) {
            return Err(FilterError::InvalidParameters(format!(
                "error_rate must be in (0, 1), got {}",
                self.error_rate
            )));
        }

        if self.growth_ratio == 0 {
            return Err(FilterError::InvalidParameters(
                "growth_ratio must be at least 1".to_string(),
            ));
        }

        if !(self.tightening_ratio > 0.0 && self.tightening_ratio < 1.0) {
            return Err(FilterError::InvalidParameters(format!(
                "tightening_ratio must be in (0, 1), got {}",
                self.tightening_ratio
            )));
        }

        if self.max_unit_bits == 0 {
            return Err(FilterError::InvalidParameters(
                "max_unit_bits cannot be 0".to_string(),
            ));
        }

        let first = calculate_optimal_parameters(self.initial_capacity, self.first_unit_error_rate());
        if first.size_bits > self.max_unit_bits {
            return Err(FilterError::InvalidParameters(format!(
                "first unit needs {} bits, limit is {}",
                first.size_bits, self.max_unit_bits
            )));
        }

        Ok(())
    }

    /// Error rate of the first unit: `error_rate * (1 - s)`
    ///
    /// Unit i then gets `error_rate * (1 - s) * s^i`, and the geometric sum
    /// over all units stays below `error_rate`.
    pub fn first_unit_error_rate(&self) -> f64 {
        self.error_rate * (1.0 - self.tightening_ratio)
    }
}

/// Builder for FilterConfig with validation
#[derive(Default)]
pub struct FilterConfigBuilder {
    initial_capacity: Option<usize>,
    error_rate: Option<f64>,
    growth_ratio: Option<usize>,
    tightening_ratio: Option<f64>,
    max_unit_bits: Option<usize>,
}

impl FilterConfigBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self::default()
    }

    pub fn initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = Some(capacity);
        self
    }

    pub fn error_rate(mut self, rate: f64) -> Self {
        self.error_rate = Some(rate);
        self
    }

    pub fn growth_ratio(mut self, ratio: usize) -> Self {
        self.growth_ratio = Some(ratio);
        self
    }

    pub fn tightening_ratio(mut self, ratio: f64) -> Self {
        self.tightening_ratio = Some(ratio);
        self
    }

    pub fn max_unit_bits(mut self, bits: usize) -> Self {
        self.max_unit_bits = Some(bits);
        self
    }

    /// Build the FilterConfig, validating all parameters
    pub fn build(self) -> Result<FilterConfig, FilterError> {
        let config = self.build_unchecked();
        config.validate()?;
        Ok(config)
    }

    /// Build without validation (for internal use only)
    pub fn build_unchecked(self) -> FilterConfig {
        let defaults = FilterConfig::default();

        FilterConfig {
            initial_capacity: self.initial_capacity.unwrap_or(defaults.initial_capacity),
            error_rate: self.error_rate.unwrap_or(defaults.error_rate),
            growth_ratio: self.growth_ratio.unwrap_or(defaults.growth_ratio),
            tightening_ratio: self.tightening_ratio.unwrap_or(defaults.tightening_ratio),
            max_unit_bits: self.max_unit_bits.unwrap_or(defaults.max_unit_bits),
        }
    }
}
