//! Runtime configuration from environment variables.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use dedup_filters::{AllowList, FilterConfig, FilterConfigBuilder, FilterError, DEFAULT_COLLECTIONS};

/// Everything the runtime needs to start the engine.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Allow-listed collection names
    pub collections: Vec<String>,

    /// Capacity of the first unit of every chain
    pub initial_capacity: usize,

    /// Cumulative false-positive bound per chain
    pub error_rate: f64,

    /// Capacity multiplier between consecutive units
    pub growth_ratio: usize,

    /// Error-rate multiplier between consecutive units
    pub tightening_ratio: f64,

    /// Largest bit array a single unit may allocate
    pub max_unit_bits: usize,

    /// Snapshot directory; `None` disables persistence
    pub data_dir: Option<PathBuf>,

    /// Period of the background flush
    pub flush_interval: Duration,

    /// Log level filter (trace, debug, info, warn, error)
    pub log_level: String,

    /// Whether to emit JSON formatted logs
    pub json_logs: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        let filter = FilterConfig::default();
        Self {
            collections: DEFAULT_COLLECTIONS.iter().map(|s| s.to_string()).collect(),
            initial_capacity: filter.initial_capacity,
            error_rate: filter.error_rate,
            growth_ratio: filter.growth_ratio,
            tightening_ratio: filter.tightening_ratio,
            max_unit_bits: filter.max_unit_bits,
            data_dir: None,
            flush_interval: Duration::from_secs(60),
            log_level: "info".to_string(),
            json_logs: false,
        }
    }
}

impl RuntimeConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `DEDUP_COLLECTIONS`: Comma separated collection names (default: clipped,main,urls)
    /// - `DEDUP_INITIAL_CAPACITY`: First unit capacity (default: 100)
    /// - `DEDUP_ERROR_RATE`: Cumulative error rate (default: 0.01)
    /// - `DEDUP_GROWTH_RATIO`: Capacity growth per unit (default: 2)
    /// - `DEDUP_TIGHTENING_RATIO`: Error-rate tightening per unit (default: 0.5)
    /// - `DEDUP_MAX_UNIT_BITS`: Bit limit per unit (default: 2^34)
    /// - `DEDUP_DATA_DIR`: Snapshot directory (default: unset, no persistence)
    /// - `DEDUP_FLUSH_INTERVAL_SECS`: Flush period (default: 60)
    /// - `DEDUP_LOG_LEVEL` or `RUST_LOG`: Log level (default: info)
    /// - `DEDUP_JSON_LOGS`: Enable JSON logs (default: false in dev, true in containers)
    ///
    /// Unparsable numeric values fall back to their defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`RuntimeConfig::from_env`] over an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let is_container =
            lookup("KUBERNETES_SERVICE_HOST").is_some() || lookup("DOCKER_CONTAINER").is_some();

        Self {
            collections: lookup("DEDUP_COLLECTIONS")
                .map(|v| {
                    v.split(',')
                        .map(str::trim)
                        .filter(|s| !s.is_empty())
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or(defaults.collections),

            initial_capacity: parse_var(&lookup, "DEDUP_INITIAL_CAPACITY")
                .unwrap_or(defaults.initial_capacity),

            error_rate: parse_var(&lookup, "DEDUP_ERROR_RATE").unwrap_or(defaults.error_rate),

            growth_ratio: parse_var(&lookup, "DEDUP_GROWTH_RATIO").unwrap_or(defaults.growth_ratio),

            tightening_ratio: parse_var(&lookup, "DEDUP_TIGHTENING_RATIO")
                .unwrap_or(defaults.tightening_ratio),

            max_unit_bits: parse_var(&lookup, "DEDUP_MAX_UNIT_BITS")
                .unwrap_or(defaults.max_unit_bits),

            data_dir: lookup("DEDUP_DATA_DIR")
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from),

            flush_interval: parse_var(&lookup, "DEDUP_FLUSH_INTERVAL_SECS")
                .filter(|&secs: &u64| secs > 0)
                .map(Duration::from_secs)
                .unwrap_or(defaults.flush_interval),

            log_level: lookup("DEDUP_LOG_LEVEL")
                .or_else(|| lookup("RUST_LOG"))
                .unwrap_or(defaults.log_level),

            json_logs: lookup("DEDUP_JSON_LOGS")
                .map(|v| v.to_lowercase() == "true" || v == "1")
                .unwrap_or(is_container),
        }
    }

    /// Build and validate the engine configuration.
    pub fn filter_config(&self) -> Result<FilterConfig, FilterError> {
        FilterConfigBuilder::new()
            .initial_capacity(self.initial_capacity)
            .error_rate(self.error_rate)
            .growth_ratio(self.growth_ratio)
            .tightening_ratio(self.tightening_ratio)
            .max_unit_bits(self.max_unit_bits)
            .build()
    }

    /// Build the collection allow-list.
    pub fn allow_list(&self) -> Result<AllowList, FilterError> {
        AllowList::new(&self.collections)
    }
}

fn parse_var<T, F>(lookup: &F, key: &str) -> Option<T>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    lookup(key).and_then(|v| v.trim().parse().ok())
}
