//! Domain Layer - Pure business logic
//!
//! This layer contains:
//! - Filter units and their hash functions
//! - Parameter calculations
//! - Scalable filter chains
//! - Configuration and the collection allow-list
//! - Snapshot format
//! - Item decoding
//!
//! RULES:
//! - No I/O operations
//! - No async code
//! - Pure functions where possible

pub mod allow_list;
pub mod chain;
pub mod config;
pub mod filter_unit;
pub mod hash_functions;
pub mod items;
pub mod parameters;
pub mod snapshot;

pub use allow_list::{AllowList, CollectionName, DEFAULT_COLLECTIONS};
pub use chain::{ChainInfo, FilterChain};
pub use config::{FilterConfig, FilterConfigBuilder};
pub use filter_unit::{AllocationError, FilterUnit};
pub use items::{decode_items, newly_seen};
pub use parameters::{calculate_fpr, calculate_optimal_parameters, UnitParams};
pub use snapshot::{ChainSnapshot, UnitSnapshot, SNAPSHOT_VERSION};
