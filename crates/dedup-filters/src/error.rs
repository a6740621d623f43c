//! Error types for the deduplication engine

use thiserror::Error;

/// Errors that can occur while serving a deduplication request
#[derive(Debug, Error)]
pub enum FilterError {
    #[error("Invalid collection: {0}")]
    InvalidCollection(String),

    #[error("Capacity exhausted for collection {collection}: cannot allocate {requested_bits} bits")]
    CapacityExhausted {
        collection: String,
        requested_bits: usize,
    },

    #[error("Invalid filter parameters: {0}")]
    InvalidParameters(String),

    #[error("Snapshot store error: {0}")]
    Store(#[from] StoreError),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Invalid method: {0}")]
    InvalidMethod(String),

    #[error("Invalid params: {0}")]
    InvalidParams(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Errors from snapshot stores
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Corrupt snapshot for {name}: {reason}")]
    Corrupt { name: String, reason: String },

    #[error("Checksum mismatch for {name}: expected {expected:#010x}, found {found:#010x}")]
    ChecksumMismatch {
        name: String,
        expected: u32,
        found: u32,
    },

    #[error("Unsupported snapshot version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },

    #[error("Data directory already in use: {0}")]
    Locked(String),
}
