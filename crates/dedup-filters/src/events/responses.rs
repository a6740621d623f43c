//! Response messages returned by the transport-facing handler

use serde::{Deserialize, Serialize};

use crate::domain::ChainInfo;
use crate::error::FilterError;

/// Positional results of a batch; `true` means already present
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchResponse {
    pub collection: String,
    pub results: Vec<bool>,
}

/// Newly seen items of an upload, in upload order
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadResponse {
    pub collection: String,
    pub new_items: Vec<String>,
}

/// Collection statistics
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InfoResponse {
    pub inserted_num: u64,
    pub capacity: u64,
    pub filter_num: usize,
    pub size_bits: u64,
    pub expansion_rate: usize,
}

impl From<ChainInfo> for InfoResponse {
    fn from(info: ChainInfo) -> Self {
        Self {
            inserted_num: info.inserted_num,
            capacity: info.capacity,
            filter_num: info.filter_num,
            size_bits: info.size_bits,
            expansion_rate: info.expansion_rate,
        }
    }
}

/// Error response
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code
    pub error_code: u32,
    /// Error message
    pub error_message: String,
}

impl From<&FilterError> for ErrorResponse {
    fn from(error: &FilterError) -> Self {
        let error_code = match error {
            FilterError::InvalidCollection(_) => error_codes::INVALID_COLLECTION,
            FilterError::CapacityExhausted { .. } => error_codes::CAPACITY_EXHAUSTED,
            FilterError::InvalidParameters(_) => error_codes::INVALID_PARAMETERS,
            FilterError::Store(_) => error_codes::STORE_ERROR,
            FilterError::Serialization(_) => error_codes::SERIALIZATION_ERROR,
            FilterError::InvalidMethod(_) => error_codes::INVALID_METHOD,
            FilterError::InvalidParams(_) => error_codes::INVALID_PARAMS,
            FilterError::Internal(_) => error_codes::INTERNAL_ERROR,
        };
        Self {
            error_code,
            error_message: error.to_string(),
        }
    }
}

impl From<FilterError> for ErrorResponse {
    fn from(error: FilterError) -> Self {
        Self::from(&error)
    }
}

/// Error codes for deduplication operations
pub mod error_codes {
    /// Collection name not in the allow-list
    pub const INVALID_COLLECTION: u32 = 4001;
    /// A new filter unit could not be allocated
    pub const CAPACITY_EXHAUSTED: u32 = 4002;
    /// Filter configuration rejected
    pub const INVALID_PARAMETERS: u32 = 4003;
    /// Snapshot store failure
    pub const STORE_ERROR: u32 = 4004;
    /// Response could not be encoded
    pub const SERIALIZATION_ERROR: u32 = 4005;
    /// Unknown handler method
    pub const INVALID_METHOD: u32 = 4006;
    /// Malformed method parameters
    pub const INVALID_PARAMS: u32 = 4007;
    /// Internal error
    pub const INTERNAL_ERROR: u32 = 4099;
}
