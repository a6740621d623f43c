//! Request messages accepted by the transport-facing handler

use serde::{Deserialize, Serialize};

/// Batch add or batch exists over explicit items
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BatchRequest {
    /// Target collection (must be allow-listed)
    pub collection: String,
    /// Items in request order
    pub items: Vec<String>,
}

/// Newline-delimited upload, as sent by the file endpoints
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UploadRequest {
    pub collection: String,
    /// One item per line
    pub body: String,
}

/// Collection statistics query
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct InfoRequest {
    pub collection: String,
}
