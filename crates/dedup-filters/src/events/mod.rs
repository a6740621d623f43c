//! Events Layer - transport message types

pub mod requests;
pub mod responses;

pub use requests::{BatchRequest, InfoRequest, UploadRequest};
pub use responses::{error_codes, BatchResponse, ErrorResponse, InfoResponse, UploadResponse};
