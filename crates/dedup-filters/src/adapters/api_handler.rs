//! Transport-facing request handler
//!
//! Maps the upload endpoints (`deduplicate`, `add`, `info`) and a JSON
//! method dispatch onto a [`DeduplicationApi`]. The transport itself (HTTP,
//! multipart, compression) lives outside this crate.

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use crate::domain::{decode_items, newly_seen};
use crate::error::FilterError;
use crate::events::{
    BatchRequest, BatchResponse, ErrorResponse, InfoRequest, InfoResponse, UploadRequest,
    UploadResponse,
};
use crate::ports::DeduplicationApi;

/// Request handler over any [`DeduplicationApi`] implementation
pub struct DedupRequestHandler<S: DeduplicationApi> {
    service: S,
}

impl<S: DeduplicationApi> DedupRequestHandler<S> {
    pub fn new(service: S) -> Self {
        Self { service }
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    /// Items of `body` not yet in `collection`, one per line; nothing is added
    pub async fn deduplicate(&self, collection: &str, body: &[u8]) -> Result<String, FilterError> {
        let items = decode_items(body);
        let flags = self.service.exists_batch(collection, items.clone()).await?;
        Ok(newly_seen(&items, &flags).join("\n"))
    }

    /// Add every item of `body`; returns the items that were new, one per line
    pub async fn add(&self, collection: &str, body: &[u8]) -> Result<String, FilterError> {
        let items = decode_items(body);
        let flags = self.service.add_batch(collection, items.clone()).await?;
        Ok(newly_seen(&items, &flags).join("\n"))
    }

    /// `{ inserted_num, capacity, filter_num, size_bits, expansion_rate }`
    pub async fn info(&self, collection: &str) -> Result<Value, FilterError> {
        let info = InfoResponse::from(self.service.info(collection).await?);
        to_json(&info)
    }

    /// Dispatch a method call with JSON parameters
    ///
    /// Methods: `add_batch`, `exists_batch` (params: [`BatchRequest`]),
    /// `deduplicate`, `add` (params: [`UploadRequest`]), `info`
    /// (params: [`InfoRequest`]).
    pub async fn handle(&self, method: &str, params: Value) -> Result<Value, ErrorResponse> {
        debug!(method, "Handling request");
        self.dispatch(method, params).await.map_err(|e| {
            warn!(method, error = %e, "Request failed");
            ErrorResponse::from(e)
        })
    }

    async fn dispatch(&self, method: &str, params: Value) -> Result<Value, FilterError> {
        match method {
            "add_batch" => {
                let request: BatchRequest = parse_params(params)?;
                let results = self
                    .service
                    .add_batch(&request.collection, request.items)
                    .await?;
                to_json(&BatchResponse {
                    collection: request.collection,
                    results,
                })
            }
            "exists_batch" => {
                let request: BatchRequest = parse_params(params)?;
                let results = self
                    .service
                    .exists_batch(&request.collection, request.items)
                    .await?;
                to_json(&BatchResponse {
                    collection: request.collection,
                    results,
                })
            }
            "deduplicate" | "add" => {
                let request: UploadRequest = parse_params(params)?;
                let items = decode_items(request.body.as_bytes());
                let flags = if method == "add" {
                    self.service
                        .add_batch(&request.collection, items.clone())
                        .await?
                } else {
                    self.service
                        .exists_batch(&request.collection, items.clone())
                        .await?
                };
                let new_items = newly_seen(&items, &flags)
                    .into_iter()
                    .map(str::to_string)
                    .collect();
                to_json(&UploadResponse {
                    collection: request.collection,
                    new_items,
                })
            }
            "info" => {
                let request: InfoRequest = parse_params(params)?;
                self.info(&request.collection).await
            }
            _ => Err(FilterError::InvalidMethod(method.to_string())),
        }
    }
}

fn parse_params<T: DeserializeOwned>(params: Value) -> Result<T, FilterError> {
    serde_json::from_value(params).map_err(|e| FilterError::InvalidParams(e.to_string()))
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<Value, FilterError> {
    serde_json::to_value(value).map_err(|e| FilterError::Serialization(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AllowList, FilterConfig};
    use crate::events::error_codes;
    use crate::service::{CollectionRegistry, DedupService};
    use serde_json::json;
    use std::sync::Arc;

    fn handler() -> DedupRequestHandler<DedupService> {
        let registry = Arc::new(
            CollectionRegistry::new(AllowList::default(), FilterConfig::default()).unwrap(),
        );
        DedupRequestHandler::new(DedupService::new(registry))
    }

    #[tokio::test]
    async fn test_upload_endpoints() {
        let handler = handler();

        let new = handler.add("urls", b"http://a\nhttp://b\n").await.unwrap();
        assert_eq!(new, "http://a\nhttp://b");

        let unseen = handler
            .deduplicate("urls", b"http://a\r\nhttp://c\r\n")
            .await
            .unwrap();
        assert_eq!(unseen, "http://c");

        // deduplicate does not insert
        let unseen = handler.deduplicate("urls", b"http://c").await.unwrap();
        assert_eq!(unseen, "http://c");

        let info = handler.info("urls").await.unwrap();
        assert_eq!(info["inserted_num"], 2);
        assert_eq!(info["filter_num"], 1);
    }

    #[tokio::test]
    async fn test_add_reports_repeats_once() {
        let handler = handler();

        let new = handler.add("main", b"x\nx\ny").await.unwrap();

        assert_eq!(new, "x\ny");
    }

    #[tokio::test]
    async fn test_invalid_utf8_dropped() {
        let handler = handler();

        let new = handler.add("main", b"ab\xffc\nd").await.unwrap();

        assert_eq!(new, "abc\nd");
    }

    #[tokio::test]
    async fn test_handle_batch_methods() {
        let handler = handler();

        let added = handler
            .handle(
                "add_batch",
                json!({ "collection": "main", "items": ["http://a", "http://b"] }),
            )
            .await
            .unwrap();
        assert_eq!(added["results"], json!([false, false]));

        let exists = handler
            .handle(
                "exists_batch",
                json!({ "collection": "main", "items": ["http://a", "http://c"] }),
            )
            .await
            .unwrap();
        assert_eq!(exists["results"], json!([true, false]));

        let uploaded = handler
            .handle(
                "deduplicate",
                json!({ "collection": "main", "body": "http://b\nhttp://d\n" }),
            )
            .await
            .unwrap();
        assert_eq!(uploaded["new_items"], json!(["http://d"]));

        let info = handler
            .handle("info", json!({ "collection": "main" }))
            .await
            .unwrap();
        assert_eq!(info["inserted_num"], 2);
    }

    #[tokio::test]
    async fn test_handle_errors() {
        let handler = handler();

        let err = handler
            .handle("add_batch", json!({ "collection": "other", "items": ["a"] }))
            .await
            .unwrap_err();
        assert_eq!(err.error_code, error_codes::INVALID_COLLECTION);

        let err = handler.handle("drop_all", json!({})).await.unwrap_err();
        assert_eq!(err.error_code, error_codes::INVALID_METHOD);

        let err = handler
            .handle("add_batch", json!({ "collection": "main" }))
            .await
            .unwrap_err();
        assert_eq!(err.error_code, error_codes::INVALID_PARAMS);
    }
}
