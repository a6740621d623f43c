//! # Request Scenarios
//!
//! Drives the engine the way a transport does: through `DedupRuntime`,
//! its `DeduplicationApi` service and the request handler.

#[cfg(test)]
mod tests {
    use dedup_filters::events::error_codes;
    use dedup_filters::{DeduplicationApi, FilterError};
    use dedup_runtime::{DedupRuntime, RuntimeConfig};
    use serde_json::json;

    fn items(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    async fn runtime() -> DedupRuntime {
        DedupRuntime::start(RuntimeConfig::default()).await.unwrap()
    }

    #[tokio::test]
    async fn test_add_exists_info_flow() {
        let runtime = runtime().await;
        let service = runtime.service();

        let added = service
            .add_batch("main", items(&["http://a", "http://b"]))
            .await
            .unwrap();
        assert_eq!(added, vec![false, false]);

        let exists = service
            .exists_batch("main", items(&["http://a", "http://c"]))
            .await
            .unwrap();
        assert_eq!(exists, vec![true, false]);

        let info = service.info("main").await.unwrap();
        assert_eq!(info.inserted_num, 2);
        assert_eq!(info.capacity, 100);
        assert_eq!(info.filter_num, 1);
    }

    #[tokio::test]
    async fn test_collections_are_independent() {
        let runtime = runtime().await;
        let service = runtime.service();

        service.add_batch("main", items(&["shared"])).await.unwrap();
        let in_urls = service.exists_batch("urls", items(&["shared"])).await.unwrap();

        assert_eq!(in_urls, vec![false]);
    }

    #[tokio::test]
    async fn test_unknown_collection_rejected() {
        let runtime = runtime().await;
        let service = runtime.service();

        let result = service.add_batch("bogus", items(&["x"])).await;
        assert!(matches!(result, Err(FilterError::InvalidCollection(_))));

        let result = service.exists_batch("MAIN", items(&["x"])).await;
        assert!(matches!(result, Err(FilterError::InvalidCollection(_))));

        assert_eq!(runtime.metrics().requests_rejected, 2);
        assert_eq!(runtime.metrics().collections_created, 0);
    }

    #[tokio::test]
    async fn test_repeat_within_batch() {
        let runtime = runtime().await;

        let added = runtime
            .service()
            .add_batch("urls", items(&["x", "x"]))
            .await
            .unwrap();

        assert_eq!(added, vec![false, true]);
    }

    #[tokio::test]
    async fn test_add_twice_across_calls() {
        let runtime = runtime().await;
        let service = runtime.service();

        let first = service.add_batch("clipped", items(&["item"])).await.unwrap();
        let second = service.add_batch("clipped", items(&["item"])).await.unwrap();

        assert_eq!(first, vec![false]);
        assert_eq!(second, vec![true]);
        assert_eq!(service.info("clipped").await.unwrap().inserted_num, 1);
    }

    #[tokio::test]
    async fn test_growth_through_service() {
        let runtime = runtime().await;
        let service = runtime.service();

        // 150 distinct items overflow the first 100-item unit but not the second.
        let batch: Vec<String> = (0..150).map(|i| format!("https://site/{}", i)).collect();
        service.add_batch("main", batch).await.unwrap();

        let info = service.info("main").await.unwrap();
        assert_eq!(info.filter_num, 2, "Overflowing the first unit must trigger one growth");
        assert_eq!(info.capacity, 300);
    }

    #[tokio::test]
    async fn test_upload_handler_flow() {
        let runtime = runtime().await;
        let handler = runtime.handler();

        let new = handler
            .add("urls", b"https://a\nhttps://b\nhttps://a\n")
            .await
            .unwrap();
        assert_eq!(new, "https://a\nhttps://b");

        let unseen = handler
            .deduplicate("urls", b"https://b\nhttps://z\n")
            .await
            .unwrap();
        assert_eq!(unseen, "https://z");

        let info = handler.info("urls").await.unwrap();
        assert_eq!(info["inserted_num"], 2);
    }

    #[tokio::test]
    async fn test_handler_error_codes() {
        let runtime = runtime().await;
        let handler = runtime.handler();

        let err = handler
            .handle("info", json!({ "collection": "private" }))
            .await
            .unwrap_err();

        assert_eq!(err.error_code, error_codes::INVALID_COLLECTION);
    }

    #[tokio::test]
    async fn test_custom_allow_list() {
        let config = RuntimeConfig {
            collections: vec!["archive".to_string()],
            ..Default::default()
        };
        let runtime = DedupRuntime::start(config).await.unwrap();
        let service = runtime.service();

        assert!(service.add_batch("archive", items(&["a"])).await.is_ok());
        assert!(matches!(
            service.add_batch("main", items(&["a"])).await,
            Err(FilterError::InvalidCollection(_))
        ));
    }
}
