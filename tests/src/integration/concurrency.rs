//! # Concurrency Scenarios
//!
//! Many simultaneous callers against one registry: first use of a
//! collection, interleaved batches and abandoned requests.

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use dedup_filters::{
        AllowList, BatchCoordinator, CollectionRegistry, DedupService, DeduplicationApi,
        FilterConfig,
    };
    use tokio::time::timeout;

    fn service() -> DedupService {
        let registry = Arc::new(
            CollectionRegistry::new(AllowList::default(), FilterConfig::default()).unwrap(),
        );
        DedupService::new(registry)
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn test_concurrent_first_use_creates_one_chain() {
        let service = service();

        let tasks: Vec<_> = (0..32)
            .map(|t| {
                let service = service.clone();
                tokio::spawn(async move {
                    service
                        .add_batch("urls", vec![format!("first-use-{}", t)])
                        .await
                })
            })
            .collect();
        for task in tasks {
            assert_eq!(task.await.unwrap().unwrap(), vec![false]);
        }

        assert_eq!(service.registry().len(), 1);
        let info = service.info("urls").await.unwrap();
        assert_eq!(info.filter_num, 1);
        assert_eq!(info.inserted_num, 32, "No add may land in a discarded chain");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn test_concurrent_growth_never_loses_items() {
        let service = service();

        let tasks: Vec<_> = (0..8)
            .map(|t| {
                let service = service.clone();
                tokio::spawn(async move {
                    let batch: Vec<String> =
                        (0..500).map(|i| format!("https://{}/{}", t, i)).collect();
                    service.add_batch("main", batch.clone()).await.unwrap();
                    batch
                })
            })
            .collect();

        let mut all = Vec::new();
        for task in tasks {
            all.extend(task.await.unwrap());
        }

        let exists = service.exists_batch("main", all).await.unwrap();
        assert!(exists.iter().all(|&present| present));

        let info = service.info("main").await.unwrap();
        // 4000 items need 100 + 200 + ... + 3200 = 6300 capacity: 6 units.
        assert_eq!(info.filter_num, 6);
        assert!(info.inserted_num <= info.capacity);
    }

    #[test]
    fn test_same_item_from_many_threads_added_once() {
        let registry = Arc::new(
            CollectionRegistry::new(AllowList::default(), FilterConfig::default()).unwrap(),
        );
        let coordinator = BatchCoordinator::new(Arc::clone(&registry));

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let coordinator = coordinator.clone();
                std::thread::spawn(move || coordinator.batch_add("clipped", &["contested"]).unwrap())
            })
            .collect();
        let results: Vec<bool> = handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect();

        assert_eq!(results.iter().filter(|&&present| !present).count(), 1);
        let info = registry.resolve("clipped").unwrap().read().info();
        assert_eq!(info.inserted_num, 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_timed_out_batch_still_applies() {
        let service = service();
        let batch: Vec<String> = (0..50_000).map(|i| format!("slow-{}", i)).collect();

        let outcome = timeout(
            Duration::from_micros(1),
            service.add_batch("clipped", batch.clone()),
        )
        .await;

        if outcome.is_ok() {
            // Finished before the deadline; the effects are there either way.
            let exists = service.exists_batch("clipped", batch).await.unwrap();
            assert!(exists.iter().all(|&present| present));
            return;
        }

        let mut complete = false;
        for _ in 0..500 {
            let info = service.info("clipped").await.unwrap();
            if info.inserted_num >= 49_000 {
                complete = true;
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert!(complete, "Abandoned batch must still run to completion");
    }
}
