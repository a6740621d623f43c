//! # Persistence Scenarios
//!
//! Restart the runtime over the same data directory and check that every
//! collection comes back exactly as it was flushed.

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::Path;

    use dedup_filters::{DeduplicationApi, FileSnapshotStore, SnapshotStore};
    use dedup_runtime::{DedupRuntime, RuntimeConfig};

    fn config(dir: &Path) -> RuntimeConfig {
        RuntimeConfig {
            data_dir: Some(dir.to_path_buf()),
            ..Default::default()
        }
    }

    fn urls(range: std::ops::Range<usize>) -> Vec<String> {
        range.map(|i| format!("https://example.org/{}", i)).collect()
    }

    #[tokio::test]
    async fn test_restart_restores_collections() {
        let dir = tempfile::tempdir().unwrap();

        let runtime = DedupRuntime::start(config(dir.path())).await.unwrap();
        let service = runtime.service();
        service.add_batch("main", urls(0..250)).await.unwrap();
        service.add_batch("urls", urls(0..10)).await.unwrap();
        let before = service.info("main").await.unwrap();
        runtime.shutdown().await.unwrap();

        assert!(dir.path().join("main.bloom").exists());
        assert!(dir.path().join("urls.bloom").exists());

        let runtime = DedupRuntime::start(config(dir.path())).await.unwrap();
        let service = runtime.service();

        let after = service.info("main").await.unwrap();
        assert_eq!(after, before, "Reload must keep unit order and counters");

        let exists = service.exists_batch("main", urls(0..250)).await.unwrap();
        assert!(exists.iter().all(|&present| present));

        let added = service.add_batch("urls", urls(5..15)).await.unwrap();
        assert_eq!(&added[..5], &[true; 5]);
        assert!(added[5..].iter().filter(|&&present| !present).count() >= 4);
        runtime.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_data_dir_locked_while_running() {
        let dir = tempfile::tempdir().unwrap();

        let runtime = DedupRuntime::start(config(dir.path())).await.unwrap();
        assert!(DedupRuntime::start(config(dir.path())).await.is_err());

        runtime.shutdown().await.unwrap();
        let runtime = DedupRuntime::start(config(dir.path())).await.unwrap();
        runtime.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_corrupt_snapshot_fails_startup() {
        let dir = tempfile::tempdir().unwrap();
        let runtime = DedupRuntime::start(config(dir.path())).await.unwrap();
        runtime
            .service()
            .add_batch("clipped", urls(0..3))
            .await
            .unwrap();
        runtime.shutdown().await.unwrap();

        let path = dir.path().join("clipped.bloom");
        let bytes = fs::read(&path).unwrap();
        fs::write(&path, &bytes[..bytes.len() / 2]).unwrap();

        assert!(DedupRuntime::start(config(dir.path())).await.is_err());
    }

    #[tokio::test]
    async fn test_snapshot_outside_allow_list_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let runtime = DedupRuntime::start(config(dir.path())).await.unwrap();
        runtime
            .service()
            .add_batch("main", urls(0..3))
            .await
            .unwrap();
        runtime.shutdown().await.unwrap();

        let narrowed = RuntimeConfig {
            collections: vec!["urls".to_string()],
            ..config(dir.path())
        };
        let runtime = DedupRuntime::start(narrowed).await.unwrap();
        assert!(runtime.service().info("main").await.is_err());
        runtime.shutdown().await.unwrap();

        // The skipped snapshot is left on disk untouched.
        let store = FileSnapshotStore::open(dir.path()).unwrap();
        let names: Vec<String> = store.load_all().unwrap().into_iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["main"]);
    }

    #[tokio::test]
    async fn test_explicit_flush_only_writes_changes() {
        let dir = tempfile::tempdir().unwrap();
        let runtime = DedupRuntime::start(config(dir.path())).await.unwrap();
        let service = runtime.service();

        service.add_batch("main", urls(0..3)).await.unwrap();
        let report = runtime.flush().await.unwrap().unwrap();
        assert_eq!(report.saved, 1);

        service.add_batch("main", urls(0..3)).await.unwrap();
        let report = runtime.flush().await.unwrap().unwrap();
        assert_eq!(report.saved, 0);
        assert_eq!(report.unchanged, 1);

        runtime.shutdown().await.unwrap();
    }
}
