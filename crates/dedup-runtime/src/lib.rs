//! # Dedup Runtime
//!
//! Bootstraps the deduplication engine for a transport layer:
//!
//! 1. Load configuration from the environment
//! 2. Build the allow-list, filter configuration and metrics
//! 3. Open the snapshot directory (if configured) and restore collections
//! 4. Run the periodic flush task
//! 5. On shutdown, stop the task and flush once more
//!
//! The main entry point is the `main.rs` binary.

pub mod config;
pub mod telemetry;

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{error, info, warn};

use dedup_filters::{
    CollectionRegistry, DedupRequestHandler, DedupService, FileSnapshotStore, FlushReport,
    Metrics, MetricsSnapshot, SnapshotFlusher, SnapshotStore,
};

pub use config::RuntimeConfig;
pub use telemetry::{init_tracing, TelemetryError};

/// A running engine plus its background flush task.
pub struct DedupRuntime {
    config: RuntimeConfig,
    service: Arc<DedupService>,
    metrics: Arc<Metrics>,
    flusher: Option<Arc<SnapshotFlusher>>,
    flush_task: Option<JoinHandle<()>>,
    shutdown_tx: watch::Sender<bool>,
}

impl DedupRuntime {
    /// Start with the file store in `config.data_dir`, if any.
    pub async fn start(config: RuntimeConfig) -> Result<Self> {
        let store = match &config.data_dir {
            Some(dir) => {
                let store = FileSnapshotStore::open(dir)
                    .with_context(|| format!("Failed to open data directory {}", dir.display()))?;
                Some(Arc::new(store) as Arc<dyn SnapshotStore>)
            }
            None => None,
        };
        Self::start_with_store(config, store).await
    }

    /// Start with an explicit snapshot store; `None` runs memory-only.
    pub async fn start_with_store(
        config: RuntimeConfig,
        store: Option<Arc<dyn SnapshotStore>>,
    ) -> Result<Self> {
        let allow_list = config.allow_list().context("Invalid collection list")?;
        let filter_config = config.filter_config().context("Invalid filter configuration")?;
        let metrics = Arc::new(Metrics::new());

        info!(
            collections = ?allow_list.names().collect::<Vec<_>>(),
            initial_capacity = filter_config.initial_capacity,
            error_rate = filter_config.error_rate,
            growth_ratio = filter_config.growth_ratio,
            tightening_ratio = filter_config.tightening_ratio,
            persistence = store.is_some(),
            "Starting dedup runtime"
        );

        let registry = Arc::new(
            CollectionRegistry::new(allow_list, filter_config)?.with_metrics(metrics.clone()),
        );

        let flusher = match store {
            Some(store) => {
                let snapshots = store.load_all().context("Failed to load snapshots")?;
                let restored = registry
                    .restore(snapshots)
                    .context("Failed to restore collections")?;
                info!(restored, "Restored collections");

                let flusher = Arc::new(SnapshotFlusher::new(Arc::clone(&registry), store));
                flusher.mark_clean();
                Some(flusher)
            }
            None => {
                warn!("No data directory configured, collections will not survive restarts");
                None
            }
        };

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let flush_task = flusher
            .as_ref()
            .map(|flusher| spawn_flush_task(Arc::clone(flusher), &config, shutdown_rx));

        Ok(Self {
            config,
            service: Arc::new(DedupService::new(registry)),
            metrics,
            flusher,
            flush_task,
            shutdown_tx,
        })
    }

    /// The service a transport should call.
    pub fn service(&self) -> Arc<DedupService> {
        Arc::clone(&self.service)
    }

    /// Request handler over the service.
    pub fn handler(&self) -> DedupRequestHandler<DedupService> {
        DedupRequestHandler::new(self.service.as_ref().clone())
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    /// Flush now instead of waiting for the next tick; `None` without a store.
    pub async fn flush(&self) -> Result<Option<FlushReport>> {
        match &self.flusher {
            Some(flusher) => Ok(Some(run_flush(Arc::clone(flusher)).await?)),
            None => Ok(None),
        }
    }

    /// Stop the flush task and write every changed collection.
    ///
    /// Fails if the final flush could not save every collection.
    pub async fn shutdown(mut self) -> Result<()> {
        info!("Initiating graceful shutdown...");

        if let Err(e) = self.shutdown_tx.send(true) {
            error!("Failed to send shutdown signal: {}", e);
        }
        if let Some(task) = self.flush_task.take() {
            if let Err(e) = task.await {
                error!(error = %e, "Flush task ended abnormally");
            }
        }

        if let Some(report) = self.flush().await? {
            anyhow::ensure!(
                report.is_clean(),
                "Final flush failed for {} collection(s)",
                report.failed
            );
        }

        let metrics = self.metrics.snapshot();
        info!(
            items_added = metrics.items_added,
            items_duplicate = metrics.items_duplicate,
            lookups = metrics.lookups_performed,
            "Shutdown complete"
        );
        Ok(())
    }
}

async fn run_flush(flusher: Arc<SnapshotFlusher>) -> Result<FlushReport> {
    tokio::task::spawn_blocking(move || flusher.flush())
        .await
        .context("Flush task panicked")
}

fn spawn_flush_task(
    flusher: Arc<SnapshotFlusher>,
    config: &RuntimeConfig,
    mut shutdown_rx: watch::Receiver<bool>,
) -> JoinHandle<()> {
    let period = config.flush_interval;
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately; nothing has changed yet.
        interval.tick().await;

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    if let Err(e) = run_flush(Arc::clone(&flusher)).await {
                        error!(error = %e, "Periodic flush failed");
                    }
                }
                changed = shutdown_rx.changed() => {
                    if changed.is_err() || *shutdown_rx.borrow() {
                        info!("Flush task received shutdown signal");
                        break;
                    }
                }
            }
        }
    })
}
