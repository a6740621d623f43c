//! # Dedup Runtime
//!
//! Runs the deduplication engine until Ctrl-C, then flushes snapshots and
//! exits. Configuration comes from `DEDUP_*` environment variables (see
//! [`RuntimeConfig::from_env`]).

use anyhow::{Context, Result};
use tracing::info;

use dedup_runtime::{init_tracing, DedupRuntime, RuntimeConfig};

#[tokio::main]
async fn main() -> Result<()> {
    let config = RuntimeConfig::from_env();
    init_tracing(&config).context("Failed to initialize tracing")?;

    let runtime = DedupRuntime::start(config)
        .await
        .context("Failed to start dedup runtime")?;

    info!("Dedup runtime ready, press Ctrl-C to stop");
    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for shutdown signal")?;

    runtime.shutdown().await
}
