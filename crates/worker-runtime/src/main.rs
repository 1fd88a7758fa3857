//! # SDK Store Worker
//!
//! Runs the background worker against an in-process store until Ctrl+C.
//!
//! Configuration comes from the environment; see [`WorkerConfig::from_env`]
//! and `store_telemetry::TelemetryConfig::from_env`.

use std::sync::Arc;

use anyhow::{Context, Result};
use shared_store::InMemoryStore;
use store_telemetry::{init_telemetry, TelemetryConfig};
use tracing::info;
use worker_runtime::{WorkerConfig, WorkerRuntime};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging and metrics
    let telemetry = TelemetryConfig::from_env();
    let _guard = init_telemetry(&telemetry).context("Failed to initialize telemetry")?;

    // Load configuration
    let config = WorkerConfig::from_env();
    config.validate()?;

    let transport = Arc::new(InMemoryStore::new());
    let runtime = WorkerRuntime::new(config, transport);
    runtime.start().await?;

    info!("Worker is running. Press Ctrl+C to stop.");
    tokio::signal::ctrl_c().await?;

    let state = runtime.shutdown().await?;
    info!("Worker exited after {} ticks", state.tick_count);

    Ok(())
}
