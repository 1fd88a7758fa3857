//! # Store Telemetry
//!
//! Logging and metrics for the SDK store worker.
//!
//! - Structured logs through `tracing` (pretty in development, JSON in containers)
//! - Prometheus counters, gauges and histograms for the background worker and
//!   the status monitor
//!
//! ## Usage
//!
//! ```rust,ignore
//! use store_telemetry::{TelemetryConfig, init_telemetry};
//!
//! fn main() {
//!     let config = TelemetryConfig::from_env();
//!     let _guard = init_telemetry(&config).expect("Failed to init telemetry");
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `SDK_SERVICE_NAME` | `sdk-store-worker` | Service name in log lines |
//! | `SDK_LOG_LEVEL` | `info` | Log level filter (`RUST_LOG` also honoured) |
//! | `SDK_CONSOLE_OUTPUT` | `true` | Console output |
//! | `SDK_JSON_LOGS` | `false` | JSON formatted logs |

mod config;
mod logging;
pub mod metrics;

pub use config::TelemetryConfig;
pub use logging::{env_filter, init_logging};
pub use metrics::{
    encode_metrics, register_metrics, HistogramTimer, MetricsHandle, MONITOR_UPDATES,
    WORKER_PUBLISH_DURATION, WORKER_PUBLISH_FAILURES, WORKER_TICKS, WORKER_TICK_COUNT,
};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Failed to initialize logging: {0}")]
    LoggingInit(String),

    #[error("Failed to initialize Prometheus metrics: {0}")]
    MetricsInit(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Initialize logging and metrics.
///
/// Returns a guard that must be held for the lifetime of the application.
pub fn init_telemetry(config: &TelemetryConfig) -> Result<TelemetryGuard, TelemetryError> {
    // Initialize metrics first (synchronous)
    let metrics = register_metrics()?;
    init_logging(config)?;

    Ok(TelemetryGuard { _metrics: metrics })
}

/// Guard that keeps telemetry active.
pub struct TelemetryGuard {
    _metrics: MetricsHandle,
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        tracing::info!("Shutting down telemetry...");
    }
}
