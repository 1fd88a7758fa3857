//! # Background Poller
//!
//! Publishes a synthetic [`WorkerStatus`] to the instance store once per
//! [`TICK_INTERVAL`].
//!
//! ## Lifecycle
//!
//! ```text
//! run() ──→ "Worker started" ──→ Tick #1 ──sleep──→ Tick #2 ──sleep──→ ...
//!                                                        │
//!                                           shutdown ────┘
//!                                                        ↓
//!                                             "Worker stopped" (isRunning=false)
//! ```
//!
//! Ticks never overlap: the next sleep starts only after the current publish
//! has settled. A failed publish is logged and counted, and the loop goes on.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::{json, Value};
use shared_store::{ScopedStoreApi, StoreError, StoreScope};
use store_telemetry::{
    time_histogram, WORKER_PUBLISH_DURATION, WORKER_PUBLISH_FAILURES, WORKER_TICKS,
    WORKER_TICK_COUNT,
};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::status::{iso_timestamp, task_label, TickData, WorkerStatus, WORKER_STATE_KEY};

/// Fixed period between ticks.
pub const TICK_INTERVAL: Duration = Duration::from_millis(10_000);

/// Exclusive upper bound of the synthetic utilization value.
const RANDOM_VALUE_BOUND: u32 = 100;
/// Exclusive upper bound of the synthetic queue length.
const QUEUE_LENGTH_BOUND: u32 = 50;

/// Result of a single [`BackgroundPoller::tick`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The status for this tick number was written.
    Published(u64),
    /// The tick ran but the store rejected the write.
    PublishFailed(u64),
    /// The poller is stopped; nothing was done.
    Stopped,
}

/// Snapshot of the poller's counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PollerState {
    pub tick_count: u64,
    pub is_running: bool,
    pub publish_failures: u64,
}

/// Self-rescheduling status publisher.
pub struct BackgroundPoller {
    store: Arc<dyn ScopedStoreApi>,
    tick_count: u64,
    is_running: bool,
    publish_failures: u64,
    rng: StdRng,
}

impl BackgroundPoller {
    pub fn new(store: Arc<dyn ScopedStoreApi>) -> Self {
        Self::with_rng(store, StdRng::from_entropy())
    }

    /// Poller with a deterministic random sequence.
    pub fn with_seed(store: Arc<dyn ScopedStoreApi>, seed: u64) -> Self {
        Self::with_rng(store, StdRng::seed_from_u64(seed))
    }

    fn with_rng(store: Arc<dyn ScopedStoreApi>, rng: StdRng) -> Self {
        Self {
            store,
            tick_count: 0,
            is_running: true,
            publish_failures: 0,
            rng,
        }
    }

    pub fn state(&self) -> PollerState {
        PollerState {
            tick_count: self.tick_count,
            is_running: self.is_running,
            publish_failures: self.publish_failures,
        }
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn is_running(&self) -> bool {
        self.is_running
    }

    /// Publish the `"Worker started"` status.
    pub async fn publish_started(&mut self) -> Result<(), StoreError> {
        let data = json!({ "startTime": iso_timestamp(Utc::now()) });
        info!("[worker] Worker started");
        self.publish("Worker started".to_string(), Some(data)).await
    }

    /// Run one tick: advance the counter, build the payload and publish it.
    pub async fn tick(&mut self) -> TickOutcome {
        if !self.is_running {
            return TickOutcome::Stopped;
        }

        self.tick_count += 1;
        let tick = self.tick_count;
        WORKER_TICKS.inc();
        WORKER_TICK_COUNT.set(tick as f64);

        let label = task_label(tick);
        let data = TickData::new(
            label,
            self.rng.gen_range(0..RANDOM_VALUE_BOUND),
            self.rng.gen_range(0..QUEUE_LENGTH_BOUND),
        );
        let message = format!("Tick #{}: {}", tick, label);
        info!("[worker] {}", message);

        let result = match serde_json::to_value(&data) {
            Ok(data) => self.publish(message, Some(data)).await,
            Err(e) => Err(StoreError::from(e)),
        };

        match result {
            Ok(()) => TickOutcome::Published(tick),
            Err(e) => {
                warn!("[worker] Tick #{} publish failed: {}", tick, e);
                TickOutcome::PublishFailed(tick)
            }
        }
    }

    /// Clear the running flag and publish a final `"Worker stopped"` status.
    ///
    /// The final publish is best-effort. Calling this twice is a no-op.
    pub async fn stop(&mut self) {
        if !self.is_running {
            return;
        }
        self.is_running = false;
        info!("[worker] Worker stopped after {} ticks", self.tick_count);

        let data = json!({ "stopTime": iso_timestamp(Utc::now()) });
        if let Err(e) = self.publish("Worker stopped".to_string(), Some(data)).await {
            warn!("[worker] Failed to publish stop status: {}", e);
        }
    }

    /// Publish the start status, tick immediately, then once per
    /// [`TICK_INTERVAL`] until `shutdown` carries `true` or its sender is
    /// dropped.
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) -> PollerState {
        if let Err(e) = self.publish_started().await {
            warn!("[worker] Failed to publish start status: {}", e);
        }

        while !*shutdown.borrow() {
            if self.tick().await == TickOutcome::Stopped {
                break;
            }
            if wait_for_next_tick(&mut shutdown).await {
                info!("[worker] Shutdown signal received");
                break;
            }
        }

        self.stop().await;
        self.state()
    }

    async fn publish(&mut self, message: String, data: Option<Value>) -> Result<(), StoreError> {
        let status = WorkerStatus::new(Utc::now(), message, data, self.tick_count, self.is_running);

        let result = match serde_json::to_value(&status) {
            Ok(value) => {
                let _timer = time_histogram!(WORKER_PUBLISH_DURATION);
                self.store
                    .set(&StoreScope::Instance, WORKER_STATE_KEY, &value)
                    .await
                    .map(|_| ())
            }
            Err(e) => Err(StoreError::from(e)),
        };

        match &result {
            Ok(()) => debug!(tick = self.tick_count, "Published worker status"),
            Err(_) => {
                self.publish_failures += 1;
                WORKER_PUBLISH_FAILURES.inc();
            }
        }
        result
    }
}

/// Sleep for one period. Returns `true` if shutdown was requested meanwhile.
async fn wait_for_next_tick(shutdown: &mut watch::Receiver<bool>) -> bool {
    let deadline = tokio::time::Instant::now() + TICK_INTERVAL;
    loop {
        tokio::select! {
            _ = tokio::time::sleep_until(deadline) => return false,
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    return true;
                }
            }
        }
    }
}
