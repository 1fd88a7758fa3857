//! # Worker Runtime
//!
//! Wires the store client, subscription registry, background poller and status
//! monitor together.
//!
//! ## Startup Sequence
//!
//! 1. Configure the store client (application name, instance id)
//! 2. Check the shared namespace with a marker write and read-back
//! 3. Attach the status monitor (initial read, then subscribe)
//! 4. Spawn the background poller
//!
//! ## Shutdown Sequence
//!
//! 1. Signal the poller through the watch channel
//! 2. Wait for its final `"Worker stopped"` publish
//! 3. Tear down every subscription held by the registry

use std::sync::Arc;

use anyhow::{bail, Context, Result};
use chrono::Utc;
use parking_lot::Mutex;
use serde_json::json;
use shared_store::{ScopedStoreApi, ScopedStoreClient, StoreTransport, SubscriptionRegistry};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::config::WorkerConfig;
use crate::monitor::StatusMonitor;
use crate::poller::{BackgroundPoller, PollerState};
use crate::status::iso_timestamp;

/// Key written in the shared namespace at startup.
pub const STARTUP_MARKER_KEY: &str = "runtime_marker";

/// Lifecycle of the background poller task.
enum PollerSlot {
    Idle,
    /// Claimed by a `start` call that has not spawned the task yet.
    Starting,
    Running(JoinHandle<PollerState>),
}

/// The worker runtime.
pub struct WorkerRuntime {
    config: WorkerConfig,
    client: Arc<ScopedStoreClient>,
    registry: Arc<SubscriptionRegistry>,
    monitor: StatusMonitor,
    /// Shutdown signal sender.
    shutdown_tx: watch::Sender<bool>,
    /// Shutdown signal receiver, cloned into the poller.
    shutdown_rx: watch::Receiver<bool>,
    poller: Mutex<PollerSlot>,
    seed: Option<u64>,
}

impl WorkerRuntime {
    /// Create a runtime over `transport`.
    pub fn new(config: WorkerConfig, transport: Arc<dyn StoreTransport>) -> Self {
        info!("Creating worker runtime");

        let client = Arc::new(ScopedStoreClient::new(transport, config.store.context()));
        let registry = Arc::new(SubscriptionRegistry::new(client.clone()));
        let monitor = StatusMonitor::new(client.clone(), Arc::clone(&registry));
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        Self {
            config,
            client,
            registry,
            monitor,
            shutdown_tx,
            shutdown_rx,
            poller: Mutex::new(PollerSlot::Idle),
            seed: None,
        }
    }

    /// Seed the poller's random sequence.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Start the runtime. Fails if it is already running or starting.
    pub async fn start(&self) -> Result<()> {
        {
            let mut slot = self.poller.lock();
            if !matches!(*slot, PollerSlot::Idle) {
                bail!("worker runtime already started");
            }
            *slot = PollerSlot::Starting;
        }

        match self.launch().await {
            Ok(handle) => {
                *self.poller.lock() = PollerSlot::Running(handle);
                info!("Worker runtime started");
                Ok(())
            }
            Err(e) => {
                *self.poller.lock() = PollerSlot::Idle;
                Err(e)
            }
        }
    }

    async fn launch(&self) -> Result<JoinHandle<PollerState>> {
        info!("===========================================");
        info!("  SDK Store Worker v{}", env!("CARGO_PKG_VERSION"));
        info!("  Application: {}", self.config.store.application_name);
        info!("  Instance: {}", self.client.context().instance_label());
        info!("===========================================");

        self.check_shared_namespace().await?;

        self.monitor
            .attach()
            .await
            .context("Failed to attach status monitor")?;

        let store: Arc<dyn ScopedStoreApi> = self.client.clone();
        let poller = match self.seed {
            Some(seed) => BackgroundPoller::with_seed(store, seed),
            None => BackgroundPoller::new(store),
        };
        Ok(tokio::spawn(poller.run(self.shutdown_rx.clone())))
    }

    /// Write and read back a marker in the shared namespace.
    async fn check_shared_namespace(&self) -> Result<()> {
        let scope = self.config.store.shared_scope();
        let marker = json!({
            "applicationName": self.config.store.application_name,
            "startedAt": iso_timestamp(Utc::now()),
        });

        self.client
            .set(&scope, STARTUP_MARKER_KEY, &marker)
            .await
            .with_context(|| format!("Failed to write startup marker to {} store", scope))?;

        let read_back = self
            .client
            .get(&scope, STARTUP_MARKER_KEY)
            .await
            .with_context(|| format!("Failed to read startup marker from {} store", scope))?
            .map(|value| value.into_value());

        if read_back.as_ref() == Some(&marker) {
            info!("Shared namespace {} reachable", scope);
        } else {
            warn!("Shared namespace {} returned unexpected marker: {:?}", scope, read_back);
        }
        Ok(())
    }

    /// Shut the runtime down gracefully and return the poller's final state.
    pub async fn shutdown(&self) -> Result<PollerState> {
        info!("Initiating graceful shutdown...");

        if let Err(e) = self.shutdown_tx.send(true) {
            error!("Failed to send shutdown signal: {}", e);
        }

        let slot = std::mem::replace(&mut *self.poller.lock(), PollerSlot::Idle);
        let state = match slot {
            PollerSlot::Running(handle) => handle.await.context("Background poller task failed")?,
            PollerSlot::Idle | PollerSlot::Starting => PollerState::default(),
        };

        let released = self
            .registry
            .unsubscribe_all()
            .await
            .context("Failed to release subscriptions")?;

        info!(
            ticks = state.tick_count,
            publish_failures = state.publish_failures,
            subscriptions_released = released,
            "Shutdown complete"
        );
        Ok(state)
    }

    pub fn client(&self) -> Arc<ScopedStoreClient> {
        Arc::clone(&self.client)
    }

    pub fn registry(&self) -> Arc<SubscriptionRegistry> {
        Arc::clone(&self.registry)
    }

    pub fn monitor(&self) -> &StatusMonitor {
        &self.monitor
    }

    pub fn config(&self) -> &WorkerConfig {
        &self.config
    }
}
