//! # Worker Status Monitor
//!
//! The reading side of the background worker. It shares no memory with the
//! poller and sees only what lands in the instance store under
//! [`WORKER_STATE_KEY`].
//!
//! `attach` subscribes and then records the current status (if any). From then
//! on every change is recorded as `latest` and pushed to the front of a bounded
//! history. Statuses whose timestamp does not parse are rejected.

use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::Mutex;
use shared_store::{
    Decoded, ScopedStoreApi, StoreError, StoreScope, SubscribeOutcome, SubscriptionRegistry,
    UnsubscribeOutcome, ValueCallback,
};
use store_telemetry::MONITOR_UPDATES;
use tracing::{debug, info, warn};

use crate::status::{WorkerStatus, WORKER_STATE_KEY};

/// Number of statuses kept in the history.
pub const HISTORY_LIMIT: usize = 10;

/// What happened to one delivered value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    Recorded,
    /// Empty value (missing or deleted entry).
    Ignored,
    /// Not a worker status.
    Invalid,
}

impl UpdateOutcome {
    fn label(self) -> &'static str {
        match self {
            UpdateOutcome::Recorded => "recorded",
            UpdateOutcome::Ignored => "ignored",
            UpdateOutcome::Invalid => "invalid",
        }
    }
}

#[derive(Debug, Default)]
struct MonitorView {
    latest: Option<WorkerStatus>,
    /// Newest first.
    history: VecDeque<WorkerStatus>,
}

impl MonitorView {
    fn apply(&mut self, value: Decoded) -> UpdateOutcome {
        let outcome = match value {
            Decoded::Raw(text) if text.is_empty() => UpdateOutcome::Ignored,
            Decoded::Raw(text) => {
                warn!("[monitor] Failed to parse worker state: {:?}", text);
                UpdateOutcome::Invalid
            }
            Decoded::Parsed(value) => match serde_json::from_value::<WorkerStatus>(value) {
                Ok(status) if status.parsed_timestamp().is_none() => {
                    warn!("[monitor] Bad timestamp in worker state: {:?}", status.timestamp);
                    UpdateOutcome::Invalid
                }
                Ok(status) => {
                    debug!("[monitor] {}", status.message);
                    self.history.push_front(status.clone());
                    self.history.truncate(HISTORY_LIMIT);
                    self.latest = Some(status);
                    UpdateOutcome::Recorded
                }
                Err(e) => {
                    warn!("[monitor] Failed to parse worker state: {}", e);
                    UpdateOutcome::Invalid
                }
            },
        };
        MONITOR_UPDATES.with_label_values(&[outcome.label()]).inc();
        outcome
    }

    /// Whether `value` is the status already recorded as latest.
    fn holds(&self, value: &Decoded) -> bool {
        let (Some(latest), Some(value)) = (&self.latest, value.as_parsed()) else {
            return false;
        };
        serde_json::from_value::<WorkerStatus>(value.clone()).is_ok_and(|status| &status == latest)
    }
}

/// Keeps the latest worker status and a short history.
pub struct StatusMonitor {
    store: Arc<dyn ScopedStoreApi>,
    registry: Arc<SubscriptionRegistry>,
    view: Arc<Mutex<MonitorView>>,
}

impl StatusMonitor {
    pub fn new(store: Arc<dyn ScopedStoreApi>, registry: Arc<SubscriptionRegistry>) -> Self {
        Self {
            store,
            registry,
            view: Arc::new(Mutex::new(MonitorView::default())),
        }
    }

    /// Subscribe to changes, then record the current status.
    ///
    /// Only the call that takes the registration records the initial read. A
    /// status that already arrived through the subscription is not recorded
    /// twice.
    pub async fn attach(&self) -> Result<SubscribeOutcome, StoreError> {
        let view = Arc::clone(&self.view);
        let callback: ValueCallback = Arc::new(move |value: Decoded| {
            view.lock().apply(value);
        });

        let outcome = self
            .registry
            .subscribe(&StoreScope::Instance, WORKER_STATE_KEY, callback)
            .await?;
        if !matches!(outcome, SubscribeOutcome::Subscribed(_)) {
            info!("[monitor] Not attaching to {}: {:?}", WORKER_STATE_KEY, outcome);
            return Ok(outcome);
        }

        let current = match self.store.get(&StoreScope::Instance, WORKER_STATE_KEY).await {
            Ok(current) => current,
            Err(e) => {
                if let Err(release) = self.detach().await {
                    warn!("[monitor] Failed to release {}: {}", WORKER_STATE_KEY, release);
                }
                return Err(e);
            }
        };
        if let Some(current) = current {
            let mut view = self.view.lock();
            if view.holds(&current) {
                debug!("[monitor] Current status already delivered");
            } else {
                view.apply(current);
            }
        }

        info!("[monitor] Attached to {}: {:?}", WORKER_STATE_KEY, outcome);
        Ok(outcome)
    }

    /// Stop receiving updates. Idempotent.
    pub async fn detach(&self) -> Result<UnsubscribeOutcome, StoreError> {
        let outcome = self
            .registry
            .unsubscribe(&StoreScope::Instance, WORKER_STATE_KEY)
            .await?;
        if outcome == UnsubscribeOutcome::NotSubscribed {
            info!("[monitor] Not subscribed to {}", WORKER_STATE_KEY);
        }
        Ok(outcome)
    }

    pub fn is_attached(&self) -> bool {
        self.registry
            .is_subscribed(&StoreScope::Instance, WORKER_STATE_KEY)
    }

    pub fn latest(&self) -> Option<WorkerStatus> {
        self.view.lock().latest.clone()
    }

    /// Most recent statuses, newest first.
    pub fn history(&self) -> Vec<WorkerStatus> {
        self.view.lock().history.iter().cloned().collect()
    }
}
