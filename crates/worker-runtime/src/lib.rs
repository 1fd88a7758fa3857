//! # SDK Store Worker Runtime
//!
//! The background worker and its consumer, talking only through the store.
//!
//! ## Data Flow
//!
//! ```text
//! BackgroundPoller ──set(instance, "worker_state")──→ StoreTransport
//!                                                          │
//!                                           change notification
//!                                                          ↓
//!                     StatusMonitor ←──callback── SubscriptionRegistry
//! ```
//!
//! ## Modules
//!
//! - `config` - environment configuration
//! - `status` - `WorkerStatus` and `TickData` wire types
//! - `poller` - the ticking publisher
//! - `monitor` - latest status plus bounded history
//! - `runtime` - startup and shutdown wiring

#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod config;
pub mod monitor;
pub mod poller;
pub mod runtime;
pub mod status;

#[cfg(test)]
mod testing;

pub use config::{ConfigError, StoreConfig, WorkerConfig};
pub use monitor::{StatusMonitor, UpdateOutcome, HISTORY_LIMIT};
pub use poller::{BackgroundPoller, PollerState, TickOutcome, TICK_INTERVAL};
pub use runtime::{WorkerRuntime, STARTUP_MARKER_KEY};
pub use status::{task_label, TickData, WorkerStatus, TASK_LABELS, WORKER_STATE_KEY};
