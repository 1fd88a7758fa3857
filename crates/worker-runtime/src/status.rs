//! # Worker Status
//!
//! The record the background worker writes to the instance store under
//! [`WORKER_STATE_KEY`]. Field names are camelCase on the wire so any store
//! consumer can read them without a translation layer:
//!
//! ```json
//! {
//!   "timestamp": "2026-10-15T09:30:00.000Z",
//!   "message": "Tick #3: Cleaning up cache",
//!   "data": { "task": "Cleaning up cache", "randomValue": 41, "memoryUsage": "41%", "queueLength": 7 },
//!   "tickCount": 3,
//!   "isRunning": true
//! }
//! ```

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Instance-scoped key holding the latest [`WorkerStatus`].
pub const WORKER_STATE_KEY: &str = "worker_state";

/// Labels cycled through by successive ticks.
pub const TASK_LABELS: [&str; 5] = [
    "Checking system health",
    "Syncing data",
    "Processing queue",
    "Cleaning up cache",
    "Updating metrics",
];

/// Label for tick number `tick_count`.
#[must_use]
pub fn task_label(tick_count: u64) -> &'static str {
    TASK_LABELS[(tick_count % TASK_LABELS.len() as u64) as usize]
}

/// One published status. Immutable once written; every tick writes a new one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkerStatus {
    /// ISO-8601 UTC timestamp with millisecond precision.
    pub timestamp: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    pub tick_count: u64,
    pub is_running: bool,
}

impl WorkerStatus {
    pub fn new(
        at: DateTime<Utc>,
        message: impl Into<String>,
        data: Option<Value>,
        tick_count: u64,
        is_running: bool,
    ) -> Self {
        Self {
            timestamp: iso_timestamp(at),
            message: message.into(),
            data,
            tick_count,
            is_running,
        }
    }

    /// Parse the timestamp back into a `DateTime`.
    #[must_use]
    pub fn parsed_timestamp(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.timestamp)
            .ok()
            .map(|t| t.with_timezone(&Utc))
    }
}

/// Payload attached to each tick status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TickData {
    pub task: String,
    /// Synthetic utilization in `[0, 100)`.
    pub random_value: u32,
    /// `random_value` rendered as a percentage.
    pub memory_usage: String,
    /// Synthetic queue length in `[0, 50)`.
    pub queue_length: u32,
}

impl TickData {
    pub fn new(task: &str, random_value: u32, queue_length: u32) -> Self {
        Self {
            task: task.to_string(),
            random_value,
            memory_usage: format!("{}%", random_value),
            queue_length,
        }
    }
}

/// `2026-10-15T09:30:00.000Z` style timestamp.
#[must_use]
pub fn iso_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}
