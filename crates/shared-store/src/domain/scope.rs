//! Store scopes and the client context.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the four store partitions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "scope", content = "namespace")]
pub enum StoreScope {
    /// Shared by every instance of the application on the account.
    Application,
    /// Private to one running instance of the application.
    Instance,
    /// Shared by every application on the device.
    Device,
    /// Partitioned by a caller-supplied namespace.
    Shared(String),
}

impl StoreScope {
    /// Build a shared scope for `namespace`.
    pub fn shared(namespace: impl Into<String>) -> Self {
        StoreScope::Shared(namespace.into())
    }

    /// Namespace of a shared scope.
    #[must_use]
    pub fn namespace(&self) -> Option<&str> {
        match self {
            StoreScope::Shared(ns) => Some(ns),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_instance(&self) -> bool {
        matches!(self, StoreScope::Instance)
    }
}

impl fmt::Display for StoreScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreScope::Application => write!(f, "application"),
            StoreScope::Instance => write!(f, "instance"),
            StoreScope::Device => write!(f, "device"),
            StoreScope::Shared(ns) => write!(f, "shared(\"{}\")", ns),
        }
    }
}

/// True when `key` is empty or whitespace only.
#[must_use]
pub fn is_blank_key(key: &str) -> bool {
    key.trim().is_empty()
}

/// Identity the client was configured with.
///
/// Mirrors the SDK's `configure(name)` step plus the `applicationInstance`
/// identifier the host passes to each running instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreContext {
    /// Application name passed to `configure`.
    pub application_name: String,
    /// Identifier of this running instance, when the host provided one.
    pub instance_id: Option<String>,
}

impl StoreContext {
    pub fn new(application_name: impl Into<String>) -> Self {
        Self {
            application_name: application_name.into(),
            instance_id: None,
        }
    }

    #[must_use]
    pub fn with_instance_id(mut self, instance_id: impl Into<String>) -> Self {
        self.instance_id = Some(instance_id.into());
        self
    }

    /// Instance id for log lines, `-` when unknown.
    #[must_use]
    pub fn instance_label(&self) -> &str {
        self.instance_id.as_deref().unwrap_or("-")
    }
}
