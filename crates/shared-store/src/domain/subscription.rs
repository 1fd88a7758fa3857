//! Subscription identity.
//!
//! Registrations are identified by an explicit id rather than by comparing
//! callback references, so unsubscribe only needs the handle.

use super::scope::StoreScope;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Stable identifier of one registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubscriptionId(Uuid);

impl SubscriptionId {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SubscriptionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Returned by `subscribe`; required to unsubscribe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriptionHandle {
    id: SubscriptionId,
    scope: StoreScope,
    key: String,
}

impl SubscriptionHandle {
    pub(crate) fn new(id: SubscriptionId, scope: StoreScope, key: String) -> Self {
        Self { id, scope, key }
    }

    #[must_use]
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    #[must_use]
    pub fn scope(&self) -> &StoreScope {
        &self.scope
    }

    /// The trimmed key the registration was made for.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }
}
