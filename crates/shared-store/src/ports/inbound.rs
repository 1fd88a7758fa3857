//! # Inbound Port - ScopedStoreApi
//!
//! Uniform get/set/delete/subscribe/unsubscribe over the four scopes.
//!
//! ## Blank keys
//!
//! | Method | Blank-key result | Transport called |
//! |--------|------------------|------------------|
//! | `get` | `Ok(None)` | no |
//! | `set` | key passed through | yes |
//! | `delete` | `Ok(false)` | no |
//! | `subscribe` | `Ok(None)` | no |
//! | `unsubscribe` | `Ok(false)` | no |

use crate::codec::Decoded;
use crate::domain::{StoreError, StoreScope, SubscriptionHandle, SubscriptionId};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

/// Callback receiving decoded values on every change to a subscribed entry.
///
/// A deleted entry is delivered as `Decoded::Raw("")`.
pub type ValueCallback = Arc<dyn Fn(Decoded) + Send + Sync>;

/// Scoped store API.
///
/// # Example
///
/// ```rust,ignore
/// use shared_store::{ScopedStoreApi, StoreScope};
///
/// async fn example(store: &impl ScopedStoreApi) {
///     store.set(&StoreScope::Instance, "testKey", &json!({"a": 1})).await?;
///     let value = store.get(&StoreScope::Instance, "testKey").await?;
/// }
/// ```
#[async_trait]
pub trait ScopedStoreApi: Send + Sync {
    /// Read and decode the value under `key`.
    ///
    /// A missing entry decodes from the empty string, i.e. `Raw("")`.
    async fn get(&self, scope: &StoreScope, key: &str) -> Result<Option<Decoded>, StoreError>;

    /// Encode and write `value`.
    async fn set(&self, scope: &StoreScope, key: &str, value: &Value) -> Result<bool, StoreError>;

    /// Remove `key`.
    async fn delete(&self, scope: &StoreScope, key: &str) -> Result<bool, StoreError>;

    /// Register `callback` for future changes to `key`.
    ///
    /// Does not deliver the current value.
    async fn subscribe(
        &self,
        scope: &StoreScope,
        key: &str,
        callback: ValueCallback,
    ) -> Result<Option<SubscriptionHandle>, StoreError>;

    /// Remove the registration `id`. Stale ids are a no-op returning `false`.
    async fn unsubscribe(
        &self,
        scope: &StoreScope,
        key: &str,
        id: SubscriptionId,
    ) -> Result<bool, StoreError>;
}
