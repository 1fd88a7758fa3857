//! # Scoped Store Client
//!
//! Implements [`ScopedStoreApi`] over any [`StoreTransport`].
//!
//! - Keys are trimmed before use; a blank key short-circuits `get`, `delete`,
//!   `subscribe` and `unsubscribe` without touching the transport.
//! - `set` passes its key through as given.
//! - Values are encoded with [`codec::encode`] on the way out and decoded with
//!   [`codec::decode`] on the way in.
//! - Transport failures are logged and returned; nothing is retried here.

use crate::codec::{self, Decoded};
use crate::domain::{
    is_blank_key, StoreContext, StoreError, StoreOp, StoreScope, SubscriptionHandle,
    SubscriptionId,
};
use crate::ports::{RawCallback, ScopedStoreApi, StoreTransport, ValueCallback};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, error, info};

/// Client for the four SDK stores.
pub struct ScopedStoreClient {
    transport: Arc<dyn StoreTransport>,
    context: StoreContext,
}

impl ScopedStoreClient {
    pub fn new(transport: Arc<dyn StoreTransport>, context: StoreContext) -> Self {
        info!(
            application = %context.application_name,
            instance = context.instance_label(),
            "Store client configured"
        );
        Self { transport, context }
    }

    #[must_use]
    pub fn context(&self) -> &StoreContext {
        &self.context
    }

    /// Instance id to attach to log lines for `scope`.
    fn instance_for(&self, scope: &StoreScope) -> &str {
        if scope.is_instance() {
            self.context.instance_label()
        } else {
            "-"
        }
    }
}

#[async_trait]
impl ScopedStoreApi for ScopedStoreClient {
    async fn get(&self, scope: &StoreScope, key: &str) -> Result<Option<Decoded>, StoreError> {
        let key = key.trim();
        if key.is_empty() {
            return Ok(None);
        }

        debug!(scope = %scope, key, instance = self.instance_for(scope), "store get");
        let raw = self.transport.get(scope, key).await.map_err(|e| {
            error!(scope = %scope, key, error = %e, "Error retrieving value");
            StoreError::transport(StoreOp::Get, scope, key, e)
        })?;

        let decoded = codec::decode(raw.as_deref().unwrap_or(""));
        debug!(scope = %scope, key, value = ?decoded, "Finished retrieving value");
        Ok(Some(decoded))
    }

    async fn set(&self, scope: &StoreScope, key: &str, value: &Value) -> Result<bool, StoreError> {
        let encoded = codec::encode(value);

        debug!(
            scope = %scope,
            key,
            value = %encoded,
            instance = self.instance_for(scope),
            "store set"
        );
        self.transport
            .set(scope, key, &encoded)
            .await
            .map_err(|e| {
                error!(scope = %scope, key, value = %encoded, error = %e, "Error sending value");
                StoreError::transport(StoreOp::Set, scope, key, e)
            })?;

        debug!(scope = %scope, key, "Finished sending value");
        Ok(true)
    }

    async fn delete(&self, scope: &StoreScope, key: &str) -> Result<bool, StoreError> {
        let key = key.trim();
        if key.is_empty() {
            return Ok(false);
        }

        debug!(scope = %scope, key, instance = self.instance_for(scope), "store delete");
        self.transport.delete(scope, key).await.map_err(|e| {
            error!(scope = %scope, key, error = %e, "Error clearing value");
            StoreError::transport(StoreOp::Delete, scope, key, e)
        })?;

        debug!(scope = %scope, key, "Finished clearing value");
        Ok(true)
    }

    async fn subscribe(
        &self,
        scope: &StoreScope,
        key: &str,
        callback: ValueCallback,
    ) -> Result<Option<SubscriptionHandle>, StoreError> {
        let key = key.trim();
        if key.is_empty() {
            return Ok(None);
        }

        let id = SubscriptionId::new();
        let raw: RawCallback = Arc::new(move |value: Option<&str>| {
            callback(codec::decode(value.unwrap_or("")));
        });

        debug!(scope = %scope, key, id = %id, instance = self.instance_for(scope), "store subscribe");
        self.transport
            .subscribe(scope, key, id, raw)
            .await
            .map_err(|e| {
                error!(scope = %scope, key, error = %e, "Error subscribing");
                StoreError::transport(StoreOp::Subscribe, scope, key, e)
            })?;

        info!(scope = %scope, key, id = %id, "Subscribed");
        Ok(Some(SubscriptionHandle::new(id, scope.clone(), key.to_string())))
    }

    async fn unsubscribe(
        &self,
        scope: &StoreScope,
        key: &str,
        id: SubscriptionId,
    ) -> Result<bool, StoreError> {
        if is_blank_key(key) {
            return Ok(false);
        }
        let key = key.trim();

        debug!(scope = %scope, key, id = %id, instance = self.instance_for(scope), "store unsubscribe");
        let removed = self
            .transport
            .unsubscribe(scope, key, id)
            .await
            .map_err(|e| {
                error!(scope = %scope, key, error = %e, "Error unsubscribing");
                StoreError::transport(StoreOp::Unsubscribe, scope, key, e)
            })?;

        if removed {
            info!(scope = %scope, key, id = %id, "Unsubscribed");
        } else {
            debug!(scope = %scope, key, id = %id, "No live registration for id");
        }
        Ok(removed)
    }
}
