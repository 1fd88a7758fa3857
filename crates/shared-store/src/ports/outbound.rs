//! Outbound (Driven) port: the SDK store transport.
//!
//! Values cross this boundary as opaque strings. Encoding and decoding happen
//! in the client, never in the transport.

use crate::domain::{StoreScope, SubscriptionId, TransportError};
use async_trait::async_trait;
use std::sync::Arc;

/// Callback invoked by the transport when an entry changes.
///
/// Receives the new raw value, or `None` when the entry was deleted.
pub type RawCallback = Arc<dyn Fn(Option<&str>) + Send + Sync>;

/// The store surface of the device SDK.
///
/// Each call is individually atomic from the client's point of view. Fan-out
/// to several subscribers of the same key is the transport's job.
#[async_trait]
pub trait StoreTransport: Send + Sync {
    /// Read the raw value stored under `key`.
    async fn get(&self, scope: &StoreScope, key: &str) -> Result<Option<String>, TransportError>;

    /// Write the raw value for `key`.
    async fn set(&self, scope: &StoreScope, key: &str, value: &str) -> Result<(), TransportError>;

    /// Remove `key`.
    async fn delete(&self, scope: &StoreScope, key: &str) -> Result<(), TransportError>;

    /// Register `callback` under `id` for future changes to `key`.
    async fn subscribe(
        &self,
        scope: &StoreScope,
        key: &str,
        id: SubscriptionId,
        callback: RawCallback,
    ) -> Result<(), TransportError>;

    /// Remove the registration `id` for `key`.
    ///
    /// Returns `false` when no such registration was live.
    async fn unsubscribe(
        &self,
        scope: &StoreScope,
        key: &str,
        id: SubscriptionId,
    ) -> Result<bool, TransportError>;
}
