//! # In-Memory Store
//!
//! In-process implementation of [`StoreTransport`].
//!
//! One partition per scope (each shared namespace is its own partition).
//! Writes and deletes notify every callback registered for the entry, in
//! registration order, after the data lock is released.
//!
//! Writes are serialized through a delivery lock taken before the data lock,
//! so subscribers see changes to an entry in the order they were stored. The
//! delivery lock is reentrant: a callback may write to the store again from
//! the notifying thread.

use crate::domain::{StoreScope, SubscriptionId, TransportError};
use crate::ports::{RawCallback, StoreTransport};
use async_trait::async_trait;
use parking_lot::{ReentrantMutex, RwLock};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

type EntryKey = (StoreScope, String);

#[derive(Default)]
struct Partitions {
    /// Raw values by (scope, key).
    entries: HashMap<EntryKey, String>,
    /// Live registrations by (scope, key).
    subscribers: HashMap<EntryKey, Vec<(SubscriptionId, RawCallback)>>,
}

/// In-memory store transport.
pub struct InMemoryStore {
    inner: RwLock<Partitions>,
    /// Held from a write until its notifications are delivered.
    delivery: ReentrantMutex<()>,
    /// Total callback invocations.
    notifications: AtomicU64,
}

impl InMemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Partitions::default()),
            delivery: ReentrantMutex::new(()),
            notifications: AtomicU64::new(0),
        }
    }

    /// Number of live registrations for `key`.
    #[must_use]
    pub fn subscriber_count(&self, scope: &StoreScope, key: &str) -> usize {
        self.inner
            .read()
            .subscribers
            .get(&(scope.clone(), key.to_string()))
            .map_or(0, Vec::len)
    }

    /// Number of entries currently stored in `scope`.
    #[must_use]
    pub fn entry_count(&self, scope: &StoreScope) -> usize {
        self.inner
            .read()
            .entries
            .keys()
            .filter(|(s, _)| s == scope)
            .count()
    }

    /// Total callback invocations so far.
    #[must_use]
    pub fn notifications(&self) -> u64 {
        self.notifications.load(Ordering::Relaxed)
    }

    fn notify(&self, scope: &StoreScope, key: &str, value: Option<&str>, callbacks: Vec<RawCallback>) {
        if callbacks.is_empty() {
            return;
        }
        debug!(scope = %scope, key = key, receivers = callbacks.len(), "Notifying subscribers");

        for callback in callbacks {
            self.notifications.fetch_add(1, Ordering::Relaxed);
            callback(value);
        }
    }
}

impl Partitions {
    /// Callbacks registered for `key` at this instant.
    fn callbacks_for(&self, key: &EntryKey) -> Vec<RawCallback> {
        self.subscribers
            .get(key)
            .map(|subs| subs.iter().map(|(_, cb)| cb.clone()).collect())
            .unwrap_or_default()
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StoreTransport for InMemoryStore {
    async fn get(&self, scope: &StoreScope, key: &str) -> Result<Option<String>, TransportError> {
        Ok(self
            .inner
            .read()
            .entries
            .get(&(scope.clone(), key.to_string()))
            .cloned())
    }

    async fn set(&self, scope: &StoreScope, key: &str, value: &str) -> Result<(), TransportError> {
        let entry_key = (scope.clone(), key.to_string());
        let _delivery = self.delivery.lock();
        let callbacks = {
            let mut inner = self.inner.write();
            let callbacks = inner.callbacks_for(&entry_key);
            inner.entries.insert(entry_key, value.to_string());
            callbacks
        };
        self.notify(scope, key, Some(value), callbacks);
        Ok(())
    }

    async fn delete(&self, scope: &StoreScope, key: &str) -> Result<(), TransportError> {
        let entry_key = (scope.clone(), key.to_string());
        let _delivery = self.delivery.lock();
        let callbacks = {
            let mut inner = self.inner.write();
            match inner.entries.remove(&entry_key) {
                Some(_) => inner.callbacks_for(&entry_key),
                None => Vec::new(),
            }
        };
        self.notify(scope, key, None, callbacks);
        Ok(())
    }

    async fn subscribe(
        &self,
        scope: &StoreScope,
        key: &str,
        id: SubscriptionId,
        callback: RawCallback,
    ) -> Result<(), TransportError> {
        self.inner
            .write()
            .subscribers
            .entry((scope.clone(), key.to_string()))
            .or_default()
            .push((id, callback));
        debug!(scope = %scope, key = key, id = %id, "Subscription registered");
        Ok(())
    }

    async fn unsubscribe(
        &self,
        scope: &StoreScope,
        key: &str,
        id: SubscriptionId,
    ) -> Result<bool, TransportError> {
        let mut inner = self.inner.write();
        let entry_key = (scope.clone(), key.to_string());
        let Some(subs) = inner.subscribers.get_mut(&entry_key) else {
            return Ok(false);
        };

        let before = subs.len();
        subs.retain(|(sub_id, _)| *sub_id != id);
        let removed = subs.len() != before;
        if subs.is_empty() {
            inner.subscribers.remove(&entry_key);
        }
        Ok(removed)
    }
}
