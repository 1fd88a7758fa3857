//! # Subscription Registry
//!
//! Client-side bookkeeping above [`ScopedStoreApi`] for consumers that must
//! never register twice for the same key and must be able to tear down
//! idempotently.
//!
//! ## State Machine (per tracked scope + key)
//!
//! ```text
//! [Unsubscribed] ──subscribe──→ [Subscribing] ──ok──→ [Subscribed]
//!       ↑                             │                     │
//!       └──────────── error ──────────┘                unsubscribe
//!       │                                                   ↓
//!       └──────────────── ok ──────────────────── [Unsubscribing]
//!                                                           │
//!                                  [Subscribed] ←── error ──┘
//! ```
//!
//! The state table lock is never held across a store call. A second caller
//! that arrives while a transition is in flight gets `Pending` back.
//!
//! Transitions are cancel-safe: if the future driving a subscribe or
//! unsubscribe is dropped mid-flight, the slot falls back to the state it
//! had before the call.

use crate::domain::{is_blank_key, StoreError, StoreScope, SubscriptionHandle};
use crate::ports::{ScopedStoreApi, ValueCallback};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

type TrackedKey = (StoreScope, String);

/// Lifecycle of one tracked subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscriptionState {
    Unsubscribed,
    Subscribing,
    Subscribed,
    Unsubscribing,
}

/// Result of [`SubscriptionRegistry::subscribe`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubscribeOutcome {
    /// A new registration was made.
    Subscribed(SubscriptionHandle),
    /// A registration was already live; nothing was done.
    AlreadySubscribed,
    /// Another subscribe or unsubscribe for this key is in flight.
    Pending,
    /// The key was blank.
    InvalidKey,
}

impl SubscribeOutcome {
    /// True when a registration is live after the call.
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(
            self,
            SubscribeOutcome::Subscribed(_) | SubscribeOutcome::AlreadySubscribed
        )
    }
}

/// Result of [`SubscriptionRegistry::unsubscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnsubscribeOutcome {
    Unsubscribed,
    /// Nothing was registered; nothing was done.
    NotSubscribed,
    /// Another subscribe or unsubscribe for this key is in flight.
    Pending,
}

#[derive(Debug)]
enum Slot {
    Subscribing,
    Subscribed(SubscriptionHandle),
    Unsubscribing(SubscriptionHandle),
}

impl Slot {
    fn state(&self) -> SubscriptionState {
        match self {
            Slot::Subscribing => SubscriptionState::Subscribing,
            Slot::Subscribed(_) => SubscriptionState::Subscribed,
            Slot::Unsubscribing(_) => SubscriptionState::Unsubscribing,
        }
    }
}

type Slots = Mutex<HashMap<TrackedKey, Slot>>;

/// An in-flight transition. Writes `settled` back into the table on drop;
/// `None` removes the entry.
struct Transition<'a> {
    slots: &'a Slots,
    key: TrackedKey,
    settled: Option<Slot>,
}

impl<'a> Transition<'a> {
    /// Track a transition whose in-flight slot the caller has already
    /// written. Dropping it without [`Transition::settle`] restores `fallback`.
    fn new(slots: &'a Slots, key: TrackedKey, fallback: Option<Slot>) -> Self {
        Self {
            slots,
            key,
            settled: fallback,
        }
    }

    fn settle(mut self, slot: Option<Slot>) {
        self.settled = slot;
    }
}

impl Drop for Transition<'_> {
    fn drop(&mut self) {
        let mut slots = self.slots.lock();
        match self.settled.take() {
            Some(slot) => {
                slots.insert(self.key.clone(), slot);
            }
            None => {
                slots.remove(&self.key);
            }
        }
    }
}

/// Registry enforcing at most one live registration per (scope, key).
pub struct SubscriptionRegistry {
    store: Arc<dyn ScopedStoreApi>,
    /// Absent keys are `Unsubscribed`.
    slots: Slots,
}

impl SubscriptionRegistry {
    pub fn new(store: Arc<dyn ScopedStoreApi>) -> Self {
        Self {
            store,
            slots: Mutex::new(HashMap::new()),
        }
    }

    fn tracked(scope: &StoreScope, key: &str) -> TrackedKey {
        (scope.clone(), key.trim().to_string())
    }

    /// Subscribe `callback` unless a registration for the key already exists.
    pub async fn subscribe(
        &self,
        scope: &StoreScope,
        key: &str,
        callback: ValueCallback,
    ) -> Result<SubscribeOutcome, StoreError> {
        if is_blank_key(key) {
            return Ok(SubscribeOutcome::InvalidKey);
        }
        let tracked = Self::tracked(scope, key);

        {
            let mut slots = self.slots.lock();
            match slots.get(&tracked) {
                Some(Slot::Subscribed(_)) => {
                    info!(scope = %scope, key = %tracked.1, "Already subscribed");
                    return Ok(SubscribeOutcome::AlreadySubscribed);
                }
                Some(slot) => {
                    debug!(scope = %scope, key = %tracked.1, state = ?slot.state(), "Transition in flight");
                    return Ok(SubscribeOutcome::Pending);
                }
                None => {
                    slots.insert(tracked.clone(), Slot::Subscribing);
                }
            }
        }

        let transition = Transition::new(&self.slots, tracked.clone(), None);
        let result = self.store.subscribe(scope, &tracked.1, callback).await;

        match result {
            Ok(Some(handle)) => {
                transition.settle(Some(Slot::Subscribed(handle.clone())));
                Ok(SubscribeOutcome::Subscribed(handle))
            }
            Ok(None) => {
                transition.settle(None);
                Ok(SubscribeOutcome::InvalidKey)
            }
            Err(e) => {
                transition.settle(None);
                warn!(scope = %scope, key = %tracked.1, error = %e, "Failed to subscribe");
                Err(e)
            }
        }
    }

    /// Drop the registration for the key, if there is one.
    pub async fn unsubscribe(
        &self,
        scope: &StoreScope,
        key: &str,
    ) -> Result<UnsubscribeOutcome, StoreError> {
        let tracked = Self::tracked(scope, key);

        let handle = {
            let mut slots = self.slots.lock();
            let handle = match slots.get(&tracked) {
                None => {
                    info!(scope = %scope, key = %tracked.1, "Not subscribed");
                    return Ok(UnsubscribeOutcome::NotSubscribed);
                }
                Some(Slot::Subscribed(handle)) => handle.clone(),
                Some(_) => return Ok(UnsubscribeOutcome::Pending),
            };
            slots.insert(tracked.clone(), Slot::Unsubscribing(handle.clone()));
            handle
        };

        // Until the store confirms, the registration is still live.
        let transition = Transition::new(&self.slots, tracked, Some(Slot::Subscribed(handle.clone())));
        let result = self
            .store
            .unsubscribe(handle.scope(), handle.key(), handle.id())
            .await;

        match result {
            Ok(_) => {
                transition.settle(None);
                Ok(UnsubscribeOutcome::Unsubscribed)
            }
            Err(e) => {
                drop(transition);
                warn!(scope = %scope, key = %key.trim(), error = %e, "Failed to unsubscribe");
                Err(e)
            }
        }
    }

    /// Unsubscribe every live registration. Returns how many were removed.
    ///
    /// Keeps going after a failure and returns the first error at the end.
    pub async fn unsubscribe_all(&self) -> Result<usize, StoreError> {
        let live: Vec<TrackedKey> = self
            .slots
            .lock()
            .iter()
            .filter(|(_, slot)| matches!(slot, Slot::Subscribed(_)))
            .map(|(k, _)| k.clone())
            .collect();

        let mut removed = 0;
        let mut first_error = None;
        for (scope, key) in live {
            match self.unsubscribe(&scope, &key).await {
                Ok(UnsubscribeOutcome::Unsubscribed) => removed += 1,
                Ok(_) => {}
                Err(e) => {
                    first_error.get_or_insert(e);
                }
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(removed),
        }
    }

    #[must_use]
    pub fn state(&self, scope: &StoreScope, key: &str) -> SubscriptionState {
        self.slots
            .lock()
            .get(&Self::tracked(scope, key))
            .map_or(SubscriptionState::Unsubscribed, Slot::state)
    }

    #[must_use]
    pub fn is_subscribed(&self, scope: &StoreScope, key: &str) -> bool {
        self.state(scope, key) == SubscriptionState::Subscribed
    }

    /// Handle of the live registration for the key.
    #[must_use]
    pub fn handle(&self, scope: &StoreScope, key: &str) -> Option<SubscriptionHandle> {
        match self.slots.lock().get(&Self::tracked(scope, key)) {
            Some(Slot::Subscribed(handle)) => Some(handle.clone()),
            _ => None,
        }
    }

    /// Number of tracked keys in any state other than `Unsubscribed`.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
