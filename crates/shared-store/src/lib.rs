//! # Shared Store - Scoped Key-Value Client for the Device SDK
//!
//! Wraps the SDK's four logical stores behind one uniform API and keeps
//! subscription bookkeeping on the client side.
//!
//! ## Scopes
//!
//! | Scope | Visibility |
//! |-------|------------|
//! | `Application` | every instance of the application on the account |
//! | `Instance` | one running instance of the application |
//! | `Device` | every application on the device |
//! | `Shared(ns)` | any application that knows the namespace `ns` |
//!
//! ## Module Structure (Hexagonal Architecture)
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  adapters/memory.rs  - InMemoryStore (in-process transport)     │
//! └─────────────────────────────────────────────────────────────────┘
//!                          ↑ implements ↑
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  ports/inbound.rs  - ScopedStoreApi                             │
//! │  ports/outbound.rs - StoreTransport (the vendor SDK surface)    │
//! └─────────────────────────────────────────────────────────────────┘
//!                          ↑ uses ↑
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  codec.rs     - encode / decode (Parsed vs Raw)                 │
//! │  domain/      - StoreScope, SubscriptionHandle, StoreError      │
//! │  service.rs   - ScopedStoreClient                               │
//! │  registry.rs  - SubscriptionRegistry (duplicate-safe teardown)  │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Subscriptions
//!
//! `subscribe` never delivers the current value. Callers that need it must
//! `get` first and subscribe afterwards; only later changes are delivered.

// Nursery lints that are too strict
#![allow(clippy::missing_const_for_fn)]
// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

pub mod adapters;
pub mod codec;
pub mod domain;
pub mod ports;
pub mod registry;
pub mod service;

// Re-export main types
pub use adapters::InMemoryStore;
pub use codec::{decode, encode, Decoded};
pub use domain::{
    is_blank_key, StoreContext, StoreError, StoreOp, StoreScope, SubscriptionHandle, SubscriptionId,
    TransportError,
};
pub use ports::{RawCallback, ScopedStoreApi, StoreTransport, ValueCallback};
pub use registry::{SubscribeOutcome, SubscriptionRegistry, SubscriptionState, UnsubscribeOutcome};
pub use service::ScopedStoreClient;
