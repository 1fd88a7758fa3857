//! Ports layer for the shared store.
//!
//! - Inbound (Driving) port: `ScopedStoreApi`, used by the registry, the
//!   background worker and any UI-side consumer
//! - Outbound (Driven) port: `StoreTransport`, the vendor SDK's store object

pub mod inbound;
pub mod outbound;

pub use inbound::*;
pub use outbound::*;
