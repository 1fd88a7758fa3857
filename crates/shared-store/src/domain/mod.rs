//! # Domain Layer - Shared Store
//!
//! ## Components
//!
//! - `scope`: StoreScope, StoreContext, key validation
//! - `subscription`: SubscriptionId, SubscriptionHandle
//! - `errors`: StoreError, TransportError

pub mod errors;
pub mod scope;
pub mod subscription;

pub use errors::*;
pub use scope::*;
pub use subscription::*;
