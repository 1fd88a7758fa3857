//! Adapters implementing the outbound store port.

pub mod memory;

pub use memory::InMemoryStore;
