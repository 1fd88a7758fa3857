//! # SDK Store Test Suite
//!
//! Unified test crate for flows that cross crate boundaries.
//!
//! ## Structure
//!
//! ```text
//! tests/
//! ├── benches/
//! │   └── store_benchmarks.rs   # codec and in-memory store throughput
//! └── src/integration/
//!     ├── flows.rs              # client + registry over the in-memory store
//!     └── e2e_worker.rs         # poller → store → monitor
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p store-tests
//! cargo test -p store-tests integration::e2e_worker
//!
//! # Benchmarks
//! cargo bench -p store-tests
//! ```

#![allow(unused_imports)]
#![allow(dead_code)]
