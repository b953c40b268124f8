//! # Geo-Broker Test Suite
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! ├── benchmarks/       # Matcher and router throughput
//! │   └── matching.rs
//! │
//! └── integration/      # End-to-end through the runtime
//!     ├── scenarios.rs  # Geofence routing, expiry, shutdown
//!     └── load.rs       # Concurrent self-publish load
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p geo-broker-tests
//!
//! # By category
//! cargo test -p geo-broker-tests integration::
//!
//! # Benchmarks
//! cargo bench -p geo-broker-tests
//! ```

pub mod benchmarks;
pub mod integration;
