//! # Geo-Broker Benchmarks
//!
//! Matcher and router throughput under large subscriber sets.

pub mod matching;
