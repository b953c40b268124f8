//! # Geo-Broker Benchmarks
//!
//! | Area | Expectation |
//! |------|-------------|
//! | Topic lookup | O(1), independent of cold topic count |
//! | Matching | linear in subscribers of the published topic |
//! | Router publish | one lock acquisition plus fan-out |

use criterion::{criterion_group, criterion_main};
use geo_broker_tests::benchmarks::matching::register_benchmarks;

criterion_group!(benches, register_benchmarks);
criterion_main!(benches);
