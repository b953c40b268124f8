//! Test utilities for the broker.
//!
//! Enable with the `test-utils` feature flag.
//!
//! # Example
//!
//! ```rust
//! use geo_broker::test_utils::ControllableTimeSource;
//! use geo_broker::TimeSource;
//!
//! let time = ControllableTimeSource::from_secs(1000);
//! time.advance_secs(31);
//! assert_eq!(time.now().as_millis(), 1_031_000);
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::domain::Timestamp;
use crate::ports::TimeSource;

/// Thread-safe clock that only moves when told to.
///
/// Clones share the same clock, so a test can keep one handle and give
/// another to the Router.
#[derive(Debug, Clone, Default)]
pub struct ControllableTimeSource {
    millis: Arc<AtomicU64>,
}

impl ControllableTimeSource {
    pub fn new(initial: Timestamp) -> Self {
        Self {
            millis: Arc::new(AtomicU64::new(initial.as_millis())),
        }
    }

    pub fn from_secs(secs: u64) -> Self {
        Self::new(Timestamp::from_secs(secs))
    }

    /// Advances the clock by the specified seconds.
    pub fn advance_secs(&self, secs: u64) {
        self.advance_millis(secs.saturating_mul(1000));
    }

    pub fn advance_millis(&self, millis: u64) {
        self.millis.fetch_add(millis, Ordering::SeqCst);
    }
}

impl TimeSource for ControllableTimeSource {
    fn now(&self) -> Timestamp {
        Timestamp::from_millis(self.millis.load(Ordering::SeqCst))
    }
}
