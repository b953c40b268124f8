use crate::domain::Timestamp;
use crate::ports::TimeSource;

/// Production time source using the system clock, at millisecond resolution.
///
/// For testing, use `test_utils::ControllableTimeSource`.
///
/// # Example
///
/// ```rust
/// use geo_broker::adapters::SystemTimeSource;
/// use geo_broker::ports::TimeSource;
///
/// let time_source = SystemTimeSource::new();
/// assert!(time_source.now().as_millis() > 0);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemTimeSource;

impl SystemTimeSource {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl TimeSource for SystemTimeSource {
    fn now(&self) -> Timestamp {
        use std::time::{SystemTime, UNIX_EPOCH};

        let duration = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default();

        Timestamp::from_millis(u64::try_from(duration.as_millis()).unwrap_or(u64::MAX))
    }
}
