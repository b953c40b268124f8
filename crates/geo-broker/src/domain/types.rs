//! Core identifiers and timestamps shared by every broker component.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::errors::BrokerError;

/// Opaque identity of a connected peer, assigned by the transport layer.
///
/// The only syntactic requirement is that it is non-empty.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClientId(String);

impl ClientId {
    /// Create a client identity, rejecting the empty string.
    pub fn new(id: impl Into<String>) -> Result<Self, BrokerError> {
        let id = id.into();
        if id.is_empty() {
            return Err(BrokerError::InvalidIdentity);
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<&str> for ClientId {
    type Error = BrokerError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Case-sensitive topic name. No wildcard semantics.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Topic(String);

impl Topic {
    /// Create a topic, rejecting the empty string.
    pub fn new(name: impl Into<String>) -> Result<Self, BrokerError> {
        let name = name.into();
        if name.is_empty() {
            return Err(BrokerError::MalformedPayload {
                field: "topic",
                detail: "topic must not be empty".into(),
            });
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Wall-clock instant in milliseconds since the Unix epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Timestamp(u64);

impl Timestamp {
    pub fn from_millis(millis: u64) -> Self {
        Self(millis)
    }

    pub fn from_secs(secs: u64) -> Self {
        Self(secs.saturating_mul(1000))
    }

    pub fn as_millis(&self) -> u64 {
        self.0
    }

    /// Milliseconds elapsed since `earlier`, zero if `earlier` is in the future.
    pub fn millis_since(&self, earlier: Timestamp) -> u64 {
        self.0.saturating_sub(earlier.0)
    }

    /// Whether more than `timeout_secs` have passed between `self` and `now`.
    pub fn is_older_than(&self, now: Timestamp, timeout_secs: u64) -> bool {
        now.millis_since(*self) > timeout_secs.saturating_mul(1000)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_identity_rejected() {
        assert_eq!(ClientId::new(""), Err(BrokerError::InvalidIdentity));
        assert!(ClientId::new("c1").is_ok());
    }

    #[test]
    fn test_empty_topic_rejected() {
        assert!(matches!(
            Topic::new(""),
            Err(BrokerError::MalformedPayload { field: "topic", .. })
        ));
    }

    #[test]
    fn test_topics_are_case_sensitive() {
        assert_ne!(Topic::new("Zone").unwrap(), Topic::new("zone").unwrap());
    }

    #[test]
    fn test_timestamp_age() {
        let then = Timestamp::from_secs(100);
        assert!(!then.is_older_than(Timestamp::from_secs(130), 30));
        assert!(then.is_older_than(Timestamp::from_millis(130_001), 30));
        assert_eq!(Timestamp::from_secs(1).millis_since(Timestamp::from_secs(5)), 0);
    }
}
