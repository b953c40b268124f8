//! # Driven Ports (Outbound SPI)
//!
//! Interfaces the broker core requires from its host.

use thiserror::Error;

use crate::domain::{BrokerConfig, ClientId, Timestamp};
use crate::protocol::Outbound;

/// Abstract interface for time-related operations.
///
/// Enables deterministic testing by injecting controllable time sources.
/// Production implementations use system time.
pub trait TimeSource: Send + Sync {
    /// Get the current timestamp.
    fn now(&self) -> Timestamp;
}

/// Destination for addressed outbound packets (per-identity queues).
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`: every worker delivers through the
/// same sink concurrently.
pub trait PacketSink: Send + Sync {
    /// Hand one packet to its recipient's queue.
    fn deliver(&self, outbound: Outbound) -> Result<(), DeliveryError>;
}

/// Errors from delivering an outbound packet.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeliveryError {
    /// The transport never attached a queue for this identity.
    #[error("no outbox attached for {0}")]
    NoOutbox(ClientId),

    /// The recipient's queue was closed (peer went away).
    #[error("outbox for {0} is closed")]
    Closed(ClientId),
}

/// Abstract interface for configuration loading.
///
/// Allows different configuration sources (static, file, environment).
pub trait ConfigProvider: Send + Sync {
    /// Get broker configuration parameters.
    fn broker_config(&self) -> BrokerConfig;
}
