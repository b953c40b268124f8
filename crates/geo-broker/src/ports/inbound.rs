//! # Driving Ports (Inbound API)
//!
//! Interfaces the broker exposes to the transport layer.

use crate::domain::ClientId;
use crate::protocol::{ControlPacket, Outbound};

/// Synchronous packet processing, one packet at a time.
///
/// Every call is bounded: it takes the broker lock briefly and returns the
/// packets to deliver. Errors never escape; they become negative
/// acknowledgments addressed to the sender.
pub trait PacketHandler: Send + Sync {
    /// Process one deframed packet from `sender`.
    fn handle_packet(&self, sender: &ClientId, packet: ControlPacket) -> Vec<Outbound>;

    /// Decode one JSON frame from `sender` and process it.
    fn handle_frame(&self, sender: &ClientId, frame: &[u8]) -> Vec<Outbound>;

    /// The transport lost the peer; treated as an implicit DISCONNECT.
    fn peer_lost(&self, sender: &ClientId) -> Vec<Outbound>;
}

/// Asynchronous submission into a running broker.
///
/// Implemented by the tokio runtime adapter, which preserves per-sender
/// ordering across its worker pool.
#[cfg(feature = "runtime")]
#[async_trait::async_trait]
pub trait BrokerApi: Send + Sync {
    /// Queue a packet from `sender` for processing.
    async fn submit(
        &self,
        sender: ClientId,
        packet: ControlPacket,
    ) -> Result<(), crate::adapters::RuntimeError>;

    /// Queue a raw JSON frame from `sender` for processing.
    async fn submit_frame(
        &self,
        sender: ClientId,
        frame: Vec<u8>,
    ) -> Result<(), crate::adapters::RuntimeError>;

    /// Report abrupt loss of `sender`'s connection.
    ///
    /// The outbox is detached before this returns, so the transport may
    /// `attach` a new one for the same identity right away.
    async fn peer_lost(&self, sender: ClientId) -> Result<(), crate::adapters::RuntimeError>;
}
