//! # Ports Layer - Hexagonal Architecture Boundaries
//!
//! - **Driving Ports (Inbound):** how the transport hands packets to the broker
//! - **Driven Ports (Outbound):** what the broker needs from its host
//!   (clock, per-identity delivery, configuration)

pub mod inbound;
pub mod outbound;

#[cfg(feature = "runtime")]
pub use inbound::BrokerApi;
pub use inbound::PacketHandler;
pub use outbound::{ConfigProvider, DeliveryError, PacketSink, TimeSource};
