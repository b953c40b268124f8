//! # Geo Broker
//!
//! A publish/subscribe message broker whose subscriptions are filtered by
//! topic *and* by geography: a PUBLISH reaches a subscriber only if the
//! publisher's reported location lies inside the geofence the subscriber
//! attached to that topic.
//!
//! The transport (TCP/WebSocket framing, socket lifecycle) is not part of
//! this crate; it consumes and produces `(ClientId, ControlPacket)` pairs.
//!
//! ## Architecture
//!
//! The crate follows Hexagonal Architecture with:
//! - **Domain Layer:** geometry, sessions, subscription matching
//! - **Protocol Layer:** the `ControlPacket` sum type and its JSON codec
//! - **Ports Layer:** `PacketHandler`/`BrokerApi` inbound, `TimeSource`,
//!   `PacketSink` and `ConfigProvider` outbound
//! - **Service Layer:** the `Router` protocol state machine
//! - **Adapters Layer:** system clock, config providers, tokio runtime
//!
//! ## Feature Flags
//!
//! - `runtime` (default) - tokio worker pool, outboxes, periodic sweep
//! - `toml-config` (default) - `TomlConfigProvider`
//! - `test-utils` - `ControllableTimeSource`
//!
//! ## Example
//!
//! ```rust
//! use geo_broker::{ClientId, ConnectionConfig, ControlPacket, Router, SystemTimeSource};
//!
//! let router = Router::new(ConnectionConfig::default(), Box::new(SystemTimeSource::new()));
//! let sub = ClientId::new("c2").unwrap();
//! let publisher = ClientId::new("c3").unwrap();
//!
//! router.handle_packet(&sub, ControlPacket::Connect);
//! router.handle_packet(&publisher, ControlPacket::Connect);
//!
//! // 5 km around (10, 10)
//! router.handle_packet(&sub, ControlPacket::subscribe_circle("zone", 10.0, 10.0, 5_000.0));
//!
//! let near = router.handle_packet(&publisher, ControlPacket::publish("zone", 10.0, 10.0001, "hi"));
//! assert!(near.iter().any(|o| o.recipient == sub));
//!
//! let far = router.handle_packet(&publisher, ControlPacket::publish("zone", 50.0, 50.0, "hi"));
//! assert!(far.iter().all(|o| o.recipient != sub));
//! ```

#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]

// =============================================================================
// CORE MODULES
// =============================================================================

pub mod domain;
pub mod ports;
pub mod protocol;
pub mod service;

/// Adapters for time, configuration and the async runtime.
/// The runtime pieces require feature: `runtime`
pub mod adapters;

/// Test utilities (ControllableTimeSource)
/// Requires feature: `test-utils`
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

// =============================================================================
// CORE RE-EXPORTS (Always Available)
// =============================================================================

// Domain
pub use domain::{
    BrokerConfig, BrokerError, ClientId, ConfigError, ConnectionConfig, ConnectionManager,
    Geofence, GeometryError, Location, ProtocolState, ReasonCode, Session, SessionState,
    SessionStats, Subscription, SubscriptionRegistry, Timestamp, Topic, Violation,
    EARTH_RADIUS_METERS,
};

// Protocol
pub use protocol::{
    decode, encode, AckPayload, CodecError, ControlPacket, GeofencePayload, LocationPayload,
    Outbound, PacketType, PublishPayload,
};

// Port traits
pub use ports::{ConfigProvider, DeliveryError, PacketHandler, PacketSink, TimeSource};

// Service
pub use service::{BrokerStats, Router, SweepReport};

// Adapters
pub use adapters::{StaticConfigProvider, SystemTimeSource};

// =============================================================================
// FEATURE-GATED RE-EXPORTS
// =============================================================================

#[cfg(feature = "runtime")]
pub use adapters::{BrokerRuntime, ClientOutbox, OutboxRegistry, RuntimeError};
#[cfg(feature = "runtime")]
pub use ports::BrokerApi;

#[cfg(feature = "toml-config")]
pub use adapters::TomlConfigProvider;

#[cfg(feature = "test-utils")]
pub use test_utils::ControllableTimeSource;
