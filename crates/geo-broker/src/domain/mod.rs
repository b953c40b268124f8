//! Domain Layer - Pure broker logic with no I/O
//!
//! This module contains:
//! - Geometry primitives (locations, geofences)
//! - Identifiers, topics and timestamps
//! - Error kinds and acknowledgment reason codes
//! - Connection Manager (session lifecycle and liveness)
//! - Subscription Registry (topic + geofence matching)

pub mod config;
pub mod connection_manager;
pub mod errors;
pub mod geometry;
pub mod subscription_registry;
pub mod types;

pub use config::{BrokerConfig, ConfigError};
pub use connection_manager::*;
pub use errors::{BrokerError, GeometryError, ReasonCode, Violation};
pub use geometry::{Geofence, Location, EARTH_RADIUS_METERS};
pub use subscription_registry::*;
pub use types::{ClientId, Timestamp, Topic};
