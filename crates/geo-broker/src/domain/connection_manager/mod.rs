//! # Connection Manager
//!
//! Session lifecycle and liveness for every client identity.
//!
//! ## Lifecycle
//!
//! - `connect` creates a CONNECTED session or reactivates a DISCONNECTED one
//! - any inbound packet `touch`es the session, moving `last_seen` forward
//! - `disconnect`, heartbeat expiry and peer loss move it to DISCONNECTED
//! - DISCONNECTED records are purged once the retention window has passed

mod config;
mod manager;
mod types;

pub use config::ConnectionConfig;
pub use manager::ConnectionManager;
pub use types::{ProtocolState, Session, SessionState, SessionStats};
