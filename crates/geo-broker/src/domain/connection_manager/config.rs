//! Connection manager configuration.

/// Session liveness and retention policy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionConfig {
    /// Silence (seconds) after which a CONNECTED session is expired
    pub heartbeat_timeout_secs: u64,
    /// How long (seconds) a DISCONNECTED session record is kept for reconnection
    pub session_retention_secs: u64,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            heartbeat_timeout_secs: 30,
            session_retention_secs: 300,
        }
    }
}

impl ConnectionConfig {
    /// Testing config with short windows
    pub fn for_testing() -> Self {
        Self {
            heartbeat_timeout_secs: 2,
            session_retention_secs: 5,
        }
    }
}
