//! Session types.

use crate::domain::{ClientId, Location, Timestamp};

/// Connection state of a known session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Connected,
    Disconnected,
}

/// Per-identity protocol state as seen by the Router.
///
/// `Unconnected` means no session record exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProtocolState {
    Unconnected,
    Connected,
    Disconnected,
}

/// Connection state and liveness bookkeeping for one client identity
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub client_id: ClientId,
    pub state: SessionState,
    /// Last time any packet was received; only moves forward
    pub last_seen: Timestamp,
    /// When the session last entered its current state
    pub state_since: Timestamp,
    /// Location last reported through PINGREQ
    pub last_location: Option<Location>,
    /// Number of CONNECTs accepted for this identity
    pub connect_count: u64,
}

impl Session {
    pub(super) fn new(client_id: ClientId, now: Timestamp) -> Self {
        Self {
            client_id,
            state: SessionState::Connected,
            last_seen: now,
            state_since: now,
            last_location: None,
            connect_count: 1,
        }
    }

    pub fn is_connected(&self) -> bool {
        self.state == SessionState::Connected
    }

    /// Advance `last_seen`, never moving it backwards.
    pub(super) fn touch(&mut self, now: Timestamp) {
        if now > self.last_seen {
            self.last_seen = now;
        }
    }
}

/// Session table statistics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionStats {
    /// Sessions currently CONNECTED.
    pub connected: usize,
    /// All session records, including DISCONNECTED ones awaiting purge.
    pub known: usize,
}
