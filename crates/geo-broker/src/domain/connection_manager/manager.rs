//! Connection manager implementation.

use std::collections::HashMap;

use super::config::ConnectionConfig;
use super::types::{ProtocolState, Session, SessionState, SessionStats};
use crate::domain::{BrokerError, ClientId, Location, Timestamp};

/// Tracks one session per client identity.
///
/// Subscription cleanup is not performed here: the Router pairs every
/// transition to DISCONNECTED with `SubscriptionRegistry::remove_all` under
/// the same lock.
#[derive(Debug)]
pub struct ConnectionManager {
    /// All known sessions, connected or awaiting purge
    sessions: HashMap<ClientId, Session>,
    /// Configuration
    config: ConnectionConfig,
}

impl ConnectionManager {
    /// Create an empty connection manager
    pub fn new(config: ConnectionConfig) -> Self {
        Self {
            sessions: HashMap::new(),
            config,
        }
    }

    pub fn config(&self) -> &ConnectionConfig {
        &self.config
    }

    /// Open a session for `client_id`.
    ///
    /// Creates a new CONNECTED session, or reactivates a DISCONNECTED one.
    ///
    /// # Errors
    ///
    /// `Violation::AlreadyConnected` if the session is currently CONNECTED;
    /// the caller must disconnect first.
    pub fn connect(&mut self, client_id: &ClientId, now: Timestamp) -> Result<Session, BrokerError> {
        match self.sessions.get_mut(client_id) {
            Some(session) if session.is_connected() => Err(BrokerError::already_connected()),
            Some(session) => {
                session.state = SessionState::Connected;
                session.state_since = now;
                session.connect_count += 1;
                session.touch(now);
                Ok(session.clone())
            }
            None => {
                let session = Session::new(client_id.clone(), now);
                self.sessions.insert(client_id.clone(), session.clone());
                Ok(session)
            }
        }
    }

    /// Record activity from `client_id`. Returns false if no session exists.
    pub fn touch(&mut self, client_id: &ClientId, now: Timestamp) -> bool {
        match self.sessions.get_mut(client_id) {
            Some(session) => {
                session.touch(now);
                true
            }
            None => false,
        }
    }

    /// Store the location reported by a connected client.
    pub fn update_location(
        &mut self,
        client_id: &ClientId,
        location: Location,
    ) -> Result<(), BrokerError> {
        match self.sessions.get_mut(client_id) {
            Some(session) if session.is_connected() => {
                session.last_location = Some(location);
                Ok(())
            }
            _ => Err(BrokerError::not_connected()),
        }
    }

    /// Mark the session DISCONNECTED, keeping its record for reconnection.
    ///
    /// Returns true if the session was CONNECTED before the call.
    pub fn disconnect(&mut self, client_id: &ClientId, now: Timestamp) -> bool {
        match self.sessions.get_mut(client_id) {
            Some(session) if session.is_connected() => {
                session.state = SessionState::Disconnected;
                session.state_since = now;
                true
            }
            _ => false,
        }
    }

    /// Check if a client has a CONNECTED session
    pub fn is_connected(&self, client_id: &ClientId) -> bool {
        self.sessions
            .get(client_id)
            .is_some_and(Session::is_connected)
    }

    /// Protocol state of `client_id`.
    pub fn state(&self, client_id: &ClientId) -> ProtocolState {
        match self.sessions.get(client_id).map(|s| s.state) {
            None => ProtocolState::Unconnected,
            Some(SessionState::Connected) => ProtocolState::Connected,
            Some(SessionState::Disconnected) => ProtocolState::Disconnected,
        }
    }

    /// Get session info for a client
    pub fn get(&self, client_id: &ClientId) -> Option<&Session> {
        self.sessions.get(client_id)
    }

    /// Disconnect every CONNECTED session silent for more than `timeout_secs`.
    ///
    /// Returns the identities that transitioned to DISCONNECTED.
    pub fn expire_stale(&mut self, now: Timestamp, timeout_secs: u64) -> Vec<ClientId> {
        let mut expired = Vec::new();
        for session in self.sessions.values_mut() {
            if session.is_connected() && session.last_seen.is_older_than(now, timeout_secs) {
                session.state = SessionState::Disconnected;
                session.state_since = now;
                expired.push(session.client_id.clone());
            }
        }
        expired
    }

    /// Delete DISCONNECTED records older than `retention_secs`.
    ///
    /// Returns the identities whose records were dropped.
    pub fn purge_disconnected(&mut self, now: Timestamp, retention_secs: u64) -> Vec<ClientId> {
        let stale: Vec<ClientId> = self
            .sessions
            .values()
            .filter(|s| !s.is_connected() && s.state_since.is_older_than(now, retention_secs))
            .map(|s| s.client_id.clone())
            .collect();

        for client_id in &stale {
            self.sessions.remove(client_id);
        }
        stale
    }

    /// Mark every CONNECTED session DISCONNECTED (shutdown path).
    pub fn disconnect_all(&mut self, now: Timestamp) -> Vec<ClientId> {
        let mut disconnected = Vec::new();
        for session in self.sessions.values_mut().filter(|s| s.is_connected()) {
            session.state = SessionState::Disconnected;
            session.state_since = now;
            disconnected.push(session.client_id.clone());
        }
        disconnected
    }

    /// Get all connected client IDs
    pub fn connected_clients(&self) -> Vec<ClientId> {
        self.sessions
            .values()
            .filter(|s| s.is_connected())
            .map(|s| s.client_id.clone())
            .collect()
    }

    /// Get statistics
    pub fn stats(&self) -> SessionStats {
        SessionStats {
            connected: self.sessions.values().filter(|s| s.is_connected()).count(),
            known: self.sessions.len(),
        }
    }
}

impl Default for ConnectionManager {
    fn default() -> Self {
        Self::new(ConnectionConfig::default())
    }
}
