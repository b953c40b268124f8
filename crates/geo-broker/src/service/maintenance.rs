//! Periodic sweep and coordinated teardown.

use tracing::{debug, info};

use super::core::Router;
use crate::domain::ClientId;
use crate::protocol::{ControlPacket, Outbound};

/// Result of one maintenance sweep.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SweepReport {
    /// DISCONNECT notices for sessions that timed out
    pub expired: Vec<Outbound>,
    /// Session records deleted after the retention window
    pub purged: Vec<ClientId>,
}

impl Router {
    /// Disconnect every session silent for longer than the heartbeat timeout.
    ///
    /// Each expired session loses its subscriptions under the same lock
    /// acquisition, and gets a best-effort DISCONNECT notice.
    pub fn expire_stale(&self) -> Vec<Outbound> {
        let now = self.now();
        let mut state = self.state.lock();
        let timeout = state.connections.config().heartbeat_timeout_secs;

        let expired = state.connections.expire_stale(now, timeout);
        for client_id in &expired {
            state.subscriptions.remove_all(client_id);
        }
        drop(state);

        expired
            .into_iter()
            .map(|client_id| {
                info!(client = %client_id, timeout_secs = timeout, "Session expired");
                Outbound::new(client_id, ControlPacket::Disconnect)
            })
            .collect()
    }

    /// Delete DISCONNECTED session records older than the retention window.
    pub fn purge_disconnected(&self) -> Vec<ClientId> {
        let now = self.now();
        let mut state = self.state.lock();
        let retention = state.connections.config().session_retention_secs;
        let purged = state.connections.purge_disconnected(now, retention);
        if !purged.is_empty() {
            debug!(count = purged.len(), "Purged disconnected sessions");
        }
        purged
    }

    /// One sweep tick: expiry, then purge.
    pub fn run_sweep(&self) -> SweepReport {
        SweepReport {
            expired: self.expire_stale(),
            purged: self.purge_disconnected(),
        }
    }

    /// Force every session DISCONNECTED and release all subscriptions.
    ///
    /// Returns DISCONNECT notices for the sessions that were connected.
    pub fn shutdown_all(&self) -> Vec<Outbound> {
        let now = self.now();
        let mut state = self.state.lock();
        let disconnected = state.connections.disconnect_all(now);
        let released = state.subscriptions.clear();
        drop(state);

        info!(
            sessions = disconnected.len(),
            subscriptions = released,
            "Released all sessions"
        );
        disconnected
            .into_iter()
            .map(|client_id| Outbound::new(client_id, ControlPacket::Disconnect))
            .collect()
    }
}
