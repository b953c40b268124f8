use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;

use crate::domain::{
    ClientId, ConnectionConfig, ConnectionManager, Session, Subscription, SubscriptionRegistry,
    Timestamp,
};
use crate::ports::TimeSource;

/// Sessions and subscriptions, guarded together so that a disconnect and
/// the removal of that client's subscriptions are one atomic step.
#[derive(Debug)]
pub(crate) struct BrokerState {
    pub(crate) connections: ConnectionManager,
    pub(crate) subscriptions: SubscriptionRegistry,
}

impl BrokerState {
    /// Mark `client_id` DISCONNECTED and drop its subscriptions.
    ///
    /// Returns true if the client was CONNECTED.
    pub(crate) fn disconnect(&mut self, client_id: &ClientId, now: Timestamp) -> bool {
        let was_connected = self.connections.disconnect(client_id, now);
        self.subscriptions.remove_all(client_id);
        was_connected
    }
}

/// Message Router: drives the per-client protocol state machine over the
/// shared session table and subscription index.
///
/// The Router owns both components explicitly; hosts share it behind an
/// `Arc` and call it from any number of worker threads.
///
/// # Example
///
/// ```rust
/// use geo_broker::{ClientId, ConnectionConfig, ControlPacket, Router, SystemTimeSource};
///
/// let router = Router::new(ConnectionConfig::default(), Box::new(SystemTimeSource::new()));
/// let c1 = ClientId::new("c1").unwrap();
///
/// router.handle_packet(&c1, ControlPacket::Connect);
/// router.handle_packet(&c1, ControlPacket::subscribe_circle("c1", 0.0, 0.0, 0.0));
/// let out = router.handle_packet(&c1, ControlPacket::publish("c1", 0.0, 0.0, "hi"));
///
/// // PUBACK to the publisher plus the echo to itself
/// assert_eq!(out.len(), 2);
/// ```
pub struct Router {
    pub(crate) state: Mutex<BrokerState>,
    /// Time source for liveness bookkeeping
    pub(crate) time_source: Box<dyn TimeSource>,
    pub(crate) packets_handled: AtomicU64,
    pub(crate) publishes_delivered: AtomicU64,
}

/// Router statistics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BrokerStats {
    pub connected_sessions: usize,
    pub known_sessions: usize,
    pub subscriptions: usize,
    pub topics: usize,
    pub packets_handled: u64,
    pub publishes_delivered: u64,
}

impl Router {
    /// Create a router with empty session and subscription tables.
    pub fn new(config: ConnectionConfig, time_source: Box<dyn TimeSource>) -> Self {
        Self {
            state: Mutex::new(BrokerState {
                connections: ConnectionManager::new(config),
                subscriptions: SubscriptionRegistry::new(),
            }),
            time_source,
            packets_handled: AtomicU64::new(0),
            publishes_delivered: AtomicU64::new(0),
        }
    }

    /// Get the current timestamp from the time source.
    pub(crate) fn now(&self) -> Timestamp {
        self.time_source.now()
    }

    pub fn is_connected(&self, client_id: &ClientId) -> bool {
        self.state.lock().connections.is_connected(client_id)
    }

    /// Snapshot of a client's session record.
    pub fn session(&self, client_id: &ClientId) -> Option<Session> {
        self.state.lock().connections.get(client_id).cloned()
    }

    /// Snapshot of a client's subscriptions.
    pub fn subscriptions_of(&self, client_id: &ClientId) -> Vec<Subscription> {
        self.state.lock().subscriptions.subscriptions_of(client_id)
    }

    pub fn stats(&self) -> BrokerStats {
        let state = self.state.lock();
        let sessions = state.connections.stats();
        BrokerStats {
            connected_sessions: sessions.connected,
            known_sessions: sessions.known,
            subscriptions: state.subscriptions.len(),
            topics: state.subscriptions.topic_count(),
            packets_handled: self.packets_handled.load(Ordering::Relaxed),
            publishes_delivered: self.publishes_delivered.load(Ordering::Relaxed),
        }
    }
}
