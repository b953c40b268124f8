//! # Broker Runtime
//!
//! Hosts a `Router` on tokio:
//!
//! - `worker_count` workers, each with its own bounded inbound queue. A
//!   sender identity always hashes to the same worker, so its packets are
//!   handled in order while different senders proceed concurrently.
//! - A sweep task that runs `Router::run_sweep` every `sweep_interval_ms`.
//! - Coordinated shutdown: stop intake, drain the worker queues within
//!   `shutdown_timeout_ms`, abort stragglers, then release every session.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{interval, timeout, MissedTickBehavior};
use tracing::{debug, info, warn};

use super::outbox::{ClientOutbox, OutboxRegistry};
use super::RuntimeError;
use crate::domain::{BrokerConfig, ClientId, ConfigError};
use crate::ports::{BrokerApi, ConfigProvider, PacketSink, TimeSource};
use crate::protocol::{ControlPacket, Outbound};
use crate::service::Router;

/// Inbound queue capacity per worker.
const WORKER_QUEUE_DEPTH: usize = 1024;

/// Work item for a packet-processing worker.
#[derive(Debug)]
enum Inbound {
    Packet(ClientId, ControlPacket),
    Frame(ClientId, Vec<u8>),
    PeerLost(ClientId),
}

impl Inbound {
    fn sender(&self) -> &ClientId {
        match self {
            Self::Packet(id, _) | Self::Frame(id, _) | Self::PeerLost(id) => id,
        }
    }
}

/// A running broker: router, worker pool, outboxes and sweep task.
pub struct BrokerRuntime {
    router: Arc<Router>,
    outboxes: Arc<OutboxRegistry>,
    config: BrokerConfig,
    /// Worker queues; `None` once shutdown has begun
    queues: RwLock<Option<Vec<mpsc::Sender<Inbound>>>>,
    workers: Mutex<Vec<JoinHandle<()>>>,
    sweeper: Mutex<Option<JoinHandle<()>>>,
    shutdown_tx: watch::Sender<bool>,
}

impl BrokerRuntime {
    /// Start the broker on the current tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if the config fails validation.
    pub fn start(
        config: BrokerConfig,
        time_source: Box<dyn TimeSource>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let router = Arc::new(Router::new(config.connection.clone(), time_source));
        let outboxes = Arc::new(OutboxRegistry::new());
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let mut queues = Vec::with_capacity(config.worker_count);
        let mut workers = Vec::with_capacity(config.worker_count);
        for worker_id in 0..config.worker_count {
            let (tx, rx) = mpsc::channel(WORKER_QUEUE_DEPTH);
            queues.push(tx);
            workers.push(tokio::spawn(run_worker(
                worker_id,
                rx,
                Arc::clone(&router),
                Arc::clone(&outboxes),
            )));
        }

        let sweeper = tokio::spawn(run_sweeper(
            config.clone(),
            Arc::clone(&router),
            Arc::clone(&outboxes),
            shutdown_rx,
        ));

        info!(
            workers = config.worker_count,
            sweep_interval_ms = config.sweep_interval_ms,
            heartbeat_timeout_secs = config.connection.heartbeat_timeout_secs,
            "[geo-broker] Runtime started"
        );

        Ok(Self {
            router,
            outboxes,
            config,
            queues: RwLock::new(Some(queues)),
            workers: Mutex::new(workers),
            sweeper: Mutex::new(Some(sweeper)),
            shutdown_tx,
        })
    }

    /// Start with configuration from a provider.
    pub fn start_with_provider(
        provider: &dyn ConfigProvider,
        time_source: Box<dyn TimeSource>,
    ) -> Result<Self, ConfigError> {
        Self::start(provider.broker_config(), time_source)
    }

    /// Register the outbound queue for `client_id`.
    ///
    /// Attach before submitting the client's CONNECT so the CONNACK has
    /// somewhere to go.
    pub fn attach(&self, client_id: ClientId) -> ClientOutbox {
        self.outboxes.attach(client_id)
    }

    pub fn router(&self) -> &Arc<Router> {
        &self.router
    }

    pub fn config(&self) -> &BrokerConfig {
        &self.config
    }

    pub fn is_running(&self) -> bool {
        self.queues.read().is_some()
    }

    /// Coordinated teardown.
    ///
    /// Stops accepting packets, waits up to `shutdown_timeout_ms` for queued
    /// packets to be handled, aborts whatever is left, then disconnects
    /// every session and closes every outbox. Calling it twice is a no-op.
    pub async fn shutdown(&self) {
        let Some(queues) = self.queues.write().take() else {
            return;
        };
        info!("[geo-broker] Shutting down");

        // Receivers drain what is queued, then see the channel close
        drop(queues);
        let _ = self.shutdown_tx.send(true);

        let mut handles = std::mem::take(&mut *self.workers.lock());
        if let Some(sweeper) = self.sweeper.lock().take() {
            handles.push(sweeper);
        }

        let drained = timeout(self.config.shutdown_timeout(), async {
            for handle in handles.iter_mut() {
                let _ = handle.await;
            }
        })
        .await;

        if drained.is_err() {
            warn!(
                timeout_ms = self.config.shutdown_timeout_ms,
                "[geo-broker] Drain timed out, aborting workers"
            );
            for handle in &handles {
                handle.abort();
            }
        }

        deliver_all(&self.outboxes, self.router.shutdown_all());
        self.outboxes.clear();
        info!("[geo-broker] Shutdown complete");
    }

    async fn enqueue(&self, job: Inbound) -> Result<(), RuntimeError> {
        let queue = {
            let queues = self.queues.read();
            let Some(queues) = queues.as_ref() else {
                return Err(RuntimeError::ShuttingDown);
            };
            queues[worker_index(job.sender(), queues.len())].clone()
        };
        queue.send(job).await.map_err(|_| RuntimeError::Closed)
    }
}

#[async_trait]
impl BrokerApi for BrokerRuntime {
    async fn submit(&self, sender: ClientId, packet: ControlPacket) -> Result<(), RuntimeError> {
        self.enqueue(Inbound::Packet(sender, packet)).await
    }

    async fn submit_frame(&self, sender: ClientId, frame: Vec<u8>) -> Result<(), RuntimeError> {
        self.enqueue(Inbound::Frame(sender, frame)).await
    }

    async fn peer_lost(&self, sender: ClientId) -> Result<(), RuntimeError> {
        // Detach now: a reattach for the same identity may land before the
        // worker reaches this job.
        self.outboxes.detach(&sender);
        self.enqueue(Inbound::PeerLost(sender)).await
    }
}

/// Stable worker assignment for a sender identity.
fn worker_index(client_id: &ClientId, workers: usize) -> usize {
    let mut hasher = DefaultHasher::new();
    client_id.hash(&mut hasher);
    (hasher.finish() % workers as u64) as usize
}

async fn run_worker(
    worker_id: usize,
    mut rx: mpsc::Receiver<Inbound>,
    router: Arc<Router>,
    outboxes: Arc<OutboxRegistry>,
) {
    debug!(worker = worker_id, "Worker started");
    while let Some(job) = rx.recv().await {
        let outbound = match job {
            Inbound::Packet(sender, packet) => router.handle_packet(&sender, packet),
            Inbound::Frame(sender, frame) => router.handle_frame(&sender, &frame),
            Inbound::PeerLost(sender) => router.peer_lost(&sender),
        };
        deliver_all(&outboxes, outbound);
    }
    debug!(worker = worker_id, "Worker stopped");
}

async fn run_sweeper(
    config: BrokerConfig,
    router: Arc<Router>,
    outboxes: Arc<OutboxRegistry>,
    mut shutdown_rx: watch::Receiver<bool>,
) {
    let mut ticker = interval(config.sweep_interval());
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let report = router.run_sweep();
                if !report.expired.is_empty() || !report.purged.is_empty() {
                    debug!(
                        expired = report.expired.len(),
                        purged = report.purged.len(),
                        "Sweep finished"
                    );
                }
                deliver_all(&outboxes, report.expired);
            }
            _ = shutdown_rx.changed() => break,
        }
    }
}

fn deliver_all(outboxes: &OutboxRegistry, outbound: Vec<Outbound>) {
    for packet in outbound {
        if let Err(e) = outboxes.deliver(packet) {
            warn!(error = %e, "Dropped outbound packet");
        }
    }
}
