//! Per-identity outbound queues.
//!
//! The transport attaches one `ClientOutbox` per connected peer and drains
//! it onto the wire; the broker delivers into it through `PacketSink`.

use std::collections::HashMap;
use std::pin::Pin;
use std::task::{Context, Poll};

use parking_lot::RwLock;
use tokio::sync::mpsc;
use tokio_stream::wrappers::UnboundedReceiverStream;
use tokio_stream::{Stream, StreamExt};
use tracing::debug;

use crate::domain::ClientId;
use crate::ports::{DeliveryError, PacketSink};
use crate::protocol::{ControlPacket, Outbound};

/// Registry of outbound queues keyed by client identity.
#[derive(Debug, Default)]
pub struct OutboxRegistry {
    senders: RwLock<HashMap<ClientId, mpsc::UnboundedSender<ControlPacket>>>,
}

impl OutboxRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a fresh queue for `client_id`, replacing any previous one.
    ///
    /// The previous outbox, if any, sees its stream end.
    pub fn attach(&self, client_id: ClientId) -> ClientOutbox {
        let (tx, rx) = mpsc::unbounded_channel();
        let previous = self.senders.write().insert(client_id.clone(), tx);
        if previous.is_some() {
            debug!(client = %client_id, "Replaced existing outbox");
        }
        ClientOutbox {
            client_id,
            stream: UnboundedReceiverStream::new(rx),
        }
    }

    /// Drop the queue for `client_id`. Returns true if one was attached.
    pub fn detach(&self, client_id: &ClientId) -> bool {
        self.senders.write().remove(client_id).is_some()
    }

    pub fn is_attached(&self, client_id: &ClientId) -> bool {
        self.senders.read().contains_key(client_id)
    }

    /// Number of attached queues.
    pub fn len(&self) -> usize {
        self.senders.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.senders.read().is_empty()
    }

    /// Drop every queue, ending all outbox streams.
    pub fn clear(&self) {
        self.senders.write().clear();
    }
}

impl PacketSink for OutboxRegistry {
    fn deliver(&self, outbound: Outbound) -> Result<(), DeliveryError> {
        let Outbound { recipient, packet } = outbound;
        let senders = self.senders.read();
        let Some(tx) = senders.get(&recipient) else {
            return Err(DeliveryError::NoOutbox(recipient));
        };
        tx.send(packet)
            .map_err(|_| DeliveryError::Closed(recipient))
    }
}

/// Receiving end of one client's outbound queue.
///
/// Implements `tokio_stream::Stream`; the stream ends when the broker drops
/// the queue (detach, replacement or shutdown).
#[derive(Debug)]
pub struct ClientOutbox {
    client_id: ClientId,
    stream: UnboundedReceiverStream<ControlPacket>,
}

impl ClientOutbox {
    pub fn client_id(&self) -> &ClientId {
        &self.client_id
    }

    /// Receive the next packet addressed to this client.
    ///
    /// # Returns
    ///
    /// - `Some(packet)` - The next packet
    /// - `None` - The queue was closed
    pub async fn recv(&mut self) -> Option<ControlPacket> {
        self.stream.next().await
    }

    /// Take a packet if one is already queued.
    pub fn try_recv(&mut self) -> Option<ControlPacket> {
        self.stream.as_mut().try_recv().ok()
    }
}

impl Stream for ClientOutbox {
    type Item = ControlPacket;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.stream).poll_next(cx)
    }
}
