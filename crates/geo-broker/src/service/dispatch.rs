//! Per-packet dispatch: the protocol state machine.

use std::sync::atomic::Ordering;

use tracing::{debug, info, warn};

use super::core::{BrokerState, Router};
use crate::domain::{BrokerError, ClientId, ReasonCode, Timestamp, Violation};
use crate::ports::PacketHandler;
use crate::protocol::{codec, AckPayload, ControlPacket, Outbound, PacketType};

impl Router {
    /// Process one packet from `sender` and return the packets to deliver.
    ///
    /// Liveness is recorded for every packet before dispatch. Errors never
    /// escape: each one becomes a negative acknowledgment to the sender.
    pub fn handle_packet(&self, sender: &ClientId, packet: ControlPacket) -> Vec<Outbound> {
        let kind = packet.packet_type();
        let now = self.now();
        self.packets_handled.fetch_add(1, Ordering::Relaxed);
        debug!(client = %sender, packet = %kind, "Handling packet");

        let result = {
            let mut state = self.state.lock();
            state.connections.touch(sender, now);
            Self::dispatch(&mut state, sender, packet, now)
        };

        match result {
            Ok(outbound) => {
                if kind == PacketType::Publish {
                    // Everything past the PUBACK is an echo to a subscriber
                    let delivered = outbound.len().saturating_sub(1) as u64;
                    self.publishes_delivered
                        .fetch_add(delivered, Ordering::Relaxed);
                }
                outbound
            }
            Err(err) => {
                let reason = err.reason_code();
                warn!(
                    client = %sender,
                    packet = %kind,
                    reason = %reason,
                    error = %err,
                    "Rejected packet"
                );
                vec![Outbound::new(sender.clone(), nack_for(kind, reason))]
            }
        }
    }

    /// Decode a JSON frame and process it.
    ///
    /// Undecodable frames still count as liveness and are answered with
    /// CONNACK(false, MalformedPayload).
    pub fn handle_frame(&self, sender: &ClientId, frame: &[u8]) -> Vec<Outbound> {
        match codec::decode(frame) {
            Ok(packet) => self.handle_packet(sender, packet),
            Err(err) => {
                let now = self.now();
                self.packets_handled.fetch_add(1, Ordering::Relaxed);
                self.state.lock().connections.touch(sender, now);
                let err = BrokerError::from(err);
                warn!(client = %sender, error = %err, "Rejected undecodable frame");
                vec![Outbound::new(
                    sender.clone(),
                    ControlPacket::ConnAck(AckPayload::failure(err.reason_code())),
                )]
            }
        }
    }

    /// Abrupt loss of the peer: an implicit DISCONNECT with nobody to reply to.
    pub fn peer_lost(&self, sender: &ClientId) -> Vec<Outbound> {
        let now = self.now();
        let was_connected = self.state.lock().disconnect(sender, now);
        if was_connected {
            info!(client = %sender, "Peer lost, session disconnected");
        }
        Vec::new()
    }

    fn dispatch(
        state: &mut BrokerState,
        sender: &ClientId,
        packet: ControlPacket,
        now: Timestamp,
    ) -> Result<Vec<Outbound>, BrokerError> {
        let kind = packet.packet_type();
        if kind != PacketType::Connect
            && kind.is_client_to_broker()
            && !state.connections.is_connected(sender)
        {
            return Err(BrokerError::not_connected());
        }

        let reply = |packet| vec![Outbound::new(sender.clone(), packet)];

        match packet {
            ControlPacket::Connect => {
                let session = state.connections.connect(sender, now)?;
                info!(
                    client = %sender,
                    connect_count = session.connect_count,
                    "Client connected"
                );
                Ok(reply(ControlPacket::ConnAck(AckPayload::success())))
            }

            ControlPacket::Subscribe(payload) => {
                let (topic, geofence) = payload.validate()?;
                let replaced = state.subscriptions.subscribe(sender, &topic, geofence);
                debug!(
                    client = %sender,
                    topic = %topic,
                    replaced = replaced.is_some(),
                    "Subscribed"
                );
                Ok(reply(ControlPacket::SubAck(AckPayload::success())))
            }

            ControlPacket::Unsubscribe(payload) => {
                let topic = payload.validate()?;
                let ack = if state.subscriptions.unsubscribe(sender, &topic) {
                    AckPayload::success()
                } else {
                    AckPayload::success_with(ReasonCode::NoSubscriptionExisted)
                };
                Ok(reply(ControlPacket::SubAck(ack)))
            }

            ControlPacket::Publish(payload) => {
                let (topic, location) = payload.validate()?;
                let recipients = state.subscriptions.match_subscribers(&topic, &location);
                debug!(
                    client = %sender,
                    topic = %topic,
                    recipients = recipients.len(),
                    "Routing publish"
                );

                let ack = if recipients.is_empty() {
                    AckPayload::success_with(ReasonCode::NoMatchingSubscribers)
                } else {
                    AckPayload::success()
                };
                let mut outbound = Vec::with_capacity(recipients.len() + 1);
                outbound.push(Outbound::new(sender.clone(), ControlPacket::PubAck(ack)));
                outbound.extend(recipients.into_iter().map(|recipient| {
                    Outbound::new(recipient, ControlPacket::Publish(payload.clone()))
                }));
                Ok(outbound)
            }

            ControlPacket::PingReq(payload) => {
                let location = payload.validate()?;
                state.connections.update_location(sender, location)?;
                Ok(reply(ControlPacket::PingResp))
            }

            ControlPacket::Disconnect => {
                state.disconnect(sender, now);
                info!(client = %sender, "Client disconnected");
                Ok(Vec::new())
            }

            ControlPacket::ConnAck(_)
            | ControlPacket::SubAck(_)
            | ControlPacket::PubAck(_)
            | ControlPacket::PingResp => Err(BrokerError::ProtocolViolation(
                Violation::UnexpectedPacket(kind.as_str()),
            )),
        }
    }
}

/// Negative acknowledgment answering a rejected packet of type `kind`.
fn nack_for(kind: PacketType, reason: ReasonCode) -> ControlPacket {
    let ack = AckPayload::failure(reason);
    match kind {
        PacketType::Connect => ControlPacket::ConnAck(ack),
        PacketType::Subscribe | PacketType::Unsubscribe => ControlPacket::SubAck(ack),
        PacketType::Publish => ControlPacket::PubAck(ack),
        PacketType::PingReq
        | PacketType::Disconnect
        | PacketType::ConnAck
        | PacketType::SubAck
        | PacketType::PubAck
        | PacketType::PingResp => ControlPacket::ConnAck(ack),
    }
}

impl PacketHandler for Router {
    fn handle_packet(&self, sender: &ClientId, packet: ControlPacket) -> Vec<Outbound> {
        Router::handle_packet(self, sender, packet)
    }

    fn handle_frame(&self, sender: &ClientId, frame: &[u8]) -> Vec<Outbound> {
        Router::handle_frame(self, sender, frame)
    }

    fn peer_lost(&self, sender: &ClientId) -> Vec<Outbound> {
        Router::peer_lost(self, sender)
    }
}
