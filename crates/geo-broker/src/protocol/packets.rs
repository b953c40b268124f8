//! Control packet sum type.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::ClientId;

use super::payloads::{
    AckPayload, GeofencePayload, LocationPayload, PingReqPayload, PublishPayload,
    SubscribePayload, UnsubscribePayload,
};

/// One framed protocol message. Immutable once constructed.
///
/// Serialized adjacently tagged: `{"type": "PUBLISH", "payload": {...}}`;
/// packets without payload omit the `payload` key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum ControlPacket {
    #[serde(rename = "CONNECT")]
    Connect,
    #[serde(rename = "CONNACK")]
    ConnAck(AckPayload),
    #[serde(rename = "SUBSCRIBE")]
    Subscribe(SubscribePayload),
    #[serde(rename = "SUBACK")]
    SubAck(AckPayload),
    #[serde(rename = "UNSUBSCRIBE")]
    Unsubscribe(UnsubscribePayload),
    #[serde(rename = "PUBLISH")]
    Publish(PublishPayload),
    #[serde(rename = "PUBACK")]
    PubAck(AckPayload),
    #[serde(rename = "PINGREQ")]
    PingReq(PingReqPayload),
    #[serde(rename = "PINGRESP")]
    PingResp,
    #[serde(rename = "DISCONNECT")]
    Disconnect,
}

/// Packet kind without payload, for logging and accounting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PacketType {
    Connect,
    ConnAck,
    Subscribe,
    SubAck,
    Unsubscribe,
    Publish,
    PubAck,
    PingReq,
    PingResp,
    Disconnect,
}

impl PacketType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Connect => "CONNECT",
            Self::ConnAck => "CONNACK",
            Self::Subscribe => "SUBSCRIBE",
            Self::SubAck => "SUBACK",
            Self::Unsubscribe => "UNSUBSCRIBE",
            Self::Publish => "PUBLISH",
            Self::PubAck => "PUBACK",
            Self::PingReq => "PINGREQ",
            Self::PingResp => "PINGRESP",
            Self::Disconnect => "DISCONNECT",
        }
    }

    /// Whether clients may send this packet to the broker.
    pub fn is_client_to_broker(&self) -> bool {
        matches!(
            self,
            Self::Connect
                | Self::Subscribe
                | Self::Unsubscribe
                | Self::Publish
                | Self::PingReq
                | Self::Disconnect
        )
    }
}

impl fmt::Display for PacketType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ControlPacket {
    pub fn packet_type(&self) -> PacketType {
        match self {
            Self::Connect => PacketType::Connect,
            Self::ConnAck(_) => PacketType::ConnAck,
            Self::Subscribe(_) => PacketType::Subscribe,
            Self::SubAck(_) => PacketType::SubAck,
            Self::Unsubscribe(_) => PacketType::Unsubscribe,
            Self::Publish(_) => PacketType::Publish,
            Self::PubAck(_) => PacketType::PubAck,
            Self::PingReq(_) => PacketType::PingReq,
            Self::PingResp => PacketType::PingResp,
            Self::Disconnect => PacketType::Disconnect,
        }
    }

    /// SUBSCRIBE with a circular geofence.
    pub fn subscribe_circle(
        topic: impl Into<String>,
        center_lat: f64,
        center_lon: f64,
        radius_meters: f64,
    ) -> Self {
        Self::Subscribe(SubscribePayload {
            topic: topic.into(),
            geofence: GeofencePayload::circle(center_lat, center_lon, radius_meters),
        })
    }

    pub fn unsubscribe(topic: impl Into<String>) -> Self {
        Self::Unsubscribe(UnsubscribePayload {
            topic: topic.into(),
        })
    }

    pub fn publish(topic: impl Into<String>, lat: f64, lon: f64, content: impl Into<String>) -> Self {
        Self::Publish(PublishPayload {
            topic: topic.into(),
            publisher_location: LocationPayload::new(lat, lon),
            content: content.into(),
        })
    }

    pub fn ping_req(lat: f64, lon: f64) -> Self {
        Self::PingReq(PingReqPayload {
            location: LocationPayload::new(lat, lon),
        })
    }

    /// The acknowledgment payload, for CONNACK, SUBACK and PUBACK.
    pub fn ack(&self) -> Option<&AckPayload> {
        match self {
            Self::ConnAck(ack) | Self::SubAck(ack) | Self::PubAck(ack) => Some(ack),
            _ => None,
        }
    }
}

/// A packet addressed to one client identity.
#[derive(Debug, Clone, PartialEq)]
pub struct Outbound {
    pub recipient: ClientId,
    pub packet: ControlPacket,
}

impl Outbound {
    pub fn new(recipient: ClientId, packet: ControlPacket) -> Self {
        Self { recipient, packet }
    }
}
