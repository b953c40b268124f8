//! # Control Packet Protocol
//!
//! Typed messages exchanged between a client identity and the broker:
//!
//! | Packet      | Direction | Payload                                   |
//! |-------------|-----------|-------------------------------------------|
//! | CONNECT     | C → B     | none                                      |
//! | CONNACK     | B → C     | success, reason                           |
//! | SUBSCRIBE   | C → B     | topic, geofence                           |
//! | SUBACK      | B → C     | success, reason                           |
//! | UNSUBSCRIBE | C → B     | topic                                     |
//! | PUBLISH     | both      | topic, publisherLocation, content         |
//! | PUBACK      | B → C     | success, reason                           |
//! | PINGREQ     | C → B     | location                                  |
//! | PINGRESP    | B → C     | none                                      |
//! | DISCONNECT  | both      | none                                      |

pub mod codec;
pub mod packets;
pub mod payloads;

pub use codec::{decode, encode, CodecError};
pub use packets::{ControlPacket, Outbound, PacketType};
pub use payloads::{
    AckPayload, GeofencePayload, LocationPayload, PingReqPayload, PublishPayload,
    SubscribePayload, UnsubscribePayload,
};
