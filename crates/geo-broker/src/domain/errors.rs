//! Domain errors and the reason codes carried in acknowledgments.

use std::fmt;

use thiserror::Error;

/// Errors raised while processing a single inbound packet.
///
/// None of these are fatal to the broker; the Router turns each into a
/// negative acknowledgment addressed to the offending client.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BrokerError {
    /// Packet is not valid in the sender's current protocol state.
    #[error("protocol violation: {0}")]
    ProtocolViolation(Violation),

    /// A required field is missing or out of range.
    #[error("malformed payload in `{field}`: {detail}")]
    MalformedPayload {
        field: &'static str,
        detail: String,
    },

    /// Identity is syntactically invalid (empty).
    #[error("invalid client identity")]
    InvalidIdentity,
}

/// The specific protocol rule a packet broke.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Violation {
    /// Packet other than CONNECT from an identity without a live session.
    #[error("client is not connected")]
    NotConnected,

    /// CONNECT from an identity whose session is already CONNECTED.
    #[error("client is already connected")]
    AlreadyConnected,

    /// Broker-to-client packet type sent by a client.
    #[error("{0} is not accepted from clients")]
    UnexpectedPacket(&'static str),
}

impl BrokerError {
    pub fn not_connected() -> Self {
        Self::ProtocolViolation(Violation::NotConnected)
    }

    pub fn already_connected() -> Self {
        Self::ProtocolViolation(Violation::AlreadyConnected)
    }

    /// Reason code reported to the client for this error.
    pub fn reason_code(&self) -> ReasonCode {
        match self {
            Self::ProtocolViolation(Violation::NotConnected) => ReasonCode::NotConnected,
            Self::ProtocolViolation(Violation::AlreadyConnected) => ReasonCode::AlreadyConnected,
            Self::ProtocolViolation(Violation::UnexpectedPacket(_)) | Self::InvalidIdentity => {
                ReasonCode::ProtocolError
            }
            Self::MalformedPayload { .. } => ReasonCode::MalformedPayload,
        }
    }
}

/// Errors from constructing geometry values.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    #[error("latitude {0} outside [-90, 90]")]
    LatitudeOutOfRange(f64),

    #[error("longitude {0} outside [-180, 180]")]
    LongitudeOutOfRange(f64),

    #[error("radius {0} must be finite and non-negative")]
    InvalidRadius(f64),

    #[error("rectangle south edge {south} lies north of north edge {north}")]
    InvertedRectangle { south: f64, north: f64 },

    #[error("polygon needs at least 3 vertices, got {0}")]
    DegeneratePolygon(usize),
}

impl From<GeometryError> for BrokerError {
    fn from(err: GeometryError) -> Self {
        let field = match err {
            GeometryError::LatitudeOutOfRange(_) => "lat",
            GeometryError::LongitudeOutOfRange(_) => "lon",
            GeometryError::InvalidRadius(_) => "radius",
            GeometryError::InvertedRectangle { .. } | GeometryError::DegeneratePolygon(_) => {
                "geofence"
            }
        };
        Self::MalformedPayload {
            field,
            detail: err.to_string(),
        }
    }
}

/// Outcome codes carried as the `reason` of CONNACK, SUBACK and PUBACK.
///
/// The `Display` text is the stable wire representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReasonCode {
    Success,
    ProtocolError,
    NotConnected,
    AlreadyConnected,
    MalformedPayload,
    NoMatchingSubscribers,
    NoSubscriptionExisted,
}

impl ReasonCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "Success",
            Self::ProtocolError => "ProtocolError",
            Self::NotConnected => "NotConnected",
            Self::AlreadyConnected => "AlreadyConnected",
            Self::MalformedPayload => "MalformedPayload",
            Self::NoMatchingSubscribers => "NoMatchingSubscribers",
            Self::NoSubscriptionExisted => "NoSubscriptionExisted",
        }
    }
}

impl fmt::Display for ReasonCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
