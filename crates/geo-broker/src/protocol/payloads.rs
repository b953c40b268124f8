//! # Wire Payloads
//!
//! Payload shapes exactly as they travel between client and broker. Values
//! are unvalidated until the Router calls the matching `validate` method,
//! which converts them into domain values or reports `MalformedPayload`.

use serde::{Deserialize, Serialize};

use crate::domain::{BrokerError, Geofence, Location, ReasonCode, Topic};

/// A latitude/longitude pair as sent on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LocationPayload {
    pub lat: f64,
    pub lon: f64,
}

impl LocationPayload {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    pub fn validate(&self) -> Result<Location, BrokerError> {
        Ok(Location::new(self.lat, self.lon)?)
    }
}

impl From<Location> for LocationPayload {
    fn from(location: Location) -> Self {
        Self::new(location.lat(), location.lon())
    }
}

/// Geofence as sent in SUBSCRIBE. The shape is recognised by its fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GeofencePayload {
    /// `{centerLat, centerLon, radius}`, radius in meters
    #[serde(rename_all = "camelCase")]
    Circle {
        center_lat: f64,
        center_lon: f64,
        radius: f64,
    },
    /// `{southLat, westLon, northLat, eastLon}`
    #[serde(rename_all = "camelCase")]
    Rectangle {
        south_lat: f64,
        west_lon: f64,
        north_lat: f64,
        east_lon: f64,
    },
    /// `{vertices: [{lat, lon}, ...]}`
    Polygon { vertices: Vec<LocationPayload> },
}

impl GeofencePayload {
    pub fn circle(center_lat: f64, center_lon: f64, radius: f64) -> Self {
        Self::Circle {
            center_lat,
            center_lon,
            radius,
        }
    }

    pub fn validate(&self) -> Result<Geofence, BrokerError> {
        let fence = match self {
            Self::Circle {
                center_lat,
                center_lon,
                radius,
            } => Geofence::circle(Location::new(*center_lat, *center_lon)?, *radius)?,
            Self::Rectangle {
                south_lat,
                west_lon,
                north_lat,
                east_lon,
            } => Geofence::rectangle(
                Location::new(*south_lat, *west_lon)?,
                Location::new(*north_lat, *east_lon)?,
            )?,
            Self::Polygon { vertices } => Geofence::polygon(
                vertices
                    .iter()
                    .map(|v| Location::new(v.lat, v.lon))
                    .collect::<Result<Vec<_>, _>>()?,
            )?,
        };
        Ok(fence)
    }
}

/// Payload of CONNACK, SUBACK and PUBACK.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AckPayload {
    pub success: bool,
    /// Empty on plain success; otherwise a `ReasonCode` text
    pub reason: String,
}

impl AckPayload {
    pub fn success() -> Self {
        Self {
            success: true,
            reason: String::new(),
        }
    }

    /// Successful outcome that still carries information (e.g. no subscribers).
    pub fn success_with(reason: ReasonCode) -> Self {
        Self {
            success: true,
            reason: reason.to_string(),
        }
    }

    pub fn failure(reason: ReasonCode) -> Self {
        Self {
            success: false,
            reason: reason.to_string(),
        }
    }
}

/// Payload of SUBSCRIBE.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubscribePayload {
    pub topic: String,
    pub geofence: GeofencePayload,
}

impl SubscribePayload {
    pub fn validate(&self) -> Result<(Topic, Geofence), BrokerError> {
        Ok((Topic::new(self.topic.as_str())?, self.geofence.validate()?))
    }
}

/// Payload of UNSUBSCRIBE.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnsubscribePayload {
    pub topic: String,
}

impl UnsubscribePayload {
    pub fn validate(&self) -> Result<Topic, BrokerError> {
        Topic::new(self.topic.as_str())
    }
}

/// Payload of PUBLISH, both inbound from the publisher and outbound to
/// each matched subscriber.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishPayload {
    pub topic: String,
    pub publisher_location: LocationPayload,
    pub content: String,
}

impl PublishPayload {
    pub fn validate(&self) -> Result<(Topic, Location), BrokerError> {
        Ok((
            Topic::new(self.topic.as_str())?,
            self.publisher_location.validate()?,
        ))
    }
}

/// Payload of PINGREQ.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PingReqPayload {
    pub location: LocationPayload,
}

impl PingReqPayload {
    pub fn validate(&self) -> Result<Location, BrokerError> {
        self.location.validate()
    }
}
