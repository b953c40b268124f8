//! JSON codec for control packets.
//!
//! Framing is the transport's concern; these functions turn one complete
//! frame into a packet and back.

use thiserror::Error;

use super::packets::ControlPacket;
use crate::domain::BrokerError;

/// Errors from encoding or decoding a frame.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("failed to encode packet: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("failed to decode frame: {0}")]
    Decode(#[source] serde_json::Error),
}

impl From<CodecError> for BrokerError {
    fn from(err: CodecError) -> Self {
        BrokerError::MalformedPayload {
            field: "frame",
            detail: err.to_string(),
        }
    }
}

pub fn encode(packet: &ControlPacket) -> Result<Vec<u8>, CodecError> {
    serde_json::to_vec(packet).map_err(CodecError::Encode)
}

pub fn decode(frame: &[u8]) -> Result<ControlPacket, CodecError> {
    serde_json::from_slice(frame).map_err(CodecError::Decode)
}
