//! Message envelopes and the payload byte codec.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

/// Errors from encoding or decoding an envelope.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PayloadError {
    #[error("failed to encode payload: {0}")]
    Encode(String),

    /// Also the result of decoding a transfer the kernel truncated.
    #[error("failed to decode payload: {0}")]
    Decode(String),
}

/// Correlation identifier for request/reply matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MsgId(Uuid);

impl MsgId {
    /// Creates a new random message id.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a message id from a UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the inner UUID.
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for MsgId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for MsgId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Msg({})", self.0)
    }
}

/// A typed message body plus its correlation id.
///
/// The body is any serde type, usually a protocol's request or response
/// sum type. `encode` produces the byte span handed to Send; `decode` turns
/// a received transfer back into the typed form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub id: MsgId,
    pub body: T,
}

impl<T: Serialize + DeserializeOwned> Envelope<T> {
    /// Wraps a body with a fresh correlation id.
    pub fn new(body: T) -> Self {
        Self {
            id: MsgId::new(),
            body,
        }
    }

    /// Wraps a reply body, reusing the request's correlation id.
    pub fn reply_to(request_id: MsgId, body: T) -> Self {
        Self {
            id: request_id,
            body,
        }
    }

    /// Encodes the envelope into the byte span given to Send.
    pub fn encode(&self) -> Result<Vec<u8>, PayloadError> {
        serde_json::to_vec(self).map_err(|e| PayloadError::Encode(e.to_string()))
    }

    /// Decodes an envelope from a received transfer.
    pub fn decode(bytes: &[u8]) -> Result<Self, PayloadError> {
        serde_json::from_slice(bytes).map_err(|e| PayloadError::Decode(e.to_string()))
    }
}
