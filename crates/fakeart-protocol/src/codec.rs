//! Codec trait and the JSON implementation.
//!
//! The server only ever speaks JSON, but the handler is written against
//! [`Codec`] so tests (and a future binary format) can swap it.

use serde::{Serialize, de::DeserializeOwned};

use crate::ProtocolError;

/// Converts wire types to bytes and back.
pub trait Codec: Send + Sync + 'static {
    /// Serializes a value into bytes.
    ///
    /// # Errors
    /// Returns `ProtocolError::Encode` if serialization fails.
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, ProtocolError>;

    /// Deserializes bytes back into a value.
    ///
    /// # Errors
    /// Returns `ProtocolError::Decode` if the bytes are malformed or don't
    /// match the expected type.
    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, ProtocolError>;
}

/// A [`Codec`] that uses JSON (via `serde_json`).
///
/// ```rust
/// use fakeart_protocol::{Codec, EventName, Inbound, JsonCodec};
///
/// let codec = JsonCodec;
/// let frame: Inbound = codec.decode(br#"{"event":"START_GAME"}"#).unwrap();
/// assert_eq!(frame.event, EventName::StartGame);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl Codec for JsonCodec {
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, ProtocolError> {
        serde_json::to_vec(value).map_err(ProtocolError::Encode)
    }

    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, ProtocolError> {
        serde_json::from_slice(data).map_err(ProtocolError::Decode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{EventName, ServerMessage};

    #[test]
    fn test_json_codec_encodes_server_message_as_json_text() {
        let bytes = JsonCodec
            .encode(&ServerMessage::error(EventName::CreateRoom, "Lobby is full"))
            .unwrap();
        assert_eq!(
            std::str::from_utf8(&bytes).unwrap(),
            r#"{"event":"CREATE_ROOM","data":{"err":"Lobby is full"}}"#
        );
    }

    #[test]
    fn test_json_codec_decode_garbage_is_decode_error() {
        let result: Result<crate::Inbound, _> = JsonCodec.decode(b"not json");
        assert!(matches!(result, Err(ProtocolError::Decode(_))));
    }
}
