//! Error types for the protocol layer.

/// Errors that can occur while encoding, decoding or validating a frame.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serialization failed (turning a Rust type into bytes).
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// Deserialization failed: malformed JSON, unknown event name, or a
    /// payload with missing or mistyped fields.
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),

    /// The payload parsed but violates a field rule (e.g. a username that
    /// is too long).
    #[error("invalid message: {0}")]
    InvalidMessage(String),
}
