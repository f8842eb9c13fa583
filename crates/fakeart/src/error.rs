//! Unified error type for the fake artist server.

use fakeart_game::{GameError, PromptError};
use fakeart_protocol::ProtocolError;
use fakeart_session::SessionError;
use fakeart_transport::TransportError;

/// Top-level error that wraps all crate-specific errors.
///
/// A [`GameError`] reaching the dispatch boundary is turned into an error
/// reply and never escapes as this type; every other variant means the
/// connection it happened on is finished.
#[derive(Debug, thiserror::Error)]
pub enum FakeArtError {
    /// A transport-level error (bind, accept, send, recv).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A protocol-level error (encode, decode).
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// Session bookkeeping went wrong.
    #[error(transparent)]
    Session(#[from] SessionError),

    /// A domain error outside of request dispatch.
    #[error(transparent)]
    Game(#[from] GameError),

    /// The prompt pool could not be loaded.
    #[error(transparent)]
    Prompts(#[from] PromptError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_transport_error() {
        let err = TransportError::ConnectionClosed("gone".into());
        let fakeart_err: FakeArtError = err.into();
        assert!(matches!(fakeart_err, FakeArtError::Transport(_)));
        assert!(fakeart_err.to_string().contains("gone"));
    }

    #[test]
    fn test_from_protocol_error() {
        let err = ProtocolError::InvalidMessage("bad".into());
        let fakeart_err: FakeArtError = err.into();
        assert!(matches!(fakeart_err, FakeArtError::Protocol(_)));
    }

    #[test]
    fn test_from_session_error() {
        let err = SessionError::NotFound(fakeart_transport::ConnectionId::new(3));
        let fakeart_err: FakeArtError = err.into();
        assert!(matches!(fakeart_err, FakeArtError::Session(_)));
        assert!(fakeart_err.to_string().contains("conn-3"));
    }

    #[test]
    fn test_from_game_error() {
        let fakeart_err: FakeArtError = GameError::LobbyFull.into();
        assert!(matches!(fakeart_err, FakeArtError::Game(GameError::LobbyFull)));
    }
}
