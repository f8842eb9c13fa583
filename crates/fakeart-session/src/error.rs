//! Error types for the session layer.

use fakeart_transport::ConnectionId;

/// Errors that can occur during session management.
///
/// None of these are expected during normal play; the dispatcher treats
/// them as bugs and surfaces them to the operator.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// No session exists for the connection.
    #[error("session not found for {0}")]
    NotFound(ConnectionId),

    /// A session for this connection already exists.
    #[error("{0} already has a session")]
    AlreadyRegistered(ConnectionId),

    /// The session is already bound to a user.
    #[error("{0} is already bound to a user")]
    AlreadyBound(ConnectionId),
}
