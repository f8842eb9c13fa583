//! Domain errors.
//!
//! A `GameError` is an expected failure: a precondition that did not hold or
//! a payload that failed validation. Each one carries a short message that
//! is safe to show the player, separate from the `Display` text used in
//! logs.

use fakeart_protocol::{ProtocolError, RoomCode};

/// Errors that are reported back to the client instead of ending the
/// connection.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    /// The connection already plays as someone.
    #[error("connection is already bound to user {0}")]
    AlreadyHasUser(String),

    /// The connection has not created or joined a room yet.
    #[error("connection has no user")]
    NoUser,

    /// The bound user's room is gone.
    #[error("user {0} is not in a room")]
    NotInRoom(String),

    /// The lobby has reached its room limit.
    #[error("lobby is full")]
    LobbyFull,

    /// No room has this code.
    #[error("room {0} does not exist")]
    RoomNotFound(RoomCode),

    /// The room's roster is at capacity.
    #[error("room {0} is full")]
    RoomFull(RoomCode),

    /// Someone in the room already uses this name.
    #[error("name {name} is taken in room {room}")]
    NameTaken { name: String, room: RoomCode },

    /// A rejoin named nobody in the room.
    #[error("name {name} is not in room {room}")]
    NameNotInRoom { name: String, room: RoomCode },

    /// The action needs a round in progress.
    #[error("no game in progress in room {0}")]
    GameNotInProgress(RoomCode),

    /// The action is only allowed during setup.
    #[error("game already in progress in room {0}")]
    GameInProgress(RoomCode),

    /// A stroke from someone whose turn it isn't.
    #[error("it is not {0}'s turn")]
    NotYourTurn(String),

    /// A round cannot start with this few players.
    #[error("room {room} has {players} players, needs {needed}")]
    NotEnoughPlayers {
        room: RoomCode,
        players: usize,
        needed: usize,
    },

    /// Reconnect targeted a roster entry that no longer exists.
    #[error("could not readd {0}: existing user target does not exist")]
    RejoinTargetMissing(String),

    /// The payload failed shape validation.
    #[error("invalid payload: {0}")]
    InvalidPayload(String),
}

impl GameError {
    /// The message sent to the client in `{ "err": ... }`.
    pub fn client_message(&self) -> String {
        match self {
            Self::AlreadyHasUser(_) => "You are already in a room".into(),
            Self::NoUser => "You are not logged in".into(),
            Self::NotInRoom(_) => "You are not in a room".into(),
            Self::LobbyFull => "Server is full, try again later".into(),
            Self::RoomNotFound(code) => format!("Room {code} does not exist"),
            Self::RoomFull(_) => "Room is full".into(),
            Self::NameTaken { name, .. } => format!("Name \"{name}\" is already taken"),
            Self::NameNotInRoom { .. } => "Could not rejoin".into(),
            Self::GameNotInProgress(_) => "Game is not in progress".into(),
            Self::GameInProgress(_) => "Game is already in progress".into(),
            Self::NotYourTurn(_) => "It is not your turn".into(),
            Self::NotEnoughPlayers { needed, .. } => {
                format!("Need at least {needed} players to start")
            }
            Self::RejoinTargetMissing(_) => "Could not rejoin".into(),
            Self::InvalidPayload(reason) => format!("Invalid message: {reason}"),
        }
    }
}

impl From<ProtocolError> for GameError {
    fn from(err: ProtocolError) -> Self {
        match err {
            ProtocolError::InvalidMessage(reason) => Self::InvalidPayload(reason),
            other => Self::InvalidPayload(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_message_hides_internal_detail() {
        let err = GameError::RejoinTargetMissing("ann".into());
        assert_eq!(err.client_message(), "Could not rejoin");
        assert!(err.to_string().contains("ann"));
    }

    #[test]
    fn test_from_protocol_error_keeps_rule_text() {
        let err: GameError =
            ProtocolError::InvalidMessage("username must be 1-15 characters long".into()).into();
        assert_eq!(
            err.client_message(),
            "Invalid message: username must be 1-15 characters long"
        );
    }
}
