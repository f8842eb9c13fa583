//! A participant in a room.

use fakeart_protocol::UserView;
use fakeart_transport::ConnectionId;

/// Whether a user takes part in the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Draws, can be the faker, counts toward voting completion.
    Player,
    /// Watches. Never takes a turn, never the faker.
    Spectator,
}

/// One roster entry. Survives disconnects while a round is in progress so
/// the player can rejoin into the same slot.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    name: String,
    role: Role,
    connection: Option<ConnectionId>,
    /// Whether this user has voted this round.
    pub is_voted: bool,
    /// Votes received this round.
    pub votes: u32,
}

impl User {
    pub fn new(name: impl Into<String>, role: Role, connection: ConnectionId) -> Self {
        Self {
            name: name.into(),
            role,
            connection: Some(connection),
            is_voted: false,
            votes: 0,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_player(&self) -> bool {
        self.role == Role::Player
    }

    /// The live connection, if the user is connected.
    pub fn connection(&self) -> Option<ConnectionId> {
        self.connection
    }

    pub fn is_connected(&self) -> bool {
        self.connection.is_some()
    }

    pub(crate) fn connect(&mut self, connection: ConnectionId) {
        self.connection = Some(connection);
    }

    pub(crate) fn disconnect(&mut self) {
        self.connection = None;
    }

    pub(crate) fn reset_votes(&mut self) {
        self.is_voted = false;
        self.votes = 0;
    }

    pub fn view(&self) -> UserView {
        UserView {
            name: self.name.clone(),
            connected: self.is_connected(),
            is_voted: self.is_voted,
            votes: self.votes,
        }
    }
}
