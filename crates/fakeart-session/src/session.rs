//! Session types: what the server knows about one live connection.

use fakeart_protocol::{RoomCode, ServerMessage};
use fakeart_transport::ConnectionId;
use tokio::sync::mpsc;

/// Channel sender for delivering outbound frames to one connection.
pub type OutboundSender = mpsc::UnboundedSender<ServerMessage>;

/// The user a session plays as.
///
/// This is the session's link to its room: the room is looked up by code
/// each time, so a session never keeps a room alive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    pub room_code: RoomCode,
    pub username: String,
}

/// One live connection.
#[derive(Debug)]
pub struct Session {
    connection_id: ConnectionId,
    binding: Option<Binding>,
    outbound: OutboundSender,
}

impl Session {
    pub(crate) fn new(connection_id: ConnectionId, outbound: OutboundSender) -> Self {
        Self {
            connection_id,
            binding: None,
            outbound,
        }
    }

    pub fn connection_id(&self) -> ConnectionId {
        self.connection_id
    }

    /// The user this connection plays as, if it has created or joined a
    /// room.
    pub fn binding(&self) -> Option<&Binding> {
        self.binding.as_ref()
    }

    pub fn has_user(&self) -> bool {
        self.binding.is_some()
    }

    pub(crate) fn bind(&mut self, binding: Binding) {
        self.binding = Some(binding);
    }

    pub(crate) fn unbind(&mut self) -> Option<Binding> {
        self.binding.take()
    }

    /// Queues a frame. Returns `false` if the writer side has gone away.
    pub(crate) fn send(&self, msg: ServerMessage) -> bool {
        self.outbound.send(msg).is_ok()
    }
}
