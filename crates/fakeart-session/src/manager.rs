//! The session manager: one entry per live connection.
//!
//! # Concurrency note
//!
//! `SessionManager` is a plain `HashMap` wrapper. It lives inside the
//! dispatcher, which the server guards with a single mutex, so it needs no
//! locking of its own.

use std::collections::HashMap;

use fakeart_protocol::ServerMessage;
use fakeart_transport::ConnectionId;

use crate::{Binding, OutboundSender, Session, SessionError};

/// Tracks every live connection and which user it is bound to.
///
/// ```text
/// register() ──→ bind() ──→ unbind() ──→ unregister()
///                  ↑           │
///                  └───────────┘  (leave a room, join another)
/// ```
#[derive(Debug, Default)]
pub struct SessionManager {
    sessions: HashMap<ConnectionId, Session>,
}

impl SessionManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates the session for a freshly accepted connection.
    ///
    /// # Errors
    /// [`SessionError::AlreadyRegistered`] if the id is already in use.
    pub fn register(
        &mut self,
        connection_id: ConnectionId,
        outbound: OutboundSender,
    ) -> Result<&Session, SessionError> {
        if self.sessions.contains_key(&connection_id) {
            return Err(SessionError::AlreadyRegistered(connection_id));
        }
        let session = self
            .sessions
            .entry(connection_id)
            .or_insert_with(|| Session::new(connection_id, outbound));
        tracing::debug!(%connection_id, "session registered");
        Ok(session)
    }

    /// Removes a connection's session. Any binding must already have been
    /// dealt with by the caller.
    pub fn unregister(&mut self, connection_id: ConnectionId) -> Option<Session> {
        let removed = self.sessions.remove(&connection_id);
        if removed.is_some() {
            tracing::debug!(%connection_id, "session unregistered");
        }
        removed
    }

    pub fn get(&self, connection_id: ConnectionId) -> Option<&Session> {
        self.sessions.get(&connection_id)
    }

    /// Like [`get`](Self::get), but a missing session is an error.
    pub fn require(&self, connection_id: ConnectionId) -> Result<&Session, SessionError> {
        self.get(connection_id)
            .ok_or(SessionError::NotFound(connection_id))
    }

    /// Binds a session to a user.
    ///
    /// # Errors
    /// - [`SessionError::NotFound`]: no such session
    /// - [`SessionError::AlreadyBound`]: unbind first
    pub fn bind(
        &mut self,
        connection_id: ConnectionId,
        binding: Binding,
    ) -> Result<(), SessionError> {
        let session = self
            .sessions
            .get_mut(&connection_id)
            .ok_or(SessionError::NotFound(connection_id))?;
        if session.has_user() {
            return Err(SessionError::AlreadyBound(connection_id));
        }
        tracing::debug!(
            %connection_id,
            room = %binding.room_code,
            user = %binding.username,
            "session bound"
        );
        session.bind(binding);
        Ok(())
    }

    /// Clears a session's binding and returns it. `None` if the session
    /// does not exist or was not bound.
    pub fn unbind(&mut self, connection_id: ConnectionId) -> Option<Binding> {
        self.sessions.get_mut(&connection_id)?.unbind()
    }

    /// Queues a frame for a connection. Returns `false` if there is no such
    /// session or its writer has gone away.
    pub fn send(&self, connection_id: ConnectionId, msg: ServerMessage) -> bool {
        match self.sessions.get(&connection_id) {
            Some(session) => session.send(msg),
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use fakeart_protocol::{EventName, RoomCode};
    use tokio::sync::mpsc;

    fn conn(id: u64) -> ConnectionId {
        ConnectionId::new(id)
    }

    fn binding(name: &str) -> Binding {
        Binding {
            room_code: RoomCode::new("ABCD"),
            username: name.into(),
        }
    }

    #[test]
    fn test_register_new_connection_is_unbound() {
        let mut mgr = SessionManager::new();
        let (tx, _rx) = mpsc::unbounded_channel();
        let session = mgr.register(conn(1), tx).expect("should register");
        assert_eq!(session.connection_id(), conn(1));
        assert!(!session.has_user());
        assert_eq!(mgr.len(), 1);
    }

    #[test]
    fn test_register_twice_returns_error() {
        let mut mgr = SessionManager::new();
        mgr.register(conn(1), mpsc::unbounded_channel().0).unwrap();
        let result = mgr.register(conn(1), mpsc::unbounded_channel().0);
        assert!(matches!(result, Err(SessionError::AlreadyRegistered(c)) if c == conn(1)));
    }

    #[test]
    fn test_bind_then_unbind_round_trip() {
        let mut mgr = SessionManager::new();
        mgr.register(conn(1), mpsc::unbounded_channel().0).unwrap();

        mgr.bind(conn(1), binding("ann")).unwrap();
        assert_eq!(mgr.get(conn(1)).unwrap().binding(), Some(&binding("ann")));

        assert_eq!(mgr.unbind(conn(1)), Some(binding("ann")));
        assert!(!mgr.get(conn(1)).unwrap().has_user());
        assert_eq!(mgr.unbind(conn(1)), None);
    }

    #[test]
    fn test_bind_already_bound_returns_error() {
        let mut mgr = SessionManager::new();
        mgr.register(conn(1), mpsc::unbounded_channel().0).unwrap();
        mgr.bind(conn(1), binding("ann")).unwrap();
        let result = mgr.bind(conn(1), binding("bob"));
        assert!(matches!(result, Err(SessionError::AlreadyBound(_))));
    }

    #[test]
    fn test_bind_unknown_connection_returns_not_found() {
        let mut mgr = SessionManager::new();
        let result = mgr.bind(conn(5), binding("ann"));
        assert!(matches!(result, Err(SessionError::NotFound(c)) if c == conn(5)));
    }

    #[test]
    fn test_send_delivers_to_channel() {
        let mut mgr = SessionManager::new();
        let (tx, mut rx) = mpsc::unbounded_channel();
        mgr.register(conn(1), tx).unwrap();

        assert!(mgr.send(conn(1), ServerMessage::ack(EventName::LeaveRoom)));
        assert_eq!(rx.try_recv().unwrap().event, EventName::LeaveRoom);
    }

    #[test]
    fn test_send_to_closed_or_missing_returns_false() {
        let mut mgr = SessionManager::new();
        let (tx, rx) = mpsc::unbounded_channel();
        mgr.register(conn(1), tx).unwrap();
        drop(rx);

        assert!(!mgr.send(conn(1), ServerMessage::ack(EventName::LeaveRoom)));
        assert!(!mgr.send(conn(2), ServerMessage::ack(EventName::LeaveRoom)));
    }

    #[test]
    fn test_unregister_removes_session() {
        let mut mgr = SessionManager::new();
        mgr.register(conn(1), mpsc::unbounded_channel().0).unwrap();
        assert!(mgr.unregister(conn(1)).is_some());
        assert!(mgr.is_empty());
        assert!(mgr.unregister(conn(1)).is_none());
    }
}
