//! Request dispatch: one handler per client event.
//!
//! The dispatcher owns every piece of mutable server state (the lobby, the
//! sessions, the prompt pool and the RNG). The server keeps it behind a
//! single mutex, so a handler runs to completion before the next event is
//! looked at. Handlers never touch the network: replies and broadcasts are
//! queued on the recipients' session channels.
//!
//! Every handler checks its preconditions first and mutates second, so a
//! failed request leaves no trace.

use std::time::Duration;

use fakeart_game::{GameError, Projections, PromptPool, Room, RoomConfig, User};
use fakeart_protocol::{ClientEvent, EventName, Inbound, Point, RoomCode, RoomView, ServerMessage};
use fakeart_session::{Binding, OutboundSender, SessionManager};
use fakeart_transport::ConnectionId;
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::{FakeArtError, Lobby, LobbyConfig, Teardown, precond};

/// Routes client events to the game and fans the results out.
#[derive(Debug)]
pub struct Dispatcher {
    lobby: Lobby,
    sessions: SessionManager,
    prompts: PromptPool,
    room_config: RoomConfig,
    rng: StdRng,
}

impl Dispatcher {
    pub fn new(room_config: RoomConfig, lobby_config: LobbyConfig, prompts: PromptPool) -> Self {
        Self::with_rng(room_config, lobby_config, prompts, StdRng::from_os_rng())
    }

    /// Like [`new`](Self::new) with a caller-supplied RNG, for reproducible
    /// room codes, turn orders and fakers.
    pub fn with_rng(
        room_config: RoomConfig,
        lobby_config: LobbyConfig,
        prompts: PromptPool,
        rng: StdRng,
    ) -> Self {
        Self {
            lobby: Lobby::new(lobby_config),
            sessions: SessionManager::new(),
            prompts,
            room_config,
            rng,
        }
    }

    pub fn lobby(&self) -> &Lobby {
        &self.lobby
    }

    pub fn sessions(&self) -> &SessionManager {
        &self.sessions
    }

    /// Registers a freshly accepted connection.
    pub fn connect(
        &mut self,
        conn: ConnectionId,
        outbound: OutboundSender,
    ) -> Result<(), FakeArtError> {
        self.sessions.register(conn, outbound)?;
        Ok(())
    }

    /// Handles one inbound frame.
    ///
    /// Domain failures are answered with `{ "err": ... }` on the request's
    /// event name and return `Ok`. Anything else is returned as an error
    /// and should end the connection.
    pub fn handle(&mut self, conn: ConnectionId, inbound: Inbound) -> Result<(), FakeArtError> {
        let event = inbound.event;
        let result = ClientEvent::from_inbound(inbound)
            .map_err(|e| FakeArtError::Game(e.into()))
            .and_then(|request| self.dispatch(conn, request));

        match result {
            Err(FakeArtError::Game(err)) => {
                tracing::debug!(%conn, %event, error = %err, "request rejected");
                self.sessions
                    .send(conn, ServerMessage::error(event, err.client_message()));
                Ok(())
            }
            other => other,
        }
    }

    /// Runs the disconnect path for a connection that went away: logs its
    /// user out, tells the rest of the room and forgets the session.
    pub fn disconnect(&mut self, conn: ConnectionId) -> Result<(), FakeArtError> {
        if let Some(binding) = self.logout(conn) {
            tracing::info!(
                %conn,
                room = %binding.room_code,
                user = %binding.username,
                "user disconnected"
            );
            self.broadcast_user_left(&binding);
        }
        self.sessions.unregister(conn);
        Ok(())
    }

    /// Rooms whose last connected user just left. The caller should check
    /// them again after [`teardown_delay`](Self::teardown_delay).
    pub fn take_pending_teardowns(&mut self) -> Vec<Teardown> {
        self.lobby.take_pending_teardowns()
    }

    pub fn teardown_delay(&self) -> Duration {
        self.lobby.config().teardown_delay
    }

    pub fn teardown_if_dead(&mut self, teardown: &Teardown) -> bool {
        self.lobby.teardown_if_dead(teardown)
    }

    fn dispatch(&mut self, conn: ConnectionId, request: ClientEvent) -> Result<(), FakeArtError> {
        tracing::debug!(%conn, event = %request.name(), "dispatching");
        match request {
            ClientEvent::CreateRoom { username } => self.create_room(conn, username),
            ClientEvent::JoinRoom {
                room_code,
                username,
            } => self.join_room(conn, room_code, username),
            ClientEvent::LeaveRoom => self.leave_room(conn),
            ClientEvent::StartGame | ClientEvent::NextRound => self.start_game(conn),
            ClientEvent::SubmitStroke { points } => self.submit_stroke(conn, points),
            ClientEvent::SubmitVote { username } => self.submit_vote(conn, username),
            ClientEvent::ReturnToSetup => self.return_to_setup(conn),
        }
    }

    // -- Handlers ---------------------------------------------------------

    fn create_room(&mut self, conn: ConnectionId, username: String) -> Result<(), FakeArtError> {
        precond::session_does_not_have_user(self.sessions.require(conn)?)?;
        precond::lobby_is_not_full(&self.lobby)?;

        let code = self.lobby.create(self.room_config.clone(), &mut self.rng)?;
        let room = precond::room_exists(&mut self.lobby, &code)?;
        let role = room.config().role_for(&username);
        if !room.add_user(User::new(username.clone(), role, conn)) {
            self.lobby.remove(&code);
            return Err(GameError::RoomFull(code).into());
        }
        self.sessions.bind(
            conn,
            Binding {
                room_code: code.clone(),
                username: username.clone(),
            },
        )?;
        tracing::info!(%conn, room = %code, user = %username, "room created by user");

        let view = Projections::of(room).for_user(&username).clone();
        self.sessions.send(
            conn,
            ServerMessage::room_state(EventName::CreateRoom, view).with_username(username),
        );
        Ok(())
    }

    fn join_room(
        &mut self,
        conn: ConnectionId,
        code: RoomCode,
        username: String,
    ) -> Result<(), FakeArtError> {
        let room = precond::room_exists(&mut self.lobby, &code)?;
        precond::session_does_not_have_user(self.sessions.require(conn)?)?;

        let rejoin = room
            .find_user(&username)
            .is_some_and(|user| !user.is_connected());
        if rejoin {
            precond::name_is_taken_in_room(room, &username)?;
            precond::game_in_progress(room)?;
            room.readd_user(&username, conn)?;
        } else {
            precond::room_is_not_full(room)?;
            precond::name_is_not_taken_in_room(room, &username)?;
            precond::game_not_in_progress(room)?;
            let role = room.config().role_for(&username);
            if !room.add_user(User::new(username.clone(), role, conn)) {
                return Err(GameError::RoomFull(code).into());
            }
        }
        self.sessions.bind(
            conn,
            Binding {
                room_code: room.code().clone(),
                username: username.clone(),
            },
        )?;
        tracing::info!(%conn, room = %room.code(), user = %username, rejoin, "user joined");

        broadcast(&self.sessions, room, |view| {
            ServerMessage::room_state(EventName::JoinRoom, view)
                .with_username(username.clone())
                .with_rejoin(rejoin)
        });
        Ok(())
    }

    fn leave_room(&mut self, conn: ConnectionId) -> Result<(), FakeArtError> {
        let binding = precond::session_has_user(self.sessions.require(conn)?)?;
        precond::user_is_in_a_room(&mut self.lobby, &binding)?;

        self.logout(conn);
        tracing::info!(%conn, room = %binding.room_code, user = %binding.username, "user left");
        self.sessions
            .send(conn, ServerMessage::ack(EventName::LeaveRoom));
        self.broadcast_user_left(&binding);
        Ok(())
    }

    /// `START_GAME` and `NEXT_ROUND` both start a fresh round and announce
    /// it as `START_GAME`.
    fn start_game(&mut self, conn: ConnectionId) -> Result<(), FakeArtError> {
        let binding = precond::session_has_user(self.sessions.require(conn)?)?;
        let room = precond::user_is_in_a_room(&mut self.lobby, &binding)?;

        room.start_new_round(&self.prompts, &mut self.rng)?;
        broadcast(&self.sessions, room, |view| {
            ServerMessage::room_state(EventName::StartGame, view)
        });
        Ok(())
    }

    fn submit_stroke(&mut self, conn: ConnectionId, points: Vec<Point>) -> Result<(), FakeArtError> {
        let binding = precond::session_has_user(self.sessions.require(conn)?)?;
        let room = precond::user_is_in_a_room(&mut self.lobby, &binding)?;
        precond::game_in_progress(room)?;
        precond::is_users_turn(room, &binding.username)?;

        room.add_stroke(binding.username.as_str(), points);
        let turn = room.next_turn();
        tracing::debug!(room = %room.code(), user = %binding.username, ?turn, phase = %room.phase(), "stroke added");
        broadcast(&self.sessions, room, |view| {
            ServerMessage::room_state(EventName::NewTurn, view)
        });
        Ok(())
    }

    fn submit_vote(&mut self, conn: ConnectionId, target: String) -> Result<(), FakeArtError> {
        let binding = precond::session_has_user(self.sessions.require(conn)?)?;
        let room = precond::user_is_in_a_room(&mut self.lobby, &binding)?;
        precond::game_in_progress(room)?;

        let outcome = room.record_vote(&binding.username, &target);
        if !outcome.accepted {
            tracing::debug!(room = %room.code(), user = %binding.username, "duplicate vote ignored");
        }
        if outcome.voting_closed {
            broadcast(&self.sessions, room, |view| {
                ServerMessage::room_state(EventName::EveryoneVoted, view)
            });
        }
        Ok(())
    }

    fn return_to_setup(&mut self, conn: ConnectionId) -> Result<(), FakeArtError> {
        let binding = precond::session_has_user(self.sessions.require(conn)?)?;
        let room = precond::user_is_in_a_room(&mut self.lobby, &binding)?;

        room.invoke_setup();
        broadcast(&self.sessions, room, |view| {
            ServerMessage::room_state(EventName::ReturnToSetup, view)
        });
        Ok(())
    }

    // -- Shared paths -----------------------------------------------------

    /// Unbinds the connection and takes its user out of the room: removed
    /// outright during setup, otherwise kept as disconnected so they can
    /// rejoin. Returns the binding that was cleared, if any.
    fn logout(&mut self, conn: ConnectionId) -> Option<Binding> {
        let binding = self.sessions.unbind(conn)?;
        if let Some(room) = self.lobby.get_mut(&binding.room_code) {
            if room.phase().is_in_progress() {
                room.disconnect_user(&binding.username);
            } else {
                room.drop_user(&binding.username);
            }
            if room.is_dead() {
                self.lobby.schedule_teardown(binding.room_code.clone());
            }
        }
        Some(binding)
    }

    fn broadcast_user_left(&self, binding: &Binding) {
        if let Some(room) = self.lobby.get(&binding.room_code) {
            broadcast(&self.sessions, room, |view| {
                ServerMessage::room_state(EventName::UserLeft, view)
                    .with_username(binding.username.clone())
            });
        }
    }
}

/// Sends every connected user in the room the message built from their own
/// projection of it.
fn broadcast(sessions: &SessionManager, room: &Room, message: impl Fn(RoomView) -> ServerMessage) {
    let projections = Projections::of(room);
    for (conn, view) in projections.recipients(room) {
        if !sessions.send(conn, message(view.clone())) {
            tracing::debug!(%conn, room = %room.code(), "recipient gone, message dropped");
        }
    }
}
