//! The room registry: creates rooms under fresh codes, looks them up, and
//! tears down rooms nobody is connected to anymore.

use std::collections::HashMap;
use std::time::Duration;

use fakeart_game::{GameError, Room, RoomConfig};
use fakeart_protocol::RoomCode;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Settings for the room registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LobbyConfig {
    /// Maximum number of rooms alive at once.
    pub max_rooms: usize,

    /// Letters in a generated room code.
    pub code_len: usize,

    /// How long a room with nobody connected survives before it is removed.
    /// A rejoin within this window keeps the room.
    pub teardown_delay: Duration,
}

impl Default for LobbyConfig {
    fn default() -> Self {
        Self {
            max_rooms: 1000,
            code_len: 4,
            teardown_delay: Duration::from_secs(60),
        }
    }
}

/// A delayed teardown check for one room.
///
/// Each time a room dies it gets a new ticket. Only the check carrying the
/// latest ticket may remove the room, so a timer left over from an earlier
/// death cannot cut short the delay of a later one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Teardown {
    pub code: RoomCode,
    ticket: u64,
}

/// Every live room, keyed by code.
///
/// Owned by the dispatcher; nothing here is global.
#[derive(Debug, Default)]
pub struct Lobby {
    config: LobbyConfig,
    rooms: HashMap<RoomCode, Room>,
    pending_teardowns: Vec<Teardown>,
    tickets: HashMap<RoomCode, u64>,
    next_ticket: u64,
}

impl Lobby {
    pub fn new(config: LobbyConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &LobbyConfig {
        &self.config
    }

    /// Creates an empty room under a new random code.
    ///
    /// # Errors
    /// [`GameError::LobbyFull`] if no more rooms may be created.
    pub fn create<R: Rng + ?Sized>(
        &mut self,
        room_config: RoomConfig,
        rng: &mut R,
    ) -> Result<RoomCode, GameError> {
        if self.is_full() {
            return Err(GameError::LobbyFull);
        }
        let code = loop {
            let candidate = random_code(self.config.code_len, rng);
            if !self.rooms.contains_key(&candidate) {
                break candidate;
            }
        };
        self.rooms
            .insert(code.clone(), Room::new(code.clone(), room_config));
        tracing::info!(room = %code, rooms = self.rooms.len(), "room created");
        Ok(code)
    }

    pub fn get(&self, code: &RoomCode) -> Option<&Room> {
        self.rooms.get(code)
    }

    pub fn get_mut(&mut self, code: &RoomCode) -> Option<&mut Room> {
        self.rooms.get_mut(code)
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    /// Whether `create` would fail. Also true once the code space itself is
    /// exhausted.
    pub fn is_full(&self) -> bool {
        self.rooms.len() >= self.capacity()
    }

    fn capacity(&self) -> usize {
        let code_space = u32::try_from(self.config.code_len)
            .ok()
            .and_then(|len| 26usize.checked_pow(len))
            .unwrap_or(usize::MAX);
        self.config.max_rooms.min(code_space)
    }

    /// Removes a room outright, dropping any teardown ticket it holds.
    pub fn remove(&mut self, code: &RoomCode) -> Option<Room> {
        self.tickets.remove(code);
        let room = self.rooms.remove(code)?;
        tracing::info!(room = %code, rooms = self.rooms.len(), "room torn down");
        Some(room)
    }

    /// Marks a room for a delayed teardown check. Scheduling a room again
    /// replaces its earlier ticket.
    pub fn schedule_teardown(&mut self, code: RoomCode) {
        self.next_ticket += 1;
        let ticket = self.next_ticket;
        tracing::debug!(room = %code, ticket, "teardown scheduled");
        self.tickets.insert(code.clone(), ticket);
        self.pending_teardowns.retain(|pending| pending.code != code);
        self.pending_teardowns.push(Teardown { code, ticket });
    }

    /// Drains the checks scheduled since the last call.
    pub fn take_pending_teardowns(&mut self) -> Vec<Teardown> {
        std::mem::take(&mut self.pending_teardowns)
    }

    /// Removes the room if `teardown` is its latest ticket and the room is
    /// still dead. Returns whether it was removed.
    pub fn teardown_if_dead(&mut self, teardown: &Teardown) -> bool {
        let code = &teardown.code;
        if self.tickets.get(code) != Some(&teardown.ticket) {
            tracing::debug!(room = %code, ticket = teardown.ticket, "teardown superseded");
            return false;
        }
        self.tickets.remove(code);
        match self.rooms.get(code) {
            Some(room) if room.is_dead() => self.remove(code).is_some(),
            Some(_) => {
                tracing::debug!(room = %code, "teardown skipped, room is live again");
                false
            }
            None => false,
        }
    }
}

fn random_code<R: Rng + ?Sized>(len: usize, rng: &mut R) -> RoomCode {
    let code: String = (0..len)
        .map(|_| char::from(rng.random_range(b'A'..=b'Z')))
        .collect();
    RoomCode::new(code)
}
