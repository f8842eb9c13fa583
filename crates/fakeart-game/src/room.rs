//! The room: roster, phase machine, turns and votes for one game.
//!
//! A `Room` is plain data with synchronous methods. It performs no I/O and
//! has no locking of its own; the dispatcher owns every room and runs one
//! event at a time, which keeps read-then-write sequences such as
//! [`Room::record_vote`] atomic.

use fakeart_protocol::{Phase, Point, RoomCode, Stroke};
use fakeart_transport::ConnectionId;
use rand::Rng;
use rand::seq::{IndexedRandom, SliceRandom};

use crate::{GameError, PromptPool, RoomConfig, User};

/// What a single vote submission did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoteOutcome {
    /// `false` if the voter had already voted (or is unknown).
    pub accepted: bool,
    /// Every connected player has voted; the room is in `END`.
    pub round_complete: bool,
    /// This vote is the one that closed voting and moved the room to `END`.
    pub voting_closed: bool,
}

/// One isolated game session.
#[derive(Debug, Clone)]
pub struct Room {
    code: RoomCode,
    config: RoomConfig,
    users: Vec<User>,
    phase: Phase,
    round: u32,
    turn: Option<u32>,
    keyword: Option<String>,
    hint: Option<String>,
    faker: Option<String>,
    strokes: Vec<Stroke>,
}

impl Room {
    pub fn new(code: RoomCode, config: RoomConfig) -> Self {
        Self {
            code,
            config,
            users: Vec::new(),
            phase: Phase::Setup,
            round: 0,
            turn: None,
            keyword: None,
            hint: None,
            faker: None,
            strokes: Vec::new(),
        }
    }

    // -- Accessors --------------------------------------------------------

    pub fn code(&self) -> &RoomCode {
        &self.code
    }

    pub fn config(&self) -> &RoomConfig {
        &self.config
    }

    /// Every user in turn order, spectator included.
    pub fn users(&self) -> &[User] {
        &self.users
    }

    /// Users with the player role, in turn order.
    pub fn players(&self) -> impl Iterator<Item = &User> {
        self.users.iter().filter(|u| u.is_player())
    }

    pub fn player_count(&self) -> usize {
        self.players().count()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    /// The 1-based turn counter. `None` until the first round starts and
    /// after returning to setup.
    pub fn turn(&self) -> Option<u32> {
        self.turn
    }

    pub fn keyword(&self) -> Option<&str> {
        self.keyword.as_deref()
    }

    pub fn hint(&self) -> Option<&str> {
        self.hint.as_deref()
    }

    /// Name of this round's faker.
    pub fn faker(&self) -> Option<&str> {
        self.faker.as_deref()
    }

    pub fn strokes(&self) -> &[Stroke] {
        &self.strokes
    }

    pub fn find_user(&self, name: &str) -> Option<&User> {
        self.users.iter().find(|u| u.name() == name)
    }

    fn find_user_mut(&mut self, name: &str) -> Option<&mut User> {
        self.users.iter_mut().find(|u| u.name() == name)
    }

    pub fn is_full(&self) -> bool {
        self.users.len() >= self.config.max_users
    }

    pub fn is_game_in_progress(&self) -> bool {
        self.phase.is_in_progress()
    }

    /// No one is left who could bring the room back: the roster is empty or
    /// every user is disconnected.
    pub fn is_dead(&self) -> bool {
        self.users.iter().all(|u| !u.is_connected())
    }

    // -- Roster -----------------------------------------------------------

    /// Appends a user. Returns `false` and changes nothing if the room is
    /// full. Phase is not checked here.
    pub fn add_user(&mut self, user: User) -> bool {
        if self.is_full() {
            tracing::warn!(room = %self.code, user = user.name(), "room full, user not added");
            return false;
        }
        self.users.push(user);
        true
    }

    /// Reattaches a connection to an existing roster entry, keeping its
    /// slot and votes.
    ///
    /// # Errors
    /// [`GameError::RejoinTargetMissing`] if no user has this name.
    pub fn readd_user(&mut self, name: &str, connection: ConnectionId) -> Result<(), GameError> {
        let user = self
            .find_user_mut(name)
            .ok_or_else(|| GameError::RejoinTargetMissing(name.to_owned()))?;
        user.connect(connection);
        Ok(())
    }

    /// Removes a user entirely and returns the remaining roster size.
    pub fn drop_user(&mut self, name: &str) -> usize {
        self.users.retain(|u| u.name() != name);
        self.users.len()
    }

    /// Marks a user as disconnected, keeping the roster entry.
    pub fn disconnect_user(&mut self, name: &str) {
        if let Some(user) = self.find_user_mut(name) {
            user.disconnect();
        }
    }

    // -- Phase transitions ------------------------------------------------

    /// Starts the next round: clears votes and strokes, reshuffles turn
    /// order, picks a prompt and a faker, and enters `PLAY` on turn 1.
    ///
    /// # Errors
    /// [`GameError::NotEnoughPlayers`] (nothing changes) if fewer than
    /// `min_players` players are in the room.
    pub fn start_new_round<R: Rng + ?Sized>(
        &mut self,
        prompts: &PromptPool,
        rng: &mut R,
    ) -> Result<(), GameError> {
        let players = self.player_count();
        let needed = self.config.min_players.max(1);
        if players < needed {
            return Err(GameError::NotEnoughPlayers {
                room: self.code.clone(),
                players,
                needed,
            });
        }

        self.round += 1;
        self.users.iter_mut().for_each(User::reset_votes);
        self.users.shuffle(rng);
        self.phase = Phase::Play;
        self.turn = Some(1);

        let prompt = prompts.pick(rng);
        self.keyword = Some(prompt.keyword.clone());
        self.hint = Some(prompt.hint.clone());

        let faker = {
            let players: Vec<&User> = self.players().collect();
            players.choose(rng).map(|u| u.name().to_owned())
        };
        self.faker = faker;
        self.strokes.clear();

        tracing::info!(room = %self.code, round = self.round, "new round");
        Ok(())
    }

    /// Returns to `SETUP`, forgetting the round's secrets and every user who
    /// is not connected.
    pub fn invoke_setup(&mut self) {
        tracing::info!(room = %self.code, "return to setup");
        self.phase = Phase::Setup;
        self.turn = None;
        self.keyword = None;
        self.hint = None;
        self.faker = None;
        self.users.retain(User::is_connected);
    }

    // -- Turns ------------------------------------------------------------

    /// The player expected to draw next. Only defined in `PLAY`.
    ///
    /// Wraps modulo the current player count, so with N players each one
    /// comes up `turns_per_player` times before voting opens. Disconnected
    /// players are not skipped.
    pub fn whose_turn(&self) -> Option<&User> {
        if self.phase != Phase::Play {
            return None;
        }
        let turn = self.turn?;
        let count = self.player_count();
        if count == 0 {
            return None;
        }
        let idx = (turn.saturating_sub(1) as usize) % count;
        self.players().nth(idx)
    }

    /// Appends a stroke. The caller checks that it is `author`'s turn.
    pub fn add_stroke(&mut self, author: impl Into<String>, points: Vec<Point>) -> &[Stroke] {
        self.strokes.push(Stroke {
            author: author.into(),
            points,
        });
        &self.strokes
    }

    /// Advances the turn counter and opens voting once every player has had
    /// `turns_per_player` turns. Returns the new turn, or `None` (and does
    /// nothing) outside of a round.
    pub fn next_turn(&mut self) -> Option<u32> {
        if !self.is_game_in_progress() {
            return None;
        }
        let turn = self.turn.unwrap_or(0) + 1;
        self.turn = Some(turn);

        let total = self.config.turns_per_player as usize * self.player_count();
        if (turn - 1) as usize >= total {
            self.phase = Phase::Vote;
        }
        Some(turn)
    }

    // -- Votes ------------------------------------------------------------

    /// Records `voter`'s vote for `target`.
    ///
    /// Returns `false` if the voter already voted this round or is not in
    /// the room. Any target name is accepted; only a target that exists gets
    /// its count bumped.
    pub fn add_vote(&mut self, voter: &str, target: &str) -> bool {
        match self.find_user_mut(voter) {
            Some(user) if !user.is_voted => user.is_voted = true,
            _ => return false,
        }
        if let Some(target) = self.find_user_mut(target) {
            target.votes += 1;
        }
        true
    }

    /// Whether every connected player has voted.
    pub fn is_everyone_voted(&self) -> bool {
        self.players()
            .filter(|u| u.is_connected())
            .all(|u| u.is_voted)
    }

    /// Adds a vote, then ends the round if that completed voting.
    pub fn record_vote(&mut self, voter: &str, target: &str) -> VoteOutcome {
        let accepted = self.add_vote(voter, target);
        let round_complete = self.is_everyone_voted();
        let voting_closed = round_complete && self.phase != Phase::End;
        if voting_closed {
            self.phase = Phase::End;
            tracing::info!(room = %self.code, round = self.round, "everyone voted");
        }
        VoteOutcome {
            accepted,
            round_complete,
            voting_closed,
        }
    }
}

// =========================================================================
// Tests
// =========================================================================
