//! Wire types: everything that travels between a client and the server.
//!
//! Every frame in either direction has the same outer shape:
//!
//! ```text
//! { "event": "JOIN_ROOM", "data": { ... } }
//! ```
//!
//! Inbound frames are first read into an [`Inbound`] (event name plus raw
//! JSON payload) and then checked into a typed [`ClientEvent`]. Keeping the
//! two steps apart means that a frame with a known event name but a broken
//! payload can still be answered on the same event name.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ProtocolError;

/// Longest username a client may pick, in characters.
pub const MAX_USERNAME_LEN: usize = 15;

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// The short code players type to join a room, e.g. `"QXZT"`.
///
/// Codes are stored upper-case so lookups ignore the case the player typed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomCode(String);

impl RoomCode {
    /// Creates a room code, normalizing it to upper case.
    pub fn new(code: impl AsRef<str>) -> Self {
        Self(code.as_ref().trim().to_ascii_uppercase())
    }

    /// Returns the code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// Game vocabulary
// ---------------------------------------------------------------------------

/// The phase a room is in. Governs which actions are valid.
///
/// ```text
/// SETUP → PLAY → VOTE → END → PLAY (next round)
///   ↑______________________|  (return to setup, from any phase)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Phase {
    /// Lobby: players gather, nothing secret exists yet.
    #[default]
    Setup,
    /// Players take turns drawing.
    Play,
    /// Every player has had their turns; votes are being cast.
    Vote,
    /// Every connected player has voted.
    End,
}

impl Phase {
    /// Returns `true` once a round has started and until the room returns
    /// to setup.
    pub fn is_in_progress(self) -> bool {
        matches!(self, Self::Play | Self::Vote | Self::End)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Setup => "SETUP",
            Self::Play => "PLAY",
            Self::Vote => "VOTE",
            Self::End => "END",
        };
        f.write_str(name)
    }
}

/// A canvas coordinate, sent as a two-element array `[x, y]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point(pub f64, pub f64);

/// One contiguous drawing gesture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    /// Username of the player who drew it.
    pub author: String,
    /// The gesture, in drawing order.
    pub points: Vec<Point>,
}

// ---------------------------------------------------------------------------
// Event names
// ---------------------------------------------------------------------------

/// Every event name used on the wire, in both directions.
///
/// The first eight are sent by clients. `USER_LEFT`, `NEW_TURN` and
/// `EVERYONE_VOTED` are only ever sent by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventName {
    CreateRoom,
    JoinRoom,
    LeaveRoom,
    StartGame,
    NextRound,
    SubmitStroke,
    SubmitVote,
    ReturnToSetup,
    UserLeft,
    NewTurn,
    EveryoneVoted,
}

impl EventName {
    /// Returns the wire spelling, e.g. `"JOIN_ROOM"`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::CreateRoom => "CREATE_ROOM",
            Self::JoinRoom => "JOIN_ROOM",
            Self::LeaveRoom => "LEAVE_ROOM",
            Self::StartGame => "START_GAME",
            Self::NextRound => "NEXT_ROUND",
            Self::SubmitStroke => "SUBMIT_STROKE",
            Self::SubmitVote => "SUBMIT_VOTE",
            Self::ReturnToSetup => "RETURN_TO_SETUP",
            Self::UserLeft => "USER_LEFT",
            Self::NewTurn => "NEW_TURN",
            Self::EveryoneVoted => "EVERYONE_VOTED",
        }
    }
}

impl fmt::Display for EventName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Inbound
// ---------------------------------------------------------------------------

/// A decoded inbound frame whose payload has not been checked yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Inbound {
    pub event: EventName,
    /// Missing for events without payload.
    #[serde(default)]
    pub data: serde_json::Value,
}

/// A client request with a payload that passed shape validation.
#[derive(Debug, Clone, PartialEq)]
pub enum ClientEvent {
    CreateRoom { username: String },
    JoinRoom { room_code: RoomCode, username: String },
    LeaveRoom,
    StartGame,
    NextRound,
    SubmitStroke { points: Vec<Point> },
    /// `username` is the player being voted for.
    SubmitVote { username: String },
    ReturnToSetup,
}

#[derive(Deserialize)]
struct UsernameData {
    username: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct JoinRoomData {
    room_code: String,
    username: String,
}

#[derive(Deserialize)]
struct StrokeData {
    points: Vec<Point>,
}

impl ClientEvent {
    /// Checks an inbound frame's payload against its event's shape.
    ///
    /// Usernames are trimmed and validated with [`validate_username`].
    ///
    /// # Errors
    /// - [`ProtocolError::Decode`] if a required field is missing or has the
    ///   wrong type.
    /// - [`ProtocolError::InvalidMessage`] if a field breaks a rule, or the
    ///   event is one only the server may send.
    pub fn from_inbound(inbound: Inbound) -> Result<Self, ProtocolError> {
        let Inbound { event, data } = inbound;
        let event = match event {
            EventName::CreateRoom => {
                let d: UsernameData = parse(data)?;
                Self::CreateRoom {
                    username: validate_username(&d.username)?,
                }
            }
            EventName::JoinRoom => {
                let d: JoinRoomData = parse(data)?;
                Self::JoinRoom {
                    room_code: RoomCode::new(d.room_code),
                    username: validate_username(&d.username)?,
                }
            }
            EventName::LeaveRoom => Self::LeaveRoom,
            EventName::StartGame => Self::StartGame,
            EventName::NextRound => Self::NextRound,
            EventName::SubmitStroke => {
                let d: StrokeData = parse(data)?;
                Self::SubmitStroke { points: d.points }
            }
            EventName::SubmitVote => {
                let d: UsernameData = parse(data)?;
                Self::SubmitVote { username: d.username }
            }
            EventName::ReturnToSetup => Self::ReturnToSetup,
            EventName::UserLeft | EventName::NewTurn | EventName::EveryoneVoted => {
                return Err(ProtocolError::InvalidMessage(format!(
                    "{event} is sent by the server only"
                )));
            }
        };
        Ok(event)
    }

    /// The event name this request arrived on. Replies use the same name.
    pub fn name(&self) -> EventName {
        match self {
            Self::CreateRoom { .. } => EventName::CreateRoom,
            Self::JoinRoom { .. } => EventName::JoinRoom,
            Self::LeaveRoom => EventName::LeaveRoom,
            Self::StartGame => EventName::StartGame,
            Self::NextRound => EventName::NextRound,
            Self::SubmitStroke { .. } => EventName::SubmitStroke,
            Self::SubmitVote { .. } => EventName::SubmitVote,
            Self::ReturnToSetup => EventName::ReturnToSetup,
        }
    }
}

fn parse<T: serde::de::DeserializeOwned>(data: serde_json::Value) -> Result<T, ProtocolError> {
    serde_json::from_value(data).map_err(ProtocolError::Decode)
}

/// Trims a username and checks it is 1–15 ASCII letters, digits or spaces.
///
/// Returns the trimmed name.
pub fn validate_username(raw: &str) -> Result<String, ProtocolError> {
    let name = raw.trim();
    let len = name.chars().count();
    if len == 0 || len > MAX_USERNAME_LEN {
        return Err(ProtocolError::InvalidMessage(format!(
            "username must be 1-{MAX_USERNAME_LEN} characters long"
        )));
    }
    if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == ' ') {
        return Err(ProtocolError::InvalidMessage(
            "username can only contain alphanumerics and spaces".into(),
        ));
    }
    Ok(name.to_owned())
}

// ---------------------------------------------------------------------------
// Outbound
// ---------------------------------------------------------------------------

/// One user as shown to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    pub name: String,
    pub connected: bool,
    pub is_voted: bool,
    pub votes: u32,
}

/// A snapshot of a room as one recipient is allowed to see it.
///
/// Optional fields serialize as `null` rather than being left out, so every
/// snapshot has the same set of keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomView {
    pub room_code: RoomCode,
    pub users: Vec<UserView>,
    pub users_without_admin: Vec<UserView>,
    pub round: u32,
    pub phase: Phase,
    /// `-1` outside of a round.
    pub turn: i64,
    pub whose_turn: Option<String>,
    pub keyword: Option<String>,
    pub hint: Option<String>,
    pub faker_name: Option<String>,
    pub strokes: Vec<Stroke>,
}

/// The success payload of an outbound frame. Absent fields are omitted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplyBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room_state: Option<RoomView>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rejoin: Option<bool>,
}

/// The payload of an outbound frame: `{ "err": ... }` or a [`ReplyBody`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Reply {
    Failure { err: String },
    Success(ReplyBody),
}

/// A frame sent from the server to one client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerMessage {
    pub event: EventName,
    pub data: Reply,
}

impl ServerMessage {
    /// An error reply carrying a client-safe message.
    pub fn error(event: EventName, err: impl Into<String>) -> Self {
        Self {
            event,
            data: Reply::Failure { err: err.into() },
        }
    }

    /// An empty success reply, `{}`.
    pub fn ack(event: EventName) -> Self {
        Self {
            event,
            data: Reply::Success(ReplyBody::default()),
        }
    }

    /// A success reply carrying a room snapshot.
    pub fn room_state(event: EventName, view: RoomView) -> Self {
        Self {
            event,
            data: Reply::Success(ReplyBody {
                room_state: Some(view),
                ..ReplyBody::default()
            }),
        }
    }

    /// Attaches a username to a success reply. No-op on errors.
    pub fn with_username(mut self, name: impl Into<String>) -> Self {
        if let Reply::Success(body) = &mut self.data {
            body.username = Some(name.into());
        }
        self
    }

    /// Attaches the rejoin flag to a success reply. No-op on errors.
    pub fn with_rejoin(mut self, rejoin: bool) -> Self {
        if let Reply::Success(body) = &mut self.data {
            body.rejoin = Some(rejoin);
        }
        self
    }

    /// Returns the error message if this is an error reply.
    pub fn err(&self) -> Option<&str> {
        match &self.data {
            Reply::Failure { err } => Some(err),
            Reply::Success(_) => None,
        }
    }

    /// Returns the success body if this is not an error reply.
    pub fn body(&self) -> Option<&ReplyBody> {
        match &self.data {
            Reply::Success(body) => Some(body),
            Reply::Failure { .. } => None,
        }
    }
}

// =========================================================================
// Tests
// =========================================================================
