//! Wire protocol for the fake artist server.
//!
//! - **Types** ([`Inbound`], [`ClientEvent`], [`ServerMessage`],
//!   [`RoomView`], ...): the frames that travel on the wire, and the game
//!   vocabulary they share with the game crate ([`Phase`], [`Stroke`]).
//! - **Codec** ([`Codec`], [`JsonCodec`]): how frames become bytes.
//! - **Errors** ([`ProtocolError`]): what can go wrong while decoding or
//!   validating a frame.
//!
//! ```text
//! Transport (bytes) → Protocol (Inbound → ClientEvent) → Dispatcher
//! ```

mod codec;
mod error;
mod types;

pub use codec::{Codec, JsonCodec};
pub use error::ProtocolError;
pub use types::{
    ClientEvent, EventName, Inbound, MAX_USERNAME_LEN, Phase, Point, Reply, ReplyBody, RoomCode,
    RoomView, ServerMessage, Stroke, UserView, validate_username,
};
