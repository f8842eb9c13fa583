//! Game rules for the fake artist server.
//!
//! One [`Room`] is one game: a roster of [`User`]s, a phase machine
//! (`SETUP → PLAY → VOTE → END`), the turn counter, the round's secret
//! prompt and faker, and the strokes drawn so far. [`view`] turns a room
//! into the snapshot each recipient is allowed to see.
//!
//! # Key types
//!
//! - [`Room`]: the state machine
//! - [`User`] / [`Role`]: roster entries; spectators never play
//! - [`Projections`]: per-recipient snapshots for a broadcast
//! - [`PromptPool`]: where keywords come from
//! - [`GameError`]: expected, client-facing failures

mod config;
mod error;
mod prompt;
mod room;
mod user;
pub mod view;

pub use config::RoomConfig;
pub use error::GameError;
pub use prompt::{Prompt, PromptError, PromptPool};
pub use room::{Room, VoteOutcome};
pub use user::{Role, User};
pub use view::Projections;
