//! # fakeart
//!
//! Authoritative server for a real-time "fake artist" party drawing game.
//!
//! Players gather in a room under a short code. Each round everyone but one
//! secret *faker* learns a keyword; players take turns adding one stroke to
//! a shared drawing, then vote on who the faker was. The server owns all of
//! the game state and sends each player only what their role may see.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use fakeart::prelude::*;
//!
//! # async fn run() -> Result<(), FakeArtError> {
//! let server = FakeArtServer::builder()
//!     .bind("0.0.0.0:8080")
//!     .build()
//!     .await?;
//! server.run().await
//! # }
//! ```

mod dispatch;
mod error;
mod handler;
mod lobby;
pub mod precond;
mod server;

pub use dispatch::Dispatcher;
pub use error::FakeArtError;
pub use lobby::{Lobby, LobbyConfig, Teardown};
pub use server::{FakeArtServer, FakeArtServerBuilder};

/// Re-exports for building and embedding a server.
pub mod prelude {
    pub use crate::{Dispatcher, FakeArtError, FakeArtServer, FakeArtServerBuilder, LobbyConfig};
    pub use fakeart_game::{GameError, Prompt, PromptPool, RoomConfig};
    pub use fakeart_protocol::{ClientEvent, EventName, Inbound, Phase, RoomCode, ServerMessage};
}
