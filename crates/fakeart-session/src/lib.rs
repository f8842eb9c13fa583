//! Connection sessions for the fake artist server.
//!
//! A [`Session`] exists for every live connection. Once the client creates
//! or joins a room, the session is *bound* to a user in that room
//! ([`Binding`]); logging out unbinds it again. Outbound frames for a
//! connection are queued on the session's channel and written to the socket
//! by the connection's own writer task.
//!
//! ```text
//! Dispatcher (above)  ← asks "who is this connection?" and queues replies
//!     ↕
//! Session Layer (this crate)
//!     ↕
//! Transport (below)  ← provides ConnectionId
//! ```

mod error;
mod manager;
mod session;

pub use error::SessionError;
pub use manager::SessionManager;
pub use session::{Binding, OutboundSender, Session};
