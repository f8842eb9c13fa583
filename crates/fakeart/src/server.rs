//! `FakeArtServer` builder and server loop.
//!
//! This is the entry point for running a fake artist game server. It ties
//! together all the layers: transport → protocol → session → game.

use std::sync::Arc;

use fakeart_game::{PromptPool, RoomConfig};
use fakeart_protocol::JsonCodec;
use fakeart_transport::{Transport, WebSocketTransport};
use tokio::sync::Mutex;

use crate::handler::handle_connection;
use crate::{Dispatcher, FakeArtError, LobbyConfig};

/// Shared server state passed to each connection handler task.
pub(crate) struct ServerState {
    pub(crate) dispatcher: Mutex<Dispatcher>,
    pub(crate) codec: JsonCodec,
}

/// Builder for configuring and starting a fake artist server.
///
/// # Example
///
/// ```rust,no_run
/// use fakeart::prelude::*;
///
/// # async fn run() -> Result<(), FakeArtError> {
/// let server = FakeArtServer::builder()
///     .bind("0.0.0.0:8080")
///     .lobby_config(LobbyConfig { max_rooms: 50, ..LobbyConfig::default() })
///     .build()
///     .await?;
/// server.run().await
/// # }
/// ```
pub struct FakeArtServerBuilder {
    bind_addr: String,
    room_config: RoomConfig,
    lobby_config: LobbyConfig,
    prompts: PromptPool,
}

impl FakeArtServerBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            bind_addr: "127.0.0.1:8080".to_string(),
            room_config: RoomConfig::default(),
            lobby_config: LobbyConfig::default(),
            prompts: PromptPool::builtin(),
        }
    }

    /// Sets the address to bind the server to.
    pub fn bind(mut self, addr: &str) -> Self {
        self.bind_addr = addr.to_string();
        self
    }

    pub fn room_config(mut self, config: RoomConfig) -> Self {
        self.room_config = config;
        self
    }

    pub fn lobby_config(mut self, config: LobbyConfig) -> Self {
        self.lobby_config = config;
        self
    }

    /// Replaces the built-in prompts.
    pub fn prompts(mut self, prompts: PromptPool) -> Self {
        self.prompts = prompts;
        self
    }

    /// Binds the listener. The server does not accept connections until
    /// [`FakeArtServer::run`] is called.
    pub async fn build(self) -> Result<FakeArtServer, FakeArtError> {
        let transport = WebSocketTransport::bind(&self.bind_addr).await?;

        let state = Arc::new(ServerState {
            dispatcher: Mutex::new(Dispatcher::new(
                self.room_config,
                self.lobby_config,
                self.prompts,
            )),
            codec: JsonCodec,
        });

        Ok(FakeArtServer { transport, state })
    }
}

impl Default for FakeArtServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A bound fake artist server.
///
/// Call [`run()`](Self::run) to start accepting connections.
pub struct FakeArtServer {
    transport: WebSocketTransport,
    state: Arc<ServerState>,
}

impl FakeArtServer {
    /// Creates a new builder.
    pub fn builder() -> FakeArtServerBuilder {
        FakeArtServerBuilder::new()
    }

    /// Returns the local address the server is bound to.
    pub fn local_addr(&self) -> std::io::Result<std::net::SocketAddr> {
        self.transport.local_addr()
    }

    /// Runs the server accept loop.
    ///
    /// Spawns a handler task for each accepted connection. Runs until the
    /// process is terminated.
    pub async fn run(mut self) -> Result<(), FakeArtError> {
        tracing::info!(addr = ?self.local_addr().ok(), "fakeart server running");

        loop {
            match self.transport.accept().await {
                Ok(conn) => {
                    let state = Arc::clone(&self.state);
                    tokio::spawn(async move {
                        if let Err(e) = handle_connection(conn, state).await {
                            tracing::debug!(error = %e, "connection ended with error");
                        }
                    });
                }
                Err(e) => {
                    tracing::error!(error = %e, "accept failed");
                }
            }
        }
    }
}
