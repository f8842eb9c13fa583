//! Per-connection handler: session setup, the writer task, and the read
//! loop.
//!
//! Each accepted connection gets its own Tokio task running this handler.
//! The flow is:
//!   1. Register a session whose outbound channel feeds a writer task
//!   2. Loop: receive frame → decode → dispatch under the server lock
//!   3. On exit, the session guard runs the disconnect path

use std::sync::Arc;

use fakeart_protocol::{Codec, Inbound, ServerMessage};
use fakeart_transport::{Connection, ConnectionId, WebSocketConnection};
use tokio::sync::mpsc;

use crate::server::ServerState;
use crate::{Dispatcher, FakeArtError, Teardown};

/// Drop guard that runs the disconnect path when the handler exits.
///
/// This ensures cleanup happens even if the handler panics. Since `Drop`
/// is synchronous, we spawn a fire-and-forget task for the async lock.
struct SessionGuard {
    conn_id: ConnectionId,
    state: Arc<ServerState>,
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        let conn_id = self.conn_id;
        let state = Arc::clone(&self.state);
        tokio::spawn(async move {
            let mut dispatcher = state.dispatcher.lock().await;
            if let Err(e) = dispatcher.disconnect(conn_id) {
                tracing::error!(%conn_id, error = %e, "disconnect failed");
            }
            reap(&state, &mut dispatcher);
        });
    }
}

/// Handles a single connection from accept to close.
pub(crate) async fn handle_connection(
    conn: WebSocketConnection,
    state: Arc<ServerState>,
) -> Result<(), FakeArtError> {
    let conn_id = conn.id();
    let conn = Arc::new(conn);
    tracing::debug!(%conn_id, "handling new connection");

    let (tx, rx) = mpsc::unbounded_channel();
    state.dispatcher.lock().await.connect(conn_id, tx)?;
    let _guard = SessionGuard {
        conn_id,
        state: Arc::clone(&state),
    };

    // The writer ends once the session, and with it the sender, is gone.
    tokio::spawn(write_outbound(Arc::clone(&conn), Arc::clone(&state), rx));

    loop {
        let data = match conn.recv().await {
            Ok(Some(data)) => data,
            Ok(None) => {
                tracing::info!(%conn_id, "connection closed cleanly");
                break;
            }
            Err(e) => {
                tracing::debug!(%conn_id, error = %e, "recv error");
                break;
            }
        };

        let inbound: Inbound = match state.codec.decode(&data) {
            Ok(inbound) => inbound,
            Err(e) => {
                tracing::debug!(%conn_id, error = %e, "failed to decode frame");
                continue;
            }
        };

        let result = {
            let mut dispatcher = state.dispatcher.lock().await;
            let result = dispatcher.handle(conn_id, inbound);
            reap(&state, &mut dispatcher);
            result
        };
        if let Err(e) = result {
            tracing::error!(%conn_id, error = %e, "dispatch failed, closing connection");
            let _ = conn.close().await;
            return Err(e);
        }
    }

    // _guard drops here → disconnect path runs.
    Ok(())
}

/// Drains the connection's outbound queue onto the socket.
async fn write_outbound(
    conn: Arc<WebSocketConnection>,
    state: Arc<ServerState>,
    mut rx: mpsc::UnboundedReceiver<ServerMessage>,
) {
    let conn_id = conn.id();
    while let Some(msg) = rx.recv().await {
        let bytes = match state.codec.encode(&msg) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::error!(%conn_id, event = %msg.event, error = %e, "failed to encode frame");
                continue;
            }
        };
        if let Err(e) = conn.send(&bytes).await {
            tracing::debug!(%conn_id, error = %e, "send failed, writer stopping");
            break;
        }
    }
}

/// Spawns a delayed teardown check for every room that just lost its last
/// connected user.
fn reap(state: &Arc<ServerState>, dispatcher: &mut Dispatcher) {
    let delay = dispatcher.teardown_delay();
    for teardown in dispatcher.take_pending_teardowns() {
        spawn_teardown(Arc::clone(state), teardown, delay);
    }
}

fn spawn_teardown(state: Arc<ServerState>, teardown: Teardown, delay: std::time::Duration) {
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        state.dispatcher.lock().await.teardown_if_dead(&teardown);
    });
}
