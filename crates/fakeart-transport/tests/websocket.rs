//! Integration tests for the WebSocket transport.
//!
//! These spin up a real listener on an OS-assigned port and talk to it with
//! a plain tokio-tungstenite client.

#[cfg(feature = "websocket")]
mod websocket {
    use std::sync::Arc;
    use std::time::Duration;

    use fakeart_transport::{Connection, Transport, WebSocketConnection, WebSocketTransport};
    use futures_util::{SinkExt, StreamExt};
    use tokio_tungstenite::tungstenite::Message;

    type ClientWs = tokio_tungstenite::WebSocketStream<
        tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>,
    >;

    /// Binds a transport on a random port, connects one client and returns
    /// both ends.
    async fn connected_pair() -> (WebSocketConnection, ClientWs) {
        let mut transport = WebSocketTransport::bind("127.0.0.1:0")
            .await
            .expect("should bind");
        let addr = transport.local_addr().expect("should have addr");

        let server_handle =
            tokio::spawn(async move { transport.accept().await.expect("should accept") });

        let (client, _) = tokio_tungstenite::connect_async(format!("ws://{addr}"))
            .await
            .expect("client should connect");
        let server_conn = server_handle.await.expect("task should complete");
        (server_conn, client)
    }

    #[tokio::test]
    async fn test_websocket_send_arrives_as_text_frame() {
        let (server_conn, mut client) = connected_pair().await;
        assert!(server_conn.id().into_inner() > 0);

        server_conn
            .send(br#"{"event":"NEW_TURN"}"#)
            .await
            .expect("send should succeed");

        let msg = client.next().await.unwrap().unwrap();
        match msg {
            Message::Text(text) => assert_eq!(text.as_str(), r#"{"event":"NEW_TURN"}"#),
            other => panic!("expected text frame, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_websocket_recv_accepts_text_and_binary() {
        let (server_conn, mut client) = connected_pair().await;

        client.send(Message::Text("hello".into())).await.unwrap();
        client
            .send(Message::Binary(b"world".to_vec().into()))
            .await
            .unwrap();

        let first = server_conn.recv().await.unwrap().unwrap();
        let second = server_conn.recv().await.unwrap().unwrap();
        assert_eq!(first, b"hello");
        assert_eq!(second, b"world");
    }

    #[tokio::test]
    async fn test_websocket_send_not_blocked_by_pending_recv() {
        let (server_conn, mut client) = connected_pair().await;
        let server_conn = Arc::new(server_conn);

        // Park a reader on the connection; nothing will arrive for it yet.
        let reader = {
            let conn = Arc::clone(&server_conn);
            tokio::spawn(async move { conn.recv().await })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;

        tokio::time::timeout(Duration::from_secs(2), server_conn.send(b"ping"))
            .await
            .expect("send must not wait for the reader")
            .expect("send should succeed");
        assert!(client.next().await.unwrap().is_ok());

        client.send(Message::Close(None)).await.unwrap();
        let result = reader.await.unwrap().expect("recv should not error");
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_websocket_recv_returns_none_on_client_close() {
        let (server_conn, mut client) = connected_pair().await;

        client.send(Message::Close(None)).await.unwrap();

        let result = server_conn.recv().await.expect("recv should not error");
        assert!(result.is_none(), "should return None on client close");
    }
}
