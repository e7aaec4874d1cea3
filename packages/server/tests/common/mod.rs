//! Helpers shared by the integration tests.

#![allow(dead_code)]

use std::{net::SocketAddr, sync::Arc, time::Duration};

use blipchat_server::{
    infrastructure::{config, message_pusher::WebSocketMessagePusher},
    ui::Server,
    usecase::MembershipCoordinator,
};
use futures_util::{SinkExt, StreamExt};
use serde_json::{Value, json};
use tokio::{
    net::{TcpListener, TcpStream},
    sync::oneshot,
};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};

pub type Ws = WebSocketStream<MaybeTlsStream<TcpStream>>;

const RECV_TIMEOUT: Duration = Duration::from_secs(2);
const SILENCE_WINDOW: Duration = Duration::from_millis(200);

/// In-process server bound to an ephemeral port
pub struct TestServer {
    pub addr: SocketAddr,
    pub coordinator: Arc<MembershipCoordinator>,
    shutdown: Option<oneshot::Sender<()>>,
}

impl TestServer {
    /// Start a server with the built-in catalog ("Admin Room" secret: "aqua")
    pub async fn start() -> Self {
        let registry = config::build_registry(config::default_catalog("aqua"))
            .expect("default catalog is valid");
        let coordinator = Arc::new(MembershipCoordinator::new(
            registry,
            Arc::new(WebSocketMessagePusher::new()),
        ));

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("listener has an address");

        let (tx, rx) = oneshot::channel::<()>();
        let server = Server::new(coordinator.clone());
        tokio::spawn(async move {
            server
                .serve(listener, async {
                    rx.await.ok();
                })
                .await
                .expect("server error");
        });

        Self {
            addr,
            coordinator,
            shutdown: Some(tx),
        }
    }

    pub fn ws_url(&self) -> String {
        format!("ws://{}/ws", self.addr)
    }

    pub fn http_url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
    }
}

/// A connected WebSocket client that already consumed its `connected` frame
pub struct TestClient {
    pub id: String,
    ws: Ws,
}

impl TestClient {
    pub async fn connect(server: &TestServer) -> Self {
        let (ws, _response) = connect_async(server.ws_url())
            .await
            .expect("Failed to connect");
        let mut client = Self {
            id: String::new(),
            ws,
        };

        let connected = client.recv().await;
        assert_eq!(connected["type"], "connected");
        client.id = connected["id"]
            .as_str()
            .expect("connected frame carries an id")
            .to_string();
        client
    }

    pub async fn send_json(&mut self, value: Value) {
        self.send_raw(&value.to_string()).await;
    }

    pub async fn send_raw(&mut self, text: &str) {
        self.ws
            .send(Message::Text(text.to_string().into()))
            .await
            .expect("Failed to send frame");
    }

    pub async fn join(&mut self, room: &str, username: &str, password: Option<&str>) {
        let mut frame = json!({"type": "joinRoom", "roomName": room, "username": username});
        if let Some(password) = password {
            frame["password"] = json!(password);
        }
        self.send_json(frame).await;
    }

    pub async fn say(&mut self, username: &str, text: &str, room: &str) {
        let id = self.id.clone();
        self.send_json(json!({
            "type": "chatMessage",
            "id": id,
            "username": username,
            "text": text,
            "room": room,
        }))
        .await;
    }

    /// Next JSON frame, failing the test after a timeout
    pub async fn recv(&mut self) -> Value {
        tokio::time::timeout(RECV_TIMEOUT, self.next_json())
            .await
            .expect("Timed out waiting for a frame")
            .expect("Connection closed while waiting for a frame")
    }

    /// Assert that no frame arrives within a short window
    pub async fn expect_silence(&mut self) {
        if let Ok(Some(frame)) = tokio::time::timeout(SILENCE_WINDOW, self.next_json()).await {
            panic!("expected no frame, got {}", frame);
        }
    }

    pub async fn close(mut self) {
        self.ws.close(None).await.ok();
    }

    async fn next_json(&mut self) -> Option<Value> {
        while let Some(message) = self.ws.next().await {
            match message.ok()? {
                Message::Text(text) => {
                    return Some(serde_json::from_str(text.as_str()).expect("frame is JSON"));
                }
                Message::Close(_) => return None,
                _ => continue,
            }
        }
        None
    }
}
