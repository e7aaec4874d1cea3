//! WebSocket connection handlers.

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{
    sink::SinkExt,
    stream::{SplitSink, Stream, StreamExt},
};
use tokio::sync::{mpsc, oneshot};

use crate::{
    domain::ConnectionId, infrastructure::dto::websocket::ClientMessage, ui::state::AppState,
    usecase::MembershipCoordinator,
};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Spawns a task that receives frames from the rx channel and pushes them to the WebSocket sender.
///
/// This function handles the outbound flow: frames queued by the `MessagePusher`
/// (unicast or room broadcast) are written to this client's WebSocket connection.
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(frame) = rx.recv().await {
            if sender.send(Message::Text(frame.into())).await.is_err() {
                break;
            }
        }
    })
}

/// Dispatch one inbound text frame to the coordinator.
///
/// Frames of a single connection are handled one at a time, in arrival order.
async fn handle_frame(coordinator: &MembershipCoordinator, id: &ConnectionId, text: &str) {
    match serde_json::from_str::<ClientMessage>(text) {
        Ok(ClientMessage::JoinRoom(payload)) => {
            // 失敗は要求元に roomJoinFailed として通知済み
            let _ = coordinator.join_room(id, payload.into()).await;
        }
        Ok(ClientMessage::ChatMessage(payload)) => {
            // 形式不備のメッセージはログのみ
            let _ = coordinator.send_message(id, payload.into()).await;
        }
        Err(e) => {
            tracing::warn!("Dropped unparseable frame from '{}': {}", id, e);
        }
    }
}

/// Reads frames until the client goes away or `stop` fires.
///
/// `stop` is only observed between frames: a frame that has been read is always
/// handled to completion, so a join or a send is never cut off halfway.
async fn receive_loop<S>(
    mut receiver: S,
    mut stop: oneshot::Receiver<()>,
    coordinator: Arc<MembershipCoordinator>,
    id: ConnectionId,
) where
    S: Stream<Item = Result<Message, axum::Error>> + Unpin,
{
    loop {
        let msg = tokio::select! {
            biased;
            msg = receiver.next() => msg,
            _ = &mut stop => break,
        };

        let msg = match msg {
            Some(Ok(msg)) => msg,
            Some(Err(e)) => {
                tracing::warn!("WebSocket error on '{}': {}", id, e);
                break;
            }
            None => break,
        };

        match msg {
            Message::Text(text) => handle_frame(&coordinator, &id, text.as_str()).await,
            Message::Close(_) => {
                tracing::info!("Client '{}' requested close", id);
                break;
            }
            _ => {}
        }
    }
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let connection_id = ConnectionId::generate();

    // Create a channel for this client to receive frames
    let (tx, rx) = mpsc::unbounded_channel();
    if let Err(e) = state.coordinator.connect(connection_id.clone(), tx).await {
        tracing::error!("Failed to register connection: {}", e);
        return;
    }
    tracing::info!("Client '{}' connected", connection_id);

    let (sender, receiver) = socket.split();
    let (stop_tx, stop_rx) = oneshot::channel();

    // Spawn a task to receive frames from this client
    let mut recv_task = tokio::spawn(receive_loop(
        receiver,
        stop_rx,
        state.coordinator.clone(),
        connection_id.clone(),
    ));

    // Spawn a task to push queued frames to this client
    let mut send_task = pusher_loop(rx, sender);

    // The pusher can be aborted at any point. The receiver is asked to stop and
    // finishes the frame it is handling.
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => {
            let _ = stop_tx.send(());
            if let Err(e) = recv_task.await {
                tracing::warn!("Receive task for '{}' failed: {}", connection_id, e);
            }
        }
    };

    match state.coordinator.disconnect(&connection_id).await {
        Ok(Some(room)) => {
            tracing::info!("Client '{}' disconnected from room '{}'", connection_id, room);
        }
        Ok(None) => tracing::info!("Client '{}' disconnected", connection_id),
        Err(e) => tracing::warn!("Failed to disconnect '{}': {}", connection_id, e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{AccessPolicy, Room, RoomName, RoomRegistry},
        infrastructure::message_pusher::WebSocketMessagePusher,
    };
    use futures_util::stream;

    fn create_coordinator() -> Arc<MembershipCoordinator> {
        let registry = RoomRegistry::new(vec![
            Room::open(RoomName::new("Room 1".to_string()).unwrap()),
            Room {
                name: RoomName::new("Admin Room".to_string()).unwrap(),
                policy: AccessPolicy::plain_secret("aqua"),
            },
        ])
        .unwrap();
        Arc::new(MembershipCoordinator::new(
            registry,
            Arc::new(WebSocketMessagePusher::new()),
        ))
    }

    fn text(json: &str) -> Result<Message, axum::Error> {
        Ok(Message::Text(json.to_string().into()))
    }

    #[tokio::test]
    async fn test_stop_waits_for_frames_already_read() {
        // テスト項目: 停止要求が届いていても、読み込まれたフレームは最後まで処理される
        // given (前提条件):
        let coordinator = create_coordinator();
        let id = ConnectionId::new("conn-a".to_string()).unwrap();
        let (tx, mut rx) = mpsc::unbounded_channel();
        coordinator.connect(id.clone(), tx).await.unwrap();
        let frames = stream::iter(vec![
            text(r#"{"type":"joinRoom","roomName":"Room 1","username":"Alice"}"#),
            text(r#"{"type":"chatMessage","username":"Alice","text":"hi","room":"Room 1"}"#),
        ])
        .chain(stream::pending());
        let (stop_tx, stop_rx) = oneshot::channel();
        stop_tx.send(()).unwrap();

        // when (操作):
        receive_loop(frames, stop_rx, coordinator.clone(), id.clone()).await;

        // then (期待する結果): 入室と送信が完了し、履歴と配信が一致する
        assert_eq!(
            coordinator.members_of("Room 1").await.unwrap(),
            vec![id.clone()]
        );
        let history = coordinator.history_of("Room 1").await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].text.as_str(), "hi");
        let mut delivered = Vec::new();
        while let Ok(frame) = rx.try_recv() {
            delivered.push(frame);
        }
        assert!(delivered.last().unwrap().contains("\"text\":\"hi\""));
    }

    #[tokio::test]
    async fn test_loop_ends_on_close_frame() {
        // テスト項目: Close フレームを受信するとループが終了し、以降のフレームは処理されない
        // given (前提条件):
        let coordinator = create_coordinator();
        let id = ConnectionId::new("conn-b".to_string()).unwrap();
        let (tx, _rx) = mpsc::unbounded_channel();
        coordinator.connect(id.clone(), tx).await.unwrap();
        let frames = stream::iter(vec![
            Ok(Message::Close(None)),
            text(r#"{"type":"joinRoom","roomName":"Room 1"}"#),
        ]);
        let (_stop_tx, stop_rx) = oneshot::channel();

        // when (操作):
        receive_loop(frames, stop_rx, coordinator.clone(), id).await;

        // then (期待する結果):
        assert!(coordinator.members_of("Room 1").await.unwrap().is_empty());
    }
}
