//! Broadcast Gateway
//!
//! ルームのメンバー全員、または 1 接続へのイベント配信。
//! 配信は fire-and-forget で、切断済みの接続への配信失敗は呼び出し元に返しません。

use std::sync::Arc;

use crate::domain::{ConnectionId, MessagePusher, RoomState, ServerEvent};

/// Broadcast Gateway
pub struct BroadcastGateway {
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl BroadcastGateway {
    pub fn new(message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self { message_pusher }
    }

    /// ルームの現在のメンバー全員に配信
    ///
    /// 呼び出し元はルームのロックを保持したまま呼ぶこと。
    /// 配信対象のクライアント ID リストを返します。
    pub async fn broadcast(&self, room: &RoomState, event: &ServerEvent) -> Vec<ConnectionId> {
        let targets = room.members();
        if targets.is_empty() {
            return targets;
        }

        if let Err(e) = self
            .message_pusher
            .broadcast(targets.clone(), event)
            .await
        {
            tracing::warn!("Broadcast failed: {}", e);
        }
        targets
    }

    /// 1 接続にのみ配信
    pub async fn unicast(&self, target: &ConnectionId, event: &ServerEvent) {
        if let Err(e) = self.message_pusher.push_to(target, event).await {
            tracing::debug!("Unicast to '{}' dropped: {}", target, e);
        }
    }

    pub fn message_pusher(&self) -> &Arc<dyn MessagePusher> {
        &self.message_pusher
    }
}
