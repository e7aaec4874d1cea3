//! MessagePusher trait 定義
//!
//! ドメイン層が必要とするメッセージ通知のインターフェースを定義します。
//! 具体的な実装（WebSocket など）は Infrastructure 層が提供します（依存性の逆転）。

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;

use super::{event::ServerEvent, value_object::ConnectionId};

/// クライアントへの送信チャンネル
///
/// エンコード済みのフレーム（JSON 文字列）を運びます。
pub type PusherChannel = mpsc::UnboundedSender<String>;

/// メッセージ通知のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessagePushError {
    #[error("client '{0}' is not registered")]
    ClientNotFound(String),

    #[error("failed to push message: {0}")]
    PushFailed(String),

    #[error("failed to encode event: {0}")]
    Encode(String),
}

/// メッセージ通知の抽象化
///
/// - `push_to`: 1 クライアントへの送信（unicast）
/// - `broadcast`: 指定したクライアント全員への送信。個別の失敗は許容します
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// クライアントの送信チャンネルを登録
    async fn register_client(&self, client_id: ConnectionId, sender: PusherChannel);

    /// クライアントの送信チャンネルを登録解除
    async fn unregister_client(&self, client_id: &ConnectionId);

    /// 特定のクライアントにイベントを送信
    async fn push_to(
        &self,
        client_id: &ConnectionId,
        event: &ServerEvent,
    ) -> Result<(), MessagePushError>;

    /// 複数のクライアントにイベントを送信
    async fn broadcast(
        &self,
        targets: Vec<ConnectionId>,
        event: &ServerEvent,
    ) -> Result<(), MessagePushError>;
}
