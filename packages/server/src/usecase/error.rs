//! UseCase 層のエラー定義

use thiserror::Error;

/// クライアントに返す入室失敗の理由（存在しないルーム）
pub const INVALID_ROOM_REASON: &str = "Invalid room name.";

/// クライアントに返す入室失敗の理由（合言葉の誤り・未指定）
///
/// 合言葉の誤りと未指定を区別しない文言にしています。
pub const ACCESS_DENIED_REASON: &str = "Incorrect password for room.";

/// 接続時のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConnectError {
    #[error("connection '{0}' is already registered")]
    DuplicateConnectionId(String),
}

/// 入室時のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JoinRoomError {
    #[error("room '{0}' does not exist")]
    InvalidRoom(String),

    #[error("access to room '{0}' was denied")]
    AccessDenied(String),

    #[error("connection '{0}' has no session")]
    UnknownSession(String),
}

impl JoinRoomError {
    /// クライアントに返す理由の文言
    pub fn client_reason(&self) -> &'static str {
        match self {
            Self::InvalidRoom(_) | Self::UnknownSession(_) => INVALID_ROOM_REASON,
            Self::AccessDenied(_) => ACCESS_DENIED_REASON,
        }
    }
}

/// メッセージの形式不備の詳細（ログ用）
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedReason {
    #[error("text is missing or empty")]
    MissingText,

    #[error("text is too long")]
    TextTooLong,

    #[error("username is missing or empty")]
    MissingUsername,

    #[error("room is missing")]
    MissingRoom,

    #[error("room '{0}' does not exist")]
    UnknownRoom(String),

    #[error("sender is not a member of room '{0}'")]
    NotAMember(String),
}

/// メッセージ送信時のエラー
///
/// いずれも送信者には通知されず、ログにのみ記録されます。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SendMessageError {
    #[error("malformed message: {0}")]
    MalformedMessage(#[from] MalformedReason),

    #[error("connection '{0}' has no session")]
    UnknownSession(String),
}

/// 切断時のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DisconnectError {
    #[error("connection '{0}' has no session")]
    UnknownSession(String),
}
