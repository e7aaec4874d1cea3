//! Session: 接続ごとのサーバ側状態

use super::value_object::{ConnectionId, DisplayName, RoomName, Timestamp};

/// 表示名が一度も設定されていない場合に通知で使う呼び名
pub const UNNAMED_MEMBER: &str = "A user";

/// Session の状態
///
/// `Terminated` は Session がテーブルから取り除かれたことで表現します。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState<'a> {
    Unjoined,
    Joined(&'a RoomName),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub id: ConnectionId,
    pub display_name: Option<DisplayName>,
    pub current_room: Option<RoomName>,
    pub connected_at: Timestamp,
}

impl Session {
    pub fn new(id: ConnectionId, connected_at: Timestamp) -> Self {
        Self {
            id,
            display_name: None,
            current_room: None,
            connected_at,
        }
    }

    pub fn state(&self) -> SessionState<'_> {
        match &self.current_room {
            Some(room) => SessionState::Joined(room),
            None => SessionState::Unjoined,
        }
    }

    /// 入退室通知で使う名前
    pub fn announce_name(&self) -> &str {
        self.display_name
            .as_ref()
            .map(DisplayName::as_str)
            .unwrap_or(UNNAMED_MEMBER)
    }

    pub fn is_in(&self, room: &RoomName) -> bool {
        self.current_room.as_ref() == Some(room)
    }
}
