//! Outbound events produced by the membership coordinator.
//!
//! The transport decides how an event is encoded; see
//! `infrastructure::dto::websocket` for the JSON form.

use super::{
    history::HistoryEntry,
    value_object::{ConnectionId, RoomName, Timestamp},
};

/// A server-authored notice (join / leave) addressed to one room.
///
/// Notices are broadcast but never recorded in a History Ring.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemNotice {
    pub room: RoomName,
    pub text: String,
    pub sent_at: Timestamp,
}

impl SystemNotice {
    pub fn joined(room: RoomName, who: &str, sent_at: Timestamp) -> Self {
        let text = format!("{} joined {}.", who, room);
        Self {
            room,
            text,
            sent_at,
        }
    }

    pub fn left(room: RoomName, who: &str, sent_at: Timestamp) -> Self {
        Self {
            room,
            text: format!("{} left the room.", who),
            sent_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerEvent {
    /// Sent once after the connection is established.
    Connected { id: ConnectionId },
    /// Unicast join confirmation with the room's history, oldest first.
    RoomJoined {
        room: RoomName,
        history: Vec<HistoryEntry>,
    },
    /// Unicast join rejection. `reason` is client-facing.
    RoomJoinFailed { reason: String },
    /// A member's chat message.
    Chat(HistoryEntry),
    /// A join / leave announcement.
    Notice(SystemNotice),
}
