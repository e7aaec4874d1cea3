//! WebSocket frame DTOs.
//!
//! Every frame is a JSON object tagged by `type`:
//!
//! ```text
//! client → server: joinRoom, chatMessage
//! server → client: connected, roomJoined, roomJoinFailed, chatMessage
//! ```

use serde::{Deserialize, Serialize};

/// Connection id used for server-authored messages.
pub const SYSTEM_ID: &str = "system";

/// Display name used for server-authored messages.
pub const SYSTEM_USERNAME: &str = "System";

/// Frames sent by the client.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ClientMessage {
    JoinRoom(JoinRoomPayload),
    ChatMessage(ChatMessagePayload),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinRoomPayload {
    pub room_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

/// Inbound chat message.
///
/// Every field is optional so that a frame with missing fields still parses
/// and can be rejected (and logged) as a malformed message.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
pub struct ChatMessagePayload {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub room: Option<String>,
}

/// Frames sent by the server.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ServerMessage {
    Connected { id: String },
    RoomJoined {
        room_name: String,
        history: Vec<ChatMessage>,
    },
    RoomJoinFailed { reason: String },
    ChatMessage(ChatMessage),
}

/// Outbound chat message (member or system).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ChatMessage {
    pub id: String,
    pub username: String,
    pub text: String,
    pub room: String,
    /// Position in the room history; absent for system messages.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seq: Option<u64>,
    /// Unix timestamp (UTC, milliseconds)
    pub timestamp: i64,
}

impl ChatMessage {
    pub fn is_system(&self) -> bool {
        self.id == SYSTEM_ID
    }
}
