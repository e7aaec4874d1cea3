//! Conversion logic between DTOs and domain / use case types.

use blipchat_shared::time::timestamp_to_rfc3339;

use crate::domain::{HistoryEntry, ServerEvent, SystemNotice};
use crate::infrastructure::dto::{http as http_dto, websocket as dto};
use crate::usecase::{ChatRequest, JoinRequest, RoomOverview};

// ========================================
// DTO → UseCase request
// ========================================

impl From<dto::JoinRoomPayload> for JoinRequest {
    fn from(dto: dto::JoinRoomPayload) -> Self {
        Self {
            room_name: dto.room_name,
            password: dto.password,
            username: dto.username,
        }
    }
}

impl From<dto::ChatMessagePayload> for ChatRequest {
    fn from(dto: dto::ChatMessagePayload) -> Self {
        Self {
            id: dto.id,
            username: dto.username,
            text: dto.text,
            room: dto.room,
        }
    }
}

// ========================================
// Domain → DTO
// ========================================

impl From<&HistoryEntry> for dto::ChatMessage {
    fn from(entry: &HistoryEntry) -> Self {
        Self {
            id: entry.sender_id.as_str().to_string(),
            username: entry.sender_name.as_str().to_string(),
            text: entry.text.as_str().to_string(),
            room: entry.room.as_str().to_string(),
            seq: Some(entry.seq),
            timestamp: entry.sent_at.value(),
        }
    }
}

impl From<&SystemNotice> for dto::ChatMessage {
    fn from(notice: &SystemNotice) -> Self {
        Self {
            id: dto::SYSTEM_ID.to_string(),
            username: dto::SYSTEM_USERNAME.to_string(),
            text: notice.text.clone(),
            room: notice.room.as_str().to_string(),
            seq: None,
            timestamp: notice.sent_at.value(),
        }
    }
}

impl From<&ServerEvent> for dto::ServerMessage {
    fn from(event: &ServerEvent) -> Self {
        match event {
            ServerEvent::Connected { id } => Self::Connected {
                id: id.as_str().to_string(),
            },
            ServerEvent::RoomJoined { room, history } => Self::RoomJoined {
                room_name: room.as_str().to_string(),
                history: history.iter().map(dto::ChatMessage::from).collect(),
            },
            ServerEvent::RoomJoinFailed { reason } => Self::RoomJoinFailed {
                reason: reason.clone(),
            },
            ServerEvent::Chat(entry) => Self::ChatMessage(entry.into()),
            ServerEvent::Notice(notice) => Self::ChatMessage(notice.into()),
        }
    }
}

impl From<RoomOverview> for http_dto::RoomSummaryDto {
    fn from(overview: RoomOverview) -> Self {
        Self {
            name: overview.name.into_string(),
            protected: overview.protected,
            members: overview.members,
            history: overview.history,
            last_message_at: overview
                .last_message_at
                .and_then(|at| timestamp_to_rfc3339(at.value())),
        }
    }
}
