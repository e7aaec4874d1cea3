//! HTTP API response DTOs.

use serde::{Deserialize, Serialize};

/// Room summary returned by `GET /api/rooms`
///
/// Never carries secrets or message bodies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomSummaryDto {
    pub name: String,
    pub protected: bool,
    pub members: usize,
    pub history: usize,
    /// RFC 3339 (UTC) timestamp of the newest retained message
    pub last_message_at: Option<String>,
}

/// Response of `GET /api/health`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthDto {
    pub status: String,
}
