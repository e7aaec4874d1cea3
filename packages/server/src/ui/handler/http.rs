//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{Json, extract::State};

use crate::{
    infrastructure::dto::http::{HealthDto, RoomSummaryDto},
    ui::state::AppState,
};

/// Banner served on `/`
pub async fn root() -> &'static str {
    "BlipChat server is running!"
}

/// Health check endpoint
pub async fn health_check() -> Json<HealthDto> {
    Json(HealthDto {
        status: "ok".to_string(),
    })
}

/// Get list of rooms
///
/// Counts only: neither secrets nor message bodies are exposed.
pub async fn get_rooms(State(state): State<Arc<AppState>>) -> Json<Vec<RoomSummaryDto>> {
    let rooms = state.coordinator.room_overviews().await;

    // UseCase の結果から DTO への変換
    Json(rooms.into_iter().map(RoomSummaryDto::from).collect())
}
