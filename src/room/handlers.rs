use axum::{
    extract::{Path, State},
    Json,
};
use tracing::{info, instrument};

use super::types::{CreateRoomRequest, CreateRoomResponse, RoomSummaryResponse};
use crate::shared::{AppError, AppState};

/// HTTP handler for creating a new room
///
/// POST /api/rooms
/// Body is optional; `{"type": "..."}` sets the room kind
#[instrument(name = "create_room", skip(state, request))]
pub async fn create_room(
    State(state): State<AppState>,
    request: Option<Json<CreateRoomRequest>>,
) -> Result<Json<CreateRoomResponse>, AppError> {
    let request = request.map(|Json(request)| request).unwrap_or_default();
    let summary = state.coordinator.create_room(request.kind()).await?;

    info!(room_id = %summary.id, kind = %summary.kind, "Room created successfully");

    Ok(Json(summary.into()))
}

/// GET /api/rooms/:room_id
#[instrument(name = "get_room", skip(state))]
pub async fn get_room(
    State(state): State<AppState>,
    Path(room_id): Path<String>,
) -> Result<Json<RoomSummaryResponse>, AppError> {
    let summary = state
        .coordinator
        .room_summary(&room_id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Room {room_id} not found")))?;

    Ok(Json(summary.into()))
}
