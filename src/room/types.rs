use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::models::Notice;
use crate::websockets::RoomSummary;

pub const DEFAULT_ROOM_KIND: &str = "default";

/// Request payload for creating a new room
#[derive(Debug, Default, Deserialize)]
pub struct CreateRoomRequest {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
}

impl CreateRoomRequest {
    pub fn kind(&self) -> &str {
        self.kind
            .as_deref()
            .map(str::trim)
            .filter(|kind| !kind.is_empty())
            .unwrap_or(DEFAULT_ROOM_KIND)
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateRoomResponse {
    pub room_id: String,
    pub kind: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RoomSummaryResponse {
    pub id: String,
    pub kind: String,
    pub participant_count: usize,
    pub online_count: usize,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latest_notice: Option<Notice>,
}

impl From<RoomSummary> for CreateRoomResponse {
    fn from(summary: RoomSummary) -> Self {
        Self {
            room_id: summary.id,
            kind: summary.kind,
            created_at: summary.created_at,
            expires_at: summary.expires_at,
        }
    }
}

impl From<RoomSummary> for RoomSummaryResponse {
    fn from(summary: RoomSummary) -> Self {
        Self {
            id: summary.id,
            kind: summary.kind,
            participant_count: summary.participant_count,
            online_count: summary.online_count,
            created_at: summary.created_at,
            expires_at: summary.expires_at,
            latest_notice: summary.latest_notice,
        }
    }
}
