use chrono::Utc;
use tracing::debug;

use crate::room::{
    errors::RoomError,
    models::{ChatKind, ChatMessage, Room},
};

/// Display name attached to system-generated chat lines
pub const SYSTEM_NICKNAME: &str = "system";

/// Appends chat lines to a room's history
pub struct ChatRelay;

impl ChatRelay {
    /// Accepts a participant's message unless the sender is muted
    pub fn send(room: &mut Room, connection_id: &str, text: &str) -> Result<ChatMessage, RoomError> {
        let sender = room
            .participant(connection_id)
            .ok_or_else(|| RoomError::not_found(format!("participant {connection_id}")))?;

        if sender.is_muted {
            debug!(room_id = %room.id, connection_id = %connection_id, "Rejected chat from muted participant");
            return Err(RoomError::Muted);
        }
        if text.trim().is_empty() {
            return Err(RoomError::validation("message is empty"));
        }

        let nickname = sender.nickname.clone();
        let message = ChatMessage {
            id: room.next_id(),
            sender_id: Some(connection_id.to_string()),
            nickname,
            text: text.to_string(),
            timestamp: Utc::now(),
            kind: ChatKind::User,
        };
        room.messages.push(message.clone());
        Ok(message)
    }

    /// Narrates a state change. Never subject to mute filtering.
    pub fn post_system(room: &mut Room, text: impl Into<String>) -> ChatMessage {
        let message = ChatMessage {
            id: room.next_id(),
            sender_id: None,
            nickname: SYSTEM_NICKNAME.to_string(),
            text: text.into(),
            timestamp: Utc::now(),
            kind: ChatKind::System,
        };
        room.messages.push(message.clone());
        message
    }
}
