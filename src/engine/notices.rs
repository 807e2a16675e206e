use chrono::Utc;
use tracing::info;

use super::chat::ChatRelay;
use crate::room::{
    errors::RoomError,
    models::{ChatMessage, EntityId, Notice, Room},
};

/// Announcements, oldest first. Clients show the newest as a banner.
pub struct NoticeBoard;

impl NoticeBoard {
    pub fn add(
        room: &mut Room,
        author: &str,
        content: &str,
    ) -> Result<(Notice, ChatMessage), RoomError> {
        let content = content.trim();
        if content.is_empty() {
            return Err(RoomError::validation("notice is empty"));
        }

        let notice = Notice {
            id: room.next_id(),
            content: content.to_string(),
            author: author.to_string(),
            created_at: Utc::now(),
        };
        room.notices.push(notice.clone());

        info!(room_id = %room.id, notice_id = notice.id, "Notice added");

        let announcement = ChatRelay::post_system(room, format!("Notice: {content}"));
        Ok((notice, announcement))
    }

    /// Idempotent; returns whether anything was removed
    pub fn remove(room: &mut Room, notice_id: EntityId) -> bool {
        let before = room.notices.len();
        room.notices.retain(|notice| notice.id != notice_id);
        let removed = room.notices.len() != before;
        if removed {
            info!(room_id = %room.id, notice_id = notice_id, "Notice removed");
        }
        removed
    }

    pub fn latest(room: &Room) -> Option<&Notice> {
        room.notices.last()
    }
}
