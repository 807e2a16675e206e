use tracing::info;

use super::{chat::ChatRelay, presence::PresenceTracker};
use crate::room::{
    errors::RoomError,
    models::{ChatMessage, ConnectionId, Participant, Room},
};

#[derive(Debug, Clone)]
pub struct MuteOutcome {
    pub target_id: ConnectionId,
    pub muted: bool,
    pub announcement: ChatMessage,
    pub participants: Vec<Participant>,
}

#[derive(Debug, Clone)]
pub enum BanOutcome {
    Banned {
        target_id: ConnectionId,
        participants: Vec<Participant>,
    },
    /// The banned participant was the last one online
    RoomEmptied { target_id: ConnectionId },
}

/// Mute and ban. Only manages the flags; the chat relay enforces mutes.
pub struct ModerationController;

impl ModerationController {
    pub fn set_muted(
        room: &mut Room,
        target_id: &str,
        muted: bool,
    ) -> Result<MuteOutcome, RoomError> {
        let target = room
            .participant_mut(target_id)
            .ok_or_else(|| RoomError::not_found(format!("participant {target_id}")))?;
        target.is_muted = muted;
        let nickname = target.nickname.clone();

        info!(room_id = %room.id, target_id = %target_id, muted = muted, "Mute state changed");

        let text = if muted {
            format!("{nickname} has been muted")
        } else {
            format!("{nickname} can chat again")
        };
        let announcement = ChatRelay::post_system(room, text);

        Ok(MuteOutcome {
            target_id: target_id.to_string(),
            muted,
            announcement,
            participants: PresenceTracker::snapshot(room),
        })
    }

    /// Removes a participant from the room entirely
    pub fn ban(room: &mut Room, target_id: &str) -> Result<BanOutcome, RoomError> {
        let position = room
            .participants
            .iter()
            .position(|p| p.connection_id == target_id)
            .ok_or_else(|| RoomError::not_found(format!("participant {target_id}")))?;
        let banned = room.participants.remove(position);

        info!(room_id = %room.id, target_id = %target_id, nickname = %banned.nickname, "Participant banned");

        if room.online_count() == 0 {
            return Ok(BanOutcome::RoomEmptied {
                target_id: banned.connection_id,
            });
        }

        Ok(BanOutcome::Banned {
            target_id: banned.connection_id,
            participants: PresenceTracker::snapshot(room),
        })
    }
}
