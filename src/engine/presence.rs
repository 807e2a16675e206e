use chrono::Utc;
use std::collections::HashMap;
use tracing::{debug, info};

use super::chat::ChatRelay;
use crate::room::{
    errors::RoomError,
    models::{ChatMessage, ConnectionId, Participant, Room},
};

/// Result of a successful join
#[derive(Debug, Clone)]
pub struct JoinOutcome {
    pub participants: Vec<Participant>,
    pub announcement: ChatMessage,
    /// The connection was already known to the room and got overwritten
    pub rejoined: bool,
}

/// Result of a departure
#[derive(Debug, Clone)]
pub enum LeaveOutcome {
    /// Someone is still online; they need the new presence and the notice
    Left {
        participants: Vec<Participant>,
        announcement: ChatMessage,
    },
    /// Nobody is online any more; the caller deletes the room
    RoomEmptied,
    /// The connection was not an online participant
    NotPresent,
}

/// Join/leave transitions over a room's participant list
pub struct PresenceTracker;

impl PresenceTracker {
    /// Marks a connection as present. A known connection id is overwritten in
    /// place, keeping its position and mute flag.
    pub fn join(
        room: &mut Room,
        connection_id: &str,
        nickname: &str,
        is_admin: bool,
    ) -> Result<JoinOutcome, RoomError> {
        let nickname = nickname.trim();
        if nickname.is_empty() {
            return Err(RoomError::validation("nickname is empty"));
        }

        let participant = Participant {
            connection_id: connection_id.to_string(),
            nickname: nickname.to_string(),
            is_online: true,
            is_muted: false,
            is_admin,
            joined_at: Utc::now(),
        };

        let rejoined = match room.participant_mut(connection_id) {
            Some(existing) => {
                let is_muted = existing.is_muted;
                *existing = Participant {
                    is_muted,
                    ..participant
                };
                true
            }
            None => {
                room.participants.push(participant);
                false
            }
        };

        info!(
            room_id = %room.id,
            connection_id = %connection_id,
            nickname = %nickname,
            is_admin = is_admin,
            rejoined = rejoined,
            "Participant joined"
        );

        let announcement = ChatRelay::post_system(room, format!("{nickname} joined the room"));
        Ok(JoinOutcome {
            participants: Self::snapshot(room),
            announcement,
            rejoined,
        })
    }

    /// Marks a connection offline, keeping its history in the room
    pub fn leave(room: &mut Room, connection_id: &str) -> LeaveOutcome {
        let nickname = match room.participant_mut(connection_id) {
            Some(participant) if participant.is_online => {
                participant.is_online = false;
                participant.nickname.clone()
            }
            _ => {
                debug!(room_id = %room.id, connection_id = %connection_id, "Leave from non-present connection");
                return LeaveOutcome::NotPresent;
            }
        };

        info!(room_id = %room.id, connection_id = %connection_id, "Participant went offline");

        if room.online_count() == 0 {
            return LeaveOutcome::RoomEmptied;
        }

        let announcement = ChatRelay::post_system(room, format!("{nickname} left the room"));
        LeaveOutcome::Left {
            participants: Self::snapshot(room),
            announcement,
        }
    }

    /// Participants in join order
    pub fn snapshot(room: &Room) -> Vec<Participant> {
        room.participants.clone()
    }
}

/// Which room each live connection has joined
#[derive(Debug, Default)]
pub struct ConnectionIndex {
    rooms: HashMap<ConnectionId, String>,
}

impl ConnectionIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind(&mut self, connection_id: &str, room_id: &str) -> Option<String> {
        self.rooms
            .insert(connection_id.to_string(), room_id.to_string())
    }

    pub fn unbind(&mut self, connection_id: &str) -> Option<String> {
        self.rooms.remove(connection_id)
    }

    pub fn room_of(&self, connection_id: &str) -> Option<&str> {
        self.rooms.get(connection_id).map(String::as_str)
    }

    /// Drops every connection bound to a room and returns them
    pub fn unbind_room(&mut self, room_id: &str) -> Vec<ConnectionId> {
        let connections: Vec<ConnectionId> = self
            .rooms
            .iter()
            .filter(|(_, bound)| bound.as_str() == room_id)
            .map(|(connection_id, _)| connection_id.clone())
            .collect();
        for connection_id in &connections {
            self.rooms.remove(connection_id);
        }
        connections
    }
}
