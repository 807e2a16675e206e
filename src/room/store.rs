use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use std::collections::HashMap;
use tracing::{debug, info, instrument};

use super::{errors::RoomError, models::Room};

const ROOM_ID_MIN: u32 = 1000;
const ROOM_ID_MAX: u32 = 9999;
const ROOM_ID_SPACE: usize = (ROOM_ID_MAX - ROOM_ID_MIN + 1) as usize;

/// Owns every live room, keyed by its 4-digit identifier
#[derive(Debug, Default)]
pub struct RoomStore {
    rooms: HashMap<String, Room>,
}

impl RoomStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a room with a fresh identifier not used by any live room
    #[instrument(skip(self))]
    pub fn create_room(
        &mut self,
        kind: &str,
        ttl: Duration,
        now: DateTime<Utc>,
    ) -> Result<&Room, RoomError> {
        if self.rooms.len() >= ROOM_ID_SPACE {
            return Err(RoomError::CapacityExhausted);
        }

        let mut rng = rand::rng();
        let room_id = loop {
            let candidate = rng.random_range(ROOM_ID_MIN..=ROOM_ID_MAX).to_string();
            if !self.rooms.contains_key(&candidate) {
                break candidate;
            }
        };

        let room = Room::new(room_id.clone(), kind.to_string(), now, ttl);
        info!(room_id = %room_id, kind = %kind, expires_at = %room.expires_at, "Room created");

        Ok(self.rooms.entry(room_id).or_insert(room))
    }

    pub fn get_room(&self, room_id: &str) -> Option<&Room> {
        self.rooms.get(room_id)
    }

    pub fn get_room_mut(&mut self, room_id: &str) -> Option<&mut Room> {
        self.rooms.get_mut(room_id)
    }

    /// Removes a room. Deleting an unknown room is not an error.
    pub fn delete_room(&mut self, room_id: &str) -> Option<Room> {
        let removed = self.rooms.remove(room_id);
        match &removed {
            Some(_) => info!(room_id = %room_id, "Room deleted"),
            None => debug!(room_id = %room_id, "Room already gone"),
        }
        removed
    }

    /// Removes and returns every room whose expiry has passed
    pub fn take_expired(&mut self, now: DateTime<Utc>) -> Vec<Room> {
        let expired_ids: Vec<String> = self
            .rooms
            .values()
            .filter(|room| room.is_expired(now))
            .map(|room| room.id.clone())
            .collect();

        expired_ids
            .iter()
            .filter_map(|room_id| {
                info!(room_id = %room_id, "Room expired");
                self.rooms.remove(room_id)
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }
}
