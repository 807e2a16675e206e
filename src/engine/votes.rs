use chrono::Utc;
use tracing::{debug, info};

use super::chat::ChatRelay;
use crate::room::{
    errors::RoomError,
    models::{ChatMessage, EntityId, Room, Vote},
};

pub const MIN_VOTE_OPTIONS: usize = 2;

/// Poll lifecycle: `active --close--> closed`, closed is terminal
pub struct VoteEngine;

impl VoteEngine {
    /// Opens a new vote. Blank options are dropped before validation.
    pub fn create(
        room: &mut Room,
        author: &str,
        title: &str,
        options: &[String],
    ) -> Result<(Vote, ChatMessage), RoomError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(RoomError::validation("vote title is empty"));
        }

        let options: Vec<String> = options
            .iter()
            .map(|option| option.trim())
            .filter(|option| !option.is_empty())
            .map(str::to_string)
            .collect();
        if options.len() < MIN_VOTE_OPTIONS {
            return Err(RoomError::validation(format!(
                "a vote needs at least {MIN_VOTE_OPTIONS} non-empty options"
            )));
        }

        let vote = Vote::new(room.next_id(), title.to_string(), options, author.to_string());
        room.votes.push(vote.clone());

        info!(room_id = %room.id, vote_id = vote.id, options = vote.options.len(), "Vote created");

        let announcement = ChatRelay::post_system(room, format!("New vote: {title}"));
        Ok((vote, announcement))
    }

    /// Counts a ballot at most once per connection
    pub fn cast_ballot(
        room: &mut Room,
        vote_id: EntityId,
        connection_id: &str,
        option_index: usize,
    ) -> Result<Vote, RoomError> {
        let room_id = room.id.clone();
        let vote = room
            .vote_mut(vote_id)
            .ok_or_else(|| RoomError::not_found(format!("vote {vote_id}")))?;

        if !vote.is_active {
            return Err(RoomError::VoteClosed);
        }
        if option_index >= vote.options.len() {
            return Err(RoomError::InvalidOption(option_index));
        }
        if vote.has_voted(connection_id) {
            debug!(room_id = %room_id, vote_id = vote_id, connection_id = %connection_id, "Duplicate ballot dropped");
            return Err(RoomError::Duplicate);
        }

        vote.tally[option_index] += 1;
        vote.voters.insert(connection_id.to_string());

        debug!(
            room_id = %room_id,
            vote_id = vote_id,
            option_index = option_index,
            total = vote.total_votes(),
            "Ballot counted"
        );
        Ok(vote.clone())
    }

    pub fn close(room: &mut Room, vote_id: EntityId) -> Result<Vote, RoomError> {
        let room_id = room.id.clone();
        let vote = room
            .vote_mut(vote_id)
            .ok_or_else(|| RoomError::not_found(format!("vote {vote_id}")))?;
        if !vote.is_active {
            return Err(RoomError::VoteClosed);
        }

        vote.is_active = false;
        vote.ended_at = Some(Utc::now());

        info!(room_id = %room_id, vote_id = vote_id, tally = ?vote.tally, "Vote closed");
        Ok(vote.clone())
    }

    /// Removes a vote regardless of its state
    pub fn delete(room: &mut Room, vote_id: EntityId) -> Result<Vote, RoomError> {
        let position = room
            .votes
            .iter()
            .position(|v| v.id == vote_id)
            .ok_or_else(|| RoomError::not_found(format!("vote {vote_id}")))?;

        info!(room_id = %room.id, vote_id = vote_id, "Vote deleted");
        Ok(room.votes.remove(position))
    }
}
