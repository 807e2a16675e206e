use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use strum_macros::{Display, EnumString};

/// Identifier the transport assigns to a live connection
pub type ConnectionId = String;

/// Identifier for chat messages, notices, votes and questions inside a room
pub type EntityId = u64;

/// Nickname reserved for the room moderator
pub const ADMIN_NICKNAME: &str = "관리자";

/// A connection's identity within a room
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    pub connection_id: ConnectionId,
    pub nickname: String,
    pub is_online: bool,
    pub is_muted: bool,
    pub is_admin: bool,
    pub joined_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatKind {
    User,
    System,
}

/// A chat line. Immutable once appended to a room.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: EntityId,
    /// None for system-generated messages
    pub sender_id: Option<ConnectionId>,
    pub nickname: String,
    pub text: String,
    pub timestamp: DateTime<Utc>,
    pub kind: ChatKind,
}

/// A single-choice poll
///
/// `tally` is parallel to `options` and never changes length. A connection id
/// appears in `voters` at most once and only after its ballot was counted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vote {
    pub id: EntityId,
    pub title: String,
    pub options: Vec<String>,
    pub tally: Vec<u32>,
    pub voters: BTreeSet<ConnectionId>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    /// Present iff the vote is closed
    pub ended_at: Option<DateTime<Utc>>,
    pub author: String,
}

impl Vote {
    pub fn new(id: EntityId, title: String, options: Vec<String>, author: String) -> Self {
        let tally = vec![0; options.len()];
        Self {
            id,
            title,
            options,
            tally,
            voters: BTreeSet::new(),
            is_active: true,
            created_at: Utc::now(),
            ended_at: None,
            author,
        }
    }

    pub fn total_votes(&self) -> u32 {
        self.tally.iter().sum()
    }

    pub fn has_voted(&self, connection_id: &str) -> bool {
        self.voters.contains(connection_id)
    }

    /// Share of ballots per option in percent, all zero when nobody has voted
    pub fn percentages(&self) -> Vec<f64> {
        let total = self.total_votes();
        self.tally
            .iter()
            .map(|&count| {
                if total == 0 {
                    0.0
                } else {
                    f64::from(count) / f64::from(total) * 100.0
                }
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notice {
    pub id: EntityId,
    pub content: String,
    pub author: String,
    pub created_at: DateTime<Utc>,
}

/// Triage state of a question. Any state may move to any other.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, Default,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum QuestionStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: EntityId,
    pub text: String,
    pub author: String,
    pub status: QuestionStatus,
    pub created_at: DateTime<Utc>,
}

/// All state of one live room
#[derive(Debug, Clone)]
pub struct Room {
    pub id: String,
    pub kind: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub messages: Vec<ChatMessage>,
    pub votes: Vec<Vote>,
    pub notices: Vec<Notice>,
    pub questions: Vec<Question>,
    /// Kept in join order; presence snapshots rely on it
    pub participants: Vec<Participant>,
    next_id: EntityId,
}

impl Room {
    pub fn new(id: String, kind: String, created_at: DateTime<Utc>, ttl: Duration) -> Self {
        Self {
            id,
            kind,
            created_at,
            expires_at: created_at + ttl,
            messages: Vec::new(),
            votes: Vec::new(),
            notices: Vec::new(),
            questions: Vec::new(),
            participants: Vec::new(),
            next_id: 1,
        }
    }

    /// Hands out the next id for any entity in this room
    pub fn next_id(&mut self) -> EntityId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    pub fn participant(&self, connection_id: &str) -> Option<&Participant> {
        self.participants
            .iter()
            .find(|p| p.connection_id == connection_id)
    }

    pub fn participant_mut(&mut self, connection_id: &str) -> Option<&mut Participant> {
        self.participants
            .iter_mut()
            .find(|p| p.connection_id == connection_id)
    }

    pub fn vote_mut(&mut self, vote_id: EntityId) -> Option<&mut Vote> {
        self.votes.iter_mut().find(|v| v.id == vote_id)
    }

    pub fn online_connection_ids(&self) -> Vec<ConnectionId> {
        self.participants
            .iter()
            .filter(|p| p.is_online)
            .map(|p| p.connection_id.clone())
            .collect()
    }

    pub fn online_count(&self) -> usize {
        self.participants.iter().filter(|p| p.is_online).count()
    }
}
