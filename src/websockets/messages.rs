use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::room::models::{
    ChatMessage, ConnectionId, EntityId, Notice, Participant, Question, QuestionStatus, Vote,
};

/// Message types for WebSocket communication
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MessageType {
    // Client -> Server
    JoinRoom,
    SendChat,
    AddNotice,
    DeleteNotice,
    CreateVote,
    CastBallot,
    CloseVote,
    DeleteVote,
    SubmitQuestion,
    SetQuestionStatus,
    RequestQuestions,
    SetMuted,
    Ban,

    // Server -> Client
    RoomSnapshot,
    PresenceUpdate,
    ChatMessage,
    NoticesUpdate,
    VotesUpdate,
    QuestionsUpdate,
    NewQuestion,
    QuestionStatusChanged,
    MuteStatus,
    Banned,
    RoomExpired,
    Error,
}

/// Metadata for WebSocket messages
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebSocketMessageMeta {
    pub timestamp: DateTime<Utc>,
    /// Set on room broadcasts
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room_id: Option<String>,
}

/// Base structure for WebSocket messages
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebSocketMessage {
    #[serde(rename = "type")]
    pub message_type: MessageType,
    #[serde(default)]
    pub payload: serde_json::Value,
    pub meta: Option<WebSocketMessageMeta>,
}

/// Client-to-Server message payloads
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JoinRoomPayload {
    pub room_id: String,
    pub nickname: String,
    #[serde(default)]
    pub is_admin: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendChatPayload {
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddNoticePayload {
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoticeIdPayload {
    pub notice_id: EntityId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateVotePayload {
    pub title: String,
    pub options: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CastBallotPayload {
    pub vote_id: EntityId,
    pub option_index: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoteIdPayload {
    pub vote_id: EntityId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitQuestionPayload {
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetQuestionStatusPayload {
    pub question_id: EntityId,
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetMutedPayload {
    pub target_id: ConnectionId,
    pub muted: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetPayload {
    pub target_id: ConnectionId,
}

/// Server-to-Client message payloads
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomSnapshotPayload {
    pub room_id: String,
    /// The receiving connection's own id, so clients can recognise themselves
    pub connection_id: ConnectionId,
    pub notices: Vec<Notice>,
    pub votes: Vec<Vote>,
    pub questions: Vec<Question>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PresenceUpdatePayload {
    pub participants: Vec<Participant>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoticesUpdatePayload {
    pub notices: Vec<Notice>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VotesUpdatePayload {
    pub votes: Vec<Vote>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionsUpdatePayload {
    pub questions: Vec<Question>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionStatusChangedPayload {
    pub id: EntityId,
    pub status: QuestionStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MuteStatusPayload {
    pub muted: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomPayload {
    pub room_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorPayload {
    pub message: String,
}

/// Helper functions for creating messages
impl WebSocketMessage {
    pub fn new(message_type: MessageType, payload: serde_json::Value) -> Self {
        Self {
            message_type,
            payload,
            meta: Some(WebSocketMessageMeta {
                timestamp: Utc::now(),
                room_id: None,
            }),
        }
    }

    /// Tags the envelope with the room it is broadcast to
    pub fn in_room(mut self, room_id: &str) -> Self {
        let meta = self.meta.get_or_insert_with(|| WebSocketMessageMeta {
            timestamp: Utc::now(),
            room_id: None,
        });
        meta.room_id = Some(room_id.to_string());
        self
    }

    fn with_payload<P: Serialize>(message_type: MessageType, payload: P) -> Self {
        // Payloads are plain data with string keys, serialization cannot fail
        Self::new(
            message_type,
            serde_json::to_value(payload).unwrap_or_default(),
        )
    }

    /// Create a ROOM_SNAPSHOT message, sent once to a joining connection
    pub fn room_snapshot(
        room_id: String,
        connection_id: ConnectionId,
        notices: Vec<Notice>,
        votes: Vec<Vote>,
        questions: Vec<Question>,
    ) -> Self {
        Self::with_payload(
            MessageType::RoomSnapshot,
            RoomSnapshotPayload {
                room_id,
                connection_id,
                notices,
                votes,
                questions,
            },
        )
    }

    pub fn presence_update(participants: Vec<Participant>) -> Self {
        Self::with_payload(
            MessageType::PresenceUpdate,
            PresenceUpdatePayload { participants },
        )
    }

    /// The chat line itself is the payload
    pub fn chat_message(message: &ChatMessage) -> Self {
        Self::with_payload(MessageType::ChatMessage, message)
    }

    pub fn notices_update(notices: Vec<Notice>) -> Self {
        Self::with_payload(MessageType::NoticesUpdate, NoticesUpdatePayload { notices })
    }

    pub fn votes_update(votes: Vec<Vote>) -> Self {
        Self::with_payload(MessageType::VotesUpdate, VotesUpdatePayload { votes })
    }

    pub fn questions_update(questions: Vec<Question>) -> Self {
        Self::with_payload(
            MessageType::QuestionsUpdate,
            QuestionsUpdatePayload { questions },
        )
    }

    pub fn new_question(question: &Question) -> Self {
        Self::with_payload(MessageType::NewQuestion, question)
    }

    pub fn question_status_changed(id: EntityId, status: QuestionStatus) -> Self {
        Self::with_payload(
            MessageType::QuestionStatusChanged,
            QuestionStatusChangedPayload { id, status },
        )
    }

    pub fn mute_status(muted: bool) -> Self {
        Self::with_payload(MessageType::MuteStatus, MuteStatusPayload { muted })
    }

    pub fn banned(room_id: String) -> Self {
        Self::with_payload(MessageType::Banned, RoomPayload { room_id })
    }

    pub fn room_expired(room_id: String) -> Self {
        Self::with_payload(MessageType::RoomExpired, RoomPayload { room_id })
    }

    pub fn error(message: String) -> Self {
        Self::with_payload(MessageType::Error, ErrorPayload { message })
    }
}
