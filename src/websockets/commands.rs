use serde::de::DeserializeOwned;
use thiserror::Error;

use super::messages::{
    AddNoticePayload, CastBallotPayload, CreateVotePayload, JoinRoomPayload, MessageType,
    NoticeIdPayload, SendChatPayload, SetMutedPayload, SetQuestionStatusPayload,
    SubmitQuestionPayload, TargetPayload, VoteIdPayload, WebSocketMessage,
};
use crate::room::models::{ConnectionId, EntityId, ADMIN_NICKNAME};

/// Everything a connection can ask of its room
#[derive(Debug, Clone, PartialEq)]
pub enum RoomCommand {
    JoinRoom {
        room_id: String,
        nickname: String,
        is_admin: bool,
    },
    SendChat {
        text: String,
    },
    AddNotice {
        content: String,
    },
    DeleteNotice {
        notice_id: EntityId,
    },
    CreateVote {
        title: String,
        options: Vec<String>,
    },
    CastBallot {
        vote_id: EntityId,
        option_index: usize,
    },
    CloseVote {
        vote_id: EntityId,
    },
    DeleteVote {
        vote_id: EntityId,
    },
    SubmitQuestion {
        text: String,
    },
    SetQuestionStatus {
        question_id: EntityId,
        status: String,
    },
    RequestQuestions,
    SetMuted {
        target_id: ConnectionId,
        muted: bool,
    },
    Ban {
        target_id: ConnectionId,
    },
}

#[derive(Debug, Error)]
pub enum CommandParseError {
    #[error("Message type {0:?} is not a client command")]
    NotACommand(MessageType),

    #[error("Invalid payload for {message_type:?}: {source}")]
    InvalidPayload {
        message_type: MessageType,
        source: serde_json::Error,
    },
}

fn payload<P: DeserializeOwned>(message: WebSocketMessage) -> Result<P, CommandParseError> {
    let message_type = message.message_type;
    serde_json::from_value(message.payload)
        .map_err(|source| CommandParseError::InvalidPayload {
            message_type,
            source,
        })
}

impl TryFrom<WebSocketMessage> for RoomCommand {
    type Error = CommandParseError;

    fn try_from(message: WebSocketMessage) -> Result<Self, Self::Error> {
        let command = match message.message_type {
            MessageType::JoinRoom => {
                let p: JoinRoomPayload = payload(message)?;
                RoomCommand::JoinRoom {
                    is_admin: p.is_admin || p.nickname.trim() == ADMIN_NICKNAME,
                    room_id: p.room_id,
                    nickname: p.nickname,
                }
            }
            MessageType::SendChat => {
                let p: SendChatPayload = payload(message)?;
                RoomCommand::SendChat { text: p.text }
            }
            MessageType::AddNotice => {
                let p: AddNoticePayload = payload(message)?;
                RoomCommand::AddNotice { content: p.content }
            }
            MessageType::DeleteNotice => {
                let p: NoticeIdPayload = payload(message)?;
                RoomCommand::DeleteNotice {
                    notice_id: p.notice_id,
                }
            }
            MessageType::CreateVote => {
                let p: CreateVotePayload = payload(message)?;
                RoomCommand::CreateVote {
                    title: p.title,
                    options: p.options,
                }
            }
            MessageType::CastBallot => {
                let p: CastBallotPayload = payload(message)?;
                RoomCommand::CastBallot {
                    vote_id: p.vote_id,
                    option_index: p.option_index,
                }
            }
            MessageType::CloseVote => {
                let p: VoteIdPayload = payload(message)?;
                RoomCommand::CloseVote { vote_id: p.vote_id }
            }
            MessageType::DeleteVote => {
                let p: VoteIdPayload = payload(message)?;
                RoomCommand::DeleteVote { vote_id: p.vote_id }
            }
            MessageType::SubmitQuestion => {
                let p: SubmitQuestionPayload = payload(message)?;
                RoomCommand::SubmitQuestion { text: p.text }
            }
            MessageType::SetQuestionStatus => {
                let p: SetQuestionStatusPayload = payload(message)?;
                RoomCommand::SetQuestionStatus {
                    question_id: p.question_id,
                    status: p.status,
                }
            }
            MessageType::RequestQuestions => RoomCommand::RequestQuestions,
            MessageType::SetMuted => {
                let p: SetMutedPayload = payload(message)?;
                RoomCommand::SetMuted {
                    target_id: p.target_id,
                    muted: p.muted,
                }
            }
            MessageType::Ban => {
                let p: TargetPayload = payload(message)?;
                RoomCommand::Ban {
                    target_id: p.target_id,
                }
            }
            other => return Err(CommandParseError::NotACommand(other)),
        };
        Ok(command)
    }
}

impl RoomCommand {
    /// Commands reserved for the room moderator
    pub fn requires_admin(&self) -> bool {
        matches!(
            self,
            RoomCommand::AddNotice { .. }
                | RoomCommand::DeleteNotice { .. }
                | RoomCommand::CreateVote { .. }
                | RoomCommand::CloseVote { .. }
                | RoomCommand::DeleteVote { .. }
                | RoomCommand::SetQuestionStatus { .. }
                | RoomCommand::SetMuted { .. }
                | RoomCommand::Ban { .. }
        )
    }

    pub fn name(&self) -> &'static str {
        match self {
            RoomCommand::JoinRoom { .. } => "join_room",
            RoomCommand::SendChat { .. } => "send_chat",
            RoomCommand::AddNotice { .. } => "add_notice",
            RoomCommand::DeleteNotice { .. } => "delete_notice",
            RoomCommand::CreateVote { .. } => "create_vote",
            RoomCommand::CastBallot { .. } => "cast_ballot",
            RoomCommand::CloseVote { .. } => "close_vote",
            RoomCommand::DeleteVote { .. } => "delete_vote",
            RoomCommand::SubmitQuestion { .. } => "submit_question",
            RoomCommand::SetQuestionStatus { .. } => "set_question_status",
            RoomCommand::RequestQuestions => "request_questions",
            RoomCommand::SetMuted { .. } => "set_muted",
            RoomCommand::Ban { .. } => "ban",
        }
    }
}
