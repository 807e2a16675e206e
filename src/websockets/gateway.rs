use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

use super::{
    commands::RoomCommand, connection_manager::ConnectionManager, delivery::Delivery,
    messages::WebSocketMessage,
};
use crate::{
    config::RoomSettings,
    engine::{
        BanOutcome, ChatRelay, ConnectionIndex, LeaveOutcome, ModerationController, NoticeBoard,
        PresenceTracker, QuestionQueue, VoteEngine,
    },
    room::{
        errors::RoomError,
        models::{Notice, Room},
        store::RoomStore,
    },
};

/// Public view of a room for the HTTP endpoints
#[derive(Debug, Clone, PartialEq)]
pub struct RoomSummary {
    pub id: String,
    pub kind: String,
    pub participant_count: usize,
    pub online_count: usize,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub latest_notice: Option<Notice>,
}

impl RoomSummary {
    fn of(room: &Room) -> Self {
        Self {
            id: room.id.clone(),
            kind: room.kind.clone(),
            participant_count: room.participants.len(),
            online_count: room.online_count(),
            created_at: room.created_at,
            expires_at: room.expires_at,
            latest_notice: NoticeBoard::latest(room).cloned(),
        }
    }
}

#[derive(Debug, Default)]
struct CoordinatorState {
    store: RoomStore,
    connections: ConnectionIndex,
}

/// Applies every command to its room and fans the result out
///
/// One lock guards all rooms and is held until a command's frames are queued,
/// so each command runs to completion and every member of a room observes
/// broadcasts in the order the commands were applied.
pub struct RoomCoordinator {
    state: Mutex<CoordinatorState>,
    connection_manager: Arc<dyn ConnectionManager>,
    settings: RoomSettings,
}

impl RoomCoordinator {
    pub fn new(connection_manager: Arc<dyn ConnectionManager>, settings: RoomSettings) -> Self {
        Self {
            state: Mutex::new(CoordinatorState::default()),
            connection_manager,
            settings,
        }
    }

    #[instrument(skip(self))]
    pub async fn create_room(&self, kind: &str) -> Result<RoomSummary, RoomError> {
        let mut state = self.state.lock().await;
        let room = state
            .store
            .create_room(kind, self.settings.room_ttl, Utc::now())?;
        Ok(RoomSummary::of(room))
    }

    /// None for unknown and expired rooms
    pub async fn room_summary(&self, room_id: &str) -> Option<RoomSummary> {
        let mut state = self.state.lock().await;
        let mut deliveries = Vec::new();
        Self::sweep(&mut state, Utc::now(), &mut deliveries);
        let summary = state.store.get_room(room_id).map(RoomSummary::of);
        self.deliver(&state, deliveries).await;
        summary
    }

    pub async fn handle_command(&self, connection_id: &str, command: RoomCommand) {
        let command_name = command.name();
        let mut state = self.state.lock().await;
        let mut deliveries = Vec::new();
        Self::sweep(&mut state, Utc::now(), &mut deliveries);

        match self.apply(&mut state, connection_id, command) {
            Ok(produced) => deliveries.extend(produced),
            Err(err) if err.is_reported() => {
                debug!(
                    connection_id = %connection_id,
                    command = command_name,
                    error = %err,
                    "Command rejected"
                );
                deliveries.push(Delivery::direct(
                    connection_id,
                    WebSocketMessage::error(err.to_string()),
                ));
            }
            Err(err) => {
                debug!(
                    connection_id = %connection_id,
                    command = command_name,
                    error = %err,
                    "Command dropped"
                );
            }
        }

        self.deliver(&state, deliveries).await;
    }

    /// Transport reported the connection gone
    pub async fn disconnect(&self, connection_id: &str) {
        let mut state = self.state.lock().await;
        let mut deliveries = Vec::new();
        Self::sweep(&mut state, Utc::now(), &mut deliveries);
        deliveries.extend(Self::leave_current_room(&mut state, connection_id));
        self.deliver(&state, deliveries).await;
    }

    pub async fn expire_rooms(&self) -> usize {
        self.expire_rooms_at(Utc::now()).await
    }

    /// Deletes rooms whose expiry is at or before `now` and detaches their connections
    pub async fn expire_rooms_at(&self, now: DateTime<Utc>) -> usize {
        let mut state = self.state.lock().await;
        let mut deliveries = Vec::new();
        let expired = Self::sweep(&mut state, now, &mut deliveries);
        self.deliver(&state, deliveries).await;
        expired
    }

    /// Runs `inspect` against a live room
    pub async fn with_room<R>(&self, room_id: &str, inspect: impl FnOnce(&Room) -> R) -> Option<R> {
        let state = self.state.lock().await;
        state.store.get_room(room_id).map(inspect)
    }

    pub async fn room_of(&self, connection_id: &str) -> Option<String> {
        let state = self.state.lock().await;
        state.connections.room_of(connection_id).map(str::to_string)
    }

    pub async fn room_count(&self) -> usize {
        self.state.lock().await.store.len()
    }

    fn sweep(state: &mut CoordinatorState, now: DateTime<Utc>, deliveries: &mut Vec<Delivery>) -> usize {
        let expired = state.store.take_expired(now);
        for room in &expired {
            for connection_id in state.connections.unbind_room(&room.id) {
                deliveries.push(Delivery::direct(
                    &connection_id,
                    WebSocketMessage::room_expired(room.id.clone()),
                ));
                deliveries.push(Delivery::detach(&connection_id));
            }
        }
        expired.len()
    }

    fn apply(
        &self,
        state: &mut CoordinatorState,
        connection_id: &str,
        command: RoomCommand,
    ) -> Result<Vec<Delivery>, RoomError> {
        let admin_only = command.requires_admin();

        match command {
            RoomCommand::JoinRoom {
                room_id,
                nickname,
                is_admin,
            } => Self::join(state, connection_id, &room_id, &nickname, is_admin),

            RoomCommand::SendChat { text } => {
                let room = self.enter(state, connection_id, admin_only)?;
                let message = ChatRelay::send(room, connection_id, &text)?;
                Ok(vec![Delivery::broadcast(
                    &room.id,
                    WebSocketMessage::chat_message(&message),
                )])
            }

            RoomCommand::AddNotice { content } => {
                let room = self.enter(state, connection_id, admin_only)?;
                let author = Self::nickname_of(room, connection_id);
                let (_, announcement) = NoticeBoard::add(room, &author, &content)?;
                Ok(vec![
                    Delivery::broadcast(
                        &room.id,
                        WebSocketMessage::notices_update(room.notices.clone()),
                    ),
                    Delivery::broadcast(&room.id, WebSocketMessage::chat_message(&announcement)),
                ])
            }

            RoomCommand::DeleteNotice { notice_id } => {
                let room = self.enter(state, connection_id, admin_only)?;
                NoticeBoard::remove(room, notice_id);
                Ok(vec![Delivery::broadcast(
                    &room.id,
                    WebSocketMessage::notices_update(room.notices.clone()),
                )])
            }

            RoomCommand::CreateVote { title, options } => {
                let room = self.enter(state, connection_id, admin_only)?;
                let author = Self::nickname_of(room, connection_id);
                let (_, announcement) = VoteEngine::create(room, &author, &title, &options)?;
                Ok(vec![
                    Delivery::broadcast(&room.id, WebSocketMessage::votes_update(room.votes.clone())),
                    Delivery::broadcast(&room.id, WebSocketMessage::chat_message(&announcement)),
                ])
            }

            RoomCommand::CastBallot {
                vote_id,
                option_index,
            } => {
                let room = self.enter(state, connection_id, admin_only)?;
                VoteEngine::cast_ballot(room, vote_id, connection_id, option_index)?;
                Ok(vec![Delivery::broadcast(
                    &room.id,
                    WebSocketMessage::votes_update(room.votes.clone()),
                )])
            }

            RoomCommand::CloseVote { vote_id } => {
                let room = self.enter(state, connection_id, admin_only)?;
                VoteEngine::close(room, vote_id)?;
                Ok(vec![Delivery::broadcast(
                    &room.id,
                    WebSocketMessage::votes_update(room.votes.clone()),
                )])
            }

            RoomCommand::DeleteVote { vote_id } => {
                let room = self.enter(state, connection_id, admin_only)?;
                VoteEngine::delete(room, vote_id)?;
                Ok(vec![Delivery::broadcast(
                    &room.id,
                    WebSocketMessage::votes_update(room.votes.clone()),
                )])
            }

            RoomCommand::SubmitQuestion { text } => {
                let room = self.enter(state, connection_id, admin_only)?;
                let author = Self::nickname_of(room, connection_id);
                let question = QuestionQueue::submit(room, &author, &text)?;
                Ok(vec![
                    Delivery::broadcast(
                        &room.id,
                        WebSocketMessage::questions_update(room.questions.clone()),
                    ),
                    Delivery::broadcast(&room.id, WebSocketMessage::new_question(&question)),
                ])
            }

            RoomCommand::SetQuestionStatus {
                question_id,
                status,
            } => {
                let room = self.enter(state, connection_id, admin_only)?;
                let status = QuestionQueue::parse_status(&status)?;
                let question = QuestionQueue::set_status(room, question_id, status)?;
                Ok(vec![
                    Delivery::broadcast(
                        &room.id,
                        WebSocketMessage::questions_update(room.questions.clone()),
                    ),
                    Delivery::broadcast(
                        &room.id,
                        WebSocketMessage::question_status_changed(question.id, question.status),
                    ),
                ])
            }

            RoomCommand::RequestQuestions => {
                let room = self.enter(state, connection_id, admin_only)?;
                Ok(vec![Delivery::direct(
                    connection_id,
                    WebSocketMessage::questions_update(room.questions.clone()),
                )])
            }

            RoomCommand::SetMuted { target_id, muted } => {
                let room = self.enter(state, connection_id, admin_only)?;
                let room_id = room.id.clone();
                let outcome = ModerationController::set_muted(room, &target_id, muted)?;

                let mut deliveries = vec![Delivery::broadcast(
                    &room_id,
                    WebSocketMessage::chat_message(&outcome.announcement),
                )];
                if Self::is_bound_to(state, &outcome.target_id, &room_id) {
                    deliveries.push(Delivery::direct(
                        &outcome.target_id,
                        WebSocketMessage::mute_status(outcome.muted),
                    ));
                }
                deliveries.push(Delivery::broadcast(
                    &room_id,
                    WebSocketMessage::presence_update(outcome.participants),
                ));
                Ok(deliveries)
            }

            RoomCommand::Ban { target_id } => {
                let room = self.enter(state, connection_id, admin_only)?;
                let room_id = room.id.clone();
                let outcome = ModerationController::ban(room, &target_id)?;

                // A stale offline entry may belong to a connection now in another room
                let bound_here = Self::is_bound_to(state, &target_id, &room_id);
                if bound_here {
                    state.connections.unbind(&target_id);
                }

                let mut deliveries = Vec::new();
                match outcome {
                    BanOutcome::Banned { participants, .. } => {
                        deliveries.push(Delivery::broadcast(
                            &room_id,
                            WebSocketMessage::presence_update(participants),
                        ));
                    }
                    BanOutcome::RoomEmptied { .. } => {
                        info!(room_id = %room_id, "Last participant banned, deleting room");
                        state.store.delete_room(&room_id);
                        state.connections.unbind_room(&room_id);
                    }
                }
                if bound_here {
                    deliveries.push(Delivery::direct(
                        &target_id,
                        WebSocketMessage::banned(room_id),
                    ));
                    deliveries.push(Delivery::detach(&target_id));
                }
                Ok(deliveries)
            }
        }
    }

    fn is_bound_to(state: &CoordinatorState, connection_id: &str, room_id: &str) -> bool {
        state.connections.room_of(connection_id) == Some(room_id)
    }

    /// Resolves the room the connection has joined, checking moderator rights
    fn enter<'a>(
        &self,
        state: &'a mut CoordinatorState,
        connection_id: &str,
        admin_only: bool,
    ) -> Result<&'a mut Room, RoomError> {
        let room_id = state
            .connections
            .room_of(connection_id)
            .ok_or_else(|| RoomError::not_found(format!("room of connection {connection_id}")))?;
        let room = state
            .store
            .get_room_mut(room_id)
            .ok_or_else(|| RoomError::not_found(format!("room {room_id}")))?;
        let actor = room
            .participant(connection_id)
            .ok_or_else(|| RoomError::not_found(format!("participant {connection_id}")))?;

        if admin_only && self.settings.enforce_admin && !actor.is_admin {
            warn!(
                room_id = %room.id,
                connection_id = %connection_id,
                "Non-moderator attempted a moderator command"
            );
            return Err(RoomError::PermissionDenied);
        }
        Ok(room)
    }

    fn nickname_of(room: &Room, connection_id: &str) -> String {
        room.participant(connection_id)
            .map(|p| p.nickname.clone())
            .unwrap_or_default()
    }

    fn join(
        state: &mut CoordinatorState,
        connection_id: &str,
        room_id: &str,
        nickname: &str,
        is_admin: bool,
    ) -> Result<Vec<Delivery>, RoomError> {
        if state.store.get_room(room_id).is_none() {
            debug!(room_id = %room_id, connection_id = %connection_id, "Join for unknown room");
            return Ok(vec![Delivery::direct(
                connection_id,
                WebSocketMessage::error(format!("Room {room_id} does not exist")),
            )]);
        }
        if nickname.trim().is_empty() {
            return Err(RoomError::validation("nickname is empty"));
        }

        let mut deliveries = Vec::new();
        let switching = state
            .connections
            .room_of(connection_id)
            .is_some_and(|current| current != room_id);
        if switching {
            deliveries.extend(Self::leave_current_room(state, connection_id));
        }

        let room = state
            .store
            .get_room_mut(room_id)
            .ok_or_else(|| RoomError::not_found(format!("room {room_id}")))?;
        let outcome = PresenceTracker::join(room, connection_id, nickname, is_admin)?;

        deliveries.push(Delivery::direct(
            connection_id,
            WebSocketMessage::room_snapshot(
                room.id.clone(),
                connection_id.to_string(),
                room.notices.clone(),
                room.votes.clone(),
                room.questions.clone(),
            ),
        ));
        if room.participant(connection_id).is_some_and(|p| p.is_muted) {
            deliveries.push(Delivery::direct(
                connection_id,
                WebSocketMessage::mute_status(true),
            ));
        }
        deliveries.push(Delivery::broadcast(
            room_id,
            WebSocketMessage::presence_update(outcome.participants),
        ));
        deliveries.push(Delivery::broadcast(
            room_id,
            WebSocketMessage::chat_message(&outcome.announcement),
        ));

        state.connections.bind(connection_id, room_id);
        Ok(deliveries)
    }

    fn leave_current_room(state: &mut CoordinatorState, connection_id: &str) -> Vec<Delivery> {
        let Some(room_id) = state.connections.unbind(connection_id) else {
            return Vec::new();
        };
        let Some(room) = state.store.get_room_mut(&room_id) else {
            return Vec::new();
        };

        match PresenceTracker::leave(room, connection_id) {
            LeaveOutcome::Left {
                participants,
                announcement,
            } => vec![
                Delivery::broadcast(&room_id, WebSocketMessage::presence_update(participants)),
                Delivery::broadcast(&room_id, WebSocketMessage::chat_message(&announcement)),
            ],
            LeaveOutcome::RoomEmptied => {
                info!(room_id = %room_id, "Last participant left, deleting room");
                state.store.delete_room(&room_id);
                state.connections.unbind_room(&room_id);
                Vec::new()
            }
            LeaveOutcome::NotPresent => Vec::new(),
        }
    }

    async fn deliver(&self, state: &CoordinatorState, deliveries: Vec<Delivery>) {
        for delivery in deliveries {
            match delivery {
                Delivery::Broadcast { room_id, message } => {
                    let Some(room) = state.store.get_room(&room_id) else {
                        debug!(room_id = %room_id, "Room gone, broadcast skipped");
                        continue;
                    };
                    if let Some(json) = Self::encode(&message) {
                        self.connection_manager
                            .send_to_connections(&room.online_connection_ids(), &json)
                            .await;
                    }
                }
                Delivery::Direct {
                    connection_id,
                    message,
                } => {
                    if let Some(json) = Self::encode(&message) {
                        self.connection_manager
                            .send_to_connection(&connection_id, &json)
                            .await;
                    }
                }
                Delivery::Detach { connection_id } => {
                    debug!(connection_id = %connection_id, "Detaching connection");
                    self.connection_manager
                        .remove_connection(&connection_id)
                        .await;
                }
            }
        }
    }

    fn encode(message: &WebSocketMessage) -> Option<String> {
        serde_json::to_string(message)
            .map_err(|e| warn!(error = %e, "Failed to serialize message"))
            .ok()
    }
}
