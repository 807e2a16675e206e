#![allow(dead_code)]

use serde_json::{json, Value};

use liveroom::websockets::{ConnectionManager, MessageHandler, MessageType, WebSocketMessage};

use super::setup::TestSetup;

// ============================================================================
// Action Helpers
// ============================================================================

impl TestSetup {
    /// Send a WebSocket message through the same entry point the socket uses
    pub async fn send_message(&self, connection_id: &str, message: WebSocketMessage) {
        let message_json = serde_json::to_string(&message).unwrap();
        self.input_handler
            .handle_message(connection_id, message_json)
            .await;
    }

    pub async fn send(&self, connection_id: &str, message_type: MessageType, payload: Value) {
        self.send_message(connection_id, WebSocketMessage::new(message_type, payload))
            .await;
    }

    /// Register a new transport connection without joining a room
    pub async fn connect(&self, connection_id: &str) {
        self.mock_conn_manager.add_connected(connection_id).await;
    }

    /// Transport closed, as the socket handler reports it
    pub async fn disconnect(&self, connection_id: &str) {
        self.mock_conn_manager.remove_connection(connection_id).await;
        self.coordinator.disconnect(connection_id).await;
    }

    /// Clear all recorded messages
    pub async fn clear_messages(&self) {
        self.mock_conn_manager.clear_messages().await;
    }

    // ============================================================================
    // Convenience Action Methods
    // ============================================================================

    pub async fn join(&self, connection_id: &str, nickname: &str) {
        self.join_room(connection_id, &self.room_id, nickname).await;
    }

    pub async fn join_room(&self, connection_id: &str, room_id: &str, nickname: &str) {
        self.send(
            connection_id,
            MessageType::JoinRoom,
            json!({ "room_id": room_id, "nickname": nickname }),
        )
        .await;
    }

    pub async fn send_chat(&self, connection_id: &str, text: &str) {
        self.send(connection_id, MessageType::SendChat, json!({ "text": text }))
            .await;
    }

    pub async fn add_notice(&self, connection_id: &str, content: &str) {
        self.send(
            connection_id,
            MessageType::AddNotice,
            json!({ "content": content }),
        )
        .await;
    }

    pub async fn delete_notice(&self, connection_id: &str, notice_id: u64) {
        self.send(
            connection_id,
            MessageType::DeleteNotice,
            json!({ "notice_id": notice_id }),
        )
        .await;
    }

    pub async fn create_vote(&self, connection_id: &str, title: &str, options: &[&str]) {
        self.send(
            connection_id,
            MessageType::CreateVote,
            json!({ "title": title, "options": options }),
        )
        .await;
    }

    pub async fn cast_ballot(&self, connection_id: &str, vote_id: u64, option_index: usize) {
        self.send(
            connection_id,
            MessageType::CastBallot,
            json!({ "vote_id": vote_id, "option_index": option_index }),
        )
        .await;
    }

    pub async fn close_vote(&self, connection_id: &str, vote_id: u64) {
        self.send(
            connection_id,
            MessageType::CloseVote,
            json!({ "vote_id": vote_id }),
        )
        .await;
    }

    pub async fn delete_vote(&self, connection_id: &str, vote_id: u64) {
        self.send(
            connection_id,
            MessageType::DeleteVote,
            json!({ "vote_id": vote_id }),
        )
        .await;
    }

    pub async fn submit_question(&self, connection_id: &str, text: &str) {
        self.send(
            connection_id,
            MessageType::SubmitQuestion,
            json!({ "text": text }),
        )
        .await;
    }

    pub async fn set_question_status(&self, connection_id: &str, question_id: u64, status: &str) {
        self.send(
            connection_id,
            MessageType::SetQuestionStatus,
            json!({ "question_id": question_id, "status": status }),
        )
        .await;
    }

    pub async fn set_muted(&self, connection_id: &str, target_id: &str, muted: bool) {
        self.send(
            connection_id,
            MessageType::SetMuted,
            json!({ "target_id": target_id, "muted": muted }),
        )
        .await;
    }

    pub async fn ban(&self, connection_id: &str, target_id: &str) {
        self.send(
            connection_id,
            MessageType::Ban,
            json!({ "target_id": target_id }),
        )
        .await;
    }
}
