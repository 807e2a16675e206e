use async_trait::async_trait;
use axum::{
    extract::{State, WebSocketUpgrade},
    response::Response,
};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::{
    commands::RoomCommand,
    gateway::RoomCoordinator,
    messages::WebSocketMessage,
    socket::{Connection, MessageHandler},
};
use crate::shared::AppState;

/// Message handler for receiving WebSocket messages from the client
pub struct WebsocketReceiveHandler {
    coordinator: Arc<RoomCoordinator>,
}

impl WebsocketReceiveHandler {
    pub fn new(coordinator: Arc<RoomCoordinator>) -> Self {
        Self { coordinator }
    }
}

#[async_trait]
impl MessageHandler for WebsocketReceiveHandler {
    async fn handle_message(&self, connection_id: &str, message: String) {
        debug!(connection_id = %connection_id, message = %message, "Received message");

        let ws_message = match serde_json::from_str::<WebSocketMessage>(&message) {
            Ok(ws_message) => ws_message,
            Err(e) => {
                warn!(
                    connection_id = %connection_id,
                    error = %e,
                    "Failed to parse WebSocket message"
                );
                return;
            }
        };

        match RoomCommand::try_from(ws_message) {
            Ok(command) => {
                self.coordinator
                    .handle_command(connection_id, command)
                    .await
            }
            Err(e) => {
                warn!(connection_id = %connection_id, error = %e, "Ignoring message");
            }
        }
    }
}

/// WebSocket endpoint. The client picks its room with `join_room` after connecting.
pub async fn websocket_handler(ws: WebSocketUpgrade, State(app_state): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| handle_websocket_connection(socket, app_state))
}

/// Handle the upgraded WebSocket connection
async fn handle_websocket_connection(socket: axum::extract::ws::WebSocket, app_state: AppState) {
    let connection_id = Uuid::new_v4().to_string();
    info!(connection_id = %connection_id, "WebSocket connection established");

    // Create the outbound channel (app -> client)
    let (outbound_sender, outbound_receiver) = mpsc::unbounded_channel::<String>();
    app_state
        .connection_manager
        .add_connection(connection_id.clone(), outbound_sender)
        .await;

    let message_handler = Arc::new(WebsocketReceiveHandler::new(app_state.coordinator.clone()));
    let connection = Connection::new(
        connection_id.clone(),
        Box::new(socket),
        outbound_receiver,
        message_handler,
    );

    match connection.run().await {
        Ok(()) => {
            info!(connection_id = %connection_id, "WebSocket connection closed cleanly");
        }
        Err(e) => {
            warn!(connection_id = %connection_id, error = ?e, "WebSocket connection error");
        }
    }

    // Cleanup: forget the sender, then leave whatever room the connection was in
    app_state
        .connection_manager
        .remove_connection(&connection_id)
        .await;
    app_state.coordinator.disconnect(&connection_id).await;
}
