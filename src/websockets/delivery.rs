use super::messages::WebSocketMessage;
use crate::room::models::ConnectionId;

/// An outgoing frame together with who should get it
#[derive(Debug, Clone)]
pub enum Delivery {
    /// Every online participant of the room at send time
    Broadcast {
        room_id: String,
        message: WebSocketMessage,
    },
    /// A single connection, whether or not it is still in a room
    Direct {
        connection_id: ConnectionId,
        message: WebSocketMessage,
    },
    /// Close the connection after everything already queued for it
    Detach { connection_id: ConnectionId },
}

impl Delivery {
    pub fn broadcast(room_id: &str, message: WebSocketMessage) -> Self {
        Delivery::Broadcast {
            room_id: room_id.to_string(),
            message: message.in_room(room_id),
        }
    }

    pub fn direct(connection_id: &str, message: WebSocketMessage) -> Self {
        Delivery::Direct {
            connection_id: connection_id.to_string(),
            message,
        }
    }

    pub fn detach(connection_id: &str) -> Self {
        Delivery::Detach {
            connection_id: connection_id.to_string(),
        }
    }
}
