// Library crate for the live room server
// This file exposes the public API for integration tests

pub mod config;
pub mod engine;
pub mod room;
pub mod shared;
pub mod websockets;

// Re-export commonly used types for easier access in tests
pub use config::{RoomSettings, ServerConfig};
pub use room::{errors::RoomError, models::Room};
pub use shared::{AppError, AppState};
pub use websockets::{
    ConnectionManager, MessageHandler, MessageType, RoomCommand, RoomCoordinator,
    WebSocketMessage, WebsocketReceiveHandler,
};
