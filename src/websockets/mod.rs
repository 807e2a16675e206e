// Public API
pub use commands::{CommandParseError, RoomCommand};
pub use connection_manager::{ConnectionManager, InMemoryConnectionManager};
pub use delivery::Delivery;
pub use gateway::{RoomCoordinator, RoomSummary};
pub use handler::{websocket_handler, WebsocketReceiveHandler};
pub use messages::{MessageType, WebSocketMessage};
pub use socket::{MessageHandler, SocketError};

// Internal modules
mod commands;
mod connection_manager;
mod delivery;
mod gateway;
mod handler;
pub mod messages;
mod socket;
