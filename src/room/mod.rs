// Public API - what other modules can use
pub use cleanup_task::start_cleanup_task;
pub use handlers::{create_room, get_room};

mod cleanup_task;
pub mod errors;
mod handlers;
pub mod models;
pub mod store;
pub mod types;
