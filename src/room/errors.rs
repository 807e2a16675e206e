use thiserror::Error;

/// Failures of room state transitions
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoomError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("You are muted and cannot send messages")]
    Muted,

    #[error("Ballot already cast")]
    Duplicate,

    #[error("Vote is closed")]
    VoteClosed,

    #[error("Option index {0} is out of range")]
    InvalidOption(usize),

    #[error("Only the room moderator can do that")]
    PermissionDenied,

    #[error("No room identifiers left")]
    CapacityExhausted,
}

impl RoomError {
    pub fn not_found(what: impl Into<String>) -> Self {
        RoomError::NotFound(what.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        RoomError::Validation(msg.into())
    }

    /// Whether the originating connection should be told about this rejection.
    /// Everything else is dropped silently.
    pub fn is_reported(&self) -> bool {
        matches!(
            self,
            RoomError::Validation(_) | RoomError::Muted | RoomError::PermissionDenied
        )
    }
}
