// Per-room state transitions
//
// Each component owns one collection of a Room and returns the changed view;
// the gateway in `websockets` decides who hears about it.

pub use chat::ChatRelay;
pub use moderation::{BanOutcome, ModerationController, MuteOutcome};
pub use notices::NoticeBoard;
pub use presence::{ConnectionIndex, JoinOutcome, LeaveOutcome, PresenceTracker};
pub use questions::QuestionQueue;
pub use votes::VoteEngine;

pub mod chat;
pub mod moderation;
pub mod notices;
pub mod presence;
pub mod questions;
pub mod votes;
