#![allow(dead_code)]

use std::sync::Arc;

use liveroom::{config::RoomSettings, RoomCoordinator, WebsocketReceiveHandler};

use super::mocks::MockConnectionManager;

pub const ALICE: &str = "conn-alice";
pub const BOB: &str = "conn-bob";
pub const ADMIN: &str = "conn-admin";

// ============================================================================
// Test Setup Infrastructure
// ============================================================================

pub struct TestSetup {
    pub coordinator: Arc<RoomCoordinator>,
    pub mock_conn_manager: Arc<MockConnectionManager>,
    pub input_handler: WebsocketReceiveHandler,
    pub room_id: String,
    /// (connection id, nickname) in join order
    pub participants: Vec<(String, String)>,
}

pub struct TestSetupBuilder {
    participants: Vec<(String, String)>,
    settings: RoomSettings,
}

impl TestSetupBuilder {
    pub fn new() -> Self {
        Self {
            participants: vec![],
            settings: RoomSettings::default(),
        }
    }

    pub fn with_participants(mut self, participants: Vec<(&str, &str)>) -> Self {
        self.participants = participants
            .into_iter()
            .map(|(c, n)| (c.to_string(), n.to_string()))
            .collect();
        self
    }

    /// Alice, Bob and the moderator, joined in that order
    pub fn with_classroom(self) -> Self {
        self.with_participants(vec![(ALICE, "Alice"), (BOB, "Bob"), (ADMIN, "관리자")])
    }

    pub fn with_enforce_admin(mut self, enforce_admin: bool) -> Self {
        self.settings.enforce_admin = enforce_admin;
        self
    }

    pub fn with_room_ttl(mut self, room_ttl: chrono::Duration) -> Self {
        self.settings.room_ttl = room_ttl;
        self
    }

    /// Creates the room, connects and joins every participant, then clears the join traffic
    pub async fn build(self) -> TestSetup {
        let mock_conn_manager = Arc::new(MockConnectionManager::new());
        let coordinator = Arc::new(RoomCoordinator::new(
            mock_conn_manager.clone(),
            self.settings,
        ));
        let room = coordinator.create_room("default").await.unwrap();
        let input_handler = WebsocketReceiveHandler::new(coordinator.clone());

        let setup = TestSetup {
            coordinator,
            mock_conn_manager,
            input_handler,
            room_id: room.id,
            participants: self.participants,
        };

        for (connection_id, nickname) in &setup.participants {
            setup.connect(connection_id).await;
            setup.join(connection_id, nickname).await;
        }
        setup.clear_messages().await;
        setup
    }
}

impl TestSetup {
    pub fn connection_ids(&self) -> Vec<&str> {
        self.participants.iter().map(|(c, _)| c.as_str()).collect()
    }
}
