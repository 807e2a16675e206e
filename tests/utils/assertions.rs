//! Test assertion helpers - fluent API for verifying test expectations
#![allow(dead_code)] // Test utilities may not all be used in every test

use serde_json::Value;

use liveroom::{
    room::models::{Participant, Question, Vote},
    websockets::{MessageType, WebSocketMessage},
};

use super::setup::TestSetup;

// ============================================================================
// Assertion Helpers
// ============================================================================

pub struct MessageAssertion<'a> {
    setup: &'a TestSetup,
    connections: Vec<&'a str>,
}

impl<'a> MessageAssertion<'a> {
    /// Create an assertion for every participant the setup joined
    pub fn for_all(setup: &'a TestSetup) -> Self {
        let connections = setup.connection_ids();
        Self { setup, connections }
    }

    pub fn for_connections(setup: &'a TestSetup, connections: Vec<&'a str>) -> Self {
        Self { setup, connections }
    }

    /// Assert that each connection's next frame has the given type (consumes it)
    pub async fn received_message_type(self, expected_type: MessageType) -> MessageContent {
        let mut messages = vec![];

        for connection in &self.connections {
            let raw = self
                .setup
                .mock_conn_manager
                .consume_message_for(connection)
                .await;
            let raw = raw.unwrap_or_else(|| {
                panic!("{connection} should have received {expected_type:?}")
            });

            let msg: WebSocketMessage = serde_json::from_str(&raw).unwrap();
            assert_eq!(
                msg.message_type, expected_type,
                "{connection} received wrong message type"
            );
            messages.push(msg);
        }

        // Everyone in the room sees the same broadcast
        let first_payload = &messages[0].payload;
        for (i, msg) in messages.iter().enumerate().skip(1) {
            assert_eq!(
                &msg.payload, first_payload,
                "{} payload differs from {}",
                self.connections[i], self.connections[0]
            );
        }

        MessageContent {
            payload: messages[0].payload.clone(),
        }
    }

    /// Assert that connections received the given frames in order (consumes them)
    pub async fn received_message_sequence(
        self,
        expected_types: Vec<MessageType>,
    ) -> Vec<MessageContent> {
        let mut result_messages = vec![];

        for (n, connection) in self.connections.iter().enumerate() {
            for (i, expected_type) in expected_types.iter().enumerate() {
                let raw = self
                    .setup
                    .mock_conn_manager
                    .consume_message_for(connection)
                    .await
                    .unwrap_or_else(|| {
                        panic!("{connection} is missing message {i} ({expected_type:?})")
                    });
                let msg: WebSocketMessage = serde_json::from_str(&raw).unwrap();

                assert_eq!(
                    msg.message_type, *expected_type,
                    "{} message {} has wrong type: expected {:?}, got {:?}",
                    connection, i, expected_type, msg.message_type
                );

                // Only collect messages from the first connection to avoid duplicates
                if n == 0 {
                    result_messages.push(MessageContent {
                        payload: msg.payload,
                    });
                }
            }
        }

        result_messages
    }

    /// Assert that connections have nothing left to read
    pub async fn received_no_messages(self) {
        for connection in &self.connections {
            let messages = self
                .setup
                .mock_conn_manager
                .get_messages_for(connection)
                .await;
            assert!(
                messages.is_empty(),
                "{connection} should not have received any messages, got {messages:?}"
            );
        }
    }

    /// Count unread frames of a type for one connection (non-consuming)
    pub async fn count_message_type(&self, connection: &str, msg_type: MessageType) -> usize {
        self.setup
            .mock_conn_manager
            .get_messages_for(connection)
            .await
            .iter()
            .filter_map(|raw| serde_json::from_str::<WebSocketMessage>(raw).ok())
            .filter(|msg| msg.message_type == msg_type)
            .count()
    }
}

// ============================================================================
// Message Content Assertions
// ============================================================================

pub struct MessageContent {
    pub payload: Value,
}

impl MessageContent {
    /// Chat line with the given text
    pub fn with_text(self, expected_text: &str) -> Self {
        assert_eq!(self.payload["text"], expected_text);
        self
    }

    pub fn with_nickname(self, expected_nickname: &str) -> Self {
        assert_eq!(self.payload["nickname"], expected_nickname);
        self
    }

    pub fn is_system(self) -> Self {
        assert_eq!(self.payload["kind"], "system");
        self
    }

    /// Error frame with the given message
    pub fn with_error(self, expected_message: &str) -> Self {
        assert_eq!(self.payload["message"], expected_message);
        self
    }

    pub fn with_muted(self, expected: bool) -> Self {
        assert_eq!(self.payload["muted"], expected);
        self
    }

    pub fn with_room_id(self, expected_room_id: &str) -> Self {
        assert_eq!(self.payload["room_id"], expected_room_id);
        self
    }

    pub fn votes(&self) -> Vec<Vote> {
        serde_json::from_value(self.payload["votes"].clone()).unwrap()
    }

    pub fn questions(&self) -> Vec<Question> {
        serde_json::from_value(self.payload["questions"].clone()).unwrap()
    }

    pub fn participants(&self) -> Vec<Participant> {
        serde_json::from_value(self.payload["participants"].clone()).unwrap()
    }
}
