//! Inbound requests as handed over by the transport.
//!
//! Fields stay optional here: shape validation is part of the use case.

/// Request to join a room.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JoinRequest {
    pub room_name: String,
    pub password: Option<String>,
    pub username: Option<String>,
}

impl JoinRequest {
    pub fn new(room_name: impl Into<String>) -> Self {
        Self {
            room_name: room_name.into(),
            ..Self::default()
        }
    }

    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }
}

/// A chat message as claimed by the client.
///
/// `id` is informational only; the sender is always the connection the
/// message arrived on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChatRequest {
    pub id: Option<String>,
    pub username: Option<String>,
    pub text: Option<String>,
    pub room: Option<String>,
}

impl ChatRequest {
    pub fn new(
        username: impl Into<String>,
        text: impl Into<String>,
        room: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            username: Some(username.into()),
            text: Some(text.into()),
            room: Some(room.into()),
        }
    }
}
