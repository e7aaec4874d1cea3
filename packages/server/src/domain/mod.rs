//! Domain layer for the room relay.
//!
//! This module contains the room catalog, per-room state and session model.
//! It is independent of the wire format (DTOs) and of the transport.

pub mod error;
pub mod event;
pub mod history;
pub mod pusher;
pub mod registry;
pub mod room;
pub mod room_state;
pub mod session;
pub mod value_object;

pub use error::{RegistryError, ValueObjectError};
pub use event::{ServerEvent, SystemNotice};
pub use history::{HistoryEntry, HistoryRing};
pub use pusher::{MessagePushError, MessagePusher, PusherChannel};
#[cfg(test)]
pub use pusher::MockMessagePusher;
pub use registry::RoomRegistry;
pub use room::{AccessPolicy, PlainSecret, Room, SecretVerifier};
pub use room_state::RoomState;
pub use session::{Session, SessionState};
pub use value_object::{ConnectionId, DisplayName, MessageText, RoomName, Timestamp};
