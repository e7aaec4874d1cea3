//! Room-based chat relay library.
//!
//! Clients connect over WebSocket, join one of a fixed set of rooms (some
//! protected by a shared secret), receive the room's recent history and
//! exchange messages broadcast to everyone currently in that room.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
