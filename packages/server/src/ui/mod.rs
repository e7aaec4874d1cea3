//! WebSocket / HTTP server for the room relay.

mod handler;
mod server;
mod signal;
pub mod state;

pub use server::Server;
