//! Utilities shared by the BlipChat crates.

pub mod logger;
pub mod time;
