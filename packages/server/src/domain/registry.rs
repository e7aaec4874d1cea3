//! Room Registry
//!
//! 起動時に与えられたルームカタログを保持し、ルーム名から Room を引く純粋なルックアップ。

use std::collections::HashSet;

use super::{error::RegistryError, room::Room};

/// ルームカタログ
///
/// カタログの順序は設定で与えられた順序のまま保持します。
#[derive(Debug, Clone)]
pub struct RoomRegistry {
    rooms: Vec<Room>,
}

impl RoomRegistry {
    pub fn new(rooms: Vec<Room>) -> Result<Self, RegistryError> {
        if rooms.is_empty() {
            return Err(RegistryError::EmptyCatalog);
        }

        let mut seen = HashSet::new();
        for room in &rooms {
            if !seen.insert(room.name.as_str()) {
                return Err(RegistryError::DuplicateRoom(room.name.as_str().to_string()));
            }
        }

        Ok(Self { rooms })
    }

    /// ルーム名から Room を解決
    pub fn resolve(&self, name: &str) -> Option<&Room> {
        self.rooms.iter().find(|room| room.name.as_str() == name)
    }

    pub fn requires_secret(&self, room: &Room) -> bool {
        room.requires_secret()
    }

    pub fn rooms(&self) -> impl Iterator<Item = &Room> {
        self.rooms.iter()
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }
}
