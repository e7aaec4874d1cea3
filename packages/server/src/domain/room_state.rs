//! Per-room mutable state: membership set and History Ring.
//!
//! One `RoomState` exists per catalog room and is always accessed under that
//! room's lock, so a broadcast sees a consistent member set.

use std::{collections::BTreeSet, num::NonZeroUsize};

use super::{
    history::{HistoryEntry, HistoryRing},
    value_object::ConnectionId,
};

#[derive(Debug, Clone)]
pub struct RoomState {
    members: BTreeSet<ConnectionId>,
    history: HistoryRing,
}

impl RoomState {
    pub fn new(history_capacity: NonZeroUsize) -> Self {
        Self {
            members: BTreeSet::new(),
            history: HistoryRing::new(history_capacity),
        }
    }

    /// Returns `false` if the connection was already a member.
    pub fn add_member(&mut self, id: ConnectionId) -> bool {
        self.members.insert(id)
    }

    /// Returns `false` if the connection was not a member.
    pub fn remove_member(&mut self, id: &ConnectionId) -> bool {
        self.members.remove(id)
    }

    pub fn contains(&self, id: &ConnectionId) -> bool {
        self.members.contains(id)
    }

    /// Members in a stable order.
    pub fn members(&self) -> Vec<ConnectionId> {
        self.members.iter().cloned().collect()
    }

    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    pub fn history(&self) -> &HistoryRing {
        &self.history
    }

    pub fn append(&mut self, entry: HistoryEntry) {
        self.history.append(entry);
    }
}
