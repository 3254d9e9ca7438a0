use huddle_core::{ConnectionId, RoomId};
use std::collections::HashMap;

/// Room membership, keyed by room name. Members keep their join order.
///
/// An empty room is never stored: the last `leave` out of a room drops it.
#[derive(Debug, Default)]
pub struct RoomRegistry {
    rooms: HashMap<RoomId, Vec<ConnectionId>>,
}

impl RoomRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `id` to `room` and returns who was already there.
    ///
    /// Joining a room twice leaves membership untouched; the returned list
    /// never contains `id` itself.
    pub fn join(&mut self, room: RoomId, id: ConnectionId) -> Vec<ConnectionId> {
        let members = self.rooms.entry(room).or_default();
        let others = members.iter().copied().filter(|m| *m != id).collect();
        if !members.contains(&id) {
            members.push(id);
        }
        others
    }

    /// Removes `id` from every room it is in.
    ///
    /// Each affected room is reported with its remaining members (empty when
    /// `id` was the last one, in which case the room is gone).
    pub fn leave(&mut self, id: &ConnectionId) -> HashMap<RoomId, Vec<ConnectionId>> {
        let mut affected = HashMap::new();

        self.rooms.retain(|room, members| {
            let before = members.len();
            members.retain(|m| m != id);
            if members.len() != before {
                affected.insert(room.clone(), members.clone());
            }
            !members.is_empty()
        });

        affected
    }

    pub fn members_of(&self, room: &str) -> Vec<ConnectionId> {
        self.rooms.get(room).cloned().unwrap_or_default()
    }

    pub fn rooms_of(&self, id: &ConnectionId) -> Vec<RoomId> {
        self.rooms
            .iter()
            .filter(|(_, members)| members.contains(id))
            .map(|(room, _)| room.clone())
            .collect()
    }

    pub fn contains_room(&self, room: &str) -> bool {
        self.rooms.contains_key(room)
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }
}
