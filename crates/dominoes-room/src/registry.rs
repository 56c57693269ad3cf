//! Room membership: which connections sit in which room.

use std::collections::HashMap;

use dominoes_protocol::{PlayerId, RoomId};

use crate::{RoomError, SEATS};

/// What's left of a room after a member walked out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Departure {
    pub room_id: RoomId,
    /// Members still in the room, in join order.
    pub remaining: Vec<PlayerId>,
}

impl Departure {
    /// Returns `true` if the room was removed because nobody is left.
    pub fn emptied_room(&self) -> bool {
        self.remaining.is_empty()
    }
}

/// Tracks room membership in join order.
///
/// Join order becomes seat order when the game starts. A player can be in
/// at most one room, and a room only exists while it has members.
#[derive(Debug, Default)]
pub struct RoomRegistry {
    rooms: HashMap<RoomId, Vec<PlayerId>>,
    player_rooms: HashMap<PlayerId, RoomId>,
}

impl RoomRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `player` to `room_id`, creating the room on first use.
    ///
    /// Returns the membership after the join.
    ///
    /// # Errors
    /// - [`RoomError::AlreadyInRoom`] if the player is in any room already
    /// - [`RoomError::RoomFull`] if all seats are taken
    pub fn join(
        &mut self,
        room_id: &RoomId,
        player: PlayerId,
    ) -> Result<&[PlayerId], RoomError> {
        if let Some(current) = self.player_rooms.get(&player) {
            return Err(RoomError::AlreadyInRoom(player, current.clone()));
        }
        if self.rooms.get(room_id).is_some_and(|m| m.len() >= SEATS) {
            return Err(RoomError::RoomFull(room_id.clone()));
        }

        self.player_rooms.insert(player, room_id.clone());
        let members = self.rooms.entry(room_id.clone()).or_default();
        members.push(player);
        Ok(members.as_slice())
    }

    /// Removes `player` from whatever room it is in.
    ///
    /// A room left empty is removed. Returns `None` if the player was not
    /// in any room.
    pub fn leave(&mut self, player: PlayerId) -> Option<Departure> {
        let room_id = self.player_rooms.remove(&player)?;
        let remaining = match self.rooms.get_mut(&room_id) {
            Some(members) => {
                members.retain(|m| *m != player);
                members.clone()
            }
            None => Vec::new(),
        };
        if remaining.is_empty() {
            self.rooms.remove(&room_id);
        }
        Some(Departure { room_id, remaining })
    }

    /// Drops a room and every membership in it. Returns the evicted members.
    pub fn remove_room(&mut self, room_id: &RoomId) -> Vec<PlayerId> {
        let members = self.rooms.remove(room_id).unwrap_or_default();
        for member in &members {
            self.player_rooms.remove(member);
        }
        members
    }

    pub fn members(&self, room_id: &RoomId) -> Option<&[PlayerId]> {
        self.rooms.get(room_id).map(Vec::as_slice)
    }

    /// The room a player is currently in, if any.
    pub fn room_of(&self, player: PlayerId) -> Option<&RoomId> {
        self.player_rooms.get(&player)
    }

    pub fn contains(&self, room_id: &RoomId) -> bool {
        self.rooms.contains_key(room_id)
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }
}
