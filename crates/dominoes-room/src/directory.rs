//! Lookup from room id to that room's game session.

use std::collections::HashMap;

use dominoes_protocol::RoomId;

use crate::GameSession;

/// Holds the [`GameSession`] of every live room.
#[derive(Debug, Default)]
pub struct SessionDirectory {
    sessions: HashMap<RoomId, GameSession>,
}

impl SessionDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the room's session, creating a forming one on first use.
    pub fn open(&mut self, room_id: &RoomId) -> &mut GameSession {
        self.sessions
            .entry(room_id.clone())
            .or_insert_with(|| GameSession::new(room_id.clone()))
    }

    pub fn get(&self, room_id: &RoomId) -> Option<&GameSession> {
        self.sessions.get(room_id)
    }

    pub fn get_mut(&mut self, room_id: &RoomId) -> Option<&mut GameSession> {
        self.sessions.get_mut(room_id)
    }

    pub fn remove(&mut self, room_id: &RoomId) -> Option<GameSession> {
        self.sessions.remove(room_id)
    }

    pub fn contains(&self, room_id: &RoomId) -> bool {
        self.sessions.contains_key(room_id)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub fn room_ids(&self) -> Vec<RoomId> {
        self.sessions.keys().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Phase;

    #[test]
    fn test_open_creates_once() {
        let mut dir = SessionDirectory::new();
        let den = RoomId::from("den");
        assert!(dir.is_empty());

        assert_eq!(dir.open(&den).phase(), Phase::Forming);
        dir.open(&den);
        assert_eq!(dir.len(), 1);
        assert!(dir.contains(&den));
        assert_eq!(dir.get(&den).unwrap().room_id(), &den);
    }

    #[test]
    fn test_remove() {
        let mut dir = SessionDirectory::new();
        let den = RoomId::from("den");
        dir.open(&den);
        dir.open(&RoomId::from("attic"));

        assert!(dir.remove(&den).is_some());
        assert!(dir.remove(&den).is_none());
        assert!(dir.get_mut(&den).is_none());
        assert_eq!(dir.room_ids(), vec![RoomId::from("attic")]);
    }
}
