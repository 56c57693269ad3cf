//! Room configuration and the game phase state machine.

use serde::{Deserialize, Serialize};

/// Seats at every table. The rules assume exactly four players.
pub const SEATS: usize = 4;

// ---------------------------------------------------------------------------
// RoomConfig
// ---------------------------------------------------------------------------

/// Settings shared by every room a [`RoomManager`](crate::RoomManager)
/// creates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomConfig {
    /// Seed for the shuffling dealer. `None` seeds from the OS, which is
    /// what a live server wants; a fixed seed makes every deal
    /// reproducible.
    pub deal_seed: Option<u64>,
}

// ---------------------------------------------------------------------------
// Phase
// ---------------------------------------------------------------------------

/// The lifecycle phase of a game session.
///
/// Transitions are strictly ordered:
///
/// ```text
/// Forming → Active → Over
/// ```
///
/// - **Forming**: fewer than four members; joins accepted.
/// - **Active**: hands dealt, turns in progress.
/// - **Over**: a player emptied their hand. The session is discarded
///   right after, so nothing ever observes it for long.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    Forming,
    Active,
    Over,
}

impl Phase {
    /// Returns `true` if the room is accepting new players.
    pub fn is_joinable(&self) -> bool {
        matches!(self, Self::Forming)
    }

    /// Returns `true` if plays are accepted.
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active)
    }

    /// The phase that follows this one, if any.
    pub fn next(self) -> Option<Self> {
        match self {
            Self::Forming => Some(Self::Active),
            Self::Active => Some(Self::Over),
            Self::Over => None,
        }
    }

    /// Returns `true` if moving to `target` is a legal transition.
    pub fn can_transition_to(self, target: Self) -> bool {
        self.next() == Some(target)
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Forming => write!(f, "Forming"),
            Self::Active => write!(f, "Active"),
            Self::Over => write!(f, "Over"),
        }
    }
}
