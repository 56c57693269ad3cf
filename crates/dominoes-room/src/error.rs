//! Error types for the room layer.

use dominoes_protocol::{PlayerId, RoomId, Tile};

/// Errors that can occur during room and game operations.
///
/// Everything except [`InvalidCatalog`](Self::InvalidCatalog) and
/// [`DoubleBlankMissing`](Self::DoubleBlankMissing) is a rejected player
/// request: the state is untouched and only the requester hears about it.
/// The `Display` text is what the client is shown.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RoomError {
    /// No room with this id exists (never created, emptied, or finished).
    #[error("room {0} not found")]
    NotFound(RoomId),

    /// The room exists but is still waiting for players.
    #[error("room {0} has no game in progress")]
    SessionNotActive(RoomId),

    /// The room's game has already been dealt; no new seats.
    #[error("room {0} already has a game in progress")]
    GameInProgress(RoomId),

    /// All four seats are taken.
    ///
    /// Only [`RoomRegistry`](crate::RoomRegistry) reports this. A full room
    /// has always been dealt, so the manager answers with
    /// [`GameInProgress`](Self::GameInProgress) first.
    #[error("room {0} is full")]
    RoomFull(RoomId),

    /// A connection sits in at most one room at a time.
    #[error("player {0} already in room {1}")]
    AlreadyInRoom(PlayerId, RoomId),

    #[error("Not your turn!")]
    NotYourTurn,

    /// The tile matches neither exposed end of the board.
    #[error("Invalid card! Choose a card that matches the gameBox ends.")]
    IllegalMove(Tile),

    /// The tile is not (or no longer) in the player's hand.
    #[error("tile {0} is not in your hand")]
    TileNotHeld(Tile),

    /// The dealer was handed something other than the full set.
    /// `actual` counts the distinct tiles of the set that were present.
    #[error("deck must hold the {expected} tiles of the set, found {actual}")]
    InvalidCatalog { expected: usize, actual: usize },

    /// No dealt hand holds the double-blank.
    #[error("no hand holds the double-blank")]
    DoubleBlankMissing,
}

impl RoomError {
    /// Returns `true` for broken deal invariants, as opposed to rejected
    /// player requests.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::InvalidCatalog { .. } | Self::DoubleBlankMissing)
    }
}
