//! Types that travel on the wire between the server and the table clients.
//!
//! Every message is adjacently tagged so a browser client can switch on the
//! event name without knowing the payload shape:
//!
//! ```text
//! {"event":"playCard","data":{"roomId":"den","tile":{"id":9,"endA":1,"endB":2}}}
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ProtocolError;

/// Highest pip value on a double-six set.
pub const MAX_PIPS: u8 = 6;

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// Server-side identity of a connected player.
///
/// One per connection; the gateway derives it from the transport's
/// connection id. Serializes as a plain number.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct PlayerId(pub u64);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P-{}", self.0)
    }
}

/// Name of a room, chosen by the clients that want to play together.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomId(String);

impl RoomId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RoomId {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for RoomId {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// Tile
// ---------------------------------------------------------------------------

/// A domino tile. Immutable; identity is `id`.
///
/// The two ends are kept in catalog orientation even once the tile sits on
/// the board. Which end is exposed is tracked by the board, not the tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tile {
    pub id: u32,
    pub end_a: u8,
    pub end_b: u8,
}

impl Tile {
    pub const fn new(id: u32, end_a: u8, end_b: u8) -> Self {
        Self { id, end_a, end_b }
    }

    /// Returns `true` if either end shows `value`.
    pub fn matches(&self, value: u8) -> bool {
        self.end_a == value || self.end_b == value
    }

    /// The end left exposed when the tile is laid against `value`.
    ///
    /// `None` if neither end shows `value`.
    pub fn other_end(&self, value: u8) -> Option<u8> {
        if self.end_a == value {
            Some(self.end_b)
        } else if self.end_b == value {
            Some(self.end_a)
        } else {
            None
        }
    }

    pub fn is_double(&self) -> bool {
        self.end_a == self.end_b
    }
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}|{}]#{}", self.end_a, self.end_b, self.id)
    }
}

// ---------------------------------------------------------------------------
// Recipient
// ---------------------------------------------------------------------------

/// Who a server event is addressed to.
///
/// Game transitions return `(Recipient, ServerEvent)` pairs; the room
/// manager resolves `Room` against the membership at that moment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Recipient {
    /// Every current member of the room.
    Room,
    /// A single player.
    Player(PlayerId),
}

// ---------------------------------------------------------------------------
// Messages
// ---------------------------------------------------------------------------

/// Client -> server intents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    tag = "event",
    content = "data",
    rename_all = "camelCase",
    rename_all_fields = "camelCase"
)]
pub enum ClientIntent {
    /// Take a seat at the named table. The fourth arrival starts the game.
    JoinRoom { room_id: RoomId },

    /// Lay a tile from the hand onto the board.
    PlayCard { room_id: RoomId, tile: Tile },
}

impl ClientIntent {
    pub fn room_id(&self) -> &RoomId {
        match self {
            Self::JoinRoom { room_id } | Self::PlayCard { room_id, .. } => room_id,
        }
    }

    /// Checks the rules serde cannot express: a non-blank room name and
    /// tile ends within `0..=MAX_PIPS`.
    pub fn validate(&self) -> Result<(), ProtocolError> {
        if self.room_id().as_str().trim().is_empty() {
            return Err(ProtocolError::InvalidMessage("room id must not be empty".into()));
        }
        if let Self::PlayCard { tile, .. } = self {
            if tile.end_a > MAX_PIPS || tile.end_b > MAX_PIPS {
                return Err(ProtocolError::InvalidMessage(format!(
                    "tile {tile} has an end above {MAX_PIPS}"
                )));
            }
        }
        Ok(())
    }
}

/// Server -> client events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    tag = "event",
    content = "data",
    rename_all = "camelCase",
    rename_all_fields = "camelCase"
)]
pub enum ServerEvent {
    /// The player's dealt hand. Sent once, when the game starts.
    ReceiveHand { hand: Vec<Tile> },

    /// It is now the recipient's turn; carries the current board.
    YourTurn { board: Vec<Tile> },

    /// The board after a successful play, sent to the whole room.
    UpdateGameBox { board: Vec<Tile> },

    /// A player emptied their hand. Terminal for the room.
    GameOver { winner_id: PlayerId },

    /// The recipient's last request was rejected.
    Error { message: String },
}

impl ServerEvent {
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }

    /// The wire name of the event, for log fields.
    pub fn name(&self) -> &'static str {
        match self {
            Self::ReceiveHand { .. } => "receiveHand",
            Self::YourTurn { .. } => "yourTurn",
            Self::UpdateGameBox { .. } => "updateGameBox",
            Self::GameOver { .. } => "gameOver",
            Self::Error { .. } => "error",
        }
    }
}
