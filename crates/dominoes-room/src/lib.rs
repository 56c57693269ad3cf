//! Rooms and the dominoes rules for the dominoes server.
//!
//! Everything here is synchronous state. A single owner (the server's
//! gateway task) drives a [`RoomManager`], which in turn returns the events
//! each operation produced as [`Delivery`]s for the caller to send.
//!
//! # Key types
//!
//! - [`RoomManager`]: joins, plays and departures across all rooms
//! - [`GameSession`]: one room's seats, hands, board and turn
//! - [`Board`]: the played chain and its open ends
//! - [`RoomRegistry`] / [`SessionDirectory`]: membership and session lookup
//! - [`Dealer`]: where the four hands come from

mod board;
mod config;
mod deck;
mod directory;
mod error;
mod manager;
mod registry;
mod session;

pub use board::{Board, Side};
pub use config::{Phase, RoomConfig, SEATS};
pub use deck::{
    CATALOG_SIZE, DOUBLE_BLANK, Dealer, HAND_SIZE, Hands, PresetDealer, ShuffleDealer,
    deal_four_hands, full_catalog, is_double_blank,
};
pub use directory::SessionDirectory;
pub use error::RoomError;
pub use manager::{Delivery, RoomInfo, RoomManager};
pub use registry::{Departure, RoomRegistry};
pub use session::{GameSession, Outbound, Seat};
