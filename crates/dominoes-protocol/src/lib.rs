//! Wire protocol for the dominoes server.
//!
//! - **Types** ([`ClientIntent`], [`ServerEvent`], [`Tile`], identities):
//!   what travels between the table clients and the server.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]): how those messages are
//!   turned into frames and back.
//! - **Errors** ([`ProtocolError`]).
//!
//! The protocol layer knows nothing about connections or rooms.
//!
//! ```text
//! Transport (bytes) -> Protocol (intents/events) -> Room (game rules)
//! ```

mod codec;
mod error;
mod types;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use types::{ClientIntent, MAX_PIPS, PlayerId, Recipient, RoomId, ServerEvent, Tile};
