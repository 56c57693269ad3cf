//! Unified error type for the dominoes server.

use dominoes_protocol::ProtocolError;
use dominoes_room::RoomError;
use dominoes_transport::TransportError;

/// Top-level error that wraps all crate-specific errors.
///
/// The `#[from]` attribute on each layer variant lets `?` convert
/// sub-crate errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum DominoesError {
    /// A transport-level error (connection, send, recv).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A protocol-level error (encode, decode, invalid message).
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A room-level error (not found, not your turn, illegal move).
    #[error(transparent)]
    Room(#[from] RoomError),

    /// An environment variable held something unusable.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// The gateway task has stopped; nothing can be routed any more.
    #[error("gateway is no longer running")]
    GatewayClosed,
}
