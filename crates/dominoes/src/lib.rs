//! # Dominoes
//!
//! A room server for four-player dominoes, played by browser clients over
//! WebSockets.
//!
//! Clients name a room to join it; the fourth arrival deals the hands and
//! the holder of the double-blank opens. The server is authoritative: every
//! play is checked against the turn order, the player's hand and the open
//! ends of the board before anyone else hears about it.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use dominoes::prelude::*;
//!
//! # async fn start() -> Result<(), DominoesError> {
//! let config = ServerConfig::from_env()?;
//! let server = DominoesServer::builder()
//!     .bind(&config.bind_addr())
//!     .room_config(config.room_config())
//!     .build()
//!     .await?;
//! server.run().await
//! # }
//! ```

mod config;
mod error;
mod gateway;
mod handler;
mod server;

pub use config::{DEFAULT_HOST, DEFAULT_PORT, ServerConfig};
pub use error::DominoesError;
pub use gateway::{Gateway, GatewayCommand, Outbox};
pub use server::{DominoesServer, DominoesServerBuilder};

/// Everything needed to run a server or drive one from a test client.
pub mod prelude {
    pub use crate::{DominoesError, DominoesServer, DominoesServerBuilder, ServerConfig};
    pub use dominoes_protocol::{ClientIntent, Codec, JsonCodec, PlayerId, RoomId, ServerEvent, Tile};
    pub use dominoes_room::{Dealer, PresetDealer, RoomConfig, RoomError, ShuffleDealer};
}
