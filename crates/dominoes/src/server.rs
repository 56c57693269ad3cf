//! `DominoesServer` builder and server loop.
//!
//! Ties the layers together: transport → protocol → gateway → rooms.

use std::net::SocketAddr;
use std::sync::Arc;

use dominoes_protocol::{Codec, JsonCodec};
use dominoes_room::{Dealer, RoomConfig, RoomManager, ShuffleDealer};
use dominoes_transport::{PendingConnection, Transport, WebSocketTransport};
use tokio::sync::mpsc;

use crate::DominoesError;
use crate::config::{DEFAULT_HOST, DEFAULT_PORT};
use crate::gateway::Gateway;
use crate::handler::handle_connection;

/// Builder for configuring and starting a dominoes server.
///
/// # Example
///
/// ```rust,no_run
/// use dominoes::prelude::*;
///
/// # async fn start() -> Result<(), DominoesError> {
/// let server = DominoesServer::builder()
///     .bind("0.0.0.0:3000")
///     .build()
///     .await?;
/// server.run().await
/// # }
/// ```
pub struct DominoesServerBuilder {
    bind_addr: String,
    room_config: RoomConfig,
}

impl DominoesServerBuilder {
    /// Creates a new builder listening on [`DEFAULT_HOST`]:[`DEFAULT_PORT`].
    pub fn new() -> Self {
        Self {
            bind_addr: format!("{DEFAULT_HOST}:{DEFAULT_PORT}"),
            room_config: RoomConfig::default(),
        }
    }

    /// Sets the address to bind the server to.
    pub fn bind(mut self, addr: &str) -> Self {
        self.bind_addr = addr.to_string();
        self
    }

    /// Sets the configuration shared by every room.
    pub fn room_config(mut self, config: RoomConfig) -> Self {
        self.room_config = config;
        self
    }

    /// Binds the listener, dealing with a [`ShuffleDealer`] seeded from the
    /// room config.
    pub async fn build(self) -> Result<DominoesServer<JsonCodec, ShuffleDealer>, DominoesError> {
        let dealer = ShuffleDealer::from_config(&self.room_config);
        self.build_with_dealer(dealer).await
    }

    /// Binds the listener with a custom dealer. The room config's deal seed
    /// is not used.
    pub async fn build_with_dealer<D: Dealer>(
        self,
        dealer: D,
    ) -> Result<DominoesServer<JsonCodec, D>, DominoesError> {
        let transport = WebSocketTransport::bind(&self.bind_addr).await?;
        let rooms = RoomManager::with_dealer(dealer);

        Ok(DominoesServer {
            transport,
            codec: Arc::new(JsonCodec),
            gateway: Gateway::new(rooms),
        })
    }
}

impl Default for DominoesServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A bound dominoes server.
///
/// Call [`run()`](Self::run) to start accepting connections.
pub struct DominoesServer<C: Codec = JsonCodec, D: Dealer = ShuffleDealer> {
    transport: WebSocketTransport,
    codec: Arc<C>,
    gateway: Gateway<D>,
}

impl DominoesServer {
    /// Creates a new builder.
    pub fn builder() -> DominoesServerBuilder {
        DominoesServerBuilder::new()
    }
}

impl<C: Codec, D: Dealer> DominoesServer<C, D> {
    /// Returns the local address the server is bound to.
    pub fn local_addr(&self) -> Result<SocketAddr, DominoesError> {
        Ok(self.transport.local_addr()?)
    }

    /// Starts the gateway task, then accepts sockets and spawns a handler
    /// task for each. The WebSocket handshake runs inside that task, so the
    /// loop goes straight back to accepting. Runs until the process is
    /// terminated.
    pub async fn run(self) -> Result<(), DominoesError> {
        let Self {
            mut transport,
            codec,
            gateway,
        } = self;

        let (commands, command_rx) = mpsc::unbounded_channel();
        tokio::spawn(gateway.run(command_rx));
        tracing::info!(addr = ?transport.local_addr().ok(), "dominoes server running");

        loop {
            match transport.accept().await {
                Ok(pending) => {
                    let codec = Arc::clone(&codec);
                    let commands = commands.clone();
                    let conn_id = pending.id();
                    tokio::spawn(async move {
                        if let Err(e) = handle_connection(pending, codec, commands).await {
                            tracing::debug!(%conn_id, error = %e, "connection ended with error");
                        }
                    });
                }
                Err(e) => {
                    tracing::error!(error = %e, "accept failed");
                }
            }
        }
    }
}
