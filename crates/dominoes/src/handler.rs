//! Per-connection handler: decode intents in, encode events out.
//!
//! Each accepted socket gets its own Tokio task running this handler. The
//! task first completes the WebSocket handshake, then drives two loops over
//! the same connection at once:
//!   - read: frame → `ClientIntent` → gateway
//!   - write: outbox → `ServerEvent` frame → client
//!
//! Whichever loop ends first ends the connection.

use std::sync::Arc;
use std::time::Duration;

use dominoes_protocol::{ClientIntent, Codec, PlayerId, ServerEvent};
use dominoes_transport::{Connection, PendingConnection, PendingWebSocket, WebSocketConnection};
use tokio::sync::mpsc;

use crate::DominoesError;
use crate::gateway::{GatewayCommand, Outbox};

/// How long a peer gets to send its upgrade request.
const HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(10);

/// Tells the gateway the player is gone when the handler exits.
///
/// Fires on every exit path. The unbounded send needs no runtime.
struct DisconnectGuard {
    player: PlayerId,
    gateway: mpsc::UnboundedSender<GatewayCommand>,
}

impl Drop for DisconnectGuard {
    fn drop(&mut self) {
        let _ = self.gateway.send(GatewayCommand::Disconnected {
            player: self.player,
        });
    }
}

/// Handles a single connection from accept to close.
///
/// A peer that fails or stalls the handshake never reaches the gateway.
pub(crate) async fn handle_connection<C: Codec>(
    pending: PendingWebSocket,
    codec: Arc<C>,
    gateway: mpsc::UnboundedSender<GatewayCommand>,
) -> Result<(), DominoesError> {
    let conn = match tokio::time::timeout(HANDSHAKE_TIMEOUT, pending.upgrade()).await {
        Ok(conn) => conn?,
        Err(_) => {
            tracing::debug!("WebSocket handshake timed out");
            return Ok(());
        }
    };
    let player = PlayerId(conn.id().into_inner());
    tracing::info!(conn_id = %conn.id(), %player, "player connected");

    let (outbox, events) = mpsc::unbounded_channel();
    gateway
        .send(GatewayCommand::Connected {
            player,
            outbox: outbox.clone(),
        })
        .map_err(|_| DominoesError::GatewayClosed)?;
    let _guard = DisconnectGuard {
        player,
        gateway: gateway.clone(),
    };

    let result = tokio::select! {
        r = read_loop(&conn, codec.as_ref(), player, &gateway, &outbox) => r,
        r = write_loop(&conn, codec.as_ref(), events) => r,
    };

    let _ = conn.close().await;
    tracing::info!(%player, "player disconnected");
    // _guard drops on return → Disconnected reaches the gateway.
    result
}

/// Forwards every valid intent to the gateway until the client goes away.
///
/// Frames that fail to decode or validate are answered with an `error`
/// event on the player's own outbox and otherwise ignored.
async fn read_loop<C: Codec>(
    conn: &WebSocketConnection,
    codec: &C,
    player: PlayerId,
    gateway: &mpsc::UnboundedSender<GatewayCommand>,
    outbox: &Outbox,
) -> Result<(), DominoesError> {
    loop {
        let data = match conn.recv().await {
            Ok(Some(data)) => data,
            Ok(None) => {
                tracing::debug!(%player, "connection closed cleanly");
                return Ok(());
            }
            Err(e) => {
                tracing::debug!(%player, error = %e, "recv error");
                return Err(e.into());
            }
        };

        let intent = codec
            .decode::<ClientIntent>(&data)
            .and_then(|intent| intent.validate().map(|()| intent));

        match intent {
            Ok(intent) => gateway
                .send(GatewayCommand::Intent { player, intent })
                .map_err(|_| DominoesError::GatewayClosed)?,
            Err(e) => {
                tracing::debug!(%player, error = %e, "rejected frame");
                let _ = outbox.send(ServerEvent::error(e.to_string()));
            }
        }
    }
}

/// Writes queued events to the client in order.
async fn write_loop<C: Codec>(
    conn: &WebSocketConnection,
    codec: &C,
    mut events: mpsc::UnboundedReceiver<ServerEvent>,
) -> Result<(), DominoesError> {
    while let Some(event) = events.recv().await {
        let bytes = codec.encode(&event)?;
        conn.send(&bytes).await?;
    }
    Ok(())
}
