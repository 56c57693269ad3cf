//! The gateway: the one task that owns every room.
//!
//! Connection handlers never touch room state. They forward what their
//! client asked for as [`GatewayCommand`]s, and the gateway applies those
//! one at a time to its [`RoomManager`], then fans the resulting events out
//! to the per-player outboxes. Two operations on a room can never
//! interleave.

use std::collections::HashMap;

use dominoes_protocol::{ClientIntent, PlayerId, ServerEvent};
use dominoes_room::{Dealer, Delivery, RoomManager, ShuffleDealer};
use tokio::sync::mpsc;

/// Channel a handler drains to write events to its client.
pub type Outbox = mpsc::UnboundedSender<ServerEvent>;

/// What connection handlers tell the gateway.
#[derive(Debug)]
pub enum GatewayCommand {
    /// A client connected; events for `player` go to `outbox`.
    Connected { player: PlayerId, outbox: Outbox },

    /// A decoded and validated request from a connected client.
    Intent {
        player: PlayerId,
        intent: ClientIntent,
    },

    /// The client is gone, cleanly or not.
    Disconnected { player: PlayerId },
}

/// Owns the [`RoomManager`] and the outbox of every connected player.
pub struct Gateway<D: Dealer = ShuffleDealer> {
    rooms: RoomManager<D>,
    outboxes: HashMap<PlayerId, Outbox>,
}

impl<D: Dealer> Gateway<D> {
    pub fn new(rooms: RoomManager<D>) -> Self {
        Self {
            rooms,
            outboxes: HashMap::new(),
        }
    }

    pub fn rooms(&self) -> &RoomManager<D> {
        &self.rooms
    }

    /// Number of players with a live outbox.
    pub fn connected(&self) -> usize {
        self.outboxes.len()
    }

    /// Processes commands until every sender is dropped.
    pub async fn run(mut self, mut commands: mpsc::UnboundedReceiver<GatewayCommand>) {
        tracing::info!("gateway running");
        while let Some(command) = commands.recv().await {
            self.handle(command);
        }
        tracing::info!("gateway stopped");
    }

    /// Applies a single command.
    pub fn handle(&mut self, command: GatewayCommand) {
        match command {
            GatewayCommand::Connected { player, outbox } => {
                tracing::debug!(%player, "player connected");
                self.outboxes.insert(player, outbox);
            }
            GatewayCommand::Intent { player, intent } => self.handle_intent(player, intent),
            GatewayCommand::Disconnected { player } => {
                let deliveries = self.rooms.leave_room(player);
                self.outboxes.remove(&player);
                self.deliver(deliveries);
                tracing::debug!(%player, "player disconnected");
            }
        }
    }

    fn handle_intent(&mut self, player: PlayerId, intent: ClientIntent) {
        // Members seated before this request, in case a failed deal unseats them.
        let mut seated = Vec::new();
        let result = match intent {
            ClientIntent::JoinRoom { room_id } => {
                seated = self.rooms.members(&room_id).map(<[_]>::to_vec).unwrap_or_default();
                self.rooms.join_room(&room_id, player)
            }
            ClientIntent::PlayCard { room_id, tile } => self.rooms.play(&room_id, player, tile),
        };
        match result {
            Ok(deliveries) => self.deliver(deliveries),
            Err(e) if e.is_fatal() => {
                let message = e.to_string();
                for member in seated.into_iter().chain([player]) {
                    self.send(member, ServerEvent::error(message.clone()));
                }
            }
            Err(e) => {
                tracing::debug!(%player, error = %e, "request rejected");
                self.send(player, ServerEvent::error(e.to_string()));
            }
        }
    }

    fn deliver(&self, deliveries: Vec<Delivery>) {
        for Delivery { player, event } in deliveries {
            self.send(player, event);
        }
    }

    fn send(&self, player: PlayerId, event: ServerEvent) {
        let Some(outbox) = self.outboxes.get(&player) else {
            tracing::debug!(%player, event = event.name(), "no outbox, dropping event");
            return;
        };
        if outbox.send(event).is_err() {
            tracing::debug!(%player, "outbox closed, dropping event");
        }
    }
}

#[cfg(test)]
mod tests {
    use dominoes_protocol::{RoomId, Tile};
    use dominoes_room::{HAND_SIZE, Hands, PresetDealer, RoomError, full_catalog};
    use tokio::sync::mpsc::UnboundedReceiver;

    use super::*;

    fn block_gateway() -> Gateway<PresetDealer> {
        let catalog = full_catalog();
        let hands: Hands = std::array::from_fn(|seat| {
            catalog[seat * HAND_SIZE..(seat + 1) * HAND_SIZE].to_vec()
        });
        let dealer = PresetDealer::new(hands).unwrap();
        Gateway::new(RoomManager::with_dealer(dealer))
    }

    fn connect(gw: &mut Gateway<PresetDealer>, id: u64) -> UnboundedReceiver<ServerEvent> {
        let (outbox, rx) = mpsc::unbounded_channel();
        gw.handle(GatewayCommand::Connected {
            player: PlayerId(id),
            outbox,
        });
        rx
    }

    fn join(gw: &mut Gateway<PresetDealer>, id: u64, room: &str) {
        gw.handle(GatewayCommand::Intent {
            player: PlayerId(id),
            intent: ClientIntent::JoinRoom {
                room_id: RoomId::from(room),
            },
        });
    }

    fn play(gw: &mut Gateway<PresetDealer>, id: u64, room: &str, tile: Tile) {
        gw.handle(GatewayCommand::Intent {
            player: PlayerId(id),
            intent: ClientIntent::PlayCard {
                room_id: RoomId::from(room),
                tile,
            },
        });
    }

    fn drain(rx: &mut UnboundedReceiver<ServerEvent>) -> Vec<ServerEvent> {
        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        events
    }

    /// Four connected players seated in `den`, outboxes drained.
    fn full_table() -> (Gateway<PresetDealer>, Vec<UnboundedReceiver<ServerEvent>>) {
        let mut gw = block_gateway();
        let mut rxs: Vec<_> = (1..=4).map(|id| connect(&mut gw, id)).collect();
        for id in 1..=4 {
            join(&mut gw, id, "den");
        }
        for rx in &mut rxs {
            drain(rx);
        }
        (gw, rxs)
    }

    #[test]
    fn test_fourth_join_deals_to_everyone() {
        let mut gw = block_gateway();
        let mut rxs: Vec<_> = (1..=4).map(|id| connect(&mut gw, id)).collect();
        for id in 1..=3 {
            join(&mut gw, id, "den");
        }
        assert!(rxs.iter_mut().all(|rx| drain(rx).is_empty()));

        join(&mut gw, 4, "den");
        let events: Vec<Vec<ServerEvent>> = rxs.iter_mut().map(drain).collect();

        let catalog = full_catalog();
        assert_eq!(
            events[0],
            vec![
                ServerEvent::ReceiveHand {
                    hand: catalog[..HAND_SIZE].to_vec()
                },
                ServerEvent::YourTurn { board: vec![] },
            ]
        );
        for seat_events in &events[1..] {
            assert_eq!(seat_events.len(), 1);
            assert!(matches!(seat_events[0], ServerEvent::ReceiveHand { .. }));
        }
    }

    #[test]
    fn test_errors_reach_only_the_requester() {
        let (mut gw, mut rxs) = full_table();
        let tile = full_catalog()[HAND_SIZE];
        play(&mut gw, 2, "den", tile);

        assert_eq!(drain(&mut rxs[1]), vec![ServerEvent::error("Not your turn!")]);
        for i in [0, 2, 3] {
            assert!(drain(&mut rxs[i]).is_empty());
        }
    }

    /// Hands out all 28 tiles with the double-blank swapped for a [6|6].
    struct NoDoubleBlank;

    impl Dealer for NoDoubleBlank {
        fn deal(&mut self, catalog: Vec<Tile>) -> Result<Hands, RoomError> {
            let mut hands: Hands = std::array::from_fn(|seat| {
                catalog[seat * HAND_SIZE..(seat + 1) * HAND_SIZE].to_vec()
            });
            hands[0][0] = Tile::new(1, 6, 6);
            Ok(hands)
        }
    }

    #[test]
    fn test_failed_deal_tells_every_member() {
        let mut gw = Gateway::new(RoomManager::with_dealer(NoDoubleBlank));
        let mut rxs: Vec<_> = (1..=4)
            .map(|id| {
                let (outbox, rx) = mpsc::unbounded_channel();
                gw.handle(GatewayCommand::Connected {
                    player: PlayerId(id),
                    outbox,
                });
                rx
            })
            .collect();
        for id in 1..=4 {
            gw.handle(GatewayCommand::Intent {
                player: PlayerId(id),
                intent: ClientIntent::JoinRoom {
                    room_id: RoomId::from("den"),
                },
            });
        }

        let expected = vec![ServerEvent::error("no hand holds the double-blank")];
        for rx in &mut rxs {
            assert_eq!(drain(rx), expected);
        }
        assert_eq!(gw.rooms().room_count(), 0);
        assert_eq!(gw.rooms().player_room(PlayerId(2)), None);
    }

    #[test]
    fn test_play_broadcasts_to_room() {
        let (mut gw, mut rxs) = full_table();
        let opener = full_catalog()[0];
        play(&mut gw, 1, "den", opener);

        let update = ServerEvent::UpdateGameBox {
            board: vec![opener],
        };
        assert_eq!(drain(&mut rxs[0]), vec![update.clone()]);
        assert_eq!(
            drain(&mut rxs[1]),
            vec![
                update.clone(),
                ServerEvent::YourTurn {
                    board: vec![opener]
                }
            ]
        );
        assert_eq!(drain(&mut rxs[2]), vec![update.clone()]);
        assert_eq!(drain(&mut rxs[3]), vec![update]);
    }

    #[test]
    fn test_unknown_room_reports_not_found() {
        let mut gw = block_gateway();
        let mut rx = connect(&mut gw, 1);
        play(&mut gw, 1, "nowhere", full_catalog()[0]);
        assert_eq!(
            drain(&mut rx),
            vec![ServerEvent::error("room nowhere not found")]
        );
    }

    #[test]
    fn test_disconnect_of_current_player_passes_turn() {
        let (mut gw, mut rxs) = full_table();
        gw.handle(GatewayCommand::Disconnected {
            player: PlayerId(1),
        });

        assert_eq!(gw.connected(), 3);
        assert_eq!(
            drain(&mut rxs[1]),
            vec![ServerEvent::YourTurn { board: vec![] }]
        );
        assert_eq!(gw.rooms().player_room(PlayerId(1)), None);
    }

    #[test]
    fn test_total_disconnect_then_play_is_not_found() {
        let (mut gw, _rxs) = full_table();
        for id in 1..=4 {
            gw.handle(GatewayCommand::Disconnected {
                player: PlayerId(id),
            });
        }
        assert_eq!(gw.rooms().room_count(), 0);

        let mut rx = connect(&mut gw, 9);
        play(&mut gw, 9, "den", full_catalog()[0]);
        assert_eq!(drain(&mut rx), vec![ServerEvent::error("room den not found")]);
    }

    #[test]
    fn test_closed_outbox_does_not_break_delivery() {
        let (mut gw, mut rxs) = full_table();
        // Player 3's handler is gone but the disconnect has not arrived yet.
        let gone = rxs.remove(2);
        drop(gone);

        play(&mut gw, 1, "den", full_catalog()[0]);
        assert_eq!(drain(&mut rxs[0]).len(), 1);
        assert_eq!(drain(&mut rxs[1]).len(), 2);
        assert_eq!(drain(&mut rxs[2]).len(), 1);
    }

    #[tokio::test]
    async fn test_run_processes_until_senders_drop() {
        let (commands, rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(block_gateway().run(rx));

        let (outbox, mut events) = mpsc::unbounded_channel();
        commands
            .send(GatewayCommand::Connected {
                player: PlayerId(1),
                outbox,
            })
            .unwrap();
        commands
            .send(GatewayCommand::Intent {
                player: PlayerId(1),
                intent: ClientIntent::PlayCard {
                    room_id: RoomId::from("den"),
                    tile: full_catalog()[0],
                },
            })
            .unwrap();

        assert_eq!(
            events.recv().await,
            Some(ServerEvent::error("room den not found"))
        );
        drop(commands);
        task.await.unwrap();
    }
}
