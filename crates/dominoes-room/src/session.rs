//! One room's game: seats, hands, the board and whose turn it is.
//!
//! A [`GameSession`] is plain state. Every transition returns the events it
//! produced as [`Outbound`] pairs and leaves delivery to the caller, so the
//! rules can be driven and inspected without any I/O.

use dominoes_protocol::{PlayerId, Recipient, RoomId, ServerEvent, Tile};

use crate::deck::{Hands, is_double_blank};
use crate::{Board, Phase, RoomError, SEATS};

/// An event and who should receive it.
pub type Outbound = (Recipient, ServerEvent);

/// A player's fixed place in turn order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Seat {
    pub player: PlayerId,
    pub hand: Vec<Tile>,
    /// `false` once the player's connection left mid-game. The hand stays.
    pub present: bool,
}

/// The game state of a single room.
#[derive(Debug, Clone)]
pub struct GameSession {
    room_id: RoomId,
    phase: Phase,
    board: Board,
    /// Empty while forming, then exactly [`SEATS`] in join order.
    seats: Vec<Seat>,
    current_turn: usize,
}

impl GameSession {
    /// A session waiting for its players.
    pub fn new(room_id: RoomId) -> Self {
        Self {
            room_id,
            phase: Phase::Forming,
            board: Board::new(),
            seats: Vec::new(),
            current_turn: 0,
        }
    }

    pub fn room_id(&self) -> &RoomId {
        &self.room_id
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn seats(&self) -> &[Seat] {
        &self.seats
    }

    /// Index of the seat whose turn it is. Meaningless while forming.
    pub fn current_turn(&self) -> usize {
        self.current_turn
    }

    /// The player whose turn it is, while the game is running.
    pub fn current_player(&self) -> Option<PlayerId> {
        if !self.phase.is_active() {
            return None;
        }
        self.seats.get(self.current_turn).map(|seat| seat.player)
    }

    pub fn hand_of(&self, player: PlayerId) -> Option<&[Tile]> {
        self.seat_index(player).map(|i| self.seats[i].hand.as_slice())
    }

    /// Every tile in the hands and on the board, sorted by id.
    ///
    /// For an active session this is always the full catalog.
    pub fn accounted_tiles(&self) -> Vec<Tile> {
        let mut tiles: Vec<Tile> = self
            .seats
            .iter()
            .flat_map(|seat| seat.hand.iter().copied())
            .chain(self.board.iter().copied())
            .collect();
        tiles.sort_by_key(|t| t.id);
        tiles
    }

    /// Seats the four players with their hands and starts the game.
    ///
    /// The seat holding the double-blank moves first. Produces a
    /// `receiveHand` for every seat and `yourTurn` with an empty board for
    /// the starting seat.
    ///
    /// # Errors
    /// - [`RoomError::GameInProgress`] if the session is not forming
    /// - [`RoomError::DoubleBlankMissing`] if no hand holds the double-blank
    pub fn activate(
        &mut self,
        players: [PlayerId; SEATS],
        hands: Hands,
    ) -> Result<Vec<Outbound>, RoomError> {
        if !self.phase.can_transition_to(Phase::Active) {
            return Err(RoomError::GameInProgress(self.room_id.clone()));
        }
        let first = hands
            .iter()
            .position(|hand| hand.iter().any(is_double_blank))
            .ok_or(RoomError::DoubleBlankMissing)?;

        self.seats = players
            .into_iter()
            .zip(hands)
            .map(|(player, hand)| Seat {
                player,
                hand,
                present: true,
            })
            .collect();
        self.current_turn = first;
        self.phase = Phase::Active;

        let mut out: Vec<Outbound> = self
            .seats
            .iter()
            .map(|seat| {
                (
                    Recipient::Player(seat.player),
                    ServerEvent::ReceiveHand {
                        hand: seat.hand.clone(),
                    },
                )
            })
            .collect();
        let starter = self.seats[first].player;
        out.push((
            Recipient::Player(starter),
            ServerEvent::YourTurn { board: Vec::new() },
        ));

        tracing::info!(room_id = %self.room_id, %starter, "game started");
        Ok(out)
    }

    /// Plays `tile` from `player`'s hand.
    ///
    /// Checks run in order: game running, player's turn, tile held, tile
    /// fits the board. Any failure leaves the session untouched.
    ///
    /// On success the tile leaves the hand. An emptied hand ends the game
    /// with `gameOver` to the room; otherwise the turn passes to the next
    /// present seat, the room gets `updateGameBox` and the new current
    /// player gets `yourTurn`.
    pub fn attempt_play(
        &mut self,
        player: PlayerId,
        tile: Tile,
    ) -> Result<Vec<Outbound>, RoomError> {
        if !self.phase.is_active() {
            return Err(RoomError::SessionNotActive(self.room_id.clone()));
        }
        let turn = self.current_turn;
        if self.seats[turn].player != player {
            return Err(RoomError::NotYourTurn);
        }
        let held = self.seats[turn]
            .hand
            .iter()
            .position(|t| *t == tile)
            .ok_or(RoomError::TileNotHeld(tile))?;

        let side = self.board.place(tile)?;
        self.seats[turn].hand.remove(held);
        tracing::debug!(
            room_id = %self.room_id,
            %player,
            %tile,
            ?side,
            left = self.seats[turn].hand.len(),
            "tile played"
        );

        if self.seats[turn].hand.is_empty() {
            self.phase = Phase::Over;
            tracing::info!(room_id = %self.room_id, winner = %player, "game over");
            return Ok(vec![(
                Recipient::Room,
                ServerEvent::GameOver { winner_id: player },
            )]);
        }

        // The acting seat is present, so there is always a next seat.
        self.current_turn = self.next_present_after(turn).unwrap_or(turn);
        let board = self.board.to_vec();
        let next = self.seats[self.current_turn].player;
        Ok(vec![
            (
                Recipient::Room,
                ServerEvent::UpdateGameBox {
                    board: board.clone(),
                },
            ),
            (Recipient::Player(next), ServerEvent::YourTurn { board }),
        ])
    }

    /// Marks `player`'s seat as vacated.
    ///
    /// The hand stays on the table. If it was the player's turn, the next
    /// present seat takes over and is told so. Nothing happens for a
    /// player without a seat, which includes everyone while forming.
    pub fn vacate(&mut self, player: PlayerId) -> Vec<Outbound> {
        let Some(index) = self.seat_index(player) else {
            return Vec::new();
        };
        self.seats[index].present = false;
        tracing::info!(room_id = %self.room_id, %player, seat = index, "seat vacated");

        if !self.phase.is_active() || self.current_turn != index {
            return Vec::new();
        }
        match self.next_present_after(index) {
            Some(next) => {
                self.current_turn = next;
                let next_player = self.seats[next].player;
                vec![(
                    Recipient::Player(next_player),
                    ServerEvent::YourTurn {
                        board: self.board.to_vec(),
                    },
                )]
            }
            None => Vec::new(),
        }
    }

    fn seat_index(&self, player: PlayerId) -> Option<usize> {
        self.seats.iter().position(|seat| seat.player == player)
    }

    /// The first present seat after `from` in turn order, wrapping around
    /// to `from` itself last.
    fn next_present_after(&self, from: usize) -> Option<usize> {
        let count = self.seats.len();
        (1..=count)
            .map(|step| (from + step) % count)
            .find(|&i| self.seats[i].present)
    }
}
