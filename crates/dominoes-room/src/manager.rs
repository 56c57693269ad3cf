//! Room manager: routes players into rooms and drives their games.

use dominoes_protocol::{PlayerId, Recipient, RoomId, ServerEvent, Tile};

use crate::deck::{Dealer, ShuffleDealer, full_catalog};
use crate::session::Outbound;
use crate::{GameSession, Phase, RoomConfig, RoomError, RoomRegistry, SEATS, SessionDirectory};

/// An event addressed to one concrete player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    pub player: PlayerId,
    pub event: ServerEvent,
}

impl Delivery {
    pub fn new(player: PlayerId, event: ServerEvent) -> Self {
        Self { player, event }
    }
}

/// A snapshot of room metadata (not the game itself).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomInfo {
    pub room_id: RoomId,
    pub phase: Phase,
    /// Connected members. Vacated seats are not counted.
    pub member_count: usize,
    /// Whose turn it is, once the game is running.
    pub current_player: Option<PlayerId>,
}

/// Owns every room: membership, sessions and the dealer.
///
/// All methods are synchronous and take `&mut self`; the caller serialises
/// access (the gateway task owns the only instance). Each operation returns
/// the [`Delivery`]s it produced, with room broadcasts already expanded to
/// the members present at that moment.
pub struct RoomManager<D: Dealer = ShuffleDealer> {
    registry: RoomRegistry,
    directory: SessionDirectory,
    dealer: D,
}

impl RoomManager {
    /// Creates a manager that deals with a [`ShuffleDealer`] seeded from
    /// `config`.
    pub fn new(config: RoomConfig) -> Self {
        Self::with_dealer(ShuffleDealer::from_config(&config))
    }
}

impl Default for RoomManager {
    fn default() -> Self {
        Self::new(RoomConfig::default())
    }
}

impl<D: Dealer> RoomManager<D> {
    pub fn with_dealer(dealer: D) -> Self {
        Self {
            registry: RoomRegistry::new(),
            directory: SessionDirectory::new(),
            dealer,
        }
    }

    /// Seats `player` in `room_id`, creating the room if needed.
    ///
    /// The fourth member deals the hands and starts the game; the returned
    /// deliveries are then every `receiveHand` plus the opening `yourTurn`.
    ///
    /// # Errors
    /// - [`RoomError::AlreadyInRoom`] if the player already sits somewhere
    /// - [`RoomError::GameInProgress`] if the room's game has started
    /// - a deal failure ([`RoomError::is_fatal`]), after which the room is
    ///   closed and every member, the joiner included, is unseated
    pub fn join_room(
        &mut self,
        room_id: &RoomId,
        player: PlayerId,
    ) -> Result<Vec<Delivery>, RoomError> {
        if let Some(current) = self.registry.room_of(player) {
            return Err(RoomError::AlreadyInRoom(player, current.clone()));
        }
        if self
            .directory
            .get(room_id)
            .is_some_and(|session| !session.phase().is_joinable())
        {
            return Err(RoomError::GameInProgress(room_id.clone()));
        }

        let members = self.registry.join(room_id, player)?.to_vec();
        self.directory.open(room_id);
        tracing::info!(%room_id, %player, members = members.len(), "player joined room");

        if members.len() < SEATS {
            return Ok(Vec::new());
        }

        match self.start_game(room_id, &members) {
            Ok(out) => Ok(self.resolve(room_id, out)),
            Err(e) => {
                if e.is_fatal() {
                    tracing::error!(%room_id, error = %e, "could not start game, closing room");
                } else {
                    tracing::warn!(%room_id, error = %e, "could not start game, closing room");
                }
                self.teardown(room_id);
                Err(e)
            }
        }
    }

    /// Plays `tile` for `player` in `room_id`.
    ///
    /// A winning play closes the room after the `gameOver` broadcast has
    /// been addressed.
    ///
    /// # Errors
    /// [`RoomError::NotFound`] if the room does not exist, otherwise
    /// whatever [`GameSession::attempt_play`] rejects the move with.
    pub fn play(
        &mut self,
        room_id: &RoomId,
        player: PlayerId,
        tile: Tile,
    ) -> Result<Vec<Delivery>, RoomError> {
        let session = self
            .directory
            .get_mut(room_id)
            .ok_or_else(|| RoomError::NotFound(room_id.clone()))?;

        let out = session
            .attempt_play(player, tile)
            .inspect_err(|e| tracing::debug!(%room_id, %player, %tile, error = %e, "play rejected"))?;
        let finished = session.phase() == Phase::Over;

        let deliveries = self.resolve(room_id, out);
        if finished {
            self.teardown(room_id);
        }
        Ok(deliveries)
    }

    /// Takes `player` out of whatever room it is in.
    ///
    /// While forming the seat simply frees up. Mid-game the seat is
    /// vacated and, if it was on turn, the next present seat is told to
    /// play. The last member out closes the room. Unknown players are
    /// ignored.
    pub fn leave_room(&mut self, player: PlayerId) -> Vec<Delivery> {
        let Some(departure) = self.registry.leave(player) else {
            return Vec::new();
        };
        let room_id = departure.room_id.clone();
        tracing::info!(%room_id, %player, remaining = departure.remaining.len(), "player left room");

        if departure.emptied_room() {
            self.directory.remove(&room_id);
            tracing::info!(%room_id, "room closed, no members left");
            return Vec::new();
        }

        let out = match self.directory.get_mut(&room_id) {
            Some(session) => session.vacate(player),
            None => Vec::new(),
        };
        self.resolve(&room_id, out)
    }

    /// Returns info about a specific room.
    pub fn room_info(&self, room_id: &RoomId) -> Result<RoomInfo, RoomError> {
        let members = self
            .registry
            .members(room_id)
            .ok_or_else(|| RoomError::NotFound(room_id.clone()))?;
        let session = self.directory.get(room_id);
        Ok(RoomInfo {
            room_id: room_id.clone(),
            phase: session.map_or(Phase::Forming, GameSession::phase),
            member_count: members.len(),
            current_player: session.and_then(GameSession::current_player),
        })
    }

    pub fn session(&self, room_id: &RoomId) -> Option<&GameSession> {
        self.directory.get(room_id)
    }

    /// Returns the room a player is currently in, if any.
    pub fn player_room(&self, player: PlayerId) -> Option<&RoomId> {
        self.registry.room_of(player)
    }

    pub fn members(&self, room_id: &RoomId) -> Option<&[PlayerId]> {
        self.registry.members(room_id)
    }

    /// Returns the number of live rooms.
    pub fn room_count(&self) -> usize {
        self.registry.room_count()
    }

    fn start_game(
        &mut self,
        room_id: &RoomId,
        members: &[PlayerId],
    ) -> Result<Vec<Outbound>, RoomError> {
        let players: [PlayerId; SEATS] = std::array::from_fn(|seat| members[seat]);
        let hands = self.dealer.deal(full_catalog())?;
        self.directory.open(room_id).activate(players, hands)
    }

    /// Expands recipients against the current membership.
    fn resolve(&self, room_id: &RoomId, out: Vec<Outbound>) -> Vec<Delivery> {
        let members = self.registry.members(room_id).unwrap_or_default();
        let mut deliveries = Vec::with_capacity(out.len() + members.len());
        for (recipient, event) in out {
            match recipient {
                Recipient::Room => deliveries.extend(
                    members
                        .iter()
                        .map(|member| Delivery::new(*member, event.clone())),
                ),
                Recipient::Player(player) => deliveries.push(Delivery::new(player, event)),
            }
        }
        deliveries
    }

    /// Drops the room's session and every membership in it.
    fn teardown(&mut self, room_id: &RoomId) {
        let evicted = self.registry.remove_room(room_id);
        self.directory.remove(room_id);
        tracing::info!(%room_id, evicted = evicted.len(), "room closed");
    }
}
