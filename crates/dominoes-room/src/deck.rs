//! The double-six set and the dealers that split it into four hands.

use std::collections::HashSet;

use dominoes_protocol::{MAX_PIPS, Tile};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::{RoomConfig, RoomError, SEATS};

/// Tiles in a double-six set.
pub const CATALOG_SIZE: usize = 28;

/// Tiles dealt to each seat.
pub const HAND_SIZE: usize = 7;

const _: () = assert!(SEATS * HAND_SIZE == CATALOG_SIZE);

/// Four dealt hands, in seat order.
pub type Hands = [Vec<Tile>; SEATS];

/// Builds the 28 canonical tiles.
///
/// Ids run from 1 walking `end_a` up from 0 and `end_b` up from `end_a`, so
/// the double-blank is always id 1. A fresh `Vec` every call.
pub fn full_catalog() -> Vec<Tile> {
    let mut tiles = Vec::with_capacity(CATALOG_SIZE);
    let mut id = 1;
    for a in 0..=MAX_PIPS {
        for b in a..=MAX_PIPS {
            tiles.push(Tile::new(id, a, b));
            id += 1;
        }
    }
    tiles
}

/// The `{0,0}` tile. Whoever holds it opens the round.
pub const DOUBLE_BLANK: Tile = Tile::new(1, 0, 0);

/// Returns `true` for the double-blank, whatever id it was given.
pub fn is_double_blank(tile: &Tile) -> bool {
    tile.end_a == DOUBLE_BLANK.end_a && tile.end_b == DOUBLE_BLANK.end_b
}

/// Checks that `tiles`, in any order, are exactly the [`full_catalog`].
fn check_full_set<'a>(tiles: impl Iterator<Item = &'a Tile>) -> Result<(), RoomError> {
    let canonical: HashSet<Tile> = full_catalog().into_iter().collect();
    let mut seen = HashSet::new();
    let mut total = 0;
    for tile in tiles {
        total += 1;
        if canonical.contains(tile) {
            seen.insert(*tile);
        }
    }
    if total != CATALOG_SIZE || seen.len() != CATALOG_SIZE {
        return Err(RoomError::InvalidCatalog {
            expected: CATALOG_SIZE,
            actual: seen.len(),
        });
    }
    Ok(())
}

/// Shuffles `catalog` and splits it into four hands of seven.
///
/// Every tile lands in exactly one hand.
///
/// # Errors
/// [`RoomError::InvalidCatalog`] unless `catalog` is the full set: the
/// [`CATALOG_SIZE`] tiles of [`full_catalog`], each once, in any order.
pub fn deal_four_hands<R: Rng + ?Sized>(
    mut catalog: Vec<Tile>,
    rng: &mut R,
) -> Result<Hands, RoomError> {
    check_full_set(catalog.iter())?;

    catalog.shuffle(rng);

    let mut hands: Hands = Default::default();
    for (i, tile) in catalog.into_iter().enumerate() {
        hands[i / HAND_SIZE].push(tile);
    }
    Ok(hands)
}

// ---------------------------------------------------------------------------
// Dealer
// ---------------------------------------------------------------------------

/// Produces the four hands when a table fills up.
///
/// The room manager owns one dealer for all its rooms.
pub trait Dealer: Send + 'static {
    /// Splits `catalog` into four hands in seat order.
    fn deal(&mut self, catalog: Vec<Tile>) -> Result<Hands, RoomError>;
}

/// Uniform random deals from a [`StdRng`].
#[derive(Debug, Clone)]
pub struct ShuffleDealer {
    rng: StdRng,
}

impl ShuffleDealer {
    /// Seeded from `seed` when given, from the OS otherwise.
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self { rng }
    }

    pub fn from_config(config: &RoomConfig) -> Self {
        Self::new(config.deal_seed)
    }
}

impl Dealer for ShuffleDealer {
    fn deal(&mut self, catalog: Vec<Tile>) -> Result<Hands, RoomError> {
        deal_four_hands(catalog, &mut self.rng)
    }
}

/// Deals the same prearranged hands every time.
///
/// For staged tables (tutorials, replays of a reported game, tests). The
/// hands are checked once up front to be a full partition of the set.
#[derive(Debug, Clone)]
pub struct PresetDealer {
    hands: Hands,
}

impl PresetDealer {
    /// # Errors
    /// [`RoomError::InvalidCatalog`] unless the hands are four groups of
    /// seven that together are exactly the catalog.
    pub fn new(hands: Hands) -> Result<Self, RoomError> {
        check_full_set(hands.iter().flatten())?;
        if hands.iter().any(|h| h.len() != HAND_SIZE) {
            return Err(RoomError::InvalidCatalog {
                expected: CATALOG_SIZE,
                actual: CATALOG_SIZE,
            });
        }
        Ok(Self { hands })
    }
}

impl Dealer for PresetDealer {
    fn deal(&mut self, _catalog: Vec<Tile>) -> Result<Hands, RoomError> {
        Ok(self.hands.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted_ids(hands: &Hands) -> Vec<u32> {
        let mut ids: Vec<u32> = hands.iter().flatten().map(|t| t.id).collect();
        ids.sort_unstable();
        ids
    }

    #[test]
    fn test_full_catalog_has_28_unique_pairs() {
        let catalog = full_catalog();
        assert_eq!(catalog.len(), CATALOG_SIZE);

        let pairs: HashSet<(u8, u8)> = catalog
            .iter()
            .map(|t| (t.end_a.min(t.end_b), t.end_a.max(t.end_b)))
            .collect();
        assert_eq!(pairs.len(), CATALOG_SIZE);

        let ids: HashSet<u32> = catalog.iter().map(|t| t.id).collect();
        assert_eq!(ids.len(), CATALOG_SIZE);
        assert_eq!(catalog.iter().filter(|t| t.is_double()).count(), 7);
    }

    #[test]
    fn test_full_catalog_double_blank_is_id_one() {
        let catalog = full_catalog();
        assert!(is_double_blank(&catalog[0]));
        assert_eq!(catalog[0], DOUBLE_BLANK);
        assert_eq!(catalog.iter().filter(|t| is_double_blank(t)).count(), 1);
    }

    #[test]
    fn test_full_catalog_is_fresh_each_call() {
        let mut first = full_catalog();
        first.clear();
        assert_eq!(full_catalog().len(), CATALOG_SIZE);
    }

    #[test]
    fn test_deal_partitions_catalog_for_many_seeds() {
        let expected: Vec<u32> = (1..=28).collect();
        for seed in 0..200 {
            let mut rng = StdRng::seed_from_u64(seed);
            let hands = deal_four_hands(full_catalog(), &mut rng).unwrap();
            assert!(hands.iter().all(|h| h.len() == HAND_SIZE), "seed {seed}");
            assert_eq!(sorted_ids(&hands), expected, "seed {seed}");
        }
    }

    #[test]
    fn test_deal_same_seed_same_hands() {
        let a = ShuffleDealer::new(Some(7)).deal(full_catalog()).unwrap();
        let b = ShuffleDealer::new(Some(7)).deal(full_catalog()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_deal_double_blank_position_varies() {
        // Over enough seeds the double-blank must show up in every seat.
        let mut seats_seen = HashSet::new();
        for seed in 0..200 {
            let mut rng = StdRng::seed_from_u64(seed);
            let hands = deal_four_hands(full_catalog(), &mut rng).unwrap();
            let seat = hands
                .iter()
                .position(|h| h.iter().any(is_double_blank))
                .unwrap();
            seats_seen.insert(seat);
        }
        assert_eq!(seats_seen.len(), SEATS);
    }

    #[test]
    fn test_deal_rejects_short_catalog() {
        let mut catalog = full_catalog();
        catalog.pop();
        let mut rng = StdRng::seed_from_u64(1);
        let err = deal_four_hands(catalog, &mut rng).unwrap_err();
        assert_eq!(
            err,
            RoomError::InvalidCatalog {
                expected: 28,
                actual: 27
            }
        );
    }

    #[test]
    fn test_deal_rejects_duplicate_ids() {
        let mut catalog = full_catalog();
        catalog[27] = catalog[0];
        let mut rng = StdRng::seed_from_u64(1);
        assert!(deal_four_hands(catalog, &mut rng).is_err());
    }

    #[test]
    fn test_deal_rejects_non_canonical_tiles() {
        // Distinct ids, but every tile is a double-blank.
        let catalog: Vec<Tile> = (1..=28).map(|id| Tile::new(id, 0, 0)).collect();
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(
            deal_four_hands(catalog, &mut rng),
            Err(RoomError::InvalidCatalog {
                expected: 28,
                actual: 1
            })
        );
    }

    #[test]
    fn test_deal_accepts_catalog_in_any_order() {
        let mut catalog = full_catalog();
        catalog.reverse();
        let mut rng = StdRng::seed_from_u64(3);
        assert!(deal_four_hands(catalog, &mut rng).is_ok());
    }

    #[test]
    fn test_preset_dealer_returns_its_hands() {
        let catalog = full_catalog();
        let hands: Hands = std::array::from_fn(|seat| {
            catalog[seat * HAND_SIZE..(seat + 1) * HAND_SIZE].to_vec()
        });
        let mut dealer = PresetDealer::new(hands.clone()).unwrap();
        assert_eq!(dealer.deal(Vec::new()).unwrap(), hands);
    }

    #[test]
    fn test_preset_dealer_rejects_uneven_hands() {
        let catalog = full_catalog();
        let mut hands: Hands = Default::default();
        hands[0] = catalog[..8].to_vec();
        hands[1] = catalog[8..14].to_vec();
        hands[2] = catalog[14..21].to_vec();
        hands[3] = catalog[21..].to_vec();
        assert!(PresetDealer::new(hands).is_err());
    }

    #[test]
    fn test_preset_dealer_rejects_altered_tile() {
        let catalog = full_catalog();
        let mut hands: Hands = std::array::from_fn(|seat| {
            catalog[seat * HAND_SIZE..(seat + 1) * HAND_SIZE].to_vec()
        });
        hands[3][0] = Tile::new(hands[3][0].id, 6, 6);
        assert!(PresetDealer::new(hands).is_err());
    }
}
