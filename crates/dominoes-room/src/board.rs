//! The chain of played tiles ("game box").

use std::collections::VecDeque;

use dominoes_protocol::Tile;

use crate::RoomError;

/// Which end of the chain a tile was laid on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Head,
    Tail,
}

/// The played chain and its two exposed ends.
///
/// Tiles keep their catalog orientation; `ends` records the value showing
/// at the head and at the tail. An empty board has no ends and accepts any
/// tile.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Board {
    tiles: VecDeque<Tile>,
    /// `(head, tail)`, `None` while the board is empty.
    ends: Option<(u8, u8)>,
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn head_end(&self) -> Option<u8> {
        self.ends.map(|(head, _)| head)
    }

    pub fn tail_end(&self) -> Option<u8> {
        self.ends.map(|(_, tail)| tail)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.iter()
    }

    /// The chain head to tail, as sent to clients.
    pub fn to_vec(&self) -> Vec<Tile> {
        self.tiles.iter().copied().collect()
    }

    /// Where `tile` would go, without placing it.
    ///
    /// The head wins whenever the tile matches it, even if the tail would
    /// also fit.
    pub fn placement(&self, tile: &Tile) -> Option<Side> {
        match self.ends {
            None => Some(Side::Head),
            Some((head, _)) if tile.matches(head) => Some(Side::Head),
            Some((_, tail)) if tile.matches(tail) => Some(Side::Tail),
            Some(_) => None,
        }
    }

    /// Lays `tile` on the chain and updates the exposed end.
    ///
    /// The new exposed end is the tile side that was not matched. The first
    /// tile exposes `end_a` at the head and `end_b` at the tail.
    ///
    /// # Errors
    /// [`RoomError::IllegalMove`] if the tile fits neither end. The board
    /// is unchanged.
    pub fn place(&mut self, tile: Tile) -> Result<Side, RoomError> {
        let Some((head, tail)) = self.ends else {
            self.tiles.push_front(tile);
            self.ends = Some((tile.end_a, tile.end_b));
            return Ok(Side::Head);
        };

        if let Some(exposed) = tile.other_end(head) {
            self.tiles.push_front(tile);
            self.ends = Some((exposed, tail));
            Ok(Side::Head)
        } else if let Some(exposed) = tile.other_end(tail) {
            self.tiles.push_back(tile);
            self.ends = Some((head, exposed));
            Ok(Side::Tail)
        } else {
            Err(RoomError::IllegalMove(tile))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(id: u32, a: u8, b: u8) -> Tile {
        Tile::new(id, a, b)
    }

    #[test]
    fn test_empty_board_accepts_anything() {
        let board = Board::new();
        assert!(board.is_empty());
        assert_eq!(board.head_end(), None);
        assert_eq!(board.tail_end(), None);
        assert!(board.placement(&t(1, 3, 5)).is_some());
        assert_eq!(board.placement(&t(1, 6, 2)), Some(Side::Head));
    }

    #[test]
    fn test_first_tile_exposes_both_ends() {
        let mut board = Board::new();
        assert_eq!(board.place(t(1, 3, 5)), Ok(Side::Head));
        assert_eq!(board.to_vec(), vec![t(1, 3, 5)]);
        assert_eq!(board.head_end(), Some(3));
        assert_eq!(board.tail_end(), Some(5));
    }

    #[test]
    fn test_tail_match_appends() {
        let mut board = Board::new();
        board.place(t(1, 3, 5)).unwrap();
        assert_eq!(board.place(t(2, 5, 6)), Ok(Side::Tail));
        assert_eq!(board.to_vec(), vec![t(1, 3, 5), t(2, 5, 6)]);
        assert_eq!(board.head_end(), Some(3));
        assert_eq!(board.tail_end(), Some(6));
    }

    #[test]
    fn test_head_match_prepends_and_exposes_other_side() {
        let mut board = Board::new();
        board.place(t(1, 3, 5)).unwrap();
        // {1,3} matches head 3 through end_b; end_a becomes the head.
        assert_eq!(board.place(t(2, 1, 3)), Ok(Side::Head));
        assert_eq!(board.to_vec(), vec![t(2, 1, 3), t(1, 3, 5)]);
        assert_eq!(board.head_end(), Some(1));
        assert_eq!(board.tail_end(), Some(5));
    }

    #[test]
    fn test_tile_matching_both_ends_goes_to_head() {
        let mut board = Board::new();
        board.place(t(1, 2, 6)).unwrap();
        board.place(t(2, 6, 4)).unwrap();
        assert_eq!(board.head_end(), Some(2));
        assert_eq!(board.tail_end(), Some(4));

        let both = t(3, 2, 4);
        assert_eq!(board.placement(&both), Some(Side::Head));
        assert_eq!(board.place(both), Ok(Side::Head));
        assert_eq!(board.head_end(), Some(4));
        assert_eq!(board.tail_end(), Some(4));
    }

    #[test]
    fn test_double_keeps_exposed_value() {
        let mut board = Board::new();
        board.place(t(1, 0, 0)).unwrap();
        board.place(t(2, 0, 4)).unwrap();
        assert_eq!(board.head_end(), Some(4));
        assert_eq!(board.place(t(3, 4, 4)), Ok(Side::Head));
        assert_eq!(board.head_end(), Some(4));
        assert_eq!(board.len(), 3);
    }

    #[test]
    fn test_illegal_tile_leaves_board_unchanged() {
        let mut board = Board::new();
        board.place(t(1, 3, 5)).unwrap();
        let before = board.clone();

        assert!(board.placement(&t(2, 1, 2)).is_none());
        assert_eq!(board.place(t(2, 1, 2)), Err(RoomError::IllegalMove(t(2, 1, 2))));
        assert_eq!(board, before);
    }

    #[test]
    fn test_iter_runs_head_to_tail() {
        let mut board = Board::new();
        board.place(t(1, 3, 5)).unwrap();
        board.place(t(2, 5, 6)).unwrap();
        board.place(t(3, 2, 3)).unwrap();
        let ids: Vec<u32> = board.iter().map(|tile| tile.id).collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }
}
