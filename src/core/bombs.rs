//! Critical-cell detection and blast spread
//!
//! A cell is critical ("a bomb") when its orb count has reached its
//! capacity. A resolution pass detonates every bomb present at once; the
//! spread map counts how many bombs feed each neighbour, so a cell adjacent
//! to several bombs gains one orb per bomb in the same pass.

use std::collections::HashMap;

use crate::core::board::{Board, Cell};
use crate::core::coord;

/// All critical cells, sorted ascending by their board key.
///
/// The ordering makes multi-bomb passes deterministic: the capture color of
/// a pass is taken from the first bomb in this list.
pub fn critical_cells(board: &Board) -> Vec<(u64, Cell)> {
    let mut bombs: Vec<(u64, Cell)> = board
        .iter()
        .filter(|(_, cell)| cell.level >= board.capacity(cell.x, cell.y))
        .map(|(key, cell)| (*key, *cell))
        .collect();
    bombs.sort_unstable_by_key(|(key, _)| *key);
    bombs
}

/// Map from neighbour key to the number of bombs feeding it this pass
pub fn spread_counts(board: &Board, bombs: &[(u64, Cell)]) -> HashMap<u64, u32> {
    let mut spread = HashMap::new();
    for (_, bomb) in bombs {
        for (nx, ny) in board.neighbours(bomb.x, bomb.y) {
            *spread.entry(coord::pair(nx, ny)).or_insert(0) += 1;
        }
    }
    spread
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PlayerColor;

    fn cell(x: u32, y: u32, level: u32, color: PlayerColor) -> Cell {
        Cell {
            x,
            y,
            level,
            color,
            spin_axis: [0.0, 1.0, 0.0],
        }
    }

    #[test]
    fn test_corner_critical_at_two() {
        let mut board = Board::new(8, 6);
        board.set(cell(0, 0, 1, PlayerColor::Red));
        assert!(critical_cells(&board).is_empty());
        board.set(cell(0, 0, 2, PlayerColor::Red));
        let bombs = critical_cells(&board);
        assert_eq!(bombs.len(), 1);
        assert_eq!(bombs[0].0, coord::pair(0, 0));
    }

    #[test]
    fn test_interior_critical_at_four() {
        let mut board = Board::new(8, 6);
        board.set(cell(2, 3, 3, PlayerColor::Blue));
        assert!(critical_cells(&board).is_empty());
        board.set(cell(2, 3, 4, PlayerColor::Blue));
        assert_eq!(critical_cells(&board).len(), 1);
    }

    #[test]
    fn test_bombs_sorted_by_key() {
        let mut board = Board::new(8, 6);
        board.set(cell(3, 4, 4, PlayerColor::Red));
        board.set(cell(0, 0, 2, PlayerColor::Blue));
        board.set(cell(1, 1, 4, PlayerColor::Green));
        let bombs = critical_cells(&board);
        let keys: Vec<u64> = bombs.iter().map(|(k, _)| *k).collect();
        let mut sorted = keys.clone();
        sorted.sort_unstable();
        assert_eq!(keys, sorted);
        // (0,0) has the lowest key so it leads the pass
        assert_eq!(bombs[0].1.color, PlayerColor::Blue);
    }

    #[test]
    fn test_spread_counts_multiplicity() {
        let mut board = Board::new(8, 6);
        // Two bombs flanking (1, 1): both feed it in the same pass.
        board.set(cell(0, 1, 3, PlayerColor::Red));
        board.set(cell(2, 1, 4, PlayerColor::Red));
        let bombs = critical_cells(&board);
        assert_eq!(bombs.len(), 2);
        let spread = spread_counts(&board, &bombs);
        assert_eq!(spread.get(&coord::pair(1, 1)), Some(&2));
        assert_eq!(spread.get(&coord::pair(0, 0)), Some(&1));
        // Bomb cells themselves are not targets unless a neighbour feeds them
        assert_eq!(spread.get(&coord::pair(0, 1)), None);
    }
}
