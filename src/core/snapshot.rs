//! Single-slot undo snapshot

use serde::{Deserialize, Serialize};

use crate::core::board::Board;

/// State captured immediately before a move is accepted.
///
/// The slot is overwritten on every accepted move and is never cleared by a
/// restore, so restoring twice in a row yields the same state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub board: Board,
    pub turn: usize,
    pub eliminated: Vec<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::board::Cell;
    use crate::types::PlayerColor;

    #[test]
    fn test_snapshot_is_independent_of_live_board() {
        let mut board = Board::new(8, 6);
        board.set(Cell {
            x: 1,
            y: 1,
            level: 1,
            color: PlayerColor::Red,
            spin_axis: [0.0, 0.0, 1.0],
        });
        let snap = GameSnapshot {
            board: board.clone(),
            turn: 0,
            eliminated: vec![],
        };
        board.set(Cell {
            x: 1,
            y: 1,
            level: 2,
            color: PlayerColor::Red,
            spin_axis: [0.0, 0.0, 1.0],
        });
        assert_eq!(snap.board.get(1, 1).map(|c| c.level), Some(1));
        assert_eq!(board.get(1, 1).map(|c| c.level), Some(2));
    }
}
