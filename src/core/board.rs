//! Sparse board model
//!
//! Occupied cells live in a hash map keyed by the Cantor pairing of their
//! grid coordinate; empty cells are simply absent. Capacity is the number of
//! orthogonal neighbours a cell has, so corners saturate at 2, edges at 3 and
//! interior cells at 4.

use std::collections::HashMap;

use arrayvec::ArrayVec;
use serde::{Deserialize, Serialize};

use crate::core::coord;
use crate::types::PlayerColor;

/// One occupied cell
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    pub x: u32,
    pub y: u32,
    /// Orb count, always >= 1 (a cell at level 0 is removed instead)
    pub level: u32,
    pub color: PlayerColor,
    /// Idle-spin rotation axis, randomized when the orb appears (render hint)
    pub spin_axis: [f32; 3],
}

/// The game board: dimensions plus the sparse occupancy map
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Board {
    rows: u32,
    cols: u32,
    cells: HashMap<u64, Cell>,
}

impl Board {
    /// Create an empty board. Dimension validation happens at game setup.
    pub fn new(rows: u32, cols: u32) -> Self {
        Board {
            rows,
            cols,
            cells: HashMap::new(),
        }
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    pub fn cols(&self) -> u32 {
        self.cols
    }

    /// Check if a coordinate lies on the board. x runs over columns, y over
    /// rows.
    pub fn in_bounds(&self, x: u32, y: u32) -> bool {
        x < self.cols && y < self.rows
    }

    pub fn get(&self, x: u32, y: u32) -> Option<&Cell> {
        self.cells.get(&coord::pair(x, y))
    }

    pub fn get_key(&self, key: u64) -> Option<&Cell> {
        self.cells.get(&key)
    }

    pub fn contains(&self, x: u32, y: u32) -> bool {
        self.cells.contains_key(&coord::pair(x, y))
    }

    /// Insert or replace the cell at its own coordinate
    pub fn set(&mut self, cell: Cell) {
        self.cells.insert(coord::pair(cell.x, cell.y), cell);
    }

    pub fn remove_key(&mut self, key: u64) -> Option<Cell> {
        self.cells.remove(&key)
    }

    pub fn clear(&mut self) {
        self.cells.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Iterate over all occupied cells in unspecified order
    pub fn iter(&self) -> impl Iterator<Item = (&u64, &Cell)> {
        self.cells.iter()
    }

    /// Number of orthogonal neighbours, which is also the critical threshold
    pub fn capacity(&self, x: u32, y: u32) -> u32 {
        let mut n = 0;
        if x > 0 {
            n += 1;
        }
        if x + 1 < self.cols {
            n += 1;
        }
        if y > 0 {
            n += 1;
        }
        if y + 1 < self.rows {
            n += 1;
        }
        n
    }

    /// In-bounds orthogonal neighbours of a coordinate
    pub fn neighbours(&self, x: u32, y: u32) -> ArrayVec<(u32, u32), 4> {
        let mut out = ArrayVec::new();
        if x > 0 {
            out.push((x - 1, y));
        }
        if x + 1 < self.cols {
            out.push((x + 1, y));
        }
        if y > 0 {
            out.push((x, y - 1));
        }
        if y + 1 < self.rows {
            out.push((x, y + 1));
        }
        out
    }

    /// Does any cell on the board belong to this color
    pub fn has_color(&self, color: PlayerColor) -> bool {
        self.cells.values().any(|c| c.color == color)
    }

    /// Count of cells owned by the given color
    pub fn count_owned(&self, color: PlayerColor) -> usize {
        self.cells.values().filter(|c| c.color == color).count()
    }

    /// Total number of orbs on the board
    pub fn total_orbs(&self) -> u64 {
        self.cells.values().map(|c| c.level as u64).sum()
    }
}
