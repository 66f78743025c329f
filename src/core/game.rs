//! Game engine: board, cascade resolution and the turn state machine
//!
//! The engine is frame paced. Placing an orb that makes cells critical does
//! not mutate the board immediately; it arms a blast, and `tick` advances a
//! displacement until one cell width has been covered, at which point one
//! resolution pass runs. Newly critical cells are picked up by the next pass,
//! so deep chains resolve as a sequence of animated passes. Input is rejected
//! while a blast runs.

use std::collections::HashMap;

use thiserror::Error;

use crate::core::board::{Board, Cell};
use crate::core::bombs;
use crate::core::coord;
use crate::core::rng::SimpleRng;
use crate::core::snapshot::GameSnapshot;
use crate::types::{
    PlayerColor, BLAST_TIME_MS, CUBE_WIDTH, DEFAULT_COLS, DEFAULT_ROWS, MAX_PLAYERS,
    MIN_BOARD_EDGE, MIN_PLAYERS, ROTATION_SPEED,
};

/// Setup errors, fatal at construction
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("board must be at least {min}x{min}, got {rows}x{cols}")]
    BoardTooSmall { rows: u32, cols: u32, min: u32 },
    #[error("unsupported player count {0}")]
    PlayerCount(usize),
    #[error("duplicate player color '{}'", .0.as_str())]
    DuplicateColor(PlayerColor),
    #[error("online position {0} is not a seat of this game")]
    Position(u32),
}

/// Game setup parameters
#[derive(Debug, Clone)]
pub struct GameConfig {
    pub rows: u32,
    pub cols: u32,
    /// Seat order; seat 0 moves first
    pub players: Vec<PlayerColor>,
    /// Seed for the cosmetic spin-axis RNG
    pub seed: u64,
}

impl GameConfig {
    pub fn new(rows: u32, cols: u32, players: Vec<PlayerColor>) -> Self {
        GameConfig {
            rows,
            cols,
            players,
            seed: 0x5eed,
        }
    }

    /// The stock board size
    pub fn standard(players: Vec<PlayerColor>) -> Self {
        GameConfig::new(DEFAULT_ROWS, DEFAULT_COLS, players)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.rows < MIN_BOARD_EDGE || self.cols < MIN_BOARD_EDGE {
            return Err(ConfigError::BoardTooSmall {
                rows: self.rows,
                cols: self.cols,
                min: MIN_BOARD_EDGE,
            });
        }
        if self.players.len() < MIN_PLAYERS || self.players.len() > MAX_PLAYERS {
            return Err(ConfigError::PlayerCount(self.players.len()));
        }
        for (i, color) in self.players.iter().enumerate() {
            if self.players[..i].contains(color) {
                return Err(ConfigError::DuplicateColor(*color));
            }
        }
        Ok(())
    }
}

/// What one frame of `tick` did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickEvent {
    /// Nothing to resolve this frame
    Idle,
    /// A blast is in flight; orbs are mid-displacement
    Exploding,
    /// One resolution pass just mutated the board
    PassResolved,
    /// A single seat survives; reported every tick from then on
    GameOver { winner: usize },
}

/// The engine core. One instance is one match.
#[derive(Debug)]
pub struct Game {
    board: Board,
    players: Vec<PlayerColor>,
    /// Seats with zero cells on the board, in elimination order
    eliminated: Vec<usize>,
    /// Ever-increasing move counter; the active seat is `turn % players`
    turn: usize,
    bombs: Vec<(u64, Cell)>,
    spread: HashMap<u64, u32>,
    blast_running: bool,
    blast_displacement: f32,
    rotation_angle: f32,
    snapshot: Option<GameSnapshot>,
    winner: Option<usize>,
    rng: SimpleRng,
}

impl Game {
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Game {
            board: Board::new(config.rows, config.cols),
            players: config.players,
            eliminated: Vec::new(),
            turn: 0,
            bombs: Vec::new(),
            spread: HashMap::new(),
            blast_running: false,
            blast_displacement: 0.0,
            rotation_angle: 0.0,
            snapshot: None,
            winner: None,
            rng: SimpleRng::new(config.seed),
        })
    }

    /// Apply one move for the active seat. Returns false when the move is
    /// rejected: blast in flight, game decided, target out of bounds, or the
    /// target cell belongs to another player. Rejections leave all state
    /// untouched, including the undo slot.
    pub fn process_input(&mut self, x: u32, y: u32) -> bool {
        if self.blast_running || self.winner.is_some() {
            return false;
        }
        if !self.board.in_bounds(x, y) {
            return false;
        }
        let color = self.current_color();
        match self.board.get(x, y).copied() {
            None => {
                self.take_snapshot();
                let spin_axis = self.rng.spin_axis();
                self.board.set(Cell {
                    x,
                    y,
                    level: 1,
                    color,
                    spin_axis,
                });
            }
            Some(cell) if cell.color == color => {
                self.take_snapshot();
                self.board.set(Cell {
                    level: cell.level + 1,
                    ..cell
                });
            }
            Some(_) => return false,
        }
        self.recompute_bombs();
        if self.bombs.is_empty() {
            self.eliminate_players(true);
        } else {
            // Turn advancement waits for the cascade to drain.
            self.blast_running = true;
        }
        true
    }

    /// Advance the engine by one frame of `delta_ms` milliseconds.
    pub fn tick(&mut self, delta_ms: f32) -> TickEvent {
        if let Some(winner) = self.winner {
            return TickEvent::GameOver { winner };
        }
        if self.blast_running && self.bombs.is_empty() {
            // The cascade drained last frame; leave the blast state and hand
            // the turn over.
            self.blast_running = false;
            self.blast_displacement = 0.0;
            self.eliminate_players(true);
            return TickEvent::Idle;
        }
        if !self.bombs.is_empty() {
            self.blast_running = true;
            self.blast_displacement += CUBE_WIDTH / BLAST_TIME_MS * delta_ms;
            self.rotation_angle += ROTATION_SPEED * delta_ms / 1000.0;
            if self.blast_displacement >= CUBE_WIDTH {
                return self.resolve_pass();
            }
            return TickEvent::Exploding;
        }
        if !self.board.is_empty() {
            self.rotation_angle += ROTATION_SPEED * delta_ms / 1000.0;
        }
        TickEvent::Idle
    }

    /// One resolution pass: detonate every current bomb at once.
    fn resolve_pass(&mut self) -> TickEvent {
        // Capture color of the whole pass comes from the lowest-keyed bomb.
        let bomb_color = self.bombs[0].1.color;
        for (key, _) in &self.bombs {
            self.board.remove_key(*key);
        }
        // Apply in key order: fresh cells draw spin axes from the RNG, and
        // seeded replays must draw them for the same cells in the same order.
        let mut spread: Vec<(u64, u32)> = std::mem::take(&mut self.spread).into_iter().collect();
        spread.sort_unstable_by_key(|&(key, _)| key);
        for (key, count) in spread {
            match self.board.get_key(key).copied() {
                Some(cell) => {
                    self.board.set(Cell {
                        level: cell.level + count,
                        color: bomb_color,
                        ..cell
                    });
                }
                None => {
                    let (x, y) = coord::unpair(key);
                    let spin_axis = self.rng.spin_axis();
                    self.board.set(Cell {
                        x,
                        y,
                        level: count,
                        color: bomb_color,
                        spin_axis,
                    });
                }
            }
        }
        self.recompute_bombs();
        self.blast_displacement = 0.0;
        // Captures may have wiped a player out mid-cascade; the turn itself
        // only advances once the cascade drains.
        self.eliminate_players(false);
        if self.eliminated.len() == self.players.len() - 1 {
            let winner = (0..self.players.len())
                .find(|seat| !self.eliminated.contains(seat))
                .unwrap_or(0);
            self.winner = Some(winner);
            return TickEvent::GameOver { winner };
        }
        TickEvent::PassResolved
    }

    /// Elimination scan and optional turn advancement.
    ///
    /// During the first cycle every seat gets one move before anyone can be
    /// eliminated (a player with no cells simply has not moved yet).
    fn eliminate_players(&mut self, update_turn: bool) {
        if update_turn && self.turn < self.players.len() {
            self.turn += 1;
            return;
        }
        for seat in 0..self.players.len() {
            if !self.eliminated.contains(&seat) && !self.board.has_color(self.players[seat]) {
                self.eliminated.push(seat);
            }
        }
        if update_turn {
            let len = self.players.len();
            loop {
                self.turn += 1;
                if !self.eliminated.contains(&(self.turn % len)) {
                    break;
                }
            }
        }
    }

    fn take_snapshot(&mut self) {
        self.snapshot = Some(GameSnapshot {
            board: self.board.clone(),
            turn: self.turn,
            eliminated: self.eliminated.clone(),
        });
    }

    fn recompute_bombs(&mut self) {
        self.bombs = bombs::critical_cells(&self.board);
        self.spread = bombs::spread_counts(&self.board, &self.bombs);
    }

    /// Restore the last snapshot. The slot is kept, so calling twice restores
    /// the same state. Refused while a blast runs or before the first move.
    pub fn undo(&mut self) -> bool {
        if self.blast_running {
            return false;
        }
        match &self.snapshot {
            Some(snap) => {
                self.board = snap.board.clone();
                self.turn = snap.turn;
                self.eliminated = snap.eliminated.clone();
                self.recompute_bombs();
                true
            }
            None => false,
        }
    }

    /// Clear all match state back to an empty board
    pub fn reset(&mut self) {
        self.board.clear();
        self.eliminated.clear();
        self.turn = 0;
        self.bombs.clear();
        self.spread.clear();
        self.blast_running = false;
        self.blast_displacement = 0.0;
        self.rotation_angle = 0.0;
        self.snapshot = None;
        self.winner = None;
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn players(&self) -> &[PlayerColor] {
        &self.players
    }

    pub fn turn(&self) -> usize {
        self.turn
    }

    /// Seat index of the player to move
    pub fn current_player(&self) -> usize {
        self.turn % self.players.len()
    }

    pub fn current_color(&self) -> PlayerColor {
        self.players[self.current_player()]
    }

    pub fn eliminated(&self) -> &[usize] {
        &self.eliminated
    }

    pub fn is_eliminated(&self, seat: usize) -> bool {
        self.eliminated.contains(&seat)
    }

    /// Seats still in the game
    pub fn active_players(&self) -> usize {
        self.players.len() - self.eliminated.len()
    }

    pub fn winner(&self) -> Option<usize> {
        self.winner
    }

    pub fn is_blast_running(&self) -> bool {
        self.blast_running
    }

    /// Current pass displacement in world units, for the render collaborator
    pub fn blast_displacement(&self) -> f32 {
        self.blast_displacement
    }

    /// Accumulated idle-spin angle in degrees
    pub fn rotation_angle(&self) -> f32 {
        self.rotation_angle % 360.0
    }

    /// Cells detonating in the pass currently in flight
    pub fn current_bombs(&self) -> &[(u64, Cell)] {
        &self.bombs
    }

    /// Cells receiving orbs from the pass currently in flight
    pub fn current_spread(&self) -> &HashMap<u64, u32> {
        &self.spread
    }

    /// World-space center of a cell, origin at the board middle
    pub fn cell_center(&self, x: u32, y: u32) -> [f32; 2] {
        let origin_x = -0.5 * self.board.cols() as f32 * CUBE_WIDTH;
        let origin_y = -0.5 * self.board.rows() as f32 * CUBE_WIDTH;
        [
            (x as f32 + 0.5) * CUBE_WIDTH + origin_x,
            (y as f32 + 0.5) * CUBE_WIDTH + origin_y,
        ]
    }
}
