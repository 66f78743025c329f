//! Chain Reaction game engine
//!
//! A frame-paced implementation of the Chain Reaction board game: players
//! take turns stacking orbs on a grid, a cell that reaches its neighbour
//! count detonates into those neighbours and captures them, and chains of
//! detonations resolve as animated passes until one player owns the board.
//!
//! `core` holds the pure game logic (board, cascade, turns, undo); `sync`
//! adds networked play on top of it (sequence-ordered move exchange,
//! rollback on failed broadcast, matchmaking). Rendering and real sockets
//! live outside this crate, behind the read-only board accessors and the
//! `Transport`/`SessionClient` traits.

pub mod core;
pub mod sync;
pub mod types;

pub use crate::core::board::{Board, Cell};
pub use crate::core::game::{ConfigError, Game, GameConfig, TickEvent};
pub use crate::sync::session::OnlineSession;
pub use crate::types::{PlayerColor, TurnGate};
