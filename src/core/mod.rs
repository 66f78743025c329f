//! Pure game logic: board model, cascade resolution, turn state machine.
//! No I/O; the online layer in `crate::sync` drives this through its public
//! surface.

pub mod board;
pub mod bombs;
pub mod coord;
pub mod game;
pub mod rng;
pub mod snapshot;
