//! Core types shared across the crate
//! This module contains pure data types with no external dependencies

use serde::{Deserialize, Serialize};

/// Default board dimensions
pub const DEFAULT_ROWS: u32 = 8;
pub const DEFAULT_COLS: u32 = 6;

/// Minimum board edge. A 2x2 board gives every cell a capacity of at least 2,
/// so a freshly placed level-1 orb can never be critical.
pub const MIN_BOARD_EDGE: u32 = 2;

/// Player count bounds
pub const MIN_PLAYERS: usize = 2;
pub const MAX_PLAYERS: usize = 8;

/// One blast pass animates an orb displacement from 0 to `CUBE_WIDTH` world
/// units over `BLAST_TIME_MS` milliseconds; the board mutation happens when
/// the displacement reaches the cell width.
pub const BLAST_TIME_MS: f32 = 220.0;
pub const CUBE_WIDTH: f32 = 20.0;

/// Idle orb spin speed in degrees per second (render hint only)
pub const ROTATION_SPEED: f32 = 2.0;

/// Online: nudge a silent peer for the next input after this long
pub const RESEND_PING_MS: u32 = 60_000;

/// Player colors, in the palette order of the selector UI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerColor {
    Red,
    Green,
    Blue,
    Yellow,
    Cyan,
    Purple,
    Violet,
    Pink,
    Orange,
    Brown,
    Maroon,
    Grey,
}

impl PlayerColor {
    /// All supported colors, palette order
    pub const ALL: [PlayerColor; 12] = [
        PlayerColor::Red,
        PlayerColor::Green,
        PlayerColor::Blue,
        PlayerColor::Yellow,
        PlayerColor::Cyan,
        PlayerColor::Purple,
        PlayerColor::Violet,
        PlayerColor::Pink,
        PlayerColor::Orange,
        PlayerColor::Brown,
        PlayerColor::Maroon,
        PlayerColor::Grey,
    ];

    /// Parse color from string (case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "red" => Some(PlayerColor::Red),
            "green" => Some(PlayerColor::Green),
            "blue" => Some(PlayerColor::Blue),
            "yellow" => Some(PlayerColor::Yellow),
            "cyan" => Some(PlayerColor::Cyan),
            "purple" => Some(PlayerColor::Purple),
            "violet" => Some(PlayerColor::Violet),
            "pink" => Some(PlayerColor::Pink),
            "orange" => Some(PlayerColor::Orange),
            "brown" => Some(PlayerColor::Brown),
            "maroon" => Some(PlayerColor::Maroon),
            "grey" => Some(PlayerColor::Grey),
            _ => None,
        }
    }

    /// Convert to lowercase string
    pub fn as_str(&self) -> &'static str {
        match self {
            PlayerColor::Red => "red",
            PlayerColor::Green => "green",
            PlayerColor::Blue => "blue",
            PlayerColor::Yellow => "yellow",
            PlayerColor::Cyan => "cyan",
            PlayerColor::Purple => "purple",
            PlayerColor::Violet => "violet",
            PlayerColor::Pink => "pink",
            PlayerColor::Orange => "orange",
            PlayerColor::Brown => "brown",
            PlayerColor::Maroon => "maroon",
            PlayerColor::Grey => "grey",
        }
    }

    /// RGB triple in [0, 1] used by the render collaborator
    pub fn rgb(&self) -> [f32; 3] {
        match self {
            PlayerColor::Red => [1.0, 0.0, 0.0],
            PlayerColor::Green => [0.0, 1.0, 0.0],
            PlayerColor::Blue => [0.1, 0.3, 1.0],
            PlayerColor::Yellow => [1.0, 1.0, 0.0],
            PlayerColor::Cyan => [0.0, 1.0, 1.0],
            PlayerColor::Purple => [0.58, 0.0, 0.83],
            PlayerColor::Violet => [0.431, 0.392, 1.0],
            PlayerColor::Pink => [1.0, 0.412, 0.706],
            PlayerColor::Orange => [1.0, 0.27, 0.0],
            PlayerColor::Brown => [0.706, 0.314, 0.196],
            PlayerColor::Maroon => [0.70, 0.18, 0.36],
            PlayerColor::Grey => [0.67, 0.67, 0.67],
        }
    }
}

/// Three-valued turn query used by the online layer.
///
/// `Unready` means the question cannot be answered yet (a cascade is running
/// or the session is not fully configured) and the caller should poll again
/// on a later frame rather than treat it as an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnGate {
    Unready,
    NotMyTurn,
    MyTurn,
}
