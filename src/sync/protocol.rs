//! Wire message types for online play
//!
//! JSON messages exchanged over the realtime channel and with the
//! matchmaking server. Field names follow the established wire format
//! (camelCase), so every struct carries explicit renames.

use serde::{Deserialize, Serialize};

/// Channel event carrying a move
pub const EVENT_INCOMING_INPUT: &str = "incoming-input";
/// Channel event asking a peer to re-broadcast a move
pub const EVENT_SEND_YOUR_INPUT: &str = "send-your-input";
/// Beacon sent to player one until the match starts
pub const EVENT_READY_BEACON: &str = "I-am-ready-to-start!";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireCoordinate {
    pub x: u32,
    pub y: u32,
}

/// One move on the wire. Sequence numbers start at 1 and are globally
/// ordered across all participants of a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveInput {
    #[serde(rename = "inputNumber")]
    pub seq: u64,
    #[serde(rename = "boardCoordinate")]
    pub coordinate: WireCoordinate,
    /// 1-based seat of the sender
    #[serde(rename = "onlinePosition")]
    pub position: u32,
    /// True only on the originating client; receivers force it false
    #[serde(rename = "isItALocalMove")]
    pub local: bool,
}

/// Retransmission ask for the move with the given sequence number
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResendRequest {
    #[serde(rename = "inputNumber")]
    pub seq: u64,
}

/// Start-handshake beacon; non-host seats repeat it until the match is live
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadyBeacon {
    #[serde(rename = "onlinePosition")]
    pub position: u32,
}

// ============== Matchmaking exchange ==============

/// Client request to the matchmaking server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "kebab-case")]
pub enum SessionCommand {
    SearchGame {
        players: u32,
        rows: u32,
        columns: u32,
    },
    CancelSearch {
        channel: String,
        rows: u32,
        columns: u32,
        #[serde(rename = "totalPlayers")]
        total_players: u32,
    },
    StartGame {
        channel: String,
        rows: u32,
        columns: u32,
        #[serde(rename = "onlinePosition")]
        position: u32,
        #[serde(rename = "totalPlayers")]
        total_players: u32,
    },
    ResetState {
        #[serde(rename = "updateChannel", skip_serializing_if = "Option::is_none")]
        #[serde(default)]
        update_channel: Option<bool>,
    },
}

/// Server reply. `game_state` is present on success; `reason` explains a
/// denial.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub game_state: Option<SessionState>,
}

/// Server-side view of one client's matchmaking state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SessionState {
    #[serde(rename = "isGameRunning")]
    pub is_game_running: bool,
    #[serde(rename = "isWaitingForGame")]
    pub is_waiting_for_game: bool,
    #[serde(rename = "isWaitingForMove")]
    pub is_waiting_for_move: bool,
    #[serde(rename = "totalPlayers")]
    pub total_players: u32,
    #[serde(rename = "onlinePosition", default)]
    pub online_position: Option<u32>,
    #[serde(default)]
    pub channel: Option<String>,
    pub rows: u32,
    pub columns: u32,
}
