//! Matchmaking client state machine
//!
//! Drives the search / cancel / start exchange with the matchmaking server
//! and tracks presence-channel membership while a match fills up. The server
//! is behind a `SessionClient`; a denial resets the waiting state and leaves
//! a user-facing message, a transport failure additionally surfaces the
//! error to the caller.

use std::collections::BTreeSet;

use anyhow::Result;
use serde_json::Value;

use crate::sync::protocol::{
    ReadyBeacon, SessionCommand, SessionResponse, SessionState, EVENT_READY_BEACON,
};
use crate::sync::transport::Transport;
use crate::types::{MAX_PLAYERS, MIN_PLAYERS};

/// Request/response seam to the matchmaking server
pub trait SessionClient {
    fn send(&mut self, command: SessionCommand) -> Result<SessionResponse>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LobbyPhase {
    Idle,
    /// Search granted; waiting for the channel to fill
    Searching,
    /// All seats filled; start requested from the server
    Starting,
    Running,
}

/// One client's matchmaking state
pub struct Lobby<C: SessionClient> {
    client: C,
    phase: LobbyPhase,
    state: SessionState,
    message: String,
    /// Seats whose ready beacon has been seen; only seat 1 collects these
    confirmed: BTreeSet<u32>,
}

impl<C: SessionClient> Lobby<C> {
    pub fn new(client: C) -> Self {
        Lobby {
            client,
            phase: LobbyPhase::Idle,
            state: SessionState::default(),
            message: String::new(),
            confirmed: BTreeSet::new(),
        }
    }

    /// Ask the server for a match. Returns false when the request cannot be
    /// made or was denied; `message()` explains.
    pub fn search_game(&mut self, players: u32, rows: u32, columns: u32) -> Result<bool> {
        if self.phase != LobbyPhase::Idle {
            self.message =
                "You cannot request a new game while one is running or already requested.".into();
            return Ok(false);
        }
        if (players as usize) < MIN_PLAYERS || (players as usize) > MAX_PLAYERS {
            self.message = format!("Invalid number of players: {players}.");
            return Ok(false);
        }
        self.message = "Request sent. Waiting for response...".into();
        let response = match self.client.send(SessionCommand::SearchGame {
            players,
            rows,
            columns,
        }) {
            Ok(response) => response,
            Err(err) => {
                self.fail("Game request failed.");
                return Err(err);
            }
        };
        if response.success {
            if let Some(state) = response.game_state {
                self.state = state;
            }
            self.phase = LobbyPhase::Searching;
            Ok(true)
        } else {
            self.fail(&format!(
                "Server rejected the game request. Reason: {}.",
                reason(&response)
            ));
            Ok(false)
        }
    }

    /// Presence update while searching: `members` peers are subscribed.
    /// Returns true when the channel is full and the start request should go
    /// out.
    pub fn peer_joined(&mut self, members: u32) -> bool {
        if self.phase != LobbyPhase::Searching {
            return false;
        }
        let remaining = self.state.total_players.saturating_sub(members);
        if remaining == 0 {
            return true;
        }
        let word = if remaining == 1 { "player" } else { "players" };
        self.message = format!("Waiting for {remaining} more {word} to join.");
        false
    }

    /// Request the match start once every seat is filled. `position` is this
    /// client's 1-based seat, assigned by subscription order.
    pub fn start_game(&mut self, position: u32) -> Result<bool> {
        if self.phase != LobbyPhase::Searching {
            return Ok(false);
        }
        self.message = "Requesting server to start the game...".into();
        let command = SessionCommand::StartGame {
            channel: self.state.channel.clone().unwrap_or_default(),
            rows: self.state.rows,
            columns: self.state.columns,
            position,
            total_players: self.state.total_players,
        };
        let response = match self.client.send(command) {
            Ok(response) => response,
            Err(err) => {
                self.fail("Request to start the game failed.");
                return Err(err);
            }
        };
        if response.success {
            if let Some(state) = response.game_state {
                // The running flag flips only when the start beacon lands.
                let was_running = self.state.is_game_running;
                self.state = state;
                self.state.is_game_running = was_running;
            }
            self.state.online_position = Some(position);
            self.phase = LobbyPhase::Starting;
            self.confirmed.clear();
            self.confirmed.insert(position);
            self.message = "Starting game...".into();
            Ok(true)
        } else {
            self.fail(&format!(
                "Server rejected the request to start the game. Reason: {}.",
                reason(&response)
            ));
            Ok(false)
        }
    }

    /// Repeat the ready beacon towards seat 1 while the match is starting.
    /// Seat 1 never beacons; it collects the others via `peer_ready`. Call
    /// this on a short timer until `mark_running`.
    pub fn announce_ready<T: Transport>(&self, transport: &mut T) -> bool {
        if self.phase != LobbyPhase::Starting {
            return false;
        }
        let position = match self.state.online_position {
            Some(position) if position != 1 => position,
            _ => return false,
        };
        let payload = serde_json::to_value(ReadyBeacon { position }).unwrap_or(Value::Null);
        transport.broadcast(EVENT_READY_BEACON, &payload)
    }

    /// Seat 1 records a peer's ready beacon. Returns true once every seat
    /// has confirmed and the host should ask the server to fire the start
    /// event.
    pub fn peer_ready(&mut self, beacon: ReadyBeacon) -> bool {
        if self.phase != LobbyPhase::Starting || self.state.online_position != Some(1) {
            return false;
        }
        self.confirmed.insert(beacon.position);
        self.confirmed.len() as u32 >= self.state.total_players
    }

    /// Every participant confirmed; the match is live
    pub fn mark_running(&mut self) {
        if self.phase == LobbyPhase::Starting {
            self.phase = LobbyPhase::Running;
            self.state.is_game_running = true;
            self.state.is_waiting_for_game = false;
            self.confirmed.clear();
            self.message.clear();
        }
    }

    /// Withdraw an unfilled search
    pub fn cancel_search(&mut self) -> Result<bool> {
        if self.phase != LobbyPhase::Searching {
            self.message = "You cannot cancel a non-existent game search.".into();
            return Ok(false);
        }
        let command = SessionCommand::CancelSearch {
            channel: self.state.channel.clone().unwrap_or_default(),
            rows: self.state.rows,
            columns: self.state.columns,
            total_players: self.state.total_players,
        };
        let response = match self.client.send(command) {
            Ok(response) => response,
            Err(err) => {
                self.fail("Error occurred while cancelling game search.");
                return Err(err);
            }
        };
        if response.success {
            if let Some(state) = response.game_state {
                self.state = state;
            }
            self.state.online_position = None;
            self.phase = LobbyPhase::Idle;
            self.message.clear();
            Ok(true)
        } else {
            self.fail(&format!(
                "Server denied request for cancelling search. Reason: {}.",
                reason(&response)
            ));
            Ok(false)
        }
    }

    /// A peer left. Mid-match this ends the game; while searching it only
    /// changes the waiting message. Returns true when the match must end.
    pub fn peer_left(&mut self, members: u32) -> bool {
        match self.phase {
            LobbyPhase::Running | LobbyPhase::Starting => {
                self.message = "A player has left the game unfinished. Game has ended.".into();
                true
            }
            LobbyPhase::Searching => {
                self.peer_joined(members);
                false
            }
            LobbyPhase::Idle => false,
        }
    }

    /// Tear down this client's server-side state, after a quit or a failure
    pub fn reset_state(&mut self, update_channel: bool) -> Result<()> {
        let command = SessionCommand::ResetState {
            update_channel: update_channel.then_some(true),
        };
        let response = self.client.send(command)?;
        if response.success {
            if let Some(state) = response.game_state {
                self.state = state;
            }
            self.message.clear();
        } else {
            self.message = format!(
                "Server denied resetting your game state. Reason: {}.",
                reason(&response)
            );
        }
        self.phase = LobbyPhase::Idle;
        self.state.online_position = None;
        self.state.channel = None;
        Ok(())
    }

    fn fail(&mut self, message: &str) {
        self.message = message.into();
        self.phase = LobbyPhase::Idle;
        self.state.is_waiting_for_game = false;
        self.state.online_position = None;
    }

    pub fn phase(&self) -> LobbyPhase {
        self.phase
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Last user-facing status or error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

fn reason(response: &SessionResponse) -> &str {
    response.reason.as_deref().unwrap_or("unknown")
}
