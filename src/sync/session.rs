//! Online synchronization layer
//!
//! `OnlineSession` wraps a `Game` with the move-ordering policy of a
//! networked match. All participants apply the same globally ordered stream
//! of moves: every move carries a sequence number, arrivals park in a
//! priority queue, and a move is applied only when its number is exactly one
//! past the processed count. A gap stalls the queue until the missing move
//! arrives (or is re-requested); duplicates are dropped.
//!
//! Local moves go through the same queue as remote ones and are broadcast
//! only after the engine has fully absorbed them (cascade drained). If the
//! broadcast is refused the move is rolled back through the single-slot undo
//! so the board never diverges from what the peers saw; a move that decided
//! the match cannot roll back, so it stays logged and the broadcast is
//! retried until it goes out.

use std::collections::HashMap;
use std::fmt;

use serde_json::Value;

use crate::core::game::{ConfigError, Game, GameConfig, TickEvent};
use crate::sync::protocol::{
    MoveInput, ResendRequest, WireCoordinate, EVENT_INCOMING_INPUT, EVENT_SEND_YOUR_INPUT,
};
use crate::sync::queue::PriorityQueue;
use crate::sync::transport::Transport;
use crate::types::{TurnGate, RESEND_PING_MS};

/// A `Game` plus the online move-ordering policy for one participant
pub struct OnlineSession<T: Transport> {
    game: Game,
    /// This client's 1-based seat
    position: u32,
    transport: T,
    pending: PriorityQueue<MoveInput>,
    /// Log of every applied move by sequence number; serves resend requests
    processed: HashMap<u64, MoveInput>,
    /// Most recently applied move, broadcast once the engine settles
    last_applied: Option<MoveInput>,
    /// False while an applied move still awaits turn-gate resolution
    input_acknowledged: bool,
    waiting_for_move: bool,
    has_ended: bool,
    have_i_won: Option<bool>,
    /// None until the player answers the spectate prompt
    watching: Option<bool>,
    spectate_prompt: bool,
    clock_ms: f64,
    last_input_ms: f64,
}

impl<T: Transport> OnlineSession<T> {
    pub fn new(config: GameConfig, position: u32, transport: T) -> Result<Self, ConfigError> {
        if position == 0 || position as usize > config.players.len() {
            return Err(ConfigError::Position(position));
        }
        let game = Game::new(config)?;
        Ok(OnlineSession {
            waiting_for_move: position != 1,
            game,
            position,
            transport,
            pending: PriorityQueue::new(),
            processed: HashMap::new(),
            last_applied: None,
            input_acknowledged: true,
            has_ended: false,
            have_i_won: None,
            watching: None,
            spectate_prompt: false,
            clock_ms: 0.0,
            last_input_ms: 0.0,
        })
    }

    /// Whether this client may move right now. `Unready` means the board is
    /// still resolving a cascade; poll again next frame.
    pub fn is_my_turn(&self) -> TurnGate {
        if self.game.is_blast_running() {
            return TurnGate::Unready;
        }
        if 1 + self.game.turn() as u32 % self.game.players().len() as u32 == self.position {
            TurnGate::MyTurn
        } else {
            TurnGate::NotMyTurn
        }
    }

    /// Queue a move made on this client. Returns false when the move cannot
    /// be taken right now: not our turn, an earlier move still in flight, a
    /// cascade running, or the target off the board.
    pub fn submit_local(&mut self, x: u32, y: u32) -> bool {
        if self.has_ended || self.waiting_for_move || !self.input_acknowledged {
            return false;
        }
        if self.game.is_blast_running() || !self.pending.is_empty() {
            return false;
        }
        if !self.game.board().in_bounds(x, y) {
            return false;
        }
        let input = MoveInput {
            seq: self.processed.len() as u64 + 1,
            coordinate: WireCoordinate { x, y },
            position: self.position,
            local: true,
        };
        self.pending.enqueue(input.seq, input);
        true
    }

    /// Accept a move broadcast by a peer
    pub fn handle_remote_input(&mut self, mut input: MoveInput) {
        if self.has_ended || !self.waiting_for_move {
            return;
        }
        input.local = false;
        self.pending.enqueue(input.seq, input);
    }

    /// A peer missed a move and asks for it again; re-broadcast it verbatim
    /// from the processed log.
    pub fn handle_resend_request(&mut self, request: ResendRequest) {
        if let Some(input) = self.processed.get(&request.seq) {
            let payload = serde_json::to_value(input).unwrap_or(Value::Null);
            self.transport.broadcast(EVENT_INCOMING_INPUT, &payload);
        }
    }

    /// Advance the session by one frame: feed the next in-order pending move
    /// to the engine, tick the engine, then settle broadcast and turn flags
    /// once the engine is no longer mid-cascade.
    pub fn tick(&mut self, delta_ms: f32) -> TickEvent {
        self.clock_ms += delta_ms as f64;
        if !self.has_ended {
            self.pump_pending();
        }
        let event = self.game.tick(delta_ms);
        if !self.has_ended {
            match event {
                TickEvent::PassResolved | TickEvent::GameOver { .. } => self.resolve_end_state(),
                _ => {}
            }
        }
        // Runs even on the ending frame: the match-deciding local move still
        // has to reach the peers.
        self.finalize_applied_input();
        if !self.has_ended {
            self.ping_silent_peer();
        }
        event
    }

    /// Apply the lowest pending move if it is the next one in global order.
    fn pump_pending(&mut self) {
        if !self.input_acknowledged {
            return;
        }
        let (seq, input) = match self.pending.dequeue() {
            Some(entry) => entry,
            None => return,
        };
        if self.processed.contains_key(&seq) {
            return; // duplicate delivery
        }
        if seq != self.processed.len() as u64 + 1 {
            // A later move arrived first; park it until the gap fills.
            self.pending.enqueue(seq, input);
            return;
        }
        if self
            .game
            .process_input(input.coordinate.x, input.coordinate.y)
        {
            self.processed.insert(seq, input);
            self.last_applied = Some(input);
            self.last_input_ms = self.clock_ms;
            self.input_acknowledged = false;
        }
    }

    /// Once the turn gate can answer again, recompute the waiting flag and
    /// broadcast a local move. A refused broadcast rolls the move back.
    fn finalize_applied_input(&mut self) {
        if self.input_acknowledged {
            return;
        }
        let gate = self.is_my_turn();
        // A decided game never leaves the blast state, so the gate alone
        // would starve the final broadcast.
        if gate == TurnGate::Unready && !self.has_ended {
            return;
        }
        self.input_acknowledged = true;
        self.waiting_for_move = gate != TurnGate::MyTurn;
        let input = match self.last_applied {
            Some(input) if input.local => input,
            _ => return,
        };
        let payload = serde_json::to_value(input).unwrap_or(Value::Null);
        if !self.transport.broadcast(EVENT_INCOMING_INPUT, &payload) {
            if self.game.undo() {
                self.waiting_for_move = false;
                self.processed.remove(&input.seq);
            } else {
                // The board is decided and cannot roll back. Keep the move
                // in the log so resends still work, and retry the broadcast
                // on the next frame.
                self.input_acknowledged = false;
            }
        }
    }

    /// Nudge a silent peer for the next expected move once per minute
    fn ping_silent_peer(&mut self) {
        if !self.waiting_for_move {
            return;
        }
        if self.clock_ms - self.last_input_ms <= RESEND_PING_MS as f64 {
            return;
        }
        self.last_input_ms = self.clock_ms;
        let next_seq = self.last_applied.map(|input| input.seq + 1).unwrap_or(1);
        let payload = serde_json::to_value(ResendRequest { seq: next_seq }).unwrap_or(Value::Null);
        self.transport.broadcast(EVENT_SEND_YOUR_INPUT, &payload);
    }

    /// Win/loss/spectate bookkeeping after every resolved pass.
    fn resolve_end_state(&mut self) {
        let my_seat = self.position as usize - 1;
        let players = self.game.players().len();
        if self.game.is_eliminated(my_seat) {
            self.have_i_won = Some(false);
            let others_remain = self.game.eliminated().len() != players - 1;
            if players > 2 && others_remain {
                if self.watching.is_none() {
                    self.spectate_prompt = true;
                }
            } else {
                self.has_ended = true;
            }
        } else if self.game.winner() == Some(my_seat) {
            self.have_i_won = Some(true);
            self.has_ended = true;
        }
    }

    /// True while the session waits for a spectate decision: this player was
    /// knocked out mid-game but the match goes on.
    pub fn needs_spectate_choice(&self) -> bool {
        self.spectate_prompt
    }

    /// Answer the spectate prompt. Declining ends the session locally.
    pub fn choose_spectate(&mut self, watch: bool) {
        self.spectate_prompt = false;
        self.watching = Some(watch);
        if !watch {
            self.has_ended = true;
        }
    }

    /// A peer abandoned an unfinished match; end the session
    pub fn end_abandoned(&mut self) {
        if !self.has_ended {
            self.has_ended = true;
        }
    }

    /// Clear the session and its game back to a fresh board
    pub fn reset(&mut self) {
        self.game.reset();
        self.pending.clear();
        self.processed.clear();
        self.last_applied = None;
        self.input_acknowledged = true;
        self.waiting_for_move = self.position != 1;
        self.has_ended = false;
        self.have_i_won = None;
        self.watching = None;
        self.spectate_prompt = false;
        self.clock_ms = 0.0;
        self.last_input_ms = 0.0;
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    pub fn position(&self) -> u32 {
        self.position
    }

    pub fn has_ended(&self) -> bool {
        self.has_ended
    }

    pub fn have_i_won(&self) -> Option<bool> {
        self.have_i_won
    }

    pub fn is_watching(&self) -> bool {
        self.watching == Some(true)
    }

    pub fn is_waiting_for_move(&self) -> bool {
        self.waiting_for_move
    }

    pub fn processed_count(&self) -> usize {
        self.processed.len()
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }
}

impl<T: Transport> fmt::Debug for OnlineSession<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OnlineSession")
            .field("position", &self.position)
            .field("processed", &self.processed.len())
            .field("pending", &self.pending.len())
            .field("waiting_for_move", &self.waiting_for_move)
            .field("has_ended", &self.has_ended)
            .finish_non_exhaustive()
    }
}
