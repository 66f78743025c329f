//! Integration tests for two online sessions kept in lockstep
//!
//! Wires two `OnlineSession`s together through an in-memory transport and
//! replays full matches, including dropped and retransmitted moves.

use std::cell::RefCell;
use std::rc::Rc;

use serde_json::Value;

use chain_reaction::core::game::GameConfig;
use chain_reaction::sync::protocol::{
    MoveInput, ResendRequest, EVENT_INCOMING_INPUT, EVENT_SEND_YOUR_INPUT,
};
use chain_reaction::sync::session::OnlineSession;
use chain_reaction::sync::transport::Transport;
use chain_reaction::types::PlayerColor;

/// Collects broadcasts so the test can shuttle them to the other session
#[derive(Clone, Default)]
struct Outbox(Rc<RefCell<Vec<(String, Value)>>>);

impl Outbox {
    fn drain(&self) -> Vec<(String, Value)> {
        self.0.borrow_mut().drain(..).collect()
    }
}

impl Transport for Outbox {
    fn broadcast(&mut self, event: &str, payload: &Value) -> bool {
        self.0.borrow_mut().push((event.to_string(), payload.clone()));
        true
    }
}

struct Pair {
    a: OnlineSession<Outbox>,
    a_out: Outbox,
    b: OnlineSession<Outbox>,
    b_out: Outbox,
}

fn pair(rows: u32, cols: u32) -> Pair {
    let players = vec![PlayerColor::Red, PlayerColor::Blue];
    let a_out = Outbox::default();
    let b_out = Outbox::default();
    Pair {
        a: OnlineSession::new(GameConfig::new(rows, cols, players.clone()), 1, a_out.clone())
            .unwrap(),
        a_out,
        b: OnlineSession::new(GameConfig::new(rows, cols, players), 2, b_out.clone()).unwrap(),
        b_out,
    }
}

fn settle(session: &mut OnlineSession<Outbox>) {
    for _ in 0..100 {
        session.tick(16.0);
    }
}

/// Deliver every queued event from `from` into `to`
fn deliver(from: &Outbox, to: &mut OnlineSession<Outbox>) {
    for (event, payload) in from.drain() {
        match event.as_str() {
            EVENT_INCOMING_INPUT => {
                let input: MoveInput = serde_json::from_value(payload).unwrap();
                to.handle_remote_input(input);
            }
            EVENT_SEND_YOUR_INPUT => {
                let request: ResendRequest = serde_json::from_value(payload).unwrap();
                to.handle_resend_request(request);
            }
            other => panic!("unexpected event {other}"),
        }
    }
}

/// One full exchange: the mover submits, both sides settle, the move is
/// shipped across, and the receiver settles too.
fn exchange(p: &mut Pair, mover_is_a: bool, x: u32, y: u32) {
    if mover_is_a {
        assert!(p.a.submit_local(x, y), "seat 1 move ({x},{y}) refused");
        settle(&mut p.a);
        deliver(&p.a_out, &mut p.b);
        settle(&mut p.b);
    } else {
        assert!(p.b.submit_local(x, y), "seat 2 move ({x},{y}) refused");
        settle(&mut p.b);
        deliver(&p.b_out, &mut p.a);
        settle(&mut p.a);
    }
}

fn boards_match(p: &Pair) -> bool {
    p.a.game().board() == p.b.game().board()
}

#[test]
fn test_lockstep_duel_stays_identical() {
    let mut p = pair(3, 3);
    exchange(&mut p, true, 0, 0);
    assert!(boards_match(&p));
    exchange(&mut p, false, 2, 2);
    assert!(boards_match(&p));
    // Red detonates its corner; both sides resolve the same cascade.
    exchange(&mut p, true, 0, 0);
    assert!(boards_match(&p));
    assert!(p.a.game().board().get(0, 0).is_none());
    assert_eq!(p.a.processed_count(), 3);
    assert_eq!(p.b.processed_count(), 3);
}

#[test]
fn test_match_end_reported_on_both_sides() {
    // 2x2: blue's second move captures everything red owns.
    let mut p = pair(2, 2);
    exchange(&mut p, true, 0, 0);
    exchange(&mut p, false, 1, 1);
    exchange(&mut p, true, 0, 0);
    // Blue's winning move; its own session ends mid-cascade but the move
    // must still reach red.
    assert!(p.b.submit_local(1, 1));
    settle(&mut p.b);
    assert!(p.b.has_ended());
    assert_eq!(p.b.have_i_won(), Some(true));
    deliver(&p.b_out, &mut p.a);
    settle(&mut p.a);
    assert!(p.a.has_ended());
    assert_eq!(p.a.have_i_won(), Some(false));
    // Two-player match: the loser gets no spectate offer.
    assert!(!p.a.needs_spectate_choice());
}

#[test]
fn test_out_of_order_delivery_converges() {
    let mut p = pair(3, 3);
    // Seat 1 makes two moves (its own, then after seat 2's reply).
    exchange(&mut p, true, 0, 0);
    exchange(&mut p, false, 2, 2);
    // Seat 1 moves again, but this time the broadcast of move 3 is delayed:
    // seat 2 first sees nothing, then gets it late.
    assert!(p.a.submit_local(1, 1));
    settle(&mut p.a);
    let held = p.a_out.drain();
    settle(&mut p.b);
    assert_eq!(p.b.processed_count(), 2); // still waiting
    for (event, payload) in held {
        assert_eq!(event, EVENT_INCOMING_INPUT);
        let input: MoveInput = serde_json::from_value(payload).unwrap();
        p.b.handle_remote_input(input);
    }
    settle(&mut p.b);
    assert_eq!(p.b.processed_count(), 3);
    assert!(boards_match(&p));
}

#[test]
fn test_lost_move_recovered_via_resend() {
    let mut p = pair(3, 3);
    exchange(&mut p, true, 0, 0);
    // Seat 2 replies but the broadcast is lost in transit.
    assert!(p.b.submit_local(2, 2));
    settle(&mut p.b);
    let lost = p.b_out.drain();
    assert_eq!(lost.len(), 1);
    // Seat 1 waits over a minute, then pings for the missing move.
    for _ in 0..70 {
        p.a.tick(1000.0);
    }
    deliver(&p.a_out, &mut p.b);
    // Seat 2 re-broadcasts move 2 from its log; this time it arrives.
    deliver(&p.b_out, &mut p.a);
    settle(&mut p.a);
    assert_eq!(p.a.processed_count(), 2);
    assert!(boards_match(&p));
}

#[test]
fn test_duplicate_delivery_mutates_once() {
    let mut p = pair(3, 3);
    assert!(p.a.submit_local(1, 1));
    settle(&mut p.a);
    let sent = p.a_out.drain();
    assert_eq!(sent.len(), 1);
    let input: MoveInput = serde_json::from_value(sent[0].1.clone()).unwrap();
    // The same move reaches seat 2 twice.
    p.b.handle_remote_input(input);
    settle(&mut p.b);
    p.b.handle_remote_input(input);
    settle(&mut p.b);
    assert_eq!(p.b.processed_count(), 1);
    assert_eq!(p.b.game().board().get(1, 1).map(|c| c.level), Some(1));
}

#[test]
fn test_spectate_prompt_in_three_player_match() {
    // Three seats; this client is seat 2 and gets knocked out while two
    // others remain, so it is offered spectating instead of a hard end.
    let players = vec![PlayerColor::Red, PlayerColor::Blue, PlayerColor::Green];
    let out = Outbox::default();
    let mut s =
        OnlineSession::new(GameConfig::new(3, 3, players), 2, out.clone()).unwrap();

    let remote = |seq: u64, x: u32, y: u32, position: u32| MoveInput {
        seq,
        coordinate: chain_reaction::sync::protocol::WireCoordinate { x, y },
        position,
        local: false,
    };
    // Seat 1 opens, seat 2 (us) sits next to the corner, seat 3 far away.
    s.handle_remote_input(remote(1, 0, 0, 1));
    settle(&mut s);
    assert!(s.submit_local(1, 0));
    settle(&mut s);
    s.handle_remote_input(remote(3, 2, 2, 3));
    settle(&mut s);
    // Seat 1 detonates the corner and captures our only cell.
    s.handle_remote_input(remote(4, 0, 0, 1));
    settle(&mut s);
    assert!(s.needs_spectate_choice());
    assert!(!s.has_ended());
    assert_eq!(s.have_i_won(), Some(false));
    // Declining to watch ends the session locally.
    s.choose_spectate(false);
    assert!(s.has_ended());
    assert!(!s.is_watching());
}
