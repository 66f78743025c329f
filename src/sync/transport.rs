//! Reliable-broadcast seam
//!
//! The session layer never talks to a socket directly; it hands outgoing
//! events to a `Transport`. The return value is local acceptance only (the
//! event left this client), not delivery confirmation. A refused broadcast
//! makes the session roll the move back so the player can retry.

use serde_json::Value;

/// Fire-and-forget channel broadcast
pub trait Transport {
    /// Send `payload` under `event` to every other participant. Returns
    /// false when the event could not be handed off.
    fn broadcast(&mut self, event: &str, payload: &Value) -> bool;
}

impl<T: Transport + ?Sized> Transport for &mut T {
    fn broadcast(&mut self, event: &str, payload: &Value) -> bool {
        (**self).broadcast(event, payload)
    }
}
