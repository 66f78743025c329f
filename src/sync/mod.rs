//! Online play: wire protocol, move ordering, matchmaking.
//! Everything here drives `crate::core` through its public surface and
//! reaches the network only through the `Transport` and `SessionClient`
//! seams.

pub mod lobby;
pub mod protocol;
pub mod queue;
pub mod session;
pub mod transport;
