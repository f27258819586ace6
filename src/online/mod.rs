//! Online play against an authoritative server
//!
//! The client never simulates an online match. It decodes server snapshots,
//! eases its display toward them and reports paddle intents back.

pub mod protocol;
pub mod view;

pub use protocol::{
    ClientMessage, Direction, ServerMessage, SnapshotError, SnapshotWire, outbound_moves, parse_server_message,
};
pub use view::{DisplayState, Lobby, OnlineView};
