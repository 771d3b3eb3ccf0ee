//! JSON wire protocol for the PC remote server.
//!
//! The protocol is text frames over a persistent WebSocket connection:
//!
//! ```text
//! Client → Server (first frame):  {"key": "<shared-secret>"}
//! Server → Client:                {"type": "handshake_success"}
//!                                 {"type": "auth_failed", "reason": "..."}
//! Client → Server (after auth):   {"type": "<command-type>", "data": {...}}
//! ```
//!
//! Post-auth commands are fire-and-forget: the server never acknowledges them.

pub mod messages;

pub use messages::{Command, CommandKind, MouseButton, ServerMessage};
