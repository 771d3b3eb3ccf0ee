//! The per-connection session state machine and handshake evaluation.
//!
//! A session moves through exactly one of two paths:
//!
//! ```text
//! Unauthenticated ──(key matches)──► Authenticated ──(disconnect)──► Closed
//! Unauthenticated ──(timeout / bad key / malformed)────────────────► Closed
//! ```
//!
//! Exactly one authentication attempt is permitted per connection; a failed
//! or timed-out handshake always closes the connection, and the client must
//! reconnect to retry.
//!
//! The handshake decision itself ([`evaluate_handshake`]) is a pure function
//! over the first frame's text, so it is unit tested here without sockets;
//! the WebSocket session in the infrastructure layer drives it.

use std::net::SocketAddr;

use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

/// Reason string sent when the handshake frame carries no `key` field.
pub const REASON_NO_KEY: &str = "No key provided";

/// Reason string sent when the supplied key does not match the shared secret.
pub const REASON_INVALID_KEY: &str = "Invalid key";

/// Errors that end a session.
///
/// The authentication variants always close the connection.  None of them is
/// ever surfaced to the client beyond the two defined `auth_failed` reasons;
/// everything else is operator-visible only, via logs.
#[derive(Debug, Error)]
pub enum SessionError {
    /// No handshake frame arrived within the deadline.  The connection is
    /// closed without any response.
    #[error("authentication timed out")]
    AuthTimeout,

    /// The supplied key did not match the shared secret.
    #[error("authentication failed: invalid key")]
    InvalidKey,

    /// The handshake frame was a JSON object without a `key` field.
    #[error("authentication failed: no key provided")]
    NoKey,

    /// The handshake frame was not a JSON object at all.  Closed without a
    /// response, like a timeout.
    #[error("malformed handshake message")]
    MalformedHandshake,

    /// The transport failed or closed before authentication completed.
    #[error("transport error: {0}")]
    Transport(String),
}

/// Lifecycle states of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Unauthenticated,
    Authenticated,
    Closed,
}

/// Per-connection identity and state.  Created on accept, discarded on close;
/// nothing about a session is durable.
#[derive(Debug)]
pub struct Session {
    /// Connection identifier used in log messages.
    pub id: Uuid,
    /// The client's remote address.
    pub peer: SocketAddr,
    state: SessionState,
}

impl Session {
    /// Creates a new unauthenticated session for an accepted connection.
    pub fn new(peer: SocketAddr) -> Self {
        Self {
            id: Uuid::new_v4(),
            peer,
            state: SessionState::Unauthenticated,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Marks the handshake as successful.
    pub fn authenticate(&mut self) {
        debug_assert_eq!(self.state, SessionState::Unauthenticated);
        self.state = SessionState::Authenticated;
    }

    /// Marks the session closed.  Terminal; every path ends here.
    pub fn close(&mut self) {
        self.state = SessionState::Closed;
    }
}

/// Outcome of evaluating a handshake frame against the shared secret.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandshakeOutcome {
    /// The key matched; reply `handshake_success` and open the command loop.
    Granted,
    /// Decodable but wrong; reply `auth_failed` with `reason`, then close.
    Denied { reason: &'static str },
    /// Not a JSON object; close without a response.
    Malformed,
}

/// Decides the fate of the one permitted handshake frame.
///
/// The key comparison is exact string equality; a non-string `key` value can
/// never match.
pub fn evaluate_handshake(raw: &str, secret: &str) -> HandshakeOutcome {
    let value: Value = match serde_json::from_str(raw) {
        Ok(value) => value,
        Err(_) => return HandshakeOutcome::Malformed,
    };
    let Some(object) = value.as_object() else {
        return HandshakeOutcome::Malformed;
    };
    match object.get("key") {
        None => HandshakeOutcome::Denied {
            reason: REASON_NO_KEY,
        },
        Some(key) if key.as_str() == Some(secret) => HandshakeOutcome::Granted,
        Some(_) => HandshakeOutcome::Denied {
            reason: REASON_INVALID_KEY,
        },
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
