//! # remote-core
//!
//! Shared library for the PC remote server containing the JSON wire protocol
//! types, the key name resolution tables, and the macro script line parser.
//!
//! This crate has zero dependencies on OS APIs, sockets, or an async runtime.
//! Everything here is pure data and parsing, so it can be unit tested without
//! a network or a desktop session.
//!
//! # Module overview
//!
//! - **`protocol`** – What travels over the wire.  Every inbound message is a
//!   JSON object with a `"type"` tag ([`Command`]); the server only ever sends
//!   the two handshake replies ([`ServerMessage`]).  [`CommandKind`] is the
//!   closed set of recognised command tags.
//!
//! - **`keymap`** – Resolution of textual key identifiers.  A name like
//!   `"enter"` resolves to a named [`SpecialKey`]; anything else falls back to
//!   a literal single character.  Also carries the per-platform key tables
//!   (X11 keysyms, Windows virtual keys) used for input injection.
//!
//! - **`script`** – The line-oriented macro language (`TYPE` / `PRESS` /
//!   `COMBO` / `WAIT`).  Parsing is per line so that execution can stop at the
//!   first faulty line while earlier lines have already run.

pub mod keymap;
pub mod protocol;
pub mod script;

// Re-export the most-used types at the crate root so callers can write
// `remote_core::Command` instead of `remote_core::protocol::messages::Command`.
pub use keymap::{resolve_key, KeyInput, KeymapError, SpecialKey};
pub use protocol::messages::{Command, CommandKind, MouseButton, ServerMessage};
pub use script::{parse_line, ScriptError, ScriptLine};
