//! Application layer: command dispatch, macro execution, and the session
//! authentication state machine.
//!
//! This layer owns all protocol semantics but performs no I/O itself: real
//! keyboard/mouse/OS effects go through the [`ActionSink`] trait, and the
//! WebSocket plumbing lives in the infrastructure layer.

pub mod action_sink;
pub mod dispatcher;
pub mod macro_runner;
pub mod session;

pub use action_sink::{ActionSink, SinkError};
pub use dispatcher::Dispatcher;
pub use macro_runner::run_macro;
pub use session::{evaluate_handshake, HandshakeOutcome, Session, SessionError, SessionState};
