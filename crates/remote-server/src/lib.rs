//! remote-server library crate.
//!
//! A WebSocket server that lets a trusted client on the local network drive
//! this machine's keyboard, mouse, and a small set of OS actions (media keys,
//! URL opening, shell commands).
//!
//! # Architecture (clean architecture)
//!
//! ```text
//! Client (JSON over WebSocket)
//!         ↕
//! [remote-server]
//!   ├── domain/           ServerConfig (pure settings, no I/O)
//!   ├── application/      ActionSink trait, Dispatcher, macro runner,
//!   │                     session state machine / handshake evaluation
//!   └── infrastructure/
//!         ├── ws_server/  accept loop + per-session tasks (tokio-tungstenite)
//!         ├── storage/    TOML config file loading
//!         ├── local_ip/   outbound-facing address discovery (banner only)
//!         └── action_sink/ system + mock implementations of ActionSink
//! ```
//!
//! # Layer rules
//!
//! - `domain` has no I/O and no async.
//! - `application` depends on `domain` and `remote-core` only; all real-world
//!   side effects go through the `ActionSink` trait it defines.
//! - `infrastructure` depends on everything else plus `tokio` and
//!   `tungstenite`, and provides the concrete sinks.

/// Domain layer: runtime configuration.
pub mod domain;

/// Application layer: command dispatch, macro execution, session state.
pub mod application;

/// Infrastructure layer: WebSocket server, config file, action sinks.
pub mod infrastructure;
