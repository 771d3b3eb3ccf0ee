//! The `ActionSink` capability trait.
//!
//! Everything the server actually *does* to the host machine (key events,
//! pointer movement, launching a browser or a shell) goes through this one
//! narrow interface.  The dispatcher and macro runner never touch the OS
//! directly, which keeps them testable with the recorder mock and keeps the
//! platform-specific mess confined to the infrastructure layer.

use remote_core::keymap::{KeyInput, KeymapError};
use remote_core::protocol::MouseButton;
use thiserror::Error;

/// Error type for action sink operations.
#[derive(Debug, Error)]
pub enum SinkError {
    /// A textual key identifier could not be resolved.
    #[error(transparent)]
    Key(#[from] KeymapError),

    /// The platform input injection failed.
    #[error("input injection failed: {0}")]
    Inject(String),

    /// A helper process (shell, browser, injection tool) could not be spawned.
    #[error("failed to launch process: {0}")]
    Spawn(String),

    /// The capability is not available on this platform.
    #[error("{0} is not supported on this platform")]
    Unsupported(&'static str),
}

/// Capability interface for performing real keyboard, mouse, and OS actions.
///
/// Implementations must be `Send + Sync`: the sink is a single process-wide
/// resource shared by every session task with no locking; concurrent
/// sessions may interleave calls, and last-write-wins on physical input state
/// is accepted since only one human operator is assumed.
pub trait ActionSink: Send + Sync {
    /// Presses (and holds) a key.
    fn press_key(&self, key: &KeyInput) -> Result<(), SinkError>;

    /// Releases a previously pressed key.
    fn release_key(&self, key: &KeyInput) -> Result<(), SinkError>;

    /// Types literal text verbatim.
    fn type_text(&self, text: &str) -> Result<(), SinkError>;

    /// Moves the pointer relative to its current position.
    fn move_mouse(&self, dx: i32, dy: i32) -> Result<(), SinkError>;

    /// Clicks a mouse button at the current pointer position.
    fn click_mouse(&self, button: MouseButton) -> Result<(), SinkError>;

    /// Scrolls vertically; positive `dy` scrolls up.
    fn scroll_mouse(&self, dy: i32) -> Result<(), SinkError>;

    /// Opens a URL in the default browser, fire-and-forget.
    fn open_url(&self, url: &str) -> Result<(), SinkError>;

    /// Runs a string as a host shell command, fire-and-forget, no output
    /// captured.  Intentionally unrestricted: this server only speaks to a
    /// client that already holds the shared secret.
    fn run_shell(&self, command: &str) -> Result<(), SinkError>;
}
