//! The real host-controlling action sink.
//!
//! # Input injection
//!
//! Keyboard and mouse events go through the platform input stack: the XTest
//! extension on Linux ([`super::linux::X11Injector`]) and the SendInput API
//! on Windows ([`super::windows::SendInputInjector`]).  On other platforms
//! input injection reports [`SinkError::Unsupported`]; URL opening and shell
//! execution work everywhere.
//!
//! The platform connection is established once, at construction.  A host
//! where the input stack is unreachable (headless Linux with no `DISPLAY`)
//! fails startup rather than silently dropping every event.
//!
//! # Browser and shell
//!
//! URLs open through the platform opener (`xdg-open` / `open` /
//! `cmd /C start`), shell commands through the platform shell (`sh -c` /
//! `cmd /C`).  Both are spawned through `tokio::process` and immediately
//! dropped: the command loop never waits on them, no output is captured, and
//! the runtime reaps the child when it exits.

use remote_core::keymap::KeyInput;
use remote_core::protocol::MouseButton;
use tracing::debug;

use crate::application::action_sink::{ActionSink, SinkError};

#[cfg(target_os = "linux")]
use super::linux::X11Injector as PlatformInjector;
#[cfg(target_os = "windows")]
use super::windows::SendInputInjector as PlatformInjector;

/// `ActionSink` implementation that drives the local machine.
pub struct SystemActionSink {
    #[cfg(any(target_os = "linux", target_os = "windows"))]
    injector: PlatformInjector,
}

impl SystemActionSink {
    /// Connects to the platform input stack.
    ///
    /// # Errors
    ///
    /// Returns [`SinkError::Inject`] when the input stack cannot be reached
    /// (no X server on Linux).
    pub fn new() -> Result<Self, SinkError> {
        Ok(Self {
            #[cfg(any(target_os = "linux", target_os = "windows"))]
            injector: PlatformInjector::open()?,
        })
    }
}

#[cfg(any(target_os = "linux", target_os = "windows"))]
impl ActionSink for SystemActionSink {
    fn press_key(&self, key: &KeyInput) -> Result<(), SinkError> {
        self.injector.key_event(key, true)
    }

    fn release_key(&self, key: &KeyInput) -> Result<(), SinkError> {
        self.injector.key_event(key, false)
    }

    fn type_text(&self, text: &str) -> Result<(), SinkError> {
        self.injector.type_text(text)
    }

    fn move_mouse(&self, dx: i32, dy: i32) -> Result<(), SinkError> {
        self.injector.move_relative(dx, dy)
    }

    fn click_mouse(&self, button: MouseButton) -> Result<(), SinkError> {
        self.injector.click(button)
    }

    fn scroll_mouse(&self, dy: i32) -> Result<(), SinkError> {
        self.injector.scroll(dy)
    }

    fn open_url(&self, url: &str) -> Result<(), SinkError> {
        open_url(url)
    }

    fn run_shell(&self, command: &str) -> Result<(), SinkError> {
        run_shell(command)
    }
}

#[cfg(not(any(target_os = "linux", target_os = "windows")))]
impl ActionSink for SystemActionSink {
    fn press_key(&self, _key: &KeyInput) -> Result<(), SinkError> {
        Err(SinkError::Unsupported("input injection"))
    }

    fn release_key(&self, _key: &KeyInput) -> Result<(), SinkError> {
        Err(SinkError::Unsupported("input injection"))
    }

    fn type_text(&self, _text: &str) -> Result<(), SinkError> {
        Err(SinkError::Unsupported("input injection"))
    }

    fn move_mouse(&self, _dx: i32, _dy: i32) -> Result<(), SinkError> {
        Err(SinkError::Unsupported("input injection"))
    }

    fn click_mouse(&self, _button: MouseButton) -> Result<(), SinkError> {
        Err(SinkError::Unsupported("input injection"))
    }

    fn scroll_mouse(&self, _dy: i32) -> Result<(), SinkError> {
        Err(SinkError::Unsupported("input injection"))
    }

    fn open_url(&self, url: &str) -> Result<(), SinkError> {
        open_url(url)
    }

    fn run_shell(&self, command: &str) -> Result<(), SinkError> {
        run_shell(command)
    }
}

// ── Browser and shell ─────────────────────────────────────────────────────────

fn open_url(url: &str) -> Result<(), SinkError> {
    debug!(url, "spawning URL opener");
    spawn_detached(url_opener_command(url))
}

fn run_shell(command: &str) -> Result<(), SinkError> {
    debug!(command, "spawning shell command");
    spawn_detached(shell_command(command))
}

/// Spawns a command without waiting for it; tokio reaps the child on exit.
fn spawn_detached(mut command: tokio::process::Command) -> Result<(), SinkError> {
    command
        .spawn()
        .map(drop)
        .map_err(|e| SinkError::Spawn(e.to_string()))
}

#[cfg(target_os = "windows")]
fn url_opener_command(url: &str) -> tokio::process::Command {
    let mut cmd = tokio::process::Command::new("cmd");
    cmd.args(["/C", "start", "", url]);
    cmd
}

#[cfg(target_os = "macos")]
fn url_opener_command(url: &str) -> tokio::process::Command {
    let mut cmd = tokio::process::Command::new("open");
    cmd.arg(url);
    cmd
}

#[cfg(all(unix, not(target_os = "macos")))]
fn url_opener_command(url: &str) -> tokio::process::Command {
    let mut cmd = tokio::process::Command::new("xdg-open");
    cmd.arg(url);
    cmd
}

#[cfg(windows)]
fn shell_command(command: &str) -> tokio::process::Command {
    let mut cmd = tokio::process::Command::new("cmd");
    cmd.args(["/C", command]);
    cmd
}

#[cfg(unix)]
fn shell_command(command: &str) -> tokio::process::Command {
    let mut cmd = tokio::process::Command::new("sh");
    cmd.args(["-c", command]);
    cmd
}

// ── Tests ─────────────────────────────────────────────────────────────────────
