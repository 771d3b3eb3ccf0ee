//! Concrete implementations of the [`ActionSink`] capability.
//!
//! - [`system::SystemActionSink`] drives the real host: input injection
//!   through the platform stack (XTest on Linux, SendInput on Windows,
//!   selected at compile time), the platform opener for URLs, and the
//!   platform shell for commands.
//! - [`mock::MockActionSink`] records every call for test assertions.
//!
//! [`ActionSink`]: crate::application::ActionSink

pub mod mock;
pub mod system;

#[cfg(target_os = "linux")]
pub mod linux;

#[cfg(target_os = "windows")]
pub mod windows;

pub use mock::MockActionSink;
pub use system::SystemActionSink;
