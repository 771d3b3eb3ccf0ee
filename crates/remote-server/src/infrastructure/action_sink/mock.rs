//! Mock action sink for unit and integration testing.
//!
//! The real sink presses keys and moves the cursor on the machine running the
//! tests, and its effects cannot be observed from test code.  The mock
//! replaces every OS call with in-memory recording: each call is pushed into
//! a `Mutex<Vec<SinkCall>>` so assertions can inspect exactly what was
//! performed and in what order.
//!
//! # Simulating failures
//!
//! Flip `set_should_fail(true)` and every subsequent call returns
//! `SinkError::Inject`, which exercises the handler-error and macro-abort
//! paths in callers.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use remote_core::keymap::KeyInput;
use remote_core::protocol::MouseButton;

use crate::application::action_sink::{ActionSink, SinkError};

/// One recorded sink invocation.
#[derive(Debug, Clone, PartialEq)]
pub enum SinkCall {
    PressKey(KeyInput),
    ReleaseKey(KeyInput),
    TypeText(String),
    MoveMouse(i32, i32),
    ClickMouse(MouseButton),
    ScrollMouse(i32),
    OpenUrl(String),
    RunShell(String),
}

/// An action sink that records all calls without touching the OS.
#[derive(Debug, Default)]
pub struct MockActionSink {
    calls: Mutex<Vec<SinkCall>>,
    should_fail: AtomicBool,
}

impl MockActionSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every call recorded so far, in order.
    pub fn calls(&self) -> Vec<SinkCall> {
        self.calls.lock().unwrap().clone()
    }

    /// When set, every subsequent call fails with `SinkError::Inject`.
    pub fn set_should_fail(&self, fail: bool) {
        self.should_fail.store(fail, Ordering::SeqCst);
    }

    fn record(&self, call: SinkCall) -> Result<(), SinkError> {
        if self.should_fail.load(Ordering::SeqCst) {
            return Err(SinkError::Inject("mock failure".to_string()));
        }
        self.calls.lock().unwrap().push(call);
        Ok(())
    }
}

impl ActionSink for MockActionSink {
    fn press_key(&self, key: &KeyInput) -> Result<(), SinkError> {
        self.record(SinkCall::PressKey(*key))
    }

    fn release_key(&self, key: &KeyInput) -> Result<(), SinkError> {
        self.record(SinkCall::ReleaseKey(*key))
    }

    fn type_text(&self, text: &str) -> Result<(), SinkError> {
        self.record(SinkCall::TypeText(text.to_string()))
    }

    fn move_mouse(&self, dx: i32, dy: i32) -> Result<(), SinkError> {
        self.record(SinkCall::MoveMouse(dx, dy))
    }

    fn click_mouse(&self, button: MouseButton) -> Result<(), SinkError> {
        self.record(SinkCall::ClickMouse(button))
    }

    fn scroll_mouse(&self, dy: i32) -> Result<(), SinkError> {
        self.record(SinkCall::ScrollMouse(dy))
    }

    fn open_url(&self, url: &str) -> Result<(), SinkError> {
        self.record(SinkCall::OpenUrl(url.to_string()))
    }

    fn run_shell(&self, command: &str) -> Result<(), SinkError> {
        self.record(SinkCall::RunShell(command.to_string()))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_records_calls_in_order() {
        let sink = MockActionSink::new();

        sink.type_text("hi").unwrap();
        sink.scroll_mouse(2).unwrap();

        assert_eq!(
            sink.calls(),
            vec![
                SinkCall::TypeText("hi".to_string()),
                SinkCall::ScrollMouse(2),
            ]
        );
    }

    #[test]
    fn test_mock_should_fail_returns_inject_error() {
        let sink = MockActionSink::new();
        sink.set_should_fail(true);

        let result = sink.type_text("hi");

        assert!(matches!(result, Err(SinkError::Inject(_))));
        assert!(sink.calls().is_empty());
    }

    #[test]
    fn test_mock_recovers_after_failure_is_cleared() {
        let sink = MockActionSink::new();
        sink.set_should_fail(true);
        let _ = sink.move_mouse(1, 1);
        sink.set_should_fail(false);

        sink.move_mouse(2, 2).unwrap();

        assert_eq!(sink.calls(), vec![SinkCall::MoveMouse(2, 2)]);
    }
}
