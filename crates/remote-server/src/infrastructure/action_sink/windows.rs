//! Windows input injection via the SendInput API.
//!
//! Named keys travel as Virtual-Key codes.  Literal text uses the
//! `KEYEVENTF_UNICODE` path instead: each UTF-16 unit is injected directly,
//! which sidesteps keyboard-layout dependence entirely.  Scroll deltas use
//! the `WHEEL_DELTA` convention (120 units per notch).

#![cfg(target_os = "windows")]

use windows::Win32::UI::Input::KeyboardAndMouse::{
    SendInput, INPUT, INPUT_0, INPUT_KEYBOARD, INPUT_MOUSE, KEYBDINPUT, KEYBD_EVENT_FLAGS,
    KEYEVENTF_KEYUP, KEYEVENTF_UNICODE, MOUSEEVENTF_LEFTDOWN, MOUSEEVENTF_LEFTUP,
    MOUSEEVENTF_MOVE, MOUSEEVENTF_RIGHTDOWN, MOUSEEVENTF_RIGHTUP, MOUSEEVENTF_WHEEL,
    MOUSEINPUT, MOUSE_EVENT_FLAGS, VIRTUAL_KEY,
};

use remote_core::keymap::{windows as win_keys, KeyInput};
use remote_core::protocol::MouseButton;

use crate::application::action_sink::SinkError;

const WHEEL_DELTA: i32 = 120;

/// SendInput-based injector.  Stateless; every call is one `SendInput` batch.
pub struct SendInputInjector;

impl SendInputInjector {
    pub fn open() -> Result<Self, SinkError> {
        Ok(Self)
    }

    /// Fakes one key press or release by Virtual-Key code.
    pub fn key_event(&self, key: &KeyInput, press: bool) -> Result<(), SinkError> {
        let Some(vk) = win_keys::virtual_key(key) else {
            return Err(SinkError::Inject(format!(
                "no virtual-key code for {key:?}"
            )));
        };
        let mut flags = KEYBD_EVENT_FLAGS(0);
        if !press {
            flags |= KEYEVENTF_KEYUP;
        }
        send(&[keyboard_input(VIRTUAL_KEY(vk), 0, flags)])
    }

    /// Types literal text through the Unicode path.
    pub fn type_text(&self, text: &str) -> Result<(), SinkError> {
        let mut inputs = Vec::new();
        for unit in text.encode_utf16() {
            inputs.push(keyboard_input(VIRTUAL_KEY(0), unit, KEYEVENTF_UNICODE));
            inputs.push(keyboard_input(
                VIRTUAL_KEY(0),
                unit,
                KEYEVENTF_UNICODE | KEYEVENTF_KEYUP,
            ));
        }
        if inputs.is_empty() {
            return Ok(());
        }
        send(&inputs)
    }

    /// Moves the pointer relative to its current position.
    pub fn move_relative(&self, dx: i32, dy: i32) -> Result<(), SinkError> {
        send(&[mouse_input(dx, dy, 0, MOUSEEVENTF_MOVE)])
    }

    /// Clicks a mouse button as a down+up pair.
    pub fn click(&self, button: MouseButton) -> Result<(), SinkError> {
        let (down, up) = match button {
            MouseButton::Left => (MOUSEEVENTF_LEFTDOWN, MOUSEEVENTF_LEFTUP),
            MouseButton::Right => (MOUSEEVENTF_RIGHTDOWN, MOUSEEVENTF_RIGHTUP),
        };
        send(&[mouse_input(0, 0, 0, down), mouse_input(0, 0, 0, up)])
    }

    /// Scrolls vertically; positive `dy` scrolls up.
    pub fn scroll(&self, dy: i32) -> Result<(), SinkError> {
        let delta = dy.saturating_mul(WHEEL_DELTA);
        send(&[mouse_input(0, 0, delta as u32, MOUSEEVENTF_WHEEL)])
    }
}

fn keyboard_input(vk: VIRTUAL_KEY, scan: u16, flags: KEYBD_EVENT_FLAGS) -> INPUT {
    INPUT {
        r#type: INPUT_KEYBOARD,
        Anonymous: INPUT_0 {
            ki: KEYBDINPUT {
                wVk: vk,
                wScan: scan,
                dwFlags: flags,
                time: 0,
                dwExtraInfo: 0,
            },
        },
    }
}

fn mouse_input(dx: i32, dy: i32, data: u32, flags: MOUSE_EVENT_FLAGS) -> INPUT {
    INPUT {
        r#type: INPUT_MOUSE,
        Anonymous: INPUT_0 {
            mi: MOUSEINPUT {
                dx,
                dy,
                mouseData: data,
                dwFlags: flags,
                time: 0,
                dwExtraInfo: 0,
            },
        },
    }
}

fn send(inputs: &[INPUT]) -> Result<(), SinkError> {
    // SAFETY: every INPUT in the slice is fully initialized above.
    let sent = unsafe { SendInput(inputs, std::mem::size_of::<INPUT>() as i32) };
    if sent as usize == inputs.len() {
        Ok(())
    } else {
        Err(SinkError::Inject(
            "SendInput rejected the event batch".to_string(),
        ))
    }
}
