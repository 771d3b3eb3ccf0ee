//! Linux X11 input injection via the XTest extension.
//!
//! Events are synthesized with `XTestFakeKeyEvent`, `XTestFakeButtonEvent`,
//! and `XTestFakeRelativeMotionEvent`; the receiving application cannot
//! distinguish them from physical input.
//!
//! # Key translation
//!
//! XTest takes an X11 *keycode* (the hardware code the current layout
//! assigns), not a keysym.  The conversion chain is:
//!
//! ```text
//! KeyInput → keysym (named or numeric) → XKeysymToKeycode → keycode
//! ```
//!
//! When the keysym lives on the shifted level of its key (an uppercase
//! letter, `!` on the `1` key), Shift is held around the fake event so the
//! right symbol is produced.
//!
//! # Scrolling
//!
//! X11 has no dedicated scroll API; wheel motion is expressed as clicks of
//! buttons 4 (up) and 5 (down), one press+release pair per scroll unit.
//!
//! # Threading
//!
//! Xlib connections are not thread safe, and session tasks inject
//! concurrently, so the display handle lives behind a mutex.  The connection
//! is opened once at startup; a missing X server (headless host, `DISPLAY`
//! unset) fails construction.

#![cfg(target_os = "linux")]

use std::ffi::CString;
use std::ptr;
use std::sync::Mutex;

use x11::keysym::XK_Shift_L;
use x11::{xlib, xtest};

use remote_core::keymap::{x11 as x11_keys, KeyInput};
use remote_core::protocol::MouseButton;

use crate::application::action_sink::SinkError;

const PRESS: i32 = 1;
const RELEASE: i32 = 0;

/// An open X display connection driving XTest injection.
pub struct X11Injector {
    display: Mutex<DisplayPtr>,
}

struct DisplayPtr(*mut xlib::Display);

// SAFETY: the pointer is only dereferenced while the mutex is held.
unsafe impl Send for DisplayPtr {}

impl X11Injector {
    /// Connects to the display named by `DISPLAY`.
    ///
    /// # Errors
    ///
    /// Returns [`SinkError::Inject`] when no X server is reachable.
    pub fn open() -> Result<Self, SinkError> {
        // SAFETY: XOpenDisplay(null) reads DISPLAY; a null return means the
        // server is unreachable.
        let display = unsafe { xlib::XOpenDisplay(ptr::null()) };
        if display.is_null() {
            return Err(SinkError::Inject(
                "cannot open X display (is DISPLAY set?)".to_string(),
            ));
        }
        Ok(Self {
            display: Mutex::new(DisplayPtr(display)),
        })
    }

    /// Fakes one key press or release.
    pub fn key_event(&self, key: &KeyInput, press: bool) -> Result<(), SinkError> {
        let keysym = keysym_for(key)?;
        let guard = self.lock()?;
        let dpy = guard.0;
        // SAFETY: dpy stays valid for the lifetime of self and the mutex
        // serializes all Xlib calls on it.
        unsafe {
            let keycode = xlib::XKeysymToKeycode(dpy, keysym);
            if keycode == 0 {
                return Err(SinkError::Inject(format!(
                    "keysym {keysym:#x} has no keycode in the current layout"
                )));
            }
            let shifted = xlib::XKeycodeToKeysym(dpy, keycode, 0) != keysym;
            let shift = xlib::XKeysymToKeycode(dpy, XK_Shift_L as xlib::KeySym);
            if shifted && press {
                xtest::XTestFakeKeyEvent(dpy, u32::from(shift), PRESS, xlib::CurrentTime);
            }
            let state = if press { PRESS } else { RELEASE };
            xtest::XTestFakeKeyEvent(dpy, u32::from(keycode), state, xlib::CurrentTime);
            if shifted && !press {
                xtest::XTestFakeKeyEvent(dpy, u32::from(shift), RELEASE, xlib::CurrentTime);
            }
            xlib::XFlush(dpy);
        }
        Ok(())
    }

    /// Types literal text, one press+release pair per character.
    pub fn type_text(&self, text: &str) -> Result<(), SinkError> {
        for c in text.chars() {
            let key = KeyInput::Char(c);
            self.key_event(&key, true)?;
            self.key_event(&key, false)?;
        }
        Ok(())
    }

    /// Moves the pointer relative to its current position.
    pub fn move_relative(&self, dx: i32, dy: i32) -> Result<(), SinkError> {
        let guard = self.lock()?;
        // SAFETY: see key_event.
        unsafe {
            // x11-rs declares an extra (unused) c_int before the delay; the real C
            // function only reads (display, dx, dy, delay). Both slots are 0 here
            // since CurrentTime == 0, so the delay is correct either way.
            xtest::XTestFakeRelativeMotionEvent(guard.0, dx, dy, 0, xlib::CurrentTime);
            xlib::XFlush(guard.0);
        }
        Ok(())
    }

    /// Clicks a mouse button (X11 numbering: 1 left, 3 right).
    pub fn click(&self, button: MouseButton) -> Result<(), SinkError> {
        let number = match button {
            MouseButton::Left => 1,
            MouseButton::Right => 3,
        };
        self.button_clicks(number, 1)
    }

    /// Scrolls vertically as wheel-button clicks.
    pub fn scroll(&self, dy: i32) -> Result<(), SinkError> {
        let (button, clicks) = scroll_clicks(dy);
        self.button_clicks(button, clicks)
    }

    fn button_clicks(&self, button: u32, clicks: u32) -> Result<(), SinkError> {
        let guard = self.lock()?;
        let dpy = guard.0;
        // SAFETY: see key_event.
        unsafe {
            for _ in 0..clicks {
                xtest::XTestFakeButtonEvent(dpy, button, PRESS, xlib::CurrentTime);
                xtest::XTestFakeButtonEvent(dpy, button, RELEASE, xlib::CurrentTime);
            }
            xlib::XFlush(dpy);
        }
        Ok(())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, DisplayPtr>, SinkError> {
        self.display
            .lock()
            .map_err(|_| SinkError::Inject("display connection poisoned".to_string()))
    }
}

impl Drop for X11Injector {
    fn drop(&mut self) {
        if let Ok(handle) = self.display.get_mut() {
            // SAFETY: the display was opened by us and is closed exactly once.
            unsafe {
                xlib::XCloseDisplay(handle.0);
            }
        }
    }
}

/// Resolves a key to its keysym: the numeric encoding for characters, the
/// named table via `XStringToKeysym` for special keys.
fn keysym_for(key: &KeyInput) -> Result<xlib::KeySym, SinkError> {
    match key {
        KeyInput::Char(c) => Ok(x11_keys::char_keysym(*c) as xlib::KeySym),
        KeyInput::Special(_) => {
            let name = x11_keys::keysym_name(key);
            let cname = CString::new(name.as_str())
                .map_err(|_| SinkError::Inject(format!("invalid keysym name '{name}'")))?;
            // SAFETY: cname is a valid NUL-terminated string; XStringToKeysym
            // does not need a display connection.
            let keysym = unsafe { xlib::XStringToKeysym(cname.as_ptr()) };
            if keysym == 0 {
                return Err(SinkError::Inject(format!("unknown keysym '{name}'")));
            }
            Ok(keysym)
        }
    }
}

/// Maps a vertical scroll delta to an X11 wheel button and a click count.
///
/// Positive deltas scroll up (button 4), negative down (button 5).
fn scroll_clicks(dy: i32) -> (u32, u32) {
    if dy > 0 {
        (4, dy as u32)
    } else {
        (5, dy.unsigned_abs())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scroll_up_uses_button_4() {
        assert_eq!(scroll_clicks(3), (4, 3));
    }

    #[test]
    fn test_scroll_down_uses_button_5_with_absolute_count() {
        assert_eq!(scroll_clicks(-2), (5, 2));
    }

    #[test]
    fn test_char_keysyms_resolve_without_a_display() {
        assert_eq!(keysym_for(&KeyInput::Char('a')).unwrap(), 0x61);
        assert_eq!(keysym_for(&KeyInput::Char('!')).unwrap(), 0x21);
    }
}
