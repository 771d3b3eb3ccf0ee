//! X11 keysym translation for Linux input injection.
//!
//! The Linux action sink injects keyboard events through the X11 session, and
//! X11 addresses keys by *keysyms*: named symbols (`Return`, `BackSpace`,
//! `XF86AudioRaiseVolume`, …) for special keys, numeric codes for literal
//! characters.  This module translates the canonical [`KeyInput`] into both:
//! [`keysym_name`] for the named table the X server resolves via
//! `XStringToKeysym`, and [`char_keysym`] for the numeric encoding of a
//! character.
//!
//! Modifier keys use their left-hand variants (`Control_L`, `Alt_L`, …); the
//! protocol does not distinguish sides.

use super::{KeyInput, SpecialKey};

/// Returns the X11 keysym name for a resolved key.
///
/// Literal characters map to themselves: X11 accepts a single character as a
/// keysym name for the ordinary printable range.
pub fn keysym_name(key: &KeyInput) -> String {
    match key {
        KeyInput::Char(c) => c.to_string(),
        KeyInput::Special(special) => special_keysym(*special).to_string(),
    }
}

/// Returns the numeric keysym for a literal character.
///
/// Latin-1 codepoints are their own keysym; everything else uses the Unicode
/// keysym range (codepoint plus `0x0100_0000`) from the X11 keysym encoding.
pub fn char_keysym(c: char) -> u64 {
    let codepoint = c as u64;
    if (0x20..=0xFF).contains(&codepoint) {
        codepoint
    } else {
        codepoint + 0x0100_0000
    }
}

fn special_keysym(key: SpecialKey) -> &'static str {
    match key {
        SpecialKey::Enter => "Return",
        SpecialKey::Esc => "Escape",
        SpecialKey::Tab => "Tab",
        SpecialKey::Space => "space",
        SpecialKey::Backspace => "BackSpace",
        SpecialKey::Delete => "Delete",
        SpecialKey::Insert => "Insert",
        SpecialKey::CapsLock => "Caps_Lock",
        SpecialKey::Ctrl => "Control_L",
        SpecialKey::Alt => "Alt_L",
        SpecialKey::Shift => "Shift_L",
        SpecialKey::Cmd => "Super_L",
        SpecialKey::Up => "Up",
        SpecialKey::Down => "Down",
        SpecialKey::Left => "Left",
        SpecialKey::Right => "Right",
        SpecialKey::Home => "Home",
        SpecialKey::End => "End",
        SpecialKey::PageUp => "Page_Up",
        SpecialKey::PageDown => "Page_Down",
        SpecialKey::PrintScreen => "Print",
        SpecialKey::F1 => "F1",
        SpecialKey::F2 => "F2",
        SpecialKey::F3 => "F3",
        SpecialKey::F4 => "F4",
        SpecialKey::F5 => "F5",
        SpecialKey::F6 => "F6",
        SpecialKey::F7 => "F7",
        SpecialKey::F8 => "F8",
        SpecialKey::F9 => "F9",
        SpecialKey::F10 => "F10",
        SpecialKey::F11 => "F11",
        SpecialKey::F12 => "F12",
        SpecialKey::MediaVolumeUp => "XF86AudioRaiseVolume",
        SpecialKey::MediaVolumeDown => "XF86AudioLowerVolume",
        SpecialKey::MediaVolumeMute => "XF86AudioMute",
        SpecialKey::MediaPlayPause => "XF86AudioPlay",
        SpecialKey::MediaNextTrack => "XF86AudioNext",
        SpecialKey::MediaPreviousTrack => "XF86AudioPrev",
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
