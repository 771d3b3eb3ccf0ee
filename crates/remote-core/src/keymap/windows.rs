//! Windows Virtual-Key codes for input injection.
//!
//! Windows addresses keys by Virtual-Key (VK) code when events are injected
//! through `SendInput`.  This module translates the canonical [`KeyInput`]
//! into the VK code the keyboard input structure carries.
//!
//! Only ASCII letters, digits, and space have direct VK codes among literal
//! characters; everything else (punctuation, non-ASCII) is layout dependent
//! and is typed through the `KEYEVENTF_UNICODE` path instead, which needs no
//! key mapping at all.

use super::{KeyInput, SpecialKey};

/// Returns the Windows Virtual-Key code for a resolved key, or `None` when
/// the key has no layout-independent VK code.
pub fn virtual_key(key: &KeyInput) -> Option<u16> {
    match key {
        KeyInput::Char(c) => char_vk(*c),
        KeyInput::Special(special) => Some(special_vk(*special)),
    }
}

fn char_vk(c: char) -> Option<u16> {
    match c {
        // VK_A..VK_Z are the uppercase ASCII codes, VK_0..VK_9 the digits.
        'a'..='z' => Some(c.to_ascii_uppercase() as u16),
        'A'..='Z' | '0'..='9' => Some(c as u16),
        ' ' => Some(0x20),
        _ => None,
    }
}

fn special_vk(key: SpecialKey) -> u16 {
    match key {
        SpecialKey::Enter => 0x0D,
        SpecialKey::Esc => 0x1B,
        SpecialKey::Tab => 0x09,
        SpecialKey::Space => 0x20,
        SpecialKey::Backspace => 0x08,
        SpecialKey::Delete => 0x2E,
        SpecialKey::Insert => 0x2D,
        SpecialKey::CapsLock => 0x14,
        SpecialKey::Ctrl => 0x11,
        SpecialKey::Alt => 0x12,
        SpecialKey::Shift => 0x10,
        // VK_LWIN
        SpecialKey::Cmd => 0x5B,
        SpecialKey::Up => 0x26,
        SpecialKey::Down => 0x28,
        SpecialKey::Left => 0x25,
        SpecialKey::Right => 0x27,
        SpecialKey::Home => 0x24,
        SpecialKey::End => 0x23,
        SpecialKey::PageUp => 0x21,
        SpecialKey::PageDown => 0x22,
        // VK_SNAPSHOT
        SpecialKey::PrintScreen => 0x2C,
        SpecialKey::F1 => 0x70,
        SpecialKey::F2 => 0x71,
        SpecialKey::F3 => 0x72,
        SpecialKey::F4 => 0x73,
        SpecialKey::F5 => 0x74,
        SpecialKey::F6 => 0x75,
        SpecialKey::F7 => 0x76,
        SpecialKey::F8 => 0x77,
        SpecialKey::F9 => 0x78,
        SpecialKey::F10 => 0x79,
        SpecialKey::F11 => 0x7A,
        SpecialKey::F12 => 0x7B,
        SpecialKey::MediaVolumeUp => 0xAF,
        SpecialKey::MediaVolumeDown => 0xAE,
        SpecialKey::MediaVolumeMute => 0xAD,
        SpecialKey::MediaPlayPause => 0xB3,
        SpecialKey::MediaNextTrack => 0xB0,
        SpecialKey::MediaPreviousTrack => 0xB1,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
