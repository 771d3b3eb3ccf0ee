//! Key name resolution for textual key identifiers.
//!
//! Clients address keys by name (`"enter"`, `"ctrl"`, `"f5"`, …).  A name
//! first resolves against the fixed table of named special keys below,
//! case-insensitively.  When there is no match, the identifier is treated as a
//! literal single character to press; a multi-character identifier that is not
//! a named key is an error.
//!
//! The canonical representation is [`KeyInput`].  Platform-specific codes
//! (X11 keysyms, Windows virtual keys) are translated at the injection
//! boundary via the [`x11`] and [`windows`] modules.

pub mod windows;
pub mod x11;

use thiserror::Error;

/// Error type for key name resolution.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeymapError {
    /// The identifier is neither a named special key nor a single character.
    #[error("unrecognized key name: '{0}'")]
    UnknownKey(String),
}

/// The fixed set of named special keys.
///
/// Mirrors the keys a remote-control client can usefully address: the common
/// editing and navigation cluster, modifiers, function keys, and the media
/// keys used by the `media_control` handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecialKey {
    Enter,
    Esc,
    Tab,
    Space,
    Backspace,
    Delete,
    Insert,
    CapsLock,
    Ctrl,
    Alt,
    Shift,
    /// The OS key: `cmd` on macOS, `super`/`win` elsewhere.
    Cmd,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
    PrintScreen,
    F1,
    F2,
    F3,
    F4,
    F5,
    F6,
    F7,
    F8,
    F9,
    F10,
    F11,
    F12,
    MediaVolumeUp,
    MediaVolumeDown,
    MediaVolumeMute,
    MediaPlayPause,
    MediaNextTrack,
    MediaPreviousTrack,
}

impl SpecialKey {
    /// Resolves a key name against the named-key table, case-insensitively.
    ///
    /// Common aliases are accepted (`"return"` for enter, `"escape"` for esc,
    /// `"win"`/`"super"` for the OS key).
    pub fn from_name(name: &str) -> Option<Self> {
        let lower = name.to_ascii_lowercase();
        let key = match lower.as_str() {
            "enter" | "return" => Self::Enter,
            "esc" | "escape" => Self::Esc,
            "tab" => Self::Tab,
            "space" => Self::Space,
            "backspace" => Self::Backspace,
            "delete" | "del" => Self::Delete,
            "insert" => Self::Insert,
            "caps_lock" => Self::CapsLock,
            "ctrl" | "control" => Self::Ctrl,
            "alt" => Self::Alt,
            "shift" => Self::Shift,
            "cmd" | "win" | "super" | "windows" => Self::Cmd,
            "up" => Self::Up,
            "down" => Self::Down,
            "left" => Self::Left,
            "right" => Self::Right,
            "home" => Self::Home,
            "end" => Self::End,
            "page_up" | "pageup" => Self::PageUp,
            "page_down" | "pagedown" => Self::PageDown,
            "print_screen" => Self::PrintScreen,
            "f1" => Self::F1,
            "f2" => Self::F2,
            "f3" => Self::F3,
            "f4" => Self::F4,
            "f5" => Self::F5,
            "f6" => Self::F6,
            "f7" => Self::F7,
            "f8" => Self::F8,
            "f9" => Self::F9,
            "f10" => Self::F10,
            "f11" => Self::F11,
            "f12" => Self::F12,
            "media_volume_up" => Self::MediaVolumeUp,
            "media_volume_down" => Self::MediaVolumeDown,
            "media_volume_mute" => Self::MediaVolumeMute,
            "media_play_pause" => Self::MediaPlayPause,
            "media_next_track" => Self::MediaNextTrack,
            "media_previous_track" => Self::MediaPreviousTrack,
            _ => return None,
        };
        Some(key)
    }
}

/// A resolved key: either a named special key or a literal character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyInput {
    Special(SpecialKey),
    Char(char),
}

/// Resolves a textual key identifier to a [`KeyInput`].
///
/// Resolution order: named special key (case-insensitive) first, then literal
/// single character.
///
/// # Errors
///
/// Returns [`KeymapError::UnknownKey`] when the identifier is empty or is a
/// multi-character string that matches no named key.
pub fn resolve_key(name: &str) -> Result<KeyInput, KeymapError> {
    if let Some(special) = SpecialKey::from_name(name) {
        return Ok(KeyInput::Special(special));
    }
    let mut chars = name.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(KeyInput::Char(c)),
        _ => Err(KeymapError::UnknownKey(name.to_string())),
    }
}

/// Maps a `media_control` action to the media key it presses.
///
/// Returns `None` for unknown actions; the handler logs and ignores them.
pub fn media_action_key(action: &str) -> Option<SpecialKey> {
    match action {
        "volume_up" => Some(SpecialKey::MediaVolumeUp),
        "volume_down" => Some(SpecialKey::MediaVolumeDown),
        "volume_mute" => Some(SpecialKey::MediaVolumeMute),
        "media_play_pause" => Some(SpecialKey::MediaPlayPause),
        "media_next" => Some(SpecialKey::MediaNextTrack),
        "media_previous" => Some(SpecialKey::MediaPreviousTrack),
        _ => None,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_named_key() {
        assert_eq!(
            resolve_key("enter"),
            Ok(KeyInput::Special(SpecialKey::Enter))
        );
    }

    #[test]
    fn test_resolve_is_case_insensitive() {
        assert_eq!(resolve_key("ENTER"), resolve_key("enter"));
        assert_eq!(resolve_key("Ctrl"), Ok(KeyInput::Special(SpecialKey::Ctrl)));
    }

    #[test]
    fn test_resolve_falls_back_to_literal_character() {
        assert_eq!(resolve_key("a"), Ok(KeyInput::Char('a')));
        assert_eq!(resolve_key("7"), Ok(KeyInput::Char('7')));
        assert_eq!(resolve_key("!"), Ok(KeyInput::Char('!')));
    }

    #[test]
    fn test_named_key_wins_over_literal_fallback() {
        // "up" is a named key, not the characters 'u' 'p'.
        assert_eq!(resolve_key("up"), Ok(KeyInput::Special(SpecialKey::Up)));
    }

    #[test]
    fn test_resolve_rejects_unknown_multi_char_name() {
        assert_eq!(
            resolve_key("frobnicate"),
            Err(KeymapError::UnknownKey("frobnicate".to_string()))
        );
    }

    #[test]
    fn test_resolve_rejects_empty_name() {
        assert!(resolve_key("").is_err());
    }

    #[test]
    fn test_resolve_accepts_multibyte_literal_character() {
        assert_eq!(resolve_key("é"), Ok(KeyInput::Char('é')));
    }

    #[test]
    fn test_media_action_map_known_actions() {
        assert_eq!(media_action_key("volume_up"), Some(SpecialKey::MediaVolumeUp));
        assert_eq!(
            media_action_key("volume_down"),
            Some(SpecialKey::MediaVolumeDown)
        );
        assert_eq!(
            media_action_key("volume_mute"),
            Some(SpecialKey::MediaVolumeMute)
        );
        assert_eq!(
            media_action_key("media_play_pause"),
            Some(SpecialKey::MediaPlayPause)
        );
        assert_eq!(
            media_action_key("media_next"),
            Some(SpecialKey::MediaNextTrack)
        );
        assert_eq!(
            media_action_key("media_previous"),
            Some(SpecialKey::MediaPreviousTrack)
        );
    }

    #[test]
    fn test_media_action_map_rejects_unknown_action() {
        assert_eq!(media_action_key("louder"), None);
        assert_eq!(media_action_key(""), None);
    }
}
