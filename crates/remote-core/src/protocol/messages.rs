//! All PC remote protocol message types.
//!
//! The wire format is JSON text frames.  Inbound frames decode to [`Command`];
//! the only outbound frames are the two [`ServerMessage`] handshake replies.

use serde::{Deserialize, Serialize};
use serde_json::Value;

// ── Inbound commands ──────────────────────────────────────────────────────────

/// A single inbound command frame.
///
/// ```json
/// {"type":"key_combo","data":{"keys":["ctrl","alt","delete"]}}
/// ```
///
/// `data` is handler-specific and validated by the handler, not centrally.
/// When the field is absent it defaults to an empty object so handlers can
/// uniformly report the missing fields they care about.
#[derive(Debug, Clone, Deserialize)]
pub struct Command {
    /// Command type tag; selects the handler.  Kept as a string so that an
    /// unknown tag is a policy decision (warn + ignore) rather than a decode
    /// failure.
    #[serde(rename = "type")]
    pub kind: String,

    /// Handler-specific payload.
    #[serde(default = "empty_data")]
    pub data: Value,
}

fn empty_data() -> Value {
    Value::Object(serde_json::Map::new())
}

/// The closed set of command tags the dispatcher recognises.
///
/// This is the explicit dispatch table: the mapping from tag to handler is
/// fixed at compile time, and anything outside it is rejected by policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    KeyPress,
    KeyCombo,
    Text,
    MediaControl,
    Website,
    Shell,
    MouseMove,
    MouseClick,
    MouseScroll,
    /// Multi-line macro script; executed by the macro runner, which re-enters
    /// the dispatcher once per script line.
    Macro,
}

impl CommandKind {
    /// Looks up a wire tag in the fixed dispatch table.
    ///
    /// Returns `None` for unknown tags; the caller logs and ignores them.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "key_press" => Some(Self::KeyPress),
            "key_combo" => Some(Self::KeyCombo),
            "text" => Some(Self::Text),
            "media_control" => Some(Self::MediaControl),
            "website" => Some(Self::Website),
            "shell" => Some(Self::Shell),
            "mouse_move" => Some(Self::MouseMove),
            "mouse_click" => Some(Self::MouseClick),
            "mouse_scroll" => Some(Self::MouseScroll),
            "macro" => Some(Self::Macro),
            _ => None,
        }
    }

    /// The wire tag for this kind.
    pub fn tag(self) -> &'static str {
        match self {
            Self::KeyPress => "key_press",
            Self::KeyCombo => "key_combo",
            Self::Text => "text",
            Self::MediaControl => "media_control",
            Self::Website => "website",
            Self::Shell => "shell",
            Self::MouseMove => "mouse_move",
            Self::MouseClick => "mouse_click",
            Self::MouseScroll => "mouse_scroll",
            Self::Macro => "macro",
        }
    }
}

// ── Outbound messages ─────────────────────────────────────────────────────────

/// All messages the server ever sends to a client.
///
/// Both are handshake replies; post-auth commands are never acknowledged.
///
/// # Serde representation
///
/// ```json
/// {"type":"handshake_success"}
/// {"type":"auth_failed","reason":"Invalid key"}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// The supplied key matched the shared secret; the command loop is open.
    HandshakeSuccess,
    /// The handshake was rejected; the connection closes after this frame.
    AuthFailed { reason: String },
}

// ── Mouse buttons ─────────────────────────────────────────────────────────────

/// Mouse buttons addressable over the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Right,
}

impl MouseButton {
    /// Maps the wire `button` value to a button.
    ///
    /// Only `"right"` (case-insensitive) selects the right button; every other
    /// value, including garbage, is treated as left.
    pub fn from_wire(value: &str) -> Self {
        if value.eq_ignore_ascii_case("right") {
            Self::Right
        } else {
            Self::Left
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_command_decodes_type_and_data() {
        let cmd: Command =
            serde_json::from_str(r#"{"type":"key_press","data":{"key":"enter"}}"#).unwrap();
        assert_eq!(cmd.kind, "key_press");
        assert_eq!(cmd.data, json!({"key":"enter"}));
    }

    #[test]
    fn test_command_missing_data_defaults_to_empty_object() {
        let cmd: Command = serde_json::from_str(r#"{"type":"mouse_click"}"#).unwrap();
        assert_eq!(cmd.data, json!({}));
    }

    #[test]
    fn test_command_missing_type_is_a_decode_error() {
        let result = serde_json::from_str::<Command>(r#"{"data":{}}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_command_kind_round_trips_through_tag() {
        for kind in [
            CommandKind::KeyPress,
            CommandKind::KeyCombo,
            CommandKind::Text,
            CommandKind::MediaControl,
            CommandKind::Website,
            CommandKind::Shell,
            CommandKind::MouseMove,
            CommandKind::MouseClick,
            CommandKind::MouseScroll,
            CommandKind::Macro,
        ] {
            assert_eq!(CommandKind::from_tag(kind.tag()), Some(kind));
        }
    }

    #[test]
    fn test_command_kind_rejects_unknown_tag() {
        assert_eq!(CommandKind::from_tag("reboot"), None);
        assert_eq!(CommandKind::from_tag(""), None);
        // Tags are case-sensitive on the wire.
        assert_eq!(CommandKind::from_tag("KEY_PRESS"), None);
    }

    #[test]
    fn test_handshake_success_wire_shape() {
        let json = serde_json::to_string(&ServerMessage::HandshakeSuccess).unwrap();
        assert_eq!(json, r#"{"type":"handshake_success"}"#);
    }

    #[test]
    fn test_auth_failed_wire_shape() {
        let msg = ServerMessage::AuthFailed {
            reason: "Invalid key".to_string(),
        };
        let json = serde_json::to_string(&msg).unwrap();
        assert_eq!(json, r#"{"type":"auth_failed","reason":"Invalid key"}"#);
    }

    #[test]
    fn test_mouse_button_right_is_case_insensitive() {
        assert_eq!(MouseButton::from_wire("right"), MouseButton::Right);
        assert_eq!(MouseButton::from_wire("RIGHT"), MouseButton::Right);
    }

    #[test]
    fn test_mouse_button_anything_else_is_left() {
        assert_eq!(MouseButton::from_wire("left"), MouseButton::Left);
        assert_eq!(MouseButton::from_wire("middle"), MouseButton::Left);
        assert_eq!(MouseButton::from_wire(""), MouseButton::Left);
    }
}
