//! The command dispatcher: routes a decoded command to its handler.
//!
//! Each handler receives the command's `data` object and validates its own
//! fields.  A missing required field is a warn-and-ignore no-op, never an
//! error; only a failing side effect (a [`SinkError`] from the action sink)
//! surfaces as `Err`.  The session loop logs such errors and keeps the
//! connection open; the macro runner instead aborts the rest of the macro.

use std::sync::Arc;

use serde_json::Value;
use tracing::{info, warn};

use remote_core::keymap::{self, resolve_key, KeyInput};
use remote_core::protocol::{CommandKind, MouseButton};

use super::action_sink::{ActionSink, SinkError};

/// Routes command payloads to the shared [`ActionSink`].
///
/// Cheap to share: holds only the `Arc` to the sink.
#[derive(Clone)]
pub struct Dispatcher {
    sink: Arc<dyn ActionSink>,
}

impl Dispatcher {
    /// Creates a dispatcher over the given sink.
    pub fn new(sink: Arc<dyn ActionSink>) -> Self {
        Self { sink }
    }

    /// Invokes the handler for `kind` with the command's `data` payload.
    ///
    /// `CommandKind::Macro` is not handled here; macros run through the
    /// asynchronous macro runner, which re-enters this method per script line.
    ///
    /// # Errors
    ///
    /// Returns [`SinkError`] when the handler's side effect fails.  Missing or
    /// malformed payload fields are logged no-ops, not errors.
    pub fn dispatch(&self, kind: CommandKind, data: &Value) -> Result<(), SinkError> {
        match kind {
            CommandKind::KeyPress => self.key_press(data),
            CommandKind::KeyCombo => self.key_combo(data),
            CommandKind::Text => self.text(data),
            CommandKind::MediaControl => self.media_control(data),
            CommandKind::Website => self.website(data),
            CommandKind::Shell => self.shell(data),
            CommandKind::MouseMove => self.mouse_move(data),
            CommandKind::MouseClick => self.mouse_click(data),
            CommandKind::MouseScroll => self.mouse_scroll(data),
            CommandKind::Macro => {
                warn!("macro command reached the synchronous dispatcher; ignored");
                Ok(())
            }
        }
    }

    // ── Keyboard handlers ─────────────────────────────────────────────────────

    fn key_press(&self, data: &Value) -> Result<(), SinkError> {
        let Some(name) = non_empty_str(data, "key") else {
            warn!("'key_press' command with no key");
            return Ok(());
        };
        info!(key = name, "key press");
        let key = resolve_key(name)?;
        self.sink.press_key(&key)?;
        self.sink.release_key(&key)
    }

    /// Presses all keys in listed order and releases them in reverse order,
    /// so the first key pressed is the last released (nested-combo semantics).
    fn key_combo(&self, data: &Value) -> Result<(), SinkError> {
        let names: Vec<&str> = data
            .get("keys")
            .and_then(Value::as_array)
            .map(|keys| keys.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default();
        if names.is_empty() {
            warn!("'key_combo' command received with no keys specified");
            return Ok(());
        }
        info!(keys = ?names, "key combo");
        let keys: Vec<KeyInput> = names
            .iter()
            .map(|name| resolve_key(name))
            .collect::<Result<_, _>>()?;
        for key in &keys {
            self.sink.press_key(key)?;
        }
        for key in keys.iter().rev() {
            self.sink.release_key(key)?;
        }
        Ok(())
    }

    fn text(&self, data: &Value) -> Result<(), SinkError> {
        // The empty string is a valid (if pointless) payload; only a missing
        // or non-string field is a no-op.
        let Some(text) = data.get("text").and_then(Value::as_str) else {
            warn!("'text' command received with no text");
            return Ok(());
        };
        info!("text input");
        self.sink.type_text(text)
    }

    fn media_control(&self, data: &Value) -> Result<(), SinkError> {
        let Some(action) = non_empty_str(data, "action") else {
            warn!("'media_control' received with no action");
            return Ok(());
        };
        let Some(media_key) = keymap::media_action_key(action) else {
            warn!(action, "unknown media action");
            return Ok(());
        };
        info!(action, "media control");
        let key = KeyInput::Special(media_key);
        self.sink.press_key(&key)?;
        self.sink.release_key(&key)
    }

    // ── OS action handlers ────────────────────────────────────────────────────

    fn website(&self, data: &Value) -> Result<(), SinkError> {
        let Some(url) = non_empty_str(data, "url") else {
            warn!("'website' command received with no URL");
            return Ok(());
        };
        info!(url, "open website");
        self.sink.open_url(url)
    }

    fn shell(&self, data: &Value) -> Result<(), SinkError> {
        let Some(command) = non_empty_str(data, "command") else {
            warn!("'shell' command received with no command");
            return Ok(());
        };
        warn!(command, "executing shell command");
        self.sink.run_shell(command)
    }

    // ── Mouse handlers ────────────────────────────────────────────────────────

    fn mouse_move(&self, data: &Value) -> Result<(), SinkError> {
        let dx = int_field(data, "dx");
        let dy = int_field(data, "dy");
        // A (0,0) move is still forwarded to the sink, unlike a zero scroll.
        self.sink.move_mouse(dx, dy)
    }

    fn mouse_click(&self, data: &Value) -> Result<(), SinkError> {
        let button_str = data
            .get("button")
            .and_then(Value::as_str)
            .unwrap_or("left");
        let button = MouseButton::from_wire(button_str);
        info!(button = ?button, "mouse click");
        self.sink.click_mouse(button)
    }

    fn mouse_scroll(&self, data: &Value) -> Result<(), SinkError> {
        let dy = int_field(data, "dy");
        if dy == 0 {
            return Ok(());
        }
        self.sink.scroll_mouse(dy)
    }
}

/// Fetches a string field, treating an absent, non-string, or empty value as
/// missing.
fn non_empty_str<'a>(data: &'a Value, field: &str) -> Option<&'a str> {
    data.get(field)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}

/// Fetches a numeric field as an integer, defaulting to 0.  Accepts JSON
/// floats (clients interpolate pointer deltas) by truncation; values outside
/// the `i32` range saturate rather than wrap.
fn int_field(data: &Value, field: &str) -> i32 {
    let wide = match data.get(field) {
        Some(value) => value
            .as_i64()
            .or_else(|| value.as_f64().map(|f| f as i64))
            .unwrap_or(0),
        None => 0,
    };
    wide.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::action_sink::mock::{MockActionSink, SinkCall};
    use remote_core::keymap::SpecialKey;
    use serde_json::json;

    fn dispatcher() -> (Dispatcher, Arc<MockActionSink>) {
        let sink = Arc::new(MockActionSink::new());
        let dispatcher = Dispatcher::new(sink.clone());
        (dispatcher, sink)
    }

    // ── key_press ─────────────────────────────────────────────────────────────

    #[test]
    fn test_key_press_presses_and_releases() {
        let (dispatcher, sink) = dispatcher();

        dispatcher
            .dispatch(CommandKind::KeyPress, &json!({"key": "enter"}))
            .unwrap();

        let enter = KeyInput::Special(SpecialKey::Enter);
        assert_eq!(
            sink.calls(),
            vec![SinkCall::PressKey(enter), SinkCall::ReleaseKey(enter)]
        );
    }

    #[test]
    fn test_key_press_literal_character_fallback() {
        let (dispatcher, sink) = dispatcher();

        dispatcher
            .dispatch(CommandKind::KeyPress, &json!({"key": "a"}))
            .unwrap();

        assert_eq!(
            sink.calls(),
            vec![
                SinkCall::PressKey(KeyInput::Char('a')),
                SinkCall::ReleaseKey(KeyInput::Char('a')),
            ]
        );
    }

    #[test]
    fn test_key_press_missing_key_is_a_noop() {
        let (dispatcher, sink) = dispatcher();

        dispatcher.dispatch(CommandKind::KeyPress, &json!({})).unwrap();
        // An empty string counts as missing too.
        dispatcher
            .dispatch(CommandKind::KeyPress, &json!({"key": ""}))
            .unwrap();

        assert!(sink.calls().is_empty());
    }

    #[test]
    fn test_key_press_unresolvable_key_is_an_error() {
        let (dispatcher, sink) = dispatcher();

        let result = dispatcher.dispatch(CommandKind::KeyPress, &json!({"key": "frobnicate"}));

        assert!(matches!(result, Err(SinkError::Key(_))));
        assert!(sink.calls().is_empty());
    }

    // ── key_combo ─────────────────────────────────────────────────────────────

    #[test]
    fn test_key_combo_presses_in_order_releases_in_reverse() {
        let (dispatcher, sink) = dispatcher();

        dispatcher
            .dispatch(
                CommandKind::KeyCombo,
                &json!({"keys": ["ctrl", "alt", "delete"]}),
            )
            .unwrap();

        let ctrl = KeyInput::Special(SpecialKey::Ctrl);
        let alt = KeyInput::Special(SpecialKey::Alt);
        let delete = KeyInput::Special(SpecialKey::Delete);
        assert_eq!(
            sink.calls(),
            vec![
                SinkCall::PressKey(ctrl),
                SinkCall::PressKey(alt),
                SinkCall::PressKey(delete),
                SinkCall::ReleaseKey(delete),
                SinkCall::ReleaseKey(alt),
                SinkCall::ReleaseKey(ctrl),
            ]
        );
    }

    #[test]
    fn test_key_combo_missing_or_empty_keys_is_a_noop() {
        let (dispatcher, sink) = dispatcher();

        dispatcher.dispatch(CommandKind::KeyCombo, &json!({})).unwrap();
        dispatcher
            .dispatch(CommandKind::KeyCombo, &json!({"keys": []}))
            .unwrap();

        assert!(sink.calls().is_empty());
    }

    #[test]
    fn test_key_combo_resolves_all_keys_before_pressing_any() {
        let (dispatcher, sink) = dispatcher();

        let result = dispatcher.dispatch(
            CommandKind::KeyCombo,
            &json!({"keys": ["ctrl", "notakey"]}),
        );

        assert!(result.is_err());
        // Nothing was pressed: the bad name was caught up front.
        assert!(sink.calls().is_empty());
    }

    // ── text ──────────────────────────────────────────────────────────────────

    #[test]
    fn test_text_types_verbatim() {
        let (dispatcher, sink) = dispatcher();

        dispatcher
            .dispatch(CommandKind::Text, &json!({"text": "hello, world"}))
            .unwrap();

        assert_eq!(
            sink.calls(),
            vec![SinkCall::TypeText("hello, world".to_string())]
        );
    }

    #[test]
    fn test_text_empty_string_is_still_typed() {
        let (dispatcher, sink) = dispatcher();

        dispatcher
            .dispatch(CommandKind::Text, &json!({"text": ""}))
            .unwrap();

        assert_eq!(sink.calls(), vec![SinkCall::TypeText(String::new())]);
    }

    #[test]
    fn test_text_missing_field_is_a_noop() {
        let (dispatcher, sink) = dispatcher();

        dispatcher.dispatch(CommandKind::Text, &json!({})).unwrap();
        dispatcher
            .dispatch(CommandKind::Text, &json!({"text": null}))
            .unwrap();

        assert!(sink.calls().is_empty());
    }

    // ── media_control ─────────────────────────────────────────────────────────

    #[test]
    fn test_media_control_taps_the_media_key() {
        let (dispatcher, sink) = dispatcher();

        dispatcher
            .dispatch(CommandKind::MediaControl, &json!({"action": "volume_up"}))
            .unwrap();

        let key = KeyInput::Special(SpecialKey::MediaVolumeUp);
        assert_eq!(
            sink.calls(),
            vec![SinkCall::PressKey(key), SinkCall::ReleaseKey(key)]
        );
    }

    #[test]
    fn test_media_control_unknown_action_is_a_noop() {
        let (dispatcher, sink) = dispatcher();

        dispatcher
            .dispatch(CommandKind::MediaControl, &json!({"action": "louder"}))
            .unwrap();

        assert!(sink.calls().is_empty());
    }

    // ── website / shell ───────────────────────────────────────────────────────

    #[test]
    fn test_website_opens_url() {
        let (dispatcher, sink) = dispatcher();

        dispatcher
            .dispatch(CommandKind::Website, &json!({"url": "https://example.com"}))
            .unwrap();

        assert_eq!(
            sink.calls(),
            vec![SinkCall::OpenUrl("https://example.com".to_string())]
        );
    }

    #[test]
    fn test_shell_runs_command() {
        let (dispatcher, sink) = dispatcher();

        dispatcher
            .dispatch(CommandKind::Shell, &json!({"command": "notify-send hi"}))
            .unwrap();

        assert_eq!(
            sink.calls(),
            vec![SinkCall::RunShell("notify-send hi".to_string())]
        );
    }

    #[test]
    fn test_website_and_shell_missing_field_are_noops() {
        let (dispatcher, sink) = dispatcher();

        dispatcher.dispatch(CommandKind::Website, &json!({})).unwrap();
        dispatcher.dispatch(CommandKind::Shell, &json!({})).unwrap();

        assert!(sink.calls().is_empty());
    }

    // ── mouse ─────────────────────────────────────────────────────────────────

    #[test]
    fn test_mouse_move_defaults_missing_deltas_to_zero() {
        let (dispatcher, sink) = dispatcher();

        dispatcher
            .dispatch(CommandKind::MouseMove, &json!({"dx": 5}))
            .unwrap();

        assert_eq!(sink.calls(), vec![SinkCall::MoveMouse(5, 0)]);
    }

    #[test]
    fn test_mouse_move_zero_zero_is_still_forwarded() {
        let (dispatcher, sink) = dispatcher();

        dispatcher.dispatch(CommandKind::MouseMove, &json!({})).unwrap();

        assert_eq!(sink.calls(), vec![SinkCall::MoveMouse(0, 0)]);
    }

    #[test]
    fn test_mouse_move_accepts_float_deltas() {
        let (dispatcher, sink) = dispatcher();

        dispatcher
            .dispatch(CommandKind::MouseMove, &json!({"dx": 3.7, "dy": -2.2}))
            .unwrap();

        assert_eq!(sink.calls(), vec![SinkCall::MoveMouse(3, -2)]);
    }

    #[test]
    fn test_mouse_move_extreme_deltas_saturate() {
        let (dispatcher, sink) = dispatcher();

        dispatcher
            .dispatch(
                CommandKind::MouseMove,
                &json!({"dx": 10_000_000_000i64, "dy": -10_000_000_000i64}),
            )
            .unwrap();

        assert_eq!(sink.calls(), vec![SinkCall::MoveMouse(i32::MAX, i32::MIN)]);
    }

    #[test]
    fn test_mouse_scroll_zero_is_a_noop() {
        let (dispatcher, sink) = dispatcher();

        dispatcher.dispatch(CommandKind::MouseScroll, &json!({})).unwrap();
        dispatcher
            .dispatch(CommandKind::MouseScroll, &json!({"dy": 0}))
            .unwrap();

        assert!(sink.calls().is_empty());
    }

    #[test]
    fn test_mouse_scroll_nonzero_is_forwarded() {
        let (dispatcher, sink) = dispatcher();

        dispatcher
            .dispatch(CommandKind::MouseScroll, &json!({"dy": -3}))
            .unwrap();

        assert_eq!(sink.calls(), vec![SinkCall::ScrollMouse(-3)]);
    }

    #[test]
    fn test_mouse_click_defaults_to_left() {
        let (dispatcher, sink) = dispatcher();

        dispatcher.dispatch(CommandKind::MouseClick, &json!({})).unwrap();

        assert_eq!(sink.calls(), vec![SinkCall::ClickMouse(MouseButton::Left)]);
    }

    #[test]
    fn test_mouse_click_right_and_garbage_buttons() {
        let (dispatcher, sink) = dispatcher();

        dispatcher
            .dispatch(CommandKind::MouseClick, &json!({"button": "right"}))
            .unwrap();
        dispatcher
            .dispatch(CommandKind::MouseClick, &json!({"button": "middle"}))
            .unwrap();

        assert_eq!(
            sink.calls(),
            vec![
                SinkCall::ClickMouse(MouseButton::Right),
                SinkCall::ClickMouse(MouseButton::Left),
            ]
        );
    }

    // ── error propagation ─────────────────────────────────────────────────────

    #[test]
    fn test_sink_failure_propagates_as_error() {
        let (dispatcher, sink) = dispatcher();
        sink.set_should_fail(true);

        let result = dispatcher.dispatch(CommandKind::Text, &json!({"text": "hi"}));

        assert!(matches!(result, Err(SinkError::Inject(_))));
    }
}
