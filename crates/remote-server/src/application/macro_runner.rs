//! The macro runner: sequential execution of a macro script.
//!
//! A macro suspends the session's message loop until it finishes, including
//! its `WAIT` delays, which are cooperative (`tokio::time::sleep`) and never
//! block other sessions.
//!
//! Error policy, per line:
//! - unknown opcode → logged, skipped, execution continues;
//! - unparsable or out-of-range `WAIT` duration, or any side-effect failure
//!   from a handler → logged, **remaining lines are abandoned**.
//!
//! Errors never escape this module: a broken macro must not take the
//! connection down with it.

use std::time::Duration;

use serde_json::{json, Value};
use tokio::time::sleep;
use tracing::{error, info, warn};

use remote_core::protocol::CommandKind;
use remote_core::script::{parse_line, ScriptLine};

use super::dispatcher::Dispatcher;

/// Executes the macro in `data["script"]`, re-entering the dispatcher once
/// per instruction line.
///
/// A missing or empty script is a logged no-op.
pub async fn run_macro(dispatcher: &Dispatcher, data: &Value) {
    let script = match data.get("script").and_then(Value::as_str) {
        Some(script) if !script.is_empty() => script,
        _ => {
            warn!("macro command received with no script");
            return;
        }
    };

    info!("macro execution started");

    for raw in script.lines() {
        let line = match parse_line(raw) {
            Ok(Some(line)) => line,
            Ok(None) => continue,
            Err(e) => {
                error!(line = raw.trim(), "macro aborted: {e}");
                return;
            }
        };

        let result = match line {
            ScriptLine::Type(text) => {
                dispatcher.dispatch(CommandKind::Text, &json!({ "text": text }))
            }
            ScriptLine::Press(key) => {
                dispatcher.dispatch(CommandKind::KeyPress, &json!({ "key": key }))
            }
            ScriptLine::Combo(keys) => {
                dispatcher.dispatch(CommandKind::KeyCombo, &json!({ "keys": keys }))
            }
            ScriptLine::Wait(seconds) => {
                // Negative durations behave like zero.  A finite value can
                // still exceed what a Duration can hold; that is a faulty
                // line, not a reason to panic the session task.
                let Ok(delay) = Duration::try_from_secs_f64(seconds.max(0.0)) else {
                    error!(line = raw.trim(), "macro aborted: WAIT duration out of range");
                    return;
                };
                sleep(delay).await;
                Ok(())
            }
            ScriptLine::Unknown(opcode) => {
                warn!(opcode, "unknown macro opcode");
                Ok(())
            }
        };

        if let Err(e) = result {
            error!(line = raw.trim(), "macro aborted: {e}");
            return;
        }
    }

    info!("macro execution finished");
}

// ── Tests ─────────────────────────────────────────────────────────────────────
