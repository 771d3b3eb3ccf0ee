//! The line-oriented macro script language.
//!
//! A macro is a multi-line text script executed sequentially server-side:
//!
//! ```text
//! # open a terminal and greet
//! COMBO ctrl+alt+t
//! WAIT 0.5
//! TYPE "echo hello"
//! PRESS enter
//! ```
//!
//! Blank lines and `#` comments are skipped.  Every other line is an uppercase
//! opcode followed by a raw argument string (everything after the first
//! whitespace run).  Opcodes are matched case-insensitively.
//!
//! Parsing is strictly per line, never whole-script: the executor must be able
//! to run line 1's side effect before discovering that line 2 is faulty.
//! A faulty line (today only an unparsable `WAIT` duration) aborts the rest of
//! the macro; an *unknown opcode* is merely skipped. That distinction is why
//! unknown opcodes are a [`ScriptLine`] variant, not an error.

use thiserror::Error;

/// Error type for macro line parsing.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScriptError {
    /// The `WAIT` argument is not a finite number of seconds.
    #[error("invalid WAIT duration: '{0}'")]
    InvalidWait(String),
}

/// One parsed macro instruction.
#[derive(Debug, Clone, PartialEq)]
pub enum ScriptLine {
    /// `TYPE <text>`: type the text verbatim.  One layer of surrounding
    /// double quotes, if present, has already been stripped.
    Type(String),
    /// `PRESS <key>`: single press+release of the named key.
    Press(String),
    /// `COMBO <k1+k2+...>`: nested key combination; tokens are trimmed.
    Combo(Vec<String>),
    /// `WAIT <seconds>`: suspend the macro for a duration.
    Wait(f64),
    /// An unrecognised opcode (stored uppercased).  Executed as a no-op.
    Unknown(String),
}

/// Parses one raw script line.
///
/// Returns `Ok(None)` for blank lines and `#` comments.
///
/// # Errors
///
/// Returns [`ScriptError::InvalidWait`] when a `WAIT` argument does not parse
/// as a finite float.  The executor treats this as a macro-aborting error.
pub fn parse_line(raw: &str) -> Result<Option<ScriptLine>, ScriptError> {
    let line = raw.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let (opcode, argument) = match line.split_once(char::is_whitespace) {
        Some((op, rest)) => (op, rest.trim_start()),
        None => (line, ""),
    };

    let parsed = match opcode.to_ascii_uppercase().as_str() {
        "TYPE" => ScriptLine::Type(strip_quotes(argument).to_string()),
        "PRESS" => ScriptLine::Press(argument.to_string()),
        "COMBO" => ScriptLine::Combo(
            argument
                .split('+')
                .map(|token| token.trim().to_string())
                .collect(),
        ),
        "WAIT" => {
            let seconds: f64 = argument
                .parse()
                .map_err(|_| ScriptError::InvalidWait(argument.to_string()))?;
            if !seconds.is_finite() {
                return Err(ScriptError::InvalidWait(argument.to_string()));
            }
            ScriptLine::Wait(seconds)
        }
        other => ScriptLine::Unknown(other.to_string()),
    };

    Ok(Some(parsed))
}

/// Strips exactly one layer of surrounding double quotes, if present.
fn strip_quotes(argument: &str) -> &str {
    if argument.len() >= 2 && argument.starts_with('"') && argument.ends_with('"') {
        &argument[1..argument.len() - 1]
    } else {
        argument
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
