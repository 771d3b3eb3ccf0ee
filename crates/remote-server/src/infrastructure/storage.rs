//! TOML config file loading.
//!
//! The config file is optional: a first run without one works, with defaults
//! and a freshly generated secret.  All fields are optional too, so the file
//! only needs to name what it overrides:
//!
//! ```toml
//! [server]
//! port = 59874
//! bind = "0.0.0.0"
//! secret_key = "my-shared-secret"
//! auth_timeout_secs = 10
//! ```
//!
//! Merging with CLI arguments happens in `main`; this module only reads and
//! parses.

use std::net::IpAddr;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// Error type for configuration file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A file system I/O error occurred (other than the file being absent).
    #[error("I/O error reading config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),
}

/// On-disk configuration schema.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub server: ServerSection,
}

/// The `[server]` table.  Every field is optional.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct ServerSection {
    pub port: Option<u16>,
    pub bind: Option<IpAddr>,
    pub secret_key: Option<String>,
    pub auth_timeout_secs: Option<u64>,
}

/// Loads the config file at `path`.
///
/// An absent file yields the empty default config; any other I/O failure or a
/// parse failure is an error; a present-but-broken config file should stop
/// startup rather than silently fall back to a generated secret.
pub fn load_config(path: &Path) -> Result<FileConfig, ConfigError> {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Ok(FileConfig::default());
        }
        Err(source) => {
            return Err(ConfigError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    };
    Ok(toml::from_str(&text)?)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_yields_defaults() {
        let cfg = load_config(Path::new("/definitely/not/a/real/config.toml")).unwrap();
        assert!(cfg.server.port.is_none());
        assert!(cfg.server.secret_key.is_none());
    }

    #[test]
    fn test_parses_full_server_section() {
        let cfg: FileConfig = toml::from_str(
            r#"
            [server]
            port = 4242
            bind = "127.0.0.1"
            secret_key = "hunter2"
            auth_timeout_secs = 3
            "#,
        )
        .unwrap();
        assert_eq!(cfg.server.port, Some(4242));
        assert_eq!(cfg.server.bind, Some("127.0.0.1".parse().unwrap()));
        assert_eq!(cfg.server.secret_key.as_deref(), Some("hunter2"));
        assert_eq!(cfg.server.auth_timeout_secs, Some(3));
    }

    #[test]
    fn test_empty_file_yields_defaults() {
        let cfg: FileConfig = toml::from_str("").unwrap();
        assert!(cfg.server.port.is_none());
    }

    #[test]
    fn test_partial_section_leaves_rest_unset() {
        let cfg: FileConfig = toml::from_str("[server]\nport = 1000\n").unwrap();
        assert_eq!(cfg.server.port, Some(1000));
        assert!(cfg.server.bind.is_none());
    }

    #[test]
    fn test_malformed_toml_is_an_error() {
        let result: Result<FileConfig, _> = toml::from_str("[server\nport = ");
        assert!(result.is_err());
    }
}
