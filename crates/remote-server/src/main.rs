//! PC remote server entry point.
//!
//! Lets a trusted client on the local network drive this machine's keyboard,
//! mouse, and a small set of OS actions over a WebSocket connection secured
//! by a shared secret.
//!
//! # Usage
//!
//! ```text
//! remote-server [OPTIONS]
//!
//! Options:
//!   --config <PATH>             Config file path [default: config.toml]
//!   --port <PORT>               Listening port [default: 59874]
//!   --bind <ADDR>               Bind address [default: 0.0.0.0]
//!   --secret-key <KEY>          Shared secret (generated when unset)
//!   --auth-timeout-secs <SECS>  Handshake deadline [default: 10]
//! ```
//!
//! # Configuration precedence
//!
//! CLI argument (or its `REMOTE_*` environment variable) → config file →
//! built-in default.  When no secret is configured anywhere, a random one is
//! generated and printed on the startup banner.
//!
//! | Variable                    | Description                  |
//! |-----------------------------|------------------------------|
//! | `REMOTE_CONFIG`             | Config file path             |
//! | `REMOTE_PORT`               | Listening port               |
//! | `REMOTE_BIND`               | Bind address                 |
//! | `REMOTE_SECRET_KEY`         | Shared secret                |
//! | `REMOTE_AUTH_TIMEOUT_SECS`  | Handshake deadline (seconds) |

use std::net::IpAddr;
use std::path::PathBuf;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::time::Duration;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use remote_server::domain::config::{ServerConfig, DEFAULT_AUTH_TIMEOUT, DEFAULT_PORT};
use remote_server::infrastructure::action_sink::SystemActionSink;
use remote_server::infrastructure::local_ip::outbound_local_ip;
use remote_server::infrastructure::storage::{load_config, FileConfig};
use remote_server::infrastructure::RemoteServer;

// ── CLI argument definitions ──────────────────────────────────────────────────

/// PC remote server.
///
/// Accepts WebSocket connections from remote-control clients and performs
/// the requested keyboard, mouse, and OS actions on this machine.
#[derive(Debug, Parser)]
#[command(
    name = "remote-server",
    about = "WebSocket server for remote keyboard/mouse/OS control over the local network",
    version
)]
struct Cli {
    /// Path to the TOML config file.  A missing file is fine; defaults apply.
    #[arg(long, default_value = "config.toml", env = "REMOTE_CONFIG")]
    config: PathBuf,

    /// TCP port to listen on.
    #[arg(long, env = "REMOTE_PORT")]
    port: Option<u16>,

    /// IP address to bind.  `0.0.0.0` accepts connections from the whole LAN.
    #[arg(long, env = "REMOTE_BIND")]
    bind: Option<IpAddr>,

    /// The shared secret clients must present.  Generated randomly when not
    /// set here or in the config file.
    #[arg(long, env = "REMOTE_SECRET_KEY")]
    secret_key: Option<String>,

    /// Seconds an unauthenticated connection may wait before its handshake.
    #[arg(long, env = "REMOTE_AUTH_TIMEOUT_SECS")]
    auth_timeout_secs: Option<u64>,
}

/// Merges CLI arguments over the config file over built-in defaults.
///
/// Returns the resolved config and whether the secret had to be generated
/// (the banner calls that out so the operator knows to copy it).
fn resolve_config(cli: &Cli, file: &FileConfig) -> (ServerConfig, bool) {
    let secret = cli
        .secret_key
        .clone()
        .or_else(|| file.server.secret_key.clone())
        .filter(|s| !s.is_empty());
    let generated = secret.is_none();

    let config = ServerConfig {
        bind_addr: cli
            .bind
            .or(file.server.bind)
            .unwrap_or_else(|| "0.0.0.0".parse().expect("valid literal")),
        port: cli.port.or(file.server.port).unwrap_or(DEFAULT_PORT),
        secret_key: secret.unwrap_or_else(ServerConfig::generate_secret),
        auth_timeout: cli
            .auth_timeout_secs
            .or(file.server.auth_timeout_secs)
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_AUTH_TIMEOUT),
    };
    (config, generated)
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let file = load_config(&cli.config)?;
    let (config, generated_secret) = resolve_config(&cli, &file);

    // Operator-facing banner.  The displayed address is the outbound-facing
    // local IP, purely for convenience; the server binds `config.bind_addr`.
    let display_ip = outbound_local_ip();
    info!("──────────────────────────────────────────────");
    info!("PC remote server");
    info!("  listening on: ws://{display_ip}:{}", config.port);
    if generated_secret {
        info!("  secret key (generated): {}", config.secret_key);
    } else {
        info!("  secret key: {}", config.secret_key);
    }
    info!("──────────────────────────────────────────────");

    let server = RemoteServer::bind(config, Arc::new(SystemActionSink::new()?)).await?;

    // Graceful shutdown: Ctrl+C clears the flag the accept loop polls.
    let running = Arc::new(AtomicBool::new(true));
    let running_signal = Arc::clone(&running);
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("received Ctrl+C, shutting down");
                running_signal.store(false, Ordering::Relaxed);
            }
            Err(e) => {
                tracing::error!("failed to listen for Ctrl+C signal: {e}");
            }
        }
    });

    server.run(running).await?;

    info!("server stopped");
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn bare_cli() -> Cli {
        Cli {
            config: PathBuf::from("config.toml"),
            port: None,
            bind: None,
            secret_key: None,
            auth_timeout_secs: None,
        }
    }

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["remote-server"]);
        assert_eq!(cli.config, PathBuf::from("config.toml"));
        assert_eq!(cli.port, None);
        assert_eq!(cli.secret_key, None);
    }

    #[test]
    fn test_cli_overrides() {
        let cli = Cli::parse_from([
            "remote-server",
            "--port",
            "4242",
            "--bind",
            "127.0.0.1",
            "--secret-key",
            "hunter2",
            "--auth-timeout-secs",
            "3",
        ]);
        assert_eq!(cli.port, Some(4242));
        assert_eq!(cli.bind, Some("127.0.0.1".parse().unwrap()));
        assert_eq!(cli.secret_key.as_deref(), Some("hunter2"));
        assert_eq!(cli.auth_timeout_secs, Some(3));
    }

    #[test]
    fn test_resolve_config_all_defaults() {
        let (config, generated) = resolve_config(&bare_cli(), &FileConfig::default());
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.bind_addr.to_string(), "0.0.0.0");
        assert_eq!(config.auth_timeout, DEFAULT_AUTH_TIMEOUT);
        assert!(generated);
        assert_eq!(config.secret_key.len(), 32);
    }

    #[test]
    fn test_resolve_config_file_values_apply() {
        let file: FileConfig = toml::from_str(
            r#"
            [server]
            port = 1000
            secret_key = "from-file"
            "#,
        )
        .unwrap();

        let (config, generated) = resolve_config(&bare_cli(), &file);

        assert_eq!(config.port, 1000);
        assert_eq!(config.secret_key, "from-file");
        assert!(!generated);
    }

    #[test]
    fn test_resolve_config_cli_beats_file() {
        let file: FileConfig = toml::from_str(
            r#"
            [server]
            port = 1000
            secret_key = "from-file"
            "#,
        )
        .unwrap();
        let mut cli = bare_cli();
        cli.port = Some(2000);
        cli.secret_key = Some("from-cli".to_string());

        let (config, _) = resolve_config(&cli, &file);

        assert_eq!(config.port, 2000);
        assert_eq!(config.secret_key, "from-cli");
    }

    #[test]
    fn test_resolve_config_empty_secret_counts_as_unset() {
        let mut cli = bare_cli();
        cli.secret_key = Some(String::new());

        let (config, generated) = resolve_config(&cli, &FileConfig::default());

        assert!(generated);
        assert!(!config.secret_key.is_empty());
    }

    #[test]
    fn test_resolve_config_auth_timeout_from_file() {
        let file: FileConfig = toml::from_str("[server]\nauth_timeout_secs = 3\n").unwrap();
        let (config, _) = resolve_config(&bare_cli(), &file);
        assert_eq!(config.auth_timeout, Duration::from_secs(3));
    }
}
