//! Server configuration types.
//!
//! [`ServerConfig`] is the single source of truth for all runtime settings.
//! It is populated at startup from the config file and CLI arguments (the
//! infrastructure layer's job) and then shared read-only across all session
//! tasks.  Keeping it a plain struct with no environment reads makes the
//! server easy to embed in integration tests.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use uuid::Uuid;

/// Default listening port.
pub const DEFAULT_PORT: u16 = 59874;

/// How long an unauthenticated connection may wait before sending its
/// handshake frame.
pub const DEFAULT_AUTH_TIMEOUT: Duration = Duration::from_secs(10);

/// All runtime configuration for the remote server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Interface to bind.  `0.0.0.0` accepts connections from the whole LAN.
    pub bind_addr: IpAddr,

    /// TCP port to listen on.  Port 0 asks the OS for an ephemeral port,
    /// which integration tests rely on.
    pub port: u16,

    /// The process-wide shared secret.  Compared by exact string equality
    /// against the client-supplied `key` during the handshake.  There is no
    /// rotation and no per-client identity; this is a single shared
    /// credential for a single trusted operator.
    pub secret_key: String,

    /// Handshake deadline for a freshly accepted connection.
    pub auth_timeout: Duration,
}

impl ServerConfig {
    /// The socket address the listener binds.
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_addr, self.port)
    }

    /// Generates a fresh random shared secret (32 lowercase hex characters).
    ///
    /// Used when no secret is configured; the operator reads the generated
    /// value off the startup banner and enters it in the client.
    pub fn generate_secret() -> String {
        Uuid::new_v4().simple().to_string()
    }
}

impl Default for ServerConfig {
    /// Defaults suitable for a first run with no config file: listen on all
    /// interfaces on the well-known port with a freshly generated secret.
    fn default() -> Self {
        Self {
            bind_addr: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
            secret_key: Self::generate_secret(),
            auth_timeout: DEFAULT_AUTH_TIMEOUT,
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
