//! Domain layer: pure configuration types (no I/O).

pub mod config;

pub use config::{ServerConfig, DEFAULT_AUTH_TIMEOUT, DEFAULT_PORT};
