//! Infrastructure layer: WebSocket server, config file loading, local address
//! discovery, and concrete `ActionSink` implementations.

pub mod action_sink;
pub mod local_ip;
pub mod storage;
pub mod ws_server;

pub use ws_server::RemoteServer;
