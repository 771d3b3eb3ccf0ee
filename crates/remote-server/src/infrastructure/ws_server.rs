//! WebSocket server: accept loop and per-session tasks.
//!
//! This module is responsible for:
//!
//! 1. Binding a TCP listener on the configured address.
//! 2. Accepting incoming connections and upgrading each to a WebSocket.
//! 3. Running the single-shot authentication handshake per connection.
//! 4. Running the authenticated message loop: decode each text frame as a
//!    [`Command`] and hand it to the dispatcher (or the macro runner).
//! 5. Shutting down gracefully when the shared `running` flag is cleared.
//!
//! Each connection runs in its own Tokio task, so one session awaiting a
//! macro `WAIT` never stalls another.  The accept loop itself never blocks:
//! it uses a short timeout on `accept()` so the shutdown flag is polled even
//! when nobody is connecting.
//!
//! Sessions share nothing but the read-only config and the process-wide
//! action sink; a failed authentication on one connection cannot affect
//! another.

use std::net::SocketAddr;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::time::Duration;

use anyhow::Context;
use futures_util::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::time::timeout;
use tokio_tungstenite::{accept_async, tungstenite::Message as WsMessage, WebSocketStream};
use tracing::{debug, error, info, warn};

use remote_core::protocol::{Command, CommandKind, ServerMessage};

use crate::application::action_sink::ActionSink;
use crate::application::dispatcher::Dispatcher;
use crate::application::macro_runner::run_macro;
use crate::application::session::{
    evaluate_handshake, HandshakeOutcome, Session, SessionError, REASON_NO_KEY,
};
use crate::domain::config::ServerConfig;

/// State shared by every session task.
struct SessionContext {
    config: ServerConfig,
    dispatcher: Dispatcher,
}

/// The bound server, ready to accept connections.
///
/// Binding is split from running so that callers (integration tests in
/// particular) can bind port 0 and read back the OS-assigned port before the
/// accept loop starts.
pub struct RemoteServer {
    listener: TcpListener,
    local_addr: SocketAddr,
    context: Arc<SessionContext>,
}

impl RemoteServer {
    /// Binds the listener and prepares the shared session context.
    ///
    /// # Errors
    ///
    /// Returns an error if the TCP listener cannot be bound (port in use,
    /// missing permission).  This is fatal at startup.
    pub async fn bind(config: ServerConfig, sink: Arc<dyn ActionSink>) -> anyhow::Result<Self> {
        let bind_addr = config.socket_addr();
        let listener = TcpListener::bind(bind_addr)
            .await
            .with_context(|| format!("failed to bind listener on {bind_addr}"))?;
        let local_addr = listener
            .local_addr()
            .context("failed to read back the bound address")?;

        Ok(Self {
            listener,
            local_addr,
            context: Arc::new(SessionContext {
                config,
                dispatcher: Dispatcher::new(sink),
            }),
        })
    }

    /// The address actually bound (resolves port 0 to the assigned port).
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Runs the accept loop until `running` is cleared.
    ///
    /// Each accepted connection is handed to its own Tokio task immediately,
    /// so a slow client never delays the next `accept`.
    pub async fn run(self, running: Arc<AtomicBool>) -> anyhow::Result<()> {
        info!("listening on {}", self.local_addr);

        loop {
            if !running.load(Ordering::Relaxed) {
                info!("shutdown flag set; stopping accept loop");
                break;
            }

            // Short timeout so the loop can poll the shutdown flag even when
            // no clients are connecting.
            let accepted = timeout(Duration::from_millis(200), self.listener.accept()).await;

            match accepted {
                Ok(Ok((stream, peer_addr))) => {
                    info!("connection attempt from {peer_addr}");
                    let context = Arc::clone(&self.context);
                    tokio::spawn(async move {
                        handle_connection(stream, peer_addr, context).await;
                    });
                }
                Ok(Err(e)) => {
                    // Transient accept error; keep serving.
                    error!("accept error: {e}");
                }
                Err(_) => {
                    // Timeout; loop back to check the shutdown flag.
                }
            }
        }

        Ok(())
    }
}

// ── Per-session handling ──────────────────────────────────────────────────────

/// Entry point of each per-connection task.  Wraps [`run_session`] and logs
/// the outcome, so `?` can be used freely inside.
async fn handle_connection(stream: TcpStream, peer_addr: SocketAddr, context: Arc<SessionContext>) {
    match run_session(stream, peer_addr, context).await {
        Ok(()) => info!("session {peer_addr} closed"),
        Err(e) => warn!("session {peer_addr} closed with error: {e:#}"),
    }
}

/// Full lifecycle of one connection: WebSocket upgrade, handshake, command
/// loop, close.
async fn run_session(
    stream: TcpStream,
    peer_addr: SocketAddr,
    context: Arc<SessionContext>,
) -> anyhow::Result<()> {
    let mut ws = accept_async(stream)
        .await
        .with_context(|| format!("WebSocket handshake failed with {peer_addr}"))?;

    let mut session = Session::new(peer_addr);
    debug!(session_id = %session.id, "session created for {peer_addr}");

    match authenticate(&mut ws, &mut session, &context).await {
        Ok(()) => {
            info!(session_id = %session.id, "client {peer_addr} authenticated");
        }
        Err(e) => {
            warn!(session_id = %session.id, "authentication with {peer_addr} failed: {e}");
            session.close();
            let _ = ws.close(None).await;
            return Ok(());
        }
    }

    command_loop(&mut ws, &mut session, &context).await;

    session.close();
    let _ = ws.close(None).await;
    Ok(())
}

/// Performs the single-shot shared-secret handshake.
///
/// Waits for exactly one frame, bounded by the configured timeout.  On a
/// match the `handshake_success` reply is sent and the session is marked
/// authenticated.  The two defined denial reasons are answered with
/// `auth_failed`; a timeout or an undecodable frame closes the connection
/// with no response at all.
async fn authenticate(
    ws: &mut WebSocketStream<TcpStream>,
    session: &mut Session,
    context: &SessionContext,
) -> Result<(), SessionError> {
    let first = timeout(context.config.auth_timeout, ws.next()).await;

    let frame = match first {
        Err(_) => return Err(SessionError::AuthTimeout),
        Ok(None) => return Err(SessionError::Transport("closed before handshake".into())),
        Ok(Some(Err(e))) => return Err(SessionError::Transport(e.to_string())),
        Ok(Some(Ok(frame))) => frame,
    };

    let text = match frame {
        WsMessage::Text(text) => text,
        _ => return Err(SessionError::MalformedHandshake),
    };

    match evaluate_handshake(&text, &context.config.secret_key) {
        HandshakeOutcome::Granted => {
            send_message(ws, &ServerMessage::HandshakeSuccess)
                .await
                .map_err(|e| SessionError::Transport(e.to_string()))?;
            session.authenticate();
            Ok(())
        }
        HandshakeOutcome::Denied { reason } => {
            // Best effort; the connection is closing either way.
            let _ = send_message(
                ws,
                &ServerMessage::AuthFailed {
                    reason: reason.to_string(),
                },
            )
            .await;
            Err(if reason == REASON_NO_KEY {
                SessionError::NoKey
            } else {
                SessionError::InvalidKey
            })
        }
        HandshakeOutcome::Malformed => Err(SessionError::MalformedHandshake),
    }
}

/// The authenticated message loop.
///
/// Runs until the client disconnects or the transport fails.  Nothing inside
/// the loop ever terminates the connection: decode failures, unknown command
/// types, and handler errors are all logged and skipped.
async fn command_loop(
    ws: &mut WebSocketStream<TcpStream>,
    session: &mut Session,
    context: &SessionContext,
) {
    let peer = session.peer;

    while let Some(frame) = ws.next().await {
        let msg = match frame {
            Ok(msg) => msg,
            Err(e) => {
                debug!("transport error with {peer}: {e}");
                break;
            }
        };

        match msg {
            WsMessage::Text(text) => {
                let command: Command = match serde_json::from_str(&text) {
                    Ok(command) => command,
                    Err(e) => {
                        error!("invalid JSON from {peer}: {e}");
                        continue;
                    }
                };

                match CommandKind::from_tag(&command.kind) {
                    None => {
                        warn!(kind = %command.kind, "unknown command type from {peer}");
                    }
                    Some(CommandKind::Macro) => {
                        // Suspends this loop until the macro (and its WAIT
                        // delays) finishes; errors are contained inside.
                        run_macro(&context.dispatcher, &command.data).await;
                    }
                    Some(kind) => {
                        if let Err(e) = context.dispatcher.dispatch(kind, &command.data) {
                            error!("command '{}' from {peer} failed: {e}", command.kind);
                        }
                    }
                }
            }
            WsMessage::Binary(_) => {
                warn!("unexpected binary frame from {peer} (ignored)");
            }
            WsMessage::Ping(_) | WsMessage::Pong(_) => {
                // Protocol-level keepalive; tungstenite answers pings itself.
            }
            WsMessage::Close(_) => {
                debug!("close frame from {peer}");
                break;
            }
            WsMessage::Frame(_) => {
                debug!("raw frame from {peer} (ignored)");
            }
        }
    }
}

/// Serializes and sends one server message as a text frame.
async fn send_message(
    ws: &mut WebSocketStream<TcpStream>,
    message: &ServerMessage,
) -> anyhow::Result<()> {
    let json = serde_json::to_string(message).context("serializing server message")?;
    ws.send(WsMessage::Text(json))
        .await
        .context("sending server message")?;
    Ok(())
}
