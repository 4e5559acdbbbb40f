//! `BingoServer` builder and accept loop.
//!
//! Ties the layers together: transport → protocol → rooms.

use std::sync::Arc;
use std::time::Duration;

use bingo_protocol::{Codec, JsonCodec};
use bingo_room::{RoomConfig, RoomManager};
use bingo_transport::{Transport, TransportError, WebSocketTransport};
use tokio::sync::Mutex;

use crate::handler::handle_connection;
use crate::{BingoError, ServerConfig};

/// Pause before accepting again after a failed accept.
const ACCEPT_BACKOFF: Duration = Duration::from_millis(100);

/// Shared server state passed to each connection handler task.
///
/// Wrapped in `Arc` so it can be cheaply cloned across tasks. The room
/// table sits behind a `Mutex`; the rooms themselves are actors and
/// don't need one.
pub(crate) struct ServerState<C: Codec> {
    pub(crate) rooms: Mutex<RoomManager>,
    pub(crate) codec: C,
    pub(crate) idle_timeout: Option<Duration>,
    pub(crate) outbound_buffer: usize,
}

/// Builder for configuring and starting a bingo server.
///
/// # Example
///
/// ```rust,ignore
/// let server = BingoServerBuilder::from_config(ServerConfig::load_or_default())
///     .build()
///     .await?;
/// server.run().await
/// ```
pub struct BingoServerBuilder {
    config: ServerConfig,
}

impl BingoServerBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self::from_config(ServerConfig::default())
    }

    /// Creates a builder starting from an existing config.
    pub fn from_config(config: ServerConfig) -> Self {
        Self { config }
    }

    /// Sets the address to bind the server to.
    pub fn bind(mut self, addr: &str) -> Self {
        self.config.bind_addr = addr.to_string();
        self
    }

    /// Sets how long a silent connection is kept open. `None` disables it.
    pub fn idle_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.config.idle_timeout = timeout;
        self
    }

    /// Sets the configuration used for every room.
    pub fn room_config(mut self, config: RoomConfig) -> Self {
        self.config.room = config;
        self
    }

    /// Binds the listener and builds the server.
    ///
    /// Uses `JsonCodec` over `WebSocketTransport`.
    pub async fn build(self) -> Result<BingoServer<JsonCodec>, BingoError> {
        let transport = WebSocketTransport::bind(&self.config.bind_addr).await?;

        let state = Arc::new(ServerState {
            outbound_buffer: self.config.room.outbound_buffer,
            rooms: Mutex::new(RoomManager::with_config(self.config.room)),
            codec: JsonCodec,
            idle_timeout: self.config.idle_timeout,
        });

        Ok(BingoServer { transport, state })
    }
}

impl Default for BingoServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A bound bingo server.
///
/// Call [`run()`](Self::run) to start accepting connections.
pub struct BingoServer<C: Codec> {
    transport: WebSocketTransport,
    state: Arc<ServerState<C>>,
}

impl BingoServer<JsonCodec> {
    /// Creates a new builder.
    pub fn builder() -> BingoServerBuilder {
        BingoServerBuilder::new()
    }
}

impl<C: Codec> BingoServer<C> {
    /// Returns the local address the server is bound to.
    pub fn local_addr(&self) -> std::io::Result<std::net::SocketAddr> {
        self.transport.local_addr()
    }

    /// Runs the accept loop until the process is terminated.
    ///
    /// Each accepted connection gets its own task; a failing connection
    /// never takes the loop down. Returns only if the listener stops.
    pub async fn run(mut self) -> Result<(), BingoError> {
        tracing::info!(addr = ?self.local_addr().ok(), "bingo server running");

        loop {
            match self.transport.accept().await {
                Ok(conn) => {
                    let state = Arc::clone(&self.state);
                    tokio::spawn(async move {
                        if let Err(e) = handle_connection(conn, state).await {
                            tracing::debug!(
                                error = %e,
                                "connection ended with error"
                            );
                        }
                    });
                }
                Err(e) => {
                    tracing::error!(error = %e, "accept failed");
                    match retry_delay(&e) {
                        Some(delay) => tokio::time::sleep(delay).await,
                        None => return Err(e.into()),
                    }
                }
            }
        }
    }
}

/// How long to wait before accepting again after `error`, or `None` if
/// no more connections can arrive.
fn retry_delay(error: &TransportError) -> Option<Duration> {
    match error {
        TransportError::ListenerClosed => None,
        _ => Some(ACCEPT_BACKOFF),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accept_errors_back_off() {
        let err = TransportError::Accept(std::io::Error::other("EMFILE"));
        assert_eq!(retry_delay(&err), Some(ACCEPT_BACKOFF));
        assert!(ACCEPT_BACKOFF > Duration::ZERO);
    }

    #[test]
    fn test_closed_listener_stops_the_loop() {
        assert_eq!(retry_delay(&TransportError::ListenerClosed), None);
    }
}
