//! WebSocket transport implementation using `tokio-tungstenite`.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{Mutex, mpsc};
use tokio::task::AbortHandle;
use tokio_tungstenite::tungstenite::Message;

use crate::{Connection, ConnectionId, Transport, TransportError};

/// How long a peer gets to finish the WebSocket upgrade after connecting.
pub const HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(10);

/// Pause after a failed TCP accept (e.g. out of file descriptors).
const ACCEPT_BACKOFF: Duration = Duration::from_millis(100);

/// Upgraded connections waiting for [`Transport::accept`].
const READY_QUEUE: usize = 64;

/// Counter for generating unique connection IDs.
static NEXT_CONNECTION_ID: AtomicU64 = AtomicU64::new(1);

type WsStream = tokio_tungstenite::WebSocketStream<TcpStream>;
type Ready = Result<WebSocketConnection, TransportError>;

/// A WebSocket-based [`Transport`] that listens for incoming connections.
///
/// A background task owns the TCP listener and runs every upgrade in its
/// own task, so a peer that connects and then stays silent only ever
/// holds up itself. Finished connections queue up for
/// [`accept`](Transport::accept). The task stops when the transport is
/// dropped.
pub struct WebSocketTransport {
    local_addr: SocketAddr,
    ready: mpsc::Receiver<Ready>,
    listener: AbortHandle,
}

impl WebSocketTransport {
    /// Binds a new WebSocket transport to the given address.
    pub async fn bind(addr: &str) -> Result<Self, TransportError> {
        Self::bind_with_handshake_timeout(addr, HANDSHAKE_TIMEOUT).await
    }

    /// Like [`bind`](Self::bind), dropping peers that haven't completed
    /// the upgrade within `handshake_timeout`.
    pub async fn bind_with_handshake_timeout(
        addr: &str,
        handshake_timeout: Duration,
    ) -> Result<Self, TransportError> {
        let bind_error = |source| TransportError::Bind {
            addr: addr.to_string(),
            source,
        };
        let listener = TcpListener::bind(addr).await.map_err(bind_error)?;
        let local_addr = listener.local_addr().map_err(bind_error)?;

        let (ready_tx, ready_rx) = mpsc::channel(READY_QUEUE);
        let task = tokio::spawn(listen(listener, ready_tx, handshake_timeout));
        tracing::info!(%local_addr, "WebSocket transport listening");

        Ok(Self {
            local_addr,
            ready: ready_rx,
            listener: task.abort_handle(),
        })
    }
}

impl Drop for WebSocketTransport {
    fn drop(&mut self) {
        self.listener.abort();
    }
}

impl Transport for WebSocketTransport {
    type Connection = WebSocketConnection;
    type Error = TransportError;

    async fn accept(&mut self) -> Result<Self::Connection, Self::Error> {
        self.ready
            .recv()
            .await
            .unwrap_or(Err(TransportError::ListenerClosed))
    }

    fn local_addr(&self) -> std::io::Result<SocketAddr> {
        Ok(self.local_addr)
    }
}

/// Accepts TCP connections forever, upgrading each in its own task.
async fn listen(
    listener: TcpListener,
    ready: mpsc::Sender<Ready>,
    handshake_timeout: Duration,
) {
    loop {
        match listener.accept().await {
            Ok((stream, addr)) => {
                tokio::spawn(upgrade(
                    stream,
                    addr,
                    ready.clone(),
                    handshake_timeout,
                ));
            }
            Err(e) => {
                if ready.send(Err(TransportError::Accept(e))).await.is_err() {
                    break;
                }
                tokio::time::sleep(ACCEPT_BACKOFF).await;
            }
        }
    }
}

async fn upgrade(
    stream: TcpStream,
    addr: SocketAddr,
    ready: mpsc::Sender<Ready>,
    handshake_timeout: Duration,
) {
    let handshake = tokio_tungstenite::accept_async(stream);
    let ws = match tokio::time::timeout(handshake_timeout, handshake).await {
        Ok(Ok(ws)) => ws,
        Ok(Err(e)) => {
            tracing::debug!(%addr, error = %e, "WebSocket handshake failed");
            return;
        }
        Err(_) => {
            tracing::debug!(%addr, "WebSocket handshake timed out");
            return;
        }
    };

    let id = ConnectionId::new(
        NEXT_CONNECTION_ID.fetch_add(1, Ordering::Relaxed),
    );
    tracing::debug!(%id, %addr, "accepted WebSocket connection");

    let (sink, stream) = ws.split();
    let conn = WebSocketConnection {
        id,
        sink: Mutex::new(sink),
        stream: Mutex::new(stream),
    };
    // Fails only once the transport is gone; the socket closes on drop.
    let _ = ready.send(Ok(conn)).await;
}

/// A single WebSocket connection.
///
/// The socket is split so that a task parked in [`recv`](Connection::recv)
/// never holds up a broadcast going out through [`send`](Connection::send).
pub struct WebSocketConnection {
    id: ConnectionId,
    sink: Mutex<SplitSink<WsStream, Message>>,
    stream: Mutex<SplitStream<WsStream>>,
}

impl Connection for WebSocketConnection {
    type Error = TransportError;

    /// Sends UTF-8 payloads as text frames (what browsers expect for JSON)
    /// and anything else as a binary frame.
    async fn send(&self, data: &[u8]) -> Result<(), Self::Error> {
        let msg = match std::str::from_utf8(data) {
            Ok(text) => Message::Text(text.to_owned().into()),
            Err(_) => Message::Binary(data.to_vec().into()),
        };
        self.sink
            .lock()
            .await
            .send(msg)
            .await
            .map_err(TransportError::Send)
    }

    async fn recv(&self) -> Result<Option<Vec<u8>>, Self::Error> {
        let mut stream = self.stream.lock().await;
        loop {
            match stream.next().await {
                Some(Ok(Message::Binary(data))) => {
                    return Ok(Some(data.into()));
                }
                Some(Ok(Message::Text(text))) => {
                    return Ok(Some(text.as_bytes().to_vec()));
                }
                Some(Ok(Message::Close(_))) | None => return Ok(None),
                Some(Ok(_)) => continue, // ping/pong/raw frame
                Some(Err(e)) => return Err(TransportError::Receive(e)),
            }
        }
    }

    async fn close(&self) -> Result<(), Self::Error> {
        self.sink
            .lock()
            .await
            .close()
            .await
            .map_err(TransportError::Send)
    }

    fn id(&self) -> ConnectionId {
        self.id
    }
}
