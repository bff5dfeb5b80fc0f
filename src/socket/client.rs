//! WebSocket client for the session event stream.
//!
//! # Architecture
//!
//! ```text
//! connect_socket()
//!      │  1. WebSocket handshake (bearer header + sessionId query)
//!      │  2. joinSession frame, sent only once the transport is connected
//!      ▼
//! ┌─────────────────┐   (kind, payload)   ┌─────────────────┐
//! │ Connection Task │────────mpsc────────▶│  Dispatch Task  │──▶ Callbacks
//! └─────────────────┘                     └─────────────────┘
//! ```
//!
//! The connection task owns the socket and runs a `select!` loop over
//! inbound frames and a shutdown signal. Recognized events are forwarded to
//! the dispatch task, which looks the handler up in the callback table and
//! invokes it; events are delivered in arrival order. A panic inside a
//! caller-supplied callback is caught per invocation and never ends the
//! loop. There is no reconnection: once the connection closes, for any
//! reason, the socket is terminally [`SocketState::Closed`].

use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::pin::Pin;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use futures::{FutureExt, SinkExt, StreamExt};
use serde_json::Value;
use tokio::sync::{mpsc, oneshot};
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::handshake::client::generate_key;
use tokio_tungstenite::{connect_async, tungstenite::protocol::Message};
use tracing::{debug, error, info, warn};
use url::Url;

use crate::config::ChatterBoxConfig;
use crate::error::{ClientError, ClientResult};
use crate::socket::messages::{JoinSessionMessage, SessionEventKind, StreamEnvelope};

/// Buffered events between the connection task and the dispatch task.
const EVENT_CHANNEL_CAPACITY: usize = 256;

/// How long `close()` waits for the background tasks to finish.
const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

// =============================================================================
// Callbacks
// =============================================================================

/// Async callback invoked with an event payload.
pub type EventCallback =
    Arc<dyn Fn(Value) -> Pin<Box<dyn Future<Output = ()> + Send>> + Send + Sync>;

/// Callback table for the session event stream.
///
/// Each slot is optional; an event with no registered handler is logged and
/// dropped without affecting the other slots or the connection.
///
/// ```rust
/// use chatterbox_bot::SessionCallbacks;
///
/// let callbacks = SessionCallbacks::new()
///     .on_transcript_received(|data| async move {
///         println!("transcript: {data}");
///     });
/// ```
#[derive(Clone, Default)]
pub struct SessionCallbacks {
    on_meeting_started: Option<EventCallback>,
    on_meeting_finished: Option<EventCallback>,
    on_transcript_received: Option<EventCallback>,
}

impl SessionCallbacks {
    /// Create an empty callback table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Invoked when the meeting starts.
    pub fn on_meeting_started<F, Fut>(mut self, callback: F) -> Self
    where
        F: Fn(Value) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.on_meeting_started = Some(Arc::new(move |data| Box::pin(callback(data))));
        self
    }

    /// Invoked when the meeting finishes.
    pub fn on_meeting_finished<F, Fut>(mut self, callback: F) -> Self
    where
        F: Fn(Value) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.on_meeting_finished = Some(Arc::new(move |data| Box::pin(callback(data))));
        self
    }

    /// Invoked for every transcript segment.
    pub fn on_transcript_received<F, Fut>(mut self, callback: F) -> Self
    where
        F: Fn(Value) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.on_transcript_received = Some(Arc::new(move |data| Box::pin(callback(data))));
        self
    }

    /// Look up the handler for an event kind.
    fn handler(&self, kind: SessionEventKind) -> Option<&EventCallback> {
        match kind {
            SessionEventKind::Started => self.on_meeting_started.as_ref(),
            SessionEventKind::Finished => self.on_meeting_finished.as_ref(),
            SessionEventKind::Transcript => self.on_transcript_received.as_ref(),
        }
    }
}

impl std::fmt::Debug for SessionCallbacks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionCallbacks")
            .field("on_meeting_started", &self.on_meeting_started.is_some())
            .field("on_meeting_finished", &self.on_meeting_finished.is_some())
            .field(
                "on_transcript_received",
                &self.on_transcript_received.is_some(),
            )
            .finish()
    }
}

// =============================================================================
// Connection State
// =============================================================================

/// Connection state of a [`SessionSocket`].
///
/// `Closed` is terminal and reachable from every other state; there is no
/// transition back to `Connecting`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SocketState {
    /// No connection attempt has been made.
    #[default]
    Disconnected,
    /// The transport handshake is in progress.
    Connecting,
    /// The transport is connected and the session is joined.
    Connected,
    /// The connection has ended (transport error, remote close, or
    /// explicit close).
    Closed,
}

fn load_state(state: &Mutex<SocketState>) -> SocketState {
    *state.lock().unwrap_or_else(PoisonError::into_inner)
}

fn store_state(state: &Mutex<SocketState>, next: SocketState) {
    let mut guard = state.lock().unwrap_or_else(PoisonError::into_inner);
    // Closed is terminal.
    if *guard != SocketState::Closed {
        *guard = next;
    }
}

// =============================================================================
// SessionSocket
// =============================================================================

/// Live event stream connection for one session.
///
/// Owned by the caller: the client does not close, retry, or reconnect it.
/// Dropping the handle signals the connection to shut down;
/// [`close`](SessionSocket::close) does the same but waits for the
/// background tasks to finish.
#[derive(Debug)]
pub struct SessionSocket {
    session_id: String,
    state: Arc<Mutex<SocketState>>,
    shutdown_tx: Option<oneshot::Sender<()>>,
    connection_handle: Option<tokio::task::JoinHandle<()>>,
    dispatch_handle: Option<tokio::task::JoinHandle<()>>,
}

impl SessionSocket {
    /// Connect the event stream for `session_id` and bind the session.
    ///
    /// The `joinSession` frame is sent only after the WebSocket handshake
    /// has completed, and exactly once.
    pub(crate) async fn connect(
        config: &ChatterBoxConfig,
        session_id: &str,
        callbacks: SessionCallbacks,
    ) -> ClientResult<Self> {
        if session_id.trim().is_empty() {
            return Err(ClientError::Validation(
                "session id is required".to_string(),
            ));
        }

        let url = build_stream_url(
            &config.stream_base_url,
            session_id,
            &config.authorization_token,
        )?;
        let host = host_header(&url)?;

        let state = Arc::new(Mutex::new(SocketState::Connecting));
        debug!(%session_id, url = %url, "connecting session event stream");

        let request = tokio_tungstenite::tungstenite::http::Request::builder()
            .method("GET")
            .uri(url.as_str())
            .header("Host", host)
            .header("Upgrade", "websocket")
            .header("Connection", "upgrade")
            .header("Sec-WebSocket-Key", generate_key())
            .header("Sec-WebSocket-Version", "13")
            .header(
                "Authorization",
                format!("Bearer {}", config.authorization_token),
            )
            .body(())
            .map_err(|e| {
                ClientError::Unexpected(format!("failed to build stream request: {e}"))
            })?;

        let (ws_stream, _response) = match connect_async(request).await {
            Ok(connected) => connected,
            Err(e) => {
                store_state(&state, SocketState::Closed);
                return Err(ClientError::Network(format!(
                    "failed to connect to event stream: {e}"
                )));
            }
        };

        // Transport-level connect acknowledged; bind the session before any
        // event handling starts.
        store_state(&state, SocketState::Connected);
        let (mut ws_sink, mut ws_read) = ws_stream.split();

        let join_text = JoinSessionMessage::new(session_id)
            .to_text()
            .map_err(|e| ClientError::Unexpected(format!("failed to encode join message: {e}")))?;
        if let Err(e) = ws_sink.send(Message::Text(join_text.into())).await {
            store_state(&state, SocketState::Closed);
            return Err(ClientError::Network(format!(
                "failed to join session stream: {e}"
            )));
        }
        info!(%session_id, "joined session event stream");

        let (event_tx, mut event_rx) =
            mpsc::channel::<(SessionEventKind, Value)>(EVENT_CHANNEL_CAPACITY);
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel::<()>();

        let task_state = state.clone();
        let connection_handle = tokio::spawn(async move {
            loop {
                tokio::select! {
                    message = ws_read.next() => {
                        match message {
                            Some(Ok(Message::Text(text))) => {
                                match StreamEnvelope::parse(&text) {
                                    Ok(envelope) => match envelope.kind() {
                                        Some(kind) => {
                                            if event_tx.send((kind, envelope.data)).await.is_err() {
                                                warn!("event dispatch channel closed");
                                                break;
                                            }
                                        }
                                        None => {
                                            debug!(event = %envelope.event, "ignoring unknown stream event");
                                        }
                                    },
                                    Err(e) => {
                                        warn!("failed to parse stream message: {e}");
                                    }
                                }
                            }
                            Some(Ok(Message::Ping(payload))) => {
                                if let Err(e) = ws_sink.send(Message::Pong(payload)).await {
                                    warn!("failed to answer ping: {e}");
                                }
                            }
                            Some(Ok(Message::Close(frame))) => {
                                info!("event stream closed by server: {frame:?}");
                                break;
                            }
                            Some(Ok(_)) => {
                                debug!("ignoring non-text stream frame");
                            }
                            Some(Err(e)) => {
                                error!("event stream transport error: {e}");
                                break;
                            }
                            None => {
                                info!("event stream ended");
                                break;
                            }
                        }
                    }
                    _ = &mut shutdown_rx => {
                        let _ = ws_sink.send(Message::Close(None)).await;
                        break;
                    }
                }
            }
            store_state(&task_state, SocketState::Closed);
        });

        let dispatch_handle = tokio::spawn(async move {
            while let Some((kind, payload)) = event_rx.recv().await {
                match callbacks.handler(kind) {
                    Some(callback) => {
                        let invocation = AssertUnwindSafe(callback(payload)).catch_unwind();
                        if invocation.await.is_err() {
                            error!(event = %kind, "session event callback panicked");
                        }
                    }
                    None => {
                        debug!(event = %kind, "session event received with no callback registered");
                    }
                }
            }
        });

        Ok(Self {
            session_id: session_id.to_string(),
            state,
            shutdown_tx: Some(shutdown_tx),
            connection_handle: Some(connection_handle),
            dispatch_handle: Some(dispatch_handle),
        })
    }

    /// The session this stream is bound to.
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Current connection state.
    pub fn state(&self) -> SocketState {
        load_state(&self.state)
    }

    /// True while the transport is connected and the session is joined.
    pub fn is_connected(&self) -> bool {
        self.state() == SocketState::Connected
    }

    /// Close the connection and wait for the background tasks to finish.
    pub async fn close(&mut self) {
        if let Some(shutdown_tx) = self.shutdown_tx.take() {
            let _ = shutdown_tx.send(());
        }

        if let Some(handle) = self.connection_handle.take() {
            let _ = timeout(SHUTDOWN_TIMEOUT, handle).await;
        }

        if let Some(handle) = self.dispatch_handle.take() {
            let _ = timeout(SHUTDOWN_TIMEOUT, handle).await;
        }

        store_state(&self.state, SocketState::Closed);
        info!(session_id = %self.session_id, "session event stream closed");
    }
}

impl Drop for SessionSocket {
    fn drop(&mut self) {
        if let Some(shutdown_tx) = self.shutdown_tx.take() {
            let _ = shutdown_tx.send(());
        }
    }
}

// =============================================================================
// URL Handling
// =============================================================================

/// Build the stream URL: ws(s) scheme, sessionId and token query parameters.
///
/// The token also travels in the Authorization header; it is duplicated in
/// the query string for remotes that check one but not the other.
fn build_stream_url(stream_base_url: &str, session_id: &str, token: &str) -> ClientResult<Url> {
    let mut url = Url::parse(stream_base_url)
        .map_err(|e| ClientError::Config(format!("invalid stream base URL: {e}")))?;

    let scheme = match url.scheme() {
        "http" => "ws",
        "https" => "wss",
        "ws" | "wss" => url.scheme(),
        other => {
            return Err(ClientError::Config(format!(
                "unsupported stream URL scheme: {other}"
            )));
        }
    };
    let scheme = scheme.to_string();
    url.set_scheme(&scheme)
        .map_err(|_| ClientError::Config("invalid stream base URL".to_string()))?;

    url.query_pairs_mut()
        .append_pair("sessionId", session_id)
        .append_pair("token", token);

    Ok(url)
}

/// Host header value for the upgrade request, including any non-default port.
fn host_header(url: &Url) -> ClientResult<String> {
    let host = url
        .host_str()
        .ok_or_else(|| ClientError::Config("stream URL is missing a host".to_string()))?;
    Ok(match url.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    })
}
