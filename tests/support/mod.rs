//! Mock WebSocket server for event stream tests.
//!
//! Accepts a single client connection, captures the upgrade request and
//! every inbound text frame, and pushes scripted events to the client.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use serde_json::Value;
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio::time::timeout;
use tokio_tungstenite::accept_hdr_async;
use tokio_tungstenite::tungstenite::handshake::server::{ErrorResponse, Request, Response};
use tokio_tungstenite::tungstenite::protocol::Message;

/// Upgrade request details captured during the handshake.
#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub uri: String,
    pub authorization: Option<String>,
}

pub struct MockStreamServer {
    addr: SocketAddr,
    push_tx: mpsc::UnboundedSender<String>,
    frames_rx: mpsc::UnboundedReceiver<String>,
    request: Arc<Mutex<Option<CapturedRequest>>>,
}

impl MockStreamServer {
    pub async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let (push_tx, mut push_rx) = mpsc::unbounded_channel::<String>();
        let (frames_tx, frames_rx) = mpsc::unbounded_channel::<String>();
        let request = Arc::new(Mutex::new(None));
        let request_slot = request.clone();

        tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();

            let capture = |req: &Request, response: Response| -> Result<Response, ErrorResponse> {
                *request_slot.lock().unwrap() = Some(CapturedRequest {
                    uri: req.uri().to_string(),
                    authorization: req
                        .headers()
                        .get("authorization")
                        .and_then(|v| v.to_str().ok())
                        .map(String::from),
                });
                Ok(response)
            };

            let ws_stream = accept_hdr_async(stream, capture).await.unwrap();
            let (mut write, mut read) = ws_stream.split();

            loop {
                tokio::select! {
                    message = read.next() => match message {
                        Some(Ok(Message::Text(text))) => {
                            let _ = frames_tx.send(text.to_string());
                        }
                        Some(Ok(Message::Close(_))) | None => break,
                        Some(Ok(_)) => {}
                        Some(Err(_)) => break,
                    },
                    pushed = push_rx.recv() => match pushed {
                        Some(text) => {
                            if write.send(Message::Text(text.into())).await.is_err() {
                                break;
                            }
                        }
                        // Test dropped the server handle; close the connection.
                        None => break,
                    },
                }
            }
        });

        Self {
            addr,
            push_tx,
            frames_rx,
            request,
        }
    }

    /// Base URL for the client under test; the client rewrites http to ws.
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Push a named event frame to the connected client.
    pub fn push_event(&self, event: &str, data: Value) {
        let frame = serde_json::json!({"event": event, "data": data}).to_string();
        self.push_tx.send(frame).unwrap();
    }

    /// Push a raw text frame to the connected client.
    pub fn push_raw(&self, frame: &str) {
        self.push_tx.send(frame.to_string()).unwrap();
    }

    /// Next frame received from the client, or `None` after 5 seconds.
    pub async fn next_frame(&mut self) -> Option<String> {
        timeout(Duration::from_secs(5), self.frames_rx.recv())
            .await
            .ok()
            .flatten()
    }

    /// Assert that the client sends nothing within the given window.
    pub async fn expect_no_frame(&mut self, window: Duration) {
        if let Ok(Some(frame)) = timeout(window, self.frames_rx.recv()).await {
            panic!("expected no frame from client, got: {frame}");
        }
    }

    /// The captured upgrade request, once the handshake has happened.
    pub fn captured_request(&self) -> Option<CapturedRequest> {
        self.request.lock().unwrap().clone()
    }
}
