//! Real-time session event streaming.
//!
//! A [`SessionSocket`] is a persistent WebSocket subscription to one
//! session's lifecycle and transcript events. The connection handshake is
//! two-phase: the transport connects first, then a single `joinSession`
//! message binds the connection to the session. Event payloads are opaque
//! JSON owned by the service and are forwarded to the registered callbacks
//! unmodified.

pub mod client;
pub mod messages;

pub use client::{EventCallback, SessionCallbacks, SessionSocket, SocketState};
pub use messages::{JoinSessionMessage, SessionEventKind, StreamEnvelope};
