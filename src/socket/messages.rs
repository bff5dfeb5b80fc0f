//! Wire messages for the session event stream.
//!
//! Frames are JSON text messages in a named-event envelope:
//!
//! - **Outgoing**: [`JoinSessionMessage`]: binds the connection to a
//!   session, sent exactly once after the transport connects
//! - **Incoming**: [`StreamEnvelope`]: `{"event": <name>, "data": <payload>}`
//!   where the payload shape is owned by the service and forwarded verbatim
//!
//! Recognized inbound event names are `started`, `finished`, and
//! `transcript`; anything else is ignored for forward compatibility.

use serde::{Deserialize, Serialize};
use serde_json::Value;

// =============================================================================
// Event Kinds
// =============================================================================

/// The closed set of inbound events delivered to callbacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionEventKind {
    /// The bot has joined and the meeting is underway.
    Started,
    /// The meeting (or the bot's participation in it) has ended.
    Finished,
    /// A transcript segment was produced.
    Transcript,
}

impl SessionEventKind {
    /// Map a wire event name to its kind, if recognized.
    pub fn from_event_name(name: &str) -> Option<Self> {
        match name {
            "started" => Some(Self::Started),
            "finished" => Some(Self::Finished),
            "transcript" => Some(Self::Transcript),
            _ => None,
        }
    }

    /// The wire event name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Started => "started",
            Self::Finished => "finished",
            Self::Transcript => "transcript",
        }
    }
}

impl std::fmt::Display for SessionEventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// =============================================================================
// Incoming Messages (Server to Client)
// =============================================================================

/// Envelope for frames pushed by the service.
#[derive(Debug, Clone, Deserialize)]
pub struct StreamEnvelope {
    /// Wire event name.
    pub event: String,
    /// Opaque event payload, forwarded to callbacks unmodified.
    #[serde(default)]
    pub data: Value,
}

impl StreamEnvelope {
    /// Parse a JSON text frame into an envelope.
    pub fn parse(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// The kind of this event, if it is one the client recognizes.
    pub fn kind(&self) -> Option<SessionEventKind> {
        SessionEventKind::from_event_name(&self.event)
    }
}

// =============================================================================
// Outgoing Messages (Client to Server)
// =============================================================================

/// Session-binding payload carried by [`JoinSessionMessage`].
#[derive(Debug, Clone, Serialize)]
pub struct JoinSessionPayload {
    #[serde(rename = "sessionId")]
    pub session_id: String,
}

/// Message binding the connection to a session.
///
/// Sent exactly once per connection, immediately after the transport
/// reports itself connected.
#[derive(Debug, Clone, Serialize)]
pub struct JoinSessionMessage {
    /// Wire event name (always "joinSession").
    pub event: &'static str,
    pub data: JoinSessionPayload,
}

impl JoinSessionMessage {
    /// Create a join message for the given session.
    pub fn new(session_id: impl Into<String>) -> Self {
        Self {
            event: "joinSession",
            data: JoinSessionPayload {
                session_id: session_id.into(),
            },
        }
    }

    /// Serialize to the text frame sent on the wire.
    pub fn to_text(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_event_name_mapping() {
        assert_eq!(
            SessionEventKind::from_event_name("started"),
            Some(SessionEventKind::Started)
        );
        assert_eq!(
            SessionEventKind::from_event_name("finished"),
            Some(SessionEventKind::Finished)
        );
        assert_eq!(
            SessionEventKind::from_event_name("transcript"),
            Some(SessionEventKind::Transcript)
        );
        assert_eq!(SessionEventKind::from_event_name("unknown"), None);
    }

    #[test]
    fn test_envelope_parse_keeps_payload_verbatim() {
        let envelope = StreamEnvelope::parse(
            r#"{"event": "transcript", "data": {"text": "hello", "speaker": 2}}"#,
        )
        .unwrap();

        assert_eq!(envelope.kind(), Some(SessionEventKind::Transcript));
        assert_eq!(envelope.data, json!({"text": "hello", "speaker": 2}));
    }

    #[test]
    fn test_envelope_parse_tolerates_missing_data() {
        let envelope = StreamEnvelope::parse(r#"{"event": "finished"}"#).unwrap();
        assert_eq!(envelope.kind(), Some(SessionEventKind::Finished));
        assert!(envelope.data.is_null());
    }

    #[test]
    fn test_envelope_unknown_event_has_no_kind() {
        let envelope = StreamEnvelope::parse(r#"{"event": "ping", "data": {}}"#).unwrap();
        assert!(envelope.kind().is_none());
    }

    #[test]
    fn test_join_message_wire_format() {
        let message = JoinSessionMessage::new("sess_42");
        let value: Value = serde_json::from_str(&message.to_text().unwrap()).unwrap();

        assert_eq!(
            value,
            json!({"event": "joinSession", "data": {"sessionId": "sess_42"}})
        );
    }
}
