//! Client configuration and per-dispatch options.
//!
//! `ChatterBoxConfig` is immutable once handed to the client; endpoint
//! defaults are applied by the constructor and never read from process-wide
//! state. `SendBotOptions` carries the per-call dispatch parameters, with
//! optional fields left as `Option` so that "not provided" and "provided but
//! empty" stay distinguishable all the way to the wire.

use crate::error::{ClientError, ClientResult};

// =============================================================================
// Constants
// =============================================================================

/// Default REST API endpoint for bot dispatch and token issuance.
pub const DEFAULT_API_BASE_URL: &str = "https://bot.chatter-box.io";

/// Default endpoint for the session event stream.
pub const DEFAULT_STREAM_BASE_URL: &str = "https://ws.chatter-box.io";

/// Bot display name used when none is provided.
pub const DEFAULT_BOT_NAME: &str = "ChatterBox";

/// Transcription model used when none is provided.
pub const DEFAULT_MODEL: &str = "nova-3";

/// Transcription language used when none is provided.
pub const DEFAULT_LANGUAGE: &str = "multi";

/// Temporary token lifetime when none is requested (1 hour).
pub const DEFAULT_TOKEN_EXPIRY_SECS: u64 = 3600;

/// Minimum accepted temporary token lifetime (1 minute).
pub const MIN_TOKEN_EXPIRY_SECS: u64 = 60;

/// Maximum accepted temporary token lifetime (24 hours).
pub const MAX_TOKEN_EXPIRY_SECS: u64 = 86400;

// =============================================================================
// Client Configuration
// =============================================================================

/// Configuration for a [`ChatterBox`](crate::ChatterBox) client.
#[derive(Debug, Clone)]
pub struct ChatterBoxConfig {
    /// Long-lived authorization token, sent as a bearer credential on every
    /// request. Must be non-empty.
    pub authorization_token: String,

    /// Base URL of the REST API.
    pub api_base_url: String,

    /// Base URL of the event stream endpoint. Accepts http(s) or ws(s)
    /// schemes; http(s) is rewritten to ws(s) at connect time.
    pub stream_base_url: String,
}

impl ChatterBoxConfig {
    /// Create a configuration with the default endpoints.
    pub fn new(authorization_token: impl Into<String>) -> Self {
        Self {
            authorization_token: authorization_token.into(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            stream_base_url: DEFAULT_STREAM_BASE_URL.to_string(),
        }
    }

    /// Override the REST API base URL.
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    /// Override the event stream base URL.
    pub fn with_stream_base_url(mut self, url: impl Into<String>) -> Self {
        self.stream_base_url = url.into();
        self
    }

    /// Validate construction-time invariants.
    pub(crate) fn validate(&self) -> ClientResult<()> {
        if self.authorization_token.trim().is_empty() {
            return Err(ClientError::Config(
                "authorization token is required".to_string(),
            ));
        }
        Ok(())
    }
}

// =============================================================================
// Meeting Identifier
// =============================================================================

/// A meeting identifier, accepted as either a string or a number and
/// coerced to its string form on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MeetingId {
    /// Identifier given as text (e.g. a Google Meet code).
    Text(String),
    /// Identifier given as a number (e.g. a Zoom meeting id).
    Numeric(i64),
}

impl MeetingId {
    /// The string form sent on the wire.
    pub fn as_string(&self) -> String {
        match self {
            Self::Text(s) => s.clone(),
            Self::Numeric(n) => n.to_string(),
        }
    }

    /// True when the coerced form contains no usable characters.
    pub(crate) fn is_blank(&self) -> bool {
        match self {
            Self::Text(s) => s.trim().is_empty(),
            Self::Numeric(_) => false,
        }
    }
}

impl Default for MeetingId {
    fn default() -> Self {
        Self::Text(String::new())
    }
}

impl std::fmt::Display for MeetingId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_string())
    }
}

impl From<&str> for MeetingId {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for MeetingId {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for MeetingId {
    fn from(value: i64) -> Self {
        Self::Numeric(value)
    }
}

impl From<i32> for MeetingId {
    fn from(value: i32) -> Self {
        Self::Numeric(value.into())
    }
}

impl From<u32> for MeetingId {
    fn from(value: u32) -> Self {
        Self::Numeric(value.into())
    }
}

// =============================================================================
// Dispatch Options
// =============================================================================

/// Options for dispatching a bot into a meeting.
///
/// Only `platform` and `meeting_id` are required; remaining fields fall back
/// to service defaults when `None`. The two timeout fields are serialized
/// only when explicitly provided.
///
/// ```rust
/// use chatterbox_bot::SendBotOptions;
///
/// let options = SendBotOptions {
///     webhook_url: Some("https://example.com/hooks/meeting".to_string()),
///     ..SendBotOptions::new("zoom", 123456789)
/// };
/// ```
#[derive(Debug, Clone, Default)]
pub struct SendBotOptions {
    /// Meeting platform (e.g. "zoom", "google-meet", "teams").
    pub platform: String,

    /// Meeting identifier; numbers are coerced to strings on the wire.
    pub meeting_id: MeetingId,

    /// Meeting password, sent as an empty string when absent.
    pub meeting_password: Option<String>,

    /// Bot display name, defaults to [`DEFAULT_BOT_NAME`].
    pub bot_name: Option<String>,

    /// Webhook URL for out-of-band session notifications.
    pub webhook_url: Option<String>,

    /// Transcription model, defaults to [`DEFAULT_MODEL`].
    pub model: Option<String>,

    /// Transcription language, defaults to [`DEFAULT_LANGUAGE`].
    pub language: Option<String>,

    /// Tear the session down after this many seconds without a transcript.
    /// Omitted from the request entirely when not provided.
    pub no_transcript_timeout_seconds: Option<u32>,

    /// Tear the session down after this many seconds alone in the meeting.
    /// Omitted from the request entirely when not provided.
    pub no_participants_left_timeout_seconds: Option<u32>,
}

impl SendBotOptions {
    /// Create options with the required fields; everything else defaults.
    pub fn new(platform: impl Into<String>, meeting_id: impl Into<MeetingId>) -> Self {
        Self {
            platform: platform.into(),
            meeting_id: meeting_id.into(),
            ..Self::default()
        }
    }

    /// Validate call-time invariants. Runs before any request is built.
    pub(crate) fn validate(&self) -> ClientResult<()> {
        if self.platform.trim().is_empty() {
            return Err(ClientError::Validation(
                "platform and meeting id are required".to_string(),
            ));
        }
        if self.meeting_id.is_blank() {
            return Err(ClientError::Validation(
                "platform and meeting id are required".to_string(),
            ));
        }
        if self.no_transcript_timeout_seconds == Some(0) {
            return Err(ClientError::Validation(
                "no_transcript_timeout_seconds must be greater than zero".to_string(),
            ));
        }
        if self.no_participants_left_timeout_seconds == Some(0) {
            return Err(ClientError::Validation(
                "no_participants_left_timeout_seconds must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
