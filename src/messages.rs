//! REST request and response payloads.
//!
//! Wire types for the two REST operations:
//!
//! - **Outgoing**: [`JoinRequest`] (`POST /join`), [`TokenRequest`]
//!   (`POST /token`)
//! - **Incoming**: [`JoinResponse`], [`TokenResponse`], and
//!   [`ServiceErrorBody`] for structured error responses
//!
//! Field names are camelCase on the wire. Optional timeout fields are
//! omitted entirely when not provided, so the service can distinguish
//! "absent" from "set".

use serde::{Deserialize, Serialize};

use crate::config::{DEFAULT_BOT_NAME, DEFAULT_LANGUAGE, DEFAULT_MODEL, SendBotOptions};

// =============================================================================
// Outgoing Payloads
// =============================================================================

/// Body for `POST /join`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinRequest {
    /// Meeting platform identifier.
    pub platform: String,
    /// Meeting id, coerced to its string form.
    pub meeting_id: String,
    /// Meeting password; empty string when the caller supplied none.
    pub meeting_password: String,
    /// Bot display name.
    pub bot_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub webhook_url: Option<String>,
    /// Transcription model.
    pub model: String,
    /// Transcription language.
    pub language: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub no_transcript_timeout_seconds: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub no_participants_left_timeout_seconds: Option<u32>,
}

impl JoinRequest {
    /// Build the wire payload from validated options, applying defaults.
    pub(crate) fn from_options(options: &SendBotOptions) -> Self {
        Self {
            platform: options.platform.clone(),
            meeting_id: options.meeting_id.as_string(),
            meeting_password: options.meeting_password.clone().unwrap_or_default(),
            bot_name: options
                .bot_name
                .clone()
                .unwrap_or_else(|| DEFAULT_BOT_NAME.to_string()),
            webhook_url: options.webhook_url.clone(),
            model: options
                .model
                .clone()
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            language: options
                .language
                .clone()
                .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string()),
            no_transcript_timeout_seconds: options.no_transcript_timeout_seconds,
            no_participants_left_timeout_seconds: options.no_participants_left_timeout_seconds,
        }
    }
}

/// Body for `POST /token`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenRequest {
    /// Requested token lifetime in seconds.
    pub expires_in: u64,
}

// =============================================================================
// Incoming Payloads
// =============================================================================

/// Response body for `POST /join`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinResponse {
    /// Opaque session identifier assigned by the service.
    pub session_id: String,
}

/// Response body for `POST /token`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub token: String,
    pub expires_in: u64,
}

/// Structured error body the service returns on failure.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceErrorBody {
    /// Human-readable error description.
    pub message: String,
}

// =============================================================================
// Public Results
// =============================================================================

/// Handle for a dispatched bot, returned by
/// [`ChatterBox::send_bot`](crate::ChatterBox::send_bot).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BotSession {
    /// Opaque session identifier; use it to connect the event stream.
    pub id: String,
}

/// Short-lived credential returned by
/// [`ChatterBox::get_temporary_token`](crate::ChatterBox::get_temporary_token).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemporaryToken {
    /// The token string.
    pub token: String,
    /// Granted lifetime in seconds.
    pub expires_in: u64,
}
