//! ChatterBox client facade.
//!
//! The [`ChatterBox`] struct is the entry point of the SDK. It owns the
//! immutable [`ChatterBoxConfig`] and a pooled `reqwest` client, and exposes
//! the three operations of the service:
//!
//! 1. [`send_bot`](ChatterBox::send_bot): dispatch a bot into a meeting
//! 2. [`get_temporary_token`](ChatterBox::get_temporary_token): mint a
//!    short-lived credential
//! 3. [`connect_socket`](ChatterBox::connect_socket): subscribe to session
//!    lifecycle and transcript events
//!
//! Arguments are validated before any request is sent; transport and service
//! failures are normalized into [`ClientError`].

use std::time::Duration;

use reqwest::Client as HttpClient;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::config::{
    ChatterBoxConfig, DEFAULT_TOKEN_EXPIRY_SECS, MAX_TOKEN_EXPIRY_SECS, MIN_TOKEN_EXPIRY_SECS,
    SendBotOptions,
};
use crate::error::{ClientError, ClientResult};
use crate::messages::{
    BotSession, JoinRequest, JoinResponse, ServiceErrorBody, TemporaryToken, TokenRequest,
    TokenResponse,
};
use crate::socket::{SessionCallbacks, SessionSocket};

/// Total request timeout for REST calls.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// TCP connect timeout for REST calls.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// User-Agent header value for API requests.
const USER_AGENT: &str = concat!("chatterbox-bot/", env!("CARGO_PKG_VERSION"));

/// ChatterBox API client.
///
/// Cheap to clone; all clones share one connection pool. Construction is
/// side-effect free: no network activity happens until an operation is
/// invoked.
#[derive(Debug, Clone)]
pub struct ChatterBox {
    config: ChatterBoxConfig,
    http_client: HttpClient,
}

impl ChatterBox {
    /// Create a new client.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Config`] when the authorization token is empty
    /// or the HTTP client cannot be constructed.
    pub fn new(config: ChatterBoxConfig) -> ClientResult<Self> {
        config.validate()?;

        let http_client = HttpClient::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .map_err(|e| ClientError::Config(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            config,
            http_client,
        })
    }

    /// The configuration this client was constructed with.
    pub fn config(&self) -> &ChatterBoxConfig {
        &self.config
    }

    /// Dispatch a bot into a meeting.
    ///
    /// Returns the opaque session id assigned by the service, which keys the
    /// event stream for this bot's lifetime.
    ///
    /// # Errors
    ///
    /// [`ClientError::Validation`] when the platform is missing or the
    /// meeting id coerces to an empty string (no request is sent), otherwise
    /// the shared [`Service`](ClientError::Service) /
    /// [`Network`](ClientError::Network) /
    /// [`Unexpected`](ClientError::Unexpected) classification.
    pub async fn send_bot(&self, options: SendBotOptions) -> ClientResult<BotSession> {
        options.validate()?;

        let payload = JoinRequest::from_options(&options);
        debug!(
            platform = %payload.platform,
            meeting_id = %payload.meeting_id,
            bot_name = %payload.bot_name,
            "dispatching meeting bot"
        );

        let url = format!("{}/join", self.config.api_base_url);
        let response: JoinResponse = self.post_json(&url, &payload).await?;

        info!(session_id = %response.session_id, "meeting bot dispatched");
        Ok(BotSession {
            id: response.session_id,
        })
    }

    /// Request a short-lived token as an alternative to the long-lived
    /// authorization token.
    ///
    /// `expires_in_seconds` defaults to [`DEFAULT_TOKEN_EXPIRY_SECS`] when
    /// `None` and must fall within [`MIN_TOKEN_EXPIRY_SECS`] ..=
    /// [`MAX_TOKEN_EXPIRY_SECS`].
    pub async fn get_temporary_token(
        &self,
        expires_in_seconds: Option<u64>,
    ) -> ClientResult<TemporaryToken> {
        let expires_in = expires_in_seconds.unwrap_or(DEFAULT_TOKEN_EXPIRY_SECS);
        if !(MIN_TOKEN_EXPIRY_SECS..=MAX_TOKEN_EXPIRY_SECS).contains(&expires_in) {
            return Err(ClientError::Validation(format!(
                "expiration time must be between {MIN_TOKEN_EXPIRY_SECS} and \
                 {MAX_TOKEN_EXPIRY_SECS} seconds"
            )));
        }

        let url = format!("{}/token", self.config.api_base_url);
        let response: TokenResponse = self.post_json(&url, &TokenRequest { expires_in }).await?;

        debug!(expires_in = response.expires_in, "temporary token issued");
        Ok(TemporaryToken {
            token: response.token,
            expires_in: response.expires_in,
        })
    }

    /// Open the event stream for a session and register callbacks.
    ///
    /// The returned [`SessionSocket`] is owned by the caller: the client does
    /// not close, retry, or reconnect it. See the [`socket`](crate::socket)
    /// module for the connection lifecycle.
    pub async fn connect_socket(
        &self,
        session_id: &str,
        callbacks: SessionCallbacks,
    ) -> ClientResult<SessionSocket> {
        SessionSocket::connect(&self.config, session_id, callbacks).await
    }

    /// Issue an authenticated POST and classify the outcome.
    ///
    /// Send failures map to `Network`, structured error bodies to `Service`,
    /// and everything else to `Unexpected`.
    async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        url: &str,
        body: &B,
    ) -> ClientResult<T> {
        let response = self
            .http_client
            .post(url)
            .header(
                "Authorization",
                format!("Bearer {}", self.config.authorization_token),
            )
            .json(body)
            .send()
            .await
            .map_err(|e| ClientError::Network(format!("request to {url} failed: {e}")))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ClientError::Network(format!("failed to read response: {e}")))?;

        if !status.is_success() {
            return Err(match serde_json::from_str::<ServiceErrorBody>(&text) {
                Ok(error_body) => ClientError::Service(error_body.message),
                Err(_) => ClientError::Unexpected(format!("server returned {status}: {text}")),
            });
        }

        serde_json::from_str(&text)
            .map_err(|e| ClientError::Unexpected(format!("failed to parse response: {e}")))
    }
}
