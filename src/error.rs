//! Error types for the ChatterBox client.

use thiserror::Error;

/// Errors surfaced by ChatterBox client operations.
///
/// Every networked operation classifies failures the same way: the service
/// answered with a structured error (`Service`), the request produced no
/// usable response (`Network`), or something else went wrong (`Unexpected`).
/// `Config` and `Validation` are raised before any network activity.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Invalid construction-time configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// Invalid call-time arguments, rejected before any request is sent.
    #[error("validation error: {0}")]
    Validation(String),

    /// The remote service responded with a structured error message.
    /// The message is passed through verbatim.
    #[error("{0}")]
    Service(String),

    /// The request was sent but no response was received
    /// (connection failure, timeout).
    #[error("no response from server: {0}")]
    Network(String),

    /// Any other failure (malformed response, local error).
    #[error("unexpected error: {0}")]
    Unexpected(String),
}

/// Result type alias for client operations.
pub type ClientResult<T> = Result<T, ClientError>;
