//! Error types for mcp-gateway.

use axum::http::StatusCode;
use thiserror::Error;

/// Main error type for gateway operations.
///
/// Every variant maps to exactly one wire classification code and HTTP
/// status, see [`GatewayError::code`] and [`GatewayError::status_code`].
#[derive(Error, Debug)]
pub enum GatewayError {
    /// Session id is unknown or has expired. The client must reconnect.
    #[error("invalid session ID: {0}")]
    InvalidSession(String),

    /// Session exists but has not been authenticated yet.
    #[error("session not authenticated")]
    NotAuthorized,

    /// The provider rejected the presented credential.
    #[error("invalid credential: {0}")]
    InvalidCredential(String),

    /// Command name is not part of the registry.
    #[error("unknown command: {0}")]
    UnknownCommand(String),

    /// Command parameters could not be decoded.
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),

    /// The provider operation failed or timed out.
    #[error("provider error: {0}")]
    Provider(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl GatewayError {
    /// Classification code carried in error envelopes.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidSession(_) => "INVALID_SESSION",
            Self::NotAuthorized => "NOT_AUTHORIZED",
            Self::InvalidCredential(_) => "INVALID_CREDENTIAL",
            Self::UnknownCommand(_) => "UNKNOWN_COMMAND",
            Self::InvalidParameters(_) => "INVALID_PARAMETERS",
            Self::Provider(_) => "PROVIDER_ERROR",
            Self::Io(_) => "INTERNAL_ERROR",
        }
    }

    /// HTTP status used when this error reaches the API layer.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidSession(_) | Self::InvalidCredential(_) => StatusCode::UNAUTHORIZED,
            Self::NotAuthorized => StatusCode::FORBIDDEN,
            Self::UnknownCommand(_) | Self::InvalidParameters(_) => StatusCode::BAD_REQUEST,
            Self::Provider(_) | Self::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Convenience Result type for gateway operations.
pub type Result<T> = std::result::Result<T, GatewayError>;
