//! API request and response types.
//!
//! Field names are camelCase on the wire.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::dispatch::{AccessLevel, AuthOutcome, ConnectInfo, PROTOCOL_VERSION, SERVER_NAME};
use crate::error::GatewayError;

const STATUS_SUCCESS: &str = "success";
const STATUS_ERROR: &str = "error";

/// Optional body of a connect request.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ConnectRequest {
    /// Declared client identity; falls back to the User-Agent header.
    #[serde(default)]
    pub client: Option<String>,
}

/// Request to authenticate a session.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticateRequest {
    #[serde(default)]
    pub session_id: Option<String>,
    /// Provider credential (a GitHub token).
    #[serde(default)]
    pub token: Option<String>,
}

/// Request to run a command.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandRequest {
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub command: Option<String>,
    #[serde(default)]
    pub parameters: Value,
}

/// Request to close a session.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct DisconnectRequest {
    #[serde(default)]
    pub session_id: Option<String>,
}

/// Response for a successful connect.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectResponse {
    pub status: &'static str,
    pub session_id: String,
    pub server: &'static str,
    pub protocol: &'static str,
    pub message: &'static str,
}

impl ConnectResponse {
    pub fn from_info(info: &ConnectInfo) -> Self {
        Self {
            status: STATUS_SUCCESS,
            session_id: info.session_id.to_string(),
            server: info.server,
            protocol: info.protocol,
            message: info.message,
        }
    }
}

/// Response for a successful authentication.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticateResponse {
    pub status: &'static str,
    pub message: &'static str,
    /// Verified login.
    pub user: String,
    pub access_level: AccessLevel,
}

impl AuthenticateResponse {
    pub fn from_outcome(outcome: AuthOutcome) -> Self {
        Self {
            status: STATUS_SUCCESS,
            message: "Authentication successful",
            user: outcome.login,
            access_level: outcome.access_level,
        }
    }
}

/// Response for a successful command.
#[derive(Debug, Clone, Serialize)]
pub struct CommandResponse {
    pub status: &'static str,
    pub message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl CommandResponse {
    pub fn new(message: &'static str, data: Option<Value>) -> Self {
        Self {
            status: STATUS_SUCCESS,
            message,
            data,
        }
    }
}

/// Plain acknowledgement.
#[derive(Debug, Clone, Serialize)]
pub struct AckResponse {
    pub status: &'static str,
    pub message: &'static str,
}

impl AckResponse {
    pub fn new(message: &'static str) -> Self {
        Self {
            status: STATUS_SUCCESS,
            message,
        }
    }
}

/// Server status report.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    pub status: &'static str,
    pub name: &'static str,
    pub version: &'static str,
    pub protocol: &'static str,
    /// Live sessions.
    pub sessions: usize,
    pub authenticated_sessions: usize,
}

impl StatusResponse {
    pub fn online(sessions: usize, authenticated_sessions: usize) -> Self {
        Self {
            status: "online",
            name: SERVER_NAME,
            version: env!("CARGO_PKG_VERSION"),
            protocol: PROTOCOL_VERSION,
            sessions,
            authenticated_sessions,
        }
    }
}

/// Error envelope.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub status: &'static str,
    /// Error classification (e.g., "INVALID_SESSION").
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Underlying failure detail (optional).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status: STATUS_ERROR,
            code: code.into(),
            message: message.into(),
            error: None,
        }
    }

    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    /// Build the envelope for a gateway error.
    pub fn from_error(err: &GatewayError) -> Self {
        let response = Self::new(err.code(), String::new());
        match err {
            GatewayError::InvalidSession(_) => Self {
                message: "Invalid session ID".into(),
                ..response
            },
            GatewayError::NotAuthorized => Self {
                message: "Session not authenticated".into(),
                ..response
            },
            GatewayError::InvalidCredential(detail) => Self {
                message: "Authentication failed".into(),
                ..response
            }
            .with_error(detail.clone()),
            GatewayError::UnknownCommand(name) => Self {
                message: format!("Unknown command: {name}"),
                ..response
            },
            GatewayError::InvalidParameters(detail) => Self {
                message: "Invalid parameters".into(),
                ..response
            }
            .with_error(detail.clone()),
            GatewayError::Provider(detail) => Self {
                message: "Provider operation failed".into(),
                ..response
            }
            .with_error(detail.clone()),
            GatewayError::Io(e) => Self {
                message: "Internal error".into(),
                ..response
            }
            .with_error(e.to_string()),
        }
    }
}
