//! HTTP handlers for the gateway routes.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{rejection::JsonRejection, State},
    http::{header::USER_AGENT, HeaderMap, StatusCode},
    Json,
};
use tracing::{debug, warn};

use super::types::{
    AckResponse, AuthenticateRequest, AuthenticateResponse, CommandRequest, CommandResponse,
    ConnectRequest, ConnectResponse, DisconnectRequest, ErrorResponse, StatusResponse,
};
use crate::dispatch::{CommandName, Dispatcher};
use crate::error::GatewayError;
use crate::session::{Credential, SessionId, SessionStore};

type ApiError = (StatusCode, Json<ErrorResponse>);

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<Dispatcher>,
}

impl AppState {
    pub fn new(dispatcher: Arc<Dispatcher>) -> Self {
        Self { dispatcher }
    }

    pub fn store(&self) -> &Arc<SessionStore> {
        self.dispatcher.store()
    }
}

fn reject(err: &GatewayError) -> ApiError {
    (err.status_code(), Json(ErrorResponse::from_error(err)))
}

fn bad_request(rejection: JsonRejection) -> ApiError {
    let detail = rejection.body_text();
    warn!(error = %detail, "rejected request body");
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse::new("BAD_REQUEST", "Malformed request body").with_error(detail)),
    )
}

/// A missing or unparseable id is indistinguishable from an unknown one.
fn session_id(raw: Option<&str>) -> Result<SessionId, ApiError> {
    raw.unwrap_or_default().parse().map_err(|e| reject(&e))
}

/// Health check endpoint.
pub async fn health() -> &'static str {
    "OK"
}

/// Server status report.
pub async fn status(State(state): State<AppState>) -> Json<StatusResponse> {
    let store = state.store();
    Json(StatusResponse::online(store.count(), store.authenticated_count()))
}

/// Open a session.
///
/// Always succeeds. The body is optional and an unreadable one is ignored.
/// The client descriptor is the body's `client`, then the `User-Agent`
/// header.
pub async fn connect(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Json<ConnectResponse> {
    let req: ConnectRequest = if body.iter().all(u8::is_ascii_whitespace) {
        ConnectRequest::default()
    } else {
        serde_json::from_slice(&body).unwrap_or_else(|e| {
            debug!(error = %e, "ignoring unreadable connect body");
            ConnectRequest::default()
        })
    };

    let user_agent = headers.get(USER_AGENT).and_then(|v| v.to_str().ok());
    let client = req
        .client
        .as_deref()
        .filter(|c| !c.trim().is_empty())
        .or(user_agent);

    let info = state.dispatcher.connect(client);
    Json(ConnectResponse::from_info(&info))
}

/// Verify a credential for a session.
pub async fn authenticate(
    State(state): State<AppState>,
    payload: Result<Json<AuthenticateRequest>, JsonRejection>,
) -> Result<Json<AuthenticateResponse>, ApiError> {
    let Json(req) = payload.map_err(bad_request)?;
    let id = session_id(req.session_id.as_deref())?;
    let credential = Credential::new(req.token.unwrap_or_default());

    let outcome = state
        .dispatcher
        .authenticate(&id, credential)
        .await
        .map_err(|e| reject(&e))?;

    Ok(Json(AuthenticateResponse::from_outcome(outcome)))
}

/// Run a command for an authenticated session.
pub async fn command(
    State(state): State<AppState>,
    payload: Result<Json<CommandRequest>, JsonRejection>,
) -> Result<Json<CommandResponse>, ApiError> {
    let Json(req) = payload.map_err(bad_request)?;
    let id = session_id(req.session_id.as_deref())?;
    let name = req.command.unwrap_or_default();

    match state.dispatcher.dispatch(&id, &name, req.parameters).await {
        Ok(output) => {
            // dispatch only succeeds for registered names
            let message = name
                .parse::<CommandName>()
                .map(|n| n.success_message())
                .unwrap_or("Command completed");
            Ok(Json(CommandResponse::new(message, output.data())))
        }
        Err(err @ GatewayError::Provider(_)) => {
            let (status, Json(mut body)) = reject(&err);
            if let Ok(command) = name.parse::<CommandName>() {
                body.message = command.failure_message().to_string();
            }
            Err((status, Json(body)))
        }
        Err(err) => Err(reject(&err)),
    }
}

/// Close a session. Always acknowledged.
pub async fn disconnect(
    State(state): State<AppState>,
    payload: Result<Json<DisconnectRequest>, JsonRejection>,
) -> Json<AckResponse> {
    let id = payload
        .ok()
        .and_then(|Json(req)| req.session_id)
        .and_then(|raw| raw.parse::<SessionId>().ok());

    if let Some(id) = id {
        state.dispatcher.disconnect(&id);
    }
    Json(AckResponse::new("Disconnected"))
}
