//! HTTP API for the gateway.
//!
//! ## Endpoints
//!
//! ### Health & Status
//! - `GET /health` - Liveness check
//! - `GET /status` - Server name, version, protocol and session counts
//!
//! ### Sessions
//! - `POST /mcp/connect` - Open a session
//! - `POST /mcp/authenticate` - Attach a verified identity to a session
//! - `POST /mcp/command` - Run a command for an authenticated session
//! - `POST /mcp/disconnect` - Close a session
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use mcp_gateway::api::{serve_with_state, AppState, ServerConfig};
//! use mcp_gateway::dispatch::Dispatcher;
//! use mcp_gateway::provider::{GitHubConfig, GitHubProvider};
//! use mcp_gateway::session::SessionStore;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let provider = Arc::new(GitHubProvider::new(GitHubConfig::default())?);
//!     let dispatcher = Dispatcher::new(Arc::new(SessionStore::new()), provider);
//!     let state = AppState::new(Arc::new(dispatcher));
//!     serve_with_state(ServerConfig::new("127.0.0.1", 3000), state).await?;
//!     Ok(())
//! }
//! ```

pub mod handlers;
pub mod router;
pub mod types;

pub use handlers::AppState;
pub use router::{create_router_with_state, serve_with_state, ServerConfig};
pub use types::{
    AckResponse, AuthenticateRequest, AuthenticateResponse, CommandRequest, CommandResponse,
    ConnectRequest, ConnectResponse, DisconnectRequest, ErrorResponse, StatusResponse,
};
