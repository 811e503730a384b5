//! # mcp-gateway
//!
//! Session-oriented HTTP gateway that runs a small, closed set of GitHub
//! commands on behalf of authenticated clients.
//!
//! A client connects to obtain a session id, authenticates that session
//! with a GitHub credential, and then issues named commands
//! (`CREATE_REPOSITORY`, `PUSH_FILES`, `CREATE_ISSUE`,
//! `CREATE_PULL_REQUEST`) which the gateway forwards to the provider.
//!
//! ## Features
//!
//! - **Session Management**: Concurrent session store with an explicit
//!   `Connected -> Authenticated` state machine and idle expiry
//! - **Closed Command Registry**: Commands and their parameters are enums,
//!   resolved before any provider call
//! - **Pluggable Provider**: The `Provider` trait, with a GitHub REST
//!   implementation on `reqwest`
//! - **HTTP API**: axum routes under `/mcp` with a uniform JSON envelope
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use mcp_gateway::api::{serve_with_state, AppState, ServerConfig};
//! use mcp_gateway::{Dispatcher, GitHubConfig, GitHubProvider, SessionStore};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     mcp_gateway::logging::try_init().ok();
//!
//!     let provider = Arc::new(GitHubProvider::new(GitHubConfig::default())?);
//!     let dispatcher = Dispatcher::new(Arc::new(SessionStore::new()), provider);
//!
//!     serve_with_state(ServerConfig::default(), AppState::new(Arc::new(dispatcher))).await?;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod logging;
pub mod provider;
pub mod session;

// Re-export commonly used types
pub use dispatch::{Command, CommandName, CommandOutput, Dispatcher};
pub use error::{GatewayError, Result};
pub use provider::{GitHubConfig, GitHubProvider, Provider, ProviderError};
pub use session::{Credential, Session, SessionId, SessionStatus, SessionStore};
