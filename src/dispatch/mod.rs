//! Command dispatch.
//!
//! This module turns `(session, command name, parameters)` into a provider
//! call:
//! - Session lookup and authentication gating
//! - Resolution against the closed command registry
//! - Bounded provider invocation and error normalization
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use mcp_gateway::dispatch::Dispatcher;
//! use mcp_gateway::provider::{GitHubConfig, GitHubProvider};
//! use mcp_gateway::session::{Credential, SessionStore};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let provider = Arc::new(GitHubProvider::new(GitHubConfig::default())?);
//! let dispatcher = Dispatcher::new(Arc::new(SessionStore::new()), provider);
//!
//! let session = dispatcher.connect(Some("example"));
//! dispatcher
//!     .authenticate(&session.session_id, Credential::new("ghp_..."))
//!     .await?;
//! let output = dispatcher
//!     .dispatch(
//!         &session.session_id,
//!         "CREATE_REPOSITORY",
//!         serde_json::json!({"name": "demo"}),
//!     )
//!     .await?;
//! println!("{:?}", output.data());
//! # Ok(())
//! # }
//! ```

mod command;
mod dispatcher;
mod policy;

pub use command::{Command, CommandName, CommandOutput};
pub use dispatcher::{
    AuthOutcome, ConnectInfo, Dispatcher, DispatcherConfig, DEFAULT_PROVIDER_TIMEOUT,
    PROTOCOL_VERSION, SERVER_NAME,
};
pub use policy::{AccessLevel, AccessPolicy, FixedAccessPolicy};
