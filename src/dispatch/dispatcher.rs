//! Session-gated command dispatcher.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tracing::{info, instrument, warn};

use super::command::{Command, CommandOutput};
use super::policy::{AccessLevel, AccessPolicy, FixedAccessPolicy};
use crate::error::GatewayError;
use crate::provider::{Provider, ProviderError, ProviderResult};
use crate::session::{Credential, Identity, SessionId, SessionStore};
use crate::Result;

/// Server name reported at connect and by the status endpoint.
pub const SERVER_NAME: &str = "GitHub MCP Server";

/// Protocol version reported at connect and by the status endpoint.
pub const PROTOCOL_VERSION: &str = "MCP/2.1";

/// Default upper bound on a single provider operation.
pub const DEFAULT_PROVIDER_TIMEOUT: Duration = Duration::from_secs(30);

const CONNECT_MESSAGE: &str = "Connection established. Authentication required.";

/// Dispatcher settings.
#[derive(Debug, Clone)]
pub struct DispatcherConfig {
    /// Upper bound on credential verification and every provider command.
    pub provider_timeout: Duration,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            provider_timeout: DEFAULT_PROVIDER_TIMEOUT,
        }
    }
}

/// Result of a connect operation.
#[derive(Debug, Clone)]
pub struct ConnectInfo {
    pub session_id: SessionId,
    pub server: &'static str,
    pub protocol: &'static str,
    pub message: &'static str,
}

/// Result of a successful authentication.
#[derive(Debug, Clone)]
pub struct AuthOutcome {
    pub login: String,
    pub access_level: AccessLevel,
}

/// Turns `(session, command, parameters)` into provider calls.
///
/// The dispatcher never holds a store entry across an await: it takes a
/// snapshot, releases it, talks to the provider, and only goes back to the
/// store for the identity write after verification. Sessions removed in
/// the meantime stay removed.
pub struct Dispatcher {
    store: Arc<SessionStore>,
    provider: Arc<dyn Provider>,
    policy: Arc<dyn AccessPolicy>,
    config: DispatcherConfig,
}

impl Dispatcher {
    /// Create a dispatcher with the default access policy and timeouts.
    pub fn new(store: Arc<SessionStore>, provider: Arc<dyn Provider>) -> Self {
        Self {
            store,
            provider,
            policy: Arc::new(FixedAccessPolicy::default()),
            config: DispatcherConfig::default(),
        }
    }

    /// Replace the access policy.
    pub fn with_policy(mut self, policy: Arc<dyn AccessPolicy>) -> Self {
        self.policy = policy;
        self
    }

    /// Replace the dispatcher settings.
    pub fn with_config(mut self, config: DispatcherConfig) -> Self {
        self.config = config;
        self
    }

    /// The session store this dispatcher gates on.
    pub fn store(&self) -> &Arc<SessionStore> {
        &self.store
    }

    /// Open a new session.
    pub fn connect(&self, client: Option<&str>) -> ConnectInfo {
        let session = self.store.create(client.unwrap_or_default());
        info!(session_id = %session.id, client = %session.client, "session connected");

        ConnectInfo {
            session_id: session.id,
            server: SERVER_NAME,
            protocol: PROTOCOL_VERSION,
            message: CONNECT_MESSAGE,
        }
    }

    /// Verify a credential and attach the resulting identity to a session.
    ///
    /// On any verification failure the session is left exactly as it was,
    /// so the client may retry with another credential.
    #[instrument(skip_all, fields(session_id = %id))]
    pub async fn authenticate(&self, id: &SessionId, credential: Credential) -> Result<AuthOutcome> {
        if !self.store.contains(id) {
            return Err(GatewayError::InvalidSession(id.to_string()));
        }

        if credential.is_blank() {
            warn!("authentication failed: empty credential");
            return Err(GatewayError::InvalidCredential("credential is empty".into()));
        }

        let principal = self
            .bounded(self.provider.verify_credential(&credential))
            .await
            .map_err(|e| {
                warn!(error = %e, "authentication failed");
                GatewayError::InvalidCredential(e.to_string())
            })?;

        let access_level = self.policy.access_level(&principal);
        let login = principal.login.clone();

        // Fails if the session was removed while verification was in flight
        self.store
            .authenticate(id, Identity::new(principal, credential))?;

        info!(login = %login, access_level = access_level.as_str(), "session authenticated");
        Ok(AuthOutcome {
            login,
            access_level,
        })
    }

    /// Run a named command on behalf of an authenticated session.
    #[instrument(skip_all, fields(session_id = %id, command = command_name))]
    pub async fn dispatch(
        &self,
        id: &SessionId,
        command_name: &str,
        parameters: Value,
    ) -> Result<CommandOutput> {
        let session = self
            .store
            .get(id)
            .ok_or_else(|| GatewayError::InvalidSession(id.to_string()))?;

        let credential = match (&session.identity, session.status.can_dispatch()) {
            (Some(identity), true) => identity.credential.clone(),
            _ => return Err(GatewayError::NotAuthorized),
        };

        let command = Command::parse(command_name, parameters)?;
        self.store.touch(id);

        info!("command received");

        self.invoke(&credential, &command).await.map_err(|e| {
            warn!(command = %command.name(), error = %e, "provider operation failed");
            GatewayError::Provider(e.to_string())
        })
    }

    /// Close a session. Absent sessions are acknowledged all the same.
    ///
    /// Returns whether a session was actually removed.
    pub fn disconnect(&self, id: &SessionId) -> bool {
        let removed = self.store.remove(id).is_some();
        if removed {
            info!(session_id = %id, "session disconnected");
        }
        removed
    }

    async fn invoke(
        &self,
        credential: &Credential,
        command: &Command,
    ) -> ProviderResult<CommandOutput> {
        let provider = &self.provider;
        match command {
            Command::CreateRepository(params) => self
                .bounded(provider.create_repository(credential, params))
                .await
                .map(CommandOutput::Repository),
            Command::PushFiles(params) => self
                .bounded(provider.push_files(credential, params))
                .await
                .map(|()| CommandOutput::Ack),
            Command::CreateIssue(params) => self
                .bounded(provider.create_issue(credential, params))
                .await
                .map(CommandOutput::Item),
            Command::CreatePullRequest(params) => self
                .bounded(provider.create_pull_request(credential, params))
                .await
                .map(CommandOutput::Item),
        }
    }

    async fn bounded<T, F>(&self, operation: F) -> ProviderResult<T>
    where
        F: Future<Output = ProviderResult<T>>,
    {
        let limit = self.config.provider_timeout;
        tokio::time::timeout(limit, operation)
            .await
            .map_err(|_| ProviderError::Timeout(limit))?
    }
}
