//! Version-control provider capability.
//!
//! The gateway never talks to a provider directly; it goes through the
//! [`Provider`] trait so the dispatcher can be driven by the real GitHub
//! client in production and by stubs in tests.

mod github;
mod types;

use std::time::Duration;

use async_trait::async_trait;

use crate::session::{Credential, Principal};

pub use github::{GitHubConfig, GitHubProvider, DEFAULT_API_BASE_URL};
pub use types::{
    CreateIssue, CreatePullRequest, CreateRepository, FileChange, ItemRef, PushFiles,
    RepositoryRef,
};

/// Result type alias for provider operations.
pub type ProviderResult<T> = Result<T, ProviderError>;

/// Errors that can occur during provider operations.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// HTTP request failed before a response was received.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider rejected the credential.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// The provider returned a non-success status.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Error description.
        message: String,
    },

    /// The operation did not complete within the configured bound.
    #[error("operation timed out after {0:?}")]
    Timeout(Duration),

    /// The configured API root cannot carry request paths.
    #[error("invalid request URL: {0}")]
    InvalidUrl(String),

    /// The provider response could not be decoded.
    #[error("failed to decode provider response: {0}")]
    Decode(String),
}

/// External version-control operations available to the gateway.
///
/// Implementations must be safe to share across concurrent requests.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Verify a credential and return the principal it belongs to.
    async fn verify_credential(&self, credential: &Credential) -> ProviderResult<Principal>;

    /// Create a repository for the authenticated user.
    async fn create_repository(
        &self,
        credential: &Credential,
        request: &CreateRepository,
    ) -> ProviderResult<RepositoryRef>;

    /// Commit files on top of a branch and advance the branch.
    async fn push_files(&self, credential: &Credential, request: &PushFiles)
        -> ProviderResult<()>;

    /// Open an issue.
    async fn create_issue(
        &self,
        credential: &Credential,
        request: &CreateIssue,
    ) -> ProviderResult<ItemRef>;

    /// Open a pull request.
    async fn create_pull_request(
        &self,
        credential: &Credential,
        request: &CreatePullRequest,
    ) -> ProviderResult<ItemRef>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display() {
        let err = ProviderError::Api {
            status: 422,
            message: "name already exists on this account".into(),
        };
        assert!(err.to_string().contains("422"));
        assert!(err.to_string().contains("already exists"));
    }

    #[test]
    fn test_timeout_display() {
        let err = ProviderError::Timeout(Duration::from_secs(30));
        assert!(err.to_string().contains("timed out"));
    }
}
