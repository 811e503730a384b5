//! Request and result contracts for provider operations.

use serde::{Deserialize, Serialize};

/// Parameters for creating a repository owned by the authenticated user.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreateRepository {
    /// Repository name.
    pub name: String,
    /// Optional description.
    #[serde(default)]
    pub description: Option<String>,
    /// Whether the repository is private.
    #[serde(default)]
    pub private: bool,
}

/// A single file to commit.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FileChange {
    /// Path relative to the repository root.
    pub path: String,
    /// UTF-8 file content.
    pub content: String,
}

/// Parameters for committing a set of files on top of a branch head.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PushFiles {
    pub owner: String,
    pub repo: String,
    pub branch: String,
    pub files: Vec<FileChange>,
    /// Commit message.
    pub message: String,
}

/// Parameters for opening an issue.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreateIssue {
    pub owner: String,
    pub repo: String,
    pub title: String,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub labels: Vec<String>,
}

/// Parameters for opening a pull request.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreatePullRequest {
    pub owner: String,
    pub repo: String,
    pub title: String,
    #[serde(default)]
    pub body: Option<String>,
    /// Branch containing the changes.
    pub head: String,
    /// Branch the changes should be merged into.
    pub base: String,
}

/// A created repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepositoryRef {
    pub name: String,
    pub url: String,
}

/// A created issue or pull request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemRef {
    pub number: u64,
    pub url: String,
}
