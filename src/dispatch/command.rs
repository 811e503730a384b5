//! Closed command registry.
//!
//! Every command the gateway understands is a variant of [`CommandName`];
//! its decoded parameters live in the matching [`Command`] variant. Adding
//! a command means adding a variant, and the compiler points at every
//! `match` that must handle it.

use std::fmt;
use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::GatewayError;
use crate::provider::{
    CreateIssue, CreatePullRequest, CreateRepository, ItemRef, PushFiles, RepositoryRef,
};
use crate::Result;

/// Wire names of the supported commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandName {
    CreateRepository,
    PushFiles,
    CreateIssue,
    CreatePullRequest,
}

impl CommandName {
    /// Every registered command.
    pub const ALL: [CommandName; 4] = [
        CommandName::CreateRepository,
        CommandName::PushFiles,
        CommandName::CreateIssue,
        CommandName::CreatePullRequest,
    ];

    /// The literal name clients send.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CreateRepository => "CREATE_REPOSITORY",
            Self::PushFiles => "PUSH_FILES",
            Self::CreateIssue => "CREATE_ISSUE",
            Self::CreatePullRequest => "CREATE_PULL_REQUEST",
        }
    }

    /// Message returned when the command succeeds.
    pub fn success_message(&self) -> &'static str {
        match self {
            Self::CreateRepository => "Repository created",
            Self::PushFiles => "Files pushed successfully",
            Self::CreateIssue => "Issue created",
            Self::CreatePullRequest => "Pull request created",
        }
    }

    /// Message returned when the provider operation fails.
    pub fn failure_message(&self) -> &'static str {
        match self {
            Self::CreateRepository => "Failed to create repository",
            Self::PushFiles => "Failed to push files",
            Self::CreateIssue => "Failed to create issue",
            Self::CreatePullRequest => "Failed to create pull request",
        }
    }
}

impl fmt::Display for CommandName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CommandName {
    type Err = GatewayError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| GatewayError::UnknownCommand(s.to_string()))
    }
}

/// A resolved command with decoded parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    CreateRepository(CreateRepository),
    PushFiles(PushFiles),
    CreateIssue(CreateIssue),
    CreatePullRequest(CreatePullRequest),
}

impl Command {
    /// Resolve a command name and decode its parameters.
    ///
    /// Unknown names fail with [`GatewayError::UnknownCommand`] before the
    /// parameters are looked at. A `null` parameter value is treated as an
    /// empty object.
    pub fn parse(name: &str, parameters: Value) -> Result<Self> {
        let name: CommandName = name.parse()?;
        let parameters = match parameters {
            Value::Null => Value::Object(Default::default()),
            other => other,
        };

        let command = match name {
            CommandName::CreateRepository => Self::CreateRepository(decode(parameters)?),
            CommandName::PushFiles => Self::PushFiles(decode(parameters)?),
            CommandName::CreateIssue => Self::CreateIssue(decode(parameters)?),
            CommandName::CreatePullRequest => Self::CreatePullRequest(decode(parameters)?),
        };
        command.validate()?;
        Ok(command)
    }

    /// The registry entry this command belongs to.
    pub fn name(&self) -> CommandName {
        match self {
            Self::CreateRepository(_) => CommandName::CreateRepository,
            Self::PushFiles(_) => CommandName::PushFiles,
            Self::CreateIssue(_) => CommandName::CreateIssue,
            Self::CreatePullRequest(_) => CommandName::CreatePullRequest,
        }
    }

    fn validate(&self) -> Result<()> {
        match self {
            Self::CreateRepository(p) => require("name", &p.name),
            Self::PushFiles(p) => {
                require("owner", &p.owner)?;
                require("repo", &p.repo)?;
                require("branch", &p.branch)?;
                require("message", &p.message)?;
                if p.files.is_empty() {
                    return Err(GatewayError::InvalidParameters(
                        "files must not be empty".into(),
                    ));
                }
                p.files.iter().try_for_each(|f| require("files[].path", &f.path))
            }
            Self::CreateIssue(p) => {
                require("owner", &p.owner)?;
                require("repo", &p.repo)?;
                require("title", &p.title)
            }
            Self::CreatePullRequest(p) => {
                require("owner", &p.owner)?;
                require("repo", &p.repo)?;
                require("title", &p.title)?;
                require("head", &p.head)?;
                require("base", &p.base)
            }
        }
    }
}

fn decode<T: DeserializeOwned>(parameters: Value) -> Result<T> {
    serde_json::from_value(parameters).map_err(|e| GatewayError::InvalidParameters(e.to_string()))
}

fn require(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        Err(GatewayError::InvalidParameters(format!(
            "{field} must not be empty"
        )))
    } else {
        Ok(())
    }
}

/// Normalized success result of a dispatched command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutput {
    /// `CREATE_REPOSITORY` result.
    Repository(RepositoryRef),
    /// `CREATE_ISSUE` / `CREATE_PULL_REQUEST` result.
    Item(ItemRef),
    /// Acknowledgement with no payload (`PUSH_FILES`).
    Ack,
}

impl CommandOutput {
    /// Payload for the response envelope's `data` field.
    pub fn data(&self) -> Option<Value> {
        match self {
            Self::Repository(repo) => serde_json::to_value(repo).ok(),
            Self::Item(item) => serde_json::to_value(item).ok(),
            Self::Ack => None,
        }
    }
}
