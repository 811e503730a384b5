//! Verified principal attached to an authenticated session.

use std::fmt;

/// Opaque secret presented at authentication and replayed on every
/// provider call made on the session's behalf.
///
/// `Debug` and `Display` never reveal the secret.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Wrap a raw credential string.
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    /// Expose the secret for use in an outbound request.
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Check whether the credential is empty or whitespace.
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

impl fmt::Display for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("***")
    }
}

/// Principal returned by credential verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    /// Provider login name.
    pub login: String,
    /// Provider numeric user id.
    pub id: u64,
    /// Display name, if the account has one.
    pub name: Option<String>,
}

/// Identity attached to a session after successful authentication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    /// The verified principal.
    pub principal: Principal,
    /// The credential used to act on the principal's behalf.
    pub credential: Credential,
}

impl Identity {
    pub fn new(principal: Principal, credential: Credential) -> Self {
        Self {
            principal,
            credential,
        }
    }

    /// Shorthand for the principal's login.
    pub fn login(&self) -> &str {
        &self.principal.login
    }
}
