//! Access level derivation for authenticated principals.

use serde::Serialize;

use crate::session::Principal;

/// Access level reported to a client after authentication.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessLevel {
    Read,
    Write,
    Admin,
}

impl AccessLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Read => "read",
            Self::Write => "write",
            Self::Admin => "admin",
        }
    }
}

/// Decides which access level a verified principal receives.
pub trait AccessPolicy: Send + Sync {
    fn access_level(&self, principal: &Principal) -> AccessLevel;
}

/// Grants the same level to every principal.
#[derive(Debug, Clone, Copy)]
pub struct FixedAccessPolicy(pub AccessLevel);

impl Default for FixedAccessPolicy {
    fn default() -> Self {
        Self(AccessLevel::Admin)
    }
}

impl AccessPolicy for FixedAccessPolicy {
    fn access_level(&self, _principal: &Principal) -> AccessLevel {
        self.0
    }
}
