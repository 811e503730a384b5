//! Session identifier type.

use std::fmt;
use std::str::FromStr;

use uuid::Uuid;

/// Prefix used in the string form of every session id.
const PREFIX: &str = "mcp-";

/// Unique identifier for a gateway session.
///
/// Backed by a UUIDv7: 48 bits of millisecond timestamp followed by 74 bits
/// of randomness, so ids stay unique across restarts and cannot be guessed
/// from a neighbouring id. Displayed as `mcp-` followed by 32 hex digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(Uuid);

impl SessionId {
    /// Create a new unique session ID.
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", PREFIX, self.0.simple())
    }
}

impl FromStr for SessionId {
    type Err = crate::error::GatewayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.strip_prefix(PREFIX)
            .filter(|hex| hex.len() == 32)
            .and_then(|hex| Uuid::try_parse(hex).ok())
            .map(SessionId)
            .ok_or_else(|| crate::error::GatewayError::InvalidSession(s.into()))
    }
}
