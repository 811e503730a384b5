//! Session authentication state machine.

use serde::Serialize;

/// Authentication status of a gateway session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    /// Session exists but no credential has been verified yet.
    #[default]
    Connected,
    /// A credential has been verified; commands may be dispatched.
    Authenticated,
}

impl SessionStatus {
    /// Check if transition to target status is valid.
    ///
    /// Valid transitions:
    /// - Connected -> Authenticated
    /// - Authenticated -> Authenticated (re-authentication)
    pub fn can_transition_to(&self, target: SessionStatus) -> bool {
        use SessionStatus::*;
        matches!(
            (*self, target),
            (Connected, Authenticated) | (Authenticated, Authenticated)
        )
    }

    /// Check if the session may dispatch commands.
    pub fn can_dispatch(&self) -> bool {
        matches!(self, SessionStatus::Authenticated)
    }

    /// Check if the session accepts an authenticate action.
    pub fn can_authenticate(&self) -> bool {
        self.can_transition_to(SessionStatus::Authenticated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_transitions() {
        assert!(SessionStatus::Connected.can_transition_to(SessionStatus::Authenticated));
        assert!(SessionStatus::Authenticated.can_transition_to(SessionStatus::Authenticated));
    }

    #[test]
    fn test_never_reverts() {
        assert!(!SessionStatus::Authenticated.can_transition_to(SessionStatus::Connected));
        assert!(!SessionStatus::Connected.can_transition_to(SessionStatus::Connected));
    }

    #[test]
    fn test_can_dispatch() {
        assert!(!SessionStatus::Connected.can_dispatch());
        assert!(SessionStatus::Authenticated.can_dispatch());
    }

    #[test]
    fn test_both_states_accept_authenticate() {
        assert!(SessionStatus::Connected.can_authenticate());
        assert!(SessionStatus::Authenticated.can_authenticate());
    }

    #[test]
    fn test_default() {
        assert_eq!(SessionStatus::default(), SessionStatus::Connected);
    }

    #[test]
    fn test_serializes_lowercase() {
        let json = serde_json::to_string(&SessionStatus::Authenticated).unwrap();
        assert_eq!(json, "\"authenticated\"");
    }
}
