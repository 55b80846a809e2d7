//! Session states.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The closed set of states a teller session can be in.
///
/// `Idle` is both the initial state and the state reached after a completed
/// or reset cycle; the machine runs one cycle per card session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionState {
    Idle,
    CardInserted,
    PinVerified,
    TransactionActive,
    Completed,
    Locked,
}

impl SessionState {
    pub fn all() -> [SessionState; 6] {
        [
            SessionState::Idle,
            SessionState::CardInserted,
            SessionState::PinVerified,
            SessionState::TransactionActive,
            SessionState::Completed,
            SessionState::Locked,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            SessionState::Idle              => "Idle",
            SessionState::CardInserted      => "CardInserted",
            SessionState::PinVerified       => "PinVerified",
            SessionState::TransactionActive => "TransactionActive",
            SessionState::Completed         => "Completed",
            SessionState::Locked            => "Locked",
        }
    }

    /// What the user should do next when an event is rejected in this state.
    pub fn guidance(&self) -> &'static str {
        match self {
            SessionState::Idle              => "Invalid action. Please insert your card.",
            SessionState::CardInserted      => "Please enter your PIN.",
            SessionState::PinVerified       => "Please select a valid transaction.",
            SessionState::TransactionActive => "Transaction is still in progress.",
            SessionState::Completed         => "Please eject your card to continue.",
            SessionState::Locked            => "Card is locked. Please reset PIN attempts.",
        }
    }

    pub fn is_locked(&self) -> bool {
        matches!(self, SessionState::Locked)
    }

    /// Money operations are only accepted here.
    pub fn accepts_transactions(&self) -> bool {
        matches!(self, SessionState::TransactionActive)
    }
}

impl Default for SessionState {
    fn default() -> Self {
        SessionState::Idle
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_idle() {
        assert_eq!(SessionState::default(), SessionState::Idle);
    }

    #[test]
    fn test_only_transaction_active_accepts_transactions() {
        let accepting: Vec<_> = SessionState::all()
            .into_iter()
            .filter(|s| s.accepts_transactions())
            .collect();
        assert_eq!(accepting, vec![SessionState::TransactionActive]);
    }

    #[test]
    fn test_every_state_has_guidance() {
        for state in SessionState::all() {
            assert!(!state.guidance().is_empty(), "{} has no guidance", state);
        }
    }
}
