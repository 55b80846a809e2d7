//! The structured result returned for every event.

use serde::{Deserialize, Serialize};

use crate::amount::Balance;
use crate::error::{ErrorKind, SessionError};
use crate::state::SessionState;

/// What the shell renders after each call: resulting state, a message and
/// a success flag, plus the balance and remaining PIN attempts when they
/// are relevant to the event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    pub state: SessionState,
    pub message: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub balance: Option<Balance>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attempts_remaining: Option<u32>,
}

impl Outcome {
    pub fn accepted(state: SessionState, message: impl Into<String>) -> Self {
        Self {
            state,
            message: message.into(),
            success: true,
            error: None,
            balance: None,
            attempts_remaining: None,
        }
    }

    /// Failure outcome; `state` is wherever the session ended up.
    pub fn rejected(state: SessionState, err: &SessionError) -> Self {
        let attempts_remaining = match err {
            SessionError::AuthenticationFailed { attempts_remaining } => Some(*attempts_remaining),
            _ => None,
        };
        let balance = match err {
            SessionError::InsufficientFunds { available, .. } => Some(*available),
            SessionError::AmountOverflow { balance, .. } => Some(*balance),
            _ => None,
        };
        Self {
            state,
            message: err.to_string(),
            success: false,
            error: Some(err.kind()),
            balance,
            attempts_remaining,
        }
    }

    pub fn with_balance(mut self, balance: Balance) -> Self {
        self.balance = Some(balance);
        self
    }

    pub fn with_attempts_remaining(mut self, remaining: u32) -> Self {
        self.attempts_remaining = Some(remaining);
        self
    }

    pub fn is_error(&self, kind: ErrorKind) -> bool {
        self.error == Some(kind)
    }
}
