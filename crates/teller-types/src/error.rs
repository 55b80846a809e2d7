//! Session error types.
//!
//! Every variant renders to the user-facing message that ends up in the
//! [`Outcome`](crate::Outcome), so the shell can display it verbatim.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::amount::{Amount, Balance};
use crate::state::SessionState;

/// All failures a session can report. None of them is fatal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// Event not legal in the current state; state unchanged.
    #[error("{}", .state.guidance())]
    InvalidEvent {
        state: SessionState,
        event: &'static str,
    },

    /// PIN mismatch. Zero remaining attempts means the card is now locked.
    #[error("{}", auth_failure_message(.attempts_remaining))]
    AuthenticationFailed { attempts_remaining: u32 },

    /// Anything other than a lockout reset while the card is locked.
    #[error("Card is locked. Please reset PIN attempts.")]
    LockedOut,

    #[error("Invalid amount: {amount}. Amount must be a positive number of units.")]
    InvalidAmount { amount: Amount },

    /// Deposit that would overflow the balance.
    #[error("Deposit of {amount} units rejected: balance of {balance} cannot hold it.")]
    AmountOverflow { amount: Amount, balance: Balance },

    #[error("Insufficient funds: requested {requested} units, available {available}.")]
    InsufficientFunds { requested: u64, available: Balance },

    /// Money operation outside `TransactionActive`.
    #[error("No transaction in progress ({state}). {}", .state.guidance())]
    InvalidState { state: SessionState },
}

fn auth_failure_message(attempts_remaining: &u32) -> String {
    match attempts_remaining {
        0 => "Too many incorrect PIN attempts. Your card is locked.".to_string(),
        1 => "Incorrect PIN. You have 1 attempt left.".to_string(),
        n => format!("Incorrect PIN. You have {} attempts left.", n),
    }
}

/// Fieldless projection of [`SessionError`] for matching and serialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    InvalidEvent,
    AuthenticationFailed,
    LockedOut,
    InvalidAmount,
    InsufficientFunds,
    InvalidState,
}

impl SessionError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SessionError::InvalidEvent { .. } => ErrorKind::InvalidEvent,
            SessionError::AuthenticationFailed { .. } => ErrorKind::AuthenticationFailed,
            SessionError::LockedOut => ErrorKind::LockedOut,
            SessionError::InvalidAmount { .. } | SessionError::AmountOverflow { .. } => {
                ErrorKind::InvalidAmount
            }
            SessionError::InsufficientFunds { .. } => ErrorKind::InsufficientFunds,
            SessionError::InvalidState { .. } => ErrorKind::InvalidState,
        }
    }
}
