//! Teller session controller - PIN authentication, lockout and in-session money movement
//!
//! The controller owns the session state machine, verifies PINs against a
//! bounded retry counter, moves money on the session ledger, and records an
//! audit-ready trace of every event it handles.

pub mod config;
pub mod controller;
pub mod ledger;
pub mod pin;
pub mod trace;

pub use config::{ConfigError, SessionConfig, DEFAULT_MAX_PIN_ATTEMPTS, DEFAULT_TRACE_MAX_ENTRIES};
pub use controller::SessionController;
pub use ledger::SessionLedger;
pub use pin::{PinCheck, PinGuard};
pub use trace::{SessionTrace, SessionTraceEvent};

pub use teller_types::{
    Amount, Balance, ErrorKind, Outcome, SessionError, SessionEvent, SessionResult, SessionState,
};
