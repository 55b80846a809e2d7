//! Teller session types: pure foundation layer, no controller logic.
pub mod amount;
pub mod error;
pub mod event;
pub mod outcome;
pub mod state;

pub use amount::{Amount, Balance};
pub use error::{ErrorKind, SessionError};
pub use event::SessionEvent;
pub use outcome::Outcome;
pub use state::SessionState;

/// Result alias for operations that can fail with a [`SessionError`].
pub type SessionResult<T> = Result<T, SessionError>;
