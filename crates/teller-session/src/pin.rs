//! PIN verification with a bounded retry counter.

use std::fmt;

use zeroize::Zeroizing;

/// Result of a single PIN check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinCheck {
    Verified,
    Rejected { attempts_remaining: u32 },
    /// This failure exhausted the allowed attempts.
    Exhausted,
}

/// Holds the session credential and counts failed checks.
///
/// Invariant: `attempts <= max_attempts`.
pub struct PinGuard {
    stored_pin: Zeroizing<String>,
    attempts: u32,
    max_attempts: u32,
}

impl PinGuard {
    /// `max_attempts` comes from a validated [`SessionConfig`](crate::SessionConfig)
    /// and must be at least 1.
    pub fn new(stored_pin: &str, max_attempts: u32) -> Self {
        debug_assert!(max_attempts >= 1, "PinGuard needs at least one attempt");
        Self {
            stored_pin: Zeroizing::new(stored_pin.to_string()),
            attempts: 0,
            max_attempts,
        }
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn attempts_remaining(&self) -> u32 {
        self.max_attempts - self.attempts
    }

    pub fn is_exhausted(&self) -> bool {
        self.attempts >= self.max_attempts
    }

    /// Compare `submitted` against the stored PIN and update the counter.
    ///
    /// Callers must not check again once exhausted; an exhausted guard
    /// keeps reporting `Exhausted` without touching the counter.
    pub fn check(&mut self, submitted: &str) -> PinCheck {
        if self.is_exhausted() {
            return PinCheck::Exhausted;
        }
        if constant_time_compare(submitted, &self.stored_pin) {
            self.attempts = 0;
            return PinCheck::Verified;
        }
        self.attempts += 1;
        if self.is_exhausted() {
            PinCheck::Exhausted
        } else {
            PinCheck::Rejected {
                attempts_remaining: self.attempts_remaining(),
            }
        }
    }

    pub fn reset(&mut self) {
        self.attempts = 0;
    }
}

impl fmt::Debug for PinGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PinGuard")
            .field("attempts", &self.attempts)
            .field("max_attempts", &self.max_attempts)
            .finish_non_exhaustive()
    }
}

/// Constant-time string comparison to prevent timing attacks
fn constant_time_compare(a: &str, b: &str) -> bool {
    use subtle::ConstantTimeEq;

    if a.len() != b.len() {
        return false;
    }

    a.as_bytes().ct_eq(b.as_bytes()).into()
}
