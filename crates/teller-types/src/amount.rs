//! Integer balance arithmetic: whole currency units, never negative.
//!
//! Requested amounts arrive as signed [`Amount`] values so that zero and
//! negative requests can be rejected explicitly; the held [`Balance`] is
//! unsigned and therefore non-negative by construction.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A requested withdraw/deposit amount as supplied by the caller.
pub type Amount = i64;

/// An account balance in whole currency units.
///
/// # Examples
///
/// ```
/// use teller_types::Balance;
///
/// let opening = Balance::new(1_000);
/// let after = opening.checked_sub(300).unwrap();
/// assert_eq!(after.units(), 700);
/// assert_eq!(after.to_string(), "700 units");
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Balance(u64);

impl Balance {
    /// Zero units.
    pub const ZERO: Self = Balance(0);

    #[inline]
    pub fn new(units: u64) -> Self {
        Balance(units)
    }

    /// Raw unit value.
    #[inline]
    pub fn units(&self) -> u64 {
        self.0
    }

    /// Checked credit, `None` on overflow.
    #[inline]
    pub fn checked_add(&self, units: u64) -> Option<Self> {
        self.0.checked_add(units).map(Balance)
    }

    /// Checked debit, `None` if the result would be negative.
    #[inline]
    pub fn checked_sub(&self, units: u64) -> Option<Self> {
        self.0.checked_sub(units).map(Balance)
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for Balance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} units", self.0)
    }
}

impl Default for Balance {
    fn default() -> Self {
        Balance::ZERO
    }
}

impl From<u64> for Balance {
    fn from(units: u64) -> Self {
        Balance(units)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checked_sub_underflow() {
        assert!(Balance::ZERO.checked_sub(1).is_none());
        assert_eq!(Balance::new(5).checked_sub(5), Some(Balance::ZERO));
    }

    #[test]
    fn test_checked_add_overflow() {
        assert!(Balance::new(u64::MAX).checked_add(1).is_none());
        assert_eq!(Balance::new(1).checked_add(2), Some(Balance::new(3)));
    }

    #[test]
    fn test_display() {
        assert_eq!(Balance::new(1000).to_string(), "1000 units");
        assert_eq!(Balance::ZERO.to_string(), "0 units");
    }

    #[test]
    fn test_serde_is_transparent() {
        let json = serde_json::to_string(&Balance::new(42)).unwrap();
        assert_eq!(json, "42");
    }
}
