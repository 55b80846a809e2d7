//! In-session account balance and the money operations on it.

use teller_types::{Amount, Balance, SessionError, SessionResult};

/// The single account a session operates on.
///
/// Only the controller holds one, and only calls the mutating methods while
/// a transaction is active.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionLedger {
    balance: Balance,
}

impl SessionLedger {
    pub fn new(opening_balance: Balance) -> Self {
        Self {
            balance: opening_balance,
        }
    }

    pub fn balance(&self) -> Balance {
        self.balance
    }

    /// Debit `amount`; the balance is untouched on any error.
    pub fn withdraw(&mut self, amount: Amount) -> SessionResult<Balance> {
        let units = positive_units(amount)?;
        match self.balance.checked_sub(units) {
            Some(balance) => {
                self.balance = balance;
                Ok(balance)
            }
            None => Err(SessionError::InsufficientFunds {
                requested: units,
                available: self.balance,
            }),
        }
    }

    /// Credit `amount`; overflowing the balance is rejected and leaves it untouched.
    pub fn deposit(&mut self, amount: Amount) -> SessionResult<Balance> {
        let units = positive_units(amount)?;
        self.balance = self
            .balance
            .checked_add(units)
            .ok_or(SessionError::AmountOverflow {
                amount,
                balance: self.balance,
            })?;
        Ok(self.balance)
    }
}

fn positive_units(amount: Amount) -> SessionResult<u64> {
    if amount <= 0 {
        return Err(SessionError::InvalidAmount { amount });
    }
    Ok(amount.unsigned_abs())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_withdraw() {
        let mut ledger = SessionLedger::new(Balance::new(1000));
        assert_eq!(ledger.withdraw(300), Ok(Balance::new(700)));
        assert_eq!(
            ledger.withdraw(800),
            Err(SessionError::InsufficientFunds {
                requested: 800,
                available: Balance::new(700)
            })
        );
        assert_eq!(ledger.balance(), Balance::new(700));
    }

    #[test]
    fn test_withdraw_entire_balance() {
        let mut ledger = SessionLedger::new(Balance::new(50));
        assert_eq!(ledger.withdraw(50), Ok(Balance::ZERO));
    }

    #[test]
    fn test_non_positive_amounts() {
        let mut ledger = SessionLedger::new(Balance::new(100));
        for amount in [0, -5, i64::MIN] {
            assert_eq!(ledger.deposit(amount), Err(SessionError::InvalidAmount { amount }));
            assert_eq!(ledger.withdraw(amount), Err(SessionError::InvalidAmount { amount }));
        }
        assert_eq!(ledger.balance(), Balance::new(100));
    }

    #[test]
    fn test_deposit_overflow() {
        let mut ledger = SessionLedger::new(Balance::new(u64::MAX));
        let err = ledger.deposit(1).unwrap_err();
        assert_eq!(
            err,
            SessionError::AmountOverflow {
                amount: 1,
                balance: Balance::new(u64::MAX)
            }
        );
        assert_eq!(err.kind(), teller_types::ErrorKind::InvalidAmount);
        assert!(!err.to_string().contains("positive"));
        assert_eq!(ledger.balance(), Balance::new(u64::MAX));
    }
}
