//! Events fed into a session by the presentation shell.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::amount::Amount;

/// A discrete input to the session controller.
///
/// Each event carries at most one payload: a PIN or an amount.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SessionEvent {
    CardInserted,
    PinSubmitted { pin: String },
    SelectTransaction,
    Withdraw { amount: Amount },
    Deposit { amount: Amount },
    BalanceInquiry,
    TransactionDone,
    CardEjected,
    ResetLockout,
}

impl SessionEvent {
    pub fn pin(pin: impl Into<String>) -> Self {
        SessionEvent::PinSubmitted { pin: pin.into() }
    }

    pub fn withdraw(amount: Amount) -> Self {
        SessionEvent::Withdraw { amount }
    }

    pub fn deposit(amount: Amount) -> Self {
        SessionEvent::Deposit { amount }
    }

    /// Wire name of the event, also used in logs and traces.
    pub fn name(&self) -> &'static str {
        match self {
            SessionEvent::CardInserted        => "card_inserted",
            SessionEvent::PinSubmitted { .. } => "pin_submitted",
            SessionEvent::SelectTransaction   => "select_transaction",
            SessionEvent::Withdraw { .. }     => "withdraw",
            SessionEvent::Deposit { .. }      => "deposit",
            SessionEvent::BalanceInquiry      => "balance_inquiry",
            SessionEvent::TransactionDone     => "transaction_done",
            SessionEvent::CardEjected         => "card_ejected",
            SessionEvent::ResetLockout        => "reset_lockout",
        }
    }

    /// Withdraw, deposit and balance inquiry.
    pub fn is_money_operation(&self) -> bool {
        matches!(
            self,
            SessionEvent::Withdraw { .. } | SessionEvent::Deposit { .. } | SessionEvent::BalanceInquiry
        )
    }

    /// Copy of the event with any PIN payload blanked out.
    pub fn redacted(&self) -> Self {
        match self {
            SessionEvent::PinSubmitted { .. } => SessionEvent::PinSubmitted {
                pin: "****".to_string(),
            },
            other => other.clone(),
        }
    }
}

// PINs must never end up in logs via `{:?}`.
impl fmt::Debug for SessionEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionEvent::PinSubmitted { .. } => f
                .debug_struct("PinSubmitted")
                .field("pin", &"****")
                .finish(),
            SessionEvent::Withdraw { amount } => {
                f.debug_struct("Withdraw").field("amount", amount).finish()
            }
            SessionEvent::Deposit { amount } => {
                f.debug_struct("Deposit").field("amount", amount).finish()
            }
            SessionEvent::CardInserted => f.write_str("CardInserted"),
            SessionEvent::SelectTransaction => f.write_str("SelectTransaction"),
            SessionEvent::BalanceInquiry => f.write_str("BalanceInquiry"),
            SessionEvent::TransactionDone => f.write_str("TransactionDone"),
            SessionEvent::CardEjected => f.write_str("CardEjected"),
            SessionEvent::ResetLockout => f.write_str("ResetLockout"),
        }
    }
}

impl fmt::Display for SessionEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_hides_pin() {
        let rendered = format!("{:?}", SessionEvent::pin("4321"));
        assert!(!rendered.contains("4321"));
        assert!(rendered.contains("****"));
    }

    #[test]
    fn test_wire_format() {
        let json = serde_json::to_value(SessionEvent::withdraw(300)).unwrap();
        assert_eq!(json, serde_json::json!({"event": "withdraw", "amount": 300}));

        let parsed: SessionEvent = serde_json::from_str(r#"{"event":"card_inserted"}"#).unwrap();
        assert_eq!(parsed, SessionEvent::CardInserted);

        let parsed: SessionEvent =
            serde_json::from_str(r#"{"event":"pin_submitted","pin":"0000"}"#).unwrap();
        assert_eq!(parsed, SessionEvent::pin("0000"));
    }

    #[test]
    fn test_name_matches_serde_tag() {
        let events = [
            SessionEvent::CardInserted,
            SessionEvent::pin("1"),
            SessionEvent::SelectTransaction,
            SessionEvent::withdraw(1),
            SessionEvent::deposit(1),
            SessionEvent::BalanceInquiry,
            SessionEvent::TransactionDone,
            SessionEvent::CardEjected,
            SessionEvent::ResetLockout,
        ];
        for event in events {
            let json = serde_json::to_value(&event).unwrap();
            assert_eq!(json["event"], event.name());
        }
    }

    #[test]
    fn test_money_operations() {
        assert!(SessionEvent::BalanceInquiry.is_money_operation());
        assert!(SessionEvent::deposit(5).is_money_operation());
        assert!(!SessionEvent::TransactionDone.is_money_operation());
    }

    #[test]
    fn test_redacted_keeps_other_payloads() {
        assert_eq!(SessionEvent::withdraw(9).redacted(), SessionEvent::withdraw(9));
        assert_eq!(SessionEvent::pin("1234").redacted(), SessionEvent::pin("****"));
    }
}
