//! Session controller core runtime

use uuid::Uuid;

use teller_types::{
    Amount, Balance, Outcome, SessionError, SessionEvent, SessionResult, SessionState,
};

use crate::config::{ConfigError, SessionConfig};
use crate::ledger::SessionLedger;
use crate::pin::{PinCheck, PinGuard};
use crate::trace::SessionTrace;

/// Drives one teller session: card, PIN, transaction, eject.
///
/// Every event is handled to completion and answered with an [`Outcome`];
/// nothing is ever silently ignored. The controller is not meant to be
/// shared between threads; use one instance per session.
#[derive(Debug)]
pub struct SessionController {
    session_id: Uuid,
    state: SessionState,
    pin: PinGuard,
    ledger: SessionLedger,
    trace: SessionTrace,
}

impl SessionController {
    pub fn new(config: SessionConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let session_id = Uuid::new_v4();
        tracing::debug!(
            session_id = %session_id,
            max_pin_attempts = config.max_pin_attempts,
            opening_balance = config.opening_balance,
            "Session created"
        );
        Ok(Self {
            session_id,
            state: SessionState::Idle,
            pin: PinGuard::new(&config.stored_pin, config.max_pin_attempts),
            ledger: SessionLedger::new(Balance::new(config.opening_balance)),
            trace: SessionTrace::new(session_id, config.trace_max_entries),
        })
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn pin_attempts(&self) -> u32 {
        self.pin.attempts()
    }

    pub fn max_pin_attempts(&self) -> u32 {
        self.pin.max_attempts()
    }

    pub fn balance(&self) -> Balance {
        self.ledger.balance()
    }

    pub fn trace(&self) -> &SessionTrace {
        &self.trace
    }

    /// Feed one event into the session.
    pub fn handle(&mut self, event: SessionEvent) -> Outcome {
        let from = self.state;
        let outcome = match self.apply(&event) {
            Ok(outcome) => outcome,
            Err(err) => {
                match &err {
                    SessionError::AuthenticationFailed { attempts_remaining } => {
                        tracing::warn!(
                            session_id = %self.session_id,
                            attempts = self.pin.attempts(),
                            attempts_remaining = *attempts_remaining,
                            "PIN check failed"
                        );
                    }
                    other => {
                        tracing::debug!(
                            session_id = %self.session_id,
                            state = %self.state,
                            event = event.name(),
                            error = ?other.kind(),
                            "Event rejected"
                        );
                    }
                }
                Outcome::rejected(self.state, &err)
            }
        };
        self.trace.record(&event, from, self.state, outcome.error);
        outcome
    }

    pub fn insert_card(&mut self) -> Outcome {
        self.handle(SessionEvent::CardInserted)
    }

    pub fn submit_pin(&mut self, pin: impl Into<String>) -> Outcome {
        self.handle(SessionEvent::pin(pin))
    }

    pub fn select_transaction(&mut self) -> Outcome {
        self.handle(SessionEvent::SelectTransaction)
    }

    pub fn withdraw(&mut self, amount: Amount) -> Outcome {
        self.handle(SessionEvent::withdraw(amount))
    }

    pub fn deposit(&mut self, amount: Amount) -> Outcome {
        self.handle(SessionEvent::deposit(amount))
    }

    pub fn balance_inquiry(&mut self) -> Outcome {
        self.handle(SessionEvent::BalanceInquiry)
    }

    pub fn finish_transaction(&mut self) -> Outcome {
        self.handle(SessionEvent::TransactionDone)
    }

    pub fn eject_card(&mut self) -> Outcome {
        self.handle(SessionEvent::CardEjected)
    }

    pub fn reset_lockout(&mut self) -> Outcome {
        self.handle(SessionEvent::ResetLockout)
    }

    fn apply(&mut self, event: &SessionEvent) -> SessionResult<Outcome> {
        use SessionEvent as E;
        use SessionState as S;

        match (self.state, event) {
            (S::Locked, E::ResetLockout) => {
                self.pin.reset();
                self.transition(S::Idle, event);
                Ok(Outcome::accepted(S::Idle, "PIN attempts reset. Card is unlocked."))
            }
            (S::Locked, _) => Err(SessionError::LockedOut),

            (S::Idle, E::CardInserted) => {
                self.pin.reset();
                self.transition(S::CardInserted, event);
                Ok(Outcome::accepted(S::CardInserted, "Card inserted. Please enter your PIN.")
                    .with_attempts_remaining(self.pin.attempts_remaining()))
            }

            (S::CardInserted, E::PinSubmitted { pin }) => self.authenticate(pin, event),

            (S::PinVerified, E::SelectTransaction) => {
                self.transition(S::TransactionActive, event);
                Ok(Outcome::accepted(
                    S::TransactionActive,
                    "Transaction selected. You may withdraw, deposit or check your balance.",
                ))
            }

            (S::TransactionActive, E::Withdraw { amount }) => {
                let balance = self.ledger.withdraw(*amount)?;
                tracing::info!(session_id = %self.session_id, amount, balance = balance.units(), "Withdrawal");
                Ok(Outcome::accepted(
                    S::TransactionActive,
                    format!("Withdrew {} units. New balance: {}.", amount, balance),
                )
                .with_balance(balance))
            }
            (S::TransactionActive, E::Deposit { amount }) => {
                let balance = self.ledger.deposit(*amount)?;
                tracing::info!(session_id = %self.session_id, amount, balance = balance.units(), "Deposit");
                Ok(Outcome::accepted(
                    S::TransactionActive,
                    format!("Deposited {} units. New balance: {}.", amount, balance),
                )
                .with_balance(balance))
            }
            (S::TransactionActive, E::BalanceInquiry) => {
                let balance = self.ledger.balance();
                tracing::debug!(session_id = %self.session_id, balance = balance.units(), "Balance inquiry");
                Ok(Outcome::accepted(S::TransactionActive, format!("Current balance: {}.", balance))
                    .with_balance(balance))
            }
            (S::TransactionActive, E::TransactionDone) => {
                self.transition(S::Completed, event);
                Ok(Outcome::accepted(S::Completed, "Transaction completed. Please eject your card.")
                    .with_balance(self.ledger.balance()))
            }

            (S::Completed, E::CardEjected) => {
                self.pin.reset();
                self.transition(S::Idle, event);
                Ok(Outcome::accepted(S::Idle, "Card ejected. Returning to idle state."))
            }

            (state, event) if state != S::Idle && event.is_money_operation() => {
                Err(SessionError::InvalidState { state })
            }
            (state, event) => Err(SessionError::InvalidEvent {
                state,
                event: event.name(),
            }),
        }
    }

    fn authenticate(&mut self, submitted: &str, event: &SessionEvent) -> SessionResult<Outcome> {
        match self.pin.check(submitted) {
            PinCheck::Verified => {
                self.transition(SessionState::PinVerified, event);
                Ok(Outcome::accepted(
                    SessionState::PinVerified,
                    "PIN verified. You can now select a transaction.",
                ))
            }
            PinCheck::Rejected { attempts_remaining } => {
                Err(SessionError::AuthenticationFailed { attempts_remaining })
            }
            PinCheck::Exhausted => {
                self.transition(SessionState::Locked, event);
                tracing::warn!(
                    session_id = %self.session_id,
                    attempts = self.pin.attempts(),
                    "Card locked due to failed PIN attempts"
                );
                Err(SessionError::AuthenticationFailed { attempts_remaining: 0 })
            }
        }
    }

    fn transition(&mut self, to: SessionState, event: &SessionEvent) {
        tracing::info!(
            session_id = %self.session_id,
            from = %self.state,
            to = %to,
            event = event.name(),
            "Session transition"
        );
        self.state = to;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use teller_types::ErrorKind;

    fn controller(balance: u64) -> SessionController {
        SessionController::new(SessionConfig::new("1234", balance)).unwrap()
    }

    fn active(balance: u64) -> SessionController {
        let mut c = controller(balance);
        assert!(c.insert_card().success);
        assert!(c.submit_pin("1234").success);
        assert!(c.select_transaction().success);
        c
    }

    #[test]
    fn test_rejects_invalid_config() {
        let err = SessionController::new(SessionConfig::new("12", 0)).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPin { .. }));
    }

    #[test]
    fn test_full_cycle_returns_to_idle() {
        let mut c = active(100);
        let outcome = c.finish_transaction();
        assert_eq!(outcome.state, SessionState::Completed);
        assert_eq!(outcome.balance, Some(Balance::new(100)));
        let outcome = c.eject_card();
        assert!(outcome.success);
        assert_eq!(c.state(), SessionState::Idle);
        assert_eq!(c.pin_attempts(), 0);
    }

    #[test]
    fn test_successful_pin_resets_attempts() {
        let mut c = controller(0);
        c.insert_card();
        c.submit_pin("9999");
        assert_eq!(c.pin_attempts(), 1);
        let outcome = c.submit_pin("1234");
        assert!(outcome.success);
        assert_eq!(outcome.state, SessionState::PinVerified);
        assert_eq!(c.pin_attempts(), 0);
    }

    #[test]
    fn test_rejection_message_is_state_guidance() {
        let mut c = controller(0);
        c.insert_card();
        let outcome = c.select_transaction();
        assert!(outcome.is_error(ErrorKind::InvalidEvent));
        assert_eq!(outcome.message, "Please enter your PIN.");
        assert_eq!(c.state(), SessionState::CardInserted);
    }

    #[test]
    fn test_money_ops_outside_transaction_are_invalid_state() {
        let mut c = controller(50);
        c.insert_card();
        c.submit_pin("1234");
        let outcome = c.withdraw(10);
        assert!(outcome.is_error(ErrorKind::InvalidState));
        assert_eq!(c.balance(), Balance::new(50));
        assert_eq!(c.state(), SessionState::PinVerified);
    }

    #[test]
    fn test_locked_rejects_everything_but_reset() {
        let mut c = SessionController::new(SessionConfig::new("1234", 0).with_max_pin_attempts(1))
            .unwrap();
        c.insert_card();
        let outcome = c.submit_pin("0000");
        assert_eq!(outcome.state, SessionState::Locked);
        assert_eq!(outcome.attempts_remaining, Some(0));

        for outcome in [c.submit_pin("1234"), c.insert_card(), c.eject_card(), c.balance_inquiry()] {
            assert!(outcome.is_error(ErrorKind::LockedOut));
            assert_eq!(outcome.state, SessionState::Locked);
        }
        assert_eq!(c.pin_attempts(), 1);
        assert!(c.reset_lockout().success);
        assert_eq!(c.state(), SessionState::Idle);
    }

    #[test]
    fn test_trace_records_every_event() {
        let mut c = active(10);
        c.withdraw(100);
        assert_eq!(c.trace().len(), 4);
        let last = c.trace().last().unwrap();
        assert_eq!(last.error, Some(ErrorKind::InsufficientFunds));
        assert_eq!(last.from, SessionState::TransactionActive);
        assert_eq!(last.to, SessionState::TransactionActive);
    }
}
