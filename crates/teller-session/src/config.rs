//! Session configuration
//!
//! Everything the controller needs to start a session is injected here,
//! including the opening balance, so that sessions are deterministic.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default number of PIN attempts before lockout.
pub const DEFAULT_MAX_PIN_ATTEMPTS: u32 = 3;
/// Default bound on retained trace entries.
pub const DEFAULT_TRACE_MAX_ENTRIES: usize = 256;

const MIN_PIN_LENGTH: usize = 4;
const MAX_PIN_LENGTH: usize = 12;

/// Configuration errors, surfaced when building a controller.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("stored PIN must be {min}-{max} ASCII digits")]
    InvalidPin { min: usize, max: usize },

    #[error("max_pin_attempts must be at least 1")]
    NoPinAttempts,

    #[error("trace_max_entries must be at least 1 when set")]
    EmptyTrace,

    #[error("invalid value for {var}: '{value}'")]
    InvalidEnv { var: &'static str, value: String },
}

/// Per-session configuration.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SessionConfig {
    /// Reference credential issued with the card
    pub stored_pin: String,
    /// Failed PIN checks allowed before the card locks
    pub max_pin_attempts: u32,
    /// Starting balance in whole units
    pub opening_balance: u64,
    /// Cap on retained trace entries (`None` keeps everything)
    pub trace_max_entries: Option<usize>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            stored_pin: "1234".to_string(),
            max_pin_attempts: DEFAULT_MAX_PIN_ATTEMPTS,
            opening_balance: 0,
            trace_max_entries: Some(DEFAULT_TRACE_MAX_ENTRIES),
        }
    }
}

impl fmt::Debug for SessionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionConfig")
            .field("stored_pin", &"****")
            .field("max_pin_attempts", &self.max_pin_attempts)
            .field("opening_balance", &self.opening_balance)
            .field("trace_max_entries", &self.trace_max_entries)
            .finish()
    }
}

impl SessionConfig {
    pub fn new(stored_pin: impl Into<String>, opening_balance: u64) -> Self {
        Self {
            stored_pin: stored_pin.into(),
            opening_balance,
            ..Self::default()
        }
    }

    pub fn with_max_pin_attempts(mut self, max: u32) -> Self {
        self.max_pin_attempts = max;
        self
    }

    pub fn with_trace_max_entries(mut self, max: Option<usize>) -> Self {
        self.trace_max_entries = max;
        self
    }

    /// Create config from environment variables
    ///
    /// Reads `TELLER_PIN`, `TELLER_MAX_PIN_ATTEMPTS`, `TELLER_OPENING_BALANCE`
    /// and `TELLER_TRACE_MAX_ENTRIES`. Unset variables fall back to defaults;
    /// set but unparsable ones are an error.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Same as [`from_env`](Self::from_env) but with an injectable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let config = Self {
            stored_pin: lookup("TELLER_PIN").unwrap_or(defaults.stored_pin),
            max_pin_attempts: parse_var(&lookup, "TELLER_MAX_PIN_ATTEMPTS")?
                .unwrap_or(defaults.max_pin_attempts),
            opening_balance: parse_var(&lookup, "TELLER_OPENING_BALANCE")?
                .unwrap_or(defaults.opening_balance),
            trace_max_entries: match lookup("TELLER_TRACE_MAX_ENTRIES").as_deref() {
                None => defaults.trace_max_entries,
                Some("none") | Some("") => None,
                Some(_) => parse_var(&lookup, "TELLER_TRACE_MAX_ENTRIES")?,
            },
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let len = self.stored_pin.len();
        if !(MIN_PIN_LENGTH..=MAX_PIN_LENGTH).contains(&len)
            || !self.stored_pin.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(ConfigError::InvalidPin {
                min: MIN_PIN_LENGTH,
                max: MAX_PIN_LENGTH,
            });
        }
        if self.max_pin_attempts == 0 {
            return Err(ConfigError::NoPinAttempts);
        }
        if self.trace_max_entries == Some(0) {
            return Err(ConfigError::EmptyTrace);
        }
        Ok(())
    }
}

fn parse_var<F, T>(lookup: &F, var: &'static str) -> Result<Option<T>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(var) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidEnv { var, value }),
    }
}
