//! Deterministic teller demo harness
//!
//! Stands in for the presentation shell: draws a seeded opening balance,
//! replays scripted events against a fresh controller and collects the
//! outcomes a shell would render.

use std::ops::RangeInclusive;
use std::path::Path;
use std::sync::Once;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use teller_session::{ConfigError, Outcome, SessionConfig, SessionController, SessionEvent, SessionTrace};

/// Opening balance range used when a script asks for a random start.
pub const DEFAULT_OPENING_RANGE: RangeInclusive<u64> = 100..=5_000;

#[derive(Debug, Error)]
pub enum DemoError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("script parse error: {0}")]
    Script(#[from] serde_json::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Draw an opening balance from `range` using a seeded RNG, so the
/// "random" starting balance is reproducible.
pub fn opening_balance_from_seed(seed: u64, range: RangeInclusive<u64>) -> u64 {
    let mut rng = StdRng::seed_from_u64(seed);
    rng.gen_range(range)
}

/// A scripted session: optional config, optional balance seed, events.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionScript {
    pub config: Option<SessionConfig>,
    /// Overrides `config.opening_balance` with a seeded draw when set.
    pub balance_seed: Option<u64>,
    pub events: Vec<SessionEvent>,
}

impl SessionScript {
    pub fn from_json(json: &str) -> Result<Self, DemoError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: &Path) -> Result<Self, DemoError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw)
    }
}

/// Everything a run produced.
#[derive(Debug, Clone, Serialize)]
pub struct DemoRun {
    pub opening_balance: u64,
    pub outcomes: Vec<Outcome>,
    pub trace: SessionTrace,
}

impl DemoRun {
    pub fn final_outcome(&self) -> Option<&Outcome> {
        self.outcomes.last()
    }
}

#[derive(Debug, Clone, Default)]
pub struct DemoRunner {
    base_config: SessionConfig,
}

impl DemoRunner {
    pub fn new(base_config: SessionConfig) -> Self {
        Self { base_config }
    }

    /// Load `.env` if present, then build the base config from `TELLER_*` vars.
    pub fn from_env() -> Result<Self, DemoError> {
        let _ = dotenvy::dotenv();
        Ok(Self::new(SessionConfig::from_env()?))
    }

    pub fn base_config(&self) -> &SessionConfig {
        &self.base_config
    }

    pub fn run(&self, script: &SessionScript) -> Result<DemoRun, DemoError> {
        let mut config = script.config.clone().unwrap_or_else(|| self.base_config.clone());
        if let Some(seed) = script.balance_seed {
            config.opening_balance = opening_balance_from_seed(seed, DEFAULT_OPENING_RANGE);
        }
        let opening_balance = config.opening_balance;

        let mut controller = SessionController::new(config)?;
        tracing::info!(
            session_id = %controller.session_id(),
            events = script.events.len(),
            opening_balance,
            "Running scripted session"
        );

        let outcomes: Vec<Outcome> = script
            .events
            .iter()
            .cloned()
            .map(|event| controller.handle(event))
            .collect();

        Ok(DemoRun {
            opening_balance,
            outcomes,
            trace: controller.trace().clone(),
        })
    }
}

static TRACING: Once = Once::new();

/// Install a stderr fmt subscriber filtered by `RUST_LOG` (default `info`).
/// Safe to call more than once.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
        let _ = tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_env_filter(filter)
            .try_init();
    });
}
