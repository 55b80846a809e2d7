//! Session trace artifacts for replay and audit

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use teller_types::{ErrorKind, SessionEvent, SessionState};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionTraceEvent {
    pub timestamp: DateTime<Utc>,
    /// PIN payloads are redacted before they get here.
    pub event: SessionEvent,
    pub from: SessionState,
    pub to: SessionState,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorKind>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionTrace {
    pub session_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub events: Vec<SessionTraceEvent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_entries: Option<usize>,
}

impl SessionTrace {
    pub fn new(session_id: Uuid, max_entries: Option<usize>) -> Self {
        Self {
            session_id,
            created_at: Utc::now(),
            events: Vec::new(),
            max_entries,
        }
    }

    pub fn record(
        &mut self,
        event: &SessionEvent,
        from: SessionState,
        to: SessionState,
        error: Option<ErrorKind>,
    ) {
        self.events.push(SessionTraceEvent {
            timestamp: Utc::now(),
            event: event.redacted(),
            from,
            to,
            success: error.is_none(),
            error,
        });
        if let Some(max) = self.max_entries {
            if self.events.len() > max {
                let overflow = self.events.len() - max;
                self.events.drain(0..overflow);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn last(&self) -> Option<&SessionTraceEvent> {
        self.events.last()
    }

    /// Same events, transitions and results, ignoring timestamps and ids.
    pub fn is_replayable_with(&self, other: &SessionTrace) -> bool {
        if self.events.len() != other.events.len() {
            return false;
        }
        self.events.iter().zip(other.events.iter()).all(|(a, b)| {
            a.event == b.event && a.from == b.from && a.to == b.to && a.error == b.error
        })
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
