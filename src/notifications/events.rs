//! Change notification events
//!
//! Published on every committed log write so that other observer views can
//! refresh their mirror of the shared snapshot.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{CheckoutSummary, LogRecord};

/// Event types broadcast to observers
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum Event {
    /// A vehicle checked in and a new log row was appended
    SessionCheckedIn(SessionCheckedInEvent),
    /// A session was finalized and its log row updated
    SessionCheckedOut(SessionCheckedOutEvent),
    /// The whole log was overwritten during reconciliation
    LogReplaced(LogReplacedEvent),
}

impl Event {
    /// Get the event type name
    pub fn event_type(&self) -> &'static str {
        match self {
            Event::SessionCheckedIn(_) => "session_checked_in",
            Event::SessionCheckedOut(_) => "session_checked_out",
            Event::LogReplaced(_) => "log_replaced",
        }
    }

    /// Get the slot id if applicable
    pub fn slot_id(&self) -> Option<String> {
        match self {
            Event::SessionCheckedIn(e) => Some(e.record.session.slot.to_string()),
            Event::SessionCheckedOut(e) => Some(e.summary.slot.to_string()),
            Event::LogReplaced(_) => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionCheckedInEvent {
    pub record: LogRecord,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionCheckedOutEvent {
    pub summary: CheckoutSummary,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogReplacedEvent {
    pub row_count: usize,
}

/// Event wrapper with metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventMessage {
    pub event: Event,
    pub timestamp: DateTime<Utc>,
}

impl EventMessage {
    pub fn new(event: Event) -> Self {
        Self {
            event,
            timestamp: Utc::now(),
        }
    }
}
