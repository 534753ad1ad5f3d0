//! Domain errors

use thiserror::Error;

use super::slot::SlotId;

/// Domain-level error types
#[derive(Debug, Clone, Error)]
pub enum DomainError {
    /// Missing/empty required field or malformed input
    #[error("Validation: {0}")]
    Validation(String),

    /// Check-in attempted while the slot holds an active session
    #[error("Slot {0} is already occupied")]
    SlotOccupied(SlotId),

    /// Check-out attempted on a slot without an active session
    #[error("Slot {0} is vacant")]
    SlotVacant(SlotId),

    /// Another operation on the same slot is still in flight
    #[error("Slot {0} has an operation in progress")]
    SlotBusy(SlotId),

    /// The log holds no active row for the slot to finalize
    #[error("No active log row for slot {0}")]
    ActiveRowNotFound(SlotId),

    /// Row-store request failed; in-memory state was left untouched
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// Shared snapshot medium unreadable or corrupt. Non-fatal: observers
    /// log it and keep their last-known state.
    #[error("Sync error: {0}")]
    Sync(String),
}

impl DomainError {
    /// True for the state-machine guard errors (occupied/vacant/busy).
    pub fn is_state_error(&self) -> bool {
        matches!(
            self,
            Self::SlotOccupied(_) | Self::SlotVacant(_) | Self::SlotBusy(_)
        )
    }
}

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;
