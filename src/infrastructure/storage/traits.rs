//! Log store trait definition

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{DomainResult, LogRecord, Session, SlotId};

/// Checkout fields applied to the active log row of a slot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CheckoutPatch {
    pub time_out: DateTime<Utc>,
    pub fee: i64,
}

/// Durable, append-ordered store of session rows: the source of truth.
///
/// Calls cross the persistence boundary and may fail independently of
/// in-memory state; callers treat them as suspending points.
#[async_trait]
pub trait LogStore: Send + Sync {
    /// Append a new row, returning it with its assigned id.
    async fn append(&self, session: Session) -> DomainResult<LogRecord>;

    /// Finalize the currently active (Occupied) row for a slot.
    ///
    /// Fails with [`DomainError::ActiveRowNotFound`] when no active row
    /// exists; never touches more than one row.
    ///
    /// [`DomainError::ActiveRowNotFound`]: crate::domain::DomainError::ActiveRowNotFound
    async fn update_by_slot(&self, slot: &SlotId, patch: CheckoutPatch) -> DomainResult<LogRecord>;

    /// All rows, newest append first.
    async fn list_all(&self) -> DomainResult<Vec<LogRecord>>;

    /// Bulk overwrite during reconciliation with a remote source of truth.
    ///
    /// Rows arrive in presentation order (newest first), as produced by
    /// [`list_all`](Self::list_all); `replace_all(list_all())` is a no-op.
    async fn replace_all(&self, rows: Vec<LogRecord>) -> DomainResult<()>;
}
