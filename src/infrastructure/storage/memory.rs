//! In-memory log store for development and testing

use std::sync::Mutex;

use async_trait::async_trait;

use super::traits::{CheckoutPatch, LogStore};
use crate::domain::{DomainError, DomainResult, LogRecord, Session, SlotId};

/// In-memory [`LogStore`]. Rows are kept newest-first, matching the
/// presentation order of the durable store.
pub struct InMemoryLogStore {
    inner: Mutex<Inner>,
}

struct Inner {
    rows: Vec<LogRecord>,
    next_id: i32,
}

impl InMemoryLogStore {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                rows: Vec::new(),
                next_id: 1,
            }),
        }
    }
}

impl Default for InMemoryLogStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LogStore for InMemoryLogStore {
    async fn append(&self, session: Session) -> DomainResult<LogRecord> {
        let mut inner = self.inner.lock().expect("log store lock poisoned");
        let record = LogRecord {
            id: inner.next_id,
            session,
        };
        inner.next_id += 1;
        inner.rows.insert(0, record.clone());
        Ok(record)
    }

    async fn update_by_slot(&self, slot: &SlotId, patch: CheckoutPatch) -> DomainResult<LogRecord> {
        let mut inner = self.inner.lock().expect("log store lock poisoned");
        let row = inner
            .rows
            .iter_mut()
            .find(|r| r.session.slot == *slot && r.session.is_active())
            .ok_or_else(|| DomainError::ActiveRowNotFound(slot.clone()))?;
        row.session.check_out(patch.time_out, patch.fee);
        Ok(row.clone())
    }

    async fn list_all(&self) -> DomainResult<Vec<LogRecord>> {
        let inner = self.inner.lock().expect("log store lock poisoned");
        Ok(inner.rows.clone())
    }

    async fn replace_all(&self, rows: Vec<LogRecord>) -> DomainResult<()> {
        let mut inner = self.inner.lock().expect("log store lock poisoned");
        inner.next_id = rows.iter().map(|r| r.id).max().unwrap_or(0) + 1;
        inner.rows = rows;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{SessionStatus, StickerStatus, VehicleCategory};
    use chrono::{Duration, Utc};

    fn session(slot: &str) -> Session {
        Session::new(
            SlotId::parse(slot).unwrap(),
            StickerStatus::Valid,
            VehicleCategory::LightVehicle,
            "Honda Civic",
            "XYZ-987",
            Utc::now(),
        )
    }

    #[tokio::test]
    async fn list_is_newest_first() {
        let store = InMemoryLogStore::new();
        store.append(session("A1")).await.unwrap();
        store.append(session("B2")).await.unwrap();

        let rows = store.list_all().await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].session.slot.to_string(), "B2");
        assert_eq!(rows[1].session.slot.to_string(), "A1");
        assert!(rows[0].id > rows[1].id);
    }

    #[tokio::test]
    async fn update_by_slot_finalizes_only_the_active_row() {
        let store = InMemoryLogStore::new();
        let time_in = Utc::now();
        store.append(session("A1")).await.unwrap();

        let patch = CheckoutPatch {
            time_out: time_in + Duration::hours(2),
            fee: 50,
        };
        let updated = store
            .update_by_slot(&SlotId::parse("A1").unwrap(), patch)
            .await
            .unwrap();
        assert_eq!(updated.session.status, SessionStatus::CheckedOut);
        assert_eq!(updated.session.fee, Some(50));

        // No active row remains, a second update must fail
        let err = store
            .update_by_slot(&SlotId::parse("A1").unwrap(), patch)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::ActiveRowNotFound(_)));
    }

    #[tokio::test]
    async fn update_by_slot_targets_newest_active_row() {
        let store = InMemoryLogStore::new();
        // Historical checked-out row for A1, then a fresh active one
        store.append(session("A1")).await.unwrap();
        store
            .update_by_slot(
                &SlotId::parse("A1").unwrap(),
                CheckoutPatch {
                    time_out: Utc::now(),
                    fee: 50,
                },
            )
            .await
            .unwrap();
        let fresh = store.append(session("A1")).await.unwrap();

        let updated = store
            .update_by_slot(
                &SlotId::parse("A1").unwrap(),
                CheckoutPatch {
                    time_out: Utc::now(),
                    fee: 70,
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.id, fresh.id);
    }

    #[tokio::test]
    async fn replace_all_round_trip_is_noop() {
        let store = InMemoryLogStore::new();
        store.append(session("A1")).await.unwrap();
        store.append(session("C3")).await.unwrap();

        let before = store.list_all().await.unwrap();
        store.replace_all(before.clone()).await.unwrap();
        let after = store.list_all().await.unwrap();
        assert_eq!(before, after);

        // Ids keep incrementing past the replaced content
        let next = store.append(session("D4")).await.unwrap();
        assert!(next.id > before[0].id);
    }
}
