//! In-memory slot occupancy state
//!
//! Derived cache over the log's active rows: holds a session per slot only
//! while the slot is occupied. Rebuilt from the durable log on startup and
//! after reconciliation; the lifecycle controller keeps it consistent with
//! the log after every operation.

use std::collections::BTreeMap;

use dashmap::DashMap;
use serde::Serialize;

use crate::domain::{LogRecord, Session, SlotId, TOTAL_SLOTS};

/// Occupancy counters for the fixed grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OccupancyStats {
    pub occupied: usize,
    pub available: usize,
    pub total: usize,
}

/// Map of slot id -> active session
pub struct SlotStateStore {
    active: DashMap<SlotId, Session>,
}

impl SlotStateStore {
    pub fn new() -> Self {
        Self {
            active: DashMap::new(),
        }
    }

    pub fn is_occupied(&self, slot: &SlotId) -> bool {
        self.active.contains_key(slot)
    }

    pub fn get(&self, slot: &SlotId) -> Option<Session> {
        self.active.get(slot).map(|s| s.clone())
    }

    pub fn insert(&self, session: Session) {
        self.active.insert(session.slot.clone(), session);
    }

    pub fn remove(&self, slot: &SlotId) -> Option<Session> {
        self.active.remove(slot).map(|(_, s)| s)
    }

    pub fn occupied_count(&self) -> usize {
        self.active.len()
    }

    pub fn stats(&self) -> OccupancyStats {
        let occupied = self.occupied_count();
        OccupancyStats {
            occupied,
            available: TOTAL_SLOTS - occupied,
            total: TOTAL_SLOTS,
        }
    }

    /// Serializable view of the active map, keyed by display id.
    pub fn snapshot(&self) -> BTreeMap<String, Session> {
        self.active
            .iter()
            .map(|entry| (entry.key().to_string(), entry.value().clone()))
            .collect()
    }

    /// Re-derive the active map from log rows (reconciliation).
    ///
    /// The log is newest-first; with at most one active row per slot the
    /// insertion order does not matter.
    pub fn rebuild(&self, rows: &[LogRecord]) {
        self.active.clear();
        for record in rows {
            if record.session.is_active() {
                self.insert(record.session.clone());
            }
        }
    }
}

impl Default for SlotStateStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{SessionStatus, StickerStatus, VehicleCategory};
    use chrono::Utc;

    fn record(id: i32, slot: &str, status: SessionStatus) -> LogRecord {
        let mut session = Session::new(
            SlotId::parse(slot).unwrap(),
            StickerStatus::None,
            VehicleCategory::Motorcycle,
            "Suzuki Raider",
            "MC-1000",
            Utc::now(),
        );
        if status == SessionStatus::CheckedOut {
            session.check_out(Utc::now(), 50);
        }
        LogRecord { id, session }
    }

    #[test]
    fn stats_reflect_fixed_grid() {
        let store = SlotStateStore::new();
        assert_eq!(
            store.stats(),
            OccupancyStats {
                occupied: 0,
                available: 20,
                total: 20
            }
        );

        store.insert(record(1, "A1", SessionStatus::Occupied).session);
        let stats = store.stats();
        assert_eq!(stats.occupied, 1);
        assert_eq!(stats.available, 19);
    }

    #[test]
    fn rebuild_keeps_only_active_rows() {
        let store = SlotStateStore::new();
        store.insert(record(99, "D5", SessionStatus::Occupied).session);

        let rows = vec![
            record(3, "B2", SessionStatus::Occupied),
            record(2, "A1", SessionStatus::CheckedOut),
            record(1, "C4", SessionStatus::Occupied),
        ];
        store.rebuild(&rows);

        assert_eq!(store.occupied_count(), 2);
        assert!(store.is_occupied(&SlotId::parse("B2").unwrap()));
        assert!(store.is_occupied(&SlotId::parse("C4").unwrap()));
        assert!(!store.is_occupied(&SlotId::parse("A1").unwrap()));
        // Stale entry from before the rebuild is gone
        assert!(!store.is_occupied(&SlotId::parse("D5").unwrap()));
    }

    #[test]
    fn snapshot_is_keyed_by_display_id() {
        let store = SlotStateStore::new();
        store.insert(record(1, "B3", SessionStatus::Occupied).session);
        let snapshot = store.snapshot();
        assert!(snapshot.contains_key("B3"));
        assert_eq!(snapshot.len(), 1);
    }
}
