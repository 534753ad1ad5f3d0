//! Observer view synchronization
//!
//! Each open view (staff, admin, ...) holds a read-only mirror of the
//! shared snapshot. The mirror is overwritten unconditionally whenever a
//! change notification arrives or the poll interval elapses; the poll
//! covers notifications lost while the observer was busy or detached.

use std::sync::{Arc, RwLock};
use std::time::Duration;

use log::{debug, warn};
use tokio::task::JoinHandle;

use super::snapshot::{load_snapshot, SharedSnapshot, SnapshotStore};
use crate::domain::{LogRecord, Session};
use crate::notifications::EventSubscriber;

/// One concurrent view over the shared log.
pub struct ViewObserver {
    name: String,
    medium: Arc<dyn SnapshotStore>,
    mirror: RwLock<SharedSnapshot>,
}

impl ViewObserver {
    pub fn new(name: impl Into<String>, medium: Arc<dyn SnapshotStore>) -> Self {
        Self {
            name: name.into(),
            medium,
            mirror: RwLock::new(SharedSnapshot::default()),
        }
    }

    /// Re-read the shared medium and overwrite the local mirror
    /// (last-writer-wins, no merge).
    ///
    /// An unreadable or corrupt medium is logged and swallowed; the
    /// last-known mirror is retained. Returns whether the mirror changed.
    pub async fn refresh(&self) -> bool {
        match load_snapshot(self.medium.as_ref()).await {
            Ok(Some(snapshot)) => {
                let mut mirror = self.mirror.write().expect("observer mirror lock poisoned");
                if *mirror == snapshot {
                    return false;
                }
                debug!(
                    "Observer {} adopted snapshot: {} active slots, {} log rows",
                    self.name,
                    snapshot.slots.len(),
                    snapshot.log.len()
                );
                *mirror = snapshot;
                true
            }
            Ok(None) => false,
            Err(e) => {
                warn!("Observer {} kept last-known snapshot: {}", self.name, e);
                false
            }
        }
    }

    /// Current mirrored log rows, newest first.
    pub fn log_rows(&self) -> Vec<LogRecord> {
        self.mirror
            .read()
            .expect("observer mirror lock poisoned")
            .log
            .clone()
    }

    /// Current mirrored active session for a slot, if any.
    pub fn active_session(&self, slot_id: &str) -> Option<Session> {
        self.mirror
            .read()
            .expect("observer mirror lock poisoned")
            .slots
            .get(slot_id)
            .cloned()
    }

    /// Number of occupied slots in the mirror.
    pub fn occupied_count(&self) -> usize {
        self.mirror
            .read()
            .expect("observer mirror lock poisoned")
            .slots
            .len()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Run the synchronization loop: refresh on every change notification
    /// and on every poll tick, until the event bus closes.
    pub fn spawn(
        self: Arc<Self>,
        mut events: EventSubscriber,
        poll_interval: Duration,
    ) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(poll_interval);
            // First tick fires immediately and seeds the mirror
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        self.refresh().await;
                    }
                    msg = events.recv() => {
                        match msg {
                            Some(msg) => {
                                debug!(
                                    "Observer {} notified: {}",
                                    self.name,
                                    msg.event.event_type()
                                );
                                self.refresh().await;
                            }
                            None => {
                                debug!("Observer {} event bus closed, stopping", self.name);
                                break;
                            }
                        }
                    }
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::domain::{SlotId, StickerStatus, VehicleCategory};
    use crate::sync::snapshot::{store_snapshot, InMemorySnapshotStore, PARKING_DATA_KEY};
    use chrono::Utc;

    fn snapshot(slot: &str, plate: &str) -> SharedSnapshot {
        let session = Session::new(
            SlotId::parse(slot).unwrap(),
            StickerStatus::Valid,
            VehicleCategory::LightVehicle,
            "Ford Ranger",
            plate,
            Utc::now(),
        );
        let mut slots = BTreeMap::new();
        slots.insert(slot.to_string(), session.clone());
        SharedSnapshot::new(slots, vec![LogRecord { id: 1, session }])
    }

    #[tokio::test]
    async fn observer_adopts_published_snapshot() {
        let medium: Arc<dyn SnapshotStore> = Arc::new(InMemorySnapshotStore::new());
        let observer = ViewObserver::new("staff", medium.clone());

        assert!(!observer.refresh().await); // nothing published yet

        store_snapshot(medium.as_ref(), &snapshot("C1", "AAA-111"))
            .await
            .unwrap();
        assert!(observer.refresh().await);
        assert_eq!(observer.occupied_count(), 1);
        assert!(observer.active_session("C1").is_some());
    }

    #[tokio::test]
    async fn last_write_wins_across_observers() {
        let medium: Arc<dyn SnapshotStore> = Arc::new(InMemorySnapshotStore::new());
        let staff = ViewObserver::new("staff", medium.clone());
        let admin = ViewObserver::new("admin", medium.clone());

        // Two writers race on the same slot; the medium keeps only the
        // last completed write and both observers converge on it.
        store_snapshot(medium.as_ref(), &snapshot("C1", "FIRST-1"))
            .await
            .unwrap();
        store_snapshot(medium.as_ref(), &snapshot("C1", "SECOND-2"))
            .await
            .unwrap();

        staff.refresh().await;
        admin.refresh().await;

        let staff_view = staff.active_session("C1").unwrap();
        let admin_view = admin.active_session("C1").unwrap();
        assert_eq!(staff_view.plate_number, "SECOND-2");
        assert_eq!(admin_view.plate_number, "SECOND-2");
    }

    #[tokio::test]
    async fn corrupt_medium_keeps_last_known_mirror() {
        let medium = Arc::new(InMemorySnapshotStore::new());
        let observer = ViewObserver::new("staff", medium.clone() as Arc<dyn SnapshotStore>);

        store_snapshot(medium.as_ref(), &snapshot("D4", "KEEP-42"))
            .await
            .unwrap();
        observer.refresh().await;
        assert_eq!(observer.occupied_count(), 1);

        medium
            .put(PARKING_DATA_KEY, "garbage".to_string())
            .await
            .unwrap();
        assert!(!observer.refresh().await);
        // Mirror untouched
        assert_eq!(observer.active_session("D4").unwrap().plate_number, "KEEP-42");
    }
}
