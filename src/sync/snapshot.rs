//! Shared snapshot medium
//!
//! A string-keyed store visible to every observer view, holding the
//! serialized active slot map and the serialized log under two well-known
//! keys. Writers overwrite both entries after every committed log write;
//! readers adopt whatever they find, last-writer-wins.

use std::collections::BTreeMap;

use async_trait::async_trait;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};

use crate::domain::{DomainError, DomainResult, LogRecord, Session};

/// Key holding the serialized active slot map
pub const PARKING_DATA_KEY: &str = "parking_data";
/// Key holding the serialized log
pub const PARKING_LOGS_KEY: &str = "parking_logs";

/// The broadcast medium: a key-value slot visible to all observers.
///
/// May be unavailable or hold corrupt data independently of the rest of the
/// system; readers must treat failures as non-fatal.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    async fn put(&self, key: &str, value: String) -> DomainResult<()>;
    async fn get(&self, key: &str) -> DomainResult<Option<String>>;
}

/// In-process snapshot store shared between observers via `Arc`.
pub struct InMemorySnapshotStore {
    entries: DashMap<String, String>,
}

impl InMemorySnapshotStore {
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }
}

impl Default for InMemorySnapshotStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SnapshotStore for InMemorySnapshotStore {
    async fn put(&self, key: &str, value: String) -> DomainResult<()> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }

    async fn get(&self, key: &str) -> DomainResult<Option<String>> {
        Ok(self.entries.get(key).map(|v| v.value().clone()))
    }
}

/// Materialized content of the shared medium: active slot map + full log.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SharedSnapshot {
    /// Slot id -> active session, keyed by display id ("A1".."D5")
    pub slots: BTreeMap<String, Session>,
    /// All log rows, newest first
    pub log: Vec<LogRecord>,
}

impl SharedSnapshot {
    pub fn new(slots: BTreeMap<String, Session>, log: Vec<LogRecord>) -> Self {
        Self { slots, log }
    }
}

/// Serialize a snapshot into the two well-known keys of the medium.
pub async fn store_snapshot(
    store: &dyn SnapshotStore,
    snapshot: &SharedSnapshot,
) -> DomainResult<()> {
    let slots = serde_json::to_string(&snapshot.slots)
        .map_err(|e| DomainError::Sync(format!("Failed to serialize slot map: {}", e)))?;
    let log = serde_json::to_string(&snapshot.log)
        .map_err(|e| DomainError::Sync(format!("Failed to serialize log: {}", e)))?;

    store.put(PARKING_DATA_KEY, slots).await?;
    store.put(PARKING_LOGS_KEY, log).await?;
    Ok(())
}

/// Load and deserialize the shared snapshot.
///
/// Returns `Ok(None)` when the medium holds nothing yet; corrupt content is
/// a [`DomainError::Sync`] for the caller to log and swallow.
pub async fn load_snapshot(store: &dyn SnapshotStore) -> DomainResult<Option<SharedSnapshot>> {
    let slots = match store.get(PARKING_DATA_KEY).await? {
        Some(raw) => serde_json::from_str(&raw)
            .map_err(|e| DomainError::Sync(format!("Corrupt slot map in medium: {}", e)))?,
        None => return Ok(None),
    };
    let log = match store.get(PARKING_LOGS_KEY).await? {
        Some(raw) => serde_json::from_str(&raw)
            .map_err(|e| DomainError::Sync(format!("Corrupt log in medium: {}", e)))?,
        None => Vec::new(),
    };
    Ok(Some(SharedSnapshot { slots, log }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{SlotId, StickerStatus, VehicleCategory};
    use chrono::Utc;

    fn snapshot_with_one_slot() -> SharedSnapshot {
        let session = Session::new(
            SlotId::parse("B2").unwrap(),
            StickerStatus::None,
            VehicleCategory::Motorcycle,
            "Yamaha Mio",
            "MC-4521",
            Utc::now(),
        );
        let mut slots = BTreeMap::new();
        slots.insert("B2".to_string(), session.clone());
        SharedSnapshot::new(slots, vec![LogRecord { id: 1, session }])
    }

    #[tokio::test]
    async fn snapshot_round_trips_all_session_fields() {
        let store = InMemorySnapshotStore::new();
        let snapshot = snapshot_with_one_slot();

        store_snapshot(&store, &snapshot).await.unwrap();
        let loaded = load_snapshot(&store).await.unwrap().unwrap();
        assert_eq!(loaded, snapshot);
    }

    #[tokio::test]
    async fn empty_medium_loads_as_none() {
        let store = InMemorySnapshotStore::new();
        assert_eq!(load_snapshot(&store).await.unwrap(), None);
    }

    #[tokio::test]
    async fn corrupt_medium_is_a_sync_error() {
        let store = InMemorySnapshotStore::new();
        store
            .put(PARKING_DATA_KEY, "{not json".to_string())
            .await
            .unwrap();
        let err = load_snapshot(&store).await.unwrap_err();
        assert!(matches!(err, DomainError::Sync(_)));
    }
}
