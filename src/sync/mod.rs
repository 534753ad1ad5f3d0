//! View synchronization: shared snapshot medium + observer mirrors
//!
//! Keeps multiple independent views (staff, admin) showing the same log
//! content without a push channel: every committed write serializes the
//! full state into the shared medium and fires a change notification, and
//! every observer also re-polls the medium on a fixed interval to recover
//! from missed notifications. Conflict resolution is last-writer-wins.

pub mod observer;
pub mod snapshot;

pub use observer::ViewObserver;
pub use snapshot::{
    load_snapshot, store_snapshot, InMemorySnapshotStore, SharedSnapshot, SnapshotStore,
    PARKING_DATA_KEY, PARKING_LOGS_KEY,
};
