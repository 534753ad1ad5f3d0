//! Application services

pub mod lifecycle;
pub mod slot_state;

pub use lifecycle::{CheckIn, SessionLifecycleController};
pub use slot_state::{OccupancyStats, SlotStateStore};
