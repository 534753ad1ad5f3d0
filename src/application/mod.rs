//! Application layer - business logic and orchestration

pub mod services;

pub use services::{CheckIn, OccupancyStats, SessionLifecycleController, SlotStateStore};
