//! # Parking Occupancy Service
//!
//! Tracks occupancy of a fixed 4x5 grid of parking slots, records
//! check-in/check-out sessions with computed fees, persists an
//! append-ordered log of all sessions, and keeps concurrent observer views
//! consistent through a shared snapshot medium with change notifications
//! and periodic polling.
//!
//! ## Architecture
//!
//! - **domain**: slots, sessions, the fee rate table and domain errors
//! - **application**: the session lifecycle controller and the slot state store
//! - **infrastructure**: the durable log store (SQLite via SeaORM) and the
//!   in-memory variant used in tests
//! - **notifications**: broadcast event bus for log-change notifications
//! - **sync**: shared snapshot medium and observer view mirrors
//! - **api**: REST endpoints with Swagger documentation

pub mod api;
pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod notifications;
pub mod sync;

pub use config::{default_config_path, AppConfig};

// Re-export database types for easy access
pub use infrastructure::{init_database, DatabaseConfig, SeaOrmLogStore};

// Re-export API router
pub use api::{create_api_router, ApiState};

// Re-export notifications
pub use notifications::{create_event_bus, Event, EventBus, SharedEventBus};
