//! Infrastructure layer - external concerns

pub mod database;
pub mod storage;

pub use database::{init_database, DatabaseConfig, SeaOrmLogStore};
pub use storage::{CheckoutPatch, InMemoryLogStore, LogStore};
