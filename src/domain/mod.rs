//! Domain layer: slots, sessions, fees and domain errors

pub mod error;
pub mod fees;
pub mod session;
pub mod slot;

// Re-export commonly used types
pub use error::{DomainError, DomainResult};
pub use fees::{compute_fee, hours_parked, rate_for, Rate, BASE_HOURS};
pub use session::{CheckoutSummary, LogRecord, Session, SessionStatus};
pub use slot::{SlotId, StickerStatus, VehicleCategory, GRID_COLUMNS, GRID_ROWS, TOTAL_SLOTS};
