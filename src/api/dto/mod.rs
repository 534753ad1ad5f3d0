//! API data transfer objects

pub mod common;
pub mod log;
pub mod slots;

pub use common::{ApiResponse, ErrorBody};
pub use log::{InsertLogRequest, InsertLogResponse, LogRowDto};
pub use slots::{
    ActiveSlotDto, CheckInRequest, CheckOutRequest, CheckoutSummaryDto, OccupancyResponse,
};
