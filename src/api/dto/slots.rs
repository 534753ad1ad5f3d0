//! Slot operation DTOs: check-in, check-out, occupancy

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::{CheckoutSummary, Session};

/// Body of `POST /api/slots/{slot_id}/check-in`.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[schema(example = json!({
    "valid_sticker": "With Valid Sticker",
    "vehicle_type": "Light Vehicle",
    "vehicle_name": "Toyota Vios",
    "plate_number": "ABC-1234",
    "time_in": "2024-05-01T08:00:00Z"
}))]
pub struct CheckInRequest {
    /// "With Valid Sticker" grants the discounted rate; anything else is
    /// treated as no sticker
    #[validate(length(min = 1, message = "valid_sticker is required"))]
    pub valid_sticker: String,
    #[validate(length(min = 1, message = "vehicle_type is required"))]
    pub vehicle_type: String,
    #[validate(length(min = 1, message = "vehicle_name is required"))]
    pub vehicle_name: String,
    #[validate(length(min = 1, message = "plate_number is required"))]
    pub plate_number: String,
    /// Defaults to the current time when omitted
    #[serde(default)]
    pub time_in: Option<DateTime<Utc>>,
}

/// Body of `POST /api/slots/{slot_id}/check-out`.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct CheckOutRequest {
    /// Defaults to the current time when omitted
    #[serde(default)]
    pub time_out: Option<DateTime<Utc>>,
}

/// Checkout summary shown to the operator after a successful check-out.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CheckoutSummaryDto {
    pub slot_id: String,
    pub vehicle_type: String,
    pub vehicle_name: String,
    pub plate_number: String,
    pub time_in: DateTime<Utc>,
    pub time_out: DateTime<Utc>,
    /// Billed hours, partial hours rounded up
    pub hours: u32,
    pub fee: i64,
}

impl CheckoutSummaryDto {
    pub fn from_domain(summary: CheckoutSummary) -> Self {
        Self {
            slot_id: summary.slot.to_string(),
            vehicle_type: summary.category.as_str().to_string(),
            vehicle_name: summary.vehicle_name,
            plate_number: summary.plate_number,
            time_in: summary.time_in,
            time_out: summary.time_out,
            hours: summary.hours,
            fee: summary.fee,
        }
    }
}

/// One occupied slot in the occupancy overview.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ActiveSlotDto {
    pub slot_id: String,
    pub vehicle_type: String,
    pub vehicle_name: String,
    pub plate_number: String,
    pub time_in: DateTime<Utc>,
}

impl ActiveSlotDto {
    pub fn from_session(session: Session) -> Self {
        Self {
            slot_id: session.slot.to_string(),
            vehicle_type: session.category.as_str().to_string(),
            vehicle_name: session.vehicle_name,
            plate_number: session.plate_number,
            time_in: session.time_in,
        }
    }
}

/// Response of `GET /api/slots`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OccupancyResponse {
    pub occupied: usize,
    pub available: usize,
    pub total: usize,
    /// Occupied slots, ordered by slot id
    pub active: Vec<ActiveSlotDto>,
}
