//! Log row DTOs: the wire shape of the persisted log

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{LogRecord, Session, SessionStatus, SlotId, StickerStatus, VehicleCategory};

/// One row of the parking log as served by `GET /api/logs`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "log_id": 1,
    "slot_id": "A3",
    "valid_sticker": "With Valid Sticker",
    "vehicle_type": "Light Vehicle",
    "vehicle_name": "Toyota Vios",
    "plate_number": "ABC-1234",
    "time_in": "2024-05-01T08:00:00Z",
    "time_out": "2024-05-01T19:00:00Z",
    "fee": 70,
    "status": "Checked Out"
}))]
pub struct LogRowDto {
    /// Row id (auto-increment, newest rows first in listings)
    pub log_id: i32,
    /// Slot identifier, e.g. "A3"
    pub slot_id: String,
    /// "With Valid Sticker" or "No Sticker"
    pub valid_sticker: String,
    /// Vehicle category, e.g. "Light Vehicle", "Motorcycle"
    pub vehicle_type: String,
    pub vehicle_name: String,
    pub plate_number: String,
    pub time_in: DateTime<Utc>,
    /// null while the session is active
    pub time_out: Option<DateTime<Utc>>,
    /// Computed fee; null while the session is active
    pub fee: Option<i64>,
    /// "Occupied" or "Checked Out"
    pub status: String,
}

impl LogRowDto {
    pub fn from_record(record: LogRecord) -> Self {
        let s = record.session;
        Self {
            log_id: record.id,
            slot_id: s.slot.to_string(),
            valid_sticker: s.sticker.as_str().to_string(),
            vehicle_type: s.category.as_str().to_string(),
            vehicle_name: s.vehicle_name,
            plate_number: s.plate_number,
            time_in: s.time_in,
            time_out: s.time_out,
            fee: s.fee,
            status: s.status.as_str().to_string(),
        }
    }
}

/// Body of `POST /api/logs`: a raw row insert, same shape minus `log_id`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct InsertLogRequest {
    pub slot_id: String,
    pub valid_sticker: String,
    pub vehicle_type: String,
    pub vehicle_name: String,
    pub plate_number: String,
    pub time_in: DateTime<Utc>,
    #[serde(default)]
    pub time_out: Option<DateTime<Utc>>,
    #[serde(default)]
    pub fee: Option<i64>,
    pub status: String,
}

impl InsertLogRequest {
    /// Convert the raw row into a domain session; the slot id must lie on
    /// the grid.
    pub fn into_session(self) -> Result<Session, crate::domain::DomainError> {
        let slot = SlotId::parse(&self.slot_id)?;
        Ok(Session {
            slot,
            sticker: StickerStatus::from(self.valid_sticker),
            category: VehicleCategory::from(self.vehicle_type),
            vehicle_name: self.vehicle_name,
            plate_number: self.plate_number,
            time_in: self.time_in,
            time_out: self.time_out,
            fee: self.fee,
            status: SessionStatus::from(self.status),
        })
    }
}

/// Response of `POST /api/logs`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct InsertLogResponse {
    pub message: String,
    pub log_id: i32,
}
