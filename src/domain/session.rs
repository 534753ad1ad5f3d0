//! Parking session domain entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::slot::{SlotId, StickerStatus, VehicleCategory};

/// Session status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SessionStatus {
    /// Vehicle is parked, slot is held
    Occupied,
    /// Session finalized, fee computed, slot released
    CheckedOut,
}

impl SessionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Occupied => "Occupied",
            Self::CheckedOut => "Checked Out",
        }
    }
}

impl From<String> for SessionStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "Checked Out" => Self::CheckedOut,
            _ => Self::Occupied,
        }
    }
}

impl From<SessionStatus> for String {
    fn from(s: SessionStatus) -> Self {
        s.as_str().to_string()
    }
}

/// One vehicle's occupancy of one slot, from check-in to check-out.
///
/// Created on check-in with `status = Occupied`; finalized exactly once on
/// check-out (time_out and fee set, status updated) and immutable afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Slot held by this session
    pub slot: SlotId,
    /// Discount eligibility
    pub sticker: StickerStatus,
    /// Vehicle category for the rate table
    pub category: VehicleCategory,
    /// Display name of the vehicle
    pub vehicle_name: String,
    /// Plate number
    pub plate_number: String,
    /// When the vehicle checked in
    pub time_in: DateTime<Utc>,
    /// When the vehicle checked out. None while active
    pub time_out: Option<DateTime<Utc>>,
    /// Computed fee. Some iff status is CheckedOut, always >= 0
    pub fee: Option<i64>,
    /// Session status
    pub status: SessionStatus,
}

impl Session {
    pub fn new(
        slot: SlotId,
        sticker: StickerStatus,
        category: VehicleCategory,
        vehicle_name: impl Into<String>,
        plate_number: impl Into<String>,
        time_in: DateTime<Utc>,
    ) -> Self {
        Self {
            slot,
            sticker,
            category,
            vehicle_name: vehicle_name.into(),
            plate_number: plate_number.into(),
            time_in,
            time_out: None,
            fee: None,
            status: SessionStatus::Occupied,
        }
    }

    /// Finalize the session. Invariant upheld by the caller: time_out >= time_in.
    pub fn check_out(&mut self, time_out: DateTime<Utc>, fee: i64) {
        self.time_out = Some(time_out);
        self.fee = Some(fee);
        self.status = SessionStatus::CheckedOut;
    }

    pub fn is_active(&self) -> bool {
        self.status == SessionStatus::Occupied
    }
}

/// One row of the durable log: a session plus its assigned row id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogRecord {
    /// Row id assigned by the log store (auto-increment)
    pub id: i32,
    #[serde(flatten)]
    pub session: Session,
}

/// Result of a successful check-out, for display to the operator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckoutSummary {
    pub slot: SlotId,
    pub category: VehicleCategory,
    pub vehicle_name: String,
    pub plate_number: String,
    pub time_in: DateTime<Utc>,
    pub time_out: DateTime<Utc>,
    /// Billed hours (partial hours rounded up)
    pub hours: u32,
    pub fee: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn sample_session() -> Session {
        Session::new(
            SlotId::parse("A1").unwrap(),
            StickerStatus::Valid,
            VehicleCategory::LightVehicle,
            "Toyota Vios",
            "ABC-1234",
            Utc::now(),
        )
    }

    #[test]
    fn new_session_is_active() {
        let s = sample_session();
        assert!(s.is_active());
        assert_eq!(s.time_out, None);
        assert_eq!(s.fee, None);
    }

    #[test]
    fn check_out_finalizes() {
        let mut s = sample_session();
        let out = s.time_in + Duration::hours(2);
        s.check_out(out, 50);
        assert!(!s.is_active());
        assert_eq!(s.time_out, Some(out));
        assert_eq!(s.fee, Some(50));
        assert_eq!(s.status, SessionStatus::CheckedOut);
    }

    #[test]
    fn status_wire_strings() {
        assert_eq!(SessionStatus::Occupied.as_str(), "Occupied");
        assert_eq!(SessionStatus::CheckedOut.as_str(), "Checked Out");
        assert_eq!(
            SessionStatus::from("Checked Out".to_string()),
            SessionStatus::CheckedOut
        );
    }
}
