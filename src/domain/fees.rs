//! Parking fee calculation
//!
//! Pure rate-table lookup: the base rate covers the first [`BASE_HOURS`]
//! flat, every hour beyond that is billed at a lower succeeding rate.

use chrono::{DateTime, Utc};

use super::slot::{StickerStatus, VehicleCategory};

/// Hours covered by the flat base rate
pub const BASE_HOURS: u32 = 10;

/// Rate pair for one (category, sticker) combination, in whole currency units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rate {
    /// Flat charge covering the first [`BASE_HOURS`] hours
    pub base: i64,
    /// Charge per hour beyond [`BASE_HOURS`]
    pub succeeding: i64,
}

/// Look up the rate for a vehicle category and sticker status.
///
/// Unrecognized categories get a zero rate (fee = 0). That is the documented
/// behavior of the fee schedule, not an error.
pub fn rate_for(category: &VehicleCategory, sticker: StickerStatus) -> Rate {
    match (category, sticker) {
        (VehicleCategory::LightVehicle, StickerStatus::Valid) => Rate { base: 50, succeeding: 20 },
        (VehicleCategory::LightVehicle, StickerStatus::None) => Rate { base: 70, succeeding: 30 },
        (VehicleCategory::Motorcycle, StickerStatus::Valid) => Rate { base: 30, succeeding: 10 },
        (VehicleCategory::Motorcycle, StickerStatus::None) => Rate { base: 50, succeeding: 20 },
        (VehicleCategory::Other(_), _) => Rate { base: 0, succeeding: 0 },
    }
}

/// Compute the fee for a parked duration in billed hours.
///
/// Total and deterministic over the whole input domain; never fails.
pub fn compute_fee(category: &VehicleCategory, sticker: StickerStatus, hours: u32) -> i64 {
    let rate = rate_for(category, sticker);
    if hours <= BASE_HOURS {
        rate.base
    } else {
        rate.base + i64::from(hours - BASE_HOURS) * rate.succeeding
    }
}

/// Billed hours between check-in and check-out: partial hours round up.
///
/// A non-positive elapsed duration bills zero hours; callers reject
/// time_out < time_in before getting here.
pub fn hours_parked(time_in: DateTime<Utc>, time_out: DateTime<Utc>) -> u32 {
    let secs = (time_out - time_in).num_seconds();
    if secs <= 0 {
        return 0;
    }
    (secs as u64).div_ceil(3600) as u32
}
