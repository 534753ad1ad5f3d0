//! Parking log entity

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "parking_logs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub log_id: i32,

    /// Slot identifier, e.g. "A3"
    pub slot_id: String,

    /// Sticker status: "With Valid Sticker" or "No Sticker"
    pub valid_sticker: String,

    /// Vehicle category, e.g. "Light Vehicle", "Motorcycle"
    pub vehicle_type: String,

    pub vehicle_name: String,
    pub plate_number: String,

    pub time_in: DateTimeUtc,

    #[sea_orm(nullable)]
    pub time_out: Option<DateTimeUtc>,

    /// Computed fee in whole currency units; set on check-out
    #[sea_orm(nullable)]
    pub fee: Option<i64>,

    /// Session status: "Occupied" or "Checked Out"
    pub status: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
