//! Create parking_logs table

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ParkingLogs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ParkingLogs::LogId)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ParkingLogs::SlotId).string().not_null())
                    .col(
                        ColumnDef::new(ParkingLogs::ValidSticker)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ParkingLogs::VehicleType).string().not_null())
                    .col(ColumnDef::new(ParkingLogs::VehicleName).string().not_null())
                    .col(ColumnDef::new(ParkingLogs::PlateNumber).string().not_null())
                    .col(
                        ColumnDef::new(ParkingLogs::TimeIn)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ParkingLogs::TimeOut).timestamp_with_time_zone())
                    .col(ColumnDef::new(ParkingLogs::Fee).big_integer())
                    .col(
                        ColumnDef::new(ParkingLogs::Status)
                            .string()
                            .not_null()
                            .default("Occupied"),
                    )
                    .to_owned(),
            )
            .await?;

        // Index for finding the active row of a slot on check-out
        manager
            .create_index(
                Index::create()
                    .name("idx_parking_logs_slot_status")
                    .table(ParkingLogs::Table)
                    .col(ParkingLogs::SlotId)
                    .col(ParkingLogs::Status)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ParkingLogs::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum ParkingLogs {
    Table,
    LogId,
    SlotId,
    ValidSticker,
    VehicleType,
    VehicleName,
    PlateNumber,
    TimeIn,
    TimeOut,
    Fee,
    Status,
}
