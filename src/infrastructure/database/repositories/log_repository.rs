//! SeaORM implementation of the LogStore

use async_trait::async_trait;
use log::debug;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};

use crate::domain::{
    DomainError, DomainResult, LogRecord, Session, SessionStatus, SlotId, StickerStatus,
    VehicleCategory,
};
use crate::infrastructure::database::entities::parking_log;
use crate::infrastructure::storage::{CheckoutPatch, LogStore};

pub struct SeaOrmLogStore {
    db: DatabaseConnection,
}

impl SeaOrmLogStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn model_to_record(m: parking_log::Model) -> DomainResult<LogRecord> {
    let slot = SlotId::parse(&m.slot_id)
        .map_err(|_| DomainError::Persistence(format!("Corrupt slot id in row: {}", m.slot_id)))?;
    Ok(LogRecord {
        id: m.log_id,
        session: Session {
            slot,
            sticker: StickerStatus::from(m.valid_sticker),
            category: VehicleCategory::from(m.vehicle_type),
            vehicle_name: m.vehicle_name,
            plate_number: m.plate_number,
            time_in: m.time_in,
            time_out: m.time_out,
            fee: m.fee,
            status: SessionStatus::from(m.status),
        },
    })
}

fn session_to_active_model(session: &Session) -> parking_log::ActiveModel {
    parking_log::ActiveModel {
        log_id: sea_orm::ActiveValue::NotSet,
        slot_id: Set(session.slot.to_string()),
        valid_sticker: Set(session.sticker.as_str().to_string()),
        vehicle_type: Set(session.category.as_str().to_string()),
        vehicle_name: Set(session.vehicle_name.clone()),
        plate_number: Set(session.plate_number.clone()),
        time_in: Set(session.time_in),
        time_out: Set(session.time_out),
        fee: Set(session.fee),
        status: Set(session.status.as_str().to_string()),
    }
}

fn db_err(e: sea_orm::DbErr) -> DomainError {
    DomainError::Persistence(format!("Database error: {}", e))
}

// ── LogStore impl ───────────────────────────────────────────────

#[async_trait]
impl LogStore for SeaOrmLogStore {
    async fn append(&self, session: Session) -> DomainResult<LogRecord> {
        debug!("Appending log row for slot {}", session.slot);
        let model = session_to_active_model(&session)
            .insert(&self.db)
            .await
            .map_err(db_err)?;
        model_to_record(model)
    }

    async fn update_by_slot(&self, slot: &SlotId, patch: CheckoutPatch) -> DomainResult<LogRecord> {
        debug!("Finalizing active log row for slot {}", slot);
        let active = parking_log::Entity::find()
            .filter(parking_log::Column::SlotId.eq(slot.to_string()))
            .filter(parking_log::Column::Status.eq(SessionStatus::Occupied.as_str()))
            .order_by_desc(parking_log::Column::LogId)
            .one(&self.db)
            .await
            .map_err(db_err)?
            .ok_or_else(|| DomainError::ActiveRowNotFound(slot.clone()))?;

        let mut row: parking_log::ActiveModel = active.into();
        row.time_out = Set(Some(patch.time_out));
        row.fee = Set(Some(patch.fee));
        row.status = Set(SessionStatus::CheckedOut.as_str().to_string());

        let updated = row.update(&self.db).await.map_err(db_err)?;
        model_to_record(updated)
    }

    async fn list_all(&self) -> DomainResult<Vec<LogRecord>> {
        let models = parking_log::Entity::find()
            .order_by_desc(parking_log::Column::LogId)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        models.into_iter().map(model_to_record).collect()
    }

    async fn replace_all(&self, rows: Vec<LogRecord>) -> DomainResult<()> {
        debug!("Replacing log content with {} rows", rows.len());
        let txn = self.db.begin().await.map_err(db_err)?;

        parking_log::Entity::delete_many()
            .exec(&txn)
            .await
            .map_err(db_err)?;

        // Re-insert with original ids so ordering and references survive
        for record in rows {
            let mut model = session_to_active_model(&record.session);
            model.log_id = Set(record.id);
            model.insert(&txn).await.map_err(db_err)?;
        }

        txn.commit().await.map_err(db_err)
    }
}
