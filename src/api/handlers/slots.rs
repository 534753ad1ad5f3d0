//! Slot endpoints: check-in, check-out, occupancy overview

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use validator::Validate;

use super::status_for;
use crate::api::dto::{
    ActiveSlotDto, ApiResponse, CheckInRequest, CheckOutRequest, CheckoutSummaryDto, LogRowDto,
    OccupancyResponse,
};
use crate::application::{CheckIn, SessionLifecycleController};
use crate::domain::{DomainError, SlotId, StickerStatus, VehicleCategory};

/// Slot endpoint state
#[derive(Clone)]
pub struct SlotAppState {
    pub controller: Arc<SessionLifecycleController>,
}

type SlotError = (StatusCode, Json<ApiResponse<()>>);

fn reject(e: DomainError) -> SlotError {
    (status_for(&e), Json(ApiResponse::error(e.to_string())))
}

/// Check a vehicle into a slot
///
/// Fails with 400 when a required field is missing or the slot id is off
/// the grid, and with 409 when the slot already holds an active session.
#[utoipa::path(
    post,
    path = "/api/slots/{slot_id}/check-in",
    tag = "Slots",
    params(("slot_id" = String, Path, description = "Slot identifier, e.g. A3")),
    request_body = CheckInRequest,
    responses(
        (status = 200, description = "Session created", body = ApiResponse<LogRowDto>),
        (status = 400, description = "Missing field or invalid slot id", body = ApiResponse<serde_json::Value>),
        (status = 409, description = "Slot occupied or mid-transition", body = ApiResponse<serde_json::Value>),
        (status = 500, description = "Row store failure", body = ApiResponse<serde_json::Value>)
    )
)]
pub async fn check_in(
    State(state): State<SlotAppState>,
    Path(slot_id): Path<String>,
    Json(body): Json<CheckInRequest>,
) -> Result<Json<ApiResponse<LogRowDto>>, SlotError> {
    body.validate()
        .map_err(|e| reject(DomainError::Validation(e.to_string())))?;
    let slot = SlotId::parse(&slot_id).map_err(reject)?;

    let cmd = CheckIn {
        slot,
        sticker: StickerStatus::from(body.valid_sticker),
        category: VehicleCategory::from(body.vehicle_type),
        vehicle_name: body.vehicle_name,
        plate_number: body.plate_number,
        time_in: body.time_in.unwrap_or_else(Utc::now),
    };

    let record = state.controller.check_in(cmd).await.map_err(reject)?;
    Ok(Json(ApiResponse::success(LogRowDto::from_record(record))))
}

/// Check a vehicle out of a slot
///
/// Computes the fee, finalizes the log row and returns the checkout
/// summary. Fails with 409 when the slot is vacant; re-invoking check-out
/// never recomputes a finalized session.
#[utoipa::path(
    post,
    path = "/api/slots/{slot_id}/check-out",
    tag = "Slots",
    params(("slot_id" = String, Path, description = "Slot identifier, e.g. A3")),
    request_body = CheckOutRequest,
    responses(
        (status = 200, description = "Session finalized", body = ApiResponse<CheckoutSummaryDto>),
        (status = 400, description = "Invalid slot id or check-out before check-in", body = ApiResponse<serde_json::Value>),
        (status = 409, description = "Slot vacant or mid-transition", body = ApiResponse<serde_json::Value>),
        (status = 500, description = "Row store failure", body = ApiResponse<serde_json::Value>)
    )
)]
pub async fn check_out(
    State(state): State<SlotAppState>,
    Path(slot_id): Path<String>,
    Json(body): Json<CheckOutRequest>,
) -> Result<Json<ApiResponse<CheckoutSummaryDto>>, SlotError> {
    let slot = SlotId::parse(&slot_id).map_err(reject)?;
    let time_out = body.time_out.unwrap_or_else(Utc::now);

    let summary = state
        .controller
        .check_out(slot, time_out)
        .await
        .map_err(reject)?;
    Ok(Json(ApiResponse::success(CheckoutSummaryDto::from_domain(
        summary,
    ))))
}

/// Occupancy overview
///
/// Occupied/available counters for the fixed grid plus the active slot map.
#[utoipa::path(
    get,
    path = "/api/slots",
    tag = "Slots",
    responses(
        (status = 200, description = "Current occupancy", body = ApiResponse<OccupancyResponse>)
    )
)]
pub async fn occupancy(
    State(state): State<SlotAppState>,
) -> Json<ApiResponse<OccupancyResponse>> {
    let slots = state.controller.slots();
    let stats = slots.stats();
    let active = slots
        .snapshot()
        .into_values()
        .map(ActiveSlotDto::from_session)
        .collect();

    Json(ApiResponse::success(OccupancyResponse {
        occupied: stats.occupied,
        available: stats.available,
        total: stats.total,
        active,
    }))
}
