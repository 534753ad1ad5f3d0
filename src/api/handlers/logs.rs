//! Raw log endpoints: the row-store surface consumed by the views

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use log::{error, info, warn};

use crate::api::dto::{ErrorBody, InsertLogRequest, InsertLogResponse, LogRowDto};
use crate::application::SessionLifecycleController;
use crate::infrastructure::storage::LogStore;

/// Log endpoint state
#[derive(Clone)]
pub struct LogAppState {
    pub log_store: Arc<dyn LogStore>,
    pub controller: Arc<SessionLifecycleController>,
}

/// List all parking log rows
///
/// Returns every session row, newest first, both active and completed.
#[utoipa::path(
    get,
    path = "/api/logs",
    tag = "Logs",
    responses(
        (status = 200, description = "All log rows, newest first", body = [LogRowDto]),
        (status = 500, description = "Row store unavailable", body = ErrorBody)
    )
)]
pub async fn list_logs(
    State(state): State<LogAppState>,
) -> Result<Json<Vec<LogRowDto>>, (StatusCode, Json<ErrorBody>)> {
    match state.log_store.list_all().await {
        Ok(rows) => Ok(Json(rows.into_iter().map(LogRowDto::from_record).collect())),
        Err(e) => {
            error!("Failed to list logs: {}", e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorBody {
                    error: e.to_string(),
                }),
            ))
        }
    }
}

/// Insert a raw log row
///
/// Appends a row as-is, bypassing the slot state machine guards. Used by
/// external collaborators replaying or importing rows; regular check-ins go
/// through the slot endpoints. Slot state and the shared snapshot are
/// re-derived from the log afterwards so observer views pick the row up
/// without waiting for the next poll.
#[utoipa::path(
    post,
    path = "/api/logs",
    tag = "Logs",
    request_body = InsertLogRequest,
    responses(
        (status = 200, description = "Row inserted", body = InsertLogResponse),
        (status = 400, description = "Malformed row", body = ErrorBody),
        (status = 500, description = "Insert failed", body = ErrorBody)
    )
)]
pub async fn insert_log(
    State(state): State<LogAppState>,
    Json(body): Json<InsertLogRequest>,
) -> Result<Json<InsertLogResponse>, (StatusCode, Json<ErrorBody>)> {
    let session = body.into_session().map_err(|e| {
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorBody {
                error: e.to_string(),
            }),
        )
    })?;

    match state.log_store.append(session).await {
        Ok(record) => {
            info!("Raw log row inserted: id={}", record.id);
            // The row is durable; a failed republish only delays observers
            // until their next poll tick
            if let Err(e) = state.controller.reconcile().await {
                warn!("Failed to republish snapshot after raw insert: {}", e);
            }
            Ok(Json(InsertLogResponse {
                message: "Log added successfully".to_string(),
                log_id: record.id,
            }))
        }
        Err(e) => {
            error!("Failed to insert log row: {}", e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorBody {
                    error: e.to_string(),
                }),
            ))
        }
    }
}
