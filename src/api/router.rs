//! API router with Swagger UI

use std::sync::Arc;

use axum::{
    extract::FromRef,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::dto;
use crate::api::handlers::{health, logs, slots};
use crate::application::SessionLifecycleController;
use crate::infrastructure::storage::LogStore;

/// Unified state for all routes. Axum extracts the specific handler state
/// via `FromRef`.
#[derive(Clone)]
pub struct ApiState {
    pub controller: Arc<SessionLifecycleController>,
    pub log_store: Arc<dyn LogStore>,
}

impl FromRef<ApiState> for slots::SlotAppState {
    fn from_ref(s: &ApiState) -> Self {
        slots::SlotAppState {
            controller: Arc::clone(&s.controller),
        }
    }
}

impl FromRef<ApiState> for logs::LogAppState {
    fn from_ref(s: &ApiState) -> Self {
        logs::LogAppState {
            log_store: Arc::clone(&s.log_store),
            controller: Arc::clone(&s.controller),
        }
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        // Health
        health::health_check,
        // Logs
        logs::list_logs,
        logs::insert_log,
        // Slots
        slots::check_in,
        slots::check_out,
        slots::occupancy,
    ),
    components(schemas(
        health::HealthResponse,
        dto::LogRowDto,
        dto::InsertLogRequest,
        dto::InsertLogResponse,
        dto::ErrorBody,
        dto::CheckInRequest,
        dto::CheckOutRequest,
        dto::CheckoutSummaryDto,
        dto::ActiveSlotDto,
        dto::OccupancyResponse,
    )),
    tags(
        (name = "Health", description = "Service health"),
        (name = "Logs", description = "Raw parking log rows"),
        (name = "Slots", description = "Slot occupancy and session lifecycle"),
    ),
    info(
        title = "Parking Occupancy Service API",
        description = "Slot occupancy tracking, session check-in/check-out with fees, and the shared parking log."
    )
)]
pub struct ApiDoc;

/// Build the API router with all routes, CORS and request tracing.
pub fn create_api_router(state: ApiState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/health", get(health::health_check))
        .route("/api/logs", get(logs::list_logs).post(logs::insert_log))
        .route("/api/slots", get(slots::occupancy))
        .route("/api/slots/{slot_id}/check-in", post(slots::check_in))
        .route("/api/slots/{slot_id}/check-out", post(slots::check_out))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
