//! API handlers

pub mod health;
pub mod logs;
pub mod slots;

use axum::http::StatusCode;

use crate::domain::DomainError;

/// Map a domain error onto an HTTP status.
pub(crate) fn status_for(error: &DomainError) -> StatusCode {
    match error {
        DomainError::Validation(_) => StatusCode::BAD_REQUEST,
        DomainError::SlotOccupied(_) | DomainError::SlotVacant(_) | DomainError::SlotBusy(_) => {
            StatusCode::CONFLICT
        }
        DomainError::ActiveRowNotFound(_) => StatusCode::NOT_FOUND,
        DomainError::Persistence(_) | DomainError::Sync(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}
