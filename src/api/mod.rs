//! REST API module
//!
//! HTTP endpoints for the parking log, slot check-in/check-out and the
//! occupancy overview, with Swagger documentation at `/docs`.

pub mod dto;
pub mod handlers;
pub mod router;

pub use router::{create_api_router, ApiState};
