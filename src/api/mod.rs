//! HTTP API module for the attendance engine.
//!
//! This module exposes the engine's operations as REST endpoints for the
//! surrounding HR application.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{ClockInRequest, ListQuery, ResubmitRequest, ReviewRequest};
pub use response::{ApiError, ApiErrorResponse};
pub use state::AppState;
