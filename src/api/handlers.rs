//! HTTP request handlers for the attendance API.
//!
//! This module contains the handler functions for all API endpoints.

use axum::{
    Json, Router,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::{info, warn};
use uuid::Uuid;

use crate::models::EntryPatch;

use super::request::{ClockInRequest, ListQuery, ResubmitRequest, ReviewRequest};
use super::response::{ApiError, ApiErrorResponse};
use super::state::AppState;

type ApiResult<T> = Result<T, ApiErrorResponse>;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/entries", get(list_handler))
        .route("/entries/summary", get(summary_handler))
        .route("/entries/clock-in", post(clock_in_handler))
        .route(
            "/entries/:id",
            get(get_handler).patch(update_handler).delete(delete_handler),
        )
        .route("/entries/:id/clock-out", post(clock_out_handler))
        .route("/entries/:id/breaks", post(start_break_handler))
        .route(
            "/entries/:id/breaks/:break_id/end",
            post(end_break_handler),
        )
        .route("/entries/:id/review", post(review_handler))
        .route("/entries/:id/resubmit", post(resubmit_handler))
        .route("/users/:user_id/active-entry", get(active_entry_handler))
        .with_state(state)
}

/// Turns a JSON extraction result into a body or a 400 response.
fn parse_body<T: DeserializeOwned>(
    payload: Result<Json<T>, JsonRejection>,
    correlation_id: Uuid,
) -> ApiResult<T> {
    let rejection = match payload {
        Ok(Json(body)) => return Ok(body),
        Err(rejection) => rejection,
    };

    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            let body_text = err.body_text();
            warn!(correlation_id = %correlation_id, error = %body_text, "JSON data error");
            if body_text.contains("missing field") {
                ApiError::new("VALIDATION_ERROR", body_text)
            } else {
                ApiError::malformed_json(body_text)
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(correlation_id = %correlation_id, error = %err, "JSON syntax error");
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
        }
        _ => ApiError::malformed_json("Failed to parse request body"),
    };
    Err(ApiErrorResponse {
        status: StatusCode::BAD_REQUEST,
        error,
    })
}

/// Turns a query-string extraction result into a `ListQuery` or a 400 response.
fn parse_query(query: Result<Query<ListQuery>, QueryRejection>) -> ApiResult<ListQuery> {
    match query {
        Ok(Query(query)) => Ok(query),
        Err(rejection) => {
            let body_text = rejection.body_text();
            warn!(error = %body_text, "Query string rejected");
            Err(ApiErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error: ApiError::new("VALIDATION_ERROR", body_text),
            })
        }
    }
}

/// Handler for POST /entries/clock-in.
async fn clock_in_handler(
    State(state): State<AppState>,
    payload: Result<Json<ClockInRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let correlation_id = Uuid::new_v4();
    let request = parse_body(payload, correlation_id)?;
    info!(correlation_id = %correlation_id, user_id = %request.user_id, "Processing clock-in");

    let entry = state
        .engine()
        .clock_in(&request.user_id, request.date, request.notes)?;
    Ok((StatusCode::CREATED, Json(entry)))
}

/// Handler for POST /entries/:id/clock-out.
async fn clock_out_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let entry = state.engine().clock_out(id)?;
    Ok(Json(entry))
}

/// Handler for POST /entries/:id/breaks.
async fn start_break_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let started = state.engine().start_break(id)?;
    Ok((StatusCode::CREATED, Json(started)))
}

/// Handler for POST /entries/:id/breaks/:break_id/end.
async fn end_break_handler(
    State(state): State<AppState>,
    Path((id, break_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<impl IntoResponse> {
    let ended = state.engine().end_break(id, break_id)?;
    Ok(Json(ended))
}

/// Handler for POST /entries/:id/review.
async fn review_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    payload: Result<Json<ReviewRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let correlation_id = Uuid::new_v4();
    let request = parse_body(payload, correlation_id)?;
    info!(
        correlation_id = %correlation_id,
        entry_id = %id,
        reviewer = %request.reviewer.id,
        "Processing review"
    );

    let entry =
        state
            .engine()
            .review_entry(id, &request.reviewer, request.decision, request.comment)?;
    Ok(Json(entry))
}

/// Handler for POST /entries/:id/resubmit.
async fn resubmit_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    payload: Result<Json<ResubmitRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let request = parse_body(payload, Uuid::new_v4())?;
    let entry = state.engine().resubmit_entry(id, &request.reviewer)?;
    Ok(Json(entry))
}

/// Handler for GET /entries.
async fn list_handler(
    State(state): State<AppState>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> ApiResult<impl IntoResponse> {
    let query = parse_query(query)?;
    let page = state
        .engine()
        .list_entries(&query.filter(), query.page, query.page_size)?;
    Ok(Json(page))
}

/// Handler for GET /entries/summary.
async fn summary_handler(
    State(state): State<AppState>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> ApiResult<impl IntoResponse> {
    let query = parse_query(query)?;
    let summary = state.engine().summarize(&query.filter())?;
    Ok(Json(summary))
}

/// Handler for GET /entries/:id.
async fn get_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(state.engine().get_entry(id)?))
}

/// Handler for PATCH /entries/:id.
async fn update_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    payload: Result<Json<EntryPatch>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let correlation_id = Uuid::new_v4();
    let patch = parse_body(payload, correlation_id)?;
    if patch.is_empty() {
        return Err(ApiErrorResponse {
            status: StatusCode::BAD_REQUEST,
            error: ApiError::new("VALIDATION_ERROR", "Patch contains no changes"),
        });
    }
    info!(correlation_id = %correlation_id, entry_id = %id, "Processing entry correction");

    Ok(Json(state.engine().update_entry(id, patch)?))
}

/// Handler for DELETE /entries/:id.
async fn delete_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let deleted = state.engine().delete_entry(id)?;
    Ok(Json(json!({ "deleted": deleted })))
}

/// Handler for GET /users/:user_id/active-entry.
async fn active_entry_handler(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    match state.engine().active_entry(&user_id)? {
        Some(entry) => Ok(Json(entry)),
        None => Err(ApiErrorResponse {
            status: StatusCode::NOT_FOUND,
            error: ApiError::new(
                "NOT_FOUND",
                format!("User '{}' is not clocked in", user_id),
            ),
        }),
    }
}
