//! v1 Reasoning and decision-trace handlers.

use axum::extract::{Path, Query, State};
use chrono::Utc;

use crate::api::v1::dto::LimitQuery;
use crate::api::v1::response::{ApiError, ApiResponse};
use crate::api::AppState;
use crate::models::{DecisionTrace, ReasoningOutcome};
use crate::services::nutrition::start_of_day;

use super::require_user;

const DEFAULT_LIMIT: u32 = 10;

/// `POST /api/v1/users/{user_id}/reason`
///
/// Runs the reasoning pipeline over the user's stored history without
/// submitting a new check-in. Every call appends a decision trace.
#[utoipa::path(
    post,
    path = "/api/v1/users/{user_id}/reason",
    tag = "reasoning",
    operation_id = "reasoning.run",
    params(("user_id" = i64, Path, description = "User ID")),
    responses(
        (status = 200, description = "Recommendation with explanation", body = ReasoningOutcome),
        (status = 404, description = "User not found", body = ApiError),
    )
)]
pub async fn reason(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> ApiResponse<ReasoningOutcome> {
    if let Err(e) = require_user(&state, user_id).await {
        return e.into();
    }

    match state.reasoner.reason(user_id).await {
        Ok(outcome) => ApiResponse::success(outcome),
        Err(e) => e.into(),
    }
}

/// `GET /api/v1/users/{user_id}/traces`
#[utoipa::path(
    get,
    path = "/api/v1/users/{user_id}/traces",
    tag = "reasoning",
    operation_id = "traces.list",
    params(("user_id" = i64, Path, description = "User ID"), LimitQuery),
    responses(
        (status = 200, description = "Most recent traces first", body = Vec<DecisionTrace>),
        (status = 404, description = "User not found", body = ApiError),
    )
)]
pub async fn list_traces(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    Query(query): Query<LimitQuery>,
) -> ApiResponse<Vec<DecisionTrace>> {
    if let Err(e) = require_user(&state, user_id).await {
        return e.into();
    }

    let limit = query.resolve(DEFAULT_LIMIT);
    match state.db.recent_traces(user_id, limit).await {
        Ok(traces) => ApiResponse::list(traces, Some(limit)),
        Err(e) => e.into(),
    }
}

/// `GET /api/v1/users/{user_id}/traces/today`
#[utoipa::path(
    get,
    path = "/api/v1/users/{user_id}/traces/today",
    tag = "reasoning",
    operation_id = "traces.today",
    params(("user_id" = i64, Path, description = "User ID")),
    responses(
        (status = 200, description = "Traces recorded since midnight UTC", body = Vec<DecisionTrace>),
        (status = 404, description = "User not found", body = ApiError),
    )
)]
pub async fn today_traces(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> ApiResponse<Vec<DecisionTrace>> {
    if let Err(e) = require_user(&state, user_id).await {
        return e.into();
    }

    match state.db.traces_since(user_id, start_of_day(Utc::now())).await {
        Ok(traces) => ApiResponse::list(traces, None),
        Err(e) => e.into(),
    }
}
