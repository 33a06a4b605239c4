//! v1 Check-in handlers.

use axum::extract::{Path, Query, State};

use crate::api::extractors::AppJson;
use crate::api::v1::dto::LimitQuery;
use crate::api::v1::response::{ApiError, ApiResponse};
use crate::api::AppState;
use crate::models::{CheckIn, NewCheckIn};
use crate::services::CheckInResult;

const DEFAULT_LIMIT: u32 = 7;

/// `POST /api/v1/users/{user_id}/checkins`
///
/// Stores the check-in, runs the reasoning pipeline and returns the
/// recommendation together with any meal and yoga plans generated for it.
#[utoipa::path(
    post,
    path = "/api/v1/users/{user_id}/checkins",
    tag = "checkins",
    operation_id = "checkins.create",
    params(("user_id" = i64, Path, description = "User ID")),
    request_body = NewCheckIn,
    responses(
        (status = 201, description = "Check-in stored and reasoned over", body = CheckInResult),
        (status = 400, description = "Value out of range", body = ApiError),
        (status = 404, description = "User not found", body = ApiError),
    )
)]
pub async fn submit_checkin(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    AppJson(req): AppJson<NewCheckIn>,
) -> ApiResponse<CheckInResult> {
    match state.checkins.submit_checkin(user_id, req).await {
        Ok(result) => ApiResponse::created(result),
        Err(e) => e.into(),
    }
}

/// `GET /api/v1/users/{user_id}/checkins`
#[utoipa::path(
    get,
    path = "/api/v1/users/{user_id}/checkins",
    tag = "checkins",
    operation_id = "checkins.list",
    params(("user_id" = i64, Path, description = "User ID"), LimitQuery),
    responses(
        (status = 200, description = "Most recent check-ins first", body = Vec<CheckIn>),
    )
)]
pub async fn list_checkins(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    Query(query): Query<LimitQuery>,
) -> ApiResponse<Vec<CheckIn>> {
    let limit = query.resolve(DEFAULT_LIMIT);
    match state.checkins.recent_checkins(user_id, limit).await {
        Ok(checkins) => ApiResponse::list(checkins, Some(limit)),
        Err(e) => e.into(),
    }
}
