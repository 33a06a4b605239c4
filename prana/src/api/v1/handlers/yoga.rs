//! v1 Yoga handlers.

use axum::extract::{Path, Query, State};
use chrono::Utc;
use validator::Validate;

use crate::api::extractors::AppJson;
use crate::api::v1::dto::{LimitQuery, YogaPlanRequest};
use crate::api::v1::response::{ApiError, ApiResponse};
use crate::api::AppState;
use crate::error::PranaError;
use crate::models::{EnergyTrend, YogaPlan, DEFAULT_DIMENSION_SCORE};
use crate::services::fairness::YOUTUBE_API;

use super::require_user;

const DEFAULT_LIMIT: u32 = 10;

/// `POST /api/v1/users/{user_id}/yoga/plan`
#[utoipa::path(
    post,
    path = "/api/v1/users/{user_id}/yoga/plan",
    tag = "yoga",
    operation_id = "yoga.plan.create",
    params(("user_id" = i64, Path, description = "User ID")),
    request_body = YogaPlanRequest,
    responses(
        (status = 201, description = "Session stored with a video", body = YogaPlan),
        (status = 404, description = "User not found", body = ApiError),
        (status = 429, description = "Daily YouTube budget spent", body = ApiError),
    )
)]
pub async fn create_plan(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    AppJson(req): AppJson<YogaPlanRequest>,
) -> ApiResponse<YogaPlan> {
    if let Err(e) = req.validate() {
        return PranaError::from(e).into();
    }
    let user = match require_user(&state, user_id).await {
        Ok(user) => user,
        Err(e) => return e.into(),
    };

    let today = Utc::now().date_naive();
    if let Err(e) = state.fairness.require_quota(YOUTUBE_API, user_id, today).await {
        return e.into();
    }

    let stress_level = match req.stress_level {
        Some(level) => level,
        None => match state.db.latest_quiz(user_id).await {
            Ok(quiz) => quiz.map_or(DEFAULT_DIMENSION_SCORE, |q| q.stress),
            Err(e) => return e.into(),
        },
    };

    let plan = match state
        .yoga
        .generate_yoga_plan(
            user_id,
            req.session_type,
            req.duration_minutes,
            req.energy_trend.unwrap_or(EnergyTrend::Medium),
            stress_level,
            user.yoga_experience,
        )
        .await
    {
        Ok(plan) => plan,
        Err(e) => return e.into(),
    };

    match state.fairness.record_call(YOUTUBE_API, user_id, today).await {
        Ok(_) => ApiResponse::created(plan),
        Err(e) => e.into(),
    }
}

/// `POST /api/v1/users/{user_id}/yoga/weekly`
///
/// Seven sessions following the fixed weekly rotation.
#[utoipa::path(
    post,
    path = "/api/v1/users/{user_id}/yoga/weekly",
    tag = "yoga",
    operation_id = "yoga.weekly",
    params(("user_id" = i64, Path, description = "User ID")),
    responses(
        (status = 201, description = "Seven sessions stored", body = Vec<YogaPlan>),
        (status = 404, description = "User not found", body = ApiError),
    )
)]
pub async fn weekly_plan(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> ApiResponse<Vec<YogaPlan>> {
    let user = match require_user(&state, user_id).await {
        Ok(user) => user,
        Err(e) => return e.into(),
    };

    match state.yoga.generate_weekly_plan(user_id, user.yoga_experience).await {
        Ok(plans) => ApiResponse::created(plans),
        Err(e) => e.into(),
    }
}

/// `GET /api/v1/users/{user_id}/yoga/plans`
#[utoipa::path(
    get,
    path = "/api/v1/users/{user_id}/yoga/plans",
    tag = "yoga",
    operation_id = "yoga.plans.list",
    params(("user_id" = i64, Path, description = "User ID"), LimitQuery),
    responses(
        (status = 200, description = "Most recent sessions first", body = Vec<YogaPlan>),
    )
)]
pub async fn list_plans(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    Query(query): Query<LimitQuery>,
) -> ApiResponse<Vec<YogaPlan>> {
    let limit = query.resolve(DEFAULT_LIMIT);
    match state.yoga.recent_plans(user_id, limit).await {
        Ok(plans) => ApiResponse::list(plans, Some(limit)),
        Err(e) => e.into(),
    }
}

/// `GET /api/v1/users/{user_id}/yoga/plans/today`
#[utoipa::path(
    get,
    path = "/api/v1/users/{user_id}/yoga/plans/today",
    tag = "yoga",
    operation_id = "yoga.plans.today",
    params(("user_id" = i64, Path, description = "User ID")),
    responses(
        (status = 200, description = "Today's session", body = YogaPlan),
        (status = 404, description = "No session planned today", body = ApiError),
    )
)]
pub async fn today_plan(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> ApiResponse<YogaPlan> {
    match state.yoga.today_plan(user_id, Utc::now()).await {
        Ok(Some(plan)) => ApiResponse::success(plan),
        Ok(None) => PranaError::NotFound(format!("No yoga plan today for user {user_id}")).into(),
        Err(e) => e.into(),
    }
}
