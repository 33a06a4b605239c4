//! v1 Dashboard handlers.

use axum::extract::{Path, Query, State};
use chrono::Utc;

use crate::api::v1::dto::TrendsQuery;
use crate::api::v1::response::{ApiError, ApiResponse};
use crate::api::AppState;
use crate::models::{DashboardOverview, DashboardTrends, TopItems};

use super::require_user;

/// `GET /api/v1/users/{user_id}/dashboard/overview`
#[utoipa::path(
    get,
    path = "/api/v1/users/{user_id}/dashboard/overview",
    tag = "dashboard",
    operation_id = "dashboard.overview",
    params(("user_id" = i64, Path, description = "User ID")),
    responses(
        (status = 200, description = "Last seven days at a glance", body = DashboardOverview),
        (status = 404, description = "User not found", body = ApiError),
    )
)]
pub async fn overview(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> ApiResponse<DashboardOverview> {
    if let Err(e) = require_user(&state, user_id).await {
        return e.into();
    }

    match state.dashboard.overview(user_id, Utc::now()).await {
        Ok(overview) => ApiResponse::success(overview),
        Err(e) => e.into(),
    }
}

/// `GET /api/v1/users/{user_id}/dashboard/trends`
#[utoipa::path(
    get,
    path = "/api/v1/users/{user_id}/dashboard/trends",
    tag = "dashboard",
    operation_id = "dashboard.trends",
    params(("user_id" = i64, Path, description = "User ID"), TrendsQuery),
    responses(
        (status = 200, description = "Chart series, oldest point first", body = DashboardTrends),
        (status = 404, description = "User not found", body = ApiError),
    )
)]
pub async fn trends(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    Query(query): Query<TrendsQuery>,
) -> ApiResponse<DashboardTrends> {
    if let Err(e) = require_user(&state, user_id).await {
        return e.into();
    }

    match state.dashboard.trends(user_id, query.resolve(), Utc::now()).await {
        Ok(trends) => ApiResponse::success(trends),
        Err(e) => e.into(),
    }
}

/// `GET /api/v1/users/{user_id}/dashboard/top-items`
#[utoipa::path(
    get,
    path = "/api/v1/users/{user_id}/dashboard/top-items",
    tag = "dashboard",
    operation_id = "dashboard.top_items",
    params(("user_id" = i64, Path, description = "User ID")),
    responses(
        (status = 200, description = "Most frequent meals and latest videos", body = TopItems),
        (status = 404, description = "User not found", body = ApiError),
    )
)]
pub async fn top_items(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> ApiResponse<TopItems> {
    if let Err(e) = require_user(&state, user_id).await {
        return e.into();
    }

    match state.dashboard.top_items(user_id).await {
        Ok(items) => ApiResponse::success(items),
        Err(e) => e.into(),
    }
}
