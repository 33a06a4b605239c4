//! v1 Report handlers.

use axum::extract::{Path, State};
use chrono::Utc;

use crate::api::v1::response::{ApiError, ApiResponse};
use crate::api::AppState;
use crate::models::{MonthlyReport, WeeklyReport};

use super::require_user;

/// `GET /api/v1/users/{user_id}/reports/weekly`
#[utoipa::path(
    get,
    path = "/api/v1/users/{user_id}/reports/weekly",
    tag = "reports",
    operation_id = "reports.weekly",
    params(("user_id" = i64, Path, description = "User ID")),
    responses(
        (status = 200, description = "Last seven days", body = WeeklyReport),
        (status = 404, description = "User not found", body = ApiError),
    )
)]
pub async fn weekly_report(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> ApiResponse<WeeklyReport> {
    if let Err(e) = require_user(&state, user_id).await {
        return e.into();
    }

    match state.reports.weekly_report(user_id, Utc::now()).await {
        Ok(report) => ApiResponse::success(report),
        Err(e) => e.into(),
    }
}

/// `GET /api/v1/users/{user_id}/reports/monthly`
#[utoipa::path(
    get,
    path = "/api/v1/users/{user_id}/reports/monthly",
    tag = "reports",
    operation_id = "reports.monthly",
    params(("user_id" = i64, Path, description = "User ID")),
    responses(
        (status = 200, description = "Last thirty days", body = MonthlyReport),
        (status = 404, description = "User not found", body = ApiError),
    )
)]
pub async fn monthly_report(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> ApiResponse<MonthlyReport> {
    if let Err(e) = require_user(&state, user_id).await {
        return e.into();
    }

    match state.reports.monthly_report(user_id, Utc::now()).await {
        Ok(report) => ApiResponse::success(report),
        Err(e) => e.into(),
    }
}
