//! v1 Admin handlers.

use axum::extract::{Path, Query, State};
use chrono::Utc;

use crate::api::v1::dto::FairnessQuery;
use crate::api::v1::response::{ApiError, ApiResponse};
use crate::api::AppState;
use crate::services::FairnessReport;

/// `GET /api/v1/admin/fairness/{api}`
///
/// Today's call counts for one third-party API across the given users, and
/// whether the spread between them is within bounds.
#[utoipa::path(
    get,
    path = "/api/v1/admin/fairness/{api}",
    tag = "admin",
    operation_id = "admin.fairness",
    params(("api" = String, Path, description = "`usda`, `youtube` or `openai`"), FairnessQuery),
    responses(
        (status = 200, description = "Usage distribution", body = FairnessReport),
        (status = 400, description = "Malformed user id list", body = ApiError),
    )
)]
pub async fn fairness_report(
    State(state): State<AppState>,
    Path(api): Path<String>,
    Query(query): Query<FairnessQuery>,
) -> ApiResponse<FairnessReport> {
    let user_ids = match query.parse_user_ids() {
        Ok(ids) => ids,
        Err(e) => return e.into(),
    };

    let today = Utc::now().date_naive();
    match state.fairness.report(&user_ids, &api, today).await {
        Ok(report) => {
            if !report.fair {
                tracing::warn!(api = %api, total_calls = report.total_calls, "Uneven API usage across users");
            }
            ApiResponse::success(report)
        }
        Err(e) => e.into(),
    }
}
