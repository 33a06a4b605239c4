//! v1 Quiz handlers.

use axum::extract::{Path, Query, State};

use crate::api::extractors::AppJson;
use crate::api::v1::dto::{LimitQuery, SubmitQuizRequest};
use crate::api::v1::response::{ApiError, ApiResponse};
use crate::api::AppState;
use crate::models::{quiz_questions, QuizQuestion, QuizResponse};

const DEFAULT_LIMIT: u32 = 5;

/// `GET /api/v1/quiz/questions`
#[utoipa::path(
    get,
    path = "/api/v1/quiz/questions",
    tag = "quiz",
    operation_id = "quiz.questions",
    responses(
        (status = 200, description = "The six fixed questions", body = Vec<QuizQuestion>),
    )
)]
pub async fn list_questions() -> ApiResponse<Vec<QuizQuestion>> {
    ApiResponse::list(quiz_questions(), None)
}

/// `POST /api/v1/users/{user_id}/quiz`
#[utoipa::path(
    post,
    path = "/api/v1/users/{user_id}/quiz",
    tag = "quiz",
    operation_id = "quiz.submit",
    params(("user_id" = i64, Path, description = "User ID")),
    request_body = SubmitQuizRequest,
    responses(
        (status = 201, description = "Quiz scored and stored", body = QuizResponse),
        (status = 404, description = "User not found", body = ApiError),
    )
)]
pub async fn submit_quiz(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    AppJson(req): AppJson<SubmitQuizRequest>,
) -> ApiResponse<QuizResponse> {
    match state.checkins.submit_quiz(user_id, req.responses).await {
        Ok(quiz) => ApiResponse::created(quiz),
        Err(e) => e.into(),
    }
}

/// `GET /api/v1/users/{user_id}/quiz`
#[utoipa::path(
    get,
    path = "/api/v1/users/{user_id}/quiz",
    tag = "quiz",
    operation_id = "quiz.list",
    params(("user_id" = i64, Path, description = "User ID"), LimitQuery),
    responses(
        (status = 200, description = "Most recent submissions first", body = Vec<QuizResponse>),
    )
)]
pub async fn list_quizzes(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    Query(query): Query<LimitQuery>,
) -> ApiResponse<Vec<QuizResponse>> {
    let limit = query.resolve(DEFAULT_LIMIT);
    match state.checkins.recent_quizzes(user_id, limit).await {
        Ok(quizzes) => ApiResponse::list(quizzes, Some(limit)),
        Err(e) => e.into(),
    }
}
