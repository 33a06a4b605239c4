//! v1 Chat coach handler.

use axum::extract::{Path, State};
use chrono::Utc;
use validator::Validate;

use crate::api::extractors::AppJson;
use crate::api::v1::dto::ChatRequest;
use crate::api::v1::response::{ApiError, ApiResponse};
use crate::api::AppState;
use crate::error::PranaError;
use crate::models::ChatReply;

use super::require_user;

/// `POST /api/v1/users/{user_id}/chat`
///
/// Answers the last message of the conversation. Without a configured LLM,
/// or once the user's daily LLM budget is spent, the reply is a canned one.
#[utoipa::path(
    post,
    path = "/api/v1/users/{user_id}/chat",
    tag = "chat",
    operation_id = "chat.reply",
    params(("user_id" = i64, Path, description = "User ID")),
    request_body = ChatRequest,
    responses(
        (status = 200, description = "Coach reply", body = ChatReply),
        (status = 400, description = "Invalid request", body = ApiError),
        (status = 404, description = "User not found", body = ApiError),
    )
)]
pub async fn chat(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    AppJson(req): AppJson<ChatRequest>,
) -> ApiResponse<ChatReply> {
    if let Err(e) = req.validate() {
        return PranaError::from(e).into();
    }
    let user = match require_user(&state, user_id).await {
        Ok(user) => user,
        Err(e) => return e.into(),
    };

    match state
        .chat
        .reply(&user, &req.messages, Utc::now().date_naive())
        .await
    {
        Ok(reply) => ApiResponse::success(reply),
        Err(e) => e.into(),
    }
}
