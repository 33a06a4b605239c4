//! v1 Memory handlers.

use axum::extract::{Path, State};
use validator::Validate;

use crate::api::extractors::AppJson;
use crate::api::v1::dto::CreateMemoryRequest;
use crate::api::v1::response::{ApiError, ApiResponse};
use crate::api::AppState;
use crate::error::PranaError;
use crate::models::{Memory, MemoryType};

use super::require_user;

/// `POST /api/v1/users/{user_id}/memories`
#[utoipa::path(
    post,
    path = "/api/v1/users/{user_id}/memories",
    tag = "memories",
    operation_id = "memories.create",
    params(("user_id" = i64, Path, description = "User ID")),
    request_body = CreateMemoryRequest,
    responses(
        (status = 201, description = "Memory stored", body = Memory),
        (status = 400, description = "Invalid request", body = ApiError),
        (status = 404, description = "User not found", body = ApiError),
    )
)]
pub async fn create_memory(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    AppJson(req): AppJson<CreateMemoryRequest>,
) -> ApiResponse<Memory> {
    if let Err(e) = req.validate() {
        return PranaError::from(e).into();
    }
    if let Err(e) = require_user(&state, user_id).await {
        return e.into();
    }

    let memory = Memory::new(user_id, MemoryType::from(req.memory_type), req.content);
    match state.db.create_memory(&memory).await {
        Ok(()) => ApiResponse::created(memory),
        Err(e) => e.into(),
    }
}

/// `GET /api/v1/users/{user_id}/memories`
#[utoipa::path(
    get,
    path = "/api/v1/users/{user_id}/memories",
    tag = "memories",
    operation_id = "memories.list",
    params(("user_id" = i64, Path, description = "User ID")),
    responses(
        (status = 200, description = "All memories of the user", body = Vec<Memory>),
    )
)]
pub async fn list_memories(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> ApiResponse<Vec<Memory>> {
    match state.db.list_memories(user_id).await {
        Ok(memories) => ApiResponse::list(memories, None),
        Err(e) => e.into(),
    }
}
