//! v1 User handlers.

use axum::extract::{Path, State};
use validator::Validate;

use crate::api::extractors::AppJson;
use crate::api::v1::response::{ApiError, ApiResponse};
use crate::api::AppState;
use crate::error::PranaError;
use crate::models::{NewUser, User, UserUpdate};

use super::require_user;

/// `POST /api/v1/users`
#[utoipa::path(
    post,
    path = "/api/v1/users",
    tag = "users",
    operation_id = "users.create",
    request_body = NewUser,
    responses(
        (status = 201, description = "User registered", body = User),
        (status = 400, description = "Invalid profile", body = ApiError),
        (status = 409, description = "Email already registered", body = ApiError),
    )
)]
pub async fn create_user(
    State(state): State<AppState>,
    AppJson(req): AppJson<NewUser>,
) -> ApiResponse<User> {
    if let Err(e) = req.validate() {
        return PranaError::from(e).into();
    }

    match state.db.create_user(&req).await {
        Ok(user) => {
            tracing::info!(user_id = user.id, "User registered");
            ApiResponse::created(user)
        }
        Err(e) => e.into(),
    }
}

/// `GET /api/v1/users/{user_id}`
#[utoipa::path(
    get,
    path = "/api/v1/users/{user_id}",
    tag = "users",
    operation_id = "users.get",
    params(("user_id" = i64, Path, description = "User ID")),
    responses(
        (status = 200, description = "User found", body = User),
        (status = 404, description = "User not found", body = ApiError),
    )
)]
pub async fn get_user(State(state): State<AppState>, Path(user_id): Path<i64>) -> ApiResponse<User> {
    match require_user(&state, user_id).await {
        Ok(user) => ApiResponse::success(user),
        Err(e) => e.into(),
    }
}

/// `PATCH /api/v1/users/{user_id}`
#[utoipa::path(
    patch,
    path = "/api/v1/users/{user_id}",
    tag = "users",
    operation_id = "users.update",
    params(("user_id" = i64, Path, description = "User ID")),
    request_body = UserUpdate,
    responses(
        (status = 200, description = "User updated", body = User),
        (status = 404, description = "User not found", body = ApiError),
    )
)]
pub async fn update_user(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    AppJson(req): AppJson<UserUpdate>,
) -> ApiResponse<User> {
    if let Err(e) = req.validate() {
        return PranaError::from(e).into();
    }

    let mut user = match require_user(&state, user_id).await {
        Ok(user) => user,
        Err(e) => return e.into(),
    };
    user.apply(req);

    match state.db.update_user(&user).await {
        Ok(()) => ApiResponse::success(user),
        Err(e) => e.into(),
    }
}
