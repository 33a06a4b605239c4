//! Memory request DTOs for the v1 API.

use serde::Deserialize;
use validator::Validate;

/// Request body for `POST /v1/users/{user_id}/memories`.
#[derive(Debug, Clone, Deserialize, Validate, utoipa::ToSchema)]
pub struct CreateMemoryRequest {
    /// `preference`, `liked_meal`, `disliked_meal`, `successful_plan` or any
    /// other tag.
    #[validate(length(min = 1, max = 64))]
    pub memory_type: String,
    /// Arbitrary JSON payload.
    #[schema(value_type = Object)]
    pub content: serde_json::Value,
}
