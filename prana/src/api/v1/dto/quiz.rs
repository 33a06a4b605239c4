//! Quiz request DTOs for the v1 API.

use std::collections::HashMap;

use serde::Deserialize;

/// Request body for `POST /v1/users/{user_id}/quiz`.
#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
pub struct SubmitQuizRequest {
    /// Scores keyed by dimension: `stress`, `anxiety`, `motivation`,
    /// `mindfulness`, `appetite`, `sleep`. Missing dimensions score 50.
    #[serde(default)]
    pub responses: HashMap<String, i32>,
}
