//! Dashboard request DTOs for the v1 API.

use serde::Deserialize;

use crate::services::dashboard::DEFAULT_TREND_DAYS;

/// Query parameters for `GET /v1/users/{user_id}/dashboard/trends`.
#[derive(Debug, Clone, Default, Deserialize, utoipa::ToSchema, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TrendsQuery {
    /// Days of history to chart. Defaults to 30, at most 365.
    pub days: Option<u32>,
}

impl TrendsQuery {
    pub fn resolve(&self) -> u32 {
        self.days.unwrap_or(DEFAULT_TREND_DAYS)
    }
}
