//! Yoga request DTOs for the v1 API.

use serde::Deserialize;
use validator::Validate;

use crate::models::{EnergyTrend, SessionType};

/// Request body for `POST /v1/users/{user_id}/yoga/plan`.
#[derive(Debug, Clone, Deserialize, Validate, utoipa::ToSchema)]
pub struct YogaPlanRequest {
    pub session_type: SessionType,
    #[validate(range(min = 5, max = 120))]
    pub duration_minutes: u32,
    /// Defaults to `medium`.
    pub energy_trend: Option<EnergyTrend>,
    /// Defaults to the latest quiz stress score, or 50.
    #[validate(range(min = 0, max = 100))]
    pub stress_level: Option<i32>,
}
