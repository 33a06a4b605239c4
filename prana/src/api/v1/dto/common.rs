//! Shared DTO types used across multiple v1 API endpoints.

use serde::Deserialize;

/// Upper bound on any `?limit=` list parameter.
pub const MAX_LIST_LIMIT: u32 = 100;

/// Query parameters for list endpoints (`?limit=`).
#[derive(Debug, Clone, Default, Deserialize, utoipa::ToSchema, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct LimitQuery {
    /// Maximum items to return. Each endpoint has its own default.
    pub limit: Option<u32>,
}

impl LimitQuery {
    /// The requested limit clamped to `1..=100`, or `default`.
    pub fn resolve(&self, default: u32) -> u32 {
        self.limit.unwrap_or(default).clamp(1, MAX_LIST_LIMIT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limit_defaults_and_clamps() {
        assert_eq!(LimitQuery::default().resolve(7), 7);
        assert_eq!(LimitQuery { limit: Some(0) }.resolve(7), 1);
        assert_eq!(LimitQuery { limit: Some(500) }.resolve(7), 100);
    }
}
