//! Admin DTOs for the v1 API.

use serde::Deserialize;

use crate::error::{PranaError, Result};

/// Query for `GET /v1/admin/fairness/{api}`.
#[derive(Debug, Clone, Deserialize, utoipa::ToSchema, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct FairnessQuery {
    /// Comma separated user IDs, e.g. `1,2,3`.
    pub user_ids: String,
}

impl FairnessQuery {
    pub fn parse_user_ids(&self) -> Result<Vec<i64>> {
        self.user_ids
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| {
                s.parse::<i64>()
                    .map_err(|_| PranaError::Validation(format!("Invalid user id: {s}")))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_user_id_list() {
        let query = FairnessQuery {
            user_ids: "1, 2,,3".to_string(),
        };
        assert_eq!(query.parse_user_ids().unwrap(), vec![1, 2, 3]);

        let bad = FairnessQuery {
            user_ids: "1,two".to_string(),
        };
        assert!(bad.parse_user_ids().is_err());
    }
}
