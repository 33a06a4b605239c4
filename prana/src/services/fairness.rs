use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;

use crate::config::{ApiLimit, QuotaConfig};
use crate::db::DatabaseBackend;
use crate::error::{PranaError, Result};
use crate::models::QuotaStatus;

pub const USDA_API: &str = "usda";
pub const YOUTUBE_API: &str = "youtube";
pub const OPENAI_API: &str = "openai";

/// Today's usage of one API across a set of users.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct FairnessReport {
    pub api: String,
    pub day: NaiveDate,
    pub fair: bool,
    pub calls: HashMap<i64, u32>,
    pub per_user_daily_limit: u32,
    pub daily_limit: u32,
    pub total_calls: u32,
}

/// Per-user daily API budgets backed by the `api_usage` counter.
#[derive(Clone)]
pub struct FairnessService {
    db: Arc<dyn DatabaseBackend>,
    quota: QuotaConfig,
}

impl FairnessService {
    pub fn new(db: Arc<dyn DatabaseBackend>, quota: QuotaConfig) -> Self {
        Self { db, quota }
    }

    pub fn limit_for(&self, api: &str) -> ApiLimit {
        self.quota.limit_for(api)
    }

    pub async fn check_quota(&self, api: &str, user_id: i64, day: NaiveDate) -> Result<QuotaStatus> {
        let used = self.db.api_calls(api, user_id, day).await?;
        let status = QuotaStatus::evaluate(api, used, self.limit_for(api).per_user_daily);

        if !status.allowed {
            tracing::info!(api, user_id, calls_used = used, "API quota exhausted");
        }

        Ok(status)
    }

    /// Like [`check_quota`](Self::check_quota) but fails with
    /// `QuotaExceeded` once the budget is spent.
    pub async fn require_quota(&self, api: &str, user_id: i64, day: NaiveDate) -> Result<QuotaStatus> {
        let status = self.check_quota(api, user_id, day).await?;
        if status.allowed {
            Ok(status)
        } else {
            Err(PranaError::QuotaExceeded {
                api: api.to_string(),
                limit: status.limit,
            })
        }
    }

    pub async fn record_call(&self, api: &str, user_id: i64, day: NaiveDate) -> Result<u32> {
        let calls = self.db.increment_api_calls(api, user_id, day).await?;
        tracing::debug!(api, user_id, calls, "API call recorded");
        Ok(calls)
    }

    /// False when the busiest and quietest user are further apart than the
    /// configured spread.
    pub async fn ensure_fair_distribution(
        &self,
        user_ids: &[i64],
        api: &str,
        day: NaiveDate,
    ) -> Result<bool> {
        let counts = self.db.api_calls_for_users(api, user_ids, day).await?;
        Ok(is_fair(counts.values().copied(), self.quota.max_spread))
    }

    pub async fn report(&self, user_ids: &[i64], api: &str, day: NaiveDate) -> Result<FairnessReport> {
        let calls = self.db.api_calls_for_users(api, user_ids, day).await?;
        let limit = self.limit_for(api);

        Ok(FairnessReport {
            api: api.to_string(),
            day,
            fair: is_fair(calls.values().copied(), self.quota.max_spread),
            total_calls: calls.values().sum(),
            per_user_daily_limit: limit.per_user_daily,
            daily_limit: limit.daily,
            calls,
        })
    }
}

pub fn is_fair(counts: impl IntoIterator<Item = u32>, max_spread: u32) -> bool {
    let (min, max) = counts
        .into_iter()
        .fold((u32::MAX, 0), |(lo, hi), c| (lo.min(c), hi.max(c)));

    min == u32::MAX || max - min <= max_spread
}
