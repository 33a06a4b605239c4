use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};

use crate::error::Result;
use crate::models::{
    CheckIn, DecisionTrace, Memory, MemoryType, MlPrediction, NewUser, NutritionPlan,
    QuizResponse, User, YogaPlan,
};

// ---------------------------------------------------------------------------
// Individual store traits
// ---------------------------------------------------------------------------

/// Registration and profile access.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Fails with `Conflict` when the email is already registered.
    async fn create_user(&self, user: &NewUser) -> Result<User>;
    async fn get_user(&self, id: i64) -> Result<Option<User>>;
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;
    async fn update_user(&self, user: &User) -> Result<()>;
}

/// Daily self-reports.
#[async_trait]
pub trait CheckInStore: Send + Sync {
    async fn create_checkin(&self, checkin: &CheckIn) -> Result<()>;
    async fn latest_checkin(&self, user_id: i64) -> Result<Option<CheckIn>>;
    async fn recent_checkins(&self, user_id: i64, limit: u32) -> Result<Vec<CheckIn>>;
    async fn checkins_since(&self, user_id: i64, since: DateTime<Utc>) -> Result<Vec<CheckIn>>;
    /// Mean of the non-null adherence values since `since`, `None` when
    /// there are none.
    async fn average_adherence_since(
        &self,
        user_id: i64,
        since: DateTime<Utc>,
    ) -> Result<Option<f64>>;
}

/// Questionnaire submissions.
#[async_trait]
pub trait QuizStore: Send + Sync {
    async fn create_quiz(&self, quiz: &QuizResponse) -> Result<()>;
    async fn latest_quiz(&self, user_id: i64) -> Result<Option<QuizResponse>>;
    async fn recent_quizzes(&self, user_id: i64, limit: u32) -> Result<Vec<QuizResponse>>;
    async fn quizzes_since(&self, user_id: i64, since: DateTime<Utc>)
        -> Result<Vec<QuizResponse>>;
}

/// Typed user memories (preferences, liked meals, ...).
#[async_trait]
pub trait MemoryStore: Send + Sync {
    async fn create_memory(&self, memory: &Memory) -> Result<()>;
    async fn list_memories(&self, user_id: i64) -> Result<Vec<Memory>>;
    /// Most recently accessed first. Read-only: access times are not bumped.
    async fn recent_memories(&self, user_id: i64, limit: u32) -> Result<Vec<Memory>>;
    async fn memories_of_type(
        &self,
        user_id: i64,
        memory_type: &MemoryType,
    ) -> Result<Vec<Memory>>;
}

/// Decision traces and the predictions recorded with them.
#[async_trait]
pub trait TraceStore: Send + Sync {
    /// Writes both rows atomically: either both exist afterwards or neither.
    async fn record_reasoning(&self, trace: &DecisionTrace, prediction: &MlPrediction)
        -> Result<()>;
    async fn recent_traces(&self, user_id: i64, limit: u32) -> Result<Vec<DecisionTrace>>;
    async fn traces_since(&self, user_id: i64, since: DateTime<Utc>)
        -> Result<Vec<DecisionTrace>>;
    async fn recent_predictions(&self, user_id: i64, limit: u32) -> Result<Vec<MlPrediction>>;
}

/// Nutrition and yoga artifacts produced by the downstream planners.
#[async_trait]
pub trait PlanStore: Send + Sync {
    async fn create_nutrition_plan(&self, plan: &NutritionPlan) -> Result<()>;
    async fn recent_nutrition_plans(&self, user_id: i64, limit: u32)
        -> Result<Vec<NutritionPlan>>;
    async fn nutrition_plans_since(
        &self,
        user_id: i64,
        since: DateTime<Utc>,
    ) -> Result<Vec<NutritionPlan>>;
    async fn create_yoga_plan(&self, plan: &YogaPlan) -> Result<()>;
    async fn recent_yoga_plans(&self, user_id: i64, limit: u32) -> Result<Vec<YogaPlan>>;
    async fn yoga_plans_since(&self, user_id: i64, since: DateTime<Utc>)
        -> Result<Vec<YogaPlan>>;
}

/// Per-day third-party call counters keyed by (api, user, day).
#[async_trait]
pub trait ApiUsageStore: Send + Sync {
    async fn api_calls(&self, api: &str, user_id: i64, day: NaiveDate) -> Result<u32>;
    /// Returns the counter value after the increment.
    async fn increment_api_calls(&self, api: &str, user_id: i64, day: NaiveDate) -> Result<u32>;
    /// Counts for each requested user; users without calls map to 0.
    async fn api_calls_for_users(
        &self,
        api: &str,
        user_ids: &[i64],
        day: NaiveDate,
    ) -> Result<HashMap<i64, u32>>;
}

// ---------------------------------------------------------------------------
// Composite backend trait
// ---------------------------------------------------------------------------

/// Everything the service layer needs from persistence.
#[async_trait]
pub trait DatabaseBackend:
    UserStore + CheckInStore + QuizStore + MemoryStore + TraceStore + PlanStore + ApiUsageStore
{
    async fn sync(&self) -> Result<()>;
}
