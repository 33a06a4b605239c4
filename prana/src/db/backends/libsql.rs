use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};

use crate::db::connection::Database;
use crate::db::repository::{
    ApiUsageRepository, CheckInRepository, MemoryRepository, PlanRepository, QuizRepository,
    TraceRepository, UserRepository,
};
use crate::db::traits::{
    ApiUsageStore, CheckInStore, DatabaseBackend, MemoryStore, PlanStore, QuizStore, TraceStore,
    UserStore,
};
use crate::error::Result;
use crate::models::{
    CheckIn, DecisionTrace, Memory, MemoryType, MlPrediction, NewUser, NutritionPlan,
    QuizResponse, User, YogaPlan,
};

pub struct LibSqlBackend {
    db: Database,
}

impl LibSqlBackend {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserStore for LibSqlBackend {
    async fn create_user(&self, user: &NewUser) -> Result<User> {
        let conn = self.db.connect()?;
        UserRepository::create(&conn, user).await
    }
    async fn get_user(&self, id: i64) -> Result<Option<User>> {
        let conn = self.db.connect()?;
        UserRepository::get_by_id(&conn, id).await
    }
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let conn = self.db.connect()?;
        UserRepository::get_by_email(&conn, email).await
    }
    async fn update_user(&self, user: &User) -> Result<()> {
        let conn = self.db.connect()?;
        UserRepository::update(&conn, user).await
    }
}

#[async_trait]
impl CheckInStore for LibSqlBackend {
    async fn create_checkin(&self, checkin: &CheckIn) -> Result<()> {
        let conn = self.db.connect()?;
        CheckInRepository::create(&conn, checkin).await
    }
    async fn latest_checkin(&self, user_id: i64) -> Result<Option<CheckIn>> {
        let conn = self.db.connect()?;
        CheckInRepository::latest(&conn, user_id).await
    }
    async fn recent_checkins(&self, user_id: i64, limit: u32) -> Result<Vec<CheckIn>> {
        let conn = self.db.connect()?;
        CheckInRepository::recent(&conn, user_id, limit).await
    }
    async fn checkins_since(&self, user_id: i64, since: DateTime<Utc>) -> Result<Vec<CheckIn>> {
        let conn = self.db.connect()?;
        CheckInRepository::since(&conn, user_id, since).await
    }
    async fn average_adherence_since(
        &self,
        user_id: i64,
        since: DateTime<Utc>,
    ) -> Result<Option<f64>> {
        let conn = self.db.connect()?;
        CheckInRepository::average_adherence_since(&conn, user_id, since).await
    }
}

#[async_trait]
impl QuizStore for LibSqlBackend {
    async fn create_quiz(&self, quiz: &QuizResponse) -> Result<()> {
        let conn = self.db.connect()?;
        QuizRepository::create(&conn, quiz).await
    }
    async fn latest_quiz(&self, user_id: i64) -> Result<Option<QuizResponse>> {
        let conn = self.db.connect()?;
        QuizRepository::latest(&conn, user_id).await
    }
    async fn recent_quizzes(&self, user_id: i64, limit: u32) -> Result<Vec<QuizResponse>> {
        let conn = self.db.connect()?;
        QuizRepository::recent(&conn, user_id, limit).await
    }
    async fn quizzes_since(
        &self,
        user_id: i64,
        since: DateTime<Utc>,
    ) -> Result<Vec<QuizResponse>> {
        let conn = self.db.connect()?;
        QuizRepository::since(&conn, user_id, since).await
    }
}

#[async_trait]
impl MemoryStore for LibSqlBackend {
    async fn create_memory(&self, memory: &Memory) -> Result<()> {
        let conn = self.db.connect()?;
        MemoryRepository::create(&conn, memory).await
    }
    async fn list_memories(&self, user_id: i64) -> Result<Vec<Memory>> {
        let conn = self.db.connect()?;
        MemoryRepository::list(&conn, user_id).await
    }
    async fn recent_memories(&self, user_id: i64, limit: u32) -> Result<Vec<Memory>> {
        let conn = self.db.connect()?;
        MemoryRepository::recent(&conn, user_id, limit).await
    }
    async fn memories_of_type(
        &self,
        user_id: i64,
        memory_type: &MemoryType,
    ) -> Result<Vec<Memory>> {
        let conn = self.db.connect()?;
        MemoryRepository::of_type(&conn, user_id, memory_type).await
    }
}

#[async_trait]
impl TraceStore for LibSqlBackend {
    async fn record_reasoning(
        &self,
        trace: &DecisionTrace,
        prediction: &MlPrediction,
    ) -> Result<()> {
        let conn = self.db.connect()?;
        TraceRepository::record(&conn, trace, prediction).await
    }
    async fn recent_traces(&self, user_id: i64, limit: u32) -> Result<Vec<DecisionTrace>> {
        let conn = self.db.connect()?;
        TraceRepository::recent(&conn, user_id, limit).await
    }
    async fn traces_since(
        &self,
        user_id: i64,
        since: DateTime<Utc>,
    ) -> Result<Vec<DecisionTrace>> {
        let conn = self.db.connect()?;
        TraceRepository::since(&conn, user_id, since).await
    }
    async fn recent_predictions(&self, user_id: i64, limit: u32) -> Result<Vec<MlPrediction>> {
        let conn = self.db.connect()?;
        TraceRepository::recent_predictions(&conn, user_id, limit).await
    }
}

#[async_trait]
impl PlanStore for LibSqlBackend {
    async fn create_nutrition_plan(&self, plan: &NutritionPlan) -> Result<()> {
        let conn = self.db.connect()?;
        PlanRepository::create_nutrition(&conn, plan).await
    }
    async fn recent_nutrition_plans(
        &self,
        user_id: i64,
        limit: u32,
    ) -> Result<Vec<NutritionPlan>> {
        let conn = self.db.connect()?;
        PlanRepository::recent_nutrition(&conn, user_id, limit).await
    }
    async fn nutrition_plans_since(
        &self,
        user_id: i64,
        since: DateTime<Utc>,
    ) -> Result<Vec<NutritionPlan>> {
        let conn = self.db.connect()?;
        PlanRepository::nutrition_since(&conn, user_id, since).await
    }
    async fn create_yoga_plan(&self, plan: &YogaPlan) -> Result<()> {
        let conn = self.db.connect()?;
        PlanRepository::create_yoga(&conn, plan).await
    }
    async fn recent_yoga_plans(&self, user_id: i64, limit: u32) -> Result<Vec<YogaPlan>> {
        let conn = self.db.connect()?;
        PlanRepository::recent_yoga(&conn, user_id, limit).await
    }
    async fn yoga_plans_since(
        &self,
        user_id: i64,
        since: DateTime<Utc>,
    ) -> Result<Vec<YogaPlan>> {
        let conn = self.db.connect()?;
        PlanRepository::yoga_since(&conn, user_id, since).await
    }
}

#[async_trait]
impl ApiUsageStore for LibSqlBackend {
    async fn api_calls(&self, api: &str, user_id: i64, day: NaiveDate) -> Result<u32> {
        let conn = self.db.connect()?;
        ApiUsageRepository::get(&conn, api, user_id, day).await
    }
    async fn increment_api_calls(&self, api: &str, user_id: i64, day: NaiveDate) -> Result<u32> {
        let conn = self.db.connect()?;
        ApiUsageRepository::increment(&conn, api, user_id, day).await
    }
    async fn api_calls_for_users(
        &self,
        api: &str,
        user_ids: &[i64],
        day: NaiveDate,
    ) -> Result<HashMap<i64, u32>> {
        let conn = self.db.connect()?;
        ApiUsageRepository::for_users(&conn, api, user_ids, day).await
    }
}

#[async_trait]
impl DatabaseBackend for LibSqlBackend {
    async fn sync(&self) -> Result<()> {
        self.db.sync().await
    }
}
