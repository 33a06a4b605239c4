use std::collections::HashMap;
use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use serde::Serialize;
use validator::Validate;

use crate::db::DatabaseBackend;
use crate::error::{PranaError, Result};
use crate::models::{
    CheckIn, MealType, NewCheckIn, NutritionPlan, QuizResponse, ReasoningOutcome, User, YogaPlan,
    validate_quiz_responses, DEFAULT_DIMENSION_SCORE,
};
use crate::services::fairness::{FairnessService, USDA_API, YOUTUBE_API};
use crate::services::{NutritionService, Reasoner, YogaService};

/// Minimum ingredients handed to each meal.
const MIN_PER_MEAL: usize = 3;

/// Artifacts the downstream planners produced for one check-in.
#[derive(Debug, Clone, Default, Serialize, utoipa::ToSchema)]
pub struct GeneratedPlans {
    pub nutrition: Vec<NutritionPlan>,
    pub yoga: Option<YogaPlan>,
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct CheckInResult {
    pub checkin_id: String,
    pub reasoning: ReasoningOutcome,
    pub plans: GeneratedPlans,
}

/// Splits one day's ingredients across the four meals. Meals left empty
/// borrow from the list: the snack takes the last three, the others the
/// first three.
pub fn distribute_ingredients(ingredients: &[String]) -> Vec<(MealType, Vec<String>)> {
    let n = ingredients.len();
    if n == 0 {
        return Vec::new();
    }

    let per_meal = MIN_PER_MEAL.max(n / MealType::DAY.len());
    let last = MealType::DAY.len() - 1;

    MealType::DAY
        .iter()
        .enumerate()
        .map(|(idx, &meal)| {
            let start = (idx * per_meal).min(n);
            let end = if idx == last { n } else { (start + per_meal).min(n) };

            let share = if start < end {
                &ingredients[start..end]
            } else if meal == MealType::Snack {
                &ingredients[n.saturating_sub(MIN_PER_MEAL)..]
            } else {
                &ingredients[..MIN_PER_MEAL.min(n)]
            };

            (meal, share.to_vec())
        })
        .collect()
}

/// Daily self-reports: check-ins with their follow-up planning, and quizzes.
pub struct CheckInService {
    db: Arc<dyn DatabaseBackend>,
    reasoner: Arc<Reasoner>,
    nutrition: Arc<NutritionService>,
    yoga: Arc<YogaService>,
    fairness: FairnessService,
}

impl CheckInService {
    pub fn new(
        db: Arc<dyn DatabaseBackend>,
        reasoner: Arc<Reasoner>,
        nutrition: Arc<NutritionService>,
        yoga: Arc<YogaService>,
        fairness: FairnessService,
    ) -> Self {
        Self {
            db,
            reasoner,
            nutrition,
            yoga,
            fairness,
        }
    }

    async fn require_user(&self, user_id: i64) -> Result<User> {
        self.db
            .get_user(user_id)
            .await?
            .ok_or_else(|| PranaError::NotFound(format!("User {user_id} not found")))
    }

    /// Stores the check-in, reasons over the updated history and asks the
    /// planners for today's meals and session. Planner failures are logged
    /// and leave the corresponding plan out of the result.
    pub async fn submit_checkin(&self, user_id: i64, data: NewCheckIn) -> Result<CheckInResult> {
        data.validate()?;
        let user = self.require_user(user_id).await?;

        let now = Utc::now();
        let checkin = CheckIn::new(user_id, data, now);
        self.db.create_checkin(&checkin).await?;
        tracing::info!(user_id, checkin_id = %checkin.id, "Check-in stored");

        let reasoning = self.reasoner.reason(user_id).await?;
        let today = now.date_naive();

        let nutrition = self
            .plan_meals(user_id, &checkin.ingredient_list(), &reasoning, today)
            .await?;
        let yoga = self.plan_session(&user, &reasoning, today).await?;

        Ok(CheckInResult {
            checkin_id: checkin.id,
            reasoning,
            plans: GeneratedPlans { nutrition, yoga },
        })
    }

    async fn plan_meals(
        &self,
        user_id: i64,
        ingredients: &[String],
        reasoning: &ReasoningOutcome,
        today: NaiveDate,
    ) -> Result<Vec<NutritionPlan>> {
        if ingredients.is_empty() {
            return Ok(Vec::new());
        }

        let quota = self.fairness.check_quota(USDA_API, user_id, today).await?;
        if !quota.allowed {
            tracing::info!(user_id, reason = ?quota.reason, "Skipping meal planning");
            return Ok(Vec::new());
        }

        let mut plans = Vec::new();
        for (meal_type, share) in distribute_ingredients(ingredients) {
            if share.is_empty() {
                continue;
            }

            match self
                .nutrition
                .create_nutrition_plan(user_id, meal_type, &share, &reasoning.recommendations)
                .await
            {
                Ok(plan) => {
                    self.fairness.record_call(USDA_API, user_id, today).await?;
                    plans.push(plan);
                }
                Err(error) => {
                    tracing::warn!(user_id, meal_type = %meal_type, error = %error, "Meal plan failed");
                }
            }
        }

        Ok(plans)
    }

    async fn plan_session(
        &self,
        user: &User,
        reasoning: &ReasoningOutcome,
        today: NaiveDate,
    ) -> Result<Option<YogaPlan>> {
        let quota = self.fairness.check_quota(YOUTUBE_API, user.id, today).await?;
        if !quota.allowed {
            tracing::info!(user_id = user.id, reason = ?quota.reason, "Skipping yoga planning");
            return Ok(None);
        }

        let stress_level = self
            .db
            .latest_quiz(user.id)
            .await?
            .map(|quiz| quiz.stress)
            .unwrap_or(DEFAULT_DIMENSION_SCORE);
        let yoga = reasoning.recommendations.yoga;

        match self
            .yoga
            .generate_yoga_plan(
                user.id,
                yoga.session_type,
                yoga.duration_minutes,
                reasoning.energy_trend,
                stress_level,
                user.yoga_experience,
            )
            .await
        {
            Ok(plan) => {
                self.fairness.record_call(YOUTUBE_API, user.id, today).await?;
                Ok(Some(plan))
            }
            Err(error) => {
                tracing::warn!(user_id = user.id, error = %error, "Yoga plan failed");
                Ok(None)
            }
        }
    }

    pub async fn recent_checkins(&self, user_id: i64, limit: u32) -> Result<Vec<CheckIn>> {
        self.db.recent_checkins(user_id, limit).await
    }

    pub async fn submit_quiz(
        &self,
        user_id: i64,
        responses: HashMap<String, i32>,
    ) -> Result<QuizResponse> {
        validate_quiz_responses(&responses).map_err(PranaError::Validation)?;
        self.require_user(user_id).await?;

        let quiz = QuizResponse::score(user_id, responses, Utc::now());
        self.db.create_quiz(&quiz).await?;
        tracing::info!(user_id, total_score = quiz.total_score, "Quiz stored");

        Ok(quiz)
    }

    pub async fn recent_quizzes(&self, user_id: i64, limit: u32) -> Result<Vec<QuizResponse>> {
        self.db.recent_quizzes(user_id, limit).await
    }
}
