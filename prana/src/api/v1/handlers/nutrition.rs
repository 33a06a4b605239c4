//! v1 Nutrition handlers.

use axum::extract::{Path, Query, State};
use chrono::Utc;
use validator::Validate;

use crate::api::extractors::AppJson;
use crate::api::v1::dto::{LimitQuery, NutrientLookupRequest, NutritionPlanRequest, RecipeRequest};
use crate::api::v1::response::{ApiError, ApiResponse};
use crate::api::AppState;
use crate::error::PranaError;
use crate::models::{GeneratedRecipe, NutrientLookup, NutritionFocus, NutritionPlan, RecipeSource};
use crate::services::fairness::{OPENAI_API, USDA_API};

use super::require_user;

const DEFAULT_LIMIT: u32 = 10;

/// `POST /api/v1/users/{user_id}/nutrition/lookup`
///
/// A failed lookup is still a 200; the payload carries `found: false` and
/// the error text.
#[utoipa::path(
    post,
    path = "/api/v1/users/{user_id}/nutrition/lookup",
    tag = "nutrition",
    operation_id = "nutrition.lookup",
    params(("user_id" = i64, Path, description = "User ID")),
    request_body = NutrientLookupRequest,
    responses(
        (status = 200, description = "USDA nutrients per 100g", body = NutrientLookup),
        (status = 429, description = "Daily USDA budget spent", body = ApiError),
    )
)]
pub async fn lookup_nutrients(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    AppJson(req): AppJson<NutrientLookupRequest>,
) -> ApiResponse<NutrientLookup> {
    if let Err(e) = req.validate() {
        return PranaError::from(e).into();
    }

    let today = Utc::now().date_naive();
    if let Err(e) = state.fairness.require_quota(USDA_API, user_id, today).await {
        return e.into();
    }

    let lookup = state.nutrition.lookup_nutrients(&req.ingredient).await;
    match state.fairness.record_call(USDA_API, user_id, today).await {
        Ok(_) => ApiResponse::success(lookup),
        Err(e) => e.into(),
    }
}

/// `POST /api/v1/users/{user_id}/nutrition/recipe`
///
/// Generates a recipe without storing a plan.
#[utoipa::path(
    post,
    path = "/api/v1/users/{user_id}/nutrition/recipe",
    tag = "nutrition",
    operation_id = "nutrition.recipe",
    params(("user_id" = i64, Path, description = "User ID")),
    request_body = RecipeRequest,
    responses(
        (status = 200, description = "Generated or fallback recipe", body = GeneratedRecipe),
        (status = 400, description = "Invalid request", body = ApiError),
        (status = 429, description = "Daily OpenAI budget spent", body = ApiError),
    )
)]
pub async fn generate_recipe(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    AppJson(req): AppJson<RecipeRequest>,
) -> ApiResponse<GeneratedRecipe> {
    if let Err(e) = req.validate() {
        return PranaError::from(e).into();
    }

    let today = Utc::now().date_naive();
    if state.llm.is_available() {
        if let Err(e) = state.fairness.require_quota(OPENAI_API, user_id, today).await {
            return e.into();
        }
    }

    let focus = req.focus.unwrap_or(NutritionFocus::BalancedSattvic);
    let recipe = state
        .nutrition
        .generate_recipe(&req.ingredients, req.meal_type, focus.as_str())
        .await;

    if recipe.source == RecipeSource::Llm {
        if let Err(e) = state.fairness.record_call(OPENAI_API, user_id, today).await {
            return e.into();
        }
    }

    ApiResponse::success(recipe)
}

/// `POST /api/v1/users/{user_id}/nutrition/plans`
///
/// Stores a plan for one meal, shaped by the focus of the user's most recent
/// recommendation.
#[utoipa::path(
    post,
    path = "/api/v1/users/{user_id}/nutrition/plans",
    tag = "nutrition",
    operation_id = "nutrition.plans.create",
    params(("user_id" = i64, Path, description = "User ID")),
    request_body = NutritionPlanRequest,
    responses(
        (status = 201, description = "Plan stored", body = NutritionPlan),
        (status = 404, description = "User not found", body = ApiError),
        (status = 429, description = "Daily USDA budget spent", body = ApiError),
    )
)]
pub async fn create_plan(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    AppJson(req): AppJson<NutritionPlanRequest>,
) -> ApiResponse<NutritionPlan> {
    if let Err(e) = req.validate() {
        return PranaError::from(e).into();
    }
    if let Err(e) = require_user(&state, user_id).await {
        return e.into();
    }

    let today = Utc::now().date_naive();
    if let Err(e) = state.fairness.require_quota(USDA_API, user_id, today).await {
        return e.into();
    }

    let recommendation = match state.db.recent_traces(user_id, 1).await {
        Ok(traces) => traces
            .into_iter()
            .next()
            .map(|trace| trace.plan_chosen)
            .unwrap_or_default(),
        Err(e) => return e.into(),
    };

    let plan = match state
        .nutrition
        .create_nutrition_plan(user_id, req.meal_type, &req.ingredients, &recommendation)
        .await
    {
        Ok(plan) => plan,
        Err(e) => return e.into(),
    };

    match state.fairness.record_call(USDA_API, user_id, today).await {
        Ok(_) => ApiResponse::created(plan),
        Err(e) => e.into(),
    }
}

/// `GET /api/v1/users/{user_id}/nutrition/plans`
#[utoipa::path(
    get,
    path = "/api/v1/users/{user_id}/nutrition/plans",
    tag = "nutrition",
    operation_id = "nutrition.plans.list",
    params(("user_id" = i64, Path, description = "User ID"), LimitQuery),
    responses(
        (status = 200, description = "Most recent plans first", body = Vec<NutritionPlan>),
    )
)]
pub async fn list_plans(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    Query(query): Query<LimitQuery>,
) -> ApiResponse<Vec<NutritionPlan>> {
    let limit = query.resolve(DEFAULT_LIMIT);
    match state.nutrition.recent_plans(user_id, limit).await {
        Ok(plans) => ApiResponse::list(plans, Some(limit)),
        Err(e) => e.into(),
    }
}

/// `GET /api/v1/users/{user_id}/nutrition/plans/today`
#[utoipa::path(
    get,
    path = "/api/v1/users/{user_id}/nutrition/plans/today",
    tag = "nutrition",
    operation_id = "nutrition.plans.today",
    params(("user_id" = i64, Path, description = "User ID")),
    responses(
        (status = 200, description = "Plans created since midnight UTC", body = Vec<NutritionPlan>),
    )
)]
pub async fn today_plans(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> ApiResponse<Vec<NutritionPlan>> {
    match state.nutrition.today_plans(user_id, Utc::now()).await {
        Ok(plans) => ApiResponse::list(plans, None),
        Err(e) => e.into(),
    }
}
