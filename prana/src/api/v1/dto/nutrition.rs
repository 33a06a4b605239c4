//! Nutrition request DTOs for the v1 API.

use serde::Deserialize;
use validator::Validate;

use crate::models::{MealType, NutritionFocus};

/// Request body for `POST /v1/users/{user_id}/nutrition/lookup`.
#[derive(Debug, Clone, Deserialize, Validate, utoipa::ToSchema)]
pub struct NutrientLookupRequest {
    #[validate(length(min = 1, max = 200))]
    pub ingredient: String,
}

/// Request body for `POST /v1/users/{user_id}/nutrition/recipe`.
#[derive(Debug, Clone, Deserialize, Validate, utoipa::ToSchema)]
pub struct RecipeRequest {
    #[validate(length(min = 1, max = 50))]
    pub ingredients: Vec<String>,
    pub meal_type: MealType,
    /// Defaults to `balanced_sattvic`.
    pub focus: Option<NutritionFocus>,
}

/// Request body for `POST /v1/users/{user_id}/nutrition/plans`.
#[derive(Debug, Clone, Deserialize, Validate, utoipa::ToSchema)]
pub struct NutritionPlanRequest {
    #[validate(length(min = 1, max = 50))]
    pub ingredients: Vec<String>,
    pub meal_type: MealType,
}
