use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::SessionType;

pub const NUTRITION_AGENT_NAME: &str = "NutritionAgent";
pub const YOGA_AGENT_NAME: &str = "YogaAgent";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

impl MealType {
    /// Meals of one day, in serving order.
    pub const DAY: [MealType; 4] = [Self::Breakfast, Self::Lunch, Self::Dinner, Self::Snack];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Breakfast => "breakfast",
            Self::Lunch => "lunch",
            Self::Dinner => "dinner",
            Self::Snack => "snack",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::Breakfast => "Breakfast",
            Self::Lunch => "Lunch",
            Self::Dinner => "Dinner",
            Self::Snack => "Snack",
        }
    }

    /// Prompt guidance for recipe generation.
    pub fn guidance(&self) -> &'static str {
        match self {
            Self::Breakfast => "Light, energizing, easy to digest. Include whole grains, fruits, or light proteins. Good for starting the day.",
            Self::Lunch => "Balanced, substantial but not heavy. Include vegetables, grains, legumes, or light proteins. Main meal of the day.",
            Self::Dinner => "Light, easy to digest, should not be too heavy before sleep. Include vegetables, soups, or light grains. Keep it simple.",
            Self::Snack => "Small, nutrient-dense, satisfying. Include fruits, nuts, seeds, or light options. Perfect for between meals.",
        }
    }
}

impl std::fmt::Display for MealType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for MealType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "breakfast" => Ok(Self::Breakfast),
            "lunch" => Ok(Self::Lunch),
            "dinner" => Ok(Self::Dinner),
            "snack" => Ok(Self::Snack),
            _ => Err(format!("Unknown meal type: {s}")),
        }
    }
}

/// Per-serving nutrient amounts. Units follow the USDA FoodData Central
/// search payload (kcal, grams, milligrams).
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, utoipa::ToSchema)]
pub struct Nutrients {
    #[serde(default)]
    pub calories: f64,
    #[serde(default)]
    pub protein: f64,
    #[serde(default)]
    pub fiber: f64,
    #[serde(default)]
    pub calcium: f64,
    #[serde(default)]
    pub iron: f64,
    #[serde(default)]
    pub magnesium: f64,
}

impl std::ops::AddAssign for Nutrients {
    fn add_assign(&mut self, other: Self) {
        self.calories += other.calories;
        self.protein += other.protein;
        self.fiber += other.fiber;
        self.calcium += other.calcium;
        self.iron += other.iron;
        self.magnesium += other.magnesium;
    }
}

/// Outcome of a single ingredient lookup. Failures are values, not errors.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, utoipa::ToSchema)]
pub struct NutrientLookup {
    pub success: bool,
    pub ingredient: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub food_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nutrients: Option<Nutrients>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl NutrientLookup {
    pub fn found(ingredient: &str, food_name: String, nutrients: Nutrients) -> Self {
        Self {
            success: true,
            ingredient: ingredient.to_string(),
            food_name: Some(food_name),
            nutrients: Some(nutrients),
            error: None,
        }
    }

    pub fn failed(ingredient: &str, error: impl Into<String>) -> Self {
        Self {
            success: false,
            ingredient: ingredient.to_string(),
            food_name: None,
            nutrients: None,
            error: Some(error.into()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, utoipa::ToSchema)]
pub struct RecipeIngredient {
    pub name: String,
    pub quantity: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, utoipa::ToSchema)]
pub struct Recipe {
    pub name: String,
    pub ingredients: Vec<RecipeIngredient>,
    pub instructions: String,
    pub prep_time_minutes: u32,
    pub sattvic_score: f64,
    pub simplicity_index: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum RecipeSource {
    Llm,
    Fallback,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, utoipa::ToSchema)]
pub struct GeneratedRecipe {
    pub recipe: Recipe,
    pub nutrients: Nutrients,
    pub meal_type: MealType,
    pub focus: String,
    pub source: RecipeSource,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, utoipa::ToSchema)]
pub struct NutritionPlan {
    pub id: String,
    pub user_id: i64,
    pub date: DateTime<Utc>,
    pub meal_type: MealType,
    pub recipe_name: String,
    pub ingredients: Vec<String>,
    pub nutrients: Nutrients,
    pub recipe_instructions: String,
    pub meal_simplicity_index: f64,
    pub sattvic_score: f64,
    pub created_by_agent: String,
}

/// A yoga video picked for a session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, utoipa::ToSchema)]
pub struct VideoResult {
    pub video_id: String,
    pub title: String,
    pub description: String,
    pub thumbnail: String,
    pub url: String,
    pub channel: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, utoipa::ToSchema)]
pub struct YogaPlan {
    pub id: String,
    pub user_id: i64,
    pub date: DateTime<Utc>,
    pub session_type: SessionType,
    pub duration_minutes: u32,
    pub youtube_video_id: String,
    pub youtube_title: String,
    pub youtube_url: String,
    pub description: String,
    pub created_by_agent: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nutrients_add_assign() {
        let mut total = Nutrients::default();
        total += Nutrients {
            calories: 120.0,
            protein: 4.5,
            ..Default::default()
        };
        total += Nutrients {
            calories: 80.0,
            magnesium: 30.0,
            ..Default::default()
        };
        assert_eq!(total.calories, 200.0);
        assert_eq!(total.protein, 4.5);
        assert_eq!(total.magnesium, 30.0);
    }

    #[test]
    fn test_failed_lookup_serializes_without_payload() {
        let value = serde_json::to_value(NutrientLookup::failed("okra", "No data found")).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"success": false, "ingredient": "okra", "error": "No data found"})
        );
    }

    #[test]
    fn test_meal_type_parse() {
        assert_eq!("Dinner".parse::<MealType>().unwrap(), MealType::Dinner);
        assert_eq!(MealType::Snack.title(), "Snack");
        assert!("brunch".parse::<MealType>().is_err());
    }
}
