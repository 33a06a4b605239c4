use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures::future::join_all;
use serde_json::Value;

use crate::clients::UsdaClient;
use crate::db::DatabaseBackend;
use crate::error::Result;
use crate::llm::prompts::{recipe_prompt, RECIPE_SYSTEM_PROMPT};
use crate::llm::{CompletionOptions, LlmProvider};
use crate::models::{
    GeneratedRecipe, MealType, NutrientLookup, Nutrients, NutritionPlan, Recipe,
    RecipeIngredient, RecipeSource, RecommendationPlan, NUTRITION_AGENT_NAME,
};

const FALLBACK_INSTRUCTIONS: &str = "1. Wash and prepare all ingredients
2. Heat a pan with minimal oil
3. Add ingredients in order of cooking time
4. Cook until tender and aromatic
5. Season with natural spices (turmeric, cumin, coriander)
6. Serve warm and mindfully";

pub const FALLBACK_NUTRIENTS: Nutrients = Nutrients {
    calories: 300.0,
    protein: 15.0,
    fiber: 8.0,
    calcium: 100.0,
    iron: 3.0,
    magnesium: 50.0,
};

const DEFAULT_PREP_MINUTES: u32 = 20;
const DEFAULT_SATTVIC_SCORE: f64 = 7.5;
const DEFAULT_SIMPLICITY_INDEX: f64 = 8.0;
/// Score for either rating a model-produced JSON recipe leaves out.
const UNRATED_RECIPE_SCORE: f64 = 7.0;
/// Recipe ingredients looked up when totalling an LLM recipe.
const NUTRIENT_LOOKUP_LIMIT: usize = 5;
const TEXT_INSTRUCTIONS_LIMIT: usize = 500;

pub struct NutritionService {
    db: Arc<dyn DatabaseBackend>,
    usda: UsdaClient,
    llm: LlmProvider,
}

impl NutritionService {
    pub fn new(db: Arc<dyn DatabaseBackend>, usda: UsdaClient, llm: LlmProvider) -> Self {
        Self { db, usda, llm }
    }

    pub async fn lookup_nutrients(&self, ingredient: &str) -> NutrientLookup {
        self.usda.lookup(ingredient).await
    }

    /// LLM recipe when a model is configured, the deterministic fallback
    /// otherwise or when the model call fails.
    pub async fn generate_recipe(
        &self,
        ingredients: &[String],
        meal_type: MealType,
        focus: &str,
    ) -> GeneratedRecipe {
        if !self.llm.is_available() {
            return fallback_recipe(ingredients, meal_type, focus);
        }

        let options = CompletionOptions {
            temperature: Some(0.7),
            max_tokens: Some(1000),
        };
        let prompt = recipe_prompt(ingredients, meal_type, focus);

        let text = match self
            .llm
            .complete(&prompt, Some(RECIPE_SYSTEM_PROMPT), Some(&options))
            .await
        {
            Ok(text) => text,
            Err(error) => {
                tracing::warn!(meal_type = %meal_type, error = %error, "Recipe generation failed, using fallback");
                return fallback_recipe(ingredients, meal_type, focus);
            }
        };

        let recipe = parse_recipe(&text, ingredients, meal_type);
        let nutrients = self.total_nutrients(&recipe.ingredients).await;

        GeneratedRecipe {
            recipe,
            nutrients,
            meal_type,
            focus: focus.to_string(),
            source: RecipeSource::Llm,
        }
    }

    async fn total_nutrients(&self, ingredients: &[RecipeIngredient]) -> Nutrients {
        let lookups = join_all(
            ingredients
                .iter()
                .take(NUTRIENT_LOOKUP_LIMIT)
                .map(|ingredient| self.usda.lookup(&ingredient.name)),
        )
        .await;

        lookups
            .into_iter()
            .filter_map(|lookup| lookup.nutrients)
            .fold(Nutrients::default(), |mut total, n| {
                total += n;
                total
            })
    }

    pub async fn create_nutrition_plan(
        &self,
        user_id: i64,
        meal_type: MealType,
        ingredients: &[String],
        plan: &RecommendationPlan,
    ) -> Result<NutritionPlan> {
        let generated = self
            .generate_recipe(ingredients, meal_type, plan.nutrition.focus.as_str())
            .await;

        let nutrition_plan = NutritionPlan {
            id: nanoid::nanoid!(),
            user_id,
            date: Utc::now(),
            meal_type,
            recipe_name: generated.recipe.name,
            ingredients: generated
                .recipe
                .ingredients
                .into_iter()
                .map(|i| i.name)
                .collect(),
            nutrients: generated.nutrients,
            recipe_instructions: generated.recipe.instructions,
            meal_simplicity_index: generated.recipe.simplicity_index,
            sattvic_score: generated.recipe.sattvic_score,
            created_by_agent: NUTRITION_AGENT_NAME.to_string(),
        };

        self.db.create_nutrition_plan(&nutrition_plan).await?;
        tracing::debug!(
            user_id,
            meal_type = %meal_type,
            source = ?generated.source,
            "Nutrition plan created"
        );

        Ok(nutrition_plan)
    }

    pub async fn recent_plans(&self, user_id: i64, limit: u32) -> Result<Vec<NutritionPlan>> {
        self.db.recent_nutrition_plans(user_id, limit).await
    }

    /// Plans created since midnight UTC, newest first.
    pub async fn today_plans(&self, user_id: i64, now: DateTime<Utc>) -> Result<Vec<NutritionPlan>> {
        let mut plans = self
            .db
            .nutrition_plans_since(user_id, start_of_day(now))
            .await?;
        plans.reverse();
        Ok(plans)
    }
}

pub(crate) fn start_of_day(now: DateTime<Utc>) -> DateTime<Utc> {
    now.date_naive()
        .and_hms_opt(0, 0, 0)
        .unwrap_or_default()
        .and_utc()
}

fn as_needed(ingredients: &[String]) -> Vec<RecipeIngredient> {
    ingredients
        .iter()
        .map(|name| RecipeIngredient {
            name: name.clone(),
            quantity: "as needed".to_string(),
        })
        .collect()
}

pub fn fallback_recipe(ingredients: &[String], meal_type: MealType, focus: &str) -> GeneratedRecipe {
    let headline = ingredients.iter().take(3).cloned().collect::<Vec<_>>().join(", ");

    GeneratedRecipe {
        recipe: Recipe {
            name: format!("Sattvic {} with {}", meal_type.title(), headline),
            ingredients: as_needed(ingredients),
            instructions: FALLBACK_INSTRUCTIONS.to_string(),
            prep_time_minutes: DEFAULT_PREP_MINUTES,
            sattvic_score: DEFAULT_SATTVIC_SCORE,
            simplicity_index: DEFAULT_SIMPLICITY_INDEX,
        },
        nutrients: FALLBACK_NUTRIENTS,
        meal_type,
        focus: focus.to_string(),
        source: RecipeSource::Fallback,
    }
}

/// Reads a model response as a JSON recipe. Anything that is not a JSON
/// object becomes a minimal recipe carrying the first 500 characters as
/// instructions.
pub fn parse_recipe(text: &str, ingredients: &[String], meal_type: MealType) -> Recipe {
    match serde_json::from_str::<Value>(strip_code_fence(text)) {
        Ok(Value::Object(map)) => recipe_from_json(&Value::Object(map), ingredients, meal_type),
        _ => Recipe {
            name: format!("Sattvic {meal_type}"),
            ingredients: as_needed(ingredients),
            instructions: text.chars().take(TEXT_INSTRUCTIONS_LIMIT).collect(),
            prep_time_minutes: DEFAULT_PREP_MINUTES,
            sattvic_score: DEFAULT_SATTVIC_SCORE,
            simplicity_index: DEFAULT_SIMPLICITY_INDEX,
        },
    }
}

fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(body) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let body = body.strip_prefix("json").unwrap_or(body);
    body.strip_suffix("```").unwrap_or(body).trim()
}

fn recipe_from_json(value: &Value, ingredients: &[String], meal_type: MealType) -> Recipe {
    let recipe_ingredients = match value.get("ingredients").and_then(Value::as_array) {
        Some(items) => items
            .iter()
            .filter_map(|item| match item {
                Value::String(name) => Some(RecipeIngredient {
                    name: name.clone(),
                    quantity: "as needed".to_string(),
                }),
                Value::Object(fields) => Some(RecipeIngredient {
                    name: fields.get("name")?.as_str()?.to_string(),
                    quantity: fields
                        .get("quantity")
                        .map(json_text)
                        .unwrap_or_else(|| "as needed".to_string()),
                }),
                _ => None,
            })
            .collect(),
        None => as_needed(ingredients),
    };

    let instructions = match value.get("instructions") {
        Some(Value::Array(steps)) => steps.iter().map(json_text).collect::<Vec<_>>().join("\n"),
        Some(other) => json_text(other),
        None => String::new(),
    };

    Recipe {
        name: value
            .get("name")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| format!("Sattvic {meal_type}")),
        ingredients: recipe_ingredients,
        instructions,
        prep_time_minutes: value
            .get("prep_time_minutes")
            .and_then(Value::as_f64)
            .map(|m| m.max(0.0).round() as u32)
            .unwrap_or(DEFAULT_PREP_MINUTES),
        sattvic_score: value
            .get("sattvic_score")
            .and_then(Value::as_f64)
            .unwrap_or(UNRATED_RECIPE_SCORE),
        simplicity_index: value
            .get("simplicity_index")
            .and_then(Value::as_f64)
            .unwrap_or(UNRATED_RECIPE_SCORE),
    }
}

fn json_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::IntegrationsConfig;
    use crate::db::test_support::test_backend;
    use crate::models::NutritionFocus;

    fn items(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_fallback_recipe_is_deterministic() {
        let generated = fallback_recipe(&items(&["rice", "mung", "ghee", "cumin"]), MealType::Lunch, "magnesium_rich");

        assert_eq!(generated.recipe.name, "Sattvic Lunch with rice, mung, ghee");
        assert_eq!(generated.recipe.ingredients.len(), 4);
        assert_eq!(generated.recipe.ingredients[0].quantity, "as needed");
        assert!(generated.recipe.instructions.starts_with("1. Wash and prepare"));
        assert!(generated.recipe.instructions.ends_with("6. Serve warm and mindfully"));
        assert_eq!(generated.recipe.prep_time_minutes, 20);
        assert_eq!(generated.nutrients, FALLBACK_NUTRIENTS);
        assert_eq!(generated.source, RecipeSource::Fallback);
    }

    #[test]
    fn test_parse_json_recipe() {
        let text = r#"```json
{"name": "Golden Khichdi", "ingredients": [{"name": "rice", "quantity": "1 cup"}, "mung dal"],
 "instructions": ["Rinse", "Simmer"], "prep_time_minutes": 25, "sattvic_score": 9, "simplicity_index": 8.5}
```"#;

        let recipe = parse_recipe(text, &items(&["rice"]), MealType::Dinner);

        assert_eq!(recipe.name, "Golden Khichdi");
        assert_eq!(recipe.ingredients[0].quantity, "1 cup");
        assert_eq!(recipe.ingredients[1].name, "mung dal");
        assert_eq!(recipe.instructions, "Rinse\nSimmer");
        assert_eq!(recipe.prep_time_minutes, 25);
        assert_eq!(recipe.sattvic_score, 9.0);
    }

    #[test]
    fn test_unrated_json_recipe_scores_seven() {
        let text = r#"{"name": "Mung Soup", "ingredients": ["mung dal"], "instructions": "Simmer"}"#;

        let recipe = parse_recipe(text, &items(&["mung dal"]), MealType::Dinner);

        assert_eq!(recipe.sattvic_score, 7.0);
        assert_eq!(recipe.simplicity_index, 7.0);

        let free_text = parse_recipe("Simmer the dal gently.", &items(&["mung dal"]), MealType::Dinner);
        assert_eq!(free_text.sattvic_score, 7.5);
        assert_eq!(free_text.simplicity_index, 8.0);
    }

    #[test]
    fn test_parse_free_text_recipe() {
        let text = "Try a warm bowl of oats. ".repeat(40);
        let recipe = parse_recipe(&text, &items(&["oats"]), MealType::Breakfast);

        assert_eq!(recipe.name, "Sattvic breakfast");
        assert_eq!(recipe.instructions.chars().count(), 500);
        assert_eq!(recipe.ingredients[0].name, "oats");
    }

    #[tokio::test]
    async fn test_plan_without_llm_uses_fallback_and_plan_focus() {
        let (_dir, db) = test_backend().await;
        let usda = UsdaClient::new(&IntegrationsConfig::default()).unwrap();
        let service = NutritionService::new(db.clone(), usda, LlmProvider::new(None));

        let mut plan = RecommendationPlan::default();
        plan.nutrition.focus = NutritionFocus::WarmComforting;

        let created = service
            .create_nutrition_plan(7, MealType::Dinner, &items(&["squash", "ginger"]), &plan)
            .await
            .unwrap();

        assert_eq!(created.recipe_name, "Sattvic Dinner with squash, ginger");
        assert_eq!(created.ingredients, items(&["squash", "ginger"]));
        assert_eq!(created.sattvic_score, 7.5);

        let today = service.today_plans(7, Utc::now()).await.unwrap();
        assert_eq!(today.len(), 1);
        assert_eq!(today[0].id, created.id);
    }
}
