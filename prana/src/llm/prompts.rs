//! Prompt templates for LLM-backed recipe generation and the chat coach.
//!
//! Templates use plain `format!()` interpolation so a missing variable is a
//! compile-time error.

use crate::models::{MealType, User};

pub const RECIPE_SYSTEM_PROMPT: &str =
    "You are a Sattvic nutrition expert. Generate healthy, yoga-aligned recipes.";

/// Generate a prompt asking for a Sattvic recipe as JSON.
///
/// # Arguments
/// * `ingredients` - Ingredients the user has on hand
/// * `meal_type` - Which meal of the day the recipe is for
/// * `focus` - Nutrition focus tag from the recommendation plan
///
/// # Example
/// ```
/// use prana::llm::prompts::recipe_prompt;
/// use prana::models::MealType;
///
/// let prompt = recipe_prompt(&["oats".to_string(), "banana".to_string()], MealType::Breakfast, "magnesium_rich");
/// assert!(prompt.contains("oats, banana"));
/// assert!(prompt.contains("Focus: magnesium_rich"));
/// ```
pub fn recipe_prompt(ingredients: &[String], meal_type: MealType, focus: &str) -> String {
    let meal = meal_type.as_str();
    let available = ingredients.join(", ");
    let guidance = meal_type.guidance();

    format!(
        r#"Generate a {meal} recipe that is Sattvic (yoga-aligned, light, fresh, plant-based, gut-friendly).

Ingredients available: {available}
Focus: {focus}
Meal type: {meal}
Meal guidance: {guidance}

Requirements:
- Sattvic principles: fresh, natural, minimally processed
- High fiber, moderate protein
- Include magnesium-rich foods if possible
- Easy to prepare
- Mindful eating friendly
- Use the provided ingredients creatively
- Appropriate portion size for {meal}

Provide:
1. Recipe name (creative and descriptive)
2. List of ingredients with quantities (use the provided ingredients)
3. Step-by-step instructions (clear and simple)
4. Estimated preparation time in minutes
5. Sattvic score (1-10, where 10 is most Sattvic)
6. Meal simplicity index (1-10, where 10 is easiest to prepare)

Format as JSON with keys: name, ingredients, instructions, prep_time_minutes, sattvic_score, simplicity_index"#
    )
}

fn listed(values: &[String]) -> String {
    if values.is_empty() {
        "none given".to_string()
    } else {
        values.join(", ")
    }
}

/// System prompt for the chat coach, carrying the user's profile.
pub fn coach_system_prompt(user: &User) -> String {
    let name = &user.name;
    let experience = user.yoga_experience;
    let diet = listed(&user.dietary_preferences);
    let goals = listed(&user.goals);

    format!(
        r#"You are a Yoga-Driven Wellness & Nutrition Coach. You help users with:
- Sattvic nutrition (yoga-aligned, light, fresh, plant-based)
- Yoga practice recommendations
- Mental wellness support (non-clinical)
- Meal planning based on available ingredients
- Stress management through yoga and nutrition

User profile:
- Name: {name}
- Yoga experience: {experience}
- Dietary preferences: {diet}
- Goals: {goals}

Remember:
- This is wellness advice, not medical advice
- Focus on Sattvic principles
- Be encouraging and supportive
- Suggest specific yoga practices when relevant
- Recommend nutrient-rich, plant-based meals"#
    )
}
