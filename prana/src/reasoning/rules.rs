//! The fixed wellness rule table.
//!
//! Each entry pairs a predicate over the snapshot and trend with the patch it
//! applies to a [`RecommendationPlan`]. Table order is significant: patches
//! are folded in this order, so a later rule's write wins on a shared field.

use crate::models::{
    AppetiteTrend, EnergyTrend, FeatureSnapshot, Intensity, MealComplexity, NutritionFocus,
    PortionSize, RecommendationPlan, RulePriority, SessionType, SpecialAction, TrendPrediction,
    TriggeredRule,
};

type Condition = fn(&FeatureSnapshot, &TrendPrediction) -> Option<String>;
type Patch = fn(&mut RecommendationPlan);

pub struct WellnessRule {
    pub id: &'static str,
    pub action: &'static str,
    pub priority: RulePriority,
    condition: Condition,
    patch: Patch,
}

impl WellnessRule {
    /// Returns the triggered form of this rule when its predicate holds.
    pub fn evaluate(
        &self,
        snapshot: &FeatureSnapshot,
        prediction: &TrendPrediction,
    ) -> Option<TriggeredRule> {
        (self.condition)(snapshot, prediction).map(|condition| TriggeredRule {
            rule_id: self.id.to_string(),
            condition,
            action: self.action.to_string(),
            priority: self.priority,
        })
    }

    pub fn apply(&self, plan: &mut RecommendationPlan) {
        (self.patch)(plan);
    }
}

impl std::fmt::Debug for WellnessRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WellnessRule")
            .field("id", &self.id)
            .field("action", &self.action)
            .field("priority", &self.priority)
            .finish()
    }
}

pub static WELLNESS_RULES: [WellnessRule; 6] = [
    WellnessRule {
        id: "high_stress_relief",
        action: "gentle_yoga_meditation_magnesium",
        priority: RulePriority::High,
        condition: high_stress,
        patch: stress_relief_patch,
    },
    WellnessRule {
        id: "low_motivation_boost",
        action: "energizing_yoga_favorite_meal",
        priority: RulePriority::High,
        condition: low_motivation,
        patch: motivation_boost_patch,
    },
    WellnessRule {
        id: "low_energy_gentle",
        action: "gentle_yoga_warm_meals",
        priority: RulePriority::Medium,
        condition: low_energy,
        patch: gentle_energy_patch,
    },
    WellnessRule {
        id: "low_appetite_nutrient_dense",
        action: "nutrient_dense_small_portions",
        priority: RulePriority::Medium,
        condition: low_appetite,
        patch: nutrient_dense_patch,
    },
    WellnessRule {
        id: "poor_adherence_simplify",
        action: "simplified_plans",
        priority: RulePriority::High,
        condition: poor_adherence,
        patch: simplify_patch,
    },
    WellnessRule {
        id: "low_sleep_recovery",
        action: "recovery_yoga_restorative_meals",
        priority: RulePriority::Medium,
        condition: low_sleep,
        patch: no_patch,
    },
];

/// Evaluates every rule independently and returns the ones that fired, in
/// table order.
pub fn evaluate_rules(snapshot: &FeatureSnapshot, prediction: &TrendPrediction) -> Vec<TriggeredRule> {
    WELLNESS_RULES
        .iter()
        .filter_map(|rule| rule.evaluate(snapshot, prediction))
        .collect()
}

pub fn find_rule(id: &str) -> Option<&'static WellnessRule> {
    WELLNESS_RULES.iter().find(|rule| rule.id == id)
}

/// Formats a float the way the condition strings have always shown it:
/// integral values keep one decimal (`5.0`), others print as-is (`5.5`).
pub fn format_decimal(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e16 {
        format!("{value:.1}")
    } else {
        format!("{value}")
    }
}

fn high_stress(s: &FeatureSnapshot, _: &TrendPrediction) -> Option<String> {
    (s.stress_score > 80).then(|| format!("stress_score > 80 ({})", s.stress_score))
}

fn low_motivation(s: &FeatureSnapshot, _: &TrendPrediction) -> Option<String> {
    (s.motivation_score < 40).then(|| format!("motivation_score < 40 ({})", s.motivation_score))
}

fn low_energy(_: &FeatureSnapshot, t: &TrendPrediction) -> Option<String> {
    (t.energy_trend == EnergyTrend::Low).then(|| "energy_trend = low".to_string())
}

fn low_appetite(_: &FeatureSnapshot, t: &TrendPrediction) -> Option<String> {
    (t.appetite_trend == AppetiteTrend::Low).then(|| "appetite_trend = low".to_string())
}

fn poor_adherence(s: &FeatureSnapshot, _: &TrendPrediction) -> Option<String> {
    (s.adherence_avg < 40.0).then(|| format!("adherence < 40% ({:.1}%)", s.adherence_avg))
}

fn low_sleep(s: &FeatureSnapshot, _: &TrendPrediction) -> Option<String> {
    (s.sleep_hours < 6.0).then(|| format!("sleep < 6 hours ({})", format_decimal(s.sleep_hours)))
}

fn stress_relief_patch(plan: &mut RecommendationPlan) {
    plan.yoga.session_type = SessionType::StressRelief;
    plan.yoga.intensity = Intensity::Gentle;
    plan.nutrition.focus = NutritionFocus::MagnesiumRich;
    plan.special_actions.push(SpecialAction::MeditationSession);
}

fn motivation_boost_patch(plan: &mut RecommendationPlan) {
    plan.yoga.session_type = SessionType::Energizing;
    plan.yoga.intensity = Intensity::Moderate;
    plan.nutrition.focus = NutritionFocus::FavoriteMeal;
    plan.special_actions.push(SpecialAction::RewardMeal);
}

fn gentle_energy_patch(plan: &mut RecommendationPlan) {
    plan.yoga.duration_minutes = 15;
    plan.yoga.intensity = Intensity::Gentle;
    plan.nutrition.meal_complexity = MealComplexity::Simple;
    plan.nutrition.focus = NutritionFocus::WarmComforting;
}

fn nutrient_dense_patch(plan: &mut RecommendationPlan) {
    plan.nutrition.portion_size = PortionSize::Small;
    plan.nutrition.focus = NutritionFocus::NutrientDense;
}

fn simplify_patch(plan: &mut RecommendationPlan) {
    plan.yoga.duration_minutes = 10;
    plan.nutrition.meal_complexity = MealComplexity::Simple;
    plan.special_actions.push(SpecialAction::SimplifiedMode);
}

fn no_patch(_: &mut RecommendationPlan) {}
