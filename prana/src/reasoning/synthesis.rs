use crate::models::{RecommendationPlan, TriggeredRule};

use super::rules::WELLNESS_RULES;

/// Folds the patches of every triggered rule over the default plan.
///
/// Patches are applied in rule-table order regardless of the order of
/// `triggered`. Unknown rule ids are ignored.
pub fn synthesize(triggered: &[TriggeredRule]) -> RecommendationPlan {
    WELLNESS_RULES
        .iter()
        .filter(|rule| triggered.iter().any(|t| t.rule_id == rule.id))
        .fold(RecommendationPlan::default(), |mut plan, rule| {
            rule.apply(&mut plan);
            plan
        })
}
