use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::db::DatabaseBackend;
use crate::error::Result;
use crate::models::{
    DecisionTrace, FeatureSnapshot, MlPrediction, RecommendationPlan, RetrievedMemory,
    ToolsCalled, TrendPrediction, TriggeredRule, REASONER_AGENT_NAME,
};

pub const NO_RULES_SENTENCE: &str = "No special rules triggered. Using balanced default plan.";

/// Human-readable summary of a reasoning run. Only the first `rule_limit`
/// triggered rules are listed.
pub fn explain(prediction: &TrendPrediction, rules: &[TriggeredRule], rule_limit: usize) -> String {
    let mut parts = vec![format!(
        "Based on ML predictions: Energy trend is {}, Appetite trend is {}.",
        prediction.energy_trend, prediction.appetite_trend
    )];

    if rules.is_empty() {
        parts.push(NO_RULES_SENTENCE.to_string());
    } else {
        parts.push(format!("Triggered {} wellness rules:", rules.len()));
        parts.extend(
            rules
                .iter()
                .take(rule_limit)
                .map(|r| format!("- {}: {} → {}", r.rule_id, r.condition, r.action)),
        );
    }

    parts.join(" ")
}

/// Everything the recorder needs from one pipeline run.
#[derive(Debug, Clone)]
pub struct ReasoningRun {
    pub user_id: i64,
    pub at: DateTime<Utc>,
    pub snapshot: FeatureSnapshot,
    pub prediction: TrendPrediction,
    pub triggered_rules: Vec<TriggeredRule>,
    pub plan: RecommendationPlan,
}

pub struct DecisionTraceRecorder {
    db: Arc<dyn DatabaseBackend>,
    memory_limit: u32,
    explanation_rule_limit: usize,
}

impl DecisionTraceRecorder {
    pub fn new(db: Arc<dyn DatabaseBackend>, memory_limit: u32, explanation_rule_limit: usize) -> Self {
        Self {
            db,
            memory_limit,
            explanation_rule_limit,
        }
    }

    /// Most recently accessed memories, newest first. Read-only.
    pub async fn retrieve_memories(&self, user_id: i64) -> Result<Vec<RetrievedMemory>> {
        let memories = self.db.recent_memories(user_id, self.memory_limit).await?;
        Ok(memories.iter().map(RetrievedMemory::from).collect())
    }

    /// Builds the trace and the prediction row for `run` and persists both
    /// in one write.
    pub async fn record(&self, run: &ReasoningRun) -> Result<DecisionTrace> {
        let memory_retrieved = self.retrieve_memories(run.user_id).await?;
        let explanation = explain(&run.prediction, &run.triggered_rules, self.explanation_rule_limit);

        let trace = DecisionTrace {
            id: nanoid::nanoid!(),
            user_id: run.user_id,
            date: run.at,
            agent_name: REASONER_AGENT_NAME.to_string(),
            triggered_rules: run.triggered_rules.clone(),
            memory_retrieved,
            plan_chosen: run.plan.clone(),
            tools_called: ToolsCalled { ml_predictor: true },
            explanation,
        };
        let prediction = MlPrediction::new(run.user_id, run.at, run.snapshot, run.prediction);

        self.db.record_reasoning(&trace, &prediction).await?;

        tracing::debug!(
            user_id = run.user_id,
            trace_id = %trace.id,
            memories = trace.memory_retrieved.len(),
            "Decision trace recorded"
        );

        Ok(trace)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AppetiteTrend, EnergyTrend, RulePriority};

    fn prediction() -> TrendPrediction {
        TrendPrediction {
            energy_trend: EnergyTrend::Medium,
            appetite_trend: AppetiteTrend::Normal,
            confidence: 0.75,
        }
    }

    fn rule(id: &str) -> TriggeredRule {
        TriggeredRule {
            rule_id: id.to_string(),
            condition: format!("{id} cond"),
            action: format!("{id}_action"),
            priority: RulePriority::High,
        }
    }

    #[test]
    fn test_explain_without_rules() {
        assert_eq!(
            explain(&prediction(), &[], 3),
            "Based on ML predictions: Energy trend is medium, Appetite trend is normal. \
             No special rules triggered. Using balanced default plan."
        );
    }

    #[test]
    fn test_explain_lists_only_first_three() {
        let rules = vec![rule("a"), rule("b"), rule("c"), rule("d")];
        let text = explain(&prediction(), &rules, 3);

        assert!(text.contains("Triggered 4 wellness rules:"));
        assert!(text.contains("- a: a cond → a_action"));
        assert!(text.contains("- c: c cond → c_action"));
        assert!(!text.contains("- d:"));
        assert!(!text.contains(NO_RULES_SENTENCE));
    }

    #[test]
    fn test_explain_single_rule_exact() {
        let text = explain(&prediction(), &[rule("x")], 3);
        assert_eq!(
            text,
            "Based on ML predictions: Energy trend is medium, Appetite trend is normal. \
             Triggered 1 wellness rules: - x: x cond → x_action"
        );
    }
}
