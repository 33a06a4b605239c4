use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{
    AppetiteTrend, EnergyTrend, FeatureSnapshot, RecommendationPlan, RetrievedMemory,
    TrendPrediction, TriggeredRule,
};

/// Name recorded on every trace written by the reasoning pipeline.
pub const REASONER_AGENT_NAME: &str = "ReasonerAgent";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, utoipa::ToSchema)]
pub struct ToolsCalled {
    pub ml_predictor: bool,
}

/// Append-only audit record of one reasoning invocation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, utoipa::ToSchema)]
pub struct DecisionTrace {
    pub id: String,
    pub user_id: i64,
    pub date: DateTime<Utc>,
    pub agent_name: String,
    pub triggered_rules: Vec<TriggeredRule>,
    pub memory_retrieved: Vec<RetrievedMemory>,
    pub plan_chosen: RecommendationPlan,
    pub tools_called: ToolsCalled,
    pub explanation: String,
}

/// Persisted copy of a trend prediction and the features behind it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, utoipa::ToSchema)]
pub struct MlPrediction {
    pub id: String,
    pub user_id: i64,
    pub date: DateTime<Utc>,
    pub energy_trend: EnergyTrend,
    pub appetite_trend: AppetiteTrend,
    pub input_features: FeatureSnapshot,
    pub confidence: f64,
}

impl MlPrediction {
    pub fn new(
        user_id: i64,
        date: DateTime<Utc>,
        snapshot: FeatureSnapshot,
        prediction: TrendPrediction,
    ) -> Self {
        Self {
            id: nanoid::nanoid!(),
            user_id,
            date,
            energy_trend: prediction.energy_trend,
            appetite_trend: prediction.appetite_trend,
            input_features: snapshot,
            confidence: prediction.confidence,
        }
    }
}

/// Result of `reason(user_id)`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, utoipa::ToSchema)]
pub struct ReasoningOutcome {
    pub energy_trend: EnergyTrend,
    pub appetite_trend: AppetiteTrend,
    pub confidence: f64,
    pub rules_triggered: Vec<TriggeredRule>,
    pub memory_retrieved: Vec<RetrievedMemory>,
    pub recommendations: RecommendationPlan,
    pub explanation: String,
}
