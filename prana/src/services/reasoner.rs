use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::config::ReasoningConfig;
use crate::db::DatabaseBackend;
use crate::error::Result;
use crate::models::ReasoningOutcome;
use crate::reasoning::{
    evaluate_rules, synthesize, DecisionTraceRecorder, ObservationAggregator, ReasoningRun,
    TrendPredictor,
};

/// Runs `observe -> predict -> rules -> synthesize -> trace` for one user.
pub struct Reasoner {
    aggregator: ObservationAggregator,
    predictor: TrendPredictor,
    recorder: DecisionTraceRecorder,
}

impl Reasoner {
    pub fn new(db: Arc<dyn DatabaseBackend>, config: &ReasoningConfig) -> Self {
        Self::with_predictor(db, config, TrendPredictor::default())
    }

    pub fn with_predictor(
        db: Arc<dyn DatabaseBackend>,
        config: &ReasoningConfig,
        predictor: TrendPredictor,
    ) -> Self {
        Self {
            aggregator: ObservationAggregator::new(db.clone(), config),
            predictor,
            recorder: DecisionTraceRecorder::new(
                db,
                config.memory_retrieval_limit,
                config.explanation_rule_limit,
            ),
        }
    }

    pub async fn reason(&self, user_id: i64) -> Result<ReasoningOutcome> {
        self.reason_at(user_id, Utc::now()).await
    }

    /// Runs the pipeline as of `now`. The trace and prediction are persisted
    /// before the outcome is returned.
    pub async fn reason_at(&self, user_id: i64, now: DateTime<Utc>) -> Result<ReasoningOutcome> {
        let snapshot = self.aggregator.snapshot(user_id, now).await?;
        let prediction = self.predictor.predict(&snapshot);
        let triggered_rules = evaluate_rules(&snapshot, &prediction);
        let plan = synthesize(&triggered_rules);

        let run = ReasoningRun {
            user_id,
            at: now,
            snapshot,
            prediction,
            triggered_rules,
            plan,
        };
        let trace = self.recorder.record(&run).await?;

        tracing::info!(
            user_id,
            energy_trend = %prediction.energy_trend,
            appetite_trend = %prediction.appetite_trend,
            rules_triggered = trace.triggered_rules.len(),
            session_type = %trace.plan_chosen.yoga.session_type,
            "Reasoning complete"
        );

        Ok(ReasoningOutcome {
            energy_trend: prediction.energy_trend,
            appetite_trend: prediction.appetite_trend,
            confidence: prediction.confidence,
            rules_triggered: trace.triggered_rules,
            memory_retrieved: trace.memory_retrieved,
            recommendations: trace.plan_chosen,
            explanation: trace.explanation,
        })
    }
}
