//! The reasoning pipeline stages: observe, predict, evaluate rules,
//! synthesize a plan and record a decision trace. Orchestration lives in
//! [`crate::services::Reasoner`].

pub mod observe;
pub mod predictor;
pub mod rules;
pub mod synthesis;
pub mod trace;

pub use observe::ObservationAggregator;
pub use predictor::{AppetiteModel, EnergyModel, TrendPredictor};
pub use rules::{evaluate_rules, WellnessRule, WELLNESS_RULES};
pub use synthesis::synthesize;
pub use trace::{explain, DecisionTraceRecorder, ReasoningRun};
