//! Deterministic energy and appetite trend scoring.
//!
//! Both models sit behind a trait so a trained classifier can replace the
//! rule-based scorers without touching the rule engine or the synthesizer.

use std::sync::Arc;

use crate::models::{AppetiteTrend, DayType, EnergyTrend, FeatureSnapshot, TrendPrediction};

/// Fixed placeholder confidence reported with every prediction.
pub const CONFIDENCE: f64 = 0.75;

pub trait EnergyModel: Send + Sync {
    fn predict(&self, snapshot: &FeatureSnapshot) -> EnergyTrend;
}

pub trait AppetiteModel: Send + Sync {
    fn predict(&self, snapshot: &FeatureSnapshot) -> AppetiteTrend;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RuleBasedEnergyModel;

impl RuleBasedEnergyModel {
    pub fn score(snapshot: &FeatureSnapshot) -> i32 {
        let mut score = 0;

        score += if snapshot.sleep_hours >= 8.0 {
            3
        } else if snapshot.sleep_hours >= 6.0 {
            2
        } else {
            1
        };

        if snapshot.mood_score >= 7 {
            score += 2;
        } else if snapshot.mood_score >= 4 {
            score += 1;
        }

        if snapshot.adherence_avg >= 70.0 {
            score += 2;
        } else if snapshot.adherence_avg >= 40.0 {
            score += 1;
        }

        if snapshot.stress_score >= 70 {
            score -= 2;
        } else if snapshot.stress_score >= 50 {
            score -= 1;
        }

        if snapshot.motivation_score >= 60 {
            score += 1;
        }

        if snapshot.day_type == DayType::Weekend {
            score += 1;
        }

        score
    }
}

impl EnergyModel for RuleBasedEnergyModel {
    fn predict(&self, snapshot: &FeatureSnapshot) -> EnergyTrend {
        match Self::score(snapshot) {
            s if s >= 6 => EnergyTrend::High,
            s if s >= 3 => EnergyTrend::Medium,
            _ => EnergyTrend::Low,
        }
    }
}

/// Scores appetite from sleep, mood, stress and the reported energy level
/// (the raw check-in value, not the energy trend).
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleBasedAppetiteModel;

impl RuleBasedAppetiteModel {
    pub fn score(snapshot: &FeatureSnapshot) -> i32 {
        let mut score = 0;

        if snapshot.sleep_hours >= 7.0 {
            score += 2;
        } else if snapshot.sleep_hours >= 5.0 {
            score += 1;
        }

        if snapshot.mood_score >= 6 {
            score += 2;
        } else if snapshot.mood_score >= 4 {
            score += 1;
        }

        if snapshot.stress_score >= 70 {
            score -= 2;
        } else if snapshot.stress_score >= 50 {
            score -= 1;
        }

        if snapshot.energy >= 7.0 {
            score += 1;
        }

        score
    }
}

impl AppetiteModel for RuleBasedAppetiteModel {
    fn predict(&self, snapshot: &FeatureSnapshot) -> AppetiteTrend {
        match Self::score(snapshot) {
            s if s >= 4 => AppetiteTrend::High,
            s if s >= 2 => AppetiteTrend::Normal,
            _ => AppetiteTrend::Low,
        }
    }
}

#[derive(Clone)]
pub struct TrendPredictor {
    energy: Arc<dyn EnergyModel>,
    appetite: Arc<dyn AppetiteModel>,
}

impl Default for TrendPredictor {
    fn default() -> Self {
        Self::new(Arc::new(RuleBasedEnergyModel), Arc::new(RuleBasedAppetiteModel))
    }
}

impl TrendPredictor {
    pub fn new(energy: Arc<dyn EnergyModel>, appetite: Arc<dyn AppetiteModel>) -> Self {
        Self { energy, appetite }
    }

    pub fn predict(&self, snapshot: &FeatureSnapshot) -> TrendPrediction {
        TrendPrediction {
            energy_trend: self.energy.predict(snapshot),
            appetite_trend: self.appetite.predict(snapshot),
            confidence: CONFIDENCE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> FeatureSnapshot {
        FeatureSnapshot::default()
    }

    #[test]
    fn test_thriving_weekend_is_high_energy() {
        let s = FeatureSnapshot {
            sleep_hours: 8.0,
            mood_score: 7,
            adherence_avg: 70.0,
            stress_score: 49,
            motivation_score: 60,
            day_type: DayType::Weekend,
            ..snapshot()
        };
        assert_eq!(RuleBasedEnergyModel::score(&s), 9);
        assert_eq!(TrendPredictor::default().predict(&s).energy_trend, EnergyTrend::High);
    }

    #[test]
    fn test_depleted_weekday_is_low_energy() {
        let s = FeatureSnapshot {
            sleep_hours: 5.9,
            mood_score: 3,
            adherence_avg: 39.9,
            stress_score: 70,
            motivation_score: 59,
            day_type: DayType::Weekday,
            ..snapshot()
        };
        // 1 + 0 + 0 - 2 + 0 + 0
        assert_eq!(RuleBasedEnergyModel::score(&s), -1);
        assert_eq!(TrendPredictor::default().predict(&s).energy_trend, EnergyTrend::Low);
    }

    #[test]
    fn test_energy_thresholds_are_step_functions() {
        // Contributions do not scale past a threshold.
        let a = FeatureSnapshot {
            sleep_hours: 8.0,
            ..snapshot()
        };
        let b = FeatureSnapshot {
            sleep_hours: 12.0,
            ..snapshot()
        };
        assert_eq!(RuleBasedEnergyModel::score(&a), RuleBasedEnergyModel::score(&b));
    }

    #[test]
    fn test_nominal_inputs_are_medium_and_normal() {
        let s = FeatureSnapshot {
            sleep_hours: 7.0,
            mood_score: 5,
            adherence_avg: 60.0,
            stress_score: 50,
            motivation_score: 50,
            energy: 5.0,
            ..snapshot()
        };
        let prediction = TrendPredictor::default().predict(&s);
        // energy: 2 + 1 + 1 - 1 = 3, appetite: 2 + 1 - 1 = 2
        assert_eq!(prediction.energy_trend, EnergyTrend::Medium);
        assert_eq!(prediction.appetite_trend, AppetiteTrend::Normal);
        assert_eq!(prediction.confidence, CONFIDENCE);
    }

    #[test]
    fn test_appetite_uses_reported_energy_not_weekend() {
        let base = FeatureSnapshot {
            sleep_hours: 7.0,
            mood_score: 6,
            stress_score: 40,
            energy: 6.9,
            ..snapshot()
        };
        assert_eq!(RuleBasedAppetiteModel::score(&base), 4);

        let energetic = FeatureSnapshot {
            energy: 7.0,
            day_type: DayType::Weekend,
            ..base
        };
        assert_eq!(RuleBasedAppetiteModel::score(&energetic), 5);
    }

    #[test]
    fn test_stressed_short_sleep_is_low_appetite() {
        let s = FeatureSnapshot {
            sleep_hours: 4.0,
            mood_score: 3,
            stress_score: 90,
            energy: 2.0,
            ..snapshot()
        };
        assert_eq!(TrendPredictor::default().predict(&s).appetite_trend, AppetiteTrend::Low);
    }

    struct AlwaysHigh;

    impl EnergyModel for AlwaysHigh {
        fn predict(&self, _: &FeatureSnapshot) -> EnergyTrend {
            EnergyTrend::High
        }
    }

    #[test]
    fn test_models_are_swappable() {
        let predictor = TrendPredictor::new(Arc::new(AlwaysHigh), Arc::new(RuleBasedAppetiteModel));
        let s = FeatureSnapshot {
            sleep_hours: 3.0,
            ..snapshot()
        };
        assert_eq!(predictor.predict(&s).energy_trend, EnergyTrend::High);
    }
}
